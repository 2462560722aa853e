use std::str::FromStr;

use chrono::{Months, NaiveDate};

use crate::error::ViewerError;
use crate::models::{Report, ReportStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterKind {
    #[default]
    RecentAbnormal,
    AllNormal,
    Recent,
    All,
}

impl FilterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::RecentAbnormal => "recent-abnormal",
            FilterKind::AllNormal => "all-normal",
            FilterKind::Recent => "recent",
            FilterKind::All => "all",
        }
    }

    fn retains(self, report: &Report) -> bool {
        match self {
            FilterKind::RecentAbnormal => report.status != ReportStatus::Normal,
            FilterKind::AllNormal => report.status == ReportStatus::Normal,
            FilterKind::Recent | FilterKind::All => true,
        }
    }
}

impl FromStr for FilterKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "recent-abnormal" => Ok(FilterKind::RecentAbnormal),
            "all-normal" => Ok(FilterKind::AllNormal),
            "recent" => Ok(FilterKind::Recent),
            "all" => Ok(FilterKind::All),
            other => Err(ViewerError::unknown("filter", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(ViewerError::unknown("sort order", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    Last3Months,
    Last6Months,
    LastYear,
    #[default]
    AllTime,
}

impl DateRange {
    /// Earliest date still inside the range, counted back from `today`.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            DateRange::Last3Months => 3,
            DateRange::Last6Months => 6,
            DateRange::LastYear => 12,
            DateRange::AllTime => return None,
        };
        today.checked_sub_months(Months::new(months))
    }
}

impl FromStr for DateRange {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3-months" => Ok(DateRange::Last3Months),
            "6-months" => Ok(DateRange::Last6Months),
            "1-year" => Ok(DateRange::LastYear),
            "all-time" => Ok(DateRange::AllTime),
            other => Err(ViewerError::unknown("date range", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub text: String,
    pub kind: FilterKind,
    pub range: DateRange,
    pub order: SortOrder,
}

impl ReportQuery {
    fn matches_text(&self, report: &Report) -> bool {
        if self.text.trim().is_empty() {
            return true;
        }

        let needle = self.text.to_lowercase();
        report.title.to_lowercase().contains(&needle)
            || report.doctor.to_lowercase().contains(&needle)
            || report.location.to_lowercase().contains(&needle)
    }
}

pub fn filter_reports(reports: &[Report], query: &ReportQuery, today: NaiveDate) -> Vec<Report> {
    let cutoff = query.range.cutoff(today);

    let mut filtered: Vec<Report> = reports
        .iter()
        .filter(|report| query.matches_text(report))
        .filter(|report| query.kind.retains(report))
        .filter(|report| cutoff.map_or(true, |cutoff| report.date >= cutoff))
        .cloned()
        .collect();

    // sort_by is stable, so equal dates keep their input order.
    match query.order {
        SortOrder::Newest => filtered.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => filtered.sort_by(|a, b| a.date.cmp(&b.date)),
    }

    filtered
}

pub fn report_count_label(count: usize) -> String {
    if count == 1 {
        "1 report".to_string()
    } else {
        format!("{count} reports")
    }
}
