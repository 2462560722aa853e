use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ViewerError};
use crate::models::{Metric, MetricCategory, Report, Upload};

/// Metric ids shown on the vitals dashboard, in display order.
pub const DASHBOARD_METRICS: [&str; 3] = ["glucose", "ldl", "vitd"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientData {
    pub name: String,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub uploads: Vec<Upload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatestUpdate<'a> {
    pub date: NaiveDate,
    pub metric_name: &'a str,
}

impl PatientData {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    pub fn metric(&self, id: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn report(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn dashboard_metrics(&self) -> Vec<&Metric> {
        DASHBOARD_METRICS
            .iter()
            .filter_map(|id| self.metric(id))
            .collect()
    }

    pub fn metrics_in(&self, category: MetricCategory) -> Vec<&Metric> {
        self.metrics
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    pub fn most_recent_update(&self) -> Option<LatestUpdate<'_>> {
        // max_by_key returns the last maximum; ties go to the earliest metric.
        self.metrics
            .iter()
            .rev()
            .max_by_key(|m| m.last_updated)
            .map(|m| LatestUpdate {
                date: m.last_updated,
                metric_name: &m.name,
            })
    }

    pub fn days_since_last_test(&self, today: NaiveDate) -> Option<i64> {
        self.most_recent_update()
            .map(|latest| (today - latest.date).num_days())
    }

    /// Appends imported reports. Nothing is added if any id is already
    /// taken, so report ids stay unique.
    pub fn add_reports(&mut self, reports: Vec<Report>) -> Result<usize> {
        if let Some(taken) = reports.iter().find(|r| self.report(&r.id).is_some()) {
            return Err(ViewerError::DuplicateReport(taken.id.clone()));
        }

        let added = reports.len();
        self.reports.extend(reports);
        info!(added, total = self.reports.len(), "added imported reports");
        Ok(added)
    }

    pub fn add_upload(&mut self, upload: Upload) {
        info!(
            upload_id = %upload.id,
            filename = %upload.filename,
            metrics = upload.metrics.len(),
            "added uploaded report"
        );
        self.uploads.push(upload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn first_name_is_first_token() {
        let patient = PatientData {
            name: "Alex  Morgan".to_string(),
            ..PatientData::default()
        };
        assert_eq!(patient.first_name(), "Alex");
        assert_eq!(PatientData::default().first_name(), "");
    }

    #[test]
    fn dashboard_keeps_fixed_order_and_skips_missing() {
        let mut patient = seed::patient_data();
        let ids: Vec<&str> = patient.dashboard_metrics().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["glucose", "ldl", "vitd"]);

        patient.metrics.retain(|m| m.id != "ldl");
        let ids: Vec<&str> = patient.dashboard_metrics().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["glucose", "vitd"]);
    }

    #[test]
    fn groups_metrics_by_category() {
        let patient = seed::patient_data();
        let heart: Vec<&str> = patient
            .metrics_in(MetricCategory::Heart)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(heart, vec!["ldl", "hdl"]);
        assert!(patient.metrics_in(MetricCategory::Urine).is_empty());
    }

    #[test]
    fn freshness_uses_newest_update() {
        let patient = seed::patient_data();
        let latest = patient.most_recent_update().unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2023, 4, 15).unwrap());
        assert_eq!(latest.metric_name, "Glucose");

        let today = NaiveDate::from_ymd_opt(2023, 4, 25).unwrap();
        assert_eq!(patient.days_since_last_test(today), Some(10));
        assert_eq!(PatientData::default().days_since_last_test(today), None);
    }

    #[test]
    fn uploads_are_appended() {
        let mut patient = seed::patient_data();
        let upload = Upload {
            id: uuid::Uuid::new_v4(),
            filename: "lipids.pdf".to_string(),
            upload_date: chrono::Utc::now(),
            metrics: Vec::new(),
        };

        patient.add_upload(upload.clone());
        assert_eq!(patient.uploads, vec![upload]);
        assert_eq!(patient.reports.len(), 5);
    }

    #[test]
    fn imported_reports_must_not_reuse_an_id() {
        let mut patient = seed::patient_data();
        let mut clash = patient.reports[0].clone();
        clash.title = "Other Panel".to_string();
        let mut fresh = clash.clone();
        fresh.id = "file6".to_string();

        let err = patient.add_reports(vec![fresh.clone(), clash]).unwrap_err();
        assert!(matches!(err, ViewerError::DuplicateReport(ref id) if id == "file1"));
        assert_eq!(patient.reports.len(), 5);
        assert_eq!(patient.report("file1").map(|r| r.title.as_str()), Some("Complete Blood Panel"));

        assert_eq!(patient.add_reports(vec![fresh.clone()]).unwrap(), 1);
        assert_eq!(patient.report("file6").map(|r| r.title.as_str()), Some("Other Panel"));
        assert!(patient.add_reports(vec![fresh]).is_err());
        assert_eq!(patient.reports.len(), 6);
    }

    #[test]
    fn lookups_by_id() {
        let patient = seed::patient_data();
        assert_eq!(patient.report("file2").map(|r| r.title.as_str()), Some("Lipid Panel"));
        assert!(patient.metric("missing").is_none());
    }
}
