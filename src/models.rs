use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Normal,
    Mixed,
    Review,
}

impl FromStr for ReportStatus {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(ReportStatus::Normal),
            "mixed" => Ok(ReportStatus::Mixed),
            "review" => Ok(ReportStatus::Review),
            _ => Err(ViewerError::unknown("report status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Blood,
    Heart,
    Vitamin,
    Organ,
    #[serde(other)]
    Other,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Blood => "blood",
            ReportType::Heart => "heart",
            ReportType::Vitamin => "vitamin",
            ReportType::Organ => "organ",
            ReportType::Other => "other",
        }
    }
}

impl FromStr for ReportType {
    type Err = ViewerError;

    // Unrecognised report types fall back to Other, same as the serde form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "blood" => ReportType::Blood,
            "heart" => ReportType::Heart,
            "vitamin" => ReportType::Vitamin,
            "organ" => ReportType::Organ,
            _ => ReportType::Other,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementStatus {
    Normal,
    High,
    Low,
}

impl MeasurementStatus {
    pub fn is_normal(self) -> bool {
        self == MeasurementStatus::Normal
    }
}

impl FromStr for MeasurementStatus {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(MeasurementStatus::Normal),
            "high" => Ok(MeasurementStatus::High),
            "low" => Ok(MeasurementStatus::Low),
            _ => Err(ViewerError::unknown("measurement status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Balanced,
    Manage,
    Consult,
    Book,
}

impl FromStr for MetricStatus {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(MetricStatus::Balanced),
            "manage" => Ok(MetricStatus::Manage),
            "consult" => Ok(MetricStatus::Consult),
            "book" => Ok(MetricStatus::Book),
            _ => Err(ViewerError::unknown("metric status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricCategory {
    Blood,
    Heart,
    Vitamins,
    Urine,
    #[serde(other)]
    Other,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 5] = [
        MetricCategory::Blood,
        MetricCategory::Heart,
        MetricCategory::Vitamins,
        MetricCategory::Urine,
        MetricCategory::Other,
    ];

    /// Profile heading used when metrics are grouped for display.
    pub fn profile_label(self) -> &'static str {
        match self {
            MetricCategory::Blood => "Blood Health",
            MetricCategory::Heart => "Heart & Cholesterol",
            MetricCategory::Vitamins => "Vitamins",
            MetricCategory::Urine => "Organ Function",
            MetricCategory::Other => "Other",
        }
    }
}

/// Which way a metric has to move to count as an improvement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    LowerIsBetter,
    HigherIsBetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    pub value: String,
    pub unit: String,
    pub status: MeasurementStatus,
    #[serde(alias = "reference")]
    pub reference_range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub doctor: String,
    pub status: ReportStatus,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    #[serde(default)]
    pub results: Vec<Measurement>,
}

impl Report {
    pub fn abnormal_results(&self) -> impl Iterator<Item = &Measurement> {
        self.results.iter().filter(|m| !m.status.is_normal())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: MetricStatus,
    pub category: MetricCategory,
    pub last_updated: NaiveDate,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub id: Uuid,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub metrics: Vec<Metric>,
}
