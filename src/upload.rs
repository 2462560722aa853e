use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, ViewerError};
use crate::models::{Direction, Metric, MetricCategory, MetricStatus, Upload};
use crate::pending::PendingOperation;

const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { filename, bytes })
    }

    pub fn validate(&self) -> Result<()> {
        let has_pdf_extension = Path::new(&self.filename)
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"));

        if !has_pdf_extension || !self.bytes.starts_with(PDF_SIGNATURE) {
            warn!(filename = %self.filename, size = self.bytes.len(), "rejected upload");
            return Err(ViewerError::InvalidFileType(self.filename.clone()));
        }

        Ok(())
    }
}

/// Stand-in for the lab PDF parser: every document yields the same total
/// cholesterol reading.
fn parse_document(filename: String, now: DateTime<Utc>) -> Upload {
    Upload {
        id: Uuid::new_v4(),
        filename,
        upload_date: now,
        metrics: vec![Metric {
            id: "cholesterol".to_string(),
            name: "Total Cholesterol".to_string(),
            value: 185.0,
            unit: "mg/dL".to_string(),
            status: MetricStatus::Balanced,
            category: MetricCategory::Blood,
            last_updated: now.date_naive(),
            history: Vec::new(),
            direction: Direction::LowerIsBetter,
        }],
    }
}

/// Validates the candidate up front, then parses it in the background.
pub fn process(
    candidate: UploadCandidate,
    now: DateTime<Utc>,
    delay: Duration,
) -> Result<PendingOperation<Upload>> {
    candidate.validate()?;
    info!(
        filename = %candidate.filename,
        size = candidate.bytes.len(),
        "processing upload"
    );

    let filename = candidate.filename;
    Ok(PendingOperation::spawn("upload", delay, move || {
        Ok(parse_document(filename, now))
    }))
}
