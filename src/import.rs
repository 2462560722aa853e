use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, ViewerError};
use crate::models::{Measurement, Report};
use crate::patient::PatientData;

#[derive(Debug, Deserialize)]
struct CsvRow {
    report_id: String,
    title: String,
    date: String,
    location: String,
    doctor: String,
    status: String,
    #[serde(rename = "type")]
    report_type: String,
    measurement: String,
    value: String,
    unit: String,
    flag: String,
    reference: String,
}

/// Reads one row per measurement and groups rows into reports, keeping the
/// order in which each report id first appears. Every row is validated, and
/// rows of one report must agree on the report columns.
pub fn reports_from_csv<R: Read>(input: R) -> Result<Vec<Report>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut reports: Vec<Report> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|_| ViewerError::InvalidDate(format!("{} (report {})", row.date, row.report_id)))?;
        let measurement = Measurement {
            name: row.measurement,
            value: row.value,
            unit: row.unit,
            status: row.flag.parse()?,
            reference_range: row.reference,
        };
        let report = Report {
            id: row.report_id,
            title: row.title,
            date,
            location: row.location,
            doctor: row.doctor,
            status: row.status.parse()?,
            report_type: row.report_type.parse()?,
            patient_id: None,
            insurance: None,
            technician: None,
            results: vec![measurement],
        };

        match index.get(&report.id) {
            Some(&position) => merge_row(&mut reports[position], report)?,
            None => {
                debug!(report_id = %report.id, "new report in csv");
                index.insert(report.id.clone(), reports.len());
                reports.push(report);
            }
        }
    }

    Ok(reports)
}

fn merge_row(existing: &mut Report, row: Report) -> Result<()> {
    let conflict = if existing.title != row.title {
        Some("title")
    } else if existing.date != row.date {
        Some("date")
    } else if existing.location != row.location {
        Some("location")
    } else if existing.doctor != row.doctor {
        Some("doctor")
    } else if existing.status != row.status {
        Some("status")
    } else if existing.report_type != row.report_type {
        Some("type")
    } else {
        None
    };

    if let Some(field) = conflict {
        return Err(ViewerError::ConflictingRows {
            id: row.id,
            field,
        });
    }

    existing.results.extend(row.results);
    Ok(())
}

pub fn import_csv(csv_path: &Path) -> Result<Vec<Report>> {
    let file = std::fs::File::open(csv_path)?;
    let reports = reports_from_csv(file)?;
    info!(
        path = %csv_path.display(),
        reports = reports.len(),
        "imported reports from csv"
    );
    Ok(reports)
}

pub fn patient_from_json<R: Read>(input: R) -> Result<PatientData> {
    Ok(serde_json::from_reader(input)?)
}

pub fn load_patient(json_path: &Path) -> Result<PatientData> {
    let file = std::fs::File::open(json_path)?;
    let patient = patient_from_json(std::io::BufReader::new(file))?;
    info!(
        path = %json_path.display(),
        metrics = patient.metrics.len(),
        reports = patient.reports.len(),
        "loaded patient data"
    );
    Ok(patient)
}
