use chrono::NaiveDate;

use crate::models::{
    Direction, HistoryPoint, Measurement, MeasurementStatus, Metric, MetricCategory, MetricStatus,
    Report, ReportStatus, ReportType,
};
use crate::patient::PatientData;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn results(rows: &[(&str, &str, &str, MeasurementStatus, &str)]) -> Vec<Measurement> {
    rows.iter()
        .map(|(name, value, unit, status, reference)| Measurement {
            name: name.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
            status: *status,
            reference_range: reference.to_string(),
        })
        .collect()
}

fn history(points: &[(NaiveDate, f64)]) -> Vec<HistoryPoint> {
    points
        .iter()
        .map(|(date, value)| HistoryPoint {
            date: *date,
            value: *value,
        })
        .collect()
}

pub fn reports() -> Vec<Report> {
    use MeasurementStatus::{High, Low, Normal};

    let headers = vec![
        (
            "file1",
            "Complete Blood Panel",
            date(2023, 4, 15),
            "Quest Diagnostics",
            "Johnson",
            ReportStatus::Mixed,
            ReportType::Blood,
            "Sarah Johnson",
            results(&[
                ("White Blood Cell Count", "7.8", "K/uL", Normal, "4.5-11.0"),
                ("Red Blood Cell Count", "5.2", "M/uL", Normal, "4.5-5.9"),
                ("Hemoglobin", "14.2", "g/dL", Normal, "13.5-17.5"),
                ("Hematocrit", "42", "%", Normal, "41-50"),
                ("Platelet Count", "290", "K/uL", Normal, "150-450"),
                ("Glucose", "105", "mg/dL", High, "70-99"),
            ]),
        ),
        (
            "file2",
            "Lipid Panel",
            date(2023, 3, 10),
            "LabCorp",
            "Smith",
            ReportStatus::Review,
            ReportType::Heart,
            "Michael Brown",
            results(&[
                ("Total Cholesterol", "210", "mg/dL", High, "<200"),
                ("HDL Cholesterol", "45", "mg/dL", Normal, ">40"),
                ("LDL Cholesterol", "142", "mg/dL", High, "<100"),
                ("Triglycerides", "150", "mg/dL", Normal, "<150"),
            ]),
        ),
        (
            "file3",
            "Vitamin Panel",
            date(2023, 2, 5),
            "Memorial Hospital",
            "Williams",
            ReportStatus::Normal,
            ReportType::Vitamin,
            "Jennifer Davis",
            results(&[
                ("Vitamin D, 25-OH", "32", "ng/mL", Normal, "30-100"),
                ("Vitamin B12", "550", "pg/mL", Normal, "200-900"),
                ("Folate", "15", "ng/mL", Normal, ">5.9"),
            ]),
        ),
        (
            "file4",
            "Thyroid Function",
            date(2023, 1, 20),
            "Quest Diagnostics",
            "Johnson",
            ReportStatus::Mixed,
            ReportType::Organ,
            "Robert Wilson",
            results(&[
                ("TSH", "3.8", "uIU/mL", Normal, "0.4-4.0"),
                ("Free T4", "0.9", "ng/dL", Low, "0.8-1.8"),
                ("Free T3", "3.1", "pg/mL", Normal, "2.3-4.2"),
            ]),
        ),
        (
            "file5",
            "Comprehensive Metabolic Panel",
            date(2022, 12, 15),
            "LabCorp",
            "Davis",
            ReportStatus::Normal,
            ReportType::Blood,
            "Emily Thompson",
            results(&[
                ("Sodium", "140", "mmol/L", Normal, "135-145"),
                ("Potassium", "4.2", "mmol/L", Normal, "3.5-5.0"),
                ("Chloride", "102", "mmol/L", Normal, "98-107"),
                ("CO2", "24", "mmol/L", Normal, "20-29"),
                ("Calcium", "9.5", "mg/dL", Normal, "8.5-10.5"),
                ("Glucose", "95", "mg/dL", Normal, "70-99"),
                ("BUN", "15", "mg/dL", Normal, "7-20"),
                ("Creatinine", "0.9", "mg/dL", Normal, "0.6-1.2"),
            ]),
        ),
    ];

    headers
        .into_iter()
        .map(
            |(id, title, date, location, doctor, status, report_type, technician, results)| Report {
                id: id.to_string(),
                title: title.to_string(),
                date,
                location: location.to_string(),
                doctor: doctor.to_string(),
                status,
                report_type,
                patient_id: Some("12345678".to_string()),
                insurance: Some("Blue Cross".to_string()),
                technician: Some(technician.to_string()),
                results,
            },
        )
        .collect()
}

pub fn metrics() -> Vec<Metric> {
    let rows = vec![
        (
            "glucose",
            "Glucose",
            95.0,
            "mg/dL",
            MetricStatus::Balanced,
            MetricCategory::Blood,
            Direction::LowerIsBetter,
            history(&[
                (date(2023, 1, 15), 95.0),
                (date(2023, 2, 15), 102.0),
                (date(2023, 3, 15), 97.0),
                (date(2023, 4, 15), 95.0),
            ]),
        ),
        (
            "ldl",
            "LDL Cholesterol",
            142.0,
            "mg/dL",
            MetricStatus::Manage,
            MetricCategory::Heart,
            Direction::LowerIsBetter,
            history(&[
                (date(2022, 9, 10), 160.0),
                (date(2022, 12, 10), 150.0),
                (date(2023, 3, 10), 142.0),
            ]),
        ),
        (
            "hdl",
            "HDL Cholesterol",
            45.0,
            "mg/dL",
            MetricStatus::Balanced,
            MetricCategory::Heart,
            Direction::HigherIsBetter,
            history(&[(date(2022, 12, 10), 42.0), (date(2023, 3, 10), 45.0)]),
        ),
        (
            "vitd",
            "Vitamin D",
            32.0,
            "ng/mL",
            MetricStatus::Balanced,
            MetricCategory::Vitamins,
            Direction::HigherIsBetter,
            history(&[(date(2022, 8, 5), 28.0), (date(2023, 2, 5), 32.0)]),
        ),
        (
            "cholesterol",
            "Total Cholesterol",
            210.0,
            "mg/dL",
            MetricStatus::Consult,
            MetricCategory::Blood,
            Direction::LowerIsBetter,
            history(&[(date(2022, 12, 10), 205.0), (date(2023, 3, 10), 210.0)]),
        ),
    ];

    rows.into_iter()
        .map(
            |(id, name, value, unit, status, category, direction, history)| Metric {
                id: id.to_string(),
                name: name.to_string(),
                value,
                unit: unit.to_string(),
                status,
                category,
                last_updated: history.last().map(|p| p.date).unwrap_or_default(),
                history,
                direction,
            },
        )
        .collect()
}

pub fn patient_data() -> PatientData {
    PatientData {
        name: "Alex Morgan".to_string(),
        metrics: metrics(),
        reports: reports(),
        uploads: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend;

    #[test]
    fn seed_histories_are_chronological() {
        for metric in metrics() {
            assert!(
                metric.history.windows(2).all(|w| w[0].date < w[1].date),
                "{} history out of order",
                metric.id
            );
            assert_eq!(metric.history.last().map(|p| p.value), Some(metric.value));
        }
    }

    #[test]
    fn report_status_matches_its_results() {
        for report in reports() {
            let abnormal = report.abnormal_results().count();
            assert_eq!(abnormal == 0, report.status == ReportStatus::Normal, "{}", report.id);
        }
    }

    #[test]
    fn report_details_carry_patient_and_insurance() {
        let report = &reports()[0];
        assert_eq!(report.patient_id.as_deref(), Some("12345678"));
        assert_eq!(report.insurance.as_deref(), Some("Blue Cross"));

        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["patient_id"], "12345678");
        assert_eq!(json["insurance"], "Blue Cross");

        let mut bare = report.clone();
        bare.insurance = None;
        assert!(serde_json::to_value(&bare).unwrap().get("insurance").is_none());
    }

    #[test]
    fn seed_trends_tally() {
        let tally = trend::tally_trends(&metrics());
        assert_eq!(tally.improving, 4);
        assert_eq!(tally.worsening, 1);
        assert_eq!(tally.stable, 0);
    }
}
