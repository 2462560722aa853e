use std::fmt::Write;

use chrono::NaiveDate;

use crate::filter::{self, ReportQuery};
use crate::interpret;
use crate::models::{MetricCategory, Report, ReportStatus};
use crate::patient::PatientData;
use crate::trend;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary {
    pub status: ReportStatus,
    pub count: usize,
    pub abnormal_results: usize,
}

pub fn summarize_by_status(reports: &[Report]) -> Vec<StatusSummary> {
    let mut summaries: Vec<StatusSummary> = [ReportStatus::Review, ReportStatus::Mixed, ReportStatus::Normal]
        .into_iter()
        .map(|status| {
            let matching = reports.iter().filter(|r| r.status == status);
            StatusSummary {
                status,
                count: matching.clone().count(),
                abnormal_results: matching.map(|r| r.abnormal_results().count()).sum(),
            }
        })
        .filter(|summary| summary.count > 0)
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_report(patient: &PatientData, today: NaiveDate) -> String {
    let summaries = summarize_by_status(&patient.reports);
    let flagged = filter::filter_reports(&patient.reports, &ReportQuery::default(), today);
    let tally = trend::tally_trends(&patient.metrics);

    let mut output = String::new();

    let _ = writeln!(output, "# Health Records Summary");
    let _ = writeln!(output, "Prepared for {} on {}", patient.name, today);
    if let Some(latest) = patient.most_recent_update() {
        let _ = writeln!(
            output,
            "Last test: {} on {} ({} days ago)",
            latest.metric_name,
            latest.date,
            (today - latest.date).num_days()
        );
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## Report Status Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No lab reports on file.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} ({} flagged results)",
                interpret::report_status_text(summary.status),
                filter::report_count_label(summary.count),
                summary.abnormal_results
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Reports Needing Attention");

    if flagged.is_empty() {
        let _ = writeln!(output, "All reports are within normal ranges.");
    } else {
        for report in flagged.iter() {
            let _ = writeln!(
                output,
                "- {} ({}, Dr. {}) on {}: {}",
                report.title,
                report.location,
                report.doctor,
                report.date,
                interpret::report_status_text(report.status)
            );
            for result in report.abnormal_results() {
                let _ = writeln!(
                    output,
                    "  - {} {} {} ({}, reference {})",
                    result.name,
                    result.value,
                    result.unit,
                    interpret::measurement_flag(result.status),
                    result.reference_range
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Vitals");

    for category in MetricCategory::ALL {
        let metrics = patient.metrics_in(category);
        if metrics.is_empty() {
            continue;
        }

        let _ = writeln!(output, "### {}", category.profile_label());
        for metric in metrics {
            let trend_text = trend::metric_trend(metric)
                .map(|t| format!(", {}", t.text))
                .unwrap_or_default();
            let _ = writeln!(
                output,
                "- {}: {} {} [{}]{}",
                metric.name,
                metric.value,
                metric.unit,
                interpret::metric_label(metric.status),
                trend_text
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trends");
    let _ = writeln!(
        output,
        "{} improving, {} stable, {} worsening",
        tally.improving, tally.stable, tally.worsening
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn status_mix_counts_reports_and_flags() {
        let summaries = summarize_by_status(&seed::reports());
        assert_eq!(
            summaries,
            vec![
                StatusSummary {
                    status: ReportStatus::Mixed,
                    count: 2,
                    abnormal_results: 2,
                },
                StatusSummary {
                    status: ReportStatus::Normal,
                    count: 2,
                    abnormal_results: 0,
                },
                StatusSummary {
                    status: ReportStatus::Review,
                    count: 1,
                    abnormal_results: 2,
                },
            ]
        );
    }

    #[test]
    fn summary_lists_flagged_reports_and_trends() {
        let today = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let output = build_report(&seed::patient_data(), today);

        assert!(output.starts_with("# Health Records Summary\nPrepared for Alex Morgan on 2023-05-01"));
        assert!(output.contains("Last test: Glucose on 2023-04-15 (16 days ago)"));
        assert!(output.contains("- Lipid Panel (LabCorp, Dr. Smith) on 2023-03-10: Needs review"));
        assert!(output.contains("  - Free T4 0.9 ng/dL (Low, reference 0.8-1.8)"));
        assert!(!output.contains("Vitamin Panel (Memorial Hospital"));
        assert!(output.contains("### Heart & Cholesterol"));
        assert!(output.contains("- HDL Cholesterol: 45 mg/dL [Balanced], ▲ 7.1%"));
        assert!(output.contains("4 improving, 0 stable, 1 worsening"));
    }

    #[test]
    fn empty_patient_still_renders() {
        let patient = PatientData {
            name: "Sam".to_string(),
            ..PatientData::default()
        };
        let output = build_report(&patient, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
        assert!(output.contains("No lab reports on file."));
        assert!(output.contains("All reports are within normal ranges."));
        assert!(output.contains("0 improving, 0 stable, 0 worsening"));
    }
}
