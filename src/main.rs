use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

mod booking;
mod config;
mod error;
mod filter;
mod import;
mod interpret;
mod models;
mod patient;
mod pending;
mod report;
mod seed;
mod trend;
mod upload;

use crate::booking::{BookingForm, Lab, TestType, TimeSlot};
use crate::config::{GlobalArgs, Settings};
use crate::filter::{DateRange, FilterKind, ReportQuery, SortOrder};
use crate::models::MetricStatus;
use crate::pending::wait_or_interrupt;
use crate::upload::UploadCandidate;

#[derive(Parser)]
#[command(name = "health-records")]
#[command(about = "Browse lab reports, vitals and trends, book tests and upload results", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter and sort lab reports
    Reports {
        /// Matches report title, doctor or location
        #[arg(long, default_value = "")]
        search: String,
        /// recent-abnormal, all-normal, recent or all
        #[arg(long, default_value = "recent-abnormal")]
        filter: FilterKind,
        /// newest or oldest
        #[arg(long, default_value = "newest")]
        sort: SortOrder,
        /// 3-months, 6-months, 1-year or all-time
        #[arg(long, default_value = "all-time")]
        range: DateRange,
        /// Show every measurement of one report
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the vitals dashboard
    Vitals {
        #[arg(long)]
        json: bool,
    },
    /// Show the trend of one metric
    Trend { metric: String },
    /// Explain what a metric status means
    Interpret { status: MetricStatus },
    /// Book a lab test
    Book {
        #[arg(long = "test")]
        test_type: Option<TestType>,
        #[arg(long)]
        lab: Option<Lab>,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// One of 9:00, 10:00, 11:00, 13:00, 14:00, 15:00
        #[arg(long)]
        time: Option<TimeSlot>,
        #[arg(long)]
        no_insurance: bool,
    },
    /// Upload a PDF lab result
    Upload {
        file: PathBuf,
        /// Write the updated patient data to this JSON file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import lab reports from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
        /// Write the updated patient data to this JSON file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown summary
    Summary {
        #[arg(long, default_value = "summary.md")]
        out: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_patient(path: &Path, patient: &patient::PatientData) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(patient)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write patient data to {}", path.display()))?;
    println!("Patient data written to {}.", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    config::init_logging(&cli.global);

    let settings = Settings::from_args(&cli.global);
    debug!(?settings, "resolved settings");
    let mut patient = settings.load_patient()?;

    match cli.command {
        Commands::Reports {
            search,
            filter: kind,
            sort,
            range,
            id,
            json,
        } => {
            if let Some(id) = id {
                let report = patient
                    .report(&id)
                    .with_context(|| format!("no report with id {id}"))?;
                if json {
                    return print_json(report);
                }

                println!("{} ({})", report.title, interpret::report_status_text(report.status));
                println!(
                    "{} at {}, ordered by Dr. {}",
                    report.date.format("%b %-d, %Y"),
                    report.location,
                    report.doctor
                );
                if let Some(patient_id) = &report.patient_id {
                    println!("Patient ID: {patient_id}");
                }
                if let Some(insurance) = &report.insurance {
                    println!("Insurance: {insurance}");
                }
                if let Some(technician) = &report.technician {
                    println!("Technician: {technician}");
                }
                for result in report.results.iter() {
                    println!(
                        "- {}: {} {} (reference {}) {}",
                        result.name,
                        result.value,
                        result.unit,
                        result.reference_range,
                        interpret::measurement_flag(result.status)
                    );
                }
                return Ok(());
            }

            let query = ReportQuery {
                text: search,
                kind,
                range,
                order: sort,
            };
            let reports = filter::filter_reports(&patient.reports, &query, settings.today);
            info!(filter = query.kind.as_str(), matched = reports.len(), "filtered reports");

            if json {
                return print_json(&reports);
            }

            if reports.is_empty() {
                println!("No lab reports found. Try adjusting your search or filters.");
                return Ok(());
            }

            println!("{}:", filter::report_count_label(reports.len()));
            for report in reports.iter() {
                println!(
                    "- [{}] {} ({}) {} at {}, Dr. {}: {}",
                    report.id,
                    report.title,
                    report.report_type.as_str(),
                    report.date.format("%b %-d, %Y"),
                    report.location,
                    report.doctor,
                    interpret::report_status_text(report.status)
                );
            }
        }
        Commands::Vitals { json } => {
            let metrics = patient.dashboard_metrics();
            if json {
                let rows: Vec<_> = metrics
                    .iter()
                    .map(|metric| serde_json::json!({
                        "metric": metric,
                        "trend": trend::metric_trend(metric),
                    }))
                    .collect();
                return print_json(&rows);
            }

            println!("Hello, {}. Your vitals:", patient.first_name());
            for metric in metrics {
                let trend_text = match trend::metric_trend(metric) {
                    Some(t) if t.needs_attention() => format!("  {} (watch)", t.text),
                    Some(t) => format!("  {}", t.text),
                    None => String::new(),
                };
                println!(
                    "- {} ({}): {} {} [{}]{}",
                    metric.name,
                    metric.last_updated.format("%b %-d"),
                    metric.value,
                    metric.unit,
                    interpret::dashboard_label(metric.status),
                    trend_text
                );
            }
            if let Some(days) = patient.days_since_last_test(settings.today) {
                println!("Last test {days} days ago.");
            }
        }
        Commands::Trend { metric } => {
            let metric = patient
                .metric(&metric)
                .with_context(|| format!("no metric with id {metric}"))?;
            match trend::metric_trend(metric) {
                Some(t) => println!(
                    "{}: {} ({})",
                    metric.name,
                    t.text,
                    if t.trend.is_improving { "improving" } else { "worsening" }
                ),
                None => println!("{}: no visible trend.", metric.name),
            }
        }
        Commands::Interpret { status } => {
            let interpretation = interpret::interpret(status);
            println!("{}", interpret::metric_label(status));
            println!();
            println!("{}", interpretation.summary);
            println!();
            println!("{}", interpretation.recommendation);
        }
        Commands::Book {
            test_type,
            lab,
            date,
            time,
            no_insurance,
        } => {
            let form = BookingForm {
                test_type,
                lab,
                date,
                time,
                use_insurance: !no_insurance,
            };
            let booking = form.validate(settings.today)?;
            println!("Booking {}...", booking.test_type.label());
            let pending = booking::submit(booking, settings.delay);
            let confirmation = wait_or_interrupt(pending, tokio::signal::ctrl_c()).await?;
            println!("Appointment booked. {}.", confirmation.message);
            let booked = &confirmation.booking;
            println!(
                "Location: {}. Billing: {}.",
                booked.lab.label(),
                if booked.use_insurance { "insurance" } else { "self-pay" }
            );
        }
        Commands::Upload { file, out } => {
            let candidate = UploadCandidate::from_path(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let pending = upload::process(candidate, Utc::now(), settings.delay)?;
            println!("Processing {}...", file.display());
            let upload = wait_or_interrupt(pending, tokio::signal::ctrl_c())
                .await
                .context("there was an error processing your file")?;

            println!(
                "Upload successful: {} metrics read from {}.",
                upload.metrics.len(),
                upload.filename
            );
            patient.add_upload(upload);
            if let Some(out) = out {
                write_patient(&out, &patient)?;
            }
        }
        Commands::Import { csv, out } => {
            let reports = import::import_csv(&csv)
                .with_context(|| format!("failed to import {}", csv.display()))?;
            let added = patient
                .add_reports(reports)
                .with_context(|| format!("failed to import {}", csv.display()))?;
            println!(
                "Imported {} from {}.",
                filter::report_count_label(added),
                csv.display()
            );
            if let Some(out) = out {
                write_patient(&out, &patient)?;
            }
        }
        Commands::Summary { out } => {
            let summary = report::build_report(&patient, settings.today);
            std::fs::write(&out, summary)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Summary written to {}.", out.display());
        }
    }

    Ok(())
}
