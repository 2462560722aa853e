use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Args;
use tracing_subscriber::EnvFilter;

use crate::import;
use crate::patient::PatientData;
use crate::seed;

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Patient data JSON file; the built-in sample patient is used when unset
    #[arg(long, global = true, env = "HEALTH_RECORDS_DATA")]
    pub data: Option<PathBuf>,

    /// Reference date for date ranges and booking checks (YYYY-MM-DD)
    #[arg(long, global = true, env = "HEALTH_RECORDS_TODAY")]
    pub today: Option<NaiveDate>,

    /// Simulated processing time for bookings and uploads
    #[arg(long, global = true, env = "HEALTH_RECORDS_DELAY_MS", default_value_t = 1500)]
    pub delay_ms: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path: Option<PathBuf>,
    pub today: NaiveDate,
    pub delay: Duration,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> Self {
        Self {
            data_path: args.data.clone(),
            today: args.today.unwrap_or_else(|| Utc::now().date_naive()),
            delay: Duration::from_millis(args.delay_ms),
        }
    }

    pub fn load_patient(&self) -> anyhow::Result<PatientData> {
        match &self.data_path {
            Some(path) => import::load_patient(path)
                .with_context(|| format!("failed to load patient data from {}", path.display())),
            None => Ok(seed::patient_data()),
        }
    }
}

pub fn init_logging(args: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
