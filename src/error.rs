use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("date {0} is in the past")]
    PastDate(NaiveDate),

    #[error("invalid file type for {0}: please upload a PDF file")]
    InvalidFileType(String),

    #[error("unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("report {id} has conflicting {field} values across rows")]
    ConflictingRows { id: String, field: &'static str },

    #[error("a report with id {0} already exists")]
    DuplicateReport(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("background task failed: {0}")]
    Task(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerError {
    pub fn unknown(kind: &'static str, value: &str) -> Self {
        ViewerError::UnknownOption {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
