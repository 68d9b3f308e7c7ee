// ⚠️ Error Types
// One enum for everything the audit pipeline can report

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("dataset not found at {}", .0.display())]
    DatasetMissing(PathBuf),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("attribute '{0}' cannot be audited")]
    InvalidAttribute(String),

    /// Target column holds something other than 0 or 1
    #[error("invalid label '{value}' on row {row}")]
    InvalidLabel { row: usize, value: String },

    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("split of {rows} rows leaves an empty train or test set")]
    SplitTooSmall { rows: usize },

    #[error("attribute '{attribute}' has {found} group(s), need at least 2")]
    NotEnoughGroups { attribute: String, found: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[cfg(feature = "download")]
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),
}

impl AuditError {
    /// True when the caller asked for something that does not exist,
    /// as opposed to the pipeline failing on valid input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuditError::InvalidAttribute(_) | AuditError::UnknownColumn(_)
        )
    }
}
