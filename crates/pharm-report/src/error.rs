//! Report writing and artifact storage errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from materializing or storing report outputs.
#[derive(Debug, Error)]
pub enum ReportError {
    // === Workbooks ===
    /// rust_xlsxwriter rejected a write.
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Template workbook exists but cannot be read.
    #[error("failed to read template {path}: {message}")]
    Template { path: PathBuf, message: String },

    /// Failed DataFrame access while writing.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Table does not fit in a worksheet.
    #[error("{what} {index} is beyond the worksheet limit")]
    SheetTooLarge { what: &'static str, index: usize },

    /// HTML preview could not be rendered.
    #[error("failed to render preview: {message}")]
    Preview { message: String },

    // === Artifact store ===
    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest could not be encoded or decoded.
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no submission with token '{token}'")]
    UnknownToken { token: String },

    #[error("submission {token} has no file '{name}'")]
    UnknownFile { token: String, name: String },

    /// Output names must be plain file names.
    #[error("invalid artifact file name '{name}'")]
    InvalidName { name: String },

    #[error("submission {token} expired")]
    Expired { token: String },

    /// Stored file no longer matches its manifest checksum.
    #[error("checksum mismatch for {path}: expected {expected}, found {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl ReportError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
