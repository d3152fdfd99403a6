//! Error types for the core transformations.

use std::fmt;
use std::path::PathBuf;

use pharm_ingest::IngestError;
use pharm_model::SupplyKind;
use thiserror::Error;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Stock,
    Requests,
    Supply(SupplyKind),
    Registry,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock => f.write_str("stock table"),
            Self::Requests => f.write_str("request table"),
            Self::Supply(kind) => write!(f, "{kind} supply data"),
            Self::Registry => f.write_str("registry data"),
        }
    }
}

/// Errors that abort a whole submission.
///
/// Missing descriptive request fields and stock match misses are not errors;
/// they degrade to placeholders and "0" quantities.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A column the operation cannot work without is absent.
    #[error("required column '{column}' missing from {table}")]
    MissingColumn { table: TableRole, column: String },

    /// Pasted report text is shorter than its preamble plus header.
    #[error("{kind} data too short: need at least {required} lines, got {found}")]
    InsufficientLines {
        kind: SupplyKind,
        required: usize,
        found: usize,
    },

    /// A pasted registry row has fewer than the three expected fields.
    #[error("registry line {line} has {found} fields, expected at least {required}")]
    TooFewFields {
        line: usize,
        found: usize,
        required: usize,
    },

    /// Registry file could not be read or written.
    #[error("registry {operation} failed for {path}: {source}")]
    RegistryIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid CSV.
    #[error("invalid registry file {path}: {message}")]
    RegistryFormat { path: PathBuf, message: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl CoreError {
    pub(crate) fn missing_column(table: TableRole, column: &str) -> Self {
        Self::MissingColumn {
            table,
            column: column.to_string(),
        }
    }

    pub(crate) fn registry_io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::RegistryIo {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for CoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
