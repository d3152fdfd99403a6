//! Input channel selection: pasted text versus uploaded workbook.

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use crate::delimited::{DelimitedOptions, read_delimited};
use crate::error::{IngestError, Result};
use crate::workbook::{read_workbook, read_workbook_bytes};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];
const TEXT_EXTENSIONS: [&str; 4] = ["tsv", "txt", "tab", "csv"];

/// Where a table comes from.
#[derive(Debug, Clone)]
pub enum TableSource {
    /// Text pasted into the form (or piped on stdin).
    Pasted(String),
    /// Workbook on disk.
    Workbook(PathBuf),
    /// Workbook received in memory.
    Upload { name: PathBuf, bytes: Vec<u8> },
}

impl TableSource {
    /// Pick a source for a file by extension. Text files are read eagerly.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            return Ok(Self::Workbook(path.to_path_buf()));
        }
        if !extension.is_empty() && !TEXT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
        let text =
            std::fs::read_to_string(path).map_err(|error| IngestError::file_read(path, error))?;
        Ok(Self::Pasted(text))
    }

    /// True when the pasted text is blank; the form treats that as "no paste".
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Pasted(text) if text.trim().is_empty())
    }

    /// Load the table. `options` only applies to pasted text.
    pub fn load(&self, options: &DelimitedOptions) -> Result<DataFrame> {
        match self {
            Self::Pasted(text) => read_delimited(text, options),
            Self::Workbook(path) => read_workbook(path),
            Self::Upload { name, bytes } => read_workbook_bytes(bytes.clone(), name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_extensions_are_case_insensitive() {
        let source = TableSource::from_path(Path::new("stock.XLSX")).unwrap();
        assert!(matches!(source, TableSource::Workbook(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = TableSource::from_path(Path::new("stock.pdf")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn blank_paste_is_detected() {
        assert!(TableSource::Pasted("  \n\t".to_string()).is_blank());
        assert!(!TableSource::Pasted("a".to_string()).is_blank());
    }
}
