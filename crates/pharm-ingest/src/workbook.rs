//! Spreadsheet uploads.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use pharm_model::format_numeric;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::frame::frame_from_rows;

fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => Some(other.to_string()),
    }
}

/// Read the first worksheet of a workbook; its first row is the header.
pub fn read_workbook(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let workbook = open_workbook_auto(path).map_err(|error| IngestError::Workbook {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    first_sheet_frame(workbook, path)
}

/// Read an uploaded workbook held in memory. `name` is only used in errors.
pub fn read_workbook_bytes(bytes: Vec<u8>, name: &Path) -> Result<DataFrame> {
    let workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|error| IngestError::Workbook {
            path: name.to_path_buf(),
            message: error.to_string(),
        })?;
    first_sheet_frame(workbook, name)
}

fn first_sheet_frame<RS>(mut workbook: Sheets<RS>, path: &Path) -> Result<DataFrame>
where
    RS: std::io::Read + std::io::Seek,
{
    let sheet_names = workbook.sheet_names();
    let Some(first) = sheet_names.first().cloned() else {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    };
    let range = workbook
        .worksheet_range(&first)
        .map_err(|error| IngestError::Workbook {
            path: path.to_path_buf(),
            message: format!("sheet '{first}': {error}"),
        })?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_text(cell).unwrap_or_default().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<Option<String>>> = rows_iter
        .map(|row| row.iter().map(cell_to_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(Option::is_some))
        .collect();

    debug!(
        path = %path.display(),
        sheet = %first,
        columns = headers.len(),
        rows = rows.len(),
        "read workbook sheet"
    );
    frame_from_rows(headers, &rows)
}
