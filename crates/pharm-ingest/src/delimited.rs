//! Pasted delimited text.
//!
//! Text copied out of a spreadsheet arrives tab-separated, sometimes with a
//! few preamble lines (report titles, export dates) above the data.

use csv::ReaderBuilder;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::frame::{frame_from_rows, headerless_column_name};

/// How to read a block of pasted text.
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    /// Field delimiter (tab by default).
    pub delimiter: u8,
    /// Lines to drop before parsing, counted on the raw text.
    pub skip_lines: usize,
    /// Whether the first parsed row holds column names.
    pub has_header: bool,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            skip_lines: 0,
            has_header: true,
        }
    }
}

impl DelimitedOptions {
    #[must_use]
    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    #[must_use]
    pub fn headerless(mut self) -> Self {
        self.has_header = false;
        self
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn normalize_cell(raw: &str) -> Option<String> {
    let value = raw.trim_matches('\u{feff}');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse pasted delimited text into a DataFrame of nullable string columns.
///
/// Blank rows are skipped. Rows shorter than the header are padded; trailing
/// empty cells past the header are ignored, trailing non-empty ones are an
/// error.
pub fn read_delimited(text: &str, options: &DelimitedOptions) -> Result<DataFrame> {
    let body: Vec<&str> = text.lines().skip(options.skip_lines).collect();
    let body = body.join("\n");

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut raw_rows: Vec<(u64, Vec<Option<String>>)> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| IngestError::Delimited {
            line: error.position().map_or(0, csv::Position::line),
            message: error.to_string(),
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        if row.iter().all(Option::is_none) {
            continue;
        }
        raw_rows.push((line, row));
    }

    let mut rows_iter = raw_rows.into_iter();
    let headers: Vec<String> = if options.has_header {
        match rows_iter.next() {
            Some((_, header_row)) => header_row
                .iter()
                .map(|cell| normalize_header(cell.as_deref().unwrap_or("")))
                .collect(),
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };
    let data: Vec<(u64, Vec<Option<String>>)> = rows_iter.collect();

    let width = if options.has_header {
        headers.len()
    } else {
        data.iter().map(|(_, row)| row.len()).max().unwrap_or(0)
    };
    let headers = if options.has_header {
        headers
    } else {
        (0..width).map(headerless_column_name).collect()
    };

    let mut rows = Vec::with_capacity(data.len());
    for (line, mut row) in data {
        if row.len() > width {
            let overflow = row[width..].iter().filter(|cell| cell.is_some()).count();
            if overflow > 0 {
                return Err(IngestError::RaggedRow {
                    line: line + options.skip_lines as u64,
                    found: row.len(),
                    expected: width,
                });
            }
            row.truncate(width);
        }
        rows.push(row);
    }

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        skipped_lines = options.skip_lines,
        "parsed delimited text"
    );
    frame_from_rows(headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polars_utils::column_text;

    #[test]
    fn reads_header_and_rows() {
        let df = read_delimited(
            "센터\t약품명\t재고\nC1\tDrugX\t10\nC2\tDrugY\t\n",
            &DelimitedOptions::default(),
        )
        .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert_eq!(column_text(&df, "약품명", 1).as_deref(), Some("DrugY"));
        assert_eq!(column_text(&df, "재고", 1), None);
    }

    #[test]
    fn skips_preamble_lines() {
        let text = "title\nexported 2024-01-31\n연번\t공급구분\n1\t1\n";
        let df = read_delimited(text, &DelimitedOptions::default().with_skip_lines(2)).unwrap();
        assert_eq!(df.height(), 1);
        assert!(df.column("연번").is_ok());
    }

    #[test]
    fn headerless_columns_are_numbered() {
        let text = "1\ta\n2\tb\tc\n";
        let df = read_delimited(text, &DelimitedOptions::default().headerless()).unwrap();
        assert_eq!(df.width(), 3);
        assert_eq!(column_text(&df, "column_3", 1).as_deref(), Some("c"));
        assert_eq!(column_text(&df, "column_3", 0), None);
    }

    #[test]
    fn trailing_empty_cells_are_ignored() {
        let df = read_delimited("a\tb\n1\t2\t\t\n", &DelimitedOptions::default()).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn overflowing_cells_are_rejected() {
        let err = read_delimited("a\tb\n1\t2\t3\n", &DelimitedOptions::default()).unwrap_err();
        assert!(matches!(err, IngestError::RaggedRow { found: 3, expected: 2, .. }));
    }

    #[test]
    fn bom_is_stripped_from_header() {
        let df = read_delimited("\u{feff}센터\tx\nA\t1\n", &DelimitedOptions::default()).unwrap();
        assert!(df.column("센터").is_ok());
    }

    #[test]
    fn empty_text_gives_empty_frame() {
        let df = read_delimited("", &DelimitedOptions::default()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }
}
