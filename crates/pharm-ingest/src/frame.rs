//! Building string-typed DataFrames from parsed rows.

use std::collections::BTreeSet;

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::error::Result;

/// Column name given to column `index` (0-based) of a headerless table.
pub fn headerless_column_name(index: usize) -> String {
    format!("column_{}", index + 1)
}

/// Make header names usable as DataFrame column names.
///
/// Empty names become `Unnamed: {index}` and repeated names get `.1`, `.2`, ...
/// suffixes, so pasted sheets with blank or duplicated header cells still load.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header
        };
        let mut name = base.clone();
        let mut suffix = 1usize;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

/// Build a DataFrame of nullable string columns.
///
/// Rows shorter than `headers` are padded with nulls; cells past the last
/// header are dropped (callers reject non-empty overflow before this point).
pub fn frame_from_rows(headers: Vec<String>, rows: &[Vec<Option<String>>]) -> Result<DataFrame> {
    let headers = unique_headers(headers);
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for (col_idx, name) in headers.iter().enumerate() {
        let values: Vec<Option<String>> = rows
            .iter()
            .map(|row| row.get(col_idx).cloned().flatten())
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into_column());
    }
    Ok(DataFrame::new(columns)?)
}
