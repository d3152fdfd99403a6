//! Polars AnyValue utility functions.
//!
//! Ingested frames hold nullable strings only, but frames built elsewhere in
//! the workspace may carry numbers, so conversions stay total over `AnyValue`.

use pharm_model::format_numeric;
use polars::prelude::{AnyValue, DataFrame};

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, formats floats without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
        other => other.to_string(),
    }
}

/// True if the frame has a column with exactly this name.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Cell text at `idx`, or `None` for a null cell or a missing column.
pub fn column_text(df: &DataFrame, name: &str, idx: usize) -> Option<String> {
    let column = df.column(name).ok()?;
    match column.get(idx).unwrap_or(AnyValue::Null) {
        AnyValue::Null => None,
        value => Some(any_to_string(value)),
    }
}

/// All cells of a column, `None` for nulls. Returns `None` if the column is absent.
pub fn column_values(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Null => None,
            value => Some(any_to_string(value)),
        };
        values.push(value);
    }
    Some(values)
}
