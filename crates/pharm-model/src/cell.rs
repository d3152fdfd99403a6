//! Cell coercion at the input boundary.
//!
//! Pasted text and spreadsheet uploads both arrive as strings. Anything that
//! needs a number goes through [`CellValue::coerce`] once, so the matching and
//! report logic never has to guess what type a cell held.

use std::fmt;

/// A coerced input cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty or absent cell.
    #[default]
    Missing,
    /// Finite numeric value.
    Number(f64),
    /// Anything that did not parse as a finite number.
    Text(String),
}

impl CellValue {
    /// Coerce a raw cell: try-parse-as-number, else treat as text.
    ///
    /// # Examples
    ///
    /// ```
    /// use pharm_model::CellValue;
    ///
    /// assert_eq!(CellValue::coerce(Some(" 5.9 ")), CellValue::Number(5.9));
    /// assert_eq!(CellValue::coerce(Some("")), CellValue::Missing);
    /// assert_eq!(CellValue::coerce(None), CellValue::Missing);
    /// assert_eq!(CellValue::coerce(Some("n/a")), CellValue::Text("n/a".to_string()));
    /// ```
    pub fn coerce(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Missing;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        match parse_f64(trimmed) {
            Some(value) => Self::Number(value),
            None => Self::Text(trimmed.to_string()),
        }
    }

    /// Integer part of a numeric cell, truncated toward zero.
    ///
    /// Stays an `f64` so magnitudes beyond `i64` are not clamped. Returns
    /// `None` for text and missing cells.
    pub fn as_quantity(&self) -> Option<f64> {
        match self {
            // `+ 0.0` turns -0.0 into 0.0
            Self::Number(value) => Some(value.trunc() + 0.0),
            _ => None,
        }
    }

    /// [`as_quantity`](Self::as_quantity) rendered as a plain integer string.
    pub fn quantity_text(&self) -> Option<String> {
        self.as_quantity().map(|quantity| format!("{quantity:.0}"))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Number(value) => f.write_str(&format_numeric(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use pharm_model::format_numeric;
///
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(5.90), "5.9");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a string as a finite `f64`, returning `None` for invalid, empty or
/// non-finite input (`inf`, `NaN`).
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
