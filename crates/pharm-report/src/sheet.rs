//! Worksheet labels.
//!
//! Excel limits sheet names to 31 characters, forbids `[ ] : * ? / \`,
//! rejects a leading or trailing apostrophe and compares names
//! case-insensitively.

use std::collections::BTreeSet;

/// Longest sheet name Excel accepts, in characters.
pub const MAX_SHEET_NAME: usize = 31;

const INVALID_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
const FALLBACK_NAME: &str = "Sheet";

/// Clean one label: invalid characters become `_`, then truncate.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|ch| if INVALID_CHARS.contains(&ch) { '_' } else { ch })
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME).collect();
    if truncated.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        truncated
    }
}

/// Hands out unique sheet names within one workbook.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: BTreeSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitized, unique name for `raw`. A collision gets ` (2)`, ` (3)`, ...
    /// with the base shortened so the result stays within the limit.
    pub fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        let mut name = base.clone();
        let mut counter = 2usize;
        while self.used.contains(&name.to_lowercase()) {
            let suffix = format!(" ({counter})");
            let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
            let head: String = base.chars().take(keep).collect();
            name = format!("{head}{suffix}");
            counter += 1;
        }
        self.used.insert(name.to_lowercase());
        name
    }
}
