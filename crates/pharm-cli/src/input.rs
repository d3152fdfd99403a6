//! Command inputs: pasted text from a file or stdin, tables from text or
//! spreadsheets.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use pharm_ingest::{DelimitedOptions, TableSource};
use polars::prelude::DataFrame;

/// Path argument meaning "read standard input".
pub const STDIN_MARKER: &str = "-";

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_MARKER
}

/// Read pasted text from a file, or from stdin for `-`.
pub fn read_text(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("read standard input")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Read pasted text that must not be blank.
pub fn read_nonblank_text(path: &Path, what: &str) -> Result<String> {
    let text = read_text(path)?;
    if text.trim().is_empty() {
        bail!("{what} input is empty");
    }
    Ok(text)
}

/// Load a headed table: stdin and text files as tab-separated text,
/// spreadsheets by their first sheet.
pub fn load_table(path: &Path, what: &str) -> Result<DataFrame> {
    let options = DelimitedOptions::default();
    let source = if is_stdin(path) {
        TableSource::Pasted(read_nonblank_text(path, what)?)
    } else {
        TableSource::from_path(path).with_context(|| format!("{what} table {}", path.display()))?
    };
    if source.is_blank() {
        bail!("{what} input is empty");
    }
    source
        .load(&options)
        .with_context(|| format!("load {what} table"))
}
