//! Supply report templates.
//!
//! Only the template's header row is reused; cell formatting is not carried
//! into the generated workbook.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use pharm_model::columns::REPORT_SHEET;
use pharm_model::{SupplyDirection, SupplyKind, format_numeric, supply_template_name};
use tracing::{debug, warn};

use crate::error::{ReportError, Result};

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(v) => format_numeric(*v),
        other => other.to_string(),
    }
}

/// Row 1 of the report sheet (or of the first sheet when the workbook has
/// no sheet named `보고서식`). Empty cells are kept as empty strings so that
/// columns stay aligned; trailing empties are dropped.
pub fn read_template_header(path: &Path) -> Result<Vec<String>> {
    let template_error = |message: String| ReportError::Template {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| template_error(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet = if sheet_names.iter().any(|name| name == REPORT_SHEET) {
        REPORT_SHEET.to_string()
    } else {
        let first = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| template_error("workbook has no sheets".to_string()))?;
        warn!(
            path = %path.display(),
            expected = REPORT_SHEET,
            sheet = %first,
            "template has no report sheet; using first sheet"
        );
        first
    };
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| template_error(format!("sheet '{sheet}': {e}")))?;

    let mut header = Vec::new();
    if let Some((0, first_col)) = range.start()
        && let Some(row) = range.rows().next()
    {
        header.extend(std::iter::repeat_n(String::new(), first_col as usize));
        header.extend(row.iter().map(header_text));
    }
    while header.last().is_some_and(String::is_empty) {
        header.pop();
    }
    debug!(path = %path.display(), columns = header.len(), "read template header");
    Ok(header)
}

/// Directory holding the `공급내역보고_*` template workbooks.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    dir: PathBuf,
}

impl TemplateSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: SupplyKind, direction: SupplyDirection) -> PathBuf {
        self.dir.join(supply_template_name(kind, direction))
    }

    /// Template header for a report, or `None` when the template file is
    /// absent.
    pub fn header(&self, kind: SupplyKind, direction: SupplyDirection) -> Result<Option<Vec<String>>> {
        let path = self.path_for(kind, direction);
        if !path.exists() {
            warn!(path = %path.display(), "supply template not found; writing without template header");
            return Ok(None);
        }
        read_template_header(&path).map(Some)
    }
}
