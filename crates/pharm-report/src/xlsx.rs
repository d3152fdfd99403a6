//! Workbook materialization with rust_xlsxwriter.

use chrono::NaiveDateTime;
use pharm_core::{CenterGroup, SupplyReport};
use pharm_model::SupplyKind;
use pharm_model::columns::REPORT_SHEET;
use polars::prelude::{AnyValue, DataFrame};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::sheet::SheetNamer;

/// Download name of a shortage workbook, e.g. `result_20240131_093000.xlsx`.
pub fn shortage_output_name(now: NaiveDateTime) -> String {
    format!("result_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| ReportError::SheetTooLarge {
        what: "column",
        index: col,
    })
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| ReportError::SheetTooLarge {
        what: "row",
        index: row,
    })
}

fn write_header(worksheet: &mut Worksheet, header: &[String]) -> Result<()> {
    for (col, name) in header.iter().enumerate() {
        if name.is_empty() {
            continue;
        }
        worksheet.write_string(0, column_index(col)?, name)?;
    }
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: AnyValue<'_>) -> Result<()> {
    match value {
        AnyValue::Null => {}
        AnyValue::String(s) if s.is_empty() => {}
        AnyValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        AnyValue::StringOwned(s) => {
            if !s.is_empty() {
                worksheet.write_string(row, col, s.as_str())?;
            }
        }
        AnyValue::Float64(v) => {
            worksheet.write_number(row, col, v)?;
        }
        AnyValue::Float32(v) => {
            worksheet.write_number(row, col, f64::from(v))?;
        }
        AnyValue::Int64(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::Int32(v) => {
            worksheet.write_number(row, col, f64::from(v))?;
        }
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

/// Write every frame row starting at worksheet row 2.
fn write_rows(worksheet: &mut Worksheet, frame: &DataFrame) -> Result<()> {
    for (col_idx, column) in frame.get_columns().iter().enumerate() {
        let col = column_index(col_idx)?;
        for row_idx in 0..frame.height() {
            let value = column.get(row_idx)?;
            write_cell(worksheet, row_index(row_idx + 1)?, col, value)?;
        }
    }
    Ok(())
}

fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Serialize one supply report into an xlsx workbook.
///
/// Row 1 holds `template_header` when given. Without a template, 갑지
/// reports fall back to their own column names and 을지 reports get no
/// header row. Data always starts on row 2.
pub fn write_supply_workbook(report: &SupplyReport, template_header: Option<&[String]>) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REPORT_SHEET)?;

    match (template_header, report.kind) {
        (Some(header), _) => write_header(worksheet, header)?,
        (None, SupplyKind::Gapji) => write_header(worksheet, &column_names(&report.frame))?,
        (None, SupplyKind::Eulji) => {}
    }
    write_rows(worksheet, &report.frame)?;

    let bytes = workbook.save_to_buffer()?;
    debug!(
        file = %report.file_name,
        rows = report.height(),
        bytes = bytes.len(),
        "wrote supply workbook"
    );
    Ok(bytes)
}

/// Serialize the grouped shortage table, one sheet per center.
pub fn write_shortage_workbook(groups: &[CenterGroup]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let mut namer = SheetNamer::new();
    for group in groups {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(namer.assign(&group.center))?;
        write_header(worksheet, &column_names(&group.frame))?;
        write_rows(worksheet, &group.frame)?;
    }
    let bytes = workbook.save_to_buffer()?;
    debug!(sheets = groups.len(), bytes = bytes.len(), "wrote shortage workbook");
    Ok(bytes)
}
