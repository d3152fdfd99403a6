//! HTML preview of the shortage table.

use pharm_ingest::any_to_string;
use polars::prelude::{AnyValue, DataFrame};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ReportError, Result};

fn preview_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Preview {
        message: err.to_string(),
    }
}

fn write_cell(xml: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(tag)))
        .map_err(preview_error)?;
    if !text.is_empty() {
        xml.write_event(Event::Text(BytesText::new(text)))
            .map_err(preview_error)?;
    }
    xml.write_event(Event::End(BytesEnd::new(tag)))
        .map_err(preview_error)?;
    Ok(())
}

fn open(xml: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(tag)))
        .map_err(preview_error)
}

fn close(xml: &mut Writer<Vec<u8>>, tag: &str) -> Result<()> {
    xml.write_event(Event::End(BytesEnd::new(tag)))
        .map_err(preview_error)
}

/// Render a frame as `<table class="data">`.
///
/// The header row starts with an empty cell above the row-index column.
/// Text is escaped; null cells render empty.
pub fn render_preview(frame: &DataFrame) -> Result<String> {
    let mut xml = Writer::new(Vec::new());

    let table = BytesStart::new("table").with_attributes([("class", "data")]);
    xml.write_event(Event::Start(table)).map_err(preview_error)?;

    open(&mut xml, "thead")?;
    open(&mut xml, "tr")?;
    write_cell(&mut xml, "th", "")?;
    for name in frame.get_column_names() {
        write_cell(&mut xml, "th", name.as_str())?;
    }
    close(&mut xml, "tr")?;
    close(&mut xml, "thead")?;

    open(&mut xml, "tbody")?;
    for row_idx in 0..frame.height() {
        open(&mut xml, "tr")?;
        write_cell(&mut xml, "th", &row_idx.to_string())?;
        for column in frame.get_columns() {
            let value = column.get(row_idx).unwrap_or(AnyValue::Null);
            write_cell(&mut xml, "td", &any_to_string(value))?;
        }
        close(&mut xml, "tr")?;
    }
    close(&mut xml, "tbody")?;
    close(&mut xml, "table")?;

    String::from_utf8(xml.into_inner()).map_err(preview_error)
}
