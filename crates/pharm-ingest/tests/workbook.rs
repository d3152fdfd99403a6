//! Integration tests for reading uploaded workbooks.

use pharm_ingest::{
    DelimitedOptions, IngestError, TableSource, column_text, read_workbook, read_workbook_bytes,
};
use rust_xlsxwriter::Workbook;

fn stock_workbook() -> Workbook {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "센터").unwrap();
    sheet.write_string(0, 1, "약품명").unwrap();
    sheet.write_string(0, 2, "재고").unwrap();
    sheet.write_string(1, 0, "North").unwrap();
    sheet.write_string(1, 1, "Tylenol").unwrap();
    sheet.write_number(1, 2, 5.9).unwrap();
    sheet.write_string(2, 0, "South").unwrap();
    sheet.write_string(2, 1, "Aspirin").unwrap();
    sheet.write_number(2, 2, 12.0).unwrap();
    workbook
}

#[test]
fn reads_first_sheet_with_header_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.xlsx");
    stock_workbook().save(&path).unwrap();

    let df = read_workbook(&path).unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(column_text(&df, "센터", 0).as_deref(), Some("North"));
    assert_eq!(column_text(&df, "재고", 0).as_deref(), Some("5.9"));
    assert_eq!(column_text(&df, "재고", 1).as_deref(), Some("12"));
}

#[test]
fn reads_workbook_from_memory() {
    let bytes = stock_workbook().save_to_buffer().unwrap();
    let df = read_workbook_bytes(bytes, std::path::Path::new("upload.xlsx")).unwrap();
    assert_eq!(column_text(&df, "약품명", 1).as_deref(), Some("Aspirin"));
}

#[test]
fn table_source_dispatches_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("stock.xlsx");
    stock_workbook().save(&xlsx).unwrap();
    let tsv = dir.path().join("stock.tsv");
    std::fs::write(&tsv, "센터\t약품명\t재고\nNorth\tTylenol\t3\n").unwrap();

    let from_xlsx = TableSource::from_path(&xlsx)
        .unwrap()
        .load(&DelimitedOptions::default())
        .unwrap();
    let from_tsv = TableSource::from_path(&tsv)
        .unwrap()
        .load(&DelimitedOptions::default())
        .unwrap();

    assert_eq!(from_xlsx.height(), 2);
    assert_eq!(from_tsv.height(), 1);
    assert_eq!(column_text(&from_tsv, "재고", 0).as_deref(), Some("3"));
}

#[test]
fn missing_workbook_is_reported() {
    let err = read_workbook(std::path::Path::new("/nonexistent/stock.xlsx")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
