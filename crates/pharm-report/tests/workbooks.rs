//! Workbooks written here are read back with calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use pharm_core::{PharmacyRegistry, convert_eulji, convert_gapji, run_shortage};
use pharm_ingest::{DelimitedOptions, read_delimited};
use pharm_model::{SupplyDirection, SupplyKind};
use pharm_report::{TemplateSet, render_preview, write_shortage_workbook, write_supply_workbook};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn sheets(bytes: Vec<u8>) -> Vec<(String, Vec<Vec<Data>>)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    let names = workbook.sheet_names();
    names
        .into_iter()
        .map(|name| {
            let range = workbook.worksheet_range(&name).unwrap();
            let rows = range.rows().map(<[Data]>::to_vec).collect();
            (name, rows)
        })
        .collect()
}

fn write_template(dir: &TempDir, kind: SupplyKind, direction: SupplyDirection, header: &[&str]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("보고서식").unwrap();
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    sheet.write_string(1, 0, "stale").unwrap();
    let templates = TemplateSet::new(dir.path());
    workbook.save(templates.path_for(kind, direction)).unwrap();
}

#[test]
fn gapji_uses_template_header_and_text_cells() {
    let dir = TempDir::new().unwrap();
    write_template(&dir, SupplyKind::Gapji, SupplyDirection::Outbound, &["H1", "H2", "H3", "H4"]);
    let registry = PharmacyRegistry::open(&dir.path().join("db.csv")).unwrap();
    let text = "t\nd\n연번\t공급받은자사업자번호\t공급받는자요양기관코드\t공급구분\n\
                2\t111\tA\t1\n1\t222\tB\t1\n";
    let reports = convert_gapji(text, &registry, "20240131").unwrap();
    assert_eq!(reports.len(), 1);

    let templates = TemplateSet::new(dir.path());
    let header = templates.header(SupplyKind::Gapji, SupplyDirection::Outbound).unwrap();
    assert_eq!(header.as_deref().map(<[String]>::len), Some(4));

    let bytes = write_supply_workbook(&reports[0], header.as_deref()).unwrap();
    let sheets = sheets(bytes);
    assert_eq!(sheets.len(), 1);
    let (name, rows) = &sheets[0];
    assert_eq!(name, "보고서식");
    assert_eq!(rows[0][0], Data::String("H1".into()));
    assert_eq!(rows[1][0], Data::String("1".into()));
    assert_eq!(rows[1][1], Data::String("222".into()));
    assert_eq!(rows[2][0], Data::String("2".into()));
    assert_eq!(rows.len(), 3);
}

#[test]
fn eulji_without_template_has_no_header_and_numeric_cells() {
    let dir = TempDir::new().unwrap();
    let templates = TemplateSet::new(dir.path());
    let header = templates.header(SupplyKind::Eulji, SupplyDirection::Outbound).unwrap();
    assert!(header.is_none());

    let text = "a\nb\nc\n5\tx\ty\tz\t12\t1\n";
    let reports = convert_eulji(text, "20240131").unwrap();
    let bytes = write_supply_workbook(&reports[0], None).unwrap();
    let sheets = sheets(bytes);
    let (_, rows) = &sheets[0];
    // Range starts at the first used cell: row 2 of the sheet.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Data::Float(5.0));
    assert_eq!(rows[0][1], Data::String("x".into()));
    assert_eq!(rows[0][4], Data::Float(12.0));
    assert_eq!(rows[0].len(), 5);
}

#[test]
fn shortage_workbook_has_one_sheet_per_center() {
    let stock = read_delimited("센터\t약품명\t재고\nSeoul\tA\t4\n", &DelimitedOptions::default()).unwrap();
    let requests = read_delimited(
        "센터\t약국명\t약사명\t요청 품절약\nSeoul\tp1\ts1\tA\nBusan/2\tp2\ts2\tA, B\n",
        &DelimitedOptions::default(),
    )
    .unwrap();
    let outcome = run_shortage(&stock, &requests).unwrap();

    let sheets = sheets(write_shortage_workbook(&outcome.groups).unwrap());
    let names: Vec<&str> = sheets.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Busan_2", "Seoul"]);

    let (_, seoul) = &sheets[1];
    assert_eq!(seoul[0][0], Data::String("물류센터".into()));
    assert_eq!(seoul[1][3], Data::String("A".into()));
    assert_eq!(seoul[1][4], Data::String("4".into()));
    // Slot 2 columns exist but stay empty for a one-drug request.
    assert_eq!(seoul[0].len(), 3 + 2 * 3);
    assert_eq!(seoul[1][6], Data::Empty);

    let html = render_preview(outcome.table.frame()).unwrap();
    assert!(html.starts_with("<table class=\"data\">"));
    assert!(html.contains("<td>Busan/2</td>"));
}
