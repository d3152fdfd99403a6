//! 갑지/을지 conversion against a registry on disk.

use pharm_core::{CoreError, PharmacyRegistry, TableRole, convert_eulji, convert_gapji};
use pharm_ingest::column_text;
use pharm_model::{SupplyDirection, SupplyKind};
use polars::prelude::{AnyValue, DataType};
use tempfile::TempDir;

const DATE: &str = "20240131";

fn registry(dir: &TempDir, paste: &str) -> PharmacyRegistry {
    let mut registry = PharmacyRegistry::open(&dir.path().join("ykiho_db.csv")).unwrap();
    if !paste.is_empty() {
        registry.update_from_paste(paste).unwrap();
    }
    registry
}

fn gapji_text(rows: &[&str]) -> String {
    let mut text = String::from("공급내역 보고\n2024-01-31\n");
    text.push_str("연번\t공급받은자 사업자번호\t공급받는자요양기관코드\t공급구분\t\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

#[test]
fn gapji_splits_sorts_and_replaces_codes() {
    let dir = TempDir::new().unwrap();
    let registry = registry(&dir, "행복약국\t111\tNEW1\n");
    let text = gapji_text(&[
        "10\t111\tOLD1\t1",
        "2\t222\tOLD2\t1",
        "3\t333\tOLD3\t2",
    ]);

    let reports = convert_gapji(&text, &registry, DATE).unwrap();
    assert_eq!(reports.len(), 2);

    let outbound = &reports[0];
    assert_eq!(outbound.kind, SupplyKind::Gapji);
    assert_eq!(outbound.direction, SupplyDirection::Outbound);
    assert_eq!(outbound.file_name, "20240131_S01_공급내역보고_갑지_S001-출고.xlsx");
    assert_eq!(outbound.template_name(), "공급내역보고_갑지_S001-출고.xlsx");
    assert_eq!(outbound.height(), 2);
    // Numeric serial order: 2 before 10.
    assert_eq!(column_text(&outbound.frame, "연번", 0).as_deref(), Some("2"));
    assert_eq!(column_text(&outbound.frame, "공급받는자요양기관코드", 0).as_deref(), Some("OLD2"));
    assert_eq!(column_text(&outbound.frame, "공급받는자요양기관코드", 1).as_deref(), Some("NEW1"));
    // Alias applied, trailing empty header dropped.
    let names: Vec<String> = outbound
        .frame
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["연번", "공급받은자사업자번호", "공급받는자요양기관코드", "공급구분"]);

    assert_eq!(reports[1].direction, SupplyDirection::Return);
    assert_eq!(reports[1].height(), 1);
}

#[test]
fn gapji_without_returns_produces_one_report() {
    let dir = TempDir::new().unwrap();
    let registry = registry(&dir, "");
    let reports = convert_gapji(&gapji_text(&["1\t111\tA\t1"]), &registry, DATE).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].direction, SupplyDirection::Outbound);
}

#[test]
fn gapji_missing_required_column() {
    let dir = TempDir::new().unwrap();
    let registry = registry(&dir, "");
    let text = "t\nd\n연번\t공급받은자사업자번호\t공급구분\n1\t111\t1\n";
    let err = convert_gapji(text, &registry, DATE).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingColumn { table: TableRole::Supply(SupplyKind::Gapji), ref column }
            if column == "공급받는자요양기관코드"
    ));
}

#[test]
fn gapji_needs_three_lines() {
    let dir = TempDir::new().unwrap();
    let registry = registry(&dir, "");
    let err = convert_gapji("only\ntwo", &registry, DATE).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientLines { required: 3, found: 2, .. }));
}

#[test]
fn eulji_coerces_sorts_and_drops_kind_column() {
    let text = "title\nsub\nheader\n\
                3\ta\tb\tc\t7\t1\tz\n\
                1\ta\tb\tc\tx\t1\ty\n\
                bad\ta\tb\tc\t2\t1\tw\n\
                2\ta\tb\tc\t5\t2\tv\n";

    let reports = convert_eulji(text, DATE).unwrap();
    assert_eq!(reports.len(), 2);

    let outbound = &reports[0];
    assert_eq!(outbound.file_name, "20240131_S01_공급내역보고_을지_S001-출고.xlsx");
    assert_eq!(outbound.frame.width(), 6);
    assert!(outbound.frame.column("column_6").is_err());
    assert_eq!(outbound.frame.column("column_1").unwrap().dtype(), &DataType::Float64);

    let serials: Vec<AnyValue<'_>> = (0..outbound.height())
        .map(|idx| outbound.frame.column("column_1").unwrap().get(idx).unwrap())
        .collect();
    assert_eq!(
        serials,
        vec![AnyValue::Float64(1.0), AnyValue::Float64(3.0), AnyValue::Null]
    );
    // Invalid quantity became blank.
    assert_eq!(column_text(&outbound.frame, "column_5", 0), None);
    assert_eq!(column_text(&outbound.frame, "column_7", 2).as_deref(), Some("w"));

    assert_eq!(reports[1].direction, SupplyDirection::Return);
    assert_eq!(reports[1].height(), 1);
}

#[test]
fn eulji_with_too_few_columns_is_rejected() {
    let text = "a\nb\nc\n1\t2\t3\n";
    let err = convert_eulji(text, DATE).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingColumn { table: TableRole::Supply(SupplyKind::Eulji), .. }
    ));
}
