use pharm_model::{
    CellValue, ExpandedRow, Slot, SupplyDirection, SupplyKind, supply_output_name,
    supply_template_name,
};

#[test]
fn supply_output_names_follow_report_convention() {
    assert_eq!(
        supply_output_name("20240131", SupplyKind::Gapji, SupplyDirection::Outbound),
        "20240131_S01_공급내역보고_갑지_S001-출고.xlsx"
    );
    assert_eq!(
        supply_output_name("20240131", SupplyKind::Eulji, SupplyDirection::Return),
        "20240131_S01_공급내역보고_을지_S001-반품.xlsx"
    );
}

#[test]
fn template_names_match_directions() {
    assert_eq!(
        supply_template_name(SupplyKind::Gapji, SupplyDirection::Return),
        "공급내역보고_갑지_S001-반품.xlsx"
    );
}

#[test]
fn direction_codes() {
    assert_eq!(
        SupplyDirection::from_code(" 1 "),
        Some(SupplyDirection::Outbound)
    );
    assert_eq!(SupplyDirection::from_code("2"), Some(SupplyDirection::Return));
    assert_eq!(SupplyDirection::from_code("3"), None);
    for direction in SupplyDirection::ALL {
        assert_eq!(SupplyDirection::from_code(direction.code()), Some(direction));
    }
}

#[test]
fn expanded_row_serializes() {
    let row = ExpandedRow {
        center: "C1".to_string(),
        pharmacy_name: "P1".to_string(),
        pharmacist_name: "S1".to_string(),
        slots: vec![Slot::new("DrugX", "10")],
    };
    let json = serde_json::to_string(&row).expect("serialize row");
    let round: ExpandedRow = serde_json::from_str(&json).expect("deserialize row");
    assert_eq!(round, row);
    assert_eq!(round.slot_count(), 1);
    assert_eq!(round.slots[0].blank, "");
}

#[test]
fn coerced_cells_render_plainly() {
    assert_eq!(CellValue::coerce(Some("10.0")).to_string(), "10");
    assert_eq!(CellValue::coerce(Some(" abc ")).to_string(), "abc");
}
