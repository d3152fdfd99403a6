//! Column labels of the business unit's spreadsheets.

// === Shortage redistribution: input ===

/// Distribution center column in both stock and request tables.
pub const STOCK_CENTER: &str = "센터";
/// Drug name column of the stock table.
pub const STOCK_DRUG_NAME: &str = "약품명";
/// Available quantity column of the stock table.
pub const STOCK_QUANTITY: &str = "재고";
pub const REQUEST_CENTER: &str = "센터";
pub const REQUEST_PHARMACY: &str = "약국명";
pub const REQUEST_PHARMACIST: &str = "약사명";
/// Free-text, comma-separated list of requested drugs.
pub const REQUEST_DRUGS: &str = "요청 품절약";

// === Shortage redistribution: output ===

pub const OUT_CENTER: &str = "물류센터";
pub const OUT_PHARMACY: &str = "약국명";
pub const OUT_PHARMACIST: &str = "약사명";

/// Base columns preceding the slot columns, in output order.
pub const BASE_COLUMNS: [&str; 3] = [OUT_CENTER, OUT_PHARMACY, OUT_PHARMACIST];

/// Drug-name column of slot `index` (1-based).
pub fn slot_name_column(index: usize) -> String {
    format!("의약품{index}명")
}

/// Quantity column of slot `index` (1-based).
pub fn slot_quantity_column(index: usize) -> String {
    format!("의약품{index}재고")
}

/// Blank spacer column of slot `index` (1-based).
pub fn slot_blank_column(index: usize) -> String {
    format!("__빈칸{index}__")
}

/// True for slot drug-name columns (`의약품{i}명`).
pub fn is_slot_name_column(name: &str) -> bool {
    name.strip_prefix("의약품")
        .and_then(|rest| rest.strip_suffix('명'))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()))
}

// === Supply reports ===

/// Business registration number of the receiving pharmacy.
pub const SUPPLY_BUSINESS_NUMBER: &str = "공급받은자사업자번호";
/// Healthcare institution code of the receiving pharmacy.
pub const SUPPLY_INSTITUTION_CODE: &str = "공급받는자요양기관코드";
/// Serial number used for ordering.
pub const SUPPLY_SERIAL: &str = "연번";
/// Supply kind: "1" shipment, "2" return.
pub const SUPPLY_KIND: &str = "공급구분";
/// Pharmacy name as stored in the registry.
pub const REGISTRY_PHARMACY: &str = "약국명";

/// Spelling variants seen in pasted supply data, mapped to canonical labels.
pub const SUPPLY_COLUMN_ALIASES: [(&str, &str); 4] = [
    ("곱급받은자사업자번호", SUPPLY_BUSINESS_NUMBER),
    ("공급받은자 사업자번호", SUPPLY_BUSINESS_NUMBER),
    ("곱급받은자요양기관코드", SUPPLY_INSTITUTION_CODE),
    ("공급받는자 요양기관코드", SUPPLY_INSTITUTION_CODE),
];

/// Header of the registry flat file.
pub const REGISTRY_HEADER: [&str; 3] = [
    SUPPLY_BUSINESS_NUMBER,
    SUPPLY_INSTITUTION_CODE,
    REGISTRY_PHARMACY,
];

/// Worksheet name used by the supply report templates.
pub const REPORT_SHEET: &str = "보고서식";
