//! Shortage redistribution records.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// One row of the stock table: what a distribution center holds.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    pub center: String,
    pub drug_name: String,
    pub quantity: CellValue,
}

/// One pharmacy's shortage request as typed into the request table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortageRequest {
    pub center: String,
    pub pharmacy_name: String,
    pub pharmacist_name: String,
    /// Raw drug names in the order the requester typed them.
    pub requested_drugs: Vec<String>,
}

/// One (drug name, quantity, blank) column triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub drug_name: String,
    /// Plain integer string; "0" on a match miss.
    pub quantity: String,
    /// Spacer column, always empty.
    pub blank: String,
}

impl Slot {
    pub fn new(drug_name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            quantity: quantity.into(),
            blank: String::new(),
        }
    }
}

/// A request row with every requested drug resolved against stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedRow {
    pub center: String,
    pub pharmacy_name: String,
    pub pharmacist_name: String,
    /// Slot `i` (1-based) lives at index `i - 1`.
    pub slots: Vec<Slot>,
}

impl ExpandedRow {
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
