//! Stock table reading and the per-center quantity index.

use std::collections::BTreeMap;

use pharm_ingest::{column_values, has_column};
use pharm_model::columns::{STOCK_CENTER, STOCK_DRUG_NAME, STOCK_QUANTITY};
use pharm_model::{CellValue, StockRecord};
use polars::prelude::DataFrame;
use tracing::{debug, warn};

use crate::error::{CoreError, Result, TableRole};
use crate::normalize::normalize;

/// Read stock records from an ingested stock table.
///
/// The center and drug-name columns form the match key, so their absence is
/// fatal. A missing quantity column only means nothing can be matched to a
/// non-zero quantity.
pub fn read_stock(df: &DataFrame) -> Result<Vec<StockRecord>> {
    let centers = column_values(df, STOCK_CENTER)
        .ok_or_else(|| CoreError::missing_column(TableRole::Stock, STOCK_CENTER))?;
    let drug_names = column_values(df, STOCK_DRUG_NAME)
        .ok_or_else(|| CoreError::missing_column(TableRole::Stock, STOCK_DRUG_NAME))?;
    let quantities = if has_column(df, STOCK_QUANTITY) {
        column_values(df, STOCK_QUANTITY).unwrap_or_default()
    } else {
        warn!(
            column = STOCK_QUANTITY,
            "stock table has no quantity column; every match resolves to 0"
        );
        vec![None; df.height()]
    };

    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for (idx, (center, drug_name)) in centers.into_iter().zip(drug_names).enumerate() {
        let (Some(center), Some(drug_name)) = (center, drug_name) else {
            skipped += 1;
            continue;
        };
        let quantity = CellValue::coerce(quantities.get(idx).and_then(Option::as_deref));
        records.push(StockRecord {
            center,
            drug_name,
            quantity,
        });
    }
    if skipped > 0 {
        debug!(skipped, "stock rows without center or drug name skipped");
    }
    Ok(records)
}

/// Lookup from (center, normalized drug name) to stock quantities.
///
/// Centers match exactly after trimming; only drug names are normalized.
/// Repeated keys keep every record as a candidate in table order, and the
/// first candidate decides the quantity.
#[derive(Debug, Clone, Default)]
pub struct StockIndex {
    entries: BTreeMap<(String, String), Vec<CellValue>>,
    record_count: usize,
}

impl StockIndex {
    pub fn build(records: &[StockRecord]) -> Self {
        let mut entries: BTreeMap<(String, String), Vec<CellValue>> = BTreeMap::new();
        for record in records {
            let key = (record.center.trim().to_string(), normalize(&record.drug_name));
            entries.entry(key).or_default().push(record.quantity.clone());
        }
        Self {
            entries,
            record_count: records.len(),
        }
    }

    /// All candidate quantities for a center and a raw (unnormalized) drug name.
    pub fn candidates(&self, center: &str, drug_name: &str) -> &[CellValue] {
        let key = (center.trim().to_string(), normalize(drug_name));
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The deciding stock cell, or `None` on a match miss.
    pub fn lookup(&self, center: &str, drug_name: &str) -> Option<&CellValue> {
        self.candidates(center, drug_name).first()
    }

    /// Quantity as a plain integer string: the truncated first candidate, or
    /// "0" when there is no match or the stock cell is not a number.
    pub fn quantity_text(&self, center: &str, drug_name: &str) -> String {
        self.lookup(center, drug_name)
            .and_then(CellValue::quantity_text)
            .unwrap_or_else(|| "0".to_string())
    }

    /// Number of distinct (center, drug) keys.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
