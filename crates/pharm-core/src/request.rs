//! Request table reading and per-row slot expansion.

use pharm_ingest::column_values;
use pharm_model::columns::{REQUEST_CENTER, REQUEST_DRUGS, REQUEST_PHARMACIST, REQUEST_PHARMACY};
use pharm_model::{ExpandedRow, ShortageRequest, Slot};
use polars::prelude::DataFrame;
use tracing::warn;

use crate::stock::StockIndex;

/// Placeholder for an absent descriptive field (missing column or empty cell).
pub const MISSING_FIELD: &str = "";

/// Split a free-text drug list on commas, trimming tokens and dropping empty
/// ones. Order and repeats are preserved.
///
/// # Examples
///
/// ```
/// use pharm_core::parse_drug_list;
///
/// assert_eq!(parse_drug_list("DrugX, DrugY,, "), vec!["DrugX", "DrugY"]);
/// assert!(parse_drug_list("   ").is_empty());
/// ```
pub fn parse_drug_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn descriptive_column(df: &DataFrame, name: &str) -> Vec<String> {
    match column_values(df, name) {
        Some(values) => values
            .into_iter()
            .map(|value| {
                value
                    .map(|text| text.trim().to_string())
                    .unwrap_or_else(|| MISSING_FIELD.to_string())
            })
            .collect(),
        None => {
            warn!(column = name, "request table has no such column; using placeholder");
            vec![MISSING_FIELD.to_string(); df.height()]
        }
    }
}

/// Read shortage requests from an ingested request table.
///
/// Never fails: absent columns and empty cells become [`MISSING_FIELD`], and
/// an absent drug-list column yields requests without drugs.
pub fn read_requests(df: &DataFrame) -> Vec<ShortageRequest> {
    let centers = descriptive_column(df, REQUEST_CENTER);
    let pharmacies = descriptive_column(df, REQUEST_PHARMACY);
    let pharmacists = descriptive_column(df, REQUEST_PHARMACIST);
    let drug_lists = descriptive_column(df, REQUEST_DRUGS);

    centers
        .into_iter()
        .zip(pharmacies)
        .zip(pharmacists)
        .zip(drug_lists)
        .map(
            |(((center, pharmacy_name), pharmacist_name), drugs)| ShortageRequest {
                center,
                pharmacy_name,
                pharmacist_name,
                requested_drugs: parse_drug_list(&drugs),
            },
        )
        .collect()
}

/// Resolve every requested drug of one request against stock.
///
/// Slot `i` holds the `i`-th requested drug as typed, with the quantity the
/// request's own center holds (see [`StockIndex::quantity_text`]).
pub fn expand_row(request: &ShortageRequest, index: &StockIndex) -> ExpandedRow {
    let center = request.center.trim();
    let slots = request
        .requested_drugs
        .iter()
        .map(|drug| Slot::new(drug.clone(), index.quantity_text(center, drug)))
        .collect();
    ExpandedRow {
        center: center.to_string(),
        pharmacy_name: request.pharmacy_name.trim().to_string(),
        pharmacist_name: request.pharmacist_name.trim().to_string(),
        slots,
    }
}
