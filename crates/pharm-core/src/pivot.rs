//! The wide shortage table and its per-center grouping.
//!
//! Every row gets the same schema: three base columns followed by one
//! (name, quantity, blank) triple per slot up to the longest request in the
//! batch. Shorter rows hold nulls in the trailing triples, which keeps
//! "requested but out of stock" ("0") distinguishable from "not requested".

use std::collections::BTreeMap;

use pharm_ingest::column_values;
use pharm_model::ExpandedRow;
use pharm_model::columns::{
    BASE_COLUMNS, OUT_CENTER, is_slot_name_column, slot_blank_column, slot_name_column,
    slot_quantity_column,
};
use polars::prelude::{AnyValue, Column, DataFrame, IntoColumn, NamedFrom, Series};
use tracing::debug;

use crate::error::Result;
use crate::frame_ops::take_rows;

/// Full column list for a table whose longest request has `max_slots` drugs.
pub fn shortage_columns(max_slots: usize) -> Vec<String> {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(ToString::to_string).collect();
    for idx in 1..=max_slots {
        columns.push(slot_name_column(idx));
        columns.push(slot_quantity_column(idx));
        columns.push(slot_blank_column(idx));
    }
    columns
}

/// All expanded rows of one submission in a single wide frame.
#[derive(Debug, Clone)]
pub struct ShortageTable {
    frame: DataFrame,
    max_slots: usize,
}

/// Rows of one distribution center, ranked for the center's sheet.
#[derive(Debug, Clone)]
pub struct CenterGroup {
    pub center: String,
    pub frame: DataFrame,
}

/// Assemble expanded rows into the wide table.
pub fn pivot(rows: &[ExpandedRow]) -> Result<ShortageTable> {
    let max_slots = rows.iter().map(ExpandedRow::slot_count).max().unwrap_or(0);
    let names = shortage_columns(max_slots);

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for row in rows {
        values[0].push(Some(row.center.clone()));
        values[1].push(Some(row.pharmacy_name.clone()));
        values[2].push(Some(row.pharmacist_name.clone()));
        for slot_idx in 0..max_slots {
            let base = BASE_COLUMNS.len() + slot_idx * 3;
            match row.slots.get(slot_idx) {
                Some(slot) => {
                    values[base].push(Some(slot.drug_name.clone()));
                    values[base + 1].push(Some(slot.quantity.clone()));
                    values[base + 2].push(Some(slot.blank.clone()));
                }
                None => {
                    values[base].push(None);
                    values[base + 1].push(None);
                    values[base + 2].push(None);
                }
            }
        }
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(values)
        .map(|(name, column)| Series::new(name.as_str().into(), column).into_column())
        .collect();
    let frame = DataFrame::new(columns)?;
    debug!(rows = frame.height(), max_slots, "pivoted shortage table");
    Ok(ShortageTable { frame, max_slots })
}

impl ShortageTable {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Longest request list in the batch.
    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Number of requested drugs per row: non-null slot-name cells.
    pub fn request_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.frame.height()];
        for column in self.frame.get_columns() {
            if !is_slot_name_column(column.name().as_str()) {
                continue;
            }
            for (idx, count) in counts.iter_mut().enumerate() {
                if !matches!(column.get(idx).unwrap_or(AnyValue::Null), AnyValue::Null) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Split the table by center, centers in ascending order.
    ///
    /// Within a center, rows are ordered by request count, most drugs first;
    /// equal counts keep their table order.
    pub fn group_by_center(&self) -> Result<Vec<CenterGroup>> {
        let centers = column_values(&self.frame, OUT_CENTER).unwrap_or_default();
        let counts = self.request_counts();

        let mut buckets: BTreeMap<String, Vec<(usize, usize)>> = BTreeMap::new();
        for (idx, center) in centers.into_iter().enumerate() {
            let Some(center) = center else {
                continue;
            };
            buckets.entry(center).or_default().push((counts[idx], idx));
        }

        let mut groups = Vec::with_capacity(buckets.len());
        for (center, mut members) in buckets {
            members.sort_by(|a, b| b.0.cmp(&a.0));
            let indices: Vec<usize> = members.into_iter().map(|(_, idx)| idx).collect();
            let frame = take_rows(&self.frame, &indices)?;
            groups.push(CenterGroup { center, frame });
        }
        Ok(groups)
    }
}
