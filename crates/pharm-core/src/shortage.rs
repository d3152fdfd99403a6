//! One shortage redistribution run: stock + requests in, grouped table out.

use std::time::Instant;

use pharm_model::ExpandedRow;
use polars::prelude::DataFrame;
use tracing::{info, info_span, trace};

use crate::error::Result;
use crate::pivot::{CenterGroup, ShortageTable, pivot};
use crate::request::{expand_row, read_requests};
use crate::stock::{StockIndex, read_stock};

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortageStats {
    pub stock_records: usize,
    pub requests: usize,
    pub requested_drugs: usize,
    /// Requested drugs with a stock record at the requester's center.
    pub matched: usize,
    pub centers: usize,
}

impl ShortageStats {
    pub fn misses(&self) -> usize {
        self.requested_drugs - self.matched
    }
}

/// Everything one submission produces.
#[derive(Debug, Clone)]
pub struct ShortageOutcome {
    pub rows: Vec<ExpandedRow>,
    pub table: ShortageTable,
    pub groups: Vec<CenterGroup>,
    pub stats: ShortageStats,
}

/// Match every request against stock and build the grouped wide table.
///
/// Fails only when the stock table lacks a key column; every other gap
/// degrades to placeholders or "0" quantities.
pub fn run_shortage(stock: &DataFrame, requests: &DataFrame) -> Result<ShortageOutcome> {
    let span = info_span!("shortage", stock_rows = stock.height(), request_rows = requests.height());
    let _guard = span.enter();
    let start = Instant::now();

    let records = read_stock(stock)?;
    let index = StockIndex::build(&records);
    let requests = read_requests(requests);

    let mut matched = 0usize;
    let mut requested_drugs = 0usize;
    let mut rows = Vec::with_capacity(requests.len());
    for request in &requests {
        let row = expand_row(request, &index);
        requested_drugs += row.slot_count();
        matched += request
            .requested_drugs
            .iter()
            .filter(|drug| index.lookup(&row.center, drug).is_some())
            .count();
        trace!(center = %row.center, slots = row.slot_count(), "expanded request");
        rows.push(row);
    }

    let table = pivot(&rows)?;
    let groups = table.group_by_center()?;
    let stats = ShortageStats {
        stock_records: index.record_count(),
        requests: requests.len(),
        requested_drugs,
        matched,
        centers: groups.len(),
    };
    info!(
        stock_records = stats.stock_records,
        requests = stats.requests,
        requested_drugs = stats.requested_drugs,
        matched = stats.matched,
        centers = stats.centers,
        max_slots = table.max_slots(),
        duration_ms = start.elapsed().as_millis(),
        "shortage matching complete"
    );

    Ok(ShortageOutcome {
        rows,
        table,
        groups,
        stats,
    })
}
