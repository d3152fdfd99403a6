//! Results of the CLI commands, printed by `summary`.

use std::path::PathBuf;

use pharm_core::ShortageStats;
use pharm_model::{SupplyDirection, SupplyKind};
use pharm_report::Token;

/// One generated supply workbook.
#[derive(Debug, Clone)]
pub struct SupplyFileSummary {
    pub file_name: String,
    pub direction: SupplyDirection,
    pub rows: usize,
    /// Header row came from a template workbook.
    pub from_template: bool,
}

#[derive(Debug, Clone)]
pub struct SupplyRun {
    pub kind: SupplyKind,
    pub report_date: String,
    pub files: Vec<SupplyFileSummary>,
    /// `None` when no row had a recognized supply kind code.
    pub token: Option<Token>,
    pub copied_to: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ShortageRun {
    pub stats: ShortageStats,
    pub max_slots: usize,
    /// Row count per center sheet, in sheet order.
    pub centers: Vec<(String, usize)>,
    pub file_name: String,
    pub token: Token,
    pub preview: Option<PathBuf>,
    pub copied_to: Option<PathBuf>,
}
