//! Core transformations for the pharmacy report tool.
//!
//! - **normalize**: whitespace-stripping, case-folding key for drug names
//! - **stock**: stock table reading and the (center, drug) quantity index
//! - **request**: request table reading and per-row slot expansion
//! - **pivot**: the wide shortage table and its per-center grouping
//! - **shortage**: the whole shortage redistribution run
//! - **registry**: the flat-file pharmacy registry
//! - **supply**: 갑지/을지 supply report conversion

pub mod error;
pub mod frame_ops;
pub mod normalize;
pub mod pivot;
pub mod registry;
pub mod request;
pub mod shortage;
pub mod stock;
pub mod supply;

pub use error::{CoreError, Result, TableRole};
pub use normalize::normalize;
pub use pivot::{CenterGroup, ShortageTable, pivot, shortage_columns};
pub use registry::{MergeStats, PharmacyRegistry, RegistryEntry, RegistrySummary};
pub use request::{expand_row, parse_drug_list, read_requests};
pub use shortage::{ShortageOutcome, ShortageStats, run_shortage};
pub use stock::{StockIndex, read_stock};
pub use supply::{SupplyReport, convert_eulji, convert_gapji, report_date};
