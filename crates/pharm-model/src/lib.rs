//! Data model shared by the pharmacy report crates.
//!
//! - **cell**: explicit input-boundary coercion of spreadsheet cells
//! - **columns**: column labels used by the business unit's spreadsheets
//! - **shortage**: stock, request and expanded-row types for shortage redistribution
//! - **supply**: supply report kinds, directions and output naming

pub mod cell;
pub mod columns;
pub mod shortage;
pub mod supply;

pub use cell::{CellValue, format_numeric, parse_f64};
pub use shortage::{ExpandedRow, ShortageRequest, Slot, StockRecord};
pub use supply::{SupplyDirection, SupplyKind, supply_output_name, supply_template_name};
