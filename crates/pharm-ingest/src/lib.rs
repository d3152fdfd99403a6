//! Table ingestion for the pharmacy report pipelines.
//!
//! Both input channels of the original web form end up here:
//!
//! - **Pasted text**: tab-separated rows copied out of another spreadsheet,
//!   optionally preceded by preamble lines and with or without a header row
//! - **Uploads**: the first worksheet of an xlsx/xlsm/xls/ods workbook
//!
//! Either way the result is a Polars [`DataFrame`](polars::prelude::DataFrame)
//! whose columns are all nullable strings. Type coercion happens later and
//! explicitly, through [`pharm_model::CellValue`].
//!
//! # Example
//!
//! ```ignore
//! use pharm_ingest::{DelimitedOptions, read_delimited};
//!
//! let text = "센터\t약품명\t재고\nC1\tDrugX\t10\n";
//! let df = read_delimited(text, &DelimitedOptions::default())?;
//! assert_eq!(df.height(), 1);
//! ```

mod delimited;
mod error;
mod frame;
mod polars_utils;
mod source;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use delimited::{DelimitedOptions, read_delimited};
pub use source::TableSource;
pub use workbook::{read_workbook, read_workbook_bytes};

// === Frame helpers ===
pub use frame::{frame_from_rows, headerless_column_name};
pub use polars_utils::{any_to_string, column_text, column_values, has_column};
