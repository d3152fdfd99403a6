//! Report outputs: xlsx workbooks, the HTML preview and the artifact store.
//!
//! - **template**: header row of the supply report template workbooks
//! - **xlsx**: supply and shortage workbook serialization
//! - **sheet**: Excel-safe, unique worksheet names
//! - **preview**: `<table class="data">` rendering of a frame
//! - **artifacts**: per-submission result handles with expiry and checksums

pub mod artifacts;
pub mod error;
pub mod preview;
pub mod sheet;
pub mod template;
pub mod xlsx;

pub use artifacts::{ArtifactStore, Manifest, StoredFile, Token, file_sha256, sha256_hex};
pub use error::{ReportError, Result};
pub use preview::render_preview;
pub use sheet::{MAX_SHEET_NAME, SheetNamer, sanitize_sheet_name};
pub use template::{TemplateSet, read_template_header};
pub use xlsx::{shortage_output_name, write_shortage_workbook, write_supply_workbook};
