//! Library side of the `pharm` command-line tool.

pub mod config;
pub mod input;
pub mod logging;
