//! CLI argument definitions for `pharm`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pharm_model::SupplyKind;

#[derive(Parser)]
#[command(
    name = "pharm",
    version,
    about = "Pharmacy supply reports and drug-shortage redistribution",
    long_about = "Convert pasted spreadsheet data into report workbooks.\n\n\
                  supply:    갑지/을지 supply reports, split into 출고 and 반품 workbooks\n\
                  shortage:  match shortage requests against center stock\n\
                  registry:  maintain the pharmacy business-number registry\n\
                  artifacts: fetch or clean up stored results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow pharmacy and pharmacist names in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: $PHARM_REPORTS_CONFIG, then ./pharm-reports.toml).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert pasted supply report data into 출고/반품 workbooks.
    Supply(SupplyArgs),

    /// Match shortage requests against stock and build the per-center workbook.
    Shortage(ShortageArgs),

    /// Show or update the pharmacy registry.
    #[command(subcommand)]
    Registry(RegistryCommand),

    /// List, fetch or sweep stored results.
    #[command(subcommand)]
    Artifacts(ArtifactsCommand),
}

#[derive(Args)]
pub struct SupplyArgs {
    /// Report sheet the data was copied from.
    #[arg(value_enum)]
    pub kind: SupplyKindArg,

    /// Pasted text file, or `-` for stdin.
    #[arg(long = "input", value_name = "PATH", default_value = "-")]
    pub input: PathBuf,

    /// Also copy the generated workbooks into this directory.
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShortageArgs {
    /// Stock table: pasted text file, spreadsheet, or `-` for stdin.
    #[arg(long = "stock", value_name = "PATH")]
    pub stock: PathBuf,

    /// Request table: pasted text file, spreadsheet, or `-` for stdin.
    #[arg(long = "requests", value_name = "PATH")]
    pub requests: PathBuf,

    /// Write the HTML preview of the whole table to this file.
    #[arg(long = "preview", value_name = "HTML")]
    pub preview: Option<PathBuf>,

    /// Also copy the generated workbook into this directory.
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum RegistryCommand {
    /// Show the number of registered pharmacies and the latest entry.
    Show,

    /// Add pasted rows (pharmacy name, business number, institution code).
    Update {
        /// Tab-separated text file, or `-` for stdin.
        #[arg(long = "input", value_name = "PATH", default_value = "-")]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ArtifactsCommand {
    /// List submissions that have not expired.
    List,

    /// Copy a stored file out of the store after verifying its checksum.
    Fetch {
        token: String,
        name: String,
        /// Destination directory (default: working directory).
        #[arg(long = "dest", value_name = "DIR")]
        dest: Option<PathBuf>,
    },

    /// Delete expired submissions.
    Sweep,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SupplyKindArg {
    /// 갑지 (summary sheet).
    Gapji,
    /// 을지 (detail sheet).
    Eulji,
}

impl From<SupplyKindArg> for SupplyKind {
    fn from(value: SupplyKindArg) -> Self {
        match value {
            SupplyKindArg::Gapji => SupplyKind::Gapji,
            SupplyKindArg::Eulji => SupplyKind::Eulji,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
