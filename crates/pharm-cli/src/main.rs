//! `pharm`: pharmacy supply reports and shortage redistribution.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use pharm_cli::config::load_config;
use pharm_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{ArtifactsCommand, Cli, Command, LogFormatArg, LogLevelArg, RegistryCommand};
use crate::commands::{
    run_artifacts_fetch, run_artifacts_list, run_artifacts_sweep, run_registry_show,
    run_registry_update, run_shortage_command, run_supply,
};
use crate::summary::{print_artifacts, print_registry, print_shortage, print_supply};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let loaded = load_config(cli.config.as_deref())?;
    let config = &loaded.config;

    match &cli.command {
        Command::Supply(args) => print_supply(&run_supply(args, config)?),
        Command::Shortage(args) => print_shortage(&run_shortage_command(args, config)?),
        Command::Registry(RegistryCommand::Show) => {
            print_registry(&run_registry_show(config)?, None);
        }
        Command::Registry(RegistryCommand::Update { input }) => {
            let (stats, summary) = run_registry_update(input, config)?;
            print_registry(&summary, Some(&stats));
        }
        Command::Artifacts(ArtifactsCommand::List) => print_artifacts(&run_artifacts_list(config)?),
        Command::Artifacts(ArtifactsCommand::Fetch { token, name, dest }) => {
            let path = run_artifacts_fetch(token, name, dest.as_deref(), config)?;
            println!("Saved: {}", path.display());
        }
        Command::Artifacts(ArtifactsCommand::Sweep) => {
            let removed = run_artifacts_sweep(config)?;
            println!("Removed {removed} expired submission(s).");
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
