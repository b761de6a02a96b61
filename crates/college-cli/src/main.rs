//! College matcher CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use college_cli::config::load_matcher_config;
use college_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_batch, run_registry, run_resolve};
use crate::summary::{print_match_summary, print_registry, print_resolution, print_unmatched};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Command::Batch(args) => {
            let config = load_matcher_config(cli.config.as_deref())?;
            let result = run_batch(args, config)?;
            print_match_summary(&result.summary);
            print_unmatched(&result.top_unmatched);
            println!("Output: {}", result.output.display());
            if let Some(path) = &result.summary_json {
                println!("Summary: {}", path.display());
            }
            Ok(0)
        }
        Command::Resolve(args) => {
            let config = load_matcher_config(cli.config.as_deref())?;
            let result = run_resolve(args, config)?;
            print_resolution(&args.name, &args.state, &result);
            Ok(if result.is_matched() { 0 } else { 2 })
        }
        Command::Registry(args) => {
            let outcome = run_registry(args)?;
            print_registry(&outcome, args.show_skipped);
            Ok(0)
        }
    }
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
    config.with_timestamps = cli.log_timestamps;
    config.with_target = cli.log_target;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
