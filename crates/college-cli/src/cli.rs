//! CLI argument definitions for the college matcher.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "college-match",
    version,
    about = "Resolve free-text medical college names against the foundation registry",
    long_about = "Resolve free-text medical college names from counselling data against \
                  the foundation college registry.\n\n\
                  Each name goes through exact, normalized, fuzzy and low-confidence \
                  passes and is annotated with the matched college, pass and confidence."
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

    /// Allow query text in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in log lines.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,

    /// Matcher configuration file (TOML). Falls back to $COLLEGE_MATCH_CONFIG.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match every row of a counselling CSV and write an annotated copy.
    Batch(BatchArgs),

    /// Resolve a single college name.
    Resolve(ResolveArgs),

    /// Load a registry file and report what it contains.
    Registry(RegistryArgs),
}

/// Registry and alias sources shared by the matching commands.
#[derive(Args)]
pub struct SourceArgs {
    /// Foundation registry (JSON array or CSV).
    #[arg(long = "registry", value_name = "PATH")]
    pub registry: PathBuf,

    /// Curated alias table (JSON or CSV) applied before matching.
    #[arg(long = "aliases", value_name = "PATH")]
    pub aliases: Option<PathBuf>,
}

#[derive(Parser)]
pub struct BatchArgs {
    /// Counselling CSV with a header row.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Output CSV (default: <INPUT> with a `.matched.csv` suffix).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Header of the column holding the college name.
    #[arg(long = "name-column", default_value = "college_name")]
    pub name_column: String,

    /// Header of the column holding the state.
    #[arg(long = "state-column", default_value = "state")]
    pub state_column: String,

    /// Also write the run summary as JSON.
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Number of most frequent unmatched names to list.
    #[arg(long = "top-unmatched", default_value_t = 20)]
    pub top_unmatched: usize,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Free-text college name.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// State the college is in.
    #[arg(value_name = "STATE")]
    pub state: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Parser)]
pub struct RegistryArgs {
    /// Foundation registry (JSON array or CSV).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// List every skipped row.
    #[arg(long = "show-skipped")]
    pub show_skipped: bool,
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
