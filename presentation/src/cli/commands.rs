//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;
use witness_domain::OutputFormat;

/// CLI arguments for witness-quorum
#[derive(Parser, Debug)]
#[command(name = "witness-quorum")]
#[command(author, version, about = "Oracle request resolution - independent witnesses reach a quorum")]
#[command(long_about = r#"
witness-quorum resolves a data request against a set of independent witnesses.

Each round has four steps:
1. Retrieval:   every witness fetches the request's sources
2. Aggregation: every witness reduces its own retrievals to one report
3. Collection:  reports are gathered until the collection barrier closes
4. Tally:       the reports are reduced to one value and checked against the quorum

Configuration files are loaded from (in priority order):
1. WITNESS_* environment variables
2. --config <path>     Explicit config file
3. ./witness.toml      Project-level config
4. ~/.config/witness-quorum/config.toml   Global config

Example:
  witness-quorum
  witness-quorum demos/rng.json --output full
  witness-quorum price.toml --witnesses 12 --window-ms 5000
  witness-quorum demos/rng.json --validate
"#)]
pub struct Cli {
    /// Request file (.json or .toml); the built-in randomness request when omitted
    pub request_file: Option<PathBuf>,

    /// Output format (full, summary, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Number of simulated witnesses
    #[arg(short, long, value_name = "N")]
    pub witnesses: Option<usize>,

    /// Collection window in milliseconds
    #[arg(long, value_name = "MS")]
    pub window_ms: Option<u64>,

    /// Only validate the request and print its content hash
    #[arg(long)]
    pub validate: bool,

    /// Append round audit events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub audit_log: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
