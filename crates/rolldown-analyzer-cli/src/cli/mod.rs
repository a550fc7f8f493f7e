//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `rolldown-analyzer generate` - static devtools page plus its data file
//! - `rolldown-analyzer generate-data` - the data file only

mod commands;

use clap::Parser;
use std::path::PathBuf;

pub use commands::{Command, GenerateArgs, GenerateDataArgs, InputArgs};

/// Rolldown analyzer - turn Rolldown debug logs into devtools data
#[derive(Parser, Debug)]
#[command(
    name = "rolldown-analyzer",
    version,
    about = "Analyze Rolldown debug event logs",
    long_about = "Reduces the logs.json and meta.json written by a Rolldown debug session\n\
                  into a single rolldown-data.json describing modules, chunks, assets,\n\
                  npm packages, and per-plugin hook timings."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a rolldown-analyzer.json config file
    ///
    /// Defaults to rolldown-analyzer.json in the working directory, when present.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Settings shared by every command.
    pub fn context(&self) -> CommandContext {
        CommandContext {
            config_path: self.config.clone(),
            quiet: self.quiet,
        }
    }
}

/// Global options a command needs besides its own arguments.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Explicit `--config` path.
    pub config_path: Option<PathBuf>,
    /// Suppress spinners and the summary.
    pub quiet: bool,
}
