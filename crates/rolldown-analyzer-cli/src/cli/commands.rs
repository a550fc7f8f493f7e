use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the static devtools page
    ///
    /// Copies the prebuilt frontend from --public-dir into the output
    /// directory and writes rolldown-data.json next to it.
    Generate(GenerateArgs),

    /// Write only the analysis document
    ///
    /// Produces a single JSON file, for tools that bring their own frontend.
    GenerateData(GenerateDataArgs),
}

/// Inputs shared by both commands.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Event log written by the debug session (newline-delimited JSON)
    #[arg(long, value_name = "FILE")]
    pub logs: Option<PathBuf>,

    /// Session metadata written next to the event log
    #[arg(long, value_name = "FILE")]
    pub meta: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Fail when the log has malformed lines or dangling references
    ///
    /// By default the analysis is best-effort: bad lines are skipped and
    /// unknown references are ignored.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for the static page
    #[arg(short = 'o', long, default_value = "dist", value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Directory holding the prebuilt devtools frontend
    #[arg(long, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,
}

/// Arguments for the generate-data command
#[derive(Args, Debug, Clone)]
pub struct GenerateDataArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file for the analysis document
    ///
    /// Parent directories are created as needed.
    #[arg(
        short = 'o',
        long,
        default_value = "rolldown-data.json",
        value_name = "FILE"
    )]
    pub out_file: PathBuf,
}
