//! rolldown-analyzer - entry point.
//!
//! Parses arguments, sets up logging and colors, and dispatches to a command.

use clap::Parser;
use miette::Result;
use rolldown_analyzer_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let ctx = args.context();
    let result = match args.command {
        cli::Command::Generate(generate_args) => {
            commands::generate_execute(generate_args, &ctx).await
        }
        cli::Command::GenerateData(data_args) => {
            commands::generate_data_execute(data_args, &ctx).await
        }
    };

    // miette prints the diagnostic and main exits non-zero
    result.map_err(error::cli_error_to_miette)
}
