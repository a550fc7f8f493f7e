//! Miette diagnostic conversion for CLI errors.

use crate::error::CliError;
use miette::Report;
use rolldown_analyzer::Error as AnalysisError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Analysis(e) => analysis_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert an analysis failure to a Report, with a hint for the fatal input cases.
pub fn analysis_error_to_miette(err: AnalysisError) -> Report {
    match &err {
        AnalysisError::MetaNotFound(_) => miette::miette!(
            help = "Pass --meta pointing at the meta.json written next to the session's logs.json",
            "{}",
            err
        ),
        AnalysisError::InvalidMeta { .. } => miette::miette!(
            help = "meta.json must contain a single JSON object",
            "{}",
            err
        ),
        AnalysisError::LogUnreadable { .. } => miette::miette!(
            help = "Pass --logs pointing at the session's logs.json",
            "{}",
            err
        ),
        AnalysisError::Integrity(_) => miette::miette!(
            help = "Rerun without --strict to analyze the log best-effort",
            "{}",
            err
        ),
        _ => miette::miette!("{}", err),
    }
}
