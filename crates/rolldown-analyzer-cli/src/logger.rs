//! Logging setup for the CLI.
//!
//! The library only emits `tracing` events; this module installs the
//! subscriber that prints them.
//!
//! # Example
//!
//! ```rust,no_run
//! use rolldown_analyzer_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Analyzing build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "rolldown_analyzer=debug,rolldown_analyzer_cli=debug";
const QUIET_FILTER: &str = "rolldown_analyzer=error,rolldown_analyzer_cli=error";
const DEFAULT_FILTER: &str = "rolldown_analyzer=info,rolldown_analyzer_cli=info";

/// Initialize the tracing subscriber with the specified options.
///
/// Call once, before any logging occurs.
///
/// The level is chosen in this order:
/// 1. `--verbose`: DEBUG for the analyzer crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG`, when set
/// 4. INFO for the analyzer crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    init_logger_with_filter(filter, no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    // `try_init` so a second call (tests, embedding) is a no-op.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
