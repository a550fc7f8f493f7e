//! Terminal output: status lines, spinners, and the analysis summary.
//!
//! Everything here writes to stderr so that stdout stays free for piping.
//!
//! # Examples
//!
//! ```no_run
//! use rolldown_analyzer_cli::ui;
//!
//! ui::init_colors();
//!
//! let spinner = ui::Spinner::new("Analyzing build events...");
//! spinner.finish("Analyzed 120 modules");
//!
//! ui::success("Wrote rolldown-data.json");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{build_duration, format_duration, format_size, print_analysis_summary};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
}

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// `owo-colors` and `console` both honour NO_COLOR on their own; this only
/// forces `console`'s stderr colors off when the checks above say so.
pub fn init_colors() {
    if !should_use_color() {
        console::set_colors_enabled_stderr(false);
    }
}
