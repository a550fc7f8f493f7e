//! Formatting utilities for sizes, durations, and the analysis summary.

use console::Term;
use owo_colors::OwoColorize;
use rolldown_analyzer::RolldownData;
use std::time::Duration;

/// Number of plugins listed in the summary.
const TOP_PLUGINS: usize = 5;

/// Format file size in human-readable format.
///
/// # Examples
///
/// ```
/// use rolldown_analyzer_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rolldown_analyzer_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

/// Build duration from a log measured in nanoseconds.
///
/// `None` when the log had no usable `BuildStart`/`BuildEnd` pair.
pub fn build_duration(nanos: i64) -> Option<Duration> {
    u64::try_from(nanos).ok().map(Duration::from_nanos)
}

/// Print counts and the slowest plugins to stderr.
pub fn print_analysis_summary(data: &RolldownData) {
    let term = Term::stderr();
    let width = term.size().1 as usize;

    eprintln!("\n{}", "Analysis Summary".bold().underline());
    eprintln!("{}", "─".repeat(width.min(80)));

    let initial = data.chunks.iter().filter(|c| c.is_initial).count();
    let duplicated = data.packages.iter().filter(|p| p.duplicated).count();
    let build = build_duration(data.build_duration)
        .map(format_duration)
        .unwrap_or_else(|| "unknown".to_string());

    eprintln!("  {:<12} {}", "Build", build.cyan());
    eprintln!("  {:<12} {}", "Modules", data.modules.len());
    eprintln!(
        "  {:<12} {} ({} initial)",
        "Chunks",
        data.chunks.len(),
        initial
    );
    eprintln!("  {:<12} {}", "Assets", data.assets.len());
    eprintln!(
        "  {:<12} {} ({} duplicated)",
        "Packages",
        data.packages.len(),
        duplicated
    );

    let mut plugins: Vec<_> = data
        .plugin_build_metrics
        .values()
        .filter(|p| !p.calls.is_empty())
        .map(|p| (p.plugin_name.as_str(), p.calls.len(), p.total_duration()))
        .collect();
    plugins.sort_by(|a, b| b.2.cmp(&a.2));

    if !plugins.is_empty() {
        eprintln!("\n  {}", "Slowest plugins".bold());
        for (name, calls, total) in plugins.into_iter().take(TOP_PLUGINS) {
            let total = build_duration(total)
                .map(format_duration)
                .unwrap_or_else(|| "-".to_string());
            eprintln!(
                "  {:<40} {:>10} {:>8} calls",
                name,
                total.dimmed(),
                calls
            );
        }
    }

    eprintln!("{}", "─".repeat(width.min(80)));
}
