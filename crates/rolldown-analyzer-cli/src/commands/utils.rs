//! Shared utilities for command implementations.
//!
//! - Path resolution
//! - Running the analysis off the async runtime
//! - Writing the data document and copying the frontend

use crate::error::{CliError, Result, ResultExt};
use crate::ui::{self, Spinner};
use rolldown_analyzer::{GenerateDataOptions, RolldownData};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve a path relative to a working directory.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Current working directory.
pub fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current working directory")
}

/// Create `dir` (and its parents) if needed.
///
/// Fails when the path exists but is not a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            dir.display()
        )));
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Copy every file under `src` into `dst`, keeping the relative layout.
///
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| CliError::Custom(e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target).with_path(entry.path())?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Run the analysis on a blocking thread, with a spinner unless `quiet`.
pub async fn run_analysis(options: GenerateDataOptions, quiet: bool) -> Result<RolldownData> {
    let spinner = if quiet || ui::is_ci() {
        Spinner::hidden()
    } else {
        Spinner::new(&format!("Analyzing {}...", options.logs_path.display()))
    };

    let result = tokio::task::spawn_blocking(move || rolldown_analyzer::generate_data(&options))
        .await?;

    match result {
        Ok(data) => {
            spinner.finish(&format!(
                "Analyzed {} modules in {} chunks",
                data.modules.len(),
                data.chunks.len()
            ));
            if data.build_duration < 0 {
                tracing::warn!("BuildEnd precedes BuildStart; build duration is negative");
            }
            Ok(data)
        }
        Err(e) => {
            spinner.fail("Analysis failed");
            Err(e.into())
        }
    }
}

/// Serialize the document and write it to `path`, creating parent directories.
///
/// Returns the number of bytes written.
pub async fn write_document(data: &RolldownData, path: &Path, pretty: bool) -> Result<u64> {
    let json = if pretty {
        data.to_pretty_json()?
    } else {
        data.to_json()?
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json.as_bytes()).await?;
    tracing::debug!("Wrote {} bytes to {}", json.len(), path.display());

    Ok(json.len() as u64)
}
