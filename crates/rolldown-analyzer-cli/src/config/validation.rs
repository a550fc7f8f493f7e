use crate::config::AnalyzerConfig;
use crate::error::{CliError, ConfigError, Result};
use rolldown_analyzer::GenerateDataOptions;
use std::path::{Path, PathBuf};

/// Which command the configuration is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `generate`: needs the frontend directory as well.
    Generate,
    /// `generate-data`
    GenerateData,
}

fn require_file(field: &str, flag: &str, value: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    let path = value.ok_or_else(|| ConfigError::MissingField {
        field: field.to_string(),
        hint: format!("Pass {flag} <path> or set \"{field}\" in rolldown-analyzer.json"),
    })?;
    let path = crate::commands::utils::resolve_path(path, cwd);
    if !path.exists() {
        return Err(CliError::FileNotFound(path));
    }
    Ok(path)
}

impl AnalyzerConfig {
    /// Check the configuration and turn it into analysis options.
    ///
    /// Fails when `logs` or `meta` is unset or missing on disk, and for
    /// `generate` when `publicDir` is unset or not a directory.
    pub fn validate(&self, mode: Mode, cwd: &Path) -> Result<GenerateDataOptions> {
        let logs_path = require_file("logs", "--logs", self.logs.as_deref(), cwd)?;
        let meta_path = require_file("meta", "--meta", self.meta.as_deref(), cwd)?;

        if mode == Mode::Generate {
            self.public_dir(cwd)?;
        }

        Ok(GenerateDataOptions::new(logs_path, meta_path).strict(self.strict))
    }

    /// Resolved frontend directory.
    pub fn public_dir(&self, cwd: &Path) -> Result<PathBuf> {
        let dir = self
            .public_dir
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "publicDir".to_string(),
                hint: "Pass --public-dir <dir> pointing at the prebuilt devtools frontend"
                    .to_string(),
            })?;
        let dir = crate::commands::utils::resolve_path(dir, cwd);
        if !dir.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "publicDir".to_string(),
                value: dir.display().to_string(),
                hint: "Must be an existing directory".to_string(),
            }
            .into());
        }
        Ok(dir)
    }
}
