use crate::config::{AnalyzerConfig, ConfigOverrides};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use std::path::Path;

/// Config file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "rolldown-analyzer.json";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ROLLDOWN_ANALYZER_";

impl AnalyzerConfig {
    /// Load configuration from every source.
    ///
    /// Relative paths stay relative; commands resolve them against `cwd`.
    pub fn load(
        overrides: &ConfigOverrides,
        config_path: Option<&Path>,
        cwd: &Path,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = crate::commands::utils::resolve_path(path, cwd);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = cwd.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = config_file {
            tracing::debug!("Loading config from {}", path.display());
            figment = figment.merge(Json::file_exact(path));
        }

        // ROLLDOWN_ANALYZER_LOGS, ROLLDOWN_ANALYZER_PUBLIC_DIR, ...
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .only(&["logs", "meta", "public_dir", "pretty", "strict"])
                .map(|key| match key.as_str() {
                    "public_dir" => "publicDir".into(),
                    _ => key.into(),
                }),
        );

        figment = figment.merge(Serialized::defaults(overrides));

        figment
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()).into())
    }
}
