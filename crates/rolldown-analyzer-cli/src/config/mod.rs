//! Layered configuration.
//!
//! Sources, lowest priority first: defaults, `rolldown-analyzer.json` (or the
//! file passed with `--config`), `ROLLDOWN_ANALYZER_*` environment variables,
//! command-line flags.

mod conversions;
mod loading;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use conversions::ConfigOverrides;
pub use loading::{CONFIG_FILE_NAME, ENV_PREFIX};
pub use validation::Mode;

/// Analyzer configuration, loaded from rolldown-analyzer.json, env, and flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Event log written by the debug session (e.g. ".rolldown/<session>/logs.json")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<PathBuf>,

    /// Session metadata (e.g. ".rolldown/<session>/meta.json")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PathBuf>,

    /// Prebuilt devtools frontend copied by `generate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[serde(default)]
    pub pretty: bool,

    /// Fail on integrity problems in the event log
    #[serde(default)]
    pub strict: bool,
}

impl AnalyzerConfig {
    /// Generate JSON Schema for rolldown-analyzer.json.
    pub fn json_schema() -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(schemars::schema_for!(AnalyzerConfig))
    }

    /// Generate example rolldown-analyzer.json content.
    pub fn example_config() -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self {
            logs: Some(PathBuf::from(".rolldown/session/logs.json")),
            meta: Some(PathBuf::from(".rolldown/session/meta.json")),
            public_dir: Some(PathBuf::from("node_modules/@rolldown/debug-ui/dist")),
            pretty: false,
            strict: false,
        })
    }
}
