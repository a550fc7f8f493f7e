//! Build metadata written next to the event log (`meta.json`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{Error, Result};
use crate::event::PluginId;

/// Session metadata, passed through to the output document unchanged.
///
/// The document is kept as an opaque JSON value. The pipeline only reads
/// `cwd` and the `plugins` registry through the accessors below, and entries
/// of an unexpected shape are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta {
    raw: Value,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            raw: Value::Object(Map::new()),
        }
    }
}

/// Registry entry for one plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMeta {
    pub plugin_id: PluginId,
    pub name: String,
}

impl Meta {
    /// Read and parse a metadata file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::MetaNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::from_json(raw.trim()).map_err(|source| Error::InvalidMeta {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// A top-level field, as written by the producer.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    /// Project root used to tell direct dependencies from transitive ones.
    ///
    /// `None` when absent, empty, or not a string, since an empty root would
    /// match every path.
    pub fn project_root(&self) -> Option<&str> {
        self.get("cwd")
            .and_then(Value::as_str)
            .filter(|cwd| !cwd.is_empty())
    }

    /// Registry entries that carry a numeric `plugin_id`.
    pub fn plugins(&self) -> impl Iterator<Item = PluginMeta> + '_ {
        self.get("plugins")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let plugin_id = entry.get("plugin_id")?.as_u64()?;
                let name = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Some(PluginMeta { plugin_id, name })
            })
    }

    /// Registry name of a plugin.
    pub fn plugin_name(&self, plugin_id: PluginId) -> Option<String> {
        self.plugins()
            .find(|p| p.plugin_id == plugin_id)
            .map(|p| p.name)
    }
}
