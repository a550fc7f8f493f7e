//! The analysis document handed to the presentation layer.
//!
//! Field names and nesting here are the compatibility surface with the
//! devtools frontend, which is why a few keys are camelCase while most are
//! snake_case.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::event::{Asset, ChunkId, ChunkImport, ModuleImport, PluginId, Timestamp};
use crate::meta::Meta;

/// Complete result of one analysis run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RolldownData {
    pub meta: Meta,
    /// Sorted by module id.
    pub modules: Vec<ModuleInfo>,
    /// `BuildEnd` minus `BuildStart`, in the log's timestamp unit.
    ///
    /// Meaningless (possibly negative) when the log has no `BuildEnd`.
    pub build_duration: i64,
    pub assets: Vec<AssetInfo>,
    pub chunks: Vec<ChunkInfo>,
    pub packages: Vec<PackageInfo>,
    pub plugin_build_metrics: BTreeMap<PluginId, PluginBuildMetrics>,
}

impl RolldownData {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub id: String,
    pub is_external: bool,
    pub imports: Vec<ModuleImport>,
    pub importers: Vec<String>,
    pub build_metrics: ModuleBuildMetrics,
}

/// Hook calls observed for one module, in log order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleBuildMetrics {
    pub resolve_ids: Vec<ResolveIdMetric>,
    pub loads: Vec<LoadMetric>,
    pub transforms: Vec<TransformMetric>,
}

impl ModuleBuildMetrics {
    /// Output size of the last transform applied to the module.
    pub fn last_transformed_size(&self) -> u64 {
        self.transforms
            .last()
            .map_or(0, |t| t.transformed_code_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Resolve,
    Load,
    Transform,
}

/// Timing shared by every recorded hook call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallInfo {
    /// Synthetic `<timestamp>#<n>` id of the end event.
    pub id: String,
    pub timestamp_start: Timestamp,
    pub timestamp_end: Timestamp,
    pub duration: i64,
    pub plugin_id: PluginId,
    pub plugin_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveIdMetric {
    #[serde(flatten)]
    pub call: CallInfo,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub importer: Option<String>,
    pub module_request: Option<String>,
    pub import_kind: Option<String>,
    pub resolved_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadMetric {
    #[serde(flatten)]
    pub call: CallInfo,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformMetric {
    #[serde(flatten)]
    pub call: CallInfo,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub content_from: Option<String>,
    pub content_to: Option<String>,
    pub diff_added: u64,
    pub diff_removed: u64,
    pub source_code_size: u64,
    pub transformed_code_size: u64,
}

/// Compact per-plugin record of one hook call, without module content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PluginCall {
    Resolve {
        #[serde(flatten)]
        call: CallInfo,
        module: Option<String>,
    },
    Load {
        #[serde(flatten)]
        call: CallInfo,
        module: String,
        unchanged: bool,
    },
    Transform {
        #[serde(flatten)]
        call: CallInfo,
        module: String,
        unchanged: bool,
    },
}

impl PluginCall {
    pub fn kind(&self) -> CallKind {
        match self {
            PluginCall::Resolve { .. } => CallKind::Resolve,
            PluginCall::Load { .. } => CallKind::Load,
            PluginCall::Transform { .. } => CallKind::Transform,
        }
    }

    pub fn call(&self) -> &CallInfo {
        match self {
            PluginCall::Resolve { call, .. }
            | PluginCall::Load { call, .. }
            | PluginCall::Transform { call, .. } => call,
        }
    }
}

/// Calls attributed to one plugin, plus the same list split by hook.
#[derive(Debug, Clone, Serialize)]
pub struct PluginBuildMetrics {
    pub plugin_id: PluginId,
    pub plugin_name: String,
    pub calls: Vec<PluginCall>,
    #[serde(rename = "resolveIdMetrics")]
    pub resolve_id_metrics: Vec<PluginCall>,
    #[serde(rename = "loadMetrics")]
    pub load_metrics: Vec<PluginCall>,
    #[serde(rename = "transformMetrics")]
    pub transform_metrics: Vec<PluginCall>,
}

impl PluginBuildMetrics {
    pub fn new(plugin_id: PluginId, plugin_name: String, calls: Vec<PluginCall>) -> Self {
        let of_kind = |kind: CallKind| -> Vec<PluginCall> {
            calls.iter().filter(|c| c.kind() == kind).cloned().collect()
        };
        Self {
            plugin_id,
            plugin_name,
            resolve_id_metrics: of_kind(CallKind::Resolve),
            load_metrics: of_kind(CallKind::Load),
            transform_metrics: of_kind(CallKind::Transform),
            calls,
        }
    }

    /// Sum of call durations, for cost attribution.
    pub fn total_duration(&self) -> i64 {
        self.calls.iter().map(|c| c.call().duration).sum()
    }
}

/// A chunk with its derived fields filled in.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkInfo {
    pub chunk_id: ChunkId,
    /// Explicit name, or one generated from the chunk's modules.
    pub name: String,
    pub modules: Vec<String>,
    pub is_user_defined_entry: bool,
    pub imports: Vec<ChunkImport>,
    pub is_initial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetInfo {
    #[serde(flatten)]
    pub asset: Asset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<ChunkInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Direct,
    Transitive,
}

/// Files of one installed npm package at one install location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub name: String,
    /// Empty when the package manifest could not be read.
    pub version: String,
    pub dir: String,
    #[serde(rename = "type")]
    pub kind: PackageType,
    pub transformed_code_size: u64,
    pub files: Vec<PackageFile>,
    pub duplicated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFile {
    pub path: String,
    pub transformed_code_size: u64,
    pub importers: Vec<PackageImporter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageImporter {
    pub path: String,
    pub version: String,
}
