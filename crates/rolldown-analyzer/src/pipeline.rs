//! End-to-end analysis: metadata + event log in, [`RolldownData`] out.

use rustc_hash::FxHashMap as HashMap;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::chunks::finalize_chunks;
use crate::data::{AssetInfo, ChunkInfo, PluginBuildMetrics, RolldownData};
use crate::error::{Error, Result};
use crate::event::ChunkId;
use crate::meta::Meta;
use crate::packages::{FsManifestReader, ManifestReader, classify_packages};
use crate::reducer::{EventReducer, ReducedBuild};

/// Inputs of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct GenerateDataOptions {
    /// Newline-delimited JSON event log.
    pub logs_path: PathBuf,
    /// Build metadata written alongside the log.
    pub meta_path: PathBuf,
    /// Fail instead of tolerating integrity problems in the log.
    pub strict: bool,
}

impl GenerateDataOptions {
    pub fn new(logs_path: impl Into<PathBuf>, meta_path: impl Into<PathBuf>) -> Self {
        Self {
            logs_path: logs_path.into(),
            meta_path: meta_path.into(),
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Run the analysis, reading package versions from disk.
pub fn generate_data(options: &GenerateDataOptions) -> Result<RolldownData> {
    generate_data_with(options, &FsManifestReader)
}

/// Run the analysis with a custom package manifest source.
pub fn generate_data_with(
    options: &GenerateDataOptions,
    manifests: &dyn ManifestReader,
) -> Result<RolldownData> {
    // Both inputs are checked before any aggregation starts.
    let meta = Meta::from_path(&options.meta_path)?;
    let file = File::open(&options.logs_path).map_err(|source| Error::LogUnreadable {
        path: options.logs_path.clone(),
        source,
    })?;

    let mut reducer = EventReducer::new();
    reducer
        .ingest_reader(BufReader::new(file))
        .map_err(|source| Error::LogUnreadable {
            path: options.logs_path.clone(),
            source,
        })?;
    let build = reducer.finish();

    let stats = &build.stats;
    tracing::debug!(
        lines = stats.lines,
        events = stats.events,
        malformed = stats.malformed_lines,
        orphaned_ends = stats.orphaned_ends,
        missing_module_ids = stats.missing_module_ids,
        unknown_asset_chunks = stats.unknown_asset_chunks,
        dangling_chunk_imports = stats.dangling_chunk_imports,
        "event log reduced"
    );

    if options.strict {
        let issues = stats.integrity_issues();
        if !issues.is_empty() {
            return Err(Error::Integrity(issues.join(", ")));
        }
    }

    Ok(assemble(meta, build, manifests))
}

/// Finalize reduced tables into the output document.
pub fn assemble(meta: Meta, build: ReducedBuild, manifests: &dyn ManifestReader) -> RolldownData {
    let chunks = finalize_chunks(build.chunks, &build.chunk_assets);

    let chunks_by_id: HashMap<&ChunkId, &ChunkInfo> =
        chunks.iter().map(|c| (&c.chunk_id, c)).collect();
    let assets = build
        .assets
        .into_iter()
        .map(|entry| AssetInfo {
            chunk: entry
                .linked_chunk
                .as_ref()
                .and_then(|id| chunks_by_id.get(id))
                .map(|c| (*c).clone()),
            asset: entry.asset,
        })
        .collect();

    let packages = classify_packages(&chunks, &build.modules, meta.project_root(), manifests);
    tracing::debug!(
        modules = build.modules.len(),
        chunks = chunks.len(),
        packages = packages.len(),
        "analysis assembled"
    );

    let mut plugin_build_metrics = BTreeMap::new();
    for (plugin_id, plugin) in build.plugin_calls {
        let name = if plugin.plugin_name.is_empty() {
            meta.plugin_name(plugin_id).unwrap_or_default()
        } else {
            plugin.plugin_name
        };
        plugin_build_metrics.insert(
            plugin_id,
            PluginBuildMetrics::new(plugin_id, name, plugin.calls),
        );
    }
    for plugin in meta.plugins() {
        plugin_build_metrics
            .entry(plugin.plugin_id)
            .or_insert_with(|| PluginBuildMetrics::new(plugin.plugin_id, plugin.name, Vec::new()));
    }

    RolldownData {
        build_duration: build.build_end - build.build_start,
        modules: build.modules,
        assets,
        chunks,
        packages,
        plugin_build_metrics,
        meta,
    }
}
