//! # rolldown-analyzer
//!
//! Reduces a Rolldown debug event log into one analysis document describing
//! modules, chunks, assets, npm packages, and per-plugin hook timings.
//!
//! ## Overview
//!
//! A build writes two files: `logs.json`, one JSON event per line, and
//! `meta.json`, describing the session. The analysis runs in four stages:
//!
//! ```text
//!   meta.json ──► Meta ─────────────────────────────┐
//!                                                   ▼
//!   logs.json ──► EventReducer ──► finalize_chunks ──► classify_packages ──► RolldownData
//!                 (single pass)    (reachability,      (name, dir, version,
//!                                   chunk names)        direct/transitive)
//! ```
//!
//! The reducer never fails on log content. Malformed lines, orphaned hook
//! ends, and references to unknown chunks are counted in [`ReduceStats`] and
//! otherwise skipped. [`GenerateDataOptions::strict`] turns those counts into
//! an [`Error::Integrity`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rolldown_analyzer::{GenerateDataOptions, generate_data};
//!
//! # fn main() -> rolldown_analyzer::Result<()> {
//! let options = GenerateDataOptions::new(".rolldown/session/logs.json", ".rolldown/session/meta.json");
//! let data = generate_data(&options)?;
//! println!("{} modules in {}ns", data.modules.len(), data.build_duration);
//! std::fs::write("rolldown-data.json", data.to_json()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level pieces are public too: feed lines to an [`EventReducer`]
//! yourself and call [`assemble`] with any [`ManifestReader`].

pub mod chunks;
pub mod data;
pub mod diff;
pub mod error;
pub mod event;
pub mod meta;
pub mod packages;
pub mod pipeline;
pub mod reducer;
pub mod refs;


pub use data::{
    AssetInfo, CallInfo, CallKind, ChunkInfo, LoadMetric, ModuleBuildMetrics, ModuleInfo,
    PackageFile, PackageImporter, PackageInfo, PackageType, PluginBuildMetrics, PluginCall,
    ResolveIdMetric, RolldownData, TransformMetric,
};
pub use error::{Error, Result};
pub use event::{Asset, CallId, Chunk, ChunkId, Event, Key, PluginId, Timestamp};
pub use meta::{Meta, PluginMeta};
pub use packages::{FsManifestReader, ManifestReader, StaticManifests};
pub use pipeline::{GenerateDataOptions, assemble, generate_data, generate_data_with};
pub use reducer::{EventReducer, ReduceStats, ReducedBuild};
