//! Single-pass reduction of the event log into aggregate tables.
//!
//! The reducer is a fold: every parsed event mutates the tables below and
//! nothing is ever revisited. Order matters (a hook end only correlates with
//! a start seen earlier), so the log must be fed in file order.

use indexmap::IndexMap;
use rustc_hash::FxHashMap as HashMap;
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;

use crate::chunks::ChunkTable;
use crate::data::{
    CallInfo, CallKind, LoadMetric, ModuleBuildMetrics, ModuleInfo, PluginCall, ResolveIdMetric,
    TransformMetric,
};
use crate::diff::{content_byte_size, diff_counts};
use crate::event::{
    Asset, AssetsReady, CallId, ChunkGraphReady, ChunkId, Event, HookCall, LoadCallEnd,
    LoadCallStart, ModuleGraphReady, ModuleRecord, PluginId, ResolveIdCallEnd,
    ResolveIdCallStart, Timestamp, TransformCallEnd, TransformCallStart,
};
use crate::refs::StringRefs;

/// Counters describing what the reducer skipped or tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReduceStats {
    /// Non-blank lines read.
    pub lines: u64,
    /// Lines parsed into events.
    pub events: u64,
    /// Lines that were not valid UTF-8 or not a valid event.
    pub malformed_lines: u64,
    /// Hook end events without a matching start.
    pub orphaned_ends: u64,
    /// Hook end events that named no module.
    pub missing_module_ids: u64,
    /// Assets whose chunk was not in the chunk table when they arrived.
    pub unknown_asset_chunks: u64,
    /// Chunk imports pointing at chunks missing from the chunk table.
    pub dangling_chunk_imports: u64,
}

impl ReduceStats {
    /// Human-readable list of integrity problems, empty for a clean log.
    pub fn integrity_issues(&self) -> Vec<String> {
        [
            (self.malformed_lines, "malformed lines"),
            (self.orphaned_ends, "hook end events without a start"),
            (self.unknown_asset_chunks, "assets referencing unknown chunks"),
            (self.dangling_chunk_imports, "chunk imports referencing unknown chunks"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, what)| format!("{count} {what}"))
        .collect()
    }
}

/// A hook start waiting for its end event.
#[derive(Debug, Clone)]
enum PendingCall {
    ResolveId(ResolveIdCallStart),
    Load(LoadCallStart),
    Transform(TransformCallStart),
}

/// Calls attributed to one plugin, in log order.
#[derive(Debug, Clone)]
pub struct PluginCalls {
    pub plugin_name: String,
    pub calls: Vec<PluginCall>,
}

/// An asset plus the chunk it was linked to when `AssetsReady` arrived.
#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub asset: Asset,
    pub linked_chunk: Option<ChunkId>,
}

/// Everything the reducer learned, ready for finalization.
#[derive(Debug)]
pub struct ReducedBuild {
    pub build_start: Timestamp,
    pub build_end: Timestamp,
    /// Sorted by id, metrics attached.
    pub modules: Vec<ModuleInfo>,
    pub chunks: ChunkTable,
    pub assets: Vec<AssetEntry>,
    pub chunk_assets: HashMap<ChunkId, Asset>,
    pub plugin_calls: IndexMap<PluginId, PluginCalls>,
    pub stats: ReduceStats,
}

/// Folds log events into module, chunk, asset, and metric tables.
#[derive(Debug, Default)]
pub struct EventReducer {
    refs: StringRefs,
    pending: HashMap<CallId, PendingCall>,
    module_metrics: HashMap<String, ModuleBuildMetrics>,
    plugin_calls: IndexMap<PluginId, PluginCalls>,
    modules: HashMap<String, ModuleRecord>,
    chunks: ChunkTable,
    assets: IndexMap<String, AssetEntry>,
    chunk_assets: HashMap<ChunkId, Asset>,
    build_start: Timestamp,
    build_end: Timestamp,
    event_index: u64,
    stats: ReduceStats,
}

/// The one field read from events whose action is not modelled.
#[derive(Deserialize)]
struct UntypedEvent {
    #[serde(default)]
    module_id: Option<Value>,
}

impl EventReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &ReduceStats {
        &self.stats
    }

    /// Feed every line of a log source.
    ///
    /// Only a failing reader is an error; bad lines are counted and skipped.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> std::io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                return Ok(());
            }
            match std::str::from_utf8(&buf) {
                Ok(line) => self.ingest_line(line),
                Err(_) => {
                    self.stats.lines += 1;
                    self.stats.malformed_lines += 1;
                    tracing::trace!(line = self.stats.lines, "skipping non UTF-8 log line");
                }
            }
        }
    }

    /// Parse and fold one log line. Blank lines are ignored.
    pub fn ingest_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        self.stats.lines += 1;

        match serde_json::from_str::<Event>(trimmed) {
            Ok(Event::Unknown) => {
                self.handle_event(Event::Unknown);
                // Unconsumed actions still anchor a module when they name one.
                if let Ok(UntypedEvent {
                    module_id: Some(Value::String(module_id)),
                }) = serde_json::from_str(trimmed)
                {
                    self.ensure_module(&module_id);
                }
            }
            Ok(event) => self.handle_event(event),
            Err(err) => {
                self.stats.malformed_lines += 1;
                tracing::trace!(line = self.stats.lines, error = %err, "skipping malformed log line");
            }
        }
    }

    /// Fold one parsed event into the tables.
    pub fn handle_event(&mut self, mut event: Event) {
        let event_id = self.next_event_id(event.timestamp());
        self.stats.events += 1;

        if let Some(module_id) = event.module_id() {
            self.ensure_module(module_id);
        }
        self.resolve_refs(&mut event);

        match event {
            Event::BuildStart(marker) => self.build_start = marker.timestamp,
            Event::BuildEnd(marker) => self.build_end = marker.timestamp,
            Event::StringRef(string_ref) => self.refs.insert(string_ref.id, string_ref.content),
            Event::HookResolveIdCallStart(start) => {
                self.pending
                    .insert(start.call.call_id.clone(), PendingCall::ResolveId(start));
            }
            Event::HookLoadCallStart(start) => {
                self.pending
                    .insert(start.call.call_id.clone(), PendingCall::Load(start));
            }
            Event::HookTransformCallStart(start) => {
                self.pending
                    .insert(start.call.call_id.clone(), PendingCall::Transform(start));
            }
            Event::HookResolveIdCallEnd(end) => self.on_resolve_id_end(end, event_id),
            Event::HookLoadCallEnd(end) => self.on_load_end(end, event_id),
            Event::HookTransformCallEnd(end) => self.on_transform_end(end, event_id),
            Event::ChunkGraphReady(ready) => self.on_chunk_graph_ready(ready),
            Event::ModuleGraphReady(ready) => self.on_module_graph_ready(ready),
            Event::AssetsReady(ready) => self.on_assets_ready(ready),
            Event::Unknown => {}
        }
    }

    /// Hand over the tables, joining module records with their metrics.
    pub fn finish(mut self) -> ReducedBuild {
        let mut modules: Vec<ModuleInfo> = self
            .modules
            .into_values()
            .map(|record| ModuleInfo {
                build_metrics: self.module_metrics.remove(&record.id).unwrap_or_default(),
                id: record.id,
                is_external: record.is_external,
                imports: record.imports,
                importers: record.importers,
            })
            .collect();
        modules.sort_by(|a, b| a.id.cmp(&b.id));

        self.stats.dangling_chunk_imports = crate::chunks::dangling_imports(&self.chunks) as u64;

        ReducedBuild {
            build_start: self.build_start,
            build_end: self.build_end,
            modules,
            chunks: self.chunks,
            assets: self.assets.into_values().collect(),
            chunk_assets: self.chunk_assets,
            plugin_calls: self.plugin_calls,
            stats: self.stats,
        }
    }

    fn next_event_id(&mut self, timestamp: Option<Timestamp>) -> String {
        let index = self.event_index;
        self.event_index += 1;
        match timestamp {
            Some(ts) => format!("{ts}#{index}"),
            None => format!("x#{index}"),
        }
    }

    fn ensure_module(&mut self, module_id: &str) {
        if !self.modules.contains_key(module_id) {
            self.modules.insert(
                module_id.to_string(),
                ModuleRecord {
                    id: module_id.to_string(),
                    is_external: false,
                    imports: Vec::new(),
                    importers: Vec::new(),
                },
            );
        }
    }

    fn resolve_refs(&self, event: &mut Event) {
        match event {
            Event::HookTransformCallStart(start) => self.refs.resolve(&mut start.content),
            Event::HookLoadCallEnd(end) => self.refs.resolve(&mut end.content),
            Event::HookTransformCallEnd(end) => self.refs.resolve(&mut end.content),
            _ => {}
        }
    }

    fn take_pending(&mut self, call_id: &CallId) -> Option<PendingCall> {
        let pending = self.pending.remove(call_id);
        if pending.is_none() {
            self.stats.orphaned_ends += 1;
        }
        pending
    }

    fn call_info(start: &HookCall, end: &HookCall, event_id: String) -> CallInfo {
        CallInfo {
            id: event_id,
            timestamp_start: start.timestamp,
            timestamp_end: end.timestamp,
            duration: end.timestamp - start.timestamp,
            plugin_id: end.plugin_id,
            plugin_name: end.plugin_name.clone(),
        }
    }

    fn module_metrics(&mut self, module_id: &str) -> &mut ModuleBuildMetrics {
        self.module_metrics
            .entry(module_id.to_string())
            .or_default()
    }

    fn push_plugin_call(&mut self, end: &HookCall, call: PluginCall) {
        self.plugin_calls
            .entry(end.plugin_id)
            .or_insert_with(|| PluginCalls {
                plugin_name: end.plugin_name.clone(),
                calls: Vec::new(),
            })
            .calls
            .push(call);
    }

    fn on_resolve_id_end(&mut self, end: ResolveIdCallEnd, event_id: String) {
        let Some(pending) = self.take_pending(&end.call.call_id) else {
            return;
        };
        let PendingCall::ResolveId(start) = pending else {
            self.stats.orphaned_ends += 1;
            return;
        };
        let Some(resolved_id) = end.resolved_id else {
            self.stats.missing_module_ids += 1;
            return;
        };

        let call = Self::call_info(&start.call, &end.call, event_id);
        self.push_plugin_call(
            &end.call,
            PluginCall::Resolve {
                call: call.clone(),
                module: start.module_request.clone(),
            },
        );
        self.module_metrics(&resolved_id)
            .resolve_ids
            .push(ResolveIdMetric {
                call,
                kind: CallKind::Resolve,
                importer: start.importer,
                module_request: start.module_request,
                import_kind: start.import_kind,
                resolved_id: resolved_id.clone(),
            });
    }

    fn on_load_end(&mut self, end: LoadCallEnd, event_id: String) {
        let Some(pending) = self.take_pending(&end.call.call_id) else {
            return;
        };
        let PendingCall::Load(start) = pending else {
            self.stats.orphaned_ends += 1;
            return;
        };
        let Some(module_id) = end.module_id else {
            self.stats.missing_module_ids += 1;
            return;
        };

        let call = Self::call_info(&start.call, &end.call, event_id);
        let unchanged = end.content.as_deref().is_none_or(str::is_empty);
        self.push_plugin_call(
            &end.call,
            PluginCall::Load {
                call: call.clone(),
                module: module_id.clone(),
                unchanged,
            },
        );
        self.module_metrics(&module_id).loads.push(LoadMetric {
            call,
            kind: CallKind::Load,
            content: end.content,
        });
    }

    fn on_transform_end(&mut self, end: TransformCallEnd, event_id: String) {
        let Some(pending) = self.take_pending(&end.call.call_id) else {
            return;
        };
        let PendingCall::Transform(start) = pending else {
            self.stats.orphaned_ends += 1;
            return;
        };
        let Some(module_id) = end.module_id else {
            self.stats.missing_module_ids += 1;
            return;
        };

        let call = Self::call_info(&start.call, &end.call, event_id);
        let content_from = start.content;
        let content_to = end.content;
        let diff = diff_counts(content_from.as_deref(), content_to.as_deref());

        self.push_plugin_call(
            &end.call,
            PluginCall::Transform {
                call: call.clone(),
                module: module_id.clone(),
                unchanged: content_from == content_to,
            },
        );
        self.module_metrics(&module_id)
            .transforms
            .push(TransformMetric {
                call,
                kind: CallKind::Transform,
                diff_added: diff.added,
                diff_removed: diff.removed,
                source_code_size: content_byte_size(content_from.as_deref()),
                transformed_code_size: content_byte_size(content_to.as_deref()),
                content_from,
                content_to,
            });
    }

    fn on_chunk_graph_ready(&mut self, ready: ChunkGraphReady) {
        self.chunks = ready
            .chunks
            .into_iter()
            .map(|chunk| (chunk.chunk_id.clone(), chunk))
            .collect();
        tracing::debug!(chunks = self.chunks.len(), "chunk graph ready");
    }

    fn on_module_graph_ready(&mut self, ready: ModuleGraphReady) {
        // Call ids are not reused once the module graph is final.
        self.pending.clear();

        let count = ready.modules.len();
        for mut module in ready.modules {
            normalize_module_edges(&mut module);
            self.modules.insert(module.id.clone(), module);
        }
        tracing::debug!(modules = count, "module graph ready");
    }

    fn on_assets_ready(&mut self, ready: AssetsReady) {
        for asset in ready.assets {
            let linked_chunk = asset
                .chunk_id
                .clone()
                .filter(|id| self.chunks.contains_key(id));
            if let Some(chunk_id) = &asset.chunk_id {
                if linked_chunk.is_none() {
                    self.stats.unknown_asset_chunks += 1;
                }
                self.chunk_assets.insert(chunk_id.clone(), asset.clone());
            }
            self.assets.insert(
                asset.filename.clone(),
                AssetEntry {
                    asset,
                    linked_chunk,
                },
            );
        }
    }
}

/// Sort importers and imports by module id and drop duplicates.
pub fn normalize_module_edges(module: &mut ModuleRecord) {
    module.importers.sort();
    module.importers.dedup();

    module
        .imports
        .sort_by(|a, b| (&a.module_id, &a.kind).cmp(&(&b.module_id, &b.kind)));
    module
        .imports
        .dedup_by(|a, b| a.module_id == b.module_id && a.kind == b.kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ModuleImport;
    use serde_json::{Map, json};

    fn feed(reducer: &mut EventReducer, events: &[serde_json::Value]) {
        for event in events {
            reducer.ingest_line(&event.to_string());
        }
    }

    fn hook(action: &str, call_id: u64, ts: i64, extra: serde_json::Value) -> serde_json::Value {
        let mut value = json!({
            "action": action,
            "call_id": call_id,
            "plugin_id": 1,
            "plugin_name": "test-plugin",
            "timestamp": ts.to_string(),
        });
        if let (Some(obj), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            obj.extend(extra.clone());
        }
        value
    }

    #[test]
    fn test_build_window() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"BuildStart","timestamp":"100"}),
                json!({"action":"BuildEnd","timestamp":"250"}),
            ],
        );
        let build = reducer.finish();
        assert_eq!(build.build_end - build.build_start, 150);
    }

    #[test]
    fn test_blank_and_malformed_lines_are_skipped() {
        let mut reducer = EventReducer::new();
        reducer.ingest_line("");
        reducer.ingest_line("   \t");
        reducer.ingest_line("{\"action\":\"BuildStart\",\"timestamp\":1}");
        reducer.ingest_line("{\"action\":\"BuildEnd\",\"timest");
        reducer.ingest_line("not json at all");

        let stats = reducer.stats().clone();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.events, 1);
        assert_eq!(stats.malformed_lines, 2);
    }

    #[test]
    fn test_reader_tolerates_invalid_utf8_and_crlf() {
        let mut input = b"{\"action\":\"BuildStart\",\"timestamp\":5}\r\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"{\"action\":\"BuildEnd\",\"timestamp\":9}");

        let mut reducer = EventReducer::new();
        reducer.ingest_reader(input.as_slice()).unwrap();
        assert_eq!(reducer.stats().events, 2);
        assert_eq!(reducer.stats().malformed_lines, 1);

        let build = reducer.finish();
        assert_eq!(build.build_start, 5);
        assert_eq!(build.build_end, 9);
    }

    #[test]
    fn test_transform_pair_produces_metrics() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"StringRef","id":"src1","content":"a\nb\n"}),
                hook("HookTransformCallStart", 1, 10, json!({"module_id":"/m.js","content":"$ref:src1"})),
                hook("HookTransformCallEnd", 1, 25, json!({"module_id":"/m.js","content":"a\nb\nc\n"})),
            ],
        );
        let build = reducer.finish();
        assert_eq!(build.modules.len(), 1);

        let transforms = &build.modules[0].build_metrics.transforms;
        assert_eq!(transforms.len(), 1);
        let t = &transforms[0];
        assert_eq!(t.call.duration, 15);
        assert_eq!(t.call.timestamp_start, 10);
        assert_eq!(t.call.timestamp_end, 25);
        assert_eq!(t.call.id, "25#2");
        assert_eq!(t.content_from.as_deref(), Some("a\nb\n"));
        assert_eq!(t.diff_added, 1);
        assert_eq!(t.diff_removed, 0);
        assert_eq!(t.source_code_size, 4);
        assert_eq!(t.transformed_code_size, 6);

        let plugin = &build.plugin_calls[&1];
        assert_eq!(plugin.plugin_name, "test-plugin");
        assert!(matches!(
            plugin.calls[0],
            PluginCall::Transform { unchanged: false, .. }
        ));
    }

    #[test]
    fn test_unchanged_transform_and_empty_load() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                hook("HookLoadCallStart", 1, 0, json!({"module_id":"/m.js"})),
                hook("HookLoadCallEnd", 1, 3, json!({"module_id":"/m.js","content":null})),
                hook("HookTransformCallStart", 2, 4, json!({"module_id":"/m.js","content":"x"})),
                hook("HookTransformCallEnd", 2, 6, json!({"module_id":"/m.js","content":"x"})),
            ],
        );
        let build = reducer.finish();
        let calls = &build.plugin_calls[&1].calls;
        assert!(matches!(calls[0], PluginCall::Load { unchanged: true, .. }));
        assert!(matches!(calls[1], PluginCall::Transform { unchanged: true, .. }));

        let t = &build.modules[0].build_metrics.transforms[0];
        assert_eq!((t.diff_added, t.diff_removed), (0, 0));
    }

    #[test]
    fn test_resolve_id_attaches_to_resolved_module() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                hook(
                    "HookResolveIdCallStart",
                    7,
                    1,
                    json!({"module_request":"./dep","importer":"/a.js","import_kind":"import-statement"}),
                ),
                hook("HookResolveIdCallEnd", 7, 4, json!({"resolved_id":"/dep.js"})),
                json!({"action":"ModuleGraphReady","modules":[{"id":"/dep.js","imports":[],"importers":["/a.js"]}]}),
            ],
        );
        let build = reducer.finish();
        let module = build.modules.iter().find(|m| m.id == "/dep.js").unwrap();
        let resolve = &module.build_metrics.resolve_ids[0];
        assert_eq!(resolve.module_request.as_deref(), Some("./dep"));
        assert_eq!(resolve.importer.as_deref(), Some("/a.js"));
        assert_eq!(resolve.resolved_id, "/dep.js");
        assert_eq!(resolve.call.duration, 3);

        assert!(matches!(
            &build.plugin_calls[&1].calls[0],
            PluginCall::Resolve { module: Some(m), .. } if m == "./dep"
        ));
    }

    #[test]
    fn test_orphaned_end_is_dropped() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[hook("HookLoadCallEnd", 99, 3, json!({"module_id":"/m.js","content":"x"}))],
        );
        assert_eq!(reducer.stats().orphaned_ends, 1);

        let build = reducer.finish();
        assert!(build.plugin_calls.is_empty());
        // The stub still exists, with no metrics.
        assert_eq!(build.modules.len(), 1);
        assert!(build.modules[0].build_metrics.loads.is_empty());
    }

    #[test]
    fn test_end_without_module_id_is_skipped() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                hook("HookResolveIdCallStart", 1, 0, json!({"module_request":"x"})),
                hook("HookResolveIdCallEnd", 1, 1, json!({"resolved_id":null})),
            ],
        );
        assert_eq!(reducer.stats().missing_module_ids, 1);
        assert!(reducer.finish().plugin_calls.is_empty());
    }

    #[test]
    fn test_unmodelled_action_with_module_id_creates_stub() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"HookRenderChunkStart","timestamp":"1","module_id":"/p/x.js"}),
                json!({"action":"HookRenderChunkStart","timestamp":"2","module_id":7}),
                json!({"action":"HookRenderChunkEnd","timestamp":"3"}),
            ],
        );
        assert_eq!(reducer.stats().events, 3);
        assert_eq!(reducer.stats().malformed_lines, 0);

        let build = reducer.finish();
        assert_eq!(build.modules.len(), 1);
        assert_eq!(build.modules[0].id, "/p/x.js");
        assert!(build.modules[0].imports.is_empty());
    }

    #[test]
    fn test_mismatched_hook_kinds_do_not_correlate() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                hook("HookLoadCallStart", 1, 0, json!({"module_id":"/m.js"})),
                hook("HookTransformCallEnd", 1, 1, json!({"module_id":"/m.js","content":"x"})),
            ],
        );
        assert_eq!(reducer.stats().orphaned_ends, 1);
        assert!(reducer.finish().modules[0].build_metrics.transforms.is_empty());
    }

    #[test]
    fn test_module_graph_clears_pending_calls() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                hook("HookLoadCallStart", 1, 0, json!({"module_id":"/m.js"})),
                json!({"action":"ModuleGraphReady","modules":[]}),
                hook("HookLoadCallEnd", 1, 2, json!({"module_id":"/m.js","content":"x"})),
            ],
        );
        assert_eq!(reducer.stats().orphaned_ends, 1);
    }

    #[test]
    fn test_metrics_arriving_after_module_graph_are_attached() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"ModuleGraphReady","modules":[{"id":"/m.js"}]}),
                hook("HookTransformCallStart", 1, 0, json!({"module_id":"/m.js","content":"a"})),
                hook("HookTransformCallEnd", 1, 2, json!({"module_id":"/m.js","content":"b"})),
            ],
        );
        let build = reducer.finish();
        assert_eq!(build.modules[0].build_metrics.transforms.len(), 1);
    }

    #[test]
    fn test_module_graph_sorts_and_dedupes_edges() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[json!({"action":"ModuleGraphReady","modules":[{
                "id":"/m.js",
                "importers":["/z.js","/a.js","/z.js"],
                "imports":[
                    {"module_id":"/c.js","kind":"import-statement"},
                    {"module_id":"/b.js","kind":"import-statement"},
                    {"module_id":"/c.js","kind":"import-statement"}
                ]
            }]})],
        );
        let build = reducer.finish();
        let module = &build.modules[0];
        assert_eq!(module.importers, vec!["/a.js", "/z.js"]);
        let ids: Vec<_> = module.imports.iter().map(|i| i.module_id.as_str()).collect();
        assert_eq!(ids, vec!["/b.js", "/c.js"]);
    }

    #[test]
    fn test_normalize_keeps_distinct_import_kinds() {
        let import = |id: &str, kind: &str| ModuleImport {
            module_id: id.into(),
            kind: Some(kind.into()),
            extra: Map::new(),
        };
        let mut module = ModuleRecord {
            id: "/m.js".into(),
            is_external: false,
            imports: vec![import("/a.js", "dynamic-import"), import("/a.js", "import-statement")],
            importers: vec![],
        };
        normalize_module_edges(&mut module);
        assert_eq!(module.imports.len(), 2);
    }

    #[test]
    fn test_assets_link_to_known_chunks() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"ChunkGraphReady","chunks":[{"chunk_id":0,"modules":[],"is_user_defined_entry":true,"imports":[]}]}),
                json!({"action":"AssetsReady","assets":[
                    {"filename":"main.js","chunk_id":0,"size":10},
                    {"filename":"lost.js","chunk_id":5,"size":3},
                    {"filename":"logo.svg","chunk_id":null,"size":1}
                ]}),
            ],
        );
        assert_eq!(reducer.stats().unknown_asset_chunks, 1);

        let build = reducer.finish();
        assert_eq!(build.assets.len(), 3);
        assert_eq!(build.assets[0].linked_chunk, Some(ChunkId::from(0)));
        assert_eq!(build.assets[1].linked_chunk, None);
        assert_eq!(build.assets[2].linked_chunk, None);
        assert!(build.chunk_assets.contains_key(&ChunkId::from(0)));
    }

    #[test]
    fn test_chunk_graph_replaces_table() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"ChunkGraphReady","chunks":[{"chunk_id":0},{"chunk_id":1}]}),
                json!({"action":"ChunkGraphReady","chunks":[{"chunk_id":2,"imports":[{"chunk_id":9}]}]}),
            ],
        );
        let build = reducer.finish();
        assert_eq!(build.chunks.len(), 1);
        assert!(build.chunks.contains_key(&ChunkId::from(2)));
        assert_eq!(build.stats.dangling_chunk_imports, 1);
    }

    #[test]
    fn test_event_ids_are_monotonic() {
        let mut reducer = EventReducer::new();
        feed(
            &mut reducer,
            &[
                json!({"action":"StringRef","id":"a","content":"x"}),
                hook("HookLoadCallStart", 1, 7, json!({"module_id":"/m.js"})),
                hook("HookLoadCallEnd", 1, 8, json!({"module_id":"/m.js","content":"x"})),
            ],
        );
        let build = reducer.finish();
        assert_eq!(build.modules[0].build_metrics.loads[0].call.id, "8#2");
    }

    #[test]
    fn test_integrity_issues() {
        let clean = ReduceStats::default();
        assert!(clean.integrity_issues().is_empty());

        let dirty = ReduceStats {
            malformed_lines: 2,
            dangling_chunk_imports: 1,
            missing_module_ids: 4,
            ..ReduceStats::default()
        };
        let issues = dirty.integrity_issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0], "2 malformed lines");
    }
}
