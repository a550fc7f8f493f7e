//! Wire types for the Rolldown debug event log.
//!
//! Each log line is one JSON object discriminated by its `action` field.
//! Records that end up in the output document (chunks, assets, module imports)
//! keep every field they do not model in an `extra` map, so whatever the
//! producer emits is passed through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Event timestamp, in whatever unit the producer uses (nanoseconds for Rolldown).
pub type Timestamp = i64;

/// Numeric plugin index assigned by the bundler.
pub type PluginId = u64;

/// Identifier that producers emit either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Num(u64),
    Str(String),
}

/// Correlates a hook start event with its end event.
pub type CallId = Key;

/// Identity of a chunk in the chunk graph.
pub type ChunkId = Key;

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Num(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Key::Num(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

/// One record of the event log.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum Event {
    BuildStart(BuildMarker),
    BuildEnd(BuildMarker),
    StringRef(StringRef),
    HookResolveIdCallStart(ResolveIdCallStart),
    HookResolveIdCallEnd(ResolveIdCallEnd),
    HookLoadCallStart(LoadCallStart),
    HookLoadCallEnd(LoadCallEnd),
    HookTransformCallStart(TransformCallStart),
    HookTransformCallEnd(TransformCallEnd),
    ChunkGraphReady(ChunkGraphReady),
    ModuleGraphReady(ModuleGraphReady),
    AssetsReady(AssetsReady),
    /// Any action this pipeline does not consume.
    #[serde(other)]
    Unknown,
}

impl Event {
    /// Timestamp of the event, when it carries one.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Event::BuildStart(e) | Event::BuildEnd(e) => Some(e.timestamp),
            Event::HookResolveIdCallStart(e) => Some(e.call.timestamp),
            Event::HookResolveIdCallEnd(e) => Some(e.call.timestamp),
            Event::HookLoadCallStart(e) => Some(e.call.timestamp),
            Event::HookLoadCallEnd(e) => Some(e.call.timestamp),
            Event::HookTransformCallStart(e) => Some(e.call.timestamp),
            Event::HookTransformCallEnd(e) => Some(e.call.timestamp),
            Event::ChunkGraphReady(e) => e.timestamp,
            Event::ModuleGraphReady(e) => e.timestamp,
            Event::AssetsReady(e) => e.timestamp,
            Event::StringRef(_) | Event::Unknown => None,
        }
    }

    /// Module id stamped on the event itself.
    ///
    /// Only load and transform hooks carry one; resolveId events name the
    /// module through `resolved_id` instead.
    pub fn module_id(&self) -> Option<&str> {
        match self {
            Event::HookLoadCallStart(e) => Some(e.module_id.as_str()),
            Event::HookLoadCallEnd(e) => e.module_id.as_deref(),
            Event::HookTransformCallStart(e) => Some(e.module_id.as_str()),
            Event::HookTransformCallEnd(e) => e.module_id.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildMarker {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: Timestamp,
}

/// Interned string payload referenced elsewhere as `$ref:<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct StringRef {
    pub id: String,
    pub content: String,
}

/// Fields shared by every hook call event.
#[derive(Debug, Clone, Deserialize)]
pub struct HookCall {
    pub call_id: CallId,
    pub plugin_id: PluginId,
    #[serde(default)]
    pub plugin_name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveIdCallStart {
    #[serde(flatten)]
    pub call: HookCall,
    #[serde(default)]
    pub module_request: Option<String>,
    #[serde(default)]
    pub importer: Option<String>,
    #[serde(default)]
    pub import_kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveIdCallEnd {
    #[serde(flatten)]
    pub call: HookCall,
    #[serde(default)]
    pub resolved_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadCallStart {
    #[serde(flatten)]
    pub call: HookCall,
    pub module_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadCallEnd {
    #[serde(flatten)]
    pub call: HookCall,
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformCallStart {
    #[serde(flatten)]
    pub call: HookCall,
    pub module_id: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransformCallEnd {
    #[serde(flatten)]
    pub call: HookCall,
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkGraphReady {
    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleGraphReady {
    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: Vec<ModuleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsReady {
    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<Asset>,
}

/// A chunk as reported by `ChunkGraphReady`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modules: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_user_defined_entry: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub imports: Vec<ChunkImport>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Edge from a chunk to a chunk it imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkImport {
    pub chunk_id: ChunkId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A module as reported by `ModuleGraphReady`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_external: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub imports: Vec<ModuleImport>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub importers: Vec<String>,
}

/// Edge from a module to a module it imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleImport {
    pub module_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An emitted file as reported by `AssetsReady`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub filename: String,
    #[serde(default)]
    pub chunk_id: Option<ChunkId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Int(i64),
    Text(String),
}

impl RawTimestamp {
    fn into_timestamp<E: serde::de::Error>(self) -> Result<Timestamp, E> {
        match self {
            RawTimestamp::Int(value) => Ok(value),
            RawTimestamp::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid timestamp: {text:?}"))),
        }
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?.into_timestamp()
}

fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawTimestamp>::deserialize(deserializer)?
        .map(RawTimestamp::into_timestamp)
        .transpose()
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
