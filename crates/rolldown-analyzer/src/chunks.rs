//! Chunk graph finalization: initial-chunk reachability and chunk naming.
//!
//! Both need the complete chunk set, so they run once after the log has been
//! consumed rather than when `ChunkGraphReady` arrives.

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use std::collections::VecDeque;
use std::sync::LazyLock;

use crate::data::ChunkInfo;
use crate::event::{Asset, Chunk, ChunkId};

/// Chunk table in `ChunkGraphReady` order.
pub type ChunkTable = IndexMap<ChunkId, Chunk>;

/// Maximum number of name fragments kept in a generated chunk name.
const MAX_NAME_FRAGMENTS: usize = 5;

/// Name for chunks that contain no modules.
const UNNAMED_CHUNK: &str = "[unnamed]";

static INSTALL_DIR_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^.*(\.pnpm|\.yarn|node_modules|src|app|packages)/").expect("valid regex")
});
static NOISE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)(index|main|dist|test|component|components)(?-u:\b)").expect("valid regex")
});
static REPEATED_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/+").expect("valid regex"));
static QUERY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?.*$").expect("valid regex"));
static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[A-Za-z0-9_]+$").expect("valid regex"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));

/// Ids of every chunk reachable from a user-defined entry chunk.
///
/// Imports pointing at unknown chunk ids are still reported as reachable but
/// the traversal does not extend past them.
pub fn initial_chunk_ids(chunks: &ChunkTable) -> HashSet<ChunkId> {
    let mut initial: HashSet<ChunkId> = chunks
        .values()
        .filter(|c| c.is_user_defined_entry)
        .map(|c| c.chunk_id.clone())
        .collect();
    let mut queue: VecDeque<ChunkId> = initial.iter().cloned().collect();
    let mut visited: HashSet<ChunkId> = HashSet::default();

    while let Some(chunk_id) = queue.pop_front() {
        if !visited.insert(chunk_id.clone()) {
            continue;
        }
        let Some(chunk) = chunks.get(&chunk_id) else {
            continue;
        };
        for import in &chunk.imports {
            if initial.insert(import.chunk_id.clone()) {
                queue.push_back(import.chunk_id.clone());
            }
        }
    }

    initial
}

/// Number of chunk-import edges pointing at chunks missing from the table.
pub fn dangling_imports(chunks: &ChunkTable) -> usize {
    chunks
        .values()
        .flat_map(|c| &c.imports)
        .filter(|import| !chunks.contains_key(&import.chunk_id))
        .count()
}

/// Short, readable name derived from a module path.
///
/// `/proj/node_modules/lodash-es/debounce.js` becomes `lodash_es_debounce`.
pub fn simplify_module_name(module: &str) -> String {
    let name = INSTALL_DIR_PREFIX.replace(module, "");
    let name = NOISE_WORDS.replace_all(&name, "");
    let name = REPEATED_SLASHES.replace_all(&name, "/");
    let name = QUERY.replace(&name, "");
    let name = EXTENSION.replace(&name, "");
    let name = NON_WORD.replace_all(&name, "_");
    let name = CAMEL_BOUNDARY.replace_all(&name, "${1}_${2}");
    let name = name.to_lowercase();

    let mut seen = HashSet::default();
    name.split('_')
        .filter(|part| !part.is_empty())
        .filter(|part| seen.insert(*part))
        .take(MAX_NAME_FRAGMENTS)
        .collect::<Vec<_>>()
        .join("_")
}

/// Explicit chunk name, or one generated from its modules.
pub fn guess_chunk_name(chunk: &Chunk) -> String {
    if let Some(name) = chunk.name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    match chunk.modules.as_slice() {
        [] => UNNAMED_CHUNK.to_string(),
        [only] => format!("[{}]", simplify_module_name(only)),
        [first, ..] => format!(
            "[{}_{}]",
            simplify_module_name(first),
            chunk.modules.len()
        ),
    }
}

/// Fill in the derived chunk fields: `is_initial`, `name`, and `asset`.
pub fn finalize_chunks(chunks: ChunkTable, chunk_assets: &HashMap<ChunkId, Asset>) -> Vec<ChunkInfo> {
    let initial = initial_chunk_ids(&chunks);

    chunks
        .into_values()
        .map(|chunk| {
            let name = guess_chunk_name(&chunk);
            ChunkInfo {
                is_initial: initial.contains(&chunk.chunk_id),
                asset: chunk_assets.get(&chunk.chunk_id).cloned(),
                name,
                chunk_id: chunk.chunk_id,
                modules: chunk.modules,
                is_user_defined_entry: chunk.is_user_defined_entry,
                imports: chunk.imports,
                extra: chunk.extra,
            }
        })
        .collect()
}
