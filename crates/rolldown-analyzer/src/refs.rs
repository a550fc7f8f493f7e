//! String interning for `$ref:` indirections.
//!
//! Large payloads (module sources mostly) are written to the log once as a
//! `StringRef` event and referenced from later events as `$ref:<id>`.

use rustc_hash::FxHashMap as HashMap;

/// Prefix marking a field value as a reference into the intern table.
pub const REF_MARKER: &str = "$ref:";

/// Interned string table, alive only for the duration of one reduction pass.
#[derive(Debug, Default)]
pub struct StringRefs {
    table: HashMap<String, String>,
}

impl StringRefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, content: String) {
        self.table.insert(id, content);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Substitute a `$ref:` field with its interned content.
    ///
    /// Fields that are not references, or that point at an unknown id, are
    /// left untouched.
    pub fn resolve(&self, field: &mut Option<String>) {
        let Some(value) = field.as_deref() else {
            return;
        };
        let Some(key) = value.strip_prefix(REF_MARKER) else {
            return;
        };
        if let Some(content) = self.table.get(key) {
            *field = Some(content.clone());
        }
    }
}
