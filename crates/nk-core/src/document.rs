//! In-memory document with new/modified tracking.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::host::DocumentHost;
use crate::value::{get_path, is_ancestor_path, set_path, validate_path};

/// A document body plus the lifecycle state the save pipeline inspects.
///
/// A document built with [`Document::new`] is *new* until the store commits
/// it. Paths written through [`Document::set`] are *modified* until the next
/// commit; writing a value equal to the current one does not mark anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    body: Map<String, Value>,
    is_new: bool,
    modified: BTreeSet<String>,
}

impl Document {
    /// A document that has never been persisted.
    #[must_use]
    pub fn new(id: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            body,
            is_new: true,
            modified: BTreeSet::new(),
        }
    }

    /// A document loaded back from storage: not new, nothing modified.
    #[must_use]
    pub fn from_persisted(id: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            is_new: false,
            ..Self::new(id, body)
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.body, path)
    }

    /// Write `value` at `path`.
    ///
    /// Returns `true` when the stored value changed (and the path is now
    /// marked modified).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPath` or `CoreError::PathConflict` from
    /// path resolution.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<bool, CoreError> {
        validate_path(path)?;
        let value = value.into();
        if self.get(path) == Some(&value) {
            return Ok(false);
        }
        set_path(&mut self.body, path, value)?;
        self.modified.insert(path.to_string());
        Ok(true)
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether `path`, one of its ancestors, or one of its descendants was
    /// written since the last commit.
    #[must_use]
    pub fn is_modified(&self, path: &str) -> bool {
        self.modified.iter().any(|dirty| {
            dirty == path || is_ancestor_path(dirty, path) || is_ancestor_path(path, dirty)
        })
    }

    /// Paths written since the last commit, sorted.
    pub fn modified_paths(&self) -> impl Iterator<Item = &str> {
        self.modified.iter().map(String::as_str)
    }

    /// Reset lifecycle state after the store committed this document.
    pub fn mark_persisted(&mut self) {
        self.is_new = false;
        self.modified.clear();
    }
}

impl DocumentHost for Document {
    type Error = CoreError;

    fn is_new_document(&self) -> bool {
        self.is_new
    }

    fn is_field_modified(&self, path: &str) -> Result<bool, Self::Error> {
        validate_path(path)?;
        Ok(self.is_modified(path))
    }

    fn get_field(&self, path: &str) -> Result<Option<Value>, Self::Error> {
        validate_path(path)?;
        Ok(self.get(path).cloned())
    }

    fn set_field(&mut self, path: &str, value: Value) -> Result<(), Self::Error> {
        self.set(path, value).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pokemon() -> Document {
        let body = json!({"name": "Charmander", "type": "Fire", "stats": {"hp": 39}});
        Document::new("doc-00000001", body.as_object().unwrap().clone())
    }

    #[test]
    fn new_document_starts_clean() {
        let doc = pokemon();
        assert!(doc.is_new());
        assert!(!doc.is_modified("name"));
        assert_eq!(doc.modified_paths().count(), 0);
    }

    #[test]
    fn setting_equal_value_does_not_mark() {
        let mut doc = pokemon();
        assert!(!doc.set("name", "Charmander").unwrap());
        assert!(!doc.is_modified("name"));
    }

    #[test]
    fn setting_new_value_marks_path() {
        let mut doc = pokemon();
        assert!(doc.set("name", "Charmeleon").unwrap());
        assert!(doc.is_modified("name"));
        assert!(!doc.is_modified("type"));
        assert_eq!(doc.get("name"), Some(&json!("Charmeleon")));
    }

    #[test]
    fn modification_propagates_along_paths() {
        let mut doc = pokemon();
        doc.set("stats.hp", 58).unwrap();
        assert!(doc.is_modified("stats"));
        assert!(doc.is_modified("stats.hp"));
        assert!(!doc.is_modified("stats.attack"));

        let mut doc = pokemon();
        doc.set("stats", json!({"hp": 78})).unwrap();
        assert!(doc.is_modified("stats.hp"));
    }

    #[test]
    fn mark_persisted_resets_state() {
        let mut doc = pokemon();
        doc.set("type", "Fire/Flying").unwrap();
        doc.mark_persisted();
        assert!(!doc.is_new());
        assert!(!doc.is_modified("type"));
        assert_eq!(doc.get("type"), Some(&json!("Fire/Flying")));
    }

    #[test]
    fn host_surface_validates_paths() {
        let doc = pokemon();
        assert!(doc.get_field("").is_err());
        assert!(doc.is_field_modified("a..b").is_err());
        assert_eq!(doc.get_field("missing").unwrap(), None);
    }

    #[test]
    fn persisted_document_is_not_new() {
        let doc = Document::from_persisted("doc-00000002", Map::new());
        assert!(!doc.is_new());
        assert_eq!(doc.id(), "doc-00000002");
    }
}
