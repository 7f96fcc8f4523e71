//! Host traits: the document-model surface plugins are written against.
//!
//! A host provides a mutable schema (path lookup, field addition, pre-save
//! hook registration) and documents (get/set, new/modified introspection).
//! `nk-schema` and [`crate::Document`] are the in-memory implementations;
//! other stores can implement the same traits.

use std::sync::Arc;

use serde_json::Value;

use crate::errors::CoreError;
use crate::field::FieldDefinition;

/// A callback run by the save pipeline immediately before a document is
/// committed. An error aborts the save.
///
/// Errors travel as `anyhow::Error` so host errors reach the caller
/// unchanged and can be downcast.
pub type PreSaveHook<D> = Arc<dyn Fn(&mut D) -> anyhow::Result<()> + Send + Sync>;

/// Schema capabilities consumed by plugins.
pub trait SchemaHost {
    /// Document type passed to this schema's pre-save hooks.
    type Document: DocumentHost;

    /// Definition at a dotted path, if the schema declares one.
    fn path(&self, path: &str) -> Option<&FieldDefinition>;

    /// Whether the schema declares `path`.
    fn has_path(&self, path: &str) -> bool {
        self.path(path).is_some()
    }

    /// Merge `definitions` into the schema, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns a `CoreError` when a definition collides with an existing
    /// path or targets a missing parent. The schema is left unchanged.
    fn add_fields(&mut self, definitions: Vec<FieldDefinition>) -> Result<(), CoreError>;

    /// Append `hook` to the ordered pre-save hook list.
    fn register_pre_save_hook(&mut self, hook: PreSaveHook<Self::Document>);
}

/// Document capabilities consumed by pre-save hooks.
pub trait DocumentHost {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether the document has never been committed.
    fn is_new_document(&self) -> bool;

    /// Whether `path` changed during the current save cycle.
    ///
    /// # Errors
    ///
    /// Host-specific.
    fn is_field_modified(&self, path: &str) -> Result<bool, Self::Error>;

    /// Current value at `path`, `None` when unset.
    ///
    /// # Errors
    ///
    /// Host-specific.
    fn get_field(&self, path: &str) -> Result<Option<Value>, Self::Error>;

    /// Write `value` at `path` in memory. Persisting is the save pipeline's job.
    ///
    /// # Errors
    ///
    /// Host-specific.
    fn set_field(&mut self, path: &str, value: Value) -> Result<(), Self::Error>;
}
