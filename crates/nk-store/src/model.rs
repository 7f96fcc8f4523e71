//! A named collection of documents sharing one schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use nk_core::Document;
use nk_core::value::get_path;
use nk_schema::{DocumentValidator, Schema};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Prefix of generated document ids (`doc-0000002a`).
pub const ID_PREFIX: &str = "doc";

/// In-memory collection running the save pipeline for one schema.
///
/// Every save follows this protocol:
/// 1. Run the schema's pre-save hooks in registration order
/// 2. Validate the body against the schema's JSON Schema
/// 3. Commit a copy of the body
/// 4. Mark the document persisted
///
/// If step 1 or 2 fails the document is restored to its pre-save state and
/// nothing is committed.
pub struct Model {
    name: String,
    schema: Arc<Schema>,
    validator: DocumentValidator,
    documents: BTreeMap<String, Map<String, Value>>,
    next_id: u64,
}

impl Model {
    /// Create a model over `schema`. Plugins must already be applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if the schema's JSON Schema does not
    /// compile.
    pub fn new(name: impl Into<String>, schema: Schema) -> Result<Self, StoreError> {
        let validator = DocumentValidator::new(&schema)?;
        Ok(Self {
            name: name.into(),
            schema: Arc::new(schema),
            validator,
            documents: BTreeMap::new(),
            next_id: 0,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Build an unsaved document: schema defaults overlaid with `body`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotAnObject` if `body` is not a JSON object.
    pub fn new_document(&mut self, body: Value) -> Result<Document, StoreError> {
        let Value::Object(body) = body else {
            return Err(StoreError::NotAnObject);
        };
        let mut merged = self.schema.defaults(Utc::now());
        merge_into(&mut merged, body);
        Ok(Document::new(self.generate_id(), merged))
    }

    /// Build and save a document in one step.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::new_document`] or [`Self::save`].
    pub fn create(&mut self, body: Value) -> Result<Document, StoreError> {
        let mut document = self.new_document(body)?;
        self.save(&mut document)?;
        Ok(document)
    }

    /// Run the save pipeline for `document`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` for a persisted document missing from the store,
    /// `StoreError::DuplicateId` for a new document with a taken id,
    /// `StoreError::Hook` when a pre-save hook fails and
    /// `StoreError::Validation` when the body does not match the schema.
    pub fn save(&mut self, document: &mut Document) -> Result<(), StoreError> {
        let exists = self.documents.contains_key(document.id());
        if document.is_new() && exists {
            return Err(StoreError::DuplicateId {
                id: document.id().to_string(),
            });
        }
        if !document.is_new() && !exists {
            return Err(StoreError::NotFound {
                id: document.id().to_string(),
            });
        }

        let snapshot = document.clone();
        if let Err(error) = self.schema.run_pre_save_hooks(document) {
            *document = snapshot;
            return Err(StoreError::Hook(error));
        }
        if let Err(error) = self.validator.validate(&Value::Object(document.body().clone())) {
            *document = snapshot;
            return Err(error.into());
        }

        tracing::debug!(
            model = %self.name,
            id = document.id(),
            new = document.is_new(),
            "committed document"
        );
        self.documents
            .insert(document.id().to_string(), document.body().clone());
        document.mark_persisted();
        Ok(())
    }

    /// Load a stored document by id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<Document> {
        self.documents
            .get(id)
            .map(|body| Document::from_persisted(id, body.clone()))
    }

    /// First stored document (in id order) whose value at `path` equals `value`.
    #[must_use]
    pub fn find_one(&self, path: &str, value: &Value) -> Option<Document> {
        self.documents
            .iter()
            .find(|(_, body)| get_path(body, path) == Some(value))
            .map(|(id, body)| Document::from_persisted(id.as_str(), body.clone()))
    }

    /// Number of stored documents.
    #[must_use]
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    fn generate_id(&mut self) -> String {
        self.next_id += 1;
        format!("{ID_PREFIX}-{:08x}", self.next_id)
    }
}

/// Deep-merge `overlay` into `target`; objects merge, everything else replaces.
fn merge_into(target: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match value {
            Value::Object(nested) if target.get(&key).is_some_and(Value::is_object) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    merge_into(existing, nested);
                }
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}
