//! Store error types for nk-store.

use nk_schema::SchemaError;
use thiserror::Error;

/// Errors from creating, saving, and loading documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document body was not a JSON object.
    #[error("Document body must be a JSON object")]
    NotAnObject,

    /// A persisted document is no longer in the store.
    #[error("Document not found: {id}")]
    NotFound { id: String },

    /// A new document reuses the id of a stored one.
    #[error("Document id already exists: {id}")]
    DuplicateId { id: String },

    /// A pre-save hook failed; nothing was committed.
    #[error("Pre-save hook failed: {0}")]
    Hook(#[source] anyhow::Error),

    /// The document body does not match its schema; nothing was committed.
    #[error(transparent)]
    Validation(#[from] SchemaError),
}
