//! Cross-cutting error types for Notekeeper.
//!
//! Errors raised while manipulating schemas and documents in memory. The
//! plugin's configuration errors live in `nk-config`, store errors in
//! `nk-store`.

use thiserror::Error;

/// Errors that can be raised by any Notekeeper crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A dotted path was empty or contained an empty segment.
    #[error("Invalid path: '{path}'")]
    InvalidPath { path: String },

    /// A path segment resolved to a non-object value where an object was needed.
    #[error("Cannot descend into '{segment}' while resolving '{path}': not an object")]
    PathConflict { path: String, segment: String },

    /// A field definition would replace an existing schema path.
    #[error("Path already defined in schema: {path}")]
    DuplicatePath { path: String },

    /// A field definition targets a parent path that does not exist.
    #[error("Parent path not found in schema: {path}")]
    UnknownParent { path: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
