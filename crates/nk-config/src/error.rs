//! Configuration error types.
//!
//! Covers both invalid plugin options (raised while a schema is being set
//! up, never during a save) and failures loading layered configuration.

use nk_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Plugin options carry no `fields` entry.
    #[error("fields must be defined")]
    FieldsUndefined,

    /// `fields` is present but not an array.
    #[error("fields must be an array")]
    FieldsNotArray,

    /// `fields` is an empty array.
    #[error("fields must be non-empty")]
    FieldsEmpty,

    /// A watched field does not resolve to a schema path.
    #[error("field not found in schema: {field}")]
    FieldNotFound { field: String },

    /// A watched field is listed more than once.
    #[error("field listed more than once: {field}")]
    DuplicateField { field: String },

    /// The schema already declares the history field for a watched field.
    #[error("history field already defined in schema: {field}")]
    HistoryFieldExists { field: String },

    /// The schema refused the synthesized history definitions.
    #[error("Schema rejected history fields: {0}")]
    Schema(#[from] CoreError),

    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
