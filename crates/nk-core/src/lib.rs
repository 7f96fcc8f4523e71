//! # nk-core
//!
//! Core types shared by every Notekeeper crate.
//!
//! This crate provides:
//! - Declared field types and field definitions for document schemas
//! - History entry and history log records (the `<field>_history` payload)
//! - The in-memory `Document` with dirty-path tracking
//! - Host traits (`SchemaHost`, `DocumentHost`) the history plugin is written against
//! - Truthiness and dotted-path helpers over `serde_json::Value`
//! - Cross-cutting error types

pub mod document;
pub mod errors;
pub mod field;
pub mod history;
pub mod host;
pub mod value;

pub use document::Document;
pub use errors::CoreError;
pub use field::{DefaultValue, FieldDefinition, FieldType};
pub use history::{HISTORY_SUFFIX, HistoryEntry, HistoryLog, history_field_name};
pub use host::{DocumentHost, PreSaveHook, SchemaHost};
