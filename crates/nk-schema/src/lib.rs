//! # nk-schema
//!
//! Document schemas, JSON Schema export, and validation for Notekeeper.
//!
//! This crate provides:
//! - `Schema`: ordered field definitions with nested paths, defaults, and an
//!   ordered pre-save hook list (the in-memory `SchemaHost`)
//! - JSON Schema rendering of a `Schema` for document validation
//! - `DocumentValidator`: a compiled validator for one schema
//!
//! ## Architecture
//!
//! Field types and history records are defined in `nk-core`. This crate
//! holds the schema model the history plugin mutates and the validation
//! layer the store runs before committing a document.

mod error;
mod json_schema;
mod schema;

pub use error::SchemaError;
pub use json_schema::DocumentValidator;
pub use schema::Schema;
