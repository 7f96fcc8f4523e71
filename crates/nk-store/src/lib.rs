//! # nk-store
//!
//! In-memory document store for Notekeeper.
//!
//! A [`Model`] pairs a name with a [`nk_schema::Schema`] and keeps committed
//! document bodies in memory. Saving runs the schema's pre-save hooks and
//! JSON Schema validation before anything is committed, so plugins such as
//! `nk-history` see every create and update.

pub mod error;
pub mod model;

pub use error::StoreError;
pub use model::{ID_PREFIX, Model};
