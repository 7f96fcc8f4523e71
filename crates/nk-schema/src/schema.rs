//! The in-memory document schema.
//!
//! A [`Schema`] owns an ordered list of field definitions and an ordered list
//! of pre-save hooks. Plugins extend it through the [`SchemaHost`] trait
//! before any document of the schema is created.

use std::fmt;

use chrono::{DateTime, Utc};
use nk_core::value::validate_path;
use nk_core::{CoreError, Document, FieldDefinition, PreSaveHook, SchemaHost};
use serde_json::{Map, Value};

#[derive(Clone, Default)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
    hooks: Vec<PreSaveHook<Document>>,
}

impl Schema {
    /// Build a schema from top-level field definitions.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPath` for empty names,
    /// `CoreError::UnknownParent` for dotted names, and
    /// `CoreError::DuplicatePath` when a name repeats.
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, CoreError> {
        let mut schema = Self::default();
        schema.add_fields(fields)?;
        Ok(schema)
    }

    /// Top-level field definitions in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Registered pre-save hooks in registration order.
    #[must_use]
    pub fn pre_save_hooks(&self) -> &[PreSaveHook<Document>] {
        &self.hooks
    }

    /// Run every pre-save hook against `document`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the failing hook's error unchanged.
    pub fn run_pre_save_hooks(&self, document: &mut Document) -> anyhow::Result<()> {
        for hook in &self.hooks {
            hook(document)?;
        }
        Ok(())
    }

    /// Initial body for a new document: every declared default, resolved at `now`.
    ///
    /// Nested objects appear only when one of their fields has a default.
    #[must_use]
    pub fn defaults(&self, now: DateTime<Utc>) -> Map<String, Value> {
        defaults_for(&self.fields, now)
    }
}

fn defaults_for(fields: &[FieldDefinition], now: DateTime<Utc>) -> Map<String, Value> {
    let mut body = Map::new();
    for field in fields {
        if let Some(default) = &field.default {
            body.insert(field.name.clone(), default.resolve(now));
        } else if let Some(children) = field.field_type.fields() {
            let nested = defaults_for(children, now);
            if !nested.is_empty() {
                body.insert(field.name.clone(), Value::Object(nested));
            }
        }
    }
    body
}

fn find_path<'a>(fields: &'a [FieldDefinition], path: &str) -> Option<&'a FieldDefinition> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = fields.iter().find(|field| field.name == first)?;
    for segment in segments {
        current = current.child(segment)?;
    }
    Some(current)
}

/// Insert `definition` at the dotted `path`, whose parent must be an object field.
fn insert_at(
    fields: &mut Vec<FieldDefinition>,
    path: &str,
    mut definition: FieldDefinition,
) -> Result<(), CoreError> {
    validate_path(path)?;
    let (parent, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    };

    let mut siblings = fields;
    if let Some(parent) = parent {
        for segment in parent.split('.') {
            siblings = siblings
                .iter_mut()
                .find(|field| field.name == segment)
                .and_then(|field| field.field_type.fields_mut())
                .ok_or_else(|| CoreError::UnknownParent {
                    path: parent.to_string(),
                })?;
        }
    }

    if siblings.iter().any(|field| field.name == leaf) {
        return Err(CoreError::DuplicatePath {
            path: path.to_string(),
        });
    }
    leaf.clone_into(&mut definition.name);
    siblings.push(definition);
    Ok(())
}

impl SchemaHost for Schema {
    type Document = Document;

    fn path(&self, path: &str) -> Option<&FieldDefinition> {
        find_path(&self.fields, path)
    }

    fn add_fields(&mut self, definitions: Vec<FieldDefinition>) -> Result<(), CoreError> {
        let mut fields = self.fields.clone();
        for definition in definitions {
            let path = definition.name.clone();
            insert_at(&mut fields, &path, definition)?;
        }
        self.fields = fields;
        Ok(())
    }

    fn register_pre_save_hook(&mut self, hook: PreSaveHook<Document>) {
        self.hooks.push(hook);
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
