//! Declared field types and field definitions.
//!
//! A schema is an ordered list of [`FieldDefinition`]s. Nested documents are
//! expressed with [`FieldType::Object`], arrays of sub-records with
//! [`FieldType::Array`] wrapping an object type.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// The declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    /// Any JSON value.
    Mixed,
    Array {
        items: Box<FieldType>,
    },
    Object {
        fields: Vec<FieldDefinition>,
    },
}

impl FieldType {
    /// Shorthand for an array of `items`.
    #[must_use]
    pub fn array_of(items: Self) -> Self {
        Self::Array {
            items: Box::new(items),
        }
    }

    /// Shorthand for a nested object with the given fields.
    #[must_use]
    pub const fn object(fields: Vec<FieldDefinition>) -> Self {
        Self::Object { fields }
    }

    /// Nested field definitions for object types, `None` otherwise.
    #[must_use]
    pub fn fields(&self) -> Option<&[FieldDefinition]> {
        match self {
            Self::Object { fields } => Some(fields),
            _ => None,
        }
    }

    /// Mutable access to nested field definitions for object types.
    pub const fn fields_mut(&mut self) -> Option<&mut Vec<FieldDefinition>> {
        match self {
            Self::Object { fields } => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Mixed => "mixed",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array { items } => write!(f, "array<{items}>"),
            other => f.write_str(other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// DefaultValue
// ---------------------------------------------------------------------------

/// Value a field takes when a document is created without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// A fixed JSON value.
    Value(serde_json::Value),
    /// The current time, rendered as RFC 3339.
    Now,
    /// An empty array.
    EmptyArray,
}

impl DefaultValue {
    /// Materialize the default at time `now`.
    #[must_use]
    pub fn resolve(&self, now: DateTime<Utc>) -> serde_json::Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Now => serde_json::Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::EmptyArray => serde_json::Value::Array(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldDefinition
// ---------------------------------------------------------------------------

/// A named, typed field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

impl FieldDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            nullable: false,
            default: None,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Direct child definition named `name`, if this is an object field.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.field_type
            .fields()
            .and_then(|fields| fields.iter().find(|field| field.name == name))
    }
}
