//! JSON Schema rendering and document validation.
//!
//! A [`Schema`] renders to a draft 2020-12 JSON Schema describing document
//! bodies. Extra properties are allowed; declared ones are type-checked,
//! required ones must be present, and only `nullable` fields accept `null`.

use jsonschema::Validator;
use nk_core::{FieldDefinition, FieldType};
use serde_json::{Map, Value, json};

use crate::error::SchemaError;
use crate::schema::Schema;

const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

impl Schema {
    /// Render the JSON Schema for document bodies of this schema.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut schema = object_schema(self.fields());
        if let Value::Object(map) = &mut schema {
            map.insert("$schema".to_string(), Value::String(DRAFT_2020_12.to_string()));
        }
        schema
    }
}

fn object_schema(fields: &[FieldDefinition]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.name.clone(), field_schema(field));
        if field.required {
            required.push(Value::String(field.name.clone()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(schema)
}

fn type_schema(field_type: &FieldType) -> Value {
    match field_type {
        FieldType::String => json!({"type": "string"}),
        FieldType::Number => json!({"type": "number"}),
        FieldType::Boolean => json!({"type": "boolean"}),
        FieldType::Date => json!({"type": "string", "format": "date-time"}),
        FieldType::Mixed => json!({}),
        FieldType::Array { items } => json!({"type": "array", "items": type_schema(items)}),
        FieldType::Object { fields } => object_schema(fields),
    }
}

fn field_schema(field: &FieldDefinition) -> Value {
    let mut schema = type_schema(&field.field_type);
    if field.nullable {
        if let Some(ty) = schema.get_mut("type") {
            *ty = json!([ty.take(), "null"]);
        }
    }
    schema
}

/// A compiled validator for the document bodies of one schema.
pub struct DocumentValidator {
    validator: Validator,
}

impl DocumentValidator {
    /// Compile the JSON Schema of `schema`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if the rendered schema does not compile.
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        Self::from_json_schema(&schema.to_json_schema())
    }

    /// Compile an already rendered JSON Schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Generation` if the schema does not compile.
    pub fn from_json_schema(schema: &Value) -> Result<Self, SchemaError> {
        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Generation(format!("{e}")))?;
        Ok(Self { validator })
    }

    /// Validate a document body.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidationFailed` with every validator message.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }
}
