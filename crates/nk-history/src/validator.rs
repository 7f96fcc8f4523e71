//! Plugin option validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. `fields` is present
//! 2. `fields` is an array
//! 3. `fields` is non-empty
//! 4. every entry names an existing schema path (first offender reported)
//! 5. no entry is listed twice
//! 6. no entry's `<field>_history` path already exists
//!
//! Nothing here touches the schema beyond read-only path lookups.

use std::collections::HashSet;

use nk_config::ConfigError;
use nk_core::{SchemaHost, history_field_name};
use serde_json::Value;

/// Watched fields for one schema, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOptions {
    pub fields: Vec<String>,
}

impl PluginOptions {
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Read options from their untyped form (`{"fields": [...]}`).
    ///
    /// Non-string entries are kept as their JSON rendering so they fail the
    /// schema lookup in position.
    ///
    /// # Errors
    ///
    /// `ConfigError::FieldsUndefined` when `fields` is absent or `null`,
    /// `ConfigError::FieldsNotArray` when it is anything but an array.
    pub fn from_value(options: &Value) -> Result<Self, ConfigError> {
        let fields = match options.get("fields") {
            None | Some(Value::Null) => return Err(ConfigError::FieldsUndefined),
            Some(Value::Array(fields)) => fields,
            Some(_) => return Err(ConfigError::FieldsNotArray),
        };

        let fields = fields
            .iter()
            .map(|field| match field {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            })
            .collect();
        Ok(Self { fields })
    }
}

/// Check `options` against `schema` (checks 3 to 6).
///
/// # Errors
///
/// The first failing check's `ConfigError`.
pub fn validate<S: SchemaHost>(schema: &S, options: &PluginOptions) -> Result<(), ConfigError> {
    if options.fields.is_empty() {
        return Err(ConfigError::FieldsEmpty);
    }

    if let Some(missing) = options.fields.iter().find(|field| !schema.has_path(field)) {
        return Err(ConfigError::FieldNotFound {
            field: missing.clone(),
        });
    }

    let mut seen = HashSet::new();
    if let Some(repeated) = options.fields.iter().find(|field| !seen.insert(field.as_str())) {
        return Err(ConfigError::DuplicateField {
            field: repeated.clone(),
        });
    }

    if let Some(taken) = options
        .fields
        .iter()
        .find(|field| schema.has_path(&history_field_name(field)))
    {
        return Err(ConfigError::HistoryFieldExists {
            field: history_field_name(taken),
        });
    }

    Ok(())
}

/// Run every check on untyped options, returning the typed form.
///
/// # Errors
///
/// The first failing check's `ConfigError`.
pub fn validate_value<S: SchemaHost>(schema: &S, options: &Value) -> Result<PluginOptions, ConfigError> {
    let options = PluginOptions::from_value(options)?;
    validate(schema, &options)?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nk_core::{FieldDefinition, FieldType};
    use nk_schema::Schema;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn pokemon() -> Schema {
        Schema::new(vec![
            FieldDefinition::new("name", FieldType::String),
            FieldDefinition::new("type", FieldType::String),
            FieldDefinition::new(
                "trainer",
                FieldType::object(vec![FieldDefinition::new("name", FieldType::String)]),
            ),
        ])
        .unwrap()
    }

    #[rstest]
    #[case(json!({}), "fields must be defined")]
    #[case(json!({"fields": null}), "fields must be defined")]
    #[case(json!({"fields": "name"}), "fields must be an array")]
    #[case(json!({"fields": {"0": "name"}}), "fields must be an array")]
    #[case(json!({"fields": 1}), "fields must be an array")]
    #[case(json!({"fields": []}), "fields must be non-empty")]
    #[case(json!({"fields": ["level"]}), "field not found in schema: level")]
    #[case(json!({"fields": ["name", "level", "rank"]}), "field not found in schema: level")]
    #[case(json!({"fields": ["name", 7]}), "field not found in schema: 7")]
    #[case(json!({"fields": ["trainer.age"]}), "field not found in schema: trainer.age")]
    #[case(json!({"fields": ["name", "type", "name"]}), "field listed more than once: name")]
    fn rejects_invalid_options(#[case] options: Value, #[case] message: &str) {
        let err = validate_value(&pokemon(), &options).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn checks_run_in_order() {
        // Not an array wins over everything that follows.
        let err = validate_value(&pokemon(), &json!({"fields": "level"})).unwrap_err();
        assert!(matches!(err, ConfigError::FieldsNotArray));

        // An unknown name is reported before a repeated one.
        let err = validate_value(&pokemon(), &json!({"fields": ["name", "name", "level"]}))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FieldNotFound { field } if field == "level"));
    }

    #[test]
    fn existing_history_field_is_rejected() {
        let schema = Schema::new(vec![
            FieldDefinition::new("name", FieldType::String),
            FieldDefinition::new("name_history", FieldType::Mixed),
        ])
        .unwrap();
        let err = validate(&schema, &PluginOptions::new(["name"])).unwrap_err();
        assert!(
            matches!(err, ConfigError::HistoryFieldExists { field } if field == "name_history")
        );
    }

    #[test]
    fn accepts_nested_and_top_level_fields() {
        let options = validate_value(&pokemon(), &json!({"fields": ["type", "trainer.name"]}))
            .unwrap();
        assert_eq!(options, PluginOptions::new(["type", "trainer.name"]));
    }

    #[test]
    fn extra_option_keys_are_ignored() {
        let options = validate_value(&pokemon(), &json!({"fields": ["name"], "note": "x"}))
            .unwrap();
        assert_eq!(options.fields, vec!["name".to_string()]);
    }
}
