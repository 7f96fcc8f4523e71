//! History field definitions.
//!
//! For every watched field `f` the plugin adds `f_history`: an array of
//! `{ before, after, timestamp }` records where `before` and `after` share
//! `f`'s declared type (both nullable) and `timestamp` is a date defaulting
//! to the time the entry is created. The log itself defaults to `[]`.

use nk_core::{DefaultValue, FieldDefinition, FieldType, SchemaHost, history_field_name};

/// Record type stored in a history log of a field declared as `value_type`.
#[must_use]
pub fn history_entry_type(value_type: &FieldType) -> FieldType {
    FieldType::object(vec![
        FieldDefinition::new("before", value_type.clone()).nullable(),
        FieldDefinition::new("after", value_type.clone()).nullable(),
        FieldDefinition::new("timestamp", FieldType::Date).with_default(DefaultValue::Now),
    ])
}

/// Definition of the history log for a field declared as `value_type`.
#[must_use]
pub fn history_field_definition(field: &str, value_type: &FieldType) -> FieldDefinition {
    FieldDefinition::new(
        history_field_name(field),
        FieldType::array_of(history_entry_type(value_type)),
    )
    .with_default(DefaultValue::EmptyArray)
}

/// One history definition per watched field, in input order.
///
/// Fields the schema does not declare get `Mixed` value types; validation
/// rejects those before this runs.
#[must_use]
pub fn history_definitions<S: SchemaHost>(schema: &S, fields: &[String]) -> Vec<FieldDefinition> {
    fields
        .iter()
        .map(|field| {
            let value_type = schema
                .path(field)
                .map_or(FieldType::Mixed, |definition| definition.field_type.clone());
            history_field_definition(field, &value_type)
        })
        .collect()
}
