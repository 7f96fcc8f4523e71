//! Helpers over `serde_json` values: truthiness and dotted-path access.
//!
//! Paths use `.` to separate nested object keys (`address.city`). Arrays are
//! not indexed by path.

use serde_json::{Map, Value};

use crate::errors::CoreError;

/// Whether `value` counts as "set" for history purposes.
///
/// `null`, a missing value, `false`, zero and the empty string are falsy.
/// Every array and object is truthy, including empty ones.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Reject empty paths and paths with empty segments.
///
/// # Errors
///
/// Returns `CoreError::InvalidPath` for `""`, `"a..b"`, `".a"` and the like.
pub fn validate_path(path: &str) -> Result<(), CoreError> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(CoreError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Read the value at `path`, descending through nested objects.
#[must_use]
pub fn get_path<'a>(root: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects where missing.
///
/// Returns the previous value at `path`, if any. Intermediate `null`s are
/// replaced by empty objects.
///
/// # Errors
///
/// Returns `CoreError::InvalidPath` for malformed paths and
/// `CoreError::PathConflict` when an intermediate segment holds a non-object.
pub fn set_path(
    root: &mut Map<String, Value>,
    path: &str,
    value: Value,
) -> Result<Option<Value>, CoreError> {
    validate_path(path)?;
    let (parent, leaf) = match path.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, path),
    };

    let mut target = root;
    if let Some(parent) = parent {
        for segment in parent.split('.') {
            let slot = target
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if slot.is_null() {
                *slot = Value::Object(Map::new());
            }
            target = slot.as_object_mut().ok_or_else(|| CoreError::PathConflict {
                path: path.to_string(),
                segment: segment.to_string(),
            })?;
        }
    }
    Ok(target.insert(leaf.to_string(), value))
}

/// Whether `ancestor` is a strict dotted prefix of `path` (`a` of `a.b`, not of `ab`).
#[must_use]
pub fn is_ancestor_path(ancestor: &str, path: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.'))
}
