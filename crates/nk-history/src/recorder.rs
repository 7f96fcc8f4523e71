//! The pre-save recorder.
//!
//! Runs once per save, visiting watched fields in configuration order. For
//! each field it decides between three outcomes:
//!
//! ```text
//! new document, truthy value -> append { before: null, after: value }
//! field modified             -> append { before: last.after, after: value }
//! anything else              -> leave the log alone
//! ```
//!
//! A new document with a falsy value takes the second branch when the field
//! was set before its first save. Its log is still empty at that point, so
//! `before` follows the configured [`EmptyLogPolicy`].

use std::sync::Arc;

use nk_config::EmptyLogPolicy;
use nk_core::value::is_truthy;
use nk_core::{DocumentHost, HistoryEntry, HistoryLog, history_field_name};
use serde_json::Value;

use crate::clock::Clock;
use crate::error::HistoryError;

pub struct HistoryRecorder {
    fields: Vec<String>,
    empty_log: EmptyLogPolicy,
    clock: Arc<dyn Clock>,
}

impl HistoryRecorder {
    #[must_use]
    pub fn new(fields: Vec<String>, empty_log: EmptyLogPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            fields,
            empty_log,
            clock,
        }
    }

    /// Record every watched field of `document`. Returns how many entries
    /// were appended.
    ///
    /// # Errors
    ///
    /// Host errors are returned as-is inside the `anyhow::Error`; recorder
    /// failures are [`HistoryError`]s.
    pub fn record<D: DocumentHost>(&self, document: &mut D) -> anyhow::Result<usize> {
        let mut appended = 0;
        for field in &self.fields {
            if self.record_field(document, field)?.is_some() {
                appended += 1;
            }
        }
        Ok(appended)
    }

    /// Record a single field, returning the appended entry if there was one.
    ///
    /// # Errors
    ///
    /// Same as [`Self::record`].
    pub fn record_field<D: DocumentHost>(
        &self,
        document: &mut D,
        field: &str,
    ) -> anyhow::Result<Option<HistoryEntry>> {
        let history_field = history_field_name(field);
        let mut log = HistoryLog::from_value(document.get_field(&history_field)?).map_err(
            |source| HistoryError::Malformed {
                field: history_field.clone(),
                source,
            },
        )?;
        let value = document.get_field(field)?;

        let before = if document.is_new_document() && is_truthy(value.as_ref()) {
            Value::Null
        } else if document.is_field_modified(field)? {
            self.previous_value(&log, &history_field)?
        } else {
            return Ok(None);
        };

        let entry = HistoryEntry::new(before, value.unwrap_or(Value::Null), self.clock.now());
        log.push(entry.clone());
        let encoded = log.to_value().map_err(|source| HistoryError::Encode {
            field: history_field.clone(),
            source,
        })?;
        document.set_field(&history_field, encoded)?;

        tracing::debug!(
            field,
            history_field = %history_field,
            entries = log.len(),
            "recorded history entry"
        );
        Ok(Some(entry))
    }

    /// `before` for a change on a persisted document.
    fn previous_value(&self, log: &HistoryLog, history_field: &str) -> Result<Value, HistoryError> {
        if let Some(after) = log.last_after() {
            return Ok(after.clone());
        }
        match self.empty_log {
            EmptyLogPolicy::NullBefore => {
                tracing::warn!(
                    history_field,
                    "modified field has no history yet; recording with null before"
                );
                Ok(Value::Null)
            }
            EmptyLogPolicy::Reject => Err(HistoryError::EmptyLog {
                field: history_field.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use nk_core::{CoreError, Document};
    use pretty_assertions::assert_eq;
    use serde_json::{Map, json};

    fn recorder(fields: &[&str], empty_log: EmptyLogPolicy) -> HistoryRecorder {
        let at = Utc.with_ymd_and_hms(2026, 2, 8, 12, 0, 0).unwrap();
        HistoryRecorder::new(
            fields.iter().map(ToString::to_string).collect(),
            empty_log,
            Arc::new(FixedClock(at)),
        )
    }

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn log_of(doc: &Document, field: &str) -> HistoryLog {
        HistoryLog::from_value(doc.get(&history_field_name(field)).cloned()).unwrap()
    }

    #[test]
    fn new_document_with_value_gets_initial_entry() {
        let rec = recorder(&["name"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new("doc-1", body(json!({"name": "Charmander", "name_history": []})));

        assert_eq!(rec.record(&mut doc).unwrap(), 1);
        let log = log_of(&doc, "name");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].before, Value::Null);
        assert_eq!(log.entries()[0].after, json!("Charmander"));
        assert_eq!(
            log.entries()[0].timestamp,
            Utc.with_ymd_and_hms(2026, 2, 8, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn new_document_with_falsy_value_records_nothing() {
        let rec = recorder(&["name", "count", "flag"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new(
            "doc-1",
            body(json!({"name": "", "count": 0, "flag": false, "name_history": []})),
        );
        doc.set("count", 0).unwrap();

        assert_eq!(rec.record(&mut doc).unwrap(), 0);
        assert!(log_of(&doc, "name").is_empty());
        assert!(doc.get("count_history").is_none());
    }

    #[test]
    fn new_document_with_modified_falsy_value_is_recorded() {
        let rec = recorder(&["count"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new("doc-1", body(json!({"count_history": []})));
        doc.set("count", 0).unwrap();

        let entry = rec.record_field(&mut doc, "count").unwrap().unwrap();
        assert_eq!(entry.before, Value::Null);
        assert_eq!(entry.after, json!(0));
        assert_eq!(log_of(&doc, "count").len(), 1);
    }

    #[test]
    fn new_document_with_modified_falsy_value_respects_reject() {
        let rec = recorder(&["count"], EmptyLogPolicy::Reject);
        let mut doc = Document::new("doc-1", body(json!({"count_history": []})));
        doc.set("count", 0).unwrap();

        let err = rec.record(&mut doc).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HistoryError>(),
            Some(HistoryError::EmptyLog { .. })
        ));
    }

    #[test]
    fn modified_field_chains_before_from_last_after() {
        let rec = recorder(&["name"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new("doc-1", body(json!({"name": "Charmander"})));
        rec.record(&mut doc).unwrap();
        doc.mark_persisted();

        doc.set("name", "Charmeleon").unwrap();
        let entry = rec.record_field(&mut doc, "name").unwrap().unwrap();
        assert_eq!(entry.before, json!("Charmander"));
        assert_eq!(entry.after, json!("Charmeleon"));
        assert_eq!(log_of(&doc, "name").len(), 2);
    }

    #[test]
    fn untouched_persisted_document_records_nothing() {
        let rec = recorder(&["name"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::from_persisted("doc-1", body(json!({"name": "Charmander"})));
        assert_eq!(rec.record(&mut doc).unwrap(), 0);
        assert!(doc.get("name_history").is_none());
    }

    #[test]
    fn cleared_value_is_recorded_as_null_after() {
        let rec = recorder(&["nickname"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new("doc-1", body(json!({"nickname": "Char"})));
        rec.record(&mut doc).unwrap();
        doc.mark_persisted();

        doc.set("nickname", Value::Null).unwrap();
        let entry = rec.record_field(&mut doc, "nickname").unwrap().unwrap();
        assert_eq!(entry.before, json!("Char"));
        assert_eq!(entry.after, Value::Null);
    }

    #[test]
    fn empty_log_falls_back_to_null_before() {
        let rec = recorder(&["name"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::from_persisted("doc-1", body(json!({"name": "Charmander"})));
        doc.set("name", "Charmeleon").unwrap();

        let entry = rec.record_field(&mut doc, "name").unwrap().unwrap();
        assert_eq!(entry.before, Value::Null);
        assert_eq!(entry.after, json!("Charmeleon"));
    }

    #[test]
    fn empty_log_can_be_rejected() {
        let rec = recorder(&["name"], EmptyLogPolicy::Reject);
        let mut doc = Document::from_persisted("doc-1", body(json!({"name": "Charmander"})));
        doc.set("name", "Charmeleon").unwrap();

        let err = rec.record(&mut doc).unwrap_err();
        let err = err.downcast::<HistoryError>().unwrap();
        assert!(matches!(err, HistoryError::EmptyLog { field } if field == "name_history"));
        assert!(doc.get("name_history").is_none());
    }

    #[test]
    fn malformed_log_is_an_error() {
        let rec = recorder(&["name"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new("doc-1", body(json!({"name": "Charmander", "name_history": "oops"})));
        let err = rec.record(&mut doc).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HistoryError>(),
            Some(HistoryError::Malformed { .. })
        ));
    }

    #[test]
    fn host_errors_pass_through_unchanged() {
        // `stats.hp` holds a number, so `stats.hp.max_history` cannot be written.
        let rec = recorder(&["stats.hp.max"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::from_persisted("doc-1", body(json!({"stats": {"hp": 39}})));
        doc.set("stats.hp", 41).unwrap();

        let err = rec.record(&mut doc).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::PathConflict { segment, .. }) if segment == "hp"
        ));
    }

    #[test]
    fn fields_are_recorded_independently() {
        let rec = recorder(&["quantity", "status"], EmptyLogPolicy::NullBefore);
        let mut doc = Document::new(
            "doc-1",
            body(json!({"quantity": 3, "status": "open", "customer": "Ash"})),
        );
        assert_eq!(rec.record(&mut doc).unwrap(), 2);
        doc.mark_persisted();

        doc.set("status", "shipped").unwrap();
        assert_eq!(rec.record(&mut doc).unwrap(), 1);
        assert_eq!(log_of(&doc, "quantity").len(), 1);
        assert_eq!(log_of(&doc, "status").len(), 2);
    }
}
