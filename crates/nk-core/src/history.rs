//! History records stored under `<field>_history`.
//!
//! A [`HistoryLog`] is the append-only list of [`HistoryEntry`] values kept
//! for one watched field of one document. On the document it is stored as a
//! plain JSON array so the store and schema validation see ordinary data.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Suffix appended to a watched field's name to name its history log.
pub const HISTORY_SUFFIX: &str = "_history";

/// Name of the history log field for `field` (`name` -> `name_history`).
#[must_use]
pub fn history_field_name(field: &str) -> String {
    format!("{field}{HISTORY_SUFFIX}")
}

/// One recorded change of a watched field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Value before the change. `null` for the first entry of a new document.
    #[serde(default)]
    pub before: Value,

    /// Value after the change.
    #[serde(default)]
    pub after: Value,

    /// When the entry was created.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub const fn new(before: Value, after: Value, timestamp: DateTime<Utc>) -> Self {
        Self {
            before,
            after,
            timestamp,
        }
    }

    /// First entry of a log: nothing came before.
    #[must_use]
    pub const fn initial(after: Value, timestamp: DateTime<Utc>) -> Self {
        Self::new(Value::Null, after, timestamp)
    }
}

/// Ordered, append-only sequence of history entries for one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct HistoryLog(Vec<HistoryEntry>);

impl HistoryLog {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Decode a log from the value stored on a document.
    ///
    /// A missing value or `null` decodes as an empty log.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the value is not an array of
    /// entry records.
    pub fn from_value(value: Option<Value>) -> Result<Self, serde_json::Error> {
        match value {
            None | Some(Value::Null) => Ok(Self::new()),
            Some(value) => serde_json::from_value(value),
        }
    }

    /// Encode the log as the JSON array stored on the document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if an entry fails to serialize.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    /// `after` of the most recent entry.
    #[must_use]
    pub fn last_after(&self) -> Option<&Value> {
        self.last().map(|entry| &entry.after)
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.0.push(entry);
    }
}

impl From<Vec<HistoryEntry>> for HistoryLog {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self(entries)
    }
}
