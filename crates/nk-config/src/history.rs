//! History recording configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the recorder does when a persisted document's watched field changes
/// but its history log is empty (e.g. documents written before the field was
/// watched).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyLogPolicy {
    /// Record the change with `before: null`.
    #[default]
    NullBefore,
    /// Fail the pre-save hook, aborting the save.
    Reject,
}

impl EmptyLogPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullBefore => "null_before",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for EmptyLogPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Behaviour when a modified field has no prior entry to take `before` from.
    #[serde(default)]
    pub empty_log: EmptyLogPolicy,
}
