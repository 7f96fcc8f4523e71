//! Errors raised by the pre-save recorder.
//!
//! Host errors are not wrapped here; they travel through the hook's
//! `anyhow::Error` unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The stored history value is not an array of entry records.
    #[error("history field '{field}' is malformed: {source}")]
    Malformed {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted document changed a watched field but has no prior entry,
    /// and the configured policy rejects that.
    #[error("history field '{field}' is empty for a modified field of a persisted document")]
    EmptyLog { field: String },

    /// The updated log could not be encoded back onto the document.
    #[error("failed to encode history field '{field}': {source}")]
    Encode {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}
