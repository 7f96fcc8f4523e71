//! # nk-history
//!
//! Per-field history logs for Notekeeper schemas.
//!
//! Applying the plugin to a schema:
//! 1. validates the options (`fields` must be a non-empty array of schema paths)
//! 2. adds a `<field>_history` array field per watched field
//! 3. registers a pre-save hook that appends `{ before, after, timestamp }`
//!    entries whenever a watched field is first set or later changed
//!
//! Validation happens before anything is added: on error the schema is left
//! exactly as it was and no hook is registered.
//!
//! # Usage
//!
//! ```no_run
//! use nk_core::{FieldDefinition, FieldType};
//! use nk_schema::Schema;
//!
//! let mut schema = Schema::new(vec![
//!     FieldDefinition::new("name", FieldType::String),
//!     FieldDefinition::new("type", FieldType::String),
//! ])
//! .expect("schema");
//!
//! nk_history::apply_plugin(&mut schema, &serde_json::json!({"fields": ["name"]}))
//!     .expect("valid options");
//! ```

mod clock;
mod error;
pub mod recorder;
pub mod synthesizer;
pub mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::HistoryError;
pub use recorder::HistoryRecorder;
pub use validator::PluginOptions;

use std::sync::Arc;

use nk_config::{ConfigError, HistoryConfig, NotekeeperConfig};
use nk_core::SchemaHost;
use serde_json::Value;

/// Apply the history plugin with default settings.
///
/// # Errors
///
/// Returns a `ConfigError` when the options are invalid for `schema`; the
/// schema is not modified in that case.
pub fn apply_plugin<S: SchemaHost>(schema: &mut S, options: &Value) -> Result<(), ConfigError> {
    HistoryPlugin::new().apply(schema, options)
}

/// Configurable entry point for the history plugin.
#[derive(Clone)]
pub struct HistoryPlugin {
    history: HistoryConfig,
    clock: Arc<dyn Clock>,
}

impl HistoryPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: HistoryConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Use the `[history]` section of a loaded configuration.
    #[must_use]
    pub fn from_config(config: &NotekeeperConfig) -> Self {
        Self::new().with_history_config(config.history.clone())
    }

    #[must_use]
    pub fn with_history_config(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate untyped `options` and apply them to `schema`.
    ///
    /// # Errors
    ///
    /// See [`validator`] for the checks and their order.
    pub fn apply<S: SchemaHost>(&self, schema: &mut S, options: &Value) -> Result<(), ConfigError> {
        let options = validator::validate_value(schema, options)?;
        self.install(schema, &options)
    }

    /// Validate typed `options` and apply them to `schema`.
    ///
    /// # Errors
    ///
    /// See [`validator`] for the checks and their order.
    pub fn apply_options<S: SchemaHost>(
        &self,
        schema: &mut S,
        options: &PluginOptions,
    ) -> Result<(), ConfigError> {
        validator::validate(schema, options)?;
        self.install(schema, options)
    }

    /// Add the history fields and register the recorder for already validated `options`.
    fn install<S: SchemaHost>(&self, schema: &mut S, options: &PluginOptions) -> Result<(), ConfigError> {
        let definitions = synthesizer::history_definitions(schema, &options.fields);
        schema.add_fields(definitions)?;

        let recorder = Arc::new(HistoryRecorder::new(
            options.fields.clone(),
            self.history.empty_log,
            Arc::clone(&self.clock),
        ));
        schema.register_pre_save_hook(Arc::new(move |document: &mut S::Document| {
            recorder.record(document).map(|_| ())
        }));

        tracing::debug!(
            fields = ?options.fields,
            empty_log = %self.history.empty_log,
            "history plugin applied"
        );
        Ok(())
    }
}

impl Default for HistoryPlugin {
    fn default() -> Self {
        Self::new()
    }
}
