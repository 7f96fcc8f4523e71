//! # nk-config
//!
//! Plugin option errors and layered configuration loading for Notekeeper
//! using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`NOTEKEEPER_*` prefix, `__` as separator)
//! 2. Project-level `.notekeeper/config.toml`
//! 3. User-level `~/.config/notekeeper/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `NOTEKEEPER_HISTORY__EMPTY_LOG` -> `history.empty_log` and
//! `NOTEKEEPER_SCHEMAS__POKEMON__FIELDS` -> `schemas.pokemon.fields`.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use nk_config::NotekeeperConfig;
//!
//! let config = NotekeeperConfig::load_with_dotenv().expect("config");
//!
//! if let Some(options) = config.plugin_options("pokemon") {
//!     println!("pokemon history options: {options}");
//! }
//! ```

mod error;
mod history;

pub use error::ConfigError;
pub use history::{EmptyLogPolicy, HistoryConfig};

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotekeeperConfig {
    #[serde(default)]
    pub history: HistoryConfig,

    /// Raw plugin options per schema name, e.g. `[schemas.pokemon] fields = ["name"]`.
    ///
    /// Kept as untyped JSON so they go through the same option validation
    /// as options built in code.
    #[serde(default)]
    pub schemas: BTreeMap<String, serde_json::Value>,
}

impl NotekeeperConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source fails to parse or
    /// extract, `ConfigError::InvalidValue` when a schema entry is not a table.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and check a configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".notekeeper/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("NOTEKEEPER_").split("__"))
    }

    /// Raw plugin options configured for `schema`.
    #[must_use]
    pub fn plugin_options(&self, schema: &str) -> Option<&serde_json::Value> {
        self.schemas.get(schema)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, options) in &self.schemas {
            if !options.is_object() {
                return Err(ConfigError::InvalidValue {
                    field: format!("schemas.{name}"),
                    reason: "expected a table of plugin options".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("notekeeper").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing
    /// if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = NotekeeperConfig::default();
        assert_eq!(config.history.empty_log, EmptyLogPolicy::NullBefore);
        assert!(config.schemas.is_empty());
        assert!(config.plugin_options("pokemon").is_none());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = Figment::from(Serialized::defaults(NotekeeperConfig::default()));
        let config = NotekeeperConfig::from_figment(&figment).expect("should extract defaults");
        assert_eq!(config.history.empty_log, EmptyLogPolicy::NullBefore);
    }

    #[test]
    fn non_table_schema_entry_is_invalid() {
        let mut config = NotekeeperConfig::default();
        config
            .schemas
            .insert("pokemon".into(), serde_json::json!(["name"]));
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "schemas.pokemon")
        );
    }
}
