use figment::Jail;
use nk_config::{EmptyLogPolicy, NotekeeperConfig};
use serde_json::json;

#[test]
fn env_sets_history_policy() {
    Jail::expect_with(|jail| {
        jail.set_env("NOTEKEEPER_HISTORY__EMPTY_LOG", "reject");

        let config = NotekeeperConfig::load().expect("config loads");
        assert_eq!(config.history.empty_log, EmptyLogPolicy::Reject);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".notekeeper")?;
        jail.create_file(
            ".notekeeper/config.toml",
            r#"
[history]
empty_log = "reject"
"#,
        )?;
        jail.set_env("NOTEKEEPER_HISTORY__EMPTY_LOG", "null_before");

        let config = NotekeeperConfig::load().expect("config loads");
        assert_eq!(config.history.empty_log, EmptyLogPolicy::NullBefore);
        Ok(())
    });
}

#[test]
fn env_supplies_schema_fields() {
    Jail::expect_with(|jail| {
        jail.set_env("NOTEKEEPER_SCHEMAS__POKEMON__FIELDS", r#"["name"]"#);

        let config = NotekeeperConfig::load().expect("config loads");
        assert_eq!(
            config.plugin_options("pokemon"),
            Some(&json!({"fields": ["name"]}))
        );
        Ok(())
    });
}
