// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Leadline configuration system.

use leadline_config::diagnostic::ConfigError;
use leadline_config::model::LeadlineConfig;
use leadline_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_leadline_config() {
    let toml = r#"
[bot]
name = "sales-bot"
log_level = "debug"

[telegram]
bot_token = "123:ABC"

[storage]
database_path = "/tmp/crm.db"
wal_mode = false

[crm]
contact_hour = 9
history_limit = 25
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "sales-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.storage.database_path, "/tmp/crm.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.crm.contact_hour, 9);
    assert_eq!(config.crm.history_limit, 25);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.bot.name, "leadline");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.storage.wal_mode);
    assert_eq!(config.crm.contact_hour, 12);
    assert_eq!(config.crm.history_limit, 10);
}

#[test]
fn unknown_field_in_telegram_produces_error() {
    let err = load_config_from_str("[telegram]\nallowed_users = [\"a\"]\n")
        .expect_err("access lists are not configurable");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("allowed_users"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[anthropic]\napi_key = \"x\"\n")
        .expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(err_str.contains("unknown field") || err_str.contains("anthropic"));
}

/// Dotted overrides (what the env provider produces) land on the right fields.
#[test]
fn dotted_override_sets_nested_keys() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: LeadlineConfig = Figment::new()
        .merge(Serialized::defaults(LeadlineConfig::default()))
        .merge(Toml::string("[crm]\ncontact_hour = 8\n"))
        .merge(("crm.contact_hour", 15))
        .merge(("telegram.bot_token", "xyz-from-env"))
        .extract()
        .expect("should merge overrides");

    assert_eq!(config.crm.contact_hour, 15);
    assert_eq!(config.telegram.bot_token.as_deref(), Some("xyz-from-env"));
}

#[test]
fn unknown_key_gets_suggestion_and_valid_keys() {
    let errors = load_and_validate_str("[crm]\ncontact_hur = 9\n").expect_err("should fail");

    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "contact_hur"
                && suggestion.as_deref() == Some("contact_hour")
                && valid_keys.contains("history_limit")
        })
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

#[test]
fn invalid_type_is_reported() {
    let errors =
        load_and_validate_str("[crm]\ncontact_hour = \"noon\"\n").expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_deserialization() {
    let errors = load_and_validate_str("[crm]\ncontact_hour = 30\nhistory_limit = 0\n")
        .expect_err("out of range values should fail");
    assert_eq!(
        errors
            .iter()
            .filter(|e| matches!(e, ConfigError::Validation { .. }))
            .count(),
        2
    );
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "contact_hur".to_string(),
        suggestion: Some("contact_hour".to_string()),
        valid_keys: "contact_hour, history_limit".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `contact_hour`"));

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("contact_hur"));
}

#[test]
fn load_from_file_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leadline.toml");
    std::fs::write(&path, "[crm]\nhistory_limit = 3\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should load");
    assert_eq!(config.crm.history_limit, 3);
}

#[test]
fn load_and_validate_str_accepts_valid_toml() {
    let config = load_and_validate_str("[bot]\nname = \"x\"\n").expect("should validate");
    assert_eq!(config.bot.name, "x");
}
