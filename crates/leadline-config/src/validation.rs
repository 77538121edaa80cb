// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths and value ranges.

use crate::diagnostic::ConfigError;
use crate::model::LeadlineConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &LeadlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.crm.contact_hour > 23 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crm.contact_hour must be between 0 and 23, got {}",
                config.crm.contact_hour
            ),
        });
    }

    if config.crm.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "crm.history_limit must be greater than 0".to_string(),
        });
    }

    let level = config.bot.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` is not one of {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "telegram.bot_token must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&LeadlineConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = LeadlineConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn contact_hour_out_of_range_fails() {
        let mut config = LeadlineConfig::default();
        config.crm.contact_hour = 24;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "contact_hour"));
    }

    #[test]
    fn zero_history_limit_fails() {
        let mut config = LeadlineConfig::default();
        config.crm.history_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "history_limit"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = LeadlineConfig::default();
        config.storage.database_path = String::new();
        config.crm.contact_hour = 99;
        config.crm.history_limit = 0;
        config.bot.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = LeadlineConfig::default();
        config.bot.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn blank_token_fails() {
        let mut config = LeadlineConfig::default();
        config.telegram.bot_token = Some(" ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "bot_token"));
    }
}
