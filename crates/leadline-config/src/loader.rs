// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./leadline.toml` > `~/.config/leadline/leadline.toml`
//! > `/etc/leadline/leadline.toml`, with environment variable overrides via the
//! `LEADLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LeadlineConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/leadline/leadline.toml";
pub(crate) const LOCAL_CONFIG: &str = "leadline.toml";

/// Sections that environment variables may target.
const ENV_SECTIONS: &[&str] = &["bot", "telegram", "storage", "crm"];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("leadline/leadline.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leadline/leadline.toml`
/// 3. `~/.config/leadline/leadline.toml`
/// 4. `./leadline.toml`
/// 5. `LEADLINE_*` environment variables
pub fn load_config() -> Result<LeadlineConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LeadlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeadlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LeadlineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `LEADLINE_TELEGRAM_BOT_TOKEN` lands on `telegram.bot_token`.
fn env_provider() -> Env {
    Env::prefixed("LEADLINE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(field) = rest.strip_prefix('_')
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("crm_contact_hour"), "crm.contact_hour");
        assert_eq!(map_env_key("bot_log_level"), "bot.log_level");
    }

    #[test]
    fn unknown_prefix_is_left_alone() {
        assert_eq!(map_env_key("metrics_port"), "metrics_port");
        assert_eq!(map_env_key("crmx_value"), "crmx_value");
    }
}
