// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadline CRM bot.

use thiserror::Error;

use crate::model::EntityKind;

/// The primary error type used across all Leadline adapter traits and core operations.
#[derive(Debug, Error)]
pub enum LeadlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message delivery).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// User input that cannot be accepted as-is. The message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness constraint was violated at the storage boundary.
    #[error("{entity} with {field} `{value}` already exists")]
    Duplicate {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },

    /// The referenced entity does not exist (never existed or already deleted).
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    /// Requested adapter was not found or is not configured.
    #[error("adapter not found: {adapter_type}/{name}")]
    AdapterNotFound { adapter_type: String, name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeadlineError {
    /// Wraps any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        LeadlineError::Storage {
            source: source.into(),
        }
    }

    /// Returns `true` for the duplicate-key failure reported by the repository.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, LeadlineError::Duplicate { .. })
    }

    /// Returns `true` when the referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LeadlineError::NotFound { .. })
    }
}
