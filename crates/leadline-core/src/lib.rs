// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadline CRM bot.
//!
//! This crate provides the domain model, the error type, the chat message
//! types and the adapter traits used throughout the workspace. The storage
//! and channel adapters implement traits defined here.

pub mod error;
pub mod model;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LeadlineError;
pub use types::{AdapterType, ConversationId, HealthStatus, MessageId};

pub use traits::{ChannelAdapter, CrmRepository, PluginAdapter, StorageAdapter};
