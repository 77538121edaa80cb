// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Leadline CRM bot.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed operations for clients,
//! companies, interactions and suggestions.
//!
//! All writes are serialized through the one background connection owned by
//! [`Database`]; query modules take `&Database` and go through
//! `connection().call()`. Do not open extra connections for writes.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
