// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite).

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::traits::adapter::PluginAdapter;

/// Lifecycle of a storage backend.
///
/// Domain queries live on [`CrmRepository`](crate::traits::CrmRepository);
/// this trait only opens and closes the backend.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, PRAGMAs).
    async fn initialize(&self) -> Result<(), LeadlineError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), LeadlineError>;
}
