// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`FlowEngine`] over a temp SQLite database and
//! drives it with text, contact and button events, returning each turn's
//! outcome for assertions.

use std::sync::Arc;

use leadline_config::model::StorageConfig;
use leadline_core::types::{MessageContent, ParseMode};
use leadline_core::{ConversationId, CrmRepository, LeadlineError, StorageAdapter};
use leadline_flow::{EngineSettings, FlowEngine, FlowState, TurnOutcome};
use leadline_storage::SqliteStorage;

use crate::mock_channel::inbound;

/// Conversation used by the single-chat helpers.
pub const DEFAULT_CHAT: ConversationId = ConversationId(1);

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    settings: EngineSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the test harness with a fresh temp database.
    pub async fn build(self) -> Result<TestHarness, LeadlineError> {
        let temp_dir = tempfile::TempDir::new().map_err(LeadlineError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;
        let storage = Arc::new(storage);

        let repo: Arc<dyn CrmRepository> = storage.clone();
        let engine = Arc::new(FlowEngine::new(repo, self.settings));

        Ok(TestHarness {
            storage,
            engine,
            _temp_dir: temp_dir,
        })
    }
}

/// A flow engine over temp storage.
pub struct TestHarness {
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    pub engine: Arc<FlowEngine>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings.
    pub async fn new() -> Result<Self, LeadlineError> {
        Self::builder().build().await
    }

    pub fn repo(&self) -> &dyn CrmRepository {
        self.storage.as_ref()
    }

    /// Active flow of the default conversation.
    pub fn state(&self) -> FlowState {
        self.engine.sessions().get(DEFAULT_CHAT)
    }

    pub async fn text(&self, body: &str) -> Result<TurnOutcome, LeadlineError> {
        self.text_in(DEFAULT_CHAT, body).await
    }

    pub async fn text_in(
        &self,
        chat: ConversationId,
        body: &str,
    ) -> Result<TurnOutcome, LeadlineError> {
        self.engine
            .handle(&inbound(chat, MessageContent::Text(body.to_string())))
            .await
    }

    pub async fn contact(&self, phone: &str) -> Result<TurnOutcome, LeadlineError> {
        self.engine
            .handle(&inbound(
                DEFAULT_CHAT,
                MessageContent::Contact {
                    phone: phone.to_string(),
                },
            ))
            .await
    }

    /// Press a button carrying `token`.
    pub async fn button(&self, token: &str) -> Result<TurnOutcome, LeadlineError> {
        self.button_in(DEFAULT_CHAT, token).await
    }

    pub async fn button_in(
        &self,
        chat: ConversationId,
        token: &str,
    ) -> Result<TurnOutcome, LeadlineError> {
        self.engine
            .handle(&inbound(
                chat,
                MessageContent::Button {
                    data: token.to_string(),
                    query_id: Some(format!("query-{}", uuid::Uuid::new_v4())),
                },
            ))
            .await
    }
}

/// Text of the first reply, or `""` for a silent turn.
pub fn first_text(outcome: &TurnOutcome) -> &str {
    outcome
        .replies
        .first()
        .map(|reply| reply.text.as_str())
        .unwrap_or_default()
}

/// Callback tokens of the first reply's inline keyboard.
pub fn first_tokens(outcome: &TurnOutcome) -> Vec<String> {
    outcome
        .replies
        .first()
        .and_then(|reply| reply.keyboard.as_ref())
        .map(|kb| kb.tokens().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Whether the first reply is rendered as HTML.
pub fn is_html(outcome: &TurnOutcome) -> bool {
    outcome
        .replies
        .first()
        .is_some_and(|reply| reply.parse_mode == ParseMode::Html)
}
