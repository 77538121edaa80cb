// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound messages and button answers for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use leadline_core::LeadlineError;
use leadline_core::traits::adapter::PluginAdapter;
use leadline_core::traits::channel::ChannelAdapter;
use leadline_core::types::{
    AdapterType, ChannelCapabilities, ConversationId, HealthStatus, InboundMessage,
    MessageContent, MessageId, OutboundMessage,
};

/// A button acknowledgement captured by [`MockChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredButton {
    pub query_id: String,
    pub notice: Option<String>,
}

/// A mock chat channel for testing.
///
/// Provides three queues:
/// - **inbound**: Events injected via `inject()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are retrievable via `sent_messages()`
/// - **answered**: Button acknowledgements, retrievable via `answered_buttons()`
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    answered: Arc<Mutex<Vec<AnsweredButton>>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            answered: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject an inbound event. The next call to `receive()` returns it.
    pub async fn inject(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn answered_buttons(&self) -> Vec<AnsweredButton> {
        self.answered.lock().await.clone()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an inbound event for `conversation`.
pub fn inbound(conversation: ConversationId, content: MessageContent) -> InboundMessage {
    InboundMessage {
        id: format!("test-{}", uuid::Uuid::new_v4()),
        conversation,
        channel: "mock".to_string(),
        sender_id: conversation.to_string(),
        content,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadlineError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_inline_keyboards: true,
            supports_contacts: true,
            max_message_length: None,
        }
    }

    async fn connect(&mut self) -> Result<(), LeadlineError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, LeadlineError> {
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundMessage, LeadlineError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            self.notify.notified().await;
        }
    }

    async fn answer_button(
        &self,
        query_id: &str,
        notice: Option<&str>,
    ) -> Result<(), LeadlineError> {
        self.answered.lock().await.push(AnsweredButton {
            query_id: query_id.to_string(),
            notice: notice.map(str::to_string),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::types::ParseMode;

    fn text(body: &str) -> InboundMessage {
        inbound(ConversationId(7), MessageContent::Text(body.to_string()))
    }

    fn outbound(body: &str) -> OutboundMessage {
        OutboundMessage {
            conversation: ConversationId(7),
            text: body.to_string(),
            parse_mode: ParseMode::Plain,
            keyboard: None,
        }
    }

    #[tokio::test]
    async fn receive_returns_injected_messages() {
        let channel = MockChannel::new();
        channel.inject(text("hello")).await;

        let received = channel.receive().await.unwrap();
        assert_eq!(received.sender_id, "7");
        match &received.content {
            MessageContent::Text(t) => assert_eq!(t, "hello"),
            _ => panic!("expected text content"),
        }
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        let msg_id = channel.send(outbound("response text")).await.unwrap();
        assert!(msg_id.0.starts_with("mock-msg-"));

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "response text");
        assert_eq!(sent[0].conversation, ConversationId(7));
    }

    #[tokio::test]
    async fn answer_button_is_recorded() {
        let channel = MockChannel::new();
        channel.answer_button("q-1", Some("City: Kazan")).await.unwrap();
        channel.answer_button("q-2", None).await.unwrap();

        let answered = channel.answered_buttons().await;
        assert_eq!(answered.len(), 2);
        assert_eq!(answered[0].notice.as_deref(), Some("City: Kazan"));
        assert!(answered[1].notice.is_none());
    }

    #[tokio::test]
    async fn multiple_messages_in_order() {
        let channel = MockChannel::new();
        channel.inject(text("first")).await;
        channel.inject(text("second")).await;

        let msg1 = channel.receive().await.unwrap();
        let msg2 = channel.receive().await.unwrap();
        match (&msg1.content, &msg2.content) {
            (MessageContent::Text(t1), MessageContent::Text(t2)) => {
                assert_eq!(t1, "first");
                assert_eq!(t2, "second");
            }
            _ => panic!("expected text content"),
        }
    }

    #[tokio::test]
    async fn receive_waits_for_injection() {
        let channel = Arc::new(MockChannel::new());
        let channel_clone = channel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            channel_clone.inject(text("delayed")).await;
        });

        let received = tokio::time::timeout(tokio::time::Duration::from_secs(2), channel.receive())
            .await
            .expect("receive timed out")
            .unwrap();
        match &received.content {
            MessageContent::Text(t) => assert_eq!(t, "delayed"),
            _ => panic!("expected text content"),
        }
    }

    #[tokio::test]
    async fn sent_count_and_clear() {
        let channel = MockChannel::new();
        assert_eq!(channel.sent_count().await, 0);
        channel.send(outbound("a")).await.unwrap();
        channel.send(outbound("b")).await.unwrap();
        assert_eq!(channel.sent_count().await, 2);
        channel.clear_sent().await;
        assert_eq!(channel.sent_count().await, 0);
    }
}
