// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat transports (Telegram, test doubles).

use async_trait::async_trait;

use crate::error::LeadlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, InboundMessage, MessageId, OutboundMessage};

/// Adapter for a bidirectional chat transport.
///
/// Inbound events are free-text messages, shared contacts and button presses;
/// outbound messages are a text body plus an optional keyboard.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Returns the capabilities supported by this channel.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), LeadlineError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, LeadlineError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundMessage, LeadlineError>;

    /// Acknowledges a button press, optionally showing a short notice.
    async fn answer_button(
        &self,
        query_id: &str,
        notice: Option<&str>,
    ) -> Result<(), LeadlineError>;
}
