// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits: conversations, messages and keyboards.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies one conversation (one private chat with one human).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
}

/// Content of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Free text typed by the user (menu labels and commands included).
    Text(String),
    /// A shared contact card.
    Contact { phone: String },
    /// A button press carrying an opaque `namespace:argument...` token.
    Button {
        data: String,
        /// Transport handle used to acknowledge the press.
        query_id: Option<String>,
    },
}

/// An inbound event received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub conversation: ConversationId,
    pub channel: String,
    pub sender_id: String,
    pub content: MessageContent,
    /// RFC 3339 timestamp of the event.
    pub timestamp: String,
}

/// How the outbound text must be interpreted by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Plain,
    /// Limited HTML (`<b>`, `<code>`); user data must be escaped.
    Html,
}

/// What happens when a button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Sends the opaque token back as a [`MessageContent::Button`].
    Callback(String),
    /// Opens an external link.
    Url(String),
}

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(token.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    /// The callback token, if this is a callback button.
    pub fn token(&self) -> Option<&str> {
        match &self.action {
            ButtonAction::Callback(token) => Some(token),
            ButtonAction::Url(_) => None,
        }
    }
}

/// Keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Rows of buttons attached to the message itself.
    Inline(Vec<Vec<Button>>),
    /// Persistent menu of text labels replacing the user's keyboard.
    Menu(Vec<Vec<String>>),
}

impl Keyboard {
    /// All callback tokens of an inline keyboard, row by row.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Keyboard::Inline(rows) => rows.iter().flatten().filter_map(Button::token).collect(),
            Keyboard::Menu(_) => Vec::new(),
        }
    }
}

/// An outbound message to be delivered via a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub conversation: ConversationId,
    pub text: String,
    pub parse_mode: ParseMode,
    pub keyboard: Option<Keyboard>,
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone)]
pub struct ChannelCapabilities {
    pub supports_inline_keyboards: bool,
    pub supports_contacts: bool,
    pub max_message_length: Option<usize>,
}
