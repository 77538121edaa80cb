// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What one turn sends back to the conversation.

use leadline_core::types::{Keyboard, ParseMode};

/// One outbound message produced by a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: ParseMode,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    /// Plain text; no markup is interpreted.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Plain,
            keyboard: None,
        }
    }

    /// HTML text. Interpolated user data must already be escaped.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Html,
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_optional_keyboard(mut self, keyboard: Option<Keyboard>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

/// Result of processing one inbound event.
///
/// An empty outcome is a silent acknowledgement: the event was dropped
/// without mutating anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    pub replies: Vec<Reply>,
    /// Short notice shown when a button press is acknowledged.
    pub notice: Option<String>,
}

impl TurnOutcome {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn reply(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn is_silent(&self) -> bool {
        self.replies.is_empty() && self.notice.is_none()
    }
}
