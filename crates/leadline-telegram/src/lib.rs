// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Leadline CRM bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for private-chat messages, shared contacts and button
//! presses, HTML replies with inline or menu keyboards, and callback
//! query answers.

pub mod handler;
pub mod keyboard;

use async_trait::async_trait;
use leadline_config::model::TelegramConfig;
use leadline_core::LeadlineError;
use leadline_core::traits::{ChannelAdapter, PluginAdapter};
use leadline_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundMessage, MessageId, OutboundMessage,
    ParseMode as OutboundParseMode,
};
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, ChatId, ParseMode};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram's limit on the length of one message.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, LeadlineError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            LeadlineError::Config("telegram.bot_token is required to serve".into())
        })?;

        if token.trim().is_empty() {
            return Err(LeadlineError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn channel_error(context: &str, e: teloxide::RequestError) -> LeadlineError {
    LeadlineError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadlineError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), LeadlineError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_inline_keyboards: true,
            supports_contacts: true,
            max_message_length: Some(MAX_MESSAGE_LENGTH),
        }
    }

    async fn connect(&mut self) -> Result<(), LeadlineError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        if !handler::is_dm(&msg) {
                            debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                            return respond(());
                        }
                        match handler::extract_content(&msg) {
                            Some(content) => {
                                let inbound = handler::to_inbound_message(&msg, content);
                                if tx.send(inbound).await.is_err() {
                                    warn!("inbound channel closed, dropping message");
                                }
                            }
                            None => {
                                debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                            }
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |query: CallbackQuery| {
                        let tx = callback_tx.clone();
                        async move {
                            match handler::callback_to_inbound(&query) {
                                Some(inbound) => {
                                    if tx.send(inbound).await.is_err() {
                                        warn!("inbound channel closed, dropping button press");
                                    }
                                }
                                None => debug!("ignoring button press without data"),
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    /// Sends the text in chunks of at most [`MAX_MESSAGE_LENGTH`] characters;
    /// the keyboard is attached to the last chunk.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, LeadlineError> {
        let chat_id = ChatId(msg.conversation.0);
        let chunks = split_message(&msg.text, MAX_MESSAGE_LENGTH);
        let last = chunks.len() - 1;
        let mut sent_id = None;

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut request = self.bot.send_message(chat_id, chunk);
            if msg.parse_mode == OutboundParseMode::Html {
                request = request.parse_mode(ParseMode::Html);
            }
            if i == last
                && let Some(keyboard) = &msg.keyboard
            {
                request = request.reply_markup(keyboard::to_reply_markup(keyboard));
            }
            let sent = request
                .await
                .map_err(|e| channel_error("failed to send message", e))?;
            sent_id = Some(sent.id.0);
        }

        let id = sent_id.ok_or_else(|| LeadlineError::Internal("no message sent".into()))?;
        Ok(MessageId(id.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, LeadlineError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| LeadlineError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }

    async fn answer_button(
        &self,
        query_id: &str,
        notice: Option<&str>,
    ) -> Result<(), LeadlineError> {
        let mut request = self
            .bot
            .answer_callback_query(CallbackQueryId(query_id.to_string()));
        if let Some(notice) = notice {
            request = request.text(notice);
        }
        request
            .await
            .map_err(|e| channel_error("failed to answer callback query", e))?;
        Ok(())
    }
}

/// Splits text into chunks of at most `max` characters, preferring line
/// breaks. Always returns at least one chunk.
pub fn split_message(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
