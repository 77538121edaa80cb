// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot loop: pulls inbound events from a channel and runs one turn per event.
//!
//! Every conversation gets its own queue drained by one worker task, so a
//! conversation's turns run and reply strictly in arrival order while
//! different conversations proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use leadline_core::types::{InboundMessage, MessageContent, OutboundMessage};
use leadline_core::{ChannelAdapter, ConversationId, LeadlineError};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::FlowEngine;
use crate::reply::{Reply, TurnOutcome};

const FAILURE_TEXT: &str = "Something went wrong. Please try again.";

/// Drives a [`FlowEngine`] from a [`ChannelAdapter`] until cancelled.
pub struct BotLoop {
    channel: Arc<dyn ChannelAdapter>,
    engine: Arc<FlowEngine>,
}

/// Per-conversation queues and the workers draining them.
struct Workers {
    queues: HashMap<ConversationId, mpsc::UnboundedSender<InboundMessage>>,
    tasks: JoinSet<()>,
}

impl BotLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, engine: Arc<FlowEngine>) -> Self {
        Self { channel, engine }
    }

    /// Runs until `cancel` fires or the channel closes, then waits for
    /// queued turns to finish.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), LeadlineError> {
        info!(channel = self.channel.name(), "bot loop running");
        let mut workers = Workers {
            queues: HashMap::new(),
            tasks: JoinSet::new(),
        };

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping bot loop");
                    break;
                }
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => self.dispatch(&mut workers, inbound),
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                Some(joined) = workers.tasks.join_next(), if !workers.tasks.is_empty() => {
                    // A worker only ends early by panicking; its dead queue
                    // is replaced on the conversation's next event.
                    if let Err(e) = joined {
                        error!(error = %e, "conversation worker failed");
                    }
                }
            }
        }

        // Closing the queues lets each worker finish what is already queued.
        workers.queues.clear();
        if !workers.tasks.is_empty() {
            info!(count = workers.tasks.len(), "waiting for conversation workers");
        }
        while let Some(joined) = workers.tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "conversation worker failed");
            }
        }
        info!("bot loop stopped");
        Ok(())
    }

    /// Queues the event behind earlier events of its conversation, starting a
    /// worker when the conversation has none.
    fn dispatch(&self, workers: &mut Workers, inbound: InboundMessage) {
        let chat = inbound.conversation;
        let inbound = match workers.queues.get(&chat) {
            Some(queue) => match queue.send(inbound) {
                Ok(()) => return,
                // The worker died; start a fresh one with this event.
                Err(mpsc::error::SendError(inbound)) => inbound,
            },
            None => inbound,
        };

        let (queue, rx) = mpsc::unbounded_channel();
        if queue.send(inbound).is_err() {
            error!(chat_id = chat.0, "conversation queue closed before start");
            return;
        }
        debug!(chat_id = chat.0, "conversation worker started");
        workers.queues.insert(chat, queue);
        workers.tasks.spawn(conversation_worker(
            Arc::clone(&self.channel),
            Arc::clone(&self.engine),
            chat,
            rx,
        ));
    }
}

/// Processes one conversation's events in order until its queue is closed.
async fn conversation_worker(
    channel: Arc<dyn ChannelAdapter>,
    engine: Arc<FlowEngine>,
    chat: ConversationId,
    mut rx: mpsc::UnboundedReceiver<InboundMessage>,
) {
    while let Some(inbound) = rx.recv().await {
        process_turn(channel.as_ref(), &engine, inbound).await;
    }
    debug!(chat_id = chat.0, "conversation worker stopped");
}

/// Runs one turn and delivers its outcome. Failures are reported to the
/// conversation as a generic message; the session is left as it was.
pub async fn process_turn(
    channel: &dyn ChannelAdapter,
    engine: &FlowEngine,
    inbound: InboundMessage,
) {
    let query_id = match &inbound.content {
        MessageContent::Button { query_id, .. } => query_id.clone(),
        _ => None,
    };
    let chat = inbound.conversation;

    let outcome = match engine.handle(&inbound).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(chat_id = chat.0, error = %e, "turn failed");
            TurnOutcome::reply(Reply::text(FAILURE_TEXT))
        }
    };

    if let Some(query_id) = query_id
        && let Err(e) = channel
            .answer_button(&query_id, outcome.notice.as_deref())
            .await
    {
        warn!(chat_id = chat.0, error = %e, "failed to answer button press");
    }

    if outcome.is_silent() {
        debug!(chat_id = chat.0, "turn produced no reply");
    }
    for reply in outcome.replies {
        let msg = OutboundMessage {
            conversation: chat,
            text: reply.text,
            parse_mode: reply.parse_mode,
            keyboard: reply.keyboard,
        };
        if let Err(e) = channel.send(msg).await {
            error!(chat_id = chat.0, error = %e, "failed to send reply");
        }
    }
}
