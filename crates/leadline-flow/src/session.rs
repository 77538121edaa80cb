// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store keyed by conversation.
//!
//! Holds the active [`FlowState`] of every conversation plus one async mutex
//! per conversation. A turn holds its conversation's lock from the first
//! read of the state to the final write, so two turns of the same
//! conversation never interleave while other conversations proceed.

use std::sync::Arc;

use dashmap::DashMap;
use leadline_core::ConversationId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::state::FlowState;

#[derive(Debug, Default)]
pub struct SessionStore {
    states: DashMap<ConversationId, FlowState>,
    locks: DashMap<ConversationId, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the turn lock of a conversation.
    pub async fn lock(&self, conversation: ConversationId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(conversation)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Current state; [`FlowState::Idle`] when nothing is stored.
    pub fn get(&self, conversation: ConversationId) -> FlowState {
        self.states
            .get(&conversation)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Replace the state. Storing `Idle` removes the entry.
    pub fn set(&self, conversation: ConversationId, state: FlowState) {
        if state.is_idle() {
            self.states.remove(&conversation);
        } else {
            self.states.insert(conversation, state);
        }
    }

    pub fn clear(&self, conversation: ConversationId) {
        self.states.remove(&conversation);
    }

    /// Number of conversations with an active flow.
    pub fn active(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::state::{AddClientStep, BulkStep};

    #[test]
    fn missing_conversation_is_idle() {
        let store = SessionStore::new();
        assert!(store.get(ConversationId(1)).is_idle());
    }

    #[test]
    fn set_replaces_previous_flow() {
        let store = SessionStore::new();
        let chat = ConversationId(7);
        store.set(
            chat,
            FlowState::AddClient(AddClientStep::Name {
                phone: "+1".into(),
            }),
        );
        store.set(chat, FlowState::BulkCompanies(BulkStep::Entries));
        assert_eq!(store.get(chat), FlowState::BulkCompanies(BulkStep::Entries));
        assert_eq!(store.active(), 1);
    }

    #[test]
    fn idle_and_clear_drop_the_entry() {
        let store = SessionStore::new();
        let chat = ConversationId(3);
        store.set(chat, FlowState::AddClient(AddClientStep::Phone));
        store.set(chat, FlowState::Idle);
        assert_eq!(store.active(), 0);

        store.set(chat, FlowState::AddClient(AddClientStep::Phone));
        store.clear(chat);
        assert!(store.get(chat).is_idle());
    }

    #[test]
    fn conversations_are_independent() {
        let store = SessionStore::new();
        store.set(ConversationId(1), FlowState::AddClient(AddClientStep::Phone));
        assert!(store.get(ConversationId(2)).is_idle());
    }

    #[tokio::test]
    async fn lock_serializes_one_conversation() {
        let store = Arc::new(SessionStore::new());
        let chat = ConversationId(9);
        let guard = store.lock(chat).await;

        let other = store.clone();
        let waiter = tokio::spawn(async move {
            let _guard = other.lock(chat).await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        let _other_chat = store.lock(ConversationId(10)).await;
        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
