// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for the Leadline CRM bot.
//!
//! Turns chat events (text, shared contacts, button presses) into guided
//! data-entry flows, paginated list views and entity cards, persisting
//! through a [`CrmRepository`](leadline_core::CrmRepository).
//!
//! The [`FlowEngine`] owns per-conversation session state; the [`BotLoop`]
//! connects it to a [`ChannelAdapter`](leadline_core::ChannelAdapter).

pub mod bot;
pub mod callback;
pub mod engine;
mod flows;
pub mod list;
pub mod menu;
pub mod normalize;
pub mod render;
pub mod reply;
pub mod report;
pub mod schedule;
pub mod session;
pub mod shutdown;
pub mod state;
pub mod suggest;

pub use bot::{BotLoop, process_turn};
pub use callback::Callback;
pub use engine::{EngineSettings, FlowEngine};
pub use list::{ListPage, PAGE_SIZE};
pub use menu::MenuAction;
pub use reply::{Reply, TurnOutcome};
pub use session::SessionStore;
pub use state::FlowState;
