// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow handlers, one module per flow family.
//!
//! Each handler is a method on [`FlowEngine`](crate::engine::FlowEngine)
//! returning a [`Transition`](crate::engine::Transition); none of them
//! touches the session store directly.

mod add_client;
mod add_company;
mod bulk;
mod edit;
mod search;
mod views;

use leadline_core::LeadlineError;
use leadline_core::model::SuggestionKind;

use crate::engine::FlowEngine;
use crate::render;
use crate::reply::Reply;
use crate::suggest;

impl FlowEngine {
    /// City prompt with remembered cities as quick picks.
    pub(crate) async fn city_prompt(&self) -> Result<Reply, LeadlineError> {
        let cities = suggest::list(self.repo(), SuggestionKind::City).await?;
        Ok(
            Reply::text("City (pick one below or type your own, '-' to skip):")
                .with_optional_keyboard(render::suggestion_keyboard(SuggestionKind::City, &cities)),
        )
    }

    /// Niche prompt with remembered niches as quick picks.
    pub(crate) async fn niche_prompt(&self) -> Result<Reply, LeadlineError> {
        let niches = suggest::list(self.repo(), SuggestionKind::Niche).await?;
        Ok(
            Reply::text("Niche (pick one below or type your own, '-' to skip):")
                .with_optional_keyboard(render::suggestion_keyboard(
                    SuggestionKind::Niche,
                    &niches,
                )),
        )
    }
}
