// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search by phone, name or company.

use leadline_core::LeadlineError;
use leadline_core::model::{Client, Company};
use tracing::debug;

use crate::engine::{FlowEngine, Transition};
use crate::normalize::phone_search_key;
use crate::render;
use crate::reply::Reply;
use crate::state::{FlowState, SearchMode};

const QUERY_PROMPT: &str = "Enter a search query";

impl FlowEngine {
    pub(crate) fn start_search(&self, mode: SearchMode) -> Transition {
        Transition::to(FlowState::Search { mode }, Reply::text(QUERY_PROMPT))
    }

    pub(crate) async fn search(
        &self,
        mode: SearchMode,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        let query = text.trim();
        if query.is_empty() {
            return Ok(Transition::to(
                FlowState::Search { mode },
                Reply::text(QUERY_PROMPT),
            ));
        }
        let (clients, companies) = match mode {
            SearchMode::Phone => self.search_by_phone(query).await?,
            SearchMode::Name => (
                self.repo().search_clients_by_name(query).await?,
                self.repo().search_companies_by_name(query).await?,
            ),
            SearchMode::Company => (
                self.repo().search_clients_by_company_name(query).await?,
                self.repo().search_companies_by_name(query).await?,
            ),
        };
        debug!(%mode, clients = clients.len(), companies = companies.len(), "search finished");
        if clients.is_empty() && companies.is_empty() {
            return Ok(Transition::idle(Reply::text("Nothing found")));
        }
        Ok(Transition::idle(
            Reply::text("Results:")
                .with_keyboard(render::search_results_keyboard(&clients, &companies)),
        ))
    }

    /// Both sides are reduced to digits before the substring match.
    async fn search_by_phone(
        &self,
        query: &str,
    ) -> Result<(Vec<Client>, Vec<Company>), LeadlineError> {
        let needle = phone_search_key(query);
        if needle.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }
        let clients = self
            .repo()
            .all_clients()
            .await?
            .into_iter()
            .filter(|c| phone_search_key(&c.phone).contains(&needle))
            .collect();
        let companies = self
            .repo()
            .all_companies()
            .await?
            .into_iter()
            .filter(|c| {
                c.phone
                    .as_deref()
                    .is_some_and(|p| phone_search_key(p).contains(&needle))
            })
            .collect();
        Ok((clients, companies))
    }
}
