// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bulk add companies: a `phone-name` block, then a shared niche and city.

use leadline_core::LeadlineError;
use leadline_core::model::{
    CompanySource, CompanyStatus, NewCompany, PriorityLevel, SuggestionKind,
};
use tracing::info;

use crate::engine::{FlowEngine, Transition};
use crate::menu;
use crate::normalize::{BulkLine, optional_field, parse_bulk_block};
use crate::reply::Reply;
use crate::state::{BulkStep, FlowState};
use crate::suggest;

impl FlowEngine {
    pub(crate) fn start_bulk(&self) -> Transition {
        Transition::to(
            FlowState::BulkCompanies(BulkStep::Entries),
            Reply::text("Send the companies as 'phone-name', one per line:"),
        )
    }

    pub(crate) async fn bulk_text(
        &self,
        step: BulkStep,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        match step {
            BulkStep::Entries => match parse_bulk_block(text) {
                Ok(entries) => Ok(Transition::to(
                    FlowState::BulkCompanies(BulkStep::Niche { entries }),
                    self.niche_prompt().await?,
                )),
                Err(LeadlineError::Validation(message)) => Ok(Transition::to(
                    FlowState::BulkCompanies(BulkStep::Entries),
                    Reply::text(message),
                )),
                Err(e) => Err(e),
            },
            BulkStep::Niche { entries } => self.bulk_niche(entries, optional_field(text)).await,
            BulkStep::City { entries, niche } => {
                self.bulk_finish(entries, niche, optional_field(text)).await
            }
        }
    }

    pub(crate) async fn bulk_niche(
        &self,
        entries: Vec<BulkLine>,
        niche: Option<String>,
    ) -> Result<Transition, LeadlineError> {
        suggest::record(self.repo(), SuggestionKind::Niche, niche.as_deref()).await?;
        Ok(Transition::to(
            FlowState::BulkCompanies(BulkStep::City { entries, niche }),
            self.city_prompt().await?,
        ))
    }

    /// Insert every row in one batch with the shared niche and city.
    pub(crate) async fn bulk_finish(
        &self,
        entries: Vec<BulkLine>,
        niche: Option<String>,
        city: Option<String>,
    ) -> Result<Transition, LeadlineError> {
        suggest::record(self.repo(), SuggestionKind::City, city.as_deref()).await?;
        let companies: Vec<NewCompany> = entries
            .into_iter()
            .map(|line| NewCompany {
                name: line.name,
                city: city.clone(),
                niche: niche.clone(),
                phone: line.phone,
                site: None,
                source: CompanySource::Found,
                status: CompanyStatus::NotCalled,
                priority: PriorityLevel::Low,
                contact_person: None,
                note: None,
            })
            .collect();
        let created = self.repo().create_companies(&companies).await?;
        info!(count = created.len(), "companies added in bulk");
        Ok(Transition::idle(
            Reply::text(format!("Companies added: {}", created.len()))
                .with_keyboard(menu::main_menu()),
        ))
    }
}
