// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Add company: name, city, niche, phone, source, priority, contact person, note.

use leadline_core::LeadlineError;
use leadline_core::model::{
    CompanySource, CompanyStatus, NewCompany, PriorityLevel, SuggestionKind,
};
use tracing::info;

use crate::engine::{FlowEngine, PICK_A_BUTTON, Transition};
use crate::menu;
use crate::normalize::optional_field;
use crate::render;
use crate::reply::Reply;
use crate::state::{AddCompanyStep, CompanyDraft, FlowState};
use crate::suggest;

fn at(step: AddCompanyStep, draft: CompanyDraft) -> FlowState {
    FlowState::AddCompany { step, draft }
}

impl FlowEngine {
    pub(crate) fn start_add_company(&self) -> Transition {
        Transition::to(
            at(AddCompanyStep::Name, CompanyDraft::default()),
            Reply::text("Company name:"),
        )
    }

    pub(crate) async fn add_company_text(
        &self,
        step: AddCompanyStep,
        mut draft: CompanyDraft,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        let value = optional_field(text);
        match step {
            AddCompanyStep::Name => match value {
                Some(name) => {
                    draft.name = name;
                    Ok(Transition::to(at(AddCompanyStep::City, draft), self.city_prompt().await?))
                }
                None => Ok(Transition::to(
                    at(AddCompanyStep::Name, draft),
                    Reply::text("Company name cannot be empty. Company name:"),
                )),
            },
            AddCompanyStep::City => self.add_company_city(draft, value).await,
            AddCompanyStep::Niche => self.add_company_niche(draft, value).await,
            AddCompanyStep::Phone => {
                draft.phone = value;
                Ok(Transition::to(
                    at(AddCompanyStep::Source, draft),
                    Reply::text("Source:").with_keyboard(render::company_source_keyboard()),
                ))
            }
            AddCompanyStep::Source => Ok(Transition::to(
                at(AddCompanyStep::Source, draft),
                Reply::text(PICK_A_BUTTON).with_keyboard(render::company_source_keyboard()),
            )),
            AddCompanyStep::Priority => Ok(Transition::to(
                at(AddCompanyStep::Priority, draft),
                Reply::text(PICK_A_BUTTON).with_keyboard(render::priority_keyboard()),
            )),
            AddCompanyStep::ContactPerson => {
                draft.contact_person = value;
                Ok(Transition::to(
                    at(AddCompanyStep::Note, draft),
                    Reply::text("Note (or '-' to skip):"),
                ))
            }
            AddCompanyStep::Note => self.add_company_finish(draft, value).await,
        }
    }

    /// Typed and picked cities both land here and are both remembered.
    pub(crate) async fn add_company_city(
        &self,
        mut draft: CompanyDraft,
        city: Option<String>,
    ) -> Result<Transition, LeadlineError> {
        suggest::record(self.repo(), SuggestionKind::City, city.as_deref()).await?;
        draft.city = city;
        Ok(Transition::to(
            at(AddCompanyStep::Niche, draft),
            self.niche_prompt().await?,
        ))
    }

    pub(crate) async fn add_company_niche(
        &self,
        mut draft: CompanyDraft,
        niche: Option<String>,
    ) -> Result<Transition, LeadlineError> {
        suggest::record(self.repo(), SuggestionKind::Niche, niche.as_deref()).await?;
        draft.niche = niche;
        Ok(Transition::to(
            at(AddCompanyStep::Phone, draft),
            Reply::text("Phone (or '-' if none):"),
        ))
    }

    pub(crate) fn add_company_source(
        &self,
        mut draft: CompanyDraft,
        source: CompanySource,
    ) -> Transition {
        draft.source = Some(source);
        Transition::to(
            at(AddCompanyStep::Priority, draft),
            Reply::text("Priority:").with_keyboard(render::priority_keyboard()),
        )
    }

    pub(crate) fn add_company_priority(
        &self,
        mut draft: CompanyDraft,
        priority: PriorityLevel,
    ) -> Transition {
        draft.priority = Some(priority);
        Transition::to(
            at(AddCompanyStep::ContactPerson, draft),
            Reply::text("Contact person (or '-' to skip):"),
        )
    }

    async fn add_company_finish(
        &self,
        draft: CompanyDraft,
        note: Option<String>,
    ) -> Result<Transition, LeadlineError> {
        let new_company = NewCompany {
            name: draft.name,
            city: draft.city,
            niche: draft.niche,
            phone: draft.phone,
            site: None,
            source: draft.source.unwrap_or(CompanySource::Found),
            status: CompanyStatus::NotCalled,
            priority: draft.priority.unwrap_or(PriorityLevel::Medium),
            contact_person: draft.contact_person,
            note,
        };
        let company = self.repo().create_company(&new_company).await?;
        info!(company_id = company.id.0, "company created");
        Ok(Transition::idle(
            Reply::html(render::company_card(&company)).with_keyboard(menu::main_menu()),
        ))
    }
}
