// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-slot edit flows keyed to one client or company.

use leadline_core::LeadlineError;
use leadline_core::model::{
    Client, ClientChange, ClientId, ClientStatus, Company, CompanyChange, CompanyId,
    CompanyStatus, EntityKind, InteractionId, InteractionResult, InterestLevel, NewInteraction,
    PriorityLevel,
};
use tracing::info;

use crate::engine::{FlowEngine, Transition, found, gone};
use crate::normalize::optional_field;
use crate::render;
use crate::reply::Reply;
use crate::schedule::NextContactChoice;
use crate::state::FlowState;

impl FlowEngine {
    pub(crate) fn start_client_status(&self, client: ClientId) -> Transition {
        Transition::to(
            FlowState::ClientStatus { client },
            Reply::text("New status:").with_keyboard(render::client_status_keyboard()),
        )
    }

    pub(crate) fn start_client_interest(&self, client: ClientId) -> Transition {
        Transition::to(
            FlowState::ClientInterest { client },
            Reply::text("Interest level?").with_keyboard(render::interest_keyboard()),
        )
    }

    pub(crate) fn start_client_comment(&self, client: ClientId) -> Transition {
        Transition::to(
            FlowState::ClientComment { client },
            Reply::text("Send a comment, or '-' to skip."),
        )
    }

    pub(crate) fn start_next_contact(&self, client: ClientId) -> Transition {
        Transition::to(
            FlowState::NextContact { client },
            Reply::text("When to contact next?").with_keyboard(render::next_contact_keyboard()),
        )
    }

    pub(crate) fn start_call_result(&self, client: ClientId) -> Transition {
        Transition::to(
            FlowState::CallResult { client },
            Reply::text("How did the call go?").with_keyboard(render::call_result_keyboard()),
        )
    }

    pub(crate) fn start_company_status(&self, company: CompanyId) -> Transition {
        Transition::to(
            FlowState::CompanyStatus { company },
            Reply::text("New status:").with_keyboard(render::company_status_keyboard()),
        )
    }

    pub(crate) fn start_company_priority(&self, company: CompanyId) -> Transition {
        Transition::to(
            FlowState::CompanyPriority { company },
            Reply::text("Priority:").with_keyboard(render::priority_keyboard()),
        )
    }

    pub(crate) fn start_company_note(&self, company: CompanyId) -> Transition {
        Transition::to(
            FlowState::CompanyNote { company },
            Reply::text("Send the note, or '-' to clear it."),
        )
    }

    /// Store one field of a client. `None` when it no longer exists.
    async fn edit_client(
        &self,
        id: ClientId,
        change: ClientChange,
    ) -> Result<Option<Client>, LeadlineError> {
        found(self.repo().change_client(id, change).await)
    }

    async fn edit_company(
        &self,
        id: CompanyId,
        change: CompanyChange,
    ) -> Result<Option<Company>, LeadlineError> {
        found(self.repo().change_company(id, change).await)
    }

    pub(crate) async fn apply_client_status(
        &self,
        client: ClientId,
        status: ClientStatus,
    ) -> Result<Transition, LeadlineError> {
        Ok(match self.edit_client(client, ClientChange::Status(status)).await? {
            Some(_) => Transition::idle(Reply::text("Status updated.")),
            None => Transition::idle(gone(EntityKind::Client)),
        })
    }

    pub(crate) async fn apply_client_interest(
        &self,
        client: ClientId,
        interest: InterestLevel,
    ) -> Result<Transition, LeadlineError> {
        Ok(match self.edit_client(client, ClientChange::Interest(interest)).await? {
            Some(_) => Transition::idle(Reply::text("Interest updated.")),
            None => Transition::idle(gone(EntityKind::Client)),
        })
    }

    pub(crate) async fn apply_next_contact(
        &self,
        client: ClientId,
        choice: NextContactChoice,
    ) -> Result<Transition, LeadlineError> {
        let at = choice.resolve(self.now(), self.settings.contact_hour);
        Ok(match self.edit_client(client, ClientChange::NextContact(at)).await? {
            Some(_) => Transition::idle(Reply::text("Next contact date updated.")),
            None => Transition::idle(gone(EntityKind::Client)),
        })
    }

    /// Store the new status and its call entry together, then ask for a comment.
    pub(crate) async fn apply_call_result(
        &self,
        client: ClientId,
        status: ClientStatus,
    ) -> Result<Transition, LeadlineError> {
        let Some(interaction) = found(self.repo().log_call(client, status).await)? else {
            return Ok(Transition::idle(gone(EntityKind::Client)));
        };
        info!(client_id = client.0, %status, "call logged");
        Ok(Transition::to(
            FlowState::CallComment {
                client,
                interaction: interaction.id,
            },
            Reply::text("Call result saved. Send a comment, or '-' to skip."),
        ))
    }

    pub(crate) async fn save_call_comment(
        &self,
        _client: ClientId,
        interaction: InteractionId,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        let Some(comment) = optional_field(text) else {
            return Ok(Transition::idle(Reply::text("Skipped.")));
        };
        let saved = found(
            self.repo()
                .set_interaction_comment(interaction, Some(&comment))
                .await,
        )?;
        Ok(match saved {
            Some(()) => Transition::idle(Reply::text("Comment saved.")),
            None => Transition::idle(gone(EntityKind::Client)),
        })
    }

    /// A standalone comment is logged as a message carrying the current status.
    pub(crate) async fn save_client_comment(
        &self,
        client: ClientId,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        let Some(comment) = optional_field(text) else {
            return Ok(Transition::idle(Reply::text("Skipped.")));
        };
        let Some(current) = self.repo().get_client(client).await? else {
            return Ok(Transition::idle(gone(EntityKind::Client)));
        };
        let entry = NewInteraction {
            client_id: client,
            result: InteractionResult::Message,
            status_after: current.status,
            comment: Some(comment),
        };
        Ok(match found(self.repo().add_interaction(&entry).await)? {
            Some(_) => Transition::idle(Reply::text("Comment saved.")),
            None => Transition::idle(gone(EntityKind::Client)),
        })
    }

    pub(crate) async fn apply_company_status(
        &self,
        company: CompanyId,
        status: CompanyStatus,
    ) -> Result<Transition, LeadlineError> {
        Ok(match self.edit_company(company, CompanyChange::Status(status)).await? {
            Some(_) => Transition::idle(Reply::text("Status updated.")),
            None => Transition::idle(gone(EntityKind::Company)),
        })
    }

    pub(crate) async fn apply_company_priority(
        &self,
        company: CompanyId,
        priority: PriorityLevel,
    ) -> Result<Transition, LeadlineError> {
        Ok(match self.edit_company(company, CompanyChange::Priority(priority)).await? {
            Some(_) => Transition::idle(Reply::text("Priority updated.")),
            None => Transition::idle(gone(EntityKind::Company)),
        })
    }

    /// `-` or blank clears the note.
    pub(crate) async fn save_company_note(
        &self,
        company: CompanyId,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        let note = optional_field(text);
        Ok(match self.edit_company(company, CompanyChange::Note(note)).await? {
            Some(_) => Transition::idle(Reply::text("Note updated.")),
            None => Transition::idle(gone(EntityKind::Company)),
        })
    }
}
