// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guided-entry engine: routes each inbound event by the active flow step.
//!
//! Routing is keyed strictly on the stored [`FlowState`]:
//! - menu labels and commands always win, even in the middle of a flow;
//! - free text goes to the active step, or is ignored when idle;
//! - choice buttons are accepted only by the step that offered them, and a
//!   mismatched press is dropped silently without touching the session.
//!
//! A turn computes the next state first and stores it only after every
//! persistence call of the turn succeeded, so a failed turn leaves the
//! session exactly as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use leadline_config::model::CrmConfig;
use leadline_core::model::EntityKind;
use leadline_core::types::{InboundMessage, MessageContent};
use leadline_core::{ConversationId, CrmRepository, LeadlineError};
use tracing::{debug, info};

use crate::callback::Callback;
use crate::menu::{self, MenuAction};
use crate::reply::{Reply, TurnOutcome};
use crate::session::SessionStore;
use crate::state::FlowState;

pub(crate) const PICK_A_BUTTON: &str = "Please pick one of the buttons above.";

/// Tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Hour of day (UTC) used by next-contact choices.
    pub contact_hour: u32,
    /// Number of interactions shown by the history view.
    pub history_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            contact_hour: 12,
            history_limit: 10,
        }
    }
}

impl From<&CrmConfig> for EngineSettings {
    fn from(config: &CrmConfig) -> Self {
        Self {
            contact_hour: config.contact_hour,
            history_limit: config.history_limit,
        }
    }
}

/// Next state plus the replies of one turn.
#[derive(Debug)]
pub(crate) struct Transition {
    pub next: FlowState,
    pub outcome: TurnOutcome,
}

impl Transition {
    pub fn to(next: FlowState, reply: Reply) -> Self {
        Self {
            next,
            outcome: TurnOutcome::reply(reply),
        }
    }

    /// Finish (or stay outside) any flow.
    pub fn idle(reply: Reply) -> Self {
        Self::to(FlowState::Idle, reply)
    }

    /// Keep the state and say nothing.
    pub fn ignore(state: FlowState) -> Self {
        Self {
            next: state,
            outcome: TurnOutcome::silent(),
        }
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.outcome = self.outcome.with_notice(notice);
        self
    }
}

/// Reply for an entity that no longer exists.
pub(crate) fn gone(entity: EntityKind) -> Reply {
    match entity {
        EntityKind::Company => Reply::text("This company was already deleted."),
        EntityKind::Interaction => Reply::text("This entry was already deleted."),
        EntityKind::Client | EntityKind::Suggestion => {
            Reply::text("This client was already deleted.")
        }
    }
}

/// Maps `NotFound` to `Ok(None)`; other errors pass through.
pub(crate) fn found<T>(result: Result<T, LeadlineError>) -> Result<Option<T>, LeadlineError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// The conversation engine shared by every conversation.
pub struct FlowEngine {
    pub(crate) repo: Arc<dyn CrmRepository>,
    pub(crate) sessions: SessionStore,
    pub(crate) settings: EngineSettings,
}

impl FlowEngine {
    pub fn new(repo: Arc<dyn CrmRepository>, settings: EngineSettings) -> Self {
        Self {
            repo,
            sessions: SessionStore::new(),
            settings,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(crate) fn repo(&self) -> &dyn CrmRepository {
        self.repo.as_ref()
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Process one inbound event to completion.
    ///
    /// Turns of one conversation are serialized; turns of different
    /// conversations may run concurrently.
    pub async fn handle(&self, inbound: &InboundMessage) -> Result<TurnOutcome, LeadlineError> {
        let chat = inbound.conversation;
        let _turn = self.sessions.lock(chat).await;
        let current = self.sessions.get(chat);
        let prior = current.clone();

        let transition = match &inbound.content {
            MessageContent::Text(text) => self.on_text(current, text).await?,
            MessageContent::Contact { phone } => self.on_contact(current, phone).await?,
            MessageContent::Button { data, .. } => self.on_button(current, data).await?,
        };

        log_transition(chat, &prior, &transition.next);
        self.sessions.set(chat, transition.next);
        Ok(transition.outcome)
    }

    async fn on_text(&self, current: FlowState, text: &str) -> Result<Transition, LeadlineError> {
        if let Some(action) = MenuAction::parse(text) {
            return self.on_menu(action).await;
        }
        match current {
            FlowState::Idle => {
                debug!("free text outside a flow ignored");
                Ok(Transition::ignore(FlowState::Idle))
            }
            FlowState::AddClient(step) => self.add_client_text(step, text).await,
            FlowState::AddCompany { step, draft } => self.add_company_text(step, draft, text).await,
            FlowState::BulkCompanies(step) => self.bulk_text(step, text).await,
            FlowState::CallComment {
                client,
                interaction,
            } => self.save_call_comment(client, interaction, text).await,
            FlowState::ClientComment { client } => self.save_client_comment(client, text).await,
            FlowState::CompanyNote { company } => self.save_company_note(company, text).await,
            FlowState::Search { mode } => self.search(mode, text).await,
            state @ (FlowState::ClientStatus { .. }
            | FlowState::ClientInterest { .. }
            | FlowState::CallResult { .. }
            | FlowState::NextContact { .. }
            | FlowState::CompanyStatus { .. }
            | FlowState::CompanyPriority { .. }) => {
                Ok(Transition::to(state, Reply::text(PICK_A_BUTTON)))
            }
        }
    }

    async fn on_contact(
        &self,
        current: FlowState,
        phone: &str,
    ) -> Result<Transition, LeadlineError> {
        match current {
            FlowState::AddClient(step) => self.add_client_contact(step, phone).await,
            state => {
                debug!(flow = state.flow(), "shared contact outside the phone step ignored");
                Ok(Transition::ignore(state))
            }
        }
    }

    async fn on_button(&self, current: FlowState, data: &str) -> Result<Transition, LeadlineError> {
        let Some(callback) = Callback::parse(data) else {
            debug!(token = data, "unknown button token dropped");
            return Ok(Transition::ignore(current));
        };
        match callback {
            Callback::Noop => Ok(Transition::ignore(current)),
            Callback::MainMenu => Ok(Transition::idle(
                Reply::text("Main menu").with_keyboard(menu::main_menu()),
            )),

            Callback::ClientList { filter, page } => self.client_list(current, filter, page).await,
            Callback::CompanyList { filter, page } => {
                self.company_list(current, filter, page).await
            }
            Callback::ShowClient(id) => self.show_client(current, id).await,
            Callback::ShowCompany(id) => self.show_company(current, id).await,
            Callback::History(id) => self.show_history(current, id).await,
            Callback::DeleteClient(id) => self.delete_client(current, id).await,
            Callback::DeleteCompany(id) => self.delete_company(current, id).await,

            Callback::ChangeStatus(id) => Ok(self.start_client_status(id)),
            Callback::ChangeInterest(id) => Ok(self.start_client_interest(id)),
            Callback::Comment(id) => Ok(self.start_client_comment(id)),
            Callback::SetNextContact(id) => Ok(self.start_next_contact(id)),
            Callback::LogCall(id) => Ok(self.start_call_result(id)),
            Callback::ChangeCompanyStatus(id) => Ok(self.start_company_status(id)),
            Callback::ChangeCompanyPriority(id) => Ok(self.start_company_priority(id)),
            Callback::CompanyNote(id) => Ok(self.start_company_note(id)),
            Callback::Search(mode) => Ok(self.start_search(mode)),

            choice => self.on_choice(current, choice).await,
        }
    }

    /// Choice buttons, accepted only by the step that offered them.
    async fn on_choice(
        &self,
        current: FlowState,
        choice: Callback,
    ) -> Result<Transition, LeadlineError> {
        use crate::state::{AddClientStep, AddCompanyStep, BulkStep};

        match (current, choice) {
            (
                FlowState::AddClient(AddClientStep::Source { phone, name }),
                Callback::ClientSource(source),
            ) => Ok(self.add_client_source(phone, name, source)),
            (
                FlowState::AddClient(AddClientStep::Interest {
                    phone,
                    name,
                    source,
                }),
                Callback::Interest(interest),
            ) => Ok(self.add_client_interest(phone, name, source, interest)),
            (
                FlowState::AddClient(AddClientStep::NextContact {
                    phone,
                    name,
                    source,
                    interest,
                }),
                Callback::NextContact(choice),
            ) => {
                self.add_client_finish(phone, name, source, interest, choice)
                    .await
            }

            (
                FlowState::AddCompany {
                    step: AddCompanyStep::City,
                    draft,
                },
                Callback::CitySuggestion(city),
            ) => {
                let notice = format!("City: {city}");
                Ok(self.add_company_city(draft, Some(city)).await?.with_notice(notice))
            }
            (
                FlowState::AddCompany {
                    step: AddCompanyStep::Niche,
                    draft,
                },
                Callback::NicheSuggestion(niche),
            ) => {
                let notice = format!("Niche: {niche}");
                Ok(self.add_company_niche(draft, Some(niche)).await?.with_notice(notice))
            }
            (
                FlowState::AddCompany {
                    step: AddCompanyStep::Source,
                    draft,
                },
                Callback::CompanySource(source),
            ) => Ok(self.add_company_source(draft, source)),
            (
                FlowState::AddCompany {
                    step: AddCompanyStep::Priority,
                    draft,
                },
                Callback::Priority(priority),
            ) => Ok(self.add_company_priority(draft, priority)),

            (
                FlowState::BulkCompanies(BulkStep::Niche { entries }),
                Callback::NicheSuggestion(niche),
            ) => {
                let notice = format!("Niche: {niche}");
                Ok(self.bulk_niche(entries, Some(niche)).await?.with_notice(notice))
            }
            (
                FlowState::BulkCompanies(BulkStep::City { entries, niche }),
                Callback::CitySuggestion(city),
            ) => {
                let notice = format!("City: {city}");
                Ok(self.bulk_finish(entries, niche, Some(city)).await?.with_notice(notice))
            }

            (FlowState::ClientStatus { client }, Callback::Status(status)) => {
                self.apply_client_status(client, status).await
            }
            (FlowState::ClientInterest { client }, Callback::Interest(interest)) => {
                self.apply_client_interest(client, interest).await
            }
            (FlowState::CallResult { client }, Callback::CallResult(status)) => {
                self.apply_call_result(client, status).await
            }
            (FlowState::NextContact { client }, Callback::NextContact(choice)) => {
                self.apply_next_contact(client, choice).await
            }
            (FlowState::CompanyStatus { company }, Callback::CompanyStatus(status)) => {
                self.apply_company_status(company, status).await
            }
            (FlowState::CompanyPriority { company }, Callback::Priority(priority)) => {
                self.apply_company_priority(company, priority).await
            }

            (state, choice) => {
                debug!(
                    flow = state.flow(),
                    step = state.step(),
                    token = %choice,
                    "button does not match the active step, dropped"
                );
                Ok(Transition::ignore(state))
            }
        }
    }
}

fn log_transition(chat: ConversationId, prior: &FlowState, next: &FlowState) {
    let chat_id = chat.0;
    match (prior.is_idle(), next.is_idle()) {
        (true, false) => info!(chat_id, flow = next.flow(), step = next.step(), "flow started"),
        (false, true) => info!(chat_id, flow = prior.flow(), step = prior.step(), "flow finished"),
        (false, false) if prior.flow() != next.flow() => info!(
            chat_id,
            from = prior.flow(),
            flow = next.flow(),
            "flow replaced"
        ),
        (false, false) if prior != next => {
            debug!(chat_id, flow = next.flow(), step = next.step(), "flow advanced")
        }
        _ => {}
    }
}
