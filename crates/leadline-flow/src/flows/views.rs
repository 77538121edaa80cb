// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu actions and stateless views: lists, cards, history, deletion.
//!
//! Menu actions abandon any active flow. Every other view leaves the current
//! state untouched, so a card opened mid-flow does not lose collected slots.

use leadline_core::LeadlineError;
use leadline_core::model::{ClientFilter, ClientId, CompanyFilter, CompanyId, EntityKind};
use tracing::info;

use crate::engine::{FlowEngine, Transition, found, gone};
use crate::list;
use crate::menu::{self, MenuAction};
use crate::render;
use crate::report;
use crate::reply::Reply;
use crate::state::FlowState;

const GREETING: &str = "Hi! I keep track of your clients and target companies. \
Pick an action from the menu below.";

impl FlowEngine {
    pub(crate) async fn on_menu(&self, action: MenuAction) -> Result<Transition, LeadlineError> {
        let transition = match action {
            MenuAction::Start => {
                Transition::idle(Reply::text(GREETING).with_keyboard(menu::main_menu()))
            }
            MenuAction::Cancel => {
                Transition::idle(Reply::text("Cancelled.").with_keyboard(menu::main_menu()))
            }
            MenuAction::AddClient => self.start_add_client(),
            MenuAction::AddCompany => self.start_add_company(),
            MenuAction::BulkCompanies => self.start_bulk(),
            MenuAction::MyClients => {
                let statuses = list::client_status_catalogue(self.repo()).await?;
                Transition::idle(
                    Reply::text("Choose a filter")
                        .with_keyboard(render::client_filter_keyboard(&statuses)),
                )
            }
            MenuAction::Companies => {
                let statuses = list::company_status_catalogue(self.repo()).await?;
                Transition::idle(
                    Reply::text("Choose a filter")
                        .with_keyboard(render::company_filter_keyboard(&statuses)),
                )
            }
            MenuAction::Statistics => {
                let counters = report::client_report(self.repo(), self.now()).await?;
                Transition::idle(Reply::text(report::render_report(&counters)))
            }
            MenuAction::TodayTasks => {
                let due = report::due_today(self.repo(), self.now()).await?;
                if due.is_empty() {
                    Transition::idle(Reply::text("No tasks for today"))
                } else {
                    Transition::idle(
                        Reply::text("Clients to contact today:")
                            .with_keyboard(render::client_buttons(&due)),
                    )
                }
            }
            MenuAction::Search => Transition::idle(
                Reply::text("Choose a search type").with_keyboard(render::search_mode_keyboard()),
            ),
        };
        Ok(transition)
    }

    pub(crate) async fn client_list(
        &self,
        current: FlowState,
        filter: ClientFilter,
        page: usize,
    ) -> Result<Transition, LeadlineError> {
        let rows = list::client_page(self.repo(), filter, page).await?;
        Ok(Transition::to(
            current,
            Reply::text("Clients:").with_keyboard(render::client_page_keyboard(&rows, filter)),
        ))
    }

    pub(crate) async fn company_list(
        &self,
        current: FlowState,
        filter: CompanyFilter,
        page: usize,
    ) -> Result<Transition, LeadlineError> {
        let rows = list::company_page(self.repo(), filter, page).await?;
        Ok(Transition::to(
            current,
            Reply::text("Companies:").with_keyboard(render::company_page_keyboard(&rows, filter)),
        ))
    }

    pub(crate) async fn show_client(
        &self,
        current: FlowState,
        id: ClientId,
    ) -> Result<Transition, LeadlineError> {
        let Some(client) = self.repo().get_client(id).await? else {
            return Ok(Transition::to(current, Reply::text("Client not found")));
        };
        let company = match client.company_id {
            Some(company_id) => self.repo().get_company(company_id).await?,
            None => None,
        };
        let last = self.repo().latest_interaction(id).await?;
        Ok(Transition::to(
            current,
            Reply::html(render::client_card(&client, company.as_ref(), last.as_ref()))
                .with_keyboard(render::client_card_keyboard(&client)),
        ))
    }

    pub(crate) async fn show_company(
        &self,
        current: FlowState,
        id: CompanyId,
    ) -> Result<Transition, LeadlineError> {
        let Some(company) = self.repo().get_company(id).await? else {
            return Ok(Transition::to(current, Reply::text("Company not found")));
        };
        Ok(Transition::to(
            current,
            Reply::html(render::company_card(&company))
                .with_keyboard(render::company_card_keyboard(&company)),
        ))
    }

    pub(crate) async fn show_history(
        &self,
        current: FlowState,
        id: ClientId,
    ) -> Result<Transition, LeadlineError> {
        if self.repo().get_client(id).await?.is_none() {
            return Ok(Transition::to(current, Reply::text("Client not found")));
        }
        let entries = self
            .repo()
            .list_interactions(id, self.settings.history_limit)
            .await?;
        Ok(Transition::to(current, Reply::text(render::history(&entries))))
    }

    /// Repeated presses are safe and yield the "already deleted" reply.
    pub(crate) async fn delete_client(
        &self,
        current: FlowState,
        id: ClientId,
    ) -> Result<Transition, LeadlineError> {
        let reply = match found(self.repo().delete_client(id).await)? {
            Some(()) => {
                info!(client_id = id.0, "client deleted");
                Reply::text("Client deleted.")
            }
            None => gone(EntityKind::Client),
        };
        Ok(Transition::to(current, reply))
    }

    /// Removes the company together with its clients and their history.
    pub(crate) async fn delete_company(
        &self,
        current: FlowState,
        id: CompanyId,
    ) -> Result<Transition, LeadlineError> {
        let reply = match found(self.repo().delete_company(id).await)? {
            Some(()) => {
                info!(company_id = id.0, "company deleted");
                Reply::text("Company deleted.")
            }
            None => gone(EntityKind::Company),
        };
        Ok(Transition::to(current, reply))
    }
}
