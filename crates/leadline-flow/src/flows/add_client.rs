// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Add client: phone, name, source, interest, next contact.

use leadline_core::LeadlineError;
use leadline_core::model::{ClientStatus, InterestLevel, NewClient};
use tracing::{info, warn};

use crate::engine::{FlowEngine, PICK_A_BUTTON, Transition};
use crate::menu;
use crate::normalize::{normalize_phone, optional_field};
use crate::render;
use crate::reply::Reply;
use crate::schedule::NextContactChoice;
use crate::state::{AddClientStep, FlowState};

pub(crate) const PHONE_PROMPT: &str = "Send the client's phone number (or share a contact).";

impl FlowEngine {
    pub(crate) fn start_add_client(&self) -> Transition {
        Transition::to(
            FlowState::AddClient(AddClientStep::Phone),
            Reply::text(PHONE_PROMPT),
        )
    }

    pub(crate) async fn add_client_text(
        &self,
        step: AddClientStep,
        text: &str,
    ) -> Result<Transition, LeadlineError> {
        let transition = match step {
            AddClientStep::Phone => self.add_client_phone(text),
            AddClientStep::Name { phone } => {
                let name = optional_field(text);
                Transition::to(
                    FlowState::AddClient(AddClientStep::Source { phone, name }),
                    Reply::text("Lead source? Pick one or type your own.")
                        .with_keyboard(render::client_source_keyboard()),
                )
            }
            AddClientStep::Source { phone, name } => match optional_field(text) {
                Some(source) => self.add_client_source(phone, name, source),
                None => Transition::to(
                    FlowState::AddClient(AddClientStep::Source { phone, name }),
                    Reply::text("Lead source cannot be empty.")
                        .with_keyboard(render::client_source_keyboard()),
                ),
            },
            step @ AddClientStep::Interest { .. } => Transition::to(
                FlowState::AddClient(step),
                Reply::text(PICK_A_BUTTON).with_keyboard(render::interest_keyboard()),
            ),
            step @ AddClientStep::NextContact { .. } => Transition::to(
                FlowState::AddClient(step),
                Reply::text(PICK_A_BUTTON).with_keyboard(render::next_contact_keyboard()),
            ),
        };
        Ok(transition)
    }

    pub(crate) async fn add_client_contact(
        &self,
        step: AddClientStep,
        phone: &str,
    ) -> Result<Transition, LeadlineError> {
        match step {
            AddClientStep::Phone => Ok(self.add_client_phone(phone)),
            step => Ok(Transition::ignore(FlowState::AddClient(step))),
        }
    }

    /// Blank input or input without digits re-prompts in place.
    fn add_client_phone(&self, raw: &str) -> Transition {
        if !raw.chars().any(|c| c.is_ascii_digit()) {
            return Transition::to(
                FlowState::AddClient(AddClientStep::Phone),
                Reply::text("I don't see a phone number. Send digits or share a contact."),
            );
        }
        Transition::to(
            FlowState::AddClient(AddClientStep::Name {
                phone: normalize_phone(raw),
            }),
            Reply::text("Client name (or '-' to skip):"),
        )
    }

    pub(crate) fn add_client_source(
        &self,
        phone: String,
        name: Option<String>,
        source: String,
    ) -> Transition {
        Transition::to(
            FlowState::AddClient(AddClientStep::Interest {
                phone,
                name,
                source,
            }),
            Reply::text("Interest level?").with_keyboard(render::interest_keyboard()),
        )
    }

    pub(crate) fn add_client_interest(
        &self,
        phone: String,
        name: Option<String>,
        source: String,
        interest: InterestLevel,
    ) -> Transition {
        Transition::to(
            FlowState::AddClient(AddClientStep::NextContact {
                phone,
                name,
                source,
                interest,
            }),
            Reply::text("Plan the next contact?").with_keyboard(render::next_contact_keyboard()),
        )
    }

    /// Persist the client. A taken phone abandons the flow.
    pub(crate) async fn add_client_finish(
        &self,
        phone: String,
        name: Option<String>,
        source: String,
        interest: InterestLevel,
        choice: NextContactChoice,
    ) -> Result<Transition, LeadlineError> {
        let new_client = NewClient {
            phone,
            name,
            company_id: None,
            source,
            status: ClientStatus::New,
            interest,
            next_contact_at: choice.resolve(self.now(), self.settings.contact_hour),
        };
        match self.repo().create_client(&new_client).await {
            Ok(client) => {
                info!(client_id = client.id.0, "client created");
                Ok(Transition::idle(
                    Reply::html(render::client_card(&client, None, None))
                        .with_keyboard(menu::main_menu()),
                ))
            }
            Err(e) if e.is_duplicate() => {
                warn!(phone = %new_client.phone, "client phone already taken");
                Ok(Transition::idle(
                    Reply::text("A client with this phone already exists.")
                        .with_keyboard(menu::main_menu()),
                ))
            }
            Err(e) => Err(e),
        }
    }
}
