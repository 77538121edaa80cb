// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation flow state.
//!
//! Exactly one variant is active per conversation. Each variant carries only
//! the slots its flow collects, and the step is part of the variant, so a
//! handler can never read a slot that the active flow did not write.

use leadline_core::model::{
    ClientId, CompanyId, CompanySource, InteractionId, InterestLevel, PriorityLevel,
};

use crate::normalize::BulkLine;

/// Which field a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SearchMode {
    Phone,
    Name,
    Company,
}

/// Slots of the add-client flow, one variant per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddClientStep {
    Phone,
    Name {
        phone: String,
    },
    Source {
        phone: String,
        name: Option<String>,
    },
    Interest {
        phone: String,
        name: Option<String>,
        source: String,
    },
    NextContact {
        phone: String,
        name: Option<String>,
        source: String,
        interest: InterestLevel,
    },
}

/// Fields collected so far by the add-company flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub city: Option<String>,
    pub niche: Option<String>,
    pub phone: Option<String>,
    pub source: Option<CompanySource>,
    pub priority: Option<PriorityLevel>,
    pub contact_person: Option<String>,
}

/// Steps of the add-company flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddCompanyStep {
    Name,
    City,
    Niche,
    Phone,
    Source,
    Priority,
    ContactPerson,
    Note,
}

/// Slots of the bulk-add flow, one variant per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkStep {
    Entries,
    Niche {
        entries: Vec<BulkLine>,
    },
    City {
        entries: Vec<BulkLine>,
        niche: Option<String>,
    },
}

/// The active flow of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    AddClient(AddClientStep),
    AddCompany {
        step: AddCompanyStep,
        draft: CompanyDraft,
    },
    BulkCompanies(BulkStep),
    ClientStatus {
        client: ClientId,
    },
    ClientInterest {
        client: ClientId,
    },
    CallResult {
        client: ClientId,
    },
    /// Optional comment chained after a logged call.
    CallComment {
        client: ClientId,
        interaction: InteractionId,
    },
    ClientComment {
        client: ClientId,
    },
    NextContact {
        client: ClientId,
    },
    CompanyStatus {
        company: CompanyId,
    },
    CompanyPriority {
        company: CompanyId,
    },
    CompanyNote {
        company: CompanyId,
    },
    Search {
        mode: SearchMode,
    },
}

impl FlowState {
    /// Flow name used in logs.
    pub fn flow(&self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::AddClient(_) => "add_client",
            FlowState::AddCompany { .. } => "add_company",
            FlowState::BulkCompanies(_) => "bulk_companies",
            FlowState::ClientStatus { .. } => "client_status",
            FlowState::ClientInterest { .. } => "client_interest",
            FlowState::CallResult { .. } => "call_result",
            FlowState::CallComment { .. } => "call_comment",
            FlowState::ClientComment { .. } => "client_comment",
            FlowState::NextContact { .. } => "next_contact",
            FlowState::CompanyStatus { .. } => "company_status",
            FlowState::CompanyPriority { .. } => "company_priority",
            FlowState::CompanyNote { .. } => "company_note",
            FlowState::Search { .. } => "search",
        }
    }

    /// Step tag inside the flow, used in logs.
    pub fn step(&self) -> &'static str {
        match self {
            FlowState::AddClient(step) => match step {
                AddClientStep::Phone => "phone",
                AddClientStep::Name { .. } => "name",
                AddClientStep::Source { .. } => "source",
                AddClientStep::Interest { .. } => "interest",
                AddClientStep::NextContact { .. } => "next_contact",
            },
            FlowState::AddCompany { step, .. } => match step {
                AddCompanyStep::Name => "name",
                AddCompanyStep::City => "city",
                AddCompanyStep::Niche => "niche",
                AddCompanyStep::Phone => "phone",
                AddCompanyStep::Source => "source",
                AddCompanyStep::Priority => "priority",
                AddCompanyStep::ContactPerson => "contact_person",
                AddCompanyStep::Note => "note",
            },
            FlowState::BulkCompanies(step) => match step {
                BulkStep::Entries => "entries",
                BulkStep::Niche { .. } => "niche",
                BulkStep::City { .. } => "city",
            },
            FlowState::Idle => "idle",
            FlowState::Search { .. } => "query",
            FlowState::CallComment { .. }
            | FlowState::ClientComment { .. }
            | FlowState::CompanyNote { .. } => "text",
            FlowState::ClientStatus { .. }
            | FlowState::ClientInterest { .. }
            | FlowState::CallResult { .. }
            | FlowState::NextContact { .. }
            | FlowState::CompanyStatus { .. }
            | FlowState::CompanyPriority { .. } => "choice",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, FlowState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_state_is_idle() {
        assert!(FlowState::default().is_idle());
        assert_eq!(FlowState::default().flow(), "idle");
    }

    #[test]
    fn step_tags_follow_the_variant() {
        let state = FlowState::AddClient(AddClientStep::Name {
            phone: "+1".into(),
        });
        assert_eq!(state.flow(), "add_client");
        assert_eq!(state.step(), "name");

        let state = FlowState::AddCompany {
            step: AddCompanyStep::ContactPerson,
            draft: CompanyDraft::default(),
        };
        assert_eq!(state.step(), "contact_person");
    }

    #[test]
    fn search_modes_parse_from_tokens() {
        assert_eq!(SearchMode::from_str("company").unwrap(), SearchMode::Company);
        assert_eq!(SearchMode::Phone.to_string(), "phone");
        assert!(SearchMode::from_str("email").is_err());
    }
}
