// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Button token codec.
//!
//! Tokens have the form `namespace:argument[:argument...]`. Free-text
//! arguments (lead sources, suggestions) are taken verbatim after the first
//! colon, so they may contain colons themselves.

use std::fmt;
use std::str::FromStr;

use leadline_core::model::{
    ClientFilter, ClientId, ClientStatus, CompanyFilter, CompanyId, CompanySource,
    CompanyStatus, InterestLevel, PriorityLevel,
};

use crate::schedule::NextContactChoice;
use crate::state::SearchMode;

/// Upper bound on token length accepted by chat transports.
pub const MAX_TOKEN_LEN: usize = 64;

/// A decoded button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Noop,
    MainMenu,
    ClientList { filter: ClientFilter, page: usize },
    CompanyList { filter: CompanyFilter, page: usize },
    ShowClient(ClientId),
    ShowCompany(CompanyId),

    // Choices consumed by the active step.
    ClientSource(String),
    Interest(InterestLevel),
    NextContact(NextContactChoice),
    Status(ClientStatus),
    CallResult(ClientStatus),
    CompanySource(CompanySource),
    Priority(PriorityLevel),
    CompanyStatus(CompanyStatus),
    CitySuggestion(String),
    NicheSuggestion(String),

    // Entity actions; the editing ones start a single-slot flow.
    ChangeStatus(ClientId),
    ChangeInterest(ClientId),
    Comment(ClientId),
    History(ClientId),
    DeleteClient(ClientId),
    SetNextContact(ClientId),
    LogCall(ClientId),
    ChangeCompanyStatus(CompanyId),
    ChangeCompanyPriority(CompanyId),
    CompanyNote(CompanyId),
    DeleteCompany(CompanyId),

    Search(SearchMode),
}

fn id(arg: &str) -> Option<i64> {
    arg.parse().ok()
}

fn code<T: FromStr>(arg: &str) -> Option<T> {
    T::from_str(arg).ok()
}

fn list_args(arg: &str) -> Option<(&str, usize)> {
    let (filter, page) = arg.rsplit_once(':')?;
    Some((filter, page.parse().ok()?))
}

/// `all`, `status-<code>` or `interest-<code>`.
pub fn client_filter_key(filter: ClientFilter) -> String {
    match filter {
        ClientFilter::All => "all".to_string(),
        ClientFilter::Status(status) => format!("status-{status}"),
        ClientFilter::Interest(level) => format!("interest-{level}"),
    }
}

pub fn parse_client_filter(key: &str) -> Option<ClientFilter> {
    if key == "all" {
        return Some(ClientFilter::All);
    }
    let (kind, value) = key.split_once('-')?;
    match kind {
        "status" => code(value).map(ClientFilter::Status),
        "interest" => code(value).map(ClientFilter::Interest),
        _ => None,
    }
}

/// `all`, `status-<code>`, `priority-<code>` or `source-<code>`.
pub fn company_filter_key(filter: CompanyFilter) -> String {
    match filter {
        CompanyFilter::All => "all".to_string(),
        CompanyFilter::Status(status) => format!("status-{status}"),
        CompanyFilter::Priority(level) => format!("priority-{level}"),
        CompanyFilter::Source(source) => format!("source-{source}"),
    }
}

pub fn parse_company_filter(key: &str) -> Option<CompanyFilter> {
    if key == "all" {
        return Some(CompanyFilter::All);
    }
    let (kind, value) = key.split_once('-')?;
    match kind {
        "status" => code(value).map(CompanyFilter::Status),
        "priority" => code(value).map(CompanyFilter::Priority),
        "source" => code(value).map(CompanyFilter::Source),
        _ => None,
    }
}

impl Callback {
    /// Decode a token. Unknown namespaces and malformed arguments yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        if token == "noop" {
            return Some(Callback::Noop);
        }
        let (namespace, arg) = token.split_once(':')?;
        let callback = match namespace {
            "back" if arg == "main_menu" => Callback::MainMenu,
            "clients" => {
                let (filter, page) = list_args(arg)?;
                Callback::ClientList {
                    filter: parse_client_filter(filter)?,
                    page,
                }
            }
            "companies" => {
                let (filter, page) = list_args(arg)?;
                Callback::CompanyList {
                    filter: parse_company_filter(filter)?,
                    page,
                }
            }
            "client" => Callback::ShowClient(ClientId(id(arg)?)),
            "company" => Callback::ShowCompany(CompanyId(id(arg)?)),
            "source" if !arg.is_empty() => Callback::ClientSource(arg.to_string()),
            "interest" => Callback::Interest(code(arg)?),
            "next" => Callback::NextContact(code(arg)?),
            "status" => Callback::Status(code(arg)?),
            "callres" => Callback::CallResult(code(arg)?),
            "company_source" => Callback::CompanySource(code(arg)?),
            "priority" => Callback::Priority(code(arg)?),
            "comp_status" => Callback::CompanyStatus(code(arg)?),
            "city_suggestion" if !arg.is_empty() => Callback::CitySuggestion(arg.to_string()),
            "niche_suggestion" if !arg.is_empty() => Callback::NicheSuggestion(arg.to_string()),
            "status_change" => Callback::ChangeStatus(ClientId(id(arg)?)),
            "interest_change" => Callback::ChangeInterest(ClientId(id(arg)?)),
            "comment" => Callback::Comment(ClientId(id(arg)?)),
            "history" => Callback::History(ClientId(id(arg)?)),
            "delete_client" => Callback::DeleteClient(ClientId(id(arg)?)),
            "setnext" => Callback::SetNextContact(ClientId(id(arg)?)),
            "call" => Callback::LogCall(ClientId(id(arg)?)),
            "comp_status_change" => Callback::ChangeCompanyStatus(CompanyId(id(arg)?)),
            "comp_priority" => Callback::ChangeCompanyPriority(CompanyId(id(arg)?)),
            "comp_note" => Callback::CompanyNote(CompanyId(id(arg)?)),
            "delete_company" => Callback::DeleteCompany(CompanyId(id(arg)?)),
            "search" => Callback::Search(code(arg)?),
            _ => return None,
        };
        Some(callback)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Noop => f.write_str("noop"),
            Callback::MainMenu => f.write_str("back:main_menu"),
            Callback::ClientList { filter, page } => {
                write!(f, "clients:{}:{page}", client_filter_key(*filter))
            }
            Callback::CompanyList { filter, page } => {
                write!(f, "companies:{}:{page}", company_filter_key(*filter))
            }
            Callback::ShowClient(id) => write!(f, "client:{id}"),
            Callback::ShowCompany(id) => write!(f, "company:{id}"),
            Callback::ClientSource(value) => write!(f, "source:{value}"),
            Callback::Interest(level) => write!(f, "interest:{level}"),
            Callback::NextContact(choice) => write!(f, "next:{choice}"),
            Callback::Status(status) => write!(f, "status:{status}"),
            Callback::CallResult(status) => write!(f, "callres:{status}"),
            Callback::CompanySource(source) => write!(f, "company_source:{source}"),
            Callback::Priority(level) => write!(f, "priority:{level}"),
            Callback::CompanyStatus(status) => write!(f, "comp_status:{status}"),
            Callback::CitySuggestion(value) => write!(f, "city_suggestion:{value}"),
            Callback::NicheSuggestion(value) => write!(f, "niche_suggestion:{value}"),
            Callback::ChangeStatus(id) => write!(f, "status_change:{id}"),
            Callback::ChangeInterest(id) => write!(f, "interest_change:{id}"),
            Callback::Comment(id) => write!(f, "comment:{id}"),
            Callback::History(id) => write!(f, "history:{id}"),
            Callback::DeleteClient(id) => write!(f, "delete_client:{id}"),
            Callback::SetNextContact(id) => write!(f, "setnext:{id}"),
            Callback::LogCall(id) => write!(f, "call:{id}"),
            Callback::ChangeCompanyStatus(id) => write!(f, "comp_status_change:{id}"),
            Callback::ChangeCompanyPriority(id) => write!(f, "comp_priority:{id}"),
            Callback::CompanyNote(id) => write!(f, "comp_note:{id}"),
            Callback::DeleteCompany(id) => write!(f, "delete_company:{id}"),
            Callback::Search(mode) => write!(f, "search:{mode}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_tokens_carry_filter_and_page() {
        assert_eq!(
            Callback::parse("clients:status-planned_call:2"),
            Some(Callback::ClientList {
                filter: ClientFilter::Status(ClientStatus::PlannedCall),
                page: 2
            })
        );
        assert_eq!(
            Callback::parse("companies:priority-high:0"),
            Some(Callback::CompanyList {
                filter: CompanyFilter::Priority(PriorityLevel::High),
                page: 0
            })
        );
        assert_eq!(
            Callback::CompanyList {
                filter: CompanyFilter::Source(CompanySource::Inbound),
                page: 4
            }
            .to_string(),
            "companies:source-inbound:4"
        );
    }

    #[test]
    fn free_text_arguments_keep_colons() {
        assert_eq!(
            Callback::parse("city_suggestion:St. Petersburg: north"),
            Some(Callback::CitySuggestion("St. Petersburg: north".into()))
        );
        assert_eq!(
            Callback::parse("source:Instagram"),
            Some(Callback::ClientSource("Instagram".into()))
        );
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for token in [
            "",
            "client",
            "client:abc",
            "clients:all",
            "clients:all:-1",
            "clients:bogus-x:0",
            "companies:status-nope:0",
            "interest:lukewarm",
            "next:someday",
            "city_suggestion:",
            "back:elsewhere",
            "unknown:1",
        ] {
            assert_eq!(Callback::parse(token), None, "token {token:?}");
        }
    }

    #[test]
    fn entity_actions_encode_ids() {
        let cases = [
            (Callback::ChangeStatus(ClientId(3)), "status_change:3"),
            (Callback::LogCall(ClientId(3)), "call:3"),
            (Callback::SetNextContact(ClientId(3)), "setnext:3"),
            (Callback::CompanyNote(CompanyId(8)), "comp_note:8"),
            (Callback::NextContact(NextContactChoice::Tomorrow), "next:tomorrow"),
            (Callback::CallResult(ClientStatus::NoAnswer), "callres:no_answer"),
            (Callback::Search(SearchMode::Phone), "search:phone"),
            (Callback::MainMenu, "back:main_menu"),
        ];
        for (callback, token) in cases {
            assert_eq!(callback.to_string(), token);
            assert_eq!(Callback::parse(token), Some(callback));
        }
    }

    #[test]
    fn filter_keys_parse_back() {
        for filter in [
            ClientFilter::All,
            ClientFilter::Status(ClientStatus::Thinking),
            ClientFilter::Interest(InterestLevel::Warm),
        ] {
            assert_eq!(parse_client_filter(&client_filter_key(filter)), Some(filter));
        }
        for filter in [
            CompanyFilter::All,
            CompanyFilter::Status(CompanyStatus::NotCalled),
            CompanyFilter::Priority(PriorityLevel::Low),
            CompanyFilter::Source(CompanySource::Recommendation),
        ] {
            assert_eq!(parse_company_filter(&company_filter_key(filter)), Some(filter));
        }
    }
}
