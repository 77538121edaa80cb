// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable labels, entity cards and inline keyboards.

use leadline_core::model::{
    Client, ClientFilter, ClientStatus, Company, CompanyFilter, CompanySource, CompanyStatus,
    Interaction, InteractionResult, InterestLevel, PriorityLevel, SuggestionKind,
};
use leadline_core::types::{Button, Keyboard};
use strum::IntoEnumIterator;

use crate::callback::{Callback, MAX_TOKEN_LEN};
use crate::list::ListPage;
use crate::normalize::whatsapp_url;
use crate::schedule::NextContactChoice;
use crate::state::SearchMode;

const CARD_DATE: &str = "%d.%m.%Y %H:%M";
const SHORT_DATE: &str = "%d.%m %H:%M";
const NO_DATA: &str = "No data";

/// Display label of a closed domain value.
pub trait Label: Copy {
    fn label(self) -> &'static str;
}

impl Label for ClientStatus {
    fn label(self) -> &'static str {
        match self {
            ClientStatus::New => "New",
            ClientStatus::PlannedCall => "Call planned",
            ClientStatus::NoAnswer => "No answer",
            ClientStatus::Thinking => "Thinking",
            ClientStatus::Agreed => "Agreed",
            ClientStatus::Declined => "Declined",
        }
    }
}

impl Label for InterestLevel {
    fn label(self) -> &'static str {
        match self {
            InterestLevel::Cold => "🔵 Cold",
            InterestLevel::Warm => "🟡 Warm",
            InterestLevel::Hot => "🔴 Hot",
        }
    }
}

impl Label for CompanySource {
    fn label(self) -> &'static str {
        match self {
            CompanySource::Found => "Found ourselves",
            CompanySource::Recommendation => "Recommendation",
            CompanySource::Inbound => "Inbound",
        }
    }
}

impl Label for CompanyStatus {
    fn label(self) -> &'static str {
        match self {
            CompanyStatus::NotCalled => "Not called",
            CompanyStatus::Research => "Research",
            CompanyStatus::NoAnswer => "No answer",
            CompanyStatus::Negotiation => "Negotiation",
            CompanyStatus::Client => "Client",
            CompanyStatus::Declined => "Declined",
        }
    }
}

impl Label for PriorityLevel {
    fn label(self) -> &'static str {
        match self {
            PriorityLevel::Low => "🔵 Low",
            PriorityLevel::Medium => "🟡 Medium",
            PriorityLevel::High => "🔴 High",
        }
    }
}

impl Label for InteractionResult {
    fn label(self) -> &'static str {
        match self {
            InteractionResult::Call => "Call",
            InteractionResult::Message => "Message",
            InteractionResult::Meeting => "Meeting",
        }
    }
}

impl Label for NextContactChoice {
    fn label(self) -> &'static str {
        match self {
            NextContactChoice::Today => "Today",
            NextContactChoice::Tomorrow => "Tomorrow",
            NextContactChoice::InThreeDays => "In 3 days",
            NextContactChoice::Unplanned => "Don't plan",
        }
    }
}

impl Label for SearchMode {
    fn label(self) -> &'static str {
        match self {
            SearchMode::Phone => "By phone",
            SearchMode::Name => "By name",
            SearchMode::Company => "By company",
        }
    }
}

/// Escape user data for HTML parse mode.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn or_dash(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_else(|| "—".to_string())
}

fn button(label: impl Into<String>, callback: Callback) -> Button {
    Button::callback(label, callback.to_string())
}

fn column<T: Label>(
    values: impl IntoIterator<Item = T>,
    to_callback: fn(T) -> Callback,
) -> Keyboard {
    Keyboard::Inline(
        values
            .into_iter()
            .map(|value| vec![button(value.label(), to_callback(value))])
            .collect(),
    )
}

/// Label used for a client in lists and search results.
pub fn client_title(client: &Client) -> &str {
    client.name.as_deref().unwrap_or(&client.phone)
}

/// HTML card of a client.
pub fn client_card(
    client: &Client,
    company: Option<&Company>,
    last: Option<&Interaction>,
) -> String {
    let name = client
        .name
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "No name".to_string());
    let mut lines = vec![
        format!("<b>{name}</b> — <code>{}</code>", escape_html(&client.phone)),
        format!("Status: {}", client.status.label()),
        format!("Interest: {}", client.interest.label()),
        format!("Source: {}", escape_html(&client.source)),
    ];
    if let Some(company) = company {
        lines.push(format!("Company: {}", escape_html(&company.name)));
    }
    if let Some(at) = client.next_contact_at {
        lines.push(format!("Next contact: {}", at.format(CARD_DATE)));
    }
    if let Some(last) = last {
        let comment = last
            .comment
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "no comment".to_string());
        lines.push(format!(
            "Last contact: {} — {comment}",
            last.created_at.format(SHORT_DATE)
        ));
    }
    lines.join("\n")
}

pub fn client_card_keyboard(client: &Client) -> Keyboard {
    let id = client.id;
    let mut rows = Vec::new();
    if let Some(url) = whatsapp_url(&client.phone) {
        rows.push(vec![Button::url("💬 Open WhatsApp", url)]);
    }
    rows.push(vec![
        button("✏️ Status", Callback::ChangeStatus(id)),
        button("🔥 Interest", Callback::ChangeInterest(id)),
    ]);
    rows.push(vec![
        button("📝 Comment", Callback::Comment(id)),
        button("📜 History", Callback::History(id)),
    ]);
    rows.push(vec![button("🗑️ Delete", Callback::DeleteClient(id))]);
    rows.push(vec![
        button("⏰ Next contact", Callback::SetNextContact(id)),
        button("📞 Call result", Callback::LogCall(id)),
    ]);
    Keyboard::Inline(rows)
}

/// HTML card of a company.
pub fn company_card(company: &Company) -> String {
    let city = company
        .city
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "city not set".to_string());
    let phone = company
        .phone
        .as_deref()
        .map(|p| format!("<code>{}</code>", escape_html(p)))
        .unwrap_or_else(|| "—".to_string());
    [
        format!("<b>{}</b> ({city})", escape_html(&company.name)),
        format!("Niche: {}", or_dash(company.niche.as_deref())),
        format!("Phone: {phone}"),
        format!("Source: {}", company.source.label()),
        format!("Status: {}", company.status.label()),
        format!("Priority: {}", company.priority.label()),
        format!("Contact person: {}", or_dash(company.contact_person.as_deref())),
        format!("Note: {}", or_dash(company.note.as_deref())),
    ]
    .join("\n")
}

pub fn company_card_keyboard(company: &Company) -> Keyboard {
    let id = company.id;
    let mut rows = Vec::new();
    if let Some(url) = company.phone.as_deref().and_then(whatsapp_url) {
        rows.push(vec![Button::url("💬 Open WhatsApp", url)]);
    }
    rows.push(vec![
        button("✏️ Status", Callback::ChangeCompanyStatus(id)),
        button("🔥 Priority", Callback::ChangeCompanyPriority(id)),
    ]);
    rows.push(vec![button("📝 Note", Callback::CompanyNote(id))]);
    rows.push(vec![button("🗑️ Delete", Callback::DeleteCompany(id))]);
    Keyboard::Inline(rows)
}

/// Plain-text history, newest first.
pub fn history(entries: &[Interaction]) -> String {
    if entries.is_empty() {
        return "History is empty".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{} — {} — {}\n{}",
                entry.created_at.format(SHORT_DATE),
                entry.result.label(),
                entry.status_after.label(),
                entry.comment.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Fixed lead-source picks offered by the add-client flow.
pub fn client_source_keyboard() -> Keyboard {
    let source = |label: &str, value: &str| button(label, Callback::ClientSource(value.into()));
    Keyboard::Inline(vec![
        vec![source("Instagram", "Instagram"), source("WhatsApp", "WhatsApp")],
        vec![source("Call", "call")],
        vec![source("Recommendation", "recommendation")],
        vec![source("Other", "other")],
    ])
}

pub fn interest_keyboard() -> Keyboard {
    column(InterestLevel::iter(), Callback::Interest)
}

pub fn next_contact_keyboard() -> Keyboard {
    column(NextContactChoice::iter(), Callback::NextContact)
}

pub fn client_status_keyboard() -> Keyboard {
    column(ClientStatus::iter(), Callback::Status)
}

pub fn call_result_keyboard() -> Keyboard {
    let outcome = |label: &str, status| button(label, Callback::CallResult(status));
    Keyboard::Inline(vec![
        vec![outcome("✅ Agreed", ClientStatus::Agreed)],
        vec![outcome("❌ Declined", ClientStatus::Declined)],
        vec![outcome("🤔 Thinking", ClientStatus::Thinking)],
        vec![outcome("📵 No answer", ClientStatus::NoAnswer)],
    ])
}

pub fn company_source_keyboard() -> Keyboard {
    column(CompanySource::iter(), Callback::CompanySource)
}

/// Highest priority first.
pub fn priority_keyboard() -> Keyboard {
    column(PriorityLevel::iter().rev(), Callback::Priority)
}

pub fn company_status_keyboard() -> Keyboard {
    column(CompanyStatus::iter(), Callback::CompanyStatus)
}

pub fn search_mode_keyboard() -> Keyboard {
    column(SearchMode::iter(), Callback::Search)
}

/// Quick picks, two per row. `None` when there is nothing to offer.
pub fn suggestion_keyboard(kind: SuggestionKind, values: &[String]) -> Option<Keyboard> {
    let buttons: Vec<Button> = values
        .iter()
        .map(|value| {
            let callback = match kind {
                SuggestionKind::City => Callback::CitySuggestion(value.clone()),
                SuggestionKind::Niche => Callback::NicheSuggestion(value.clone()),
            };
            button(value.as_str(), callback)
        })
        .filter(|b| b.token().is_some_and(|t| t.len() <= MAX_TOKEN_LEN))
        .collect();
    if buttons.is_empty() {
        return None;
    }
    Some(Keyboard::Inline(pairs(buttons)))
}

fn pairs(buttons: Vec<Button>) -> Vec<Vec<Button>> {
    buttons.chunks(2).map(<[Button]>::to_vec).collect()
}

fn no_data_row() -> Vec<Button> {
    vec![button(NO_DATA, Callback::Noop)]
}

fn back_row() -> Vec<Button> {
    vec![button("⬅️ Back", Callback::MainMenu)]
}

/// Filter picker for the client list: all, present statuses, interest levels.
pub fn client_filter_keyboard(statuses: &[ClientStatus]) -> Keyboard {
    let list = |filter| Callback::ClientList { filter, page: 0 };
    let mut rows = vec![vec![button("All", list(ClientFilter::All))]];
    if statuses.is_empty() {
        rows.push(no_data_row());
    } else {
        rows.extend(pairs(
            statuses
                .iter()
                .map(|&s| button(s.label(), list(ClientFilter::Status(s))))
                .collect(),
        ));
        rows.push(
            InterestLevel::iter()
                .map(|level| button(level.label(), list(ClientFilter::Interest(level))))
                .collect(),
        );
    }
    rows.push(back_row());
    Keyboard::Inline(rows)
}

/// Filter picker for the company list: all, present statuses, priorities, sources.
pub fn company_filter_keyboard(statuses: &[CompanyStatus]) -> Keyboard {
    let list = |filter| Callback::CompanyList { filter, page: 0 };
    let mut rows = vec![vec![button("All", list(CompanyFilter::All))]];
    if statuses.is_empty() {
        rows.push(no_data_row());
    } else {
        rows.extend(pairs(
            statuses
                .iter()
                .map(|&s| button(s.label(), list(CompanyFilter::Status(s))))
                .collect(),
        ));
        rows.push(
            PriorityLevel::iter()
                .rev()
                .map(|level| button(level.label(), list(CompanyFilter::Priority(level))))
                .collect(),
        );
        rows.push(
            CompanySource::iter()
                .map(|source| button(source.label(), list(CompanyFilter::Source(source))))
                .collect(),
        );
    }
    rows.push(back_row());
    Keyboard::Inline(rows)
}

fn page_keyboard<T>(
    page: &ListPage<T>,
    row: impl Fn(&T) -> Button,
    nav: impl Fn(usize) -> Callback,
) -> Keyboard {
    let mut rows: Vec<Vec<Button>> = page.rows.iter().map(|item| vec![row(item)]).collect();
    let mut nav_row = Vec::new();
    if page.has_prev {
        nav_row.push(button("◀️", nav(page.page - 1)));
    }
    if page.has_next {
        nav_row.push(button("▶️", nav(page.page + 1)));
    }
    if !nav_row.is_empty() {
        rows.push(nav_row);
    }
    if rows.is_empty() {
        rows.push(no_data_row());
    }
    Keyboard::Inline(rows)
}

pub fn client_page_keyboard(page: &ListPage<Client>, filter: ClientFilter) -> Keyboard {
    page_keyboard(
        page,
        |c| button(client_title(c), Callback::ShowClient(c.id)),
        |p| Callback::ClientList { filter, page: p },
    )
}

pub fn company_page_keyboard(page: &ListPage<Company>, filter: CompanyFilter) -> Keyboard {
    page_keyboard(
        page,
        |c| {
            button(
                format!("{} ({})", c.name, c.city.as_deref().unwrap_or("-")),
                Callback::ShowCompany(c.id),
            )
        },
        |p| Callback::CompanyList { filter, page: p },
    )
}

/// Clients due today, one button each.
pub fn client_buttons(clients: &[Client]) -> Keyboard {
    Keyboard::Inline(
        clients
            .iter()
            .map(|c| vec![button(client_title(c), Callback::ShowClient(c.id))])
            .collect(),
    )
}

/// Mixed search results: clients first, then companies.
pub fn search_results_keyboard(clients: &[Client], companies: &[Company]) -> Keyboard {
    let client_rows = clients
        .iter()
        .map(|c| vec![button(format!("👤 {}", client_title(c)), Callback::ShowClient(c.id))]);
    let company_rows = companies
        .iter()
        .map(|c| vec![button(format!("🏢 {}", c.name), Callback::ShowCompany(c.id))]);
    Keyboard::Inline(client_rows.chain(company_rows).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leadline_core::model::{ClientId, CompanyId, InteractionId};

    fn client(name: Option<&str>, phone: &str) -> Client {
        let at = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();
        Client {
            id: ClientId(5),
            phone: phone.into(),
            name: name.map(Into::into),
            company_id: None,
            source: "Instagram".into(),
            status: ClientStatus::Thinking,
            interest: InterestLevel::Hot,
            next_contact_at: Some(at),
            created_at: at,
            updated_at: at,
        }
    }

    fn company(phone: Option<&str>) -> Company {
        let at = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();
        Company {
            id: CompanyId(2),
            name: "Bread & Butter".into(),
            city: None,
            niche: Some("bakery".into()),
            phone: phone.map(Into::into),
            site: None,
            source: CompanySource::Inbound,
            status: CompanyStatus::Research,
            priority: PriorityLevel::High,
            contact_person: None,
            note: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn html_special_characters_are_escaped() {
        assert_eq!(escape_html("<b>A & B</b>"), "&lt;b&gt;A &amp; B&lt;/b&gt;");
    }

    #[test]
    fn client_card_lists_fields() {
        let c = client(Some("Ivan <VIP>"), "+79991234567");
        let last = Interaction {
            id: InteractionId(1),
            client_id: c.id,
            created_at: c.created_at,
            result: InteractionResult::Call,
            status_after: ClientStatus::Thinking,
            comment: None,
        };
        let card = client_card(&c, Some(&company(None)), Some(&last));
        assert!(card.starts_with("<b>Ivan &lt;VIP&gt;</b> — <code>+79991234567</code>"));
        assert!(card.contains("Status: Thinking"));
        assert!(card.contains("Interest: 🔴 Hot"));
        assert!(card.contains("Company: Bread &amp; Butter"));
        assert!(card.contains("Next contact: 04.05.2026 10:00"));
        assert!(card.contains("Last contact: 04.05 10:00 — no comment"));
    }

    #[test]
    fn client_keyboard_starts_with_whatsapp_when_phone_has_digits() {
        let Keyboard::Inline(rows) = client_card_keyboard(&client(None, "+7 999")) else {
            panic!("inline keyboard expected");
        };
        assert_eq!(rows[0][0].token(), None);
        assert_eq!(rows.len(), 5);

        let kb = client_card_keyboard(&client(None, "+"));
        assert_eq!(
            kb.tokens(),
            vec![
                "status_change:5",
                "interest_change:5",
                "comment:5",
                "history:5",
                "delete_client:5",
                "setnext:5",
                "call:5"
            ]
        );
    }

    #[test]
    fn company_card_uses_placeholders() {
        let card = company_card(&company(None));
        assert!(card.contains("(city not set)"));
        assert!(card.contains("Phone: —"));
        assert!(card.contains("Priority: 🔴 High"));

        let kb = company_card_keyboard(&company(Some("8 800")));
        assert_eq!(
            kb.tokens(),
            vec![
                "comp_status_change:2",
                "comp_priority:2",
                "comp_note:2",
                "delete_company:2"
            ]
        );
    }

    #[test]
    fn suggestions_pair_up_and_skip_oversized_tokens() {
        let values = vec![
            "Kazan".to_string(),
            "Moscow".to_string(),
            "Omsk".to_string(),
            "x".repeat(80),
        ];
        let Some(Keyboard::Inline(rows)) = suggestion_keyboard(SuggestionKind::City, &values)
        else {
            panic!("keyboard expected");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1][0].token(), Some("city_suggestion:Omsk"));
        assert!(suggestion_keyboard(SuggestionKind::Niche, &[]).is_none());
    }

    #[test]
    fn empty_filter_catalogue_shows_placeholder() {
        let kb = client_filter_keyboard(&[]);
        assert_eq!(kb.tokens(), vec!["clients:all:0", "noop", "back:main_menu"]);

        let kb = company_filter_keyboard(&[CompanyStatus::NotCalled, CompanyStatus::Client]);
        let tokens = kb.tokens();
        assert_eq!(tokens[0], "companies:all:0");
        assert_eq!(tokens[1], "companies:status-not_called:0");
        assert_eq!(tokens[2], "companies:status-client:0");
        assert_eq!(tokens.last(), Some(&"back:main_menu"));
    }

    #[test]
    fn list_keyboard_navigation() {
        let page = ListPage {
            rows: vec![client(None, "+1")],
            page: 2,
            has_prev: true,
            has_next: false,
        };
        let kb = client_page_keyboard(&page, ClientFilter::Interest(InterestLevel::Hot));
        assert_eq!(kb.tokens(), vec!["client:5", "clients:interest-hot:1"]);

        let empty: ListPage<Company> = ListPage {
            rows: Vec::new(),
            page: 0,
            has_prev: false,
            has_next: false,
        };
        assert_eq!(
            company_page_keyboard(&empty, CompanyFilter::All).tokens(),
            vec!["noop"]
        );
    }

    #[test]
    fn history_is_plain_text_with_labels() {
        assert_eq!(history(&[]), "History is empty");
        let c = client(None, "+1");
        let entry = Interaction {
            id: InteractionId(1),
            client_id: c.id,
            created_at: c.created_at,
            result: InteractionResult::Message,
            status_after: ClientStatus::Agreed,
            comment: Some("signed".into()),
        };
        assert_eq!(history(&[entry]), "04.05 10:00 — Message — Agreed\nsigned");
    }

    #[test]
    fn priority_keyboard_is_highest_first() {
        assert_eq!(
            priority_keyboard().tokens(),
            vec!["priority:high", "priority:medium", "priority:low"]
        );
    }
}
