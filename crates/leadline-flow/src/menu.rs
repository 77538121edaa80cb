// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main menu labels and slash commands.

use leadline_core::types::Keyboard;

pub const ADD_CLIENT: &str = "➕ Add client";
pub const ADD_COMPANY: &str = "🏢 Add company";
pub const MY_CLIENTS: &str = "📋 My clients";
pub const COMPANIES: &str = "📂 Companies";
pub const STATISTICS: &str = "📊 Statistics";
pub const BULK_COMPANIES: &str = "⚡ Bulk add companies";
pub const TODAY_TASKS: &str = "⏰ Today's tasks";
pub const SEARCH: &str = "🔍 Search";

/// A top-level command typed or picked from the persistent menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Cancel,
    AddClient,
    AddCompany,
    BulkCompanies,
    MyClients,
    Companies,
    Statistics,
    TodayTasks,
    Search,
}

impl MenuAction {
    /// Match a menu label or a `/command`, with or without a `@bot` suffix.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(command) = text.strip_prefix('/') {
            let command = command.split_whitespace().next().unwrap_or_default();
            let command = command.split('@').next().unwrap_or_default();
            return match command {
                "start" => Some(MenuAction::Start),
                "cancel" => Some(MenuAction::Cancel),
                "add_client" => Some(MenuAction::AddClient),
                "add_company" => Some(MenuAction::AddCompany),
                "bulk_companies" => Some(MenuAction::BulkCompanies),
                _ => None,
            };
        }
        match text {
            ADD_CLIENT => Some(MenuAction::AddClient),
            ADD_COMPANY => Some(MenuAction::AddCompany),
            MY_CLIENTS => Some(MenuAction::MyClients),
            COMPANIES => Some(MenuAction::Companies),
            STATISTICS => Some(MenuAction::Statistics),
            BULK_COMPANIES => Some(MenuAction::BulkCompanies),
            TODAY_TASKS => Some(MenuAction::TodayTasks),
            SEARCH => Some(MenuAction::Search),
            _ => None,
        }
    }
}

/// The persistent four-by-two reply keyboard.
pub fn main_menu() -> Keyboard {
    let rows = [
        [ADD_CLIENT, ADD_COMPANY],
        [MY_CLIENTS, COMPANIES],
        [STATISTICS, BULK_COMPANIES],
        [TODAY_TASKS, SEARCH],
    ];
    Keyboard::Menu(
        rows.iter()
            .map(|row| row.iter().map(|label| label.to_string()).collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_menu_label_parses() {
        let Keyboard::Menu(rows) = main_menu() else {
            panic!("main menu must be a reply keyboard");
        };
        assert_eq!(rows.len(), 4);
        for label in rows.iter().flatten() {
            assert!(MenuAction::parse(label).is_some(), "label {label:?}");
        }
    }

    #[test]
    fn commands_accept_bot_suffix_and_arguments() {
        assert_eq!(MenuAction::parse("/start"), Some(MenuAction::Start));
        assert_eq!(
            MenuAction::parse("/add_client@leadline_bot"),
            Some(MenuAction::AddClient)
        );
        assert_eq!(MenuAction::parse("/cancel now"), Some(MenuAction::Cancel));
        assert_eq!(MenuAction::parse("/unknown"), None);
    }

    #[test]
    fn free_text_is_not_a_command() {
        assert_eq!(MenuAction::parse("Ivan"), None);
        assert_eq!(MenuAction::parse("my clients"), None);
    }
}
