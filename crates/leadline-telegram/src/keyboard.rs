// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of channel-agnostic keyboards into Telegram reply markup.

use leadline_core::types::{Button, ButtonAction, Keyboard};
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};
use tracing::warn;

/// Builds the reply markup for a keyboard.
///
/// URL buttons whose target does not parse are dropped with a warning;
/// rows left empty by that are omitted.
pub fn to_reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(rows) => {
            let rows: Vec<Vec<InlineKeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().filter_map(inline_button).collect::<Vec<_>>())
                .filter(|row| !row.is_empty())
                .collect();
            InlineKeyboardMarkup::new(rows).into()
        }
        Keyboard::Menu(rows) => {
            let rows: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| row.iter().map(KeyboardButton::new).collect())
                .collect();
            KeyboardMarkup::new(rows).resize_keyboard().into()
        }
    }
}

fn inline_button(button: &Button) -> Option<InlineKeyboardButton> {
    match &button.action {
        ButtonAction::Callback(token) => Some(InlineKeyboardButton::callback(
            button.label.clone(),
            token.clone(),
        )),
        ButtonAction::Url(target) => match reqwest::Url::parse(target) {
            Ok(url) => Some(InlineKeyboardButton::url(button.label.clone(), url)),
            Err(e) => {
                warn!(url = target.as_str(), error = %e, "dropping button with invalid url");
                None
            }
        },
    }
}
