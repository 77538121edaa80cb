// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure input normalization: phone numbers, optional fields and bulk lines.

use leadline_core::LeadlineError;

/// Literal input meaning "leave this field unset".
pub const SKIP_TOKEN: &str = "-";

/// Canonical phone form: digits with a single leading `+`.
///
/// A leading `8` is rewritten to `+7`. Total and idempotent: any input yields
/// a stable canonical string, even when it holds no digits at all.
pub fn normalize_phone(raw: &str) -> String {
    let mut digits = String::with_capacity(raw.len() + 1);
    for (i, ch) in raw.trim().char_indices() {
        if ch.is_ascii_digit() || (ch == '+' && i == 0) {
            digits.push(ch);
        }
    }
    if let Some(rest) = digits.strip_prefix('8') {
        digits = format!("+7{rest}");
    }
    if !digits.starts_with('+') {
        digits.insert(0, '+');
    }
    digits
}

/// Digits-only form used for phone search on both sides of the comparison.
pub fn phone_search_key(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('8') {
        Some(rest) => format!("7{rest}"),
        None => digits,
    }
}

/// `https://wa.me/<digits>` for a phone with at least one digit.
pub fn whatsapp_url(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("https://wa.me/{digits}"))
    }
}

/// Applies the shared optional-field convention.
///
/// Blank input and the skip token both mean "unset"; anything else is kept,
/// trimmed.
pub fn optional_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == SKIP_TOKEN {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One `phone-name` row of a bulk company block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkLine {
    pub phone: Option<String>,
    pub name: String,
}

/// Splits a line on its first `-`: phone before (optional), name after (required).
pub fn parse_bulk_line(line: &str) -> Result<BulkLine, LeadlineError> {
    let Some((phone, name)) = line.split_once('-') else {
        return Err(LeadlineError::Validation(format!(
            "Each line must look like `phone-name`: {}",
            line.trim()
        )));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(LeadlineError::Validation(format!(
            "Company name cannot be empty: {}",
            line.trim()
        )));
    }
    let phone = phone.trim();
    Ok(BulkLine {
        phone: (!phone.is_empty()).then(|| phone.to_string()),
        name: name.to_string(),
    })
}

/// Parses a newline-delimited block, skipping blank lines.
pub fn parse_bulk_block(text: &str) -> Result<Vec<BulkLine>, LeadlineError> {
    let lines = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_bulk_line)
        .collect::<Result<Vec<_>, _>>()?;
    if lines.is_empty() {
        return Err(LeadlineError::Validation("The company list is empty".into()));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn leading_eight_becomes_plus_seven() {
        assert_eq!(normalize_phone("89991234567"), "+79991234567");
    }

    #[test]
    fn no_country_inference_beyond_leading_eight() {
        assert_eq!(normalize_phone("9991234567"), "+9991234567");
    }

    #[test]
    fn punctuation_and_spaces_are_stripped() {
        assert_eq!(normalize_phone("+7 (999) 123-45-67"), "+79991234567");
        assert_eq!(normalize_phone("  +7 999 123 45 67  "), "+79991234567");
    }

    #[test]
    fn inner_plus_signs_are_dropped() {
        assert_eq!(normalize_phone("7+99+9"), "+7999");
    }

    #[test]
    fn garbage_is_stable() {
        assert_eq!(normalize_phone("call me"), "+");
        assert_eq!(normalize_phone(""), "+");
    }

    #[test]
    fn search_key_keeps_digits_only() {
        assert_eq!(phone_search_key("+7 (999) 123"), "7999123");
        assert_eq!(phone_search_key("8-999"), "7999");
        assert_eq!(phone_search_key("no digits"), "");
    }

    #[test]
    fn whatsapp_link_needs_digits() {
        assert_eq!(
            whatsapp_url("+7 999 123").as_deref(),
            Some("https://wa.me/7999123")
        );
        assert!(whatsapp_url("n/a").is_none());
    }

    #[test]
    fn skip_token_and_blank_mean_unset() {
        assert_eq!(optional_field("-"), None);
        assert_eq!(optional_field("  - "), None);
        assert_eq!(optional_field("   "), None);
        assert_eq!(optional_field(" Kazan ").as_deref(), Some("Kazan"));
    }

    #[test]
    fn bulk_line_with_phone() {
        assert_eq!(
            parse_bulk_line("+79990000000-Acme").unwrap(),
            BulkLine {
                phone: Some("+79990000000".into()),
                name: "Acme".into()
            }
        );
    }

    #[test]
    fn bulk_line_without_phone() {
        assert_eq!(
            parse_bulk_line("-NoPhoneCo").unwrap(),
            BulkLine {
                phone: None,
                name: "NoPhoneCo".into()
            }
        );
    }

    #[test]
    fn bulk_line_splits_on_first_dash_only() {
        let line = parse_bulk_line("123 - Smith-Jones Ltd").unwrap();
        assert_eq!(line.phone.as_deref(), Some("123"));
        assert_eq!(line.name, "Smith-Jones Ltd");
    }

    #[test]
    fn bulk_line_errors_name_the_line() {
        let err = parse_bulk_line("JustAName").unwrap_err();
        assert!(matches!(err, LeadlineError::Validation(_)));
        assert!(err.to_string().contains("JustAName"));

        let err = parse_bulk_line("+7000-").unwrap_err();
        assert!(matches!(err, LeadlineError::Validation(_)));
        assert!(err.to_string().contains("+7000-"));
    }

    #[test]
    fn bulk_block_skips_blank_lines() {
        let lines = parse_bulk_block("1-A\n\n   \n2-B\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].name, "B");
    }

    #[test]
    fn bulk_block_rejects_empty_and_bad_lines() {
        assert!(parse_bulk_block("\n  \n").is_err());
        assert!(parse_bulk_block("1-A\nbroken").is_err());
    }

    proptest! {
        #[test]
        fn normalize_phone_is_idempotent(raw in ".*") {
            let once = normalize_phone(&raw);
            prop_assert_eq!(normalize_phone(&once), once);
        }

        #[test]
        fn normalized_phone_is_plus_then_digits(raw in "[0-9 +()\\-]{0,20}") {
            let canonical = normalize_phone(&raw);
            prop_assert!(canonical.starts_with('+'));
            prop_assert!(canonical[1..].chars().all(|c| c.is_ascii_digit()));
        }
    }
}
