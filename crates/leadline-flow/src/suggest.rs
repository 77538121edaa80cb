// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion recall: remembered cities and niches offered as quick picks.

use leadline_core::model::SuggestionKind;
use leadline_core::{CrmRepository, LeadlineError};
use tracing::debug;

/// Remember a value. Absent and blank values are ignored; repeats are no-ops.
pub async fn record(
    repo: &dyn CrmRepository,
    kind: SuggestionKind,
    value: Option<&str>,
) -> Result<(), LeadlineError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    if repo.insert_suggestion(kind, value).await? {
        debug!(%kind, value, "suggestion remembered");
    }
    Ok(())
}

/// All remembered values of a kind, alphabetically.
pub async fn list(
    repo: &dyn CrmRepository,
    kind: SuggestionKind,
) -> Result<Vec<String>, LeadlineError> {
    repo.list_suggestions(kind).await
}
