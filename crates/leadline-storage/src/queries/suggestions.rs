// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remembered city and niche values.

use leadline_core::LeadlineError;
use leadline_core::model::SuggestionKind;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Remember a value. Returns `false` when the pair was already stored.
pub async fn insert_suggestion(
    db: &Database,
    kind: SuggestionKind,
    value: &str,
) -> Result<bool, LeadlineError> {
    let value = value.to_owned();
    let inserted = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO suggestions (kind, value) VALUES (?1, ?2)",
                params![kind.to_string(), value],
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(inserted > 0)
}

/// All remembered values of a kind, alphabetically.
pub async fn list_suggestions(
    db: &Database,
    kind: SuggestionKind,
) -> Result<Vec<String>, LeadlineError> {
    db.connection()
        .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt =
                conn.prepare("SELECT value FROM suggestions WHERE kind = ?1 ORDER BY value")?;
            let rows = stmt.query_map(params![kind.to_string()], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn values_are_deduplicated_per_kind() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("suggestions.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        assert!(insert_suggestion(&db, SuggestionKind::City, "Moscow").await.unwrap());
        assert!(!insert_suggestion(&db, SuggestionKind::City, "Moscow").await.unwrap());
        assert!(insert_suggestion(&db, SuggestionKind::City, "Kazan").await.unwrap());
        assert!(insert_suggestion(&db, SuggestionKind::Niche, "Moscow").await.unwrap());

        let cities = list_suggestions(&db, SuggestionKind::City).await.unwrap();
        assert_eq!(cities, vec!["Kazan".to_string(), "Moscow".to_string()]);
        let niches = list_suggestions(&db, SuggestionKind::Niche).await.unwrap();
        assert_eq!(niches, vec!["Moscow".to_string()]);
    }
}
