// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only interaction history per client.

use leadline_core::LeadlineError;
use leadline_core::model::{
    ClientId, ClientStatus, EntityKind, Interaction, InteractionId, InteractionResult,
    NewInteraction,
};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{INTERACTION_COLUMNS, WriteOutcome, interaction_from_row, now_text};

/// Append an interaction to an existing client's history.
pub async fn add_interaction(
    db: &Database,
    interaction: &NewInteraction,
) -> Result<Interaction, LeadlineError> {
    let interaction = interaction.clone();
    let client_id = interaction.client_id;
    let outcome = db
        .connection()
        .call(move |conn| -> Result<WriteOutcome<Interaction>, rusqlite::Error> {
            let exists: Option<i64> = conn
                .query_row(
                    "SELECT id FROM clients WHERE id = ?1",
                    params![interaction.client_id.0],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_none() {
                return Ok(WriteOutcome::Missing);
            }
            conn.execute(
                "INSERT INTO interactions (client_id, created_at, result, status_after, comment)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    interaction.client_id.0,
                    now_text(),
                    interaction.result.to_string(),
                    interaction.status_after.to_string(),
                    interaction.comment,
                ],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                &format!("SELECT {INTERACTION_COLUMNS} FROM interactions WHERE id = ?1"),
                params![id],
                interaction_from_row,
            )?;
            Ok(WriteOutcome::Done(row))
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        WriteOutcome::Done(row) => Ok(row),
        WriteOutcome::Missing | WriteOutcome::Conflict => Err(LeadlineError::NotFound {
            entity: EntityKind::Client,
            id: client_id.0,
        }),
    }
}

/// Set a client's status and append the matching call entry atomically.
pub async fn log_call(
    db: &Database,
    client: ClientId,
    status: ClientStatus,
) -> Result<Interaction, LeadlineError> {
    let logged = db
        .connection()
        .call(move |conn| -> Result<Option<Interaction>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let now = now_text();
            let changed = tx.execute(
                "UPDATE clients SET status = ?2, updated_at = ?3 WHERE id = ?1",
                params![client.0, status.to_string(), now],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            tx.execute(
                "INSERT INTO interactions (client_id, created_at, result, status_after, comment)
                 VALUES (?1, ?2, ?3, ?4, NULL)",
                params![
                    client.0,
                    now,
                    InteractionResult::Call.to_string(),
                    status.to_string(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            let row = tx.query_row(
                &format!("SELECT {INTERACTION_COLUMNS} FROM interactions WHERE id = ?1"),
                params![id],
                interaction_from_row,
            )?;
            tx.commit()?;
            Ok(Some(row))
        })
        .await
        .map_err(map_tr_err)?;

    logged.ok_or(LeadlineError::NotFound {
        entity: EntityKind::Client,
        id: client.0,
    })
}

/// Replace the comment of an interaction. `None` clears it.
pub async fn set_comment(
    db: &Database,
    id: InteractionId,
    comment: Option<&str>,
) -> Result<(), LeadlineError> {
    let comment = comment.map(str::to_owned);
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE interactions SET comment = ?2 WHERE id = ?1",
                params![id.0, comment],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(LeadlineError::NotFound {
            entity: EntityKind::Interaction,
            id: id.0,
        });
    }
    Ok(())
}

/// The most recent interaction of a client.
pub async fn latest_interaction(
    db: &Database,
    client: ClientId,
) -> Result<Option<Interaction>, LeadlineError> {
    Ok(list_interactions(db, client, 1).await?.into_iter().next())
}

/// Up to `limit` interactions of a client, newest first.
pub async fn list_interactions(
    db: &Database,
    client: ClientId,
    limit: usize,
) -> Result<Vec<Interaction>, LeadlineError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<Interaction>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {INTERACTION_COLUMNS} FROM interactions
                 WHERE client_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![client.0, limit], interaction_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
