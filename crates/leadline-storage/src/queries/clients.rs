// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client CRUD, filtered listing and lookups.

use chrono::{DateTime, Utc};
use leadline_core::LeadlineError;
use leadline_core::model::{
    Client, ClientChange, ClientFilter, ClientId, ClientStatus, EntityKind, NewClient,
    PageRequest,
};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, is_unique_violation, map_tr_err};
use crate::models::{
    CLIENT_COLUMNS, WriteOutcome, client_from_row, contains_folded, encode_time, enum_at,
    now_text,
};

fn select_by_id(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<Client>> {
    conn.query_row(
        &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
        params![id],
        client_from_row,
    )
    .optional()
}

/// Insert a client. A taken phone yields `Duplicate`.
pub async fn create_client(db: &Database, client: &NewClient) -> Result<Client, LeadlineError> {
    let client = client.clone();
    let phone = client.phone.clone();
    let outcome = db
        .connection()
        .call(move |conn| -> Result<WriteOutcome<Client>, rusqlite::Error> {
            let now = now_text();
            let inserted = conn.execute(
                "INSERT INTO clients (phone, name, company_id, source, status, interest,
                                      next_contact_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    client.phone,
                    client.name,
                    client.company_id.map(|c| c.0),
                    client.source,
                    client.status.to_string(),
                    client.interest.to_string(),
                    client.next_contact_at.as_ref().map(encode_time),
                    now,
                ],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => return Ok(WriteOutcome::Conflict),
                Err(e) => return Err(e),
            }
            let id = conn.last_insert_rowid();
            Ok(match select_by_id(conn, id)? {
                Some(row) => WriteOutcome::Done(row),
                None => WriteOutcome::Missing,
            })
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        WriteOutcome::Done(row) => Ok(row),
        WriteOutcome::Conflict => Err(LeadlineError::Duplicate {
            entity: EntityKind::Client,
            field: "phone",
            value: phone,
        }),
        WriteOutcome::Missing => Err(LeadlineError::Internal(
            "inserted client could not be read back".into(),
        )),
    }
}

/// Get a client by id.
pub async fn get_client(db: &Database, id: ClientId) -> Result<Option<Client>, LeadlineError> {
    db.connection()
        .call(move |conn| select_by_id(conn, id.0))
        .await
        .map_err(map_tr_err)
}

/// Persist all mutable fields of an existing client.
pub async fn update_client(db: &Database, client: &Client) -> Result<Client, LeadlineError> {
    let client = client.clone();
    let id = client.id;
    let phone = client.phone.clone();
    let outcome = db
        .connection()
        .call(move |conn| -> Result<WriteOutcome<Client>, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE clients SET phone = ?2, name = ?3, company_id = ?4, source = ?5,
                        status = ?6, interest = ?7, next_contact_at = ?8, updated_at = ?9
                 WHERE id = ?1",
                params![
                    client.id.0,
                    client.phone,
                    client.name,
                    client.company_id.map(|c| c.0),
                    client.source,
                    client.status.to_string(),
                    client.interest.to_string(),
                    client.next_contact_at.as_ref().map(encode_time),
                    now_text(),
                ],
            );
            match updated {
                Ok(0) => Ok(WriteOutcome::Missing),
                Ok(_) => Ok(select_by_id(conn, client.id.0)?
                    .map_or(WriteOutcome::Missing, WriteOutcome::Done)),
                Err(e) if is_unique_violation(&e) => Ok(WriteOutcome::Conflict),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    match outcome {
        WriteOutcome::Done(row) => Ok(row),
        WriteOutcome::Missing => Err(LeadlineError::NotFound {
            entity: EntityKind::Client,
            id: id.0,
        }),
        WriteOutcome::Conflict => Err(LeadlineError::Duplicate {
            entity: EntityKind::Client,
            field: "phone",
            value: phone,
        }),
    }
}

/// Write a single column of a client; the rest of the row is untouched.
pub async fn change_client(
    db: &Database,
    id: ClientId,
    change: ClientChange,
) -> Result<Client, LeadlineError> {
    let updated = db
        .connection()
        .call(move |conn| -> Result<Option<Client>, rusqlite::Error> {
            let now = now_text();
            let changed = match change {
                ClientChange::Status(status) => conn.execute(
                    "UPDATE clients SET status = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.0, status.to_string(), now],
                )?,
                ClientChange::Interest(interest) => conn.execute(
                    "UPDATE clients SET interest = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.0, interest.to_string(), now],
                )?,
                ClientChange::NextContact(at) => conn.execute(
                    "UPDATE clients SET next_contact_at = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.0, at.as_ref().map(encode_time), now],
                )?,
            };
            if changed == 0 {
                return Ok(None);
            }
            select_by_id(conn, id.0)
        })
        .await
        .map_err(map_tr_err)?;

    updated.ok_or(LeadlineError::NotFound {
        entity: EntityKind::Client,
        id: id.0,
    })
}

/// Delete a client and its interactions in one transaction.
pub async fn delete_client(db: &Database, id: ClientId) -> Result<(), LeadlineError> {
    let deleted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM interactions WHERE client_id = ?1", params![id.0])?;
            let removed = tx.execute("DELETE FROM clients WHERE id = ?1", params![id.0])?;
            if removed == 0 {
                return Ok(false);
            }
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if deleted {
        Ok(())
    } else {
        Err(LeadlineError::NotFound {
            entity: EntityKind::Client,
            id: id.0,
        })
    }
}

/// One page of clients matching `filter`, newest first.
pub async fn list_clients(
    db: &Database,
    filter: ClientFilter,
    page: PageRequest,
) -> Result<Vec<Client>, LeadlineError> {
    let (column, value) = match filter {
        ClientFilter::All => ("status", None),
        ClientFilter::Status(status) => ("status", Some(status.to_string())),
        ClientFilter::Interest(level) => ("interest", Some(level.to_string())),
    };
    let sql = format!(
        "SELECT {CLIENT_COLUMNS} FROM clients
         WHERE (?1 IS NULL OR {column} = ?1)
         ORDER BY created_at DESC, id DESC
         LIMIT ?2 OFFSET ?3"
    );
    let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<Client>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![value, limit, offset], client_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Statuses held by at least one client.
pub async fn distinct_client_statuses(db: &Database) -> Result<Vec<ClientStatus>, LeadlineError> {
    db.connection()
        .call(|conn| -> Result<Vec<ClientStatus>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT DISTINCT status FROM clients")?;
            let rows = stmt.query_map([], |row| enum_at(row, 0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Every client, newest first.
pub async fn all_clients(db: &Database) -> Result<Vec<Client>, LeadlineError> {
    db.connection()
        .call(|conn| -> Result<Vec<Client>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], client_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Clients whose name contains `needle`, ignoring case.
pub async fn search_by_name(db: &Database, needle: &str) -> Result<Vec<Client>, LeadlineError> {
    let needle = needle.to_lowercase();
    db.connection()
        .call(move |conn| -> Result<Vec<Client>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients
                 WHERE name IS NOT NULL
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], client_from_row)?;
            let mut found = Vec::new();
            for row in rows {
                let client = row?;
                if client
                    .name
                    .as_deref()
                    .is_some_and(|name| contains_folded(name, &needle))
                {
                    found.push(client);
                }
            }
            Ok(found)
        })
        .await
        .map_err(map_tr_err)
}

/// Clients whose owning company's name contains `needle`, ignoring case.
pub async fn search_by_company_name(
    db: &Database,
    needle: &str,
) -> Result<Vec<Client>, LeadlineError> {
    let needle = needle.to_lowercase();
    db.connection()
        .call(move |conn| -> Result<Vec<Client>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLIENT_COLUMNS}, companies.name FROM clients
                 JOIN companies ON companies.id = clients.company_id
                 ORDER BY clients.created_at DESC, clients.id DESC"
            ))?;
            let rows = stmt.query_map([], |row| {
                Ok((client_from_row(row)?, row.get::<_, String>(10)?))
            })?;
            let mut found = Vec::new();
            for row in rows {
                let (client, company_name) = row?;
                if contains_folded(&company_name, &needle) {
                    found.push(client);
                }
            }
            Ok(found)
        })
        .await
        .map_err(map_tr_err)
}

/// Clients with a next contact in `[from, to)`, earliest first.
pub async fn due_between(
    db: &Database,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Client>, LeadlineError> {
    let from = encode_time(&from);
    let to = encode_time(&to);
    db.connection()
        .call(move |conn| -> Result<Vec<Client>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients
                 WHERE next_contact_at >= ?1 AND next_contact_at < ?2
                 ORDER BY next_contact_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map(params![from, to], client_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
