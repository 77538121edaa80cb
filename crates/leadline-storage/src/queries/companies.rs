// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Company CRUD, batch insert, cascade delete and filtered listing.

use leadline_core::LeadlineError;
use leadline_core::model::{
    Company, CompanyChange, CompanyFilter, CompanyId, CompanyStatus, EntityKind, NewCompany,
    PageRequest,
};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::{COMPANY_COLUMNS, company_from_row, contains_folded, enum_at, now_text};

fn select_by_id(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<Company>> {
    conn.query_row(
        &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?1"),
        params![id],
        company_from_row,
    )
    .optional()
}

/// Insert every company in one transaction and return the stored rows.
pub async fn create_companies(
    db: &Database,
    companies: &[NewCompany],
) -> Result<Vec<Company>, LeadlineError> {
    let companies = companies.to_vec();
    db.connection()
        .call(move |conn| -> Result<Vec<Company>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let now = now_text();
            let mut ids = Vec::with_capacity(companies.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO companies (name, city, niche, phone, site, source, status,
                                            priority, contact_person, note, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                )?;
                for company in &companies {
                    stmt.execute(params![
                        company.name,
                        company.city,
                        company.niche,
                        company.phone,
                        company.site,
                        company.source.to_string(),
                        company.status.to_string(),
                        company.priority.to_string(),
                        company.contact_person,
                        company.note,
                        now,
                    ])?;
                    ids.push(tx.last_insert_rowid());
                }
            }
            let mut stored = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(company) = select_by_id(&tx, id)? {
                    stored.push(company);
                }
            }
            tx.commit()?;
            Ok(stored)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a company by id.
pub async fn get_company(db: &Database, id: CompanyId) -> Result<Option<Company>, LeadlineError> {
    db.connection()
        .call(move |conn| select_by_id(conn, id.0))
        .await
        .map_err(map_tr_err)
}

/// Persist all mutable fields of an existing company.
pub async fn update_company(db: &Database, company: &Company) -> Result<Company, LeadlineError> {
    let company = company.clone();
    let id = company.id;
    let updated = db
        .connection()
        .call(move |conn| -> Result<Option<Company>, rusqlite::Error> {
            let changed = conn.execute(
                "UPDATE companies SET name = ?2, city = ?3, niche = ?4, phone = ?5, site = ?6,
                        source = ?7, status = ?8, priority = ?9, contact_person = ?10,
                        note = ?11, updated_at = ?12
                 WHERE id = ?1",
                params![
                    company.id.0,
                    company.name,
                    company.city,
                    company.niche,
                    company.phone,
                    company.site,
                    company.source.to_string(),
                    company.status.to_string(),
                    company.priority.to_string(),
                    company.contact_person,
                    company.note,
                    now_text(),
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            select_by_id(conn, company.id.0)
        })
        .await
        .map_err(map_tr_err)?;

    updated.ok_or(LeadlineError::NotFound {
        entity: EntityKind::Company,
        id: id.0,
    })
}

/// Write a single column of a company; the rest of the row is untouched.
pub async fn change_company(
    db: &Database,
    id: CompanyId,
    change: CompanyChange,
) -> Result<Company, LeadlineError> {
    let updated = db
        .connection()
        .call(move |conn| -> Result<Option<Company>, rusqlite::Error> {
            let now = now_text();
            let changed = match change {
                CompanyChange::Status(status) => conn.execute(
                    "UPDATE companies SET status = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.0, status.to_string(), now],
                )?,
                CompanyChange::Priority(priority) => conn.execute(
                    "UPDATE companies SET priority = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.0, priority.to_string(), now],
                )?,
                CompanyChange::Note(note) => conn.execute(
                    "UPDATE companies SET note = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id.0, note, now],
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
        entity: EntityKind::Company,
        id: id.0,
    })
}

/// Delete a company with its clients and their interactions, atomically.
pub async fn delete_company(db: &Database, id: CompanyId) -> Result<(), LeadlineError> {
    let deleted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM interactions
                 WHERE client_id IN (SELECT id FROM clients WHERE company_id = ?1)",
                params![id.0],
            )?;
            let clients = tx.execute("DELETE FROM clients WHERE company_id = ?1", params![id.0])?;
            let removed = tx.execute("DELETE FROM companies WHERE id = ?1", params![id.0])?;
            if removed == 0 {
                return Ok(false);
            }
            tx.commit()?;
            tracing::debug!(company_id = id.0, clients, "company deleted with its clients");
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if deleted {
        Ok(())
    } else {
        Err(LeadlineError::NotFound {
            entity: EntityKind::Company,
            id: id.0,
        })
    }
}

/// One page of companies matching `filter`, newest first.
pub async fn list_companies(
    db: &Database,
    filter: CompanyFilter,
    page: PageRequest,
) -> Result<Vec<Company>, LeadlineError> {
    let (column, value) = match filter {
        CompanyFilter::All => ("status", None),
        CompanyFilter::Status(status) => ("status", Some(status.to_string())),
        CompanyFilter::Priority(priority) => ("priority", Some(priority.to_string())),
        CompanyFilter::Source(source) => ("source", Some(source.to_string())),
    };
    let sql = format!(
        "SELECT {COMPANY_COLUMNS} FROM companies
         WHERE (?1 IS NULL OR {column} = ?1)
         ORDER BY created_at DESC, id DESC
         LIMIT ?2 OFFSET ?3"
    );
    let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<Company>, rusqlite::Error> {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![value, limit, offset], company_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Statuses held by at least one company.
pub async fn distinct_company_statuses(
    db: &Database,
) -> Result<Vec<CompanyStatus>, LeadlineError> {
    db.connection()
        .call(|conn| -> Result<Vec<CompanyStatus>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT DISTINCT status FROM companies")?;
            let rows = stmt.query_map([], |row| enum_at(row, 0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Every company, newest first.
pub async fn all_companies(db: &Database) -> Result<Vec<Company>, LeadlineError> {
    db.connection()
        .call(|conn| -> Result<Vec<Company>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], company_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Companies whose name contains `needle`, ignoring case.
pub async fn search_by_name(db: &Database, needle: &str) -> Result<Vec<Company>, LeadlineError> {
    let needle = needle.to_lowercase();
    let companies = all_companies(db).await?;
    Ok(companies
        .into_iter()
        .filter(|c| contains_folded(&c.name, &needle))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::model::{
        ClientStatus, CompanySource, InteractionResult, InterestLevel, NewClient,
        NewInteraction, PriorityLevel,
    };
    use tempfile::tempdir;

    use crate::queries::{clients, interactions};

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("companies.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn new_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            city: Some("Kazan".to_string()),
            niche: None,
            phone: None,
            site: None,
            source: CompanySource::Found,
            status: CompanyStatus::NotCalled,
            priority: PriorityLevel::Low,
            contact_person: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn single_column_changes_keep_other_columns() {
        let (db, _dir) = test_db().await;
        let company = create_companies(&db, &[new_company("Acme")])
            .await
            .unwrap()
            .remove(0);

        change_company(&db, company.id, CompanyChange::Status(CompanyStatus::Negotiation))
            .await
            .unwrap();
        change_company(&db, company.id, CompanyChange::Priority(PriorityLevel::High))
            .await
            .unwrap();
        let noted = change_company(&db, company.id, CompanyChange::Note(Some("call Monday".into())))
            .await
            .unwrap();
        assert_eq!(noted.status, CompanyStatus::Negotiation);
        assert_eq!(noted.priority, PriorityLevel::High);
        assert_eq!(noted.note.as_deref(), Some("call Monday"));
        assert_eq!(noted.city.as_deref(), Some("Kazan"));

        let cleared = change_company(&db, company.id, CompanyChange::Note(None))
            .await
            .unwrap();
        assert!(cleared.note.is_none());

        let err = change_company(&db, CompanyId(404), CompanyChange::Note(None))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn batch_insert_returns_rows_in_input_order() {
        let (db, _dir) = test_db().await;
        let created = create_companies(&db, &[new_company("A"), new_company("B")])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].name, "A");
        assert_eq!(created[1].name, "B");
        assert!(created[0].id < created[1].id);
    }

    #[tokio::test]
    async fn update_and_get_company() {
        let (db, _dir) = test_db().await;
        let mut company = create_companies(&db, &[new_company("Acme")])
            .await
            .unwrap()
            .remove(0);
        company.note = Some("call after lunch".to_string());
        company.priority = PriorityLevel::High;
        update_company(&db, &company).await.unwrap();

        let loaded = get_company(&db, company.id).await.unwrap().unwrap();
        assert_eq!(loaded.note.as_deref(), Some("call after lunch"));
        assert_eq!(loaded.priority, PriorityLevel::High);
    }

    #[tokio::test]
    async fn delete_cascades_to_clients_and_interactions() {
        let (db, _dir) = test_db().await;
        let company = create_companies(&db, &[new_company("Acme")])
            .await
            .unwrap()
            .remove(0);
        let client = clients::create_client(
            &db,
            &NewClient {
                phone: "+70000000001".to_string(),
                name: None,
                company_id: Some(company.id),
                source: "call".to_string(),
                status: ClientStatus::New,
                interest: InterestLevel::Warm,
                next_contact_at: None,
            },
        )
        .await
        .unwrap();
        interactions::add_interaction(
            &db,
            &NewInteraction {
                client_id: client.id,
                result: InteractionResult::Call,
                status_after: ClientStatus::New,
                comment: None,
            },
        )
        .await
        .unwrap();

        delete_company(&db, company.id).await.unwrap();

        assert!(get_company(&db, company.id).await.unwrap().is_none());
        assert!(clients::get_client(&db, client.id).await.unwrap().is_none());
        assert!(
            interactions::list_interactions(&db, client.id, 10)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(delete_company(&db, company.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn list_filters_by_status_priority_and_source() {
        let (db, _dir) = test_db().await;
        let mut hot = new_company("Hot");
        hot.priority = PriorityLevel::High;
        hot.source = CompanySource::Inbound;
        hot.status = CompanyStatus::Negotiation;
        create_companies(&db, &[new_company("Cold"), hot]).await.unwrap();

        let page = PageRequest::page(0, 5);
        let by_priority = list_companies(&db, CompanyFilter::Priority(PriorityLevel::High), page)
            .await
            .unwrap();
        assert_eq!(by_priority.len(), 1);
        assert_eq!(by_priority[0].name, "Hot");

        let by_source = list_companies(&db, CompanyFilter::Source(CompanySource::Found), page)
            .await
            .unwrap();
        assert_eq!(by_source.len(), 1);
        assert_eq!(by_source[0].name, "Cold");

        let by_status = list_companies(
            &db,
            CompanyFilter::Status(CompanyStatus::Negotiation),
            page,
        )
        .await
        .unwrap();
        assert_eq!(by_status.len(), 1);

        let all = list_companies(&db, CompanyFilter::All, page).await.unwrap();
        assert_eq!(all[0].name, "Hot");

        let mut statuses = distinct_company_statuses(&db).await.unwrap();
        statuses.sort_by_key(|s| s.to_string());
        assert_eq!(
            statuses,
            vec![CompanyStatus::Negotiation, CompanyStatus::NotCalled]
        );
    }

    #[tokio::test]
    async fn name_search_ignores_case() {
        let (db, _dir) = test_db().await;
        create_companies(&db, &[new_company("Acme Corp"), new_company("Zeta")])
            .await
            .unwrap();
        let found = search_by_name(&db, "acme").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Acme Corp");
    }
}
