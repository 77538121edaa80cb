// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate counters for the statistics report.

use chrono::{DateTime, Utc};
use leadline_core::LeadlineError;
use leadline_core::model::ClientReport;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::encode_time;

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Client counters plus the number of interactions logged in `[day_start, day_end)`.
pub async fn client_report(
    db: &Database,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> Result<ClientReport, LeadlineError> {
    let from = encode_time(&day_start);
    let to = encode_time(&day_end);
    db.connection()
        .call(move |conn| -> Result<ClientReport, rusqlite::Error> {
            let mut report = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(CASE WHEN status = 'new' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status IN ('planned_call', 'thinking', 'no_answer')
                                          THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status = 'agreed' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status = 'declined' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN interest = 'cold' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN interest = 'warm' THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN interest = 'hot' THEN 1 ELSE 0 END), 0)
                 FROM clients",
                [],
                |row| {
                    Ok(ClientReport {
                        total: count(row.get(0)?),
                        new: count(row.get(1)?),
                        in_work: count(row.get(2)?),
                        agreed: count(row.get(3)?),
                        declined: count(row.get(4)?),
                        cold: count(row.get(5)?),
                        warm: count(row.get(6)?),
                        hot: count(row.get(7)?),
                        interactions_today: 0,
                    })
                },
            )?;
            let today: i64 = conn.query_row(
                "SELECT COUNT(*) FROM interactions WHERE created_at >= ?1 AND created_at < ?2",
                params![from, to],
                |row| row.get(0),
            )?;
            report.interactions_today = count(today);
            Ok(report)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use leadline_core::model::{
        ClientStatus, InteractionResult, InterestLevel, NewClient, NewInteraction,
    };
    use tempfile::tempdir;

    use crate::queries::{clients, interactions};

    #[tokio::test]
    async fn empty_database_reports_zeros() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("stats.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let now = Utc::now();
        let report = client_report(&db, now - Duration::days(1), now + Duration::days(1))
            .await
            .unwrap();
        assert_eq!(report, ClientReport::default());
    }

    #[tokio::test]
    async fn counts_group_statuses_and_interest() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("stats.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let seed = [
            (ClientStatus::New, InterestLevel::Cold),
            (ClientStatus::PlannedCall, InterestLevel::Warm),
            (ClientStatus::Thinking, InterestLevel::Warm),
            (ClientStatus::NoAnswer, InterestLevel::Cold),
            (ClientStatus::Agreed, InterestLevel::Hot),
            (ClientStatus::Declined, InterestLevel::Cold),
        ];
        let mut first = None;
        for (i, (status, interest)) in seed.into_iter().enumerate() {
            let client = clients::create_client(
                &db,
                &NewClient {
                    phone: format!("+7911000000{i}"),
                    name: None,
                    company_id: None,
                    source: "call".to_string(),
                    status,
                    interest,
                    next_contact_at: None,
                },
            )
            .await
            .unwrap();
            first.get_or_insert(client.id);
        }
        interactions::add_interaction(
            &db,
            &NewInteraction {
                client_id: first.unwrap(),
                result: InteractionResult::Call,
                status_after: ClientStatus::New,
                comment: None,
            },
        )
        .await
        .unwrap();

        let now = Utc::now();
        let report = client_report(&db, now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(report.total, 6);
        assert_eq!(report.new, 1);
        assert_eq!(report.in_work, 3);
        assert_eq!(report.agreed, 1);
        assert_eq!(report.declined, 1);
        assert_eq!(report.cold, 3);
        assert_eq!(report.warm, 2);
        assert_eq!(report.hot, 1);
        assert_eq!(report.interactions_today, 1);

        let yesterday = client_report(
            &db,
            now - Duration::days(2),
            now - Duration::days(1),
        )
        .await
        .unwrap();
        assert_eq!(yesterday.interactions_today, 0);
    }
}
