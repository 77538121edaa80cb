// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row decoding and column encoding for storage entities.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text with millisecond
//! precision, so lexicographic order equals chronological order. Enums are
//! stored as their snake_case codes.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

pub use leadline_core::model::{Client, Company, Interaction};
use leadline_core::model::{ClientId, CompanyId, InteractionId};

/// Column list matching [`client_from_row`].
pub(crate) const CLIENT_COLUMNS: &str = "clients.id, clients.phone, clients.name, \
     clients.company_id, clients.source, clients.status, clients.interest, \
     clients.next_contact_at, clients.created_at, clients.updated_at";

/// Column list matching [`company_from_row`].
pub(crate) const COMPANY_COLUMNS: &str = "id, name, city, niche, phone, site, source, status, \
     priority, contact_person, note, created_at, updated_at";

/// Column list matching [`interaction_from_row`].
pub(crate) const INTERACTION_COLUMNS: &str =
    "id, client_id, created_at, result, status_after, comment";

/// Outcome of a write that can hit a missing row or a uniqueness conflict.
#[derive(Debug)]
pub(crate) enum WriteOutcome<T> {
    Done(T),
    Missing,
    Conflict,
}

/// Encode a timestamp for storage.
pub fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, truncated to the stored precision.
pub(crate) fn now_text() -> String {
    encode_time(&Utc::now())
}

fn decode_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn time_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    decode_time(idx, &raw)
}

fn optional_time_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|r| decode_time(idx, &r)).transpose()
}

/// Decode a snake_case enum code.
pub(crate) fn enum_at<T: FromStr>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    T::from_str(&raw).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown enum value `{raw}`").into(),
        )
    })
}

pub(crate) fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: ClientId(row.get(0)?),
        phone: row.get(1)?,
        name: row.get(2)?,
        company_id: row.get::<_, Option<i64>>(3)?.map(CompanyId),
        source: row.get(4)?,
        status: enum_at(row, 5)?,
        interest: enum_at(row, 6)?,
        next_contact_at: optional_time_at(row, 7)?,
        created_at: time_at(row, 8)?,
        updated_at: time_at(row, 9)?,
    })
}

pub(crate) fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: CompanyId(row.get(0)?),
        name: row.get(1)?,
        city: row.get(2)?,
        niche: row.get(3)?,
        phone: row.get(4)?,
        site: row.get(5)?,
        source: enum_at(row, 6)?,
        status: enum_at(row, 7)?,
        priority: enum_at(row, 8)?,
        contact_person: row.get(9)?,
        note: row.get(10)?,
        created_at: time_at(row, 11)?,
        updated_at: time_at(row, 12)?,
    })
}

pub(crate) fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<Interaction> {
    Ok(Interaction {
        id: InteractionId(row.get(0)?),
        client_id: ClientId(row.get(1)?),
        created_at: time_at(row, 2)?,
        result: enum_at(row, 3)?,
        status_after: enum_at(row, 4)?,
        comment: row.get(5)?,
    })
}

/// Case-insensitive substring test used by the name searches.
pub(crate) fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encoded_times_sort_chronologically() {
        let a = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(1);
        let c = Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap();
        assert!(encode_time(&a) < encode_time(&b));
        assert!(encode_time(&b) < encode_time(&c));
        assert_eq!(encode_time(&a), "2026-03-01T09:05:00.000Z");
    }

    #[test]
    fn decode_round_trips_encoded_text() {
        let t = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(decode_time(0, &encode_time(&t)).unwrap(), t);
    }

    #[test]
    fn decode_accepts_sqlite_default_timestamps() {
        let t = decode_time(0, "2026-01-02T03:04:05.678Z").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 678);
    }

    #[test]
    fn case_folding_handles_non_ascii() {
        assert!(contains_folded("ООО Ромашка", "ромаш"));
        assert!(contains_folded("Acme Corp", "acme"));
        assert!(!contains_folded("Acme", "zeta"));
    }
}
