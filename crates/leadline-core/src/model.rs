// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model for the CRM: clients, companies, interactions and suggestions.
//!
//! Every enumerated domain is a closed enum. Storage and button tokens use the
//! snake_case form produced by `Display`/`FromStr`; human-readable labels are
//! rendered by the presentation layer with exhaustive matches.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Identifier of a persisted client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub i64);

/// Identifier of a persisted company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub i64);

/// Identifier of a persisted interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractionId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of persisted entities, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Client,
    Company,
    Interaction,
    Suggestion,
}

/// Pipeline status of a client (lead).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    New,
    PlannedCall,
    NoAnswer,
    Thinking,
    Agreed,
    Declined,
}

/// How interested a client is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterestLevel {
    Cold,
    Warm,
    Hot,
}

/// How a company entered the pipeline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompanySource {
    Found,
    Recommendation,
    Inbound,
}

/// Pipeline status of a target company.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    NotCalled,
    Research,
    NoAnswer,
    Negotiation,
    Client,
    Declined,
}

/// Priority of a target company.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

/// Channel through which an interaction happened.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InteractionResult {
    Call,
    Message,
    Meeting,
}

/// Kind of remembered free-text value offered as a quick pick.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    City,
    Niche,
}

/// A sales lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Canonical phone form, globally unique.
    pub phone: String,
    pub name: Option<String>,
    /// Weak reference: lookup only.
    pub company_id: Option<CompanyId>,
    pub source: String,
    pub status: ClientStatus,
    pub interest: InterestLevel,
    pub next_contact_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A client that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub phone: String,
    pub name: Option<String>,
    pub company_id: Option<CompanyId>,
    pub source: String,
    pub status: ClientStatus,
    pub interest: InterestLevel,
    pub next_contact_at: Option<DateTime<Utc>>,
}

/// A target organization. Owns its clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub city: Option<String>,
    pub niche: Option<String>,
    pub phone: Option<String>,
    pub site: Option<String>,
    pub source: CompanySource,
    pub status: CompanyStatus,
    pub priority: PriorityLevel,
    pub contact_person: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A company that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub city: Option<String>,
    pub niche: Option<String>,
    pub phone: Option<String>,
    pub site: Option<String>,
    pub source: CompanySource,
    pub status: CompanyStatus,
    pub priority: PriorityLevel,
    pub contact_person: Option<String>,
    pub note: Option<String>,
}

/// One entry of a client's append-only contact history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub client_id: ClientId,
    pub created_at: DateTime<Utc>,
    pub result: InteractionResult,
    /// Client status at the time the interaction was logged.
    pub status_after: ClientStatus,
    pub comment: Option<String>,
}

/// An interaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInteraction {
    pub client_id: ClientId,
    pub result: InteractionResult,
    pub status_after: ClientStatus,
    pub comment: Option<String>,
}

/// A single-column change to a stored client. Other columns keep whatever
/// value is stored when the change is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientChange {
    Status(ClientStatus),
    Interest(InterestLevel),
    /// `None` clears the scheduled contact.
    NextContact(Option<DateTime<Utc>>),
}

/// A single-column change to a stored company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyChange {
    Status(CompanyStatus),
    Priority(PriorityLevel),
    Note(Option<String>),
}

/// Filter applied to client list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientFilter {
    All,
    Status(ClientStatus),
    Interest(InterestLevel),
}

/// Filter applied to company list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyFilter {
    All,
    Status(CompanyStatus),
    Priority(PriorityLevel),
    Source(CompanySource),
}

/// Offset/limit window for ordered list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Window for a zero-based page of fixed size.
    pub fn page(index: usize, size: usize) -> Self {
        Self {
            offset: index.saturating_mul(size),
            limit: size,
        }
    }
}

/// Aggregate counters for the statistics report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientReport {
    pub total: u64,
    pub new: u64,
    /// planned_call + thinking + no_answer
    pub in_work: u64,
    pub agreed: u64,
    pub declined: u64,
    pub cold: u64,
    pub warm: u64,
    pub hot: u64,
    pub interactions_today: u64,
}
