// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity repository trait: typed create/read/update/delete and filtered,
//! ordered queries over clients, companies, interactions and suggestions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::LeadlineError;
use crate::model::{
    Client, ClientChange, ClientFilter, ClientId, ClientReport, ClientStatus, Company,
    CompanyChange, CompanyFilter, CompanyId, CompanyStatus, Interaction, InteractionId, NewClient,
    NewCompany, NewInteraction, PageRequest, SuggestionKind,
};

/// Persistence operations consumed by the conversation engine.
///
/// Implementations must enforce client phone uniqueness atomically and report
/// violations as [`LeadlineError::Duplicate`]. Operations on ids that do not
/// exist report [`LeadlineError::NotFound`]. List queries are ordered by
/// creation time, newest first, with the id as tie breaker.
#[async_trait]
pub trait CrmRepository: Send + Sync {
    // --- Clients ---

    /// Inserts a client. Fails with `Duplicate` when the phone is taken.
    async fn create_client(&self, client: &NewClient) -> Result<Client, LeadlineError>;

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, LeadlineError>;

    /// Persists every mutable field of `client` and bumps `updated_at`.
    async fn update_client(&self, client: &Client) -> Result<Client, LeadlineError>;

    /// Writes one column and bumps `updated_at`, leaving concurrent changes
    /// to other columns intact. Returns the stored row after the change.
    async fn change_client(
        &self,
        id: ClientId,
        change: ClientChange,
    ) -> Result<Client, LeadlineError>;

    /// Deletes a client together with its interactions.
    async fn delete_client(&self, id: ClientId) -> Result<(), LeadlineError>;

    async fn list_clients(
        &self,
        filter: ClientFilter,
        page: PageRequest,
    ) -> Result<Vec<Client>, LeadlineError>;

    /// Statuses that currently have at least one client, in no particular order.
    async fn distinct_client_statuses(&self) -> Result<Vec<ClientStatus>, LeadlineError>;

    async fn all_clients(&self) -> Result<Vec<Client>, LeadlineError>;

    /// Case-insensitive substring match on the client name.
    async fn search_clients_by_name(&self, needle: &str) -> Result<Vec<Client>, LeadlineError>;

    /// Clients whose owning company name matches, case-insensitively.
    async fn search_clients_by_company_name(
        &self,
        needle: &str,
    ) -> Result<Vec<Client>, LeadlineError>;

    /// Clients with a next contact in `[from, to)`, earliest first.
    async fn clients_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Client>, LeadlineError>;

    // --- Companies ---

    /// Inserts all companies in one transaction; none are stored on failure.
    async fn create_companies(
        &self,
        companies: &[NewCompany],
    ) -> Result<Vec<Company>, LeadlineError>;

    async fn create_company(&self, company: &NewCompany) -> Result<Company, LeadlineError> {
        self.create_companies(std::slice::from_ref(company))
            .await?
            .pop()
            .ok_or_else(|| LeadlineError::Internal("company insert returned no row".into()))
    }

    async fn get_company(&self, id: CompanyId) -> Result<Option<Company>, LeadlineError>;

    async fn update_company(&self, company: &Company) -> Result<Company, LeadlineError>;

    async fn change_company(
        &self,
        id: CompanyId,
        change: CompanyChange,
    ) -> Result<Company, LeadlineError>;

    /// Deletes a company, its clients and their interactions in one transaction.
    async fn delete_company(&self, id: CompanyId) -> Result<(), LeadlineError>;

    async fn list_companies(
        &self,
        filter: CompanyFilter,
        page: PageRequest,
    ) -> Result<Vec<Company>, LeadlineError>;

    async fn distinct_company_statuses(&self) -> Result<Vec<CompanyStatus>, LeadlineError>;

    async fn all_companies(&self) -> Result<Vec<Company>, LeadlineError>;

    async fn search_companies_by_name(
        &self,
        needle: &str,
    ) -> Result<Vec<Company>, LeadlineError>;

    // --- Interactions ---

    /// Appends an interaction. Fails with `NotFound` when the client is gone.
    async fn add_interaction(
        &self,
        interaction: &NewInteraction,
    ) -> Result<Interaction, LeadlineError>;

    /// Sets the client's status and appends a call entry carrying it, in one
    /// transaction: either both are stored or neither is.
    async fn log_call(
        &self,
        client: ClientId,
        status: ClientStatus,
    ) -> Result<Interaction, LeadlineError>;

    async fn set_interaction_comment(
        &self,
        id: InteractionId,
        comment: Option<&str>,
    ) -> Result<(), LeadlineError>;

    async fn latest_interaction(
        &self,
        client: ClientId,
    ) -> Result<Option<Interaction>, LeadlineError>;

    /// Newest first.
    async fn list_interactions(
        &self,
        client: ClientId,
        limit: usize,
    ) -> Result<Vec<Interaction>, LeadlineError>;

    // --- Suggestions ---

    /// Inserts the pair unless it already exists. Returns `true` when inserted.
    async fn insert_suggestion(
        &self,
        kind: SuggestionKind,
        value: &str,
    ) -> Result<bool, LeadlineError>;

    /// All values of a kind, alphabetically.
    async fn list_suggestions(&self, kind: SuggestionKind) -> Result<Vec<String>, LeadlineError>;

    // --- Reporting ---

    /// Aggregate counters; interactions are counted inside `[day_start, day_end)`.
    async fn client_report(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<ClientReport, LeadlineError>;
}
