// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage and repository traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use leadline_config::model::StorageConfig;
use leadline_core::model::{
    Client, ClientChange, ClientFilter, ClientId, ClientReport, ClientStatus, Company,
    CompanyChange, CompanyFilter, CompanyId, CompanyStatus, Interaction, InteractionId, NewClient,
    NewCompany, NewInteraction, PageRequest, SuggestionKind,
};
use leadline_core::{
    AdapterType, CrmRepository, HealthStatus, LeadlineError, PluginAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed CRM storage.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by
/// [`StorageAdapter::initialize`]; every repository call before that fails
/// with a storage error.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, LeadlineError> {
        self.db.get().ok_or_else(|| {
            LeadlineError::storage("storage not initialized, call initialize() first")
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadlineError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadlineError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), LeadlineError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with_options(&path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| LeadlineError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), LeadlineError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl CrmRepository for SqliteStorage {
    // --- Clients ---

    async fn create_client(&self, client: &NewClient) -> Result<Client, LeadlineError> {
        queries::clients::create_client(self.db()?, client).await
    }

    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, LeadlineError> {
        queries::clients::get_client(self.db()?, id).await
    }

    async fn update_client(&self, client: &Client) -> Result<Client, LeadlineError> {
        queries::clients::update_client(self.db()?, client).await
    }

    async fn change_client(
        &self,
        id: ClientId,
        change: ClientChange,
    ) -> Result<Client, LeadlineError> {
        queries::clients::change_client(self.db()?, id, change).await
    }

    async fn delete_client(&self, id: ClientId) -> Result<(), LeadlineError> {
        queries::clients::delete_client(self.db()?, id).await
    }

    async fn list_clients(
        &self,
        filter: ClientFilter,
        page: PageRequest,
    ) -> Result<Vec<Client>, LeadlineError> {
        queries::clients::list_clients(self.db()?, filter, page).await
    }

    async fn distinct_client_statuses(&self) -> Result<Vec<ClientStatus>, LeadlineError> {
        queries::clients::distinct_client_statuses(self.db()?).await
    }

    async fn all_clients(&self) -> Result<Vec<Client>, LeadlineError> {
        queries::clients::all_clients(self.db()?).await
    }

    async fn search_clients_by_name(&self, needle: &str) -> Result<Vec<Client>, LeadlineError> {
        queries::clients::search_by_name(self.db()?, needle).await
    }

    async fn search_clients_by_company_name(
        &self,
        needle: &str,
    ) -> Result<Vec<Client>, LeadlineError> {
        queries::clients::search_by_company_name(self.db()?, needle).await
    }

    async fn clients_due_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Client>, LeadlineError> {
        queries::clients::due_between(self.db()?, from, to).await
    }

    // --- Companies ---

    async fn create_companies(
        &self,
        companies: &[NewCompany],
    ) -> Result<Vec<Company>, LeadlineError> {
        queries::companies::create_companies(self.db()?, companies).await
    }

    async fn get_company(&self, id: CompanyId) -> Result<Option<Company>, LeadlineError> {
        queries::companies::get_company(self.db()?, id).await
    }

    async fn update_company(&self, company: &Company) -> Result<Company, LeadlineError> {
        queries::companies::update_company(self.db()?, company).await
    }

    async fn change_company(
        &self,
        id: CompanyId,
        change: CompanyChange,
    ) -> Result<Company, LeadlineError> {
        queries::companies::change_company(self.db()?, id, change).await
    }

    async fn delete_company(&self, id: CompanyId) -> Result<(), LeadlineError> {
        queries::companies::delete_company(self.db()?, id).await
    }

    async fn list_companies(
        &self,
        filter: CompanyFilter,
        page: PageRequest,
    ) -> Result<Vec<Company>, LeadlineError> {
        queries::companies::list_companies(self.db()?, filter, page).await
    }

    async fn distinct_company_statuses(&self) -> Result<Vec<CompanyStatus>, LeadlineError> {
        queries::companies::distinct_company_statuses(self.db()?).await
    }

    async fn all_companies(&self) -> Result<Vec<Company>, LeadlineError> {
        queries::companies::all_companies(self.db()?).await
    }

    async fn search_companies_by_name(
        &self,
        needle: &str,
    ) -> Result<Vec<Company>, LeadlineError> {
        queries::companies::search_by_name(self.db()?, needle).await
    }

    // --- Interactions ---

    async fn add_interaction(
        &self,
        interaction: &NewInteraction,
    ) -> Result<Interaction, LeadlineError> {
        queries::interactions::add_interaction(self.db()?, interaction).await
    }

    async fn log_call(
        &self,
        client: ClientId,
        status: ClientStatus,
    ) -> Result<Interaction, LeadlineError> {
        queries::interactions::log_call(self.db()?, client, status).await
    }

    async fn set_interaction_comment(
        &self,
        id: InteractionId,
        comment: Option<&str>,
    ) -> Result<(), LeadlineError> {
        queries::interactions::set_comment(self.db()?, id, comment).await
    }

    async fn latest_interaction(
        &self,
        client: ClientId,
    ) -> Result<Option<Interaction>, LeadlineError> {
        queries::interactions::latest_interaction(self.db()?, client).await
    }

    async fn list_interactions(
        &self,
        client: ClientId,
        limit: usize,
    ) -> Result<Vec<Interaction>, LeadlineError> {
        queries::interactions::list_interactions(self.db()?, client, limit).await
    }

    // --- Suggestions ---

    async fn insert_suggestion(
        &self,
        kind: SuggestionKind,
        value: &str,
    ) -> Result<bool, LeadlineError> {
        queries::suggestions::insert_suggestion(self.db()?, kind, value).await
    }

    async fn list_suggestions(&self, kind: SuggestionKind) -> Result<Vec<String>, LeadlineError> {
        queries::suggestions::list_suggestions(self.db()?, kind).await
    }

    // --- Reporting ---

    async fn client_report(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<ClientReport, LeadlineError> {
        queries::stats::client_report(self.db()?, day_start, day_end).await
    }
}
