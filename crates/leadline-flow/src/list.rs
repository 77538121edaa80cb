// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginated list engine.
//!
//! A list view is addressed only by `(namespace, filter, page)`. Every
//! navigation re-runs the query for that triple; nothing is cached.

use leadline_core::model::{
    Client, ClientFilter, ClientStatus, Company, CompanyFilter, CompanyStatus, PageRequest,
};
use leadline_core::{CrmRepository, LeadlineError};
use strum::IntoEnumIterator;

/// Fixed page length of every list view.
pub const PAGE_SIZE: usize = 5;

/// One window of an ordered list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub has_prev: bool,
    /// Inferred from a full page; the true total is never counted.
    pub has_next: bool,
}

impl<T> ListPage<T> {
    pub fn new(rows: Vec<T>, page: usize) -> Self {
        let has_next = rows.len() == PAGE_SIZE;
        Self {
            rows,
            page,
            has_prev: page > 0,
            has_next,
        }
    }
}

pub async fn client_page(
    repo: &dyn CrmRepository,
    filter: ClientFilter,
    page: usize,
) -> Result<ListPage<Client>, LeadlineError> {
    let rows = repo
        .list_clients(filter, PageRequest::page(page, PAGE_SIZE))
        .await?;
    Ok(ListPage::new(rows, page))
}

pub async fn company_page(
    repo: &dyn CrmRepository,
    filter: CompanyFilter,
    page: usize,
) -> Result<ListPage<Company>, LeadlineError> {
    let rows = repo
        .list_companies(filter, PageRequest::page(page, PAGE_SIZE))
        .await?;
    Ok(ListPage::new(rows, page))
}

/// The values of `present`, in declaration order of the enum.
pub fn declaration_order<T>(present: &[T]) -> Vec<T>
where
    T: IntoEnumIterator + PartialEq,
{
    T::iter().filter(|value| present.contains(value)).collect()
}

/// Client statuses currently in use, for the filter picker.
pub async fn client_status_catalogue(
    repo: &dyn CrmRepository,
) -> Result<Vec<ClientStatus>, LeadlineError> {
    Ok(declaration_order(&repo.distinct_client_statuses().await?))
}

/// Company statuses currently in use, for the filter picker.
pub async fn company_status_catalogue(
    repo: &dyn CrmRepository,
) -> Result<Vec<CompanyStatus>, LeadlineError> {
    Ok(declaration_order(&repo.distinct_company_statuses().await?))
}
