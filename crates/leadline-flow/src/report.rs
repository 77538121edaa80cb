// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statistics report and today's tasks.

use chrono::{DateTime, Utc};
use leadline_core::model::{Client, ClientReport};
use leadline_core::{CrmRepository, LeadlineError};

use crate::schedule::day_window;

/// Counters for the UTC day containing `now`.
pub async fn client_report(
    repo: &dyn CrmRepository,
    now: DateTime<Utc>,
) -> Result<ClientReport, LeadlineError> {
    let (start, end) = day_window(now);
    repo.client_report(start, end).await
}

/// Clients whose next contact falls on the UTC day containing `now`.
pub async fn due_today(
    repo: &dyn CrmRepository,
    now: DateTime<Utc>,
) -> Result<Vec<Client>, LeadlineError> {
    let (start, end) = day_window(now);
    repo.clients_due_between(start, end).await
}

pub fn render_report(report: &ClientReport) -> String {
    format!(
        "Total clients: {}\n\
         New: {}\n\
         In work: {}\n\
         Agreed: {}\n\
         Declined: {}\n\n\
         Interest: cold {}, warm {}, hot {}\n\
         Contacts today: {}",
        report.total,
        report.new,
        report.in_work,
        report.agreed,
        report.declined,
        report.cold,
        report.warm,
        report.hot,
        report.interactions_today,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_counter() {
        let report = ClientReport {
            total: 9,
            new: 2,
            in_work: 4,
            agreed: 2,
            declined: 1,
            cold: 3,
            warm: 5,
            hot: 1,
            interactions_today: 7,
        };
        let text = render_report(&report);
        assert!(text.starts_with("Total clients: 9\nNew: 2\nIn work: 4\n"));
        assert!(text.contains("Declined: 1\n\nInterest: cold 3, warm 5, hot 1\n"));
        assert!(text.ends_with("Contacts today: 7"));
    }
}
