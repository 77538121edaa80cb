// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadline serve` command implementation.
//!
//! Opens SQLite storage, connects Telegram, and runs the bot loop until
//! SIGINT/SIGTERM. Storage is checkpointed and closed on the way out, also
//! when the loop fails.

use std::sync::Arc;

use leadline_config::LeadlineConfig;
use leadline_core::{ChannelAdapter, CrmRepository, LeadlineError, PluginAdapter, StorageAdapter};
use leadline_flow::{BotLoop, EngineSettings, FlowEngine, shutdown};
use leadline_storage::SqliteStorage;
use leadline_telegram::TelegramChannel;
use tracing::{info, warn};

/// Runs the `leadline serve` command.
pub async fn run_serve(config: LeadlineConfig) -> Result<(), LeadlineError> {
    info!(bot = config.bot.name.as_str(), "starting leadline serve");

    // Fail on a missing token before touching the database.
    let mut telegram = TelegramChannel::new(&config.telegram)?;

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = config.storage.database_path.as_str(), "storage ready");

    if let Err(e) = telegram.connect().await {
        storage.close().await?;
        return Err(e);
    }
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let repo: Arc<dyn CrmRepository> = storage.clone();
    let settings = EngineSettings::from(&config.crm);
    let engine = Arc::new(FlowEngine::new(repo, settings));

    let cancel = shutdown::install_signal_handler();
    let result = BotLoop::new(Arc::clone(&channel), Arc::clone(&engine))
        .run(cancel)
        .await;

    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    log_heap_usage(engine.sessions().active());
    storage.close().await?;

    info!("leadline stopped");
    result
}

#[cfg(not(target_env = "msvc"))]
fn log_heap_usage(active_flows: usize) {
    let _ = tikv_jemalloc_ctl::epoch::advance();
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    info!(
        allocated_kb = allocated / 1024,
        active_flows, "heap usage at shutdown"
    );
}

#[cfg(target_env = "msvc")]
fn log_heap_usage(active_flows: usize) {
    info!(active_flows, "shutting down");
}
