// SPDX-FileCopyrightText: 2026 Leadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leadline - a conversational CRM Telegram bot.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use leadline_config::LeadlineConfig;

/// Leadline - a conversational CRM Telegram bot.
#[derive(Parser, Debug)]
#[command(name = "leadline", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot (default).
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => leadline_config::load_and_validate_path(path),
        None => leadline_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            leadline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            init_tracing(&config.bot.log_level);
            if let Err(e) = serve::run_serve(config).await {
                tracing::error!(error = %e, "leadline serve failed");
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Config => match render_config(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
    }
}

/// The effective configuration as TOML, bot token redacted.
fn render_config(config: &LeadlineConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&config.redacted())
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    #[serial_test::serial]
    fn binary_loads_config_defaults() {
        let config = leadline_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.bot.name, "leadline");
    }

    #[test]
    fn rendered_config_hides_the_token() {
        let mut config = LeadlineConfig::default();
        config.telegram.bot_token = Some("123:secret".into());
        let text = render_config(&config).unwrap();
        assert!(text.contains("[REDACTED]"));
        assert!(!text.contains("123:secret"));
        assert!(text.contains("contact_hour = 12"));
    }

    #[test]
    fn cli_defaults_to_no_subcommand() {
        let cli = Cli::parse_from(["leadline"]);
        assert!(cli.command.is_none());
        let cli = Cli::parse_from(["leadline", "config"]);
        assert!(matches!(cli.command, Some(Commands::Config)));
    }

    #[test]
    fn config_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::parse_from(["leadline", "serve", "--config", "/tmp/leadline.toml"]);
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/leadline.toml")));
    }
}
