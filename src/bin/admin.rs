//! CLI administration tool for shortlink.
//!
//! Inspects the configured store directly, without going through the HTTP
//! API. All commands are read-only.
//!
//! # Usage
//!
//! ```bash
//! # Check both keyspaces
//! cargo run --bin admin -- ping
//!
//! # Show where a short code points and when it expires
//! cargo run --bin admin -- lookup aZ3k9
//!
//! # Show a client's remaining quota
//! cargo run --bin admin -- quota 203.0.113.7
//!
//! # Show the global resolution counter
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! Same store settings as the server (`REDIS_URL`, `REDIS_LIMITS_URL`,
//! `REDIS_HOST`, ...). See [`shortlink::config`].

use shortlink::application::services::stats_service::RESOLUTION_COUNTER;
use shortlink::config::{self, Config, StoreBackend};
use shortlink::domain::repositories::{MappingRepository, QuotaRepository, StatsRepository};
use shortlink::error::AppError;
use shortlink::infrastructure::Stores;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::time::Duration;

/// CLI tool for inspecting a shortlink store.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Check connectivity of the codes and limits keyspaces
    Ping,

    /// Show the URL stored under a short code
    Lookup {
        /// Short code (without domain)
        code: String,
    },

    /// Show the remaining quota of a client
    Quota {
        /// Client identifier (IP address)
        client: String,
    },

    /// Show the global resolution counter
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.store_backend == StoreBackend::Memory {
        println!(
            "{}",
            "⚠️  STORE_BACKEND=memory: this process sees an empty store".yellow()
        );
    }

    let stores = Stores::from_config(&config)
        .await
        .context("Failed to connect to store")?;

    match cli.command {
        Commands::Ping => handle_ping(&stores, &config).await,
        Commands::Lookup { code } => handle_lookup(&stores, &config, &code).await?,
        Commands::Quota { client } => handle_quota(&stores, &config, &client).await?,
        Commands::Stats => handle_stats(&stores).await?,
    }

    Ok(())
}

async fn handle_ping(stores: &Stores, config: &Config) {
    println!("{}", "🔍 Checking store connections...".bright_blue());
    println!();

    let codes_ok = stores.mappings.health_check().await;
    let limits_ok = stores.quotas.health_check().await;

    print_check("codes", &config::mask_connection_string(&config.redis_url), codes_ok);
    print_check(
        "limits",
        &config::mask_connection_string(&config.redis_limits_url),
        limits_ok,
    );
    println!();
}

fn print_check(name: &str, target: &str, ok: bool) {
    let status = if ok { "OK".green().bold() } else { "FAILED".red().bold() };
    println!("  {:<8} {:<40} {}", name.cyan(), target.bright_black(), status);
}

/// Prints the stored URL and remaining lifetime of `code`.
async fn handle_lookup(stores: &Stores, config: &Config, code: &str) -> Result<()> {
    println!("{}", "🔗 Lookup".bright_blue().bold());
    println!();

    let url = match stores.mappings.get(code).await {
        Ok(url) => url,
        Err(AppError::NotFound { .. }) => {
            println!("  {}", format!("No live mapping for '{code}'").yellow());
            println!();
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Store error: {e:?}")),
    };

    let ttl = stores
        .mappings
        .ttl(code)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {e:?}"))?;

    println!(
        "  Short:   {}",
        format!("{}/{}", config.domain.trim_end_matches('/'), code).cyan()
    );
    println!("  URL:     {}", url.bright_white());
    println!(
        "  Expires: {}",
        ttl.map(format_duration)
            .unwrap_or_else(|| "never".to_string())
            .bright_green()
    );
    println!();

    Ok(())
}

/// Prints the quota state of `client`.
async fn handle_quota(stores: &Stores, config: &Config, client: &str) -> Result<()> {
    println!("{}", "📉 Quota".bright_blue().bold());
    println!();

    let snapshot = stores
        .quotas
        .read(client)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {e:?}"))?;

    println!("  Client:    {}", client.cyan());

    match snapshot {
        Some(snapshot) => {
            let remaining = snapshot.remaining.to_string();
            let remaining = if snapshot.remaining > 0 {
                remaining.bright_green().bold()
            } else {
                remaining.red().bold()
            };
            println!("  Remaining: {} / {}", remaining, config.api_quota);
            println!(
                "  Resets in: {}",
                snapshot
                    .ttl
                    .map(format_duration)
                    .unwrap_or_else(|| "no expiry set".to_string())
                    .bright_white()
            );
        }
        None => {
            println!(
                "  Remaining: {} / {} {}",
                config.api_quota.to_string().bright_green().bold(),
                config.api_quota,
                "(no requests this window)".bright_black()
            );
        }
    }
    println!();

    Ok(())
}

/// Displays the global resolution counter.
async fn handle_stats(stores: &Stores) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let resolutions = stores
        .stats
        .read(RESOLUTION_COUNTER)
        .await
        .map_err(|e| anyhow::anyhow!("Store error: {e:?}"))?;

    println!(
        "  Resolutions: {}",
        resolutions.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Formats a duration as `1h 02m 03s`.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}
