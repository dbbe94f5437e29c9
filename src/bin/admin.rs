//! CLI administration tool for snaplink.
//!
//! Creates and inspects short links directly against the database, without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- link create example.com
//!
//! # Show the stored record for a code
//! cargo run --bin admin -- link stats aB3xY9
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Link and click totals
//! cargo run --bin admin -- db info
//! ```
//!
//! # Environment Variables
//!
//! Same as the server. The PostgreSQL backend is required.

use snaplink::application::services::LinkService;
use snaplink::config::{self, Config, StorageBackend};
use snaplink::infrastructure::persistence::PgLinkRepository;
use snaplink::server::connect_pool;
use snaplink::state::DEFAULT_HOST;
use snaplink::utils::url_normalizer::SchemePolicy;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Create and inspect short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Shorten a URL
    Create {
        /// Long URL; `https://` is prepended when no scheme is given
        url: String,
    },

    /// Show the stored record for a short code
    Stats {
        /// 6-character short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("admin requires STORAGE_BACKEND=postgres");
    }
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = connect_pool(&config, database_url).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, config: &Config, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo)
        .with_scheme_policy(SchemePolicy::from_flag(config.normalize_scheme))
        .with_max_attempts(config.code_max_attempts);

    match action {
        LinkAction::Create { url } => create_link(&service, config, &url).await?,
        LinkAction::Stats { code } => show_stats(&service, &code).await?,
    }

    Ok(())
}

async fn create_link(service: &LinkService, config: &Config, url: &str) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let link = service.create_link(url).await?;

    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| format!("http://{DEFAULT_HOST}"));

    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!("  Long URL:  {}", link.long_url.cyan());
    println!(
        "  Short URL: {}",
        service.short_url(&base_url, &link.code).bright_green()
    );
    println!();

    Ok(())
}

/// Prints the stored record for a code.
///
/// # Output Format
///
/// ```text
/// 📊 Link aB3xY9
///
///   ID:       1
///   Long URL: https://example.com
///   Created:  2024-01-15 10:30
///   Clicks:   3
/// ```
async fn show_stats(service: &LinkService, code: &str) -> Result<()> {
    let link = service.get_stats(code).await?;

    println!(
        "{} {}",
        "📊 Link".bright_blue().bold(),
        link.code.bright_yellow().bold()
    );
    println!();
    println!("  ID:       {}", link.id.to_string().bright_black());
    println!("  Long URL: {}", link.long_url.cyan());
    println!(
        "  Created:  {}",
        link.created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Clicks:   {}",
        link.click_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;

            let clicks_total: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Clicks:     {}",
                clicks_total.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
