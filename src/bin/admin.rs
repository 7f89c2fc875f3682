//! CLI administration tool for link-lifecycle.
//!
//! Provides commands for sweeping expired links, inspecting links, and
//! checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Deactivate every expired link now
//! cargo run --bin admin -- sweep
//!
//! # Show one link
//! cargo run --bin admin -- link show aB3dE9xY
//!
//! # List active links tagged "news" or "tech"
//! cargo run --bin admin -- link tags news,tech
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`)
//! - `PUBLIC_BASE_URL`: prefix for printed short URLs
//! - `DB_QUERY_TIMEOUT`: per-query timeout in seconds

use link_lifecycle::application::services::{LinkService, SweepService};
use link_lifecycle::config::Config;
use link_lifecycle::domain::entities::ShortLink;
use link_lifecycle::domain::repositories::LinkRepository;
use link_lifecycle::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-lifecycle.
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
    /// Deactivate all expired links
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Inspect links
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

/// Link inspection subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show a link by short code, in any state
    Show {
        /// Short code
        code: String,
    },

    /// List active links carrying any of the given tags
    Tags {
        /// Comma-separated tags (e.g., "news,tech")
        tags: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let repo: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::with_timeout(
        Arc::new(pool),
        config.query_timeout(),
    ));

    match cli.command {
        Commands::Sweep { yes } => sweep(repo, yes).await?,
        Commands::Link { action } => {
            let service = LinkService::new(repo, config.shortener.public_base_url.as_str());
            handle_link_action(action, &service).await?
        }
        Commands::Db { action } => handle_db_action(action, repo).await?,
    }

    Ok(())
}

/// Runs one expired-link sweep after confirmation.
async fn sweep(repo: Arc<dyn LinkRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Sweep expired links".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Deactivate every link whose expiry has passed?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deactivated = SweepService::new(repo)
        .sweep_expired()
        .await
        .context("Sweep failed")?;

    println!(
        "{} {}",
        "✅ Deactivated links:".green().bold(),
        deactivated.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Dispatches link inspection commands.
async fn handle_link_action(action: LinkAction, service: &LinkService) -> Result<()> {
    match action {
        LinkAction::Show { code } => {
            let link = service.get_details(&code).await?;
            print_link(service, &link);
        }
        LinkAction::Tags { tags } => {
            let tags: Vec<String> = tags
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();

            if tags.is_empty() {
                anyhow::bail!("At least one tag is required");
            }

            let links = service.list_by_tags(&tags).await?;

            println!(
                "{} {}",
                "🏷️  Active links tagged".bright_blue().bold(),
                tags.join(", ").bright_white()
            );
            println!();

            if links.is_empty() {
                println!("{}", "No active links found".yellow());
                return Ok(());
            }

            for link in &links {
                print_link(service, link);
            }
            println!("  Total: {}", links.len().to_string().bright_green().bold());
        }
    }

    Ok(())
}

fn print_link(service: &LinkService, link: &ShortLink) {
    let state = if link.is_active {
        "active".green()
    } else {
        "inactive".red()
    };

    println!(
        "  {} → {}",
        service.short_url(&link.short_code).bright_cyan().bold(),
        link.original_url
    );
    println!("    State:         {}", state);
    if !link.tags.is_empty() {
        println!("    Tags:          {}", link.tags.join(", "));
    }
    if let Some(expires_at) = link.expires_at {
        println!("    Expires:       {}", expires_at.to_rfc3339());
    }
    if let Some(accessed) = link.last_accessed_at {
        println!("    Last accessed: {}", accessed.to_rfc3339());
    }
    println!("    Created:       {}", link.created_at.to_rfc3339());
    println!();
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, repo: Arc<dyn LinkRepository>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            repo.ping().await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
