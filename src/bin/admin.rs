//! CLI administration tool for the boundary service.
//!
//! Manages organizations and API tokens, imports boundaries, and runs
//! database diagnostics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin admin -- boundary import rwanda.geojson
//! cargo run --bin admin -- org create "Health Ministry"
//! cargo run --bin admin -- org set-country "Health Ministry" R171496
//! cargo run --bin admin -- token create --org "Health Ministry" --name editor
//! cargo run --bin admin -- token revoke editor
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server
//! - `REDIS_URL` or `REDIS_*` (optional): geometry cache to clear after an import

use admin_boundaries::application::services::{GeometryService, hash_token};
use admin_boundaries::config::Config;
use admin_boundaries::domain::entities::{BoundaryLevel, NewBoundary, Organization};
use admin_boundaries::domain::import::parse_import_features;
use admin_boundaries::domain::repositories::{
    AliasRepository, BoundaryRepository, OrganizationRepository, TokenRepository,
};
use admin_boundaries::infrastructure::cache::RedisCache;
use admin_boundaries::infrastructure::persistence::{
    PgAliasRepository, PgBoundaryRepository, PgOrganizationRepository, PgTokenRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing the boundary service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage organizations
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage boundaries
    Boundary {
        #[command(subcommand)]
        action: BoundaryAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum OrgAction {
    /// Create an organization
    Create {
        /// Organization name
        name: String,
    },

    /// List organizations
    List,

    /// Set the country an organization edits aliases for
    SetCountry {
        /// Organization name or ID
        org: String,

        /// Osm id of a country boundary (level 0)
        osm_id: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token for an organization
    Create {
        /// Organization name or ID
        #[arg(short, long)]
        org: String,

        /// Token name, recorded as the author of alias edits
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum BoundaryAction {
    /// Import boundaries from a GeoJSON FeatureCollection
    Import {
        /// Path to the .geojson file
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = Arc::new(
        PgPool::connect(&database_url)
            .await
            .context("Failed to connect to database")?,
    );

    match cli.command {
        Commands::Org { action } => handle_org_action(action, pool).await?,
        Commands::Token { action } => handle_token_action(action, pool).await?,
        Commands::Boundary { action } => handle_boundary_action(action, pool).await?,
        Commands::Stats => handle_stats(pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Finds an organization by numeric ID or exact name.
async fn resolve_org(repo: &PgOrganizationRepository, org: &str) -> Result<Organization> {
    let found = match org.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(org).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    found.with_context(|| format!("Organization '{}' not found", org))
}

async fn handle_org_action(action: OrgAction, pool: Arc<PgPool>) -> Result<()> {
    let orgs = PgOrganizationRepository::new(pool.clone());

    match action {
        OrgAction::Create { name } => {
            let org = orgs
                .create(name.trim())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create organization: {}", e))?;

            println!(
                "{} {} (id {})",
                "✅ Organization created:".green().bold(),
                org.name.cyan(),
                org.id
            );
            println!(
                "  Next: {} admin org set-country {} <country osm_id>",
                "cargo run --bin".bright_cyan(),
                org.id
            );
        }
        OrgAction::List => {
            let boundaries = PgBoundaryRepository::new(pool);
            let list = orgs
                .list()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list organizations: {}", e))?;

            println!("{}", "🏢 Organizations".bright_blue().bold());
            println!();

            if list.is_empty() {
                println!("{}", "  No organizations found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<30} {:<30}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Country".bright_white().bold()
            );
            println!("  {}", "─".repeat(65).bright_black());

            for org in &list {
                let country = match org.country_id {
                    Some(id) => boundaries
                        .find_by_id(id)
                        .await
                        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                        .map(|b| format!("{} ({})", b.name, b.osm_id))
                        .unwrap_or_else(|| "missing".to_string())
                        .normal(),
                    None => "not set".yellow(),
                };

                println!(
                    "  {:<5} {:<30} {}",
                    org.id.to_string().bright_black(),
                    org.name.cyan(),
                    country
                );
            }
            println!();
        }
        OrgAction::SetCountry { org, osm_id } => {
            let org = resolve_org(&orgs, &org).await?;
            let boundaries = PgBoundaryRepository::new(pool);

            let country = boundaries
                .find_by_osm_id(&osm_id)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .with_context(|| format!("Boundary '{}' not found", osm_id))?;

            if country.level != BoundaryLevel::Country {
                anyhow::bail!(
                    "{} is a {}, expected a country",
                    country.osm_id,
                    country.level.as_str()
                );
            }

            orgs.set_country(org.id, country.id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to set country: {}", e))?;

            println!(
                "{} {} now edits aliases under {}",
                "✅".green(),
                org.name.cyan(),
                country.name.bright_white().bold()
            );
        }
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgTokenRepository::new(pool.clone());

    match action {
        TokenAction::Create {
            org,
            name,
            token,
            yes,
        } => {
            let orgs = PgOrganizationRepository::new(pool);
            let org = resolve_org(&orgs, &org).await?;
            create_token(&repo, org, name, token, yes).await?;
        }
        TokenAction::List => list_tokens(&repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await?,
    }

    Ok(())
}

/// Creates a token for `org`, printing the raw value once.
///
/// Only the HMAC-SHA256 hash (keyed by `TOKEN_SIGNING_SECRET`) is stored.
async fn create_token(
    repo: &PgTokenRepository,
    org: Organization,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to create tokens")?;
    if secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text(format!("{} editor", org.name))
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!("  Organization: {}", org.name.cyan());
    println!("  Name:         {}", token_name.cyan());
    println!("  Token:        {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Save this token now. It cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm
        && !Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?
    {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.create_token(org.id, &token_name, &hash_token(&secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created".green().bold());
    println!();
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/boundaries/alias",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<5} {:<28} {:<18} {:<18} {:<8}",
        "ID".bright_white().bold(),
        "Org".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<5} {:<5} {:<28} {:<18} {:<18} {}",
            token.id.to_string().bright_black(),
            token.org_id.to_string().bright_black(),
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            last_used,
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

async fn revoke_token(repo: &PgTokenRepository, name_or_id: String) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {} (id {})", token.name.cyan(), token.id);

    if !Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?
    {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked".green().bold());

    Ok(())
}

async fn handle_boundary_action(action: BoundaryAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        BoundaryAction::Import { file, yes } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let boundaries = parse_import_features(&document)?;

            let count = |level: BoundaryLevel| boundaries.iter().filter(|b| b.level == level).count();
            println!("{}", "🗺️  Boundary import".bright_blue().bold());
            println!("  Countries: {}", count(BoundaryLevel::Country));
            println!("  States:    {}", count(BoundaryLevel::State));
            println!("  Districts: {}", count(BoundaryLevel::District));
            println!();

            if !yes
                && !Confirm::new()
                    .with_prompt("Import all or nothing (existing osm ids are updated)?")
                    .default(true)
                    .interact()?
            {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            let repo = PgBoundaryRepository::new(pool.clone());
            repo.import(&boundaries)
                .await
                .map_err(|e| anyhow::anyhow!("Import rolled back: {}", e))?;

            println!(
                "{} {} boundaries",
                "✅ Imported".green().bold(),
                boundaries.len().to_string().bright_white().bold()
            );

            invalidate_geometry_cache(pool, &boundaries).await?;
        }
    }

    Ok(())
}

/// Clears cached geometry exports affected by an import when Redis is configured.
async fn invalidate_geometry_cache(pool: Arc<PgPool>, boundaries: &[NewBoundary]) -> Result<()> {
    let Some(redis_url) = Config::load_redis_url() else {
        return Ok(());
    };

    let ttl = std::env::var("CACHE_TTL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);

    let cache = match RedisCache::connect(&redis_url, ttl).await {
        Ok(cache) => cache,
        Err(e) => {
            println!(
                "{} {} (cached exports expire within {}s)",
                "⚠️  Geometry cache not cleared:".yellow().bold(),
                e,
                ttl
            );
            return Ok(());
        }
    };

    let osm_ids: Vec<String> = boundaries.iter().map(|b| b.osm_id.clone()).collect();
    let service = GeometryService::new(Arc::new(PgBoundaryRepository::new(pool)), Arc::new(cache));
    let dropped = service
        .invalidate(&osm_ids)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to clear geometry cache: {}", e))?;

    println!(
        "{} {} cached exports",
        "🧹 Cleared".green().bold(),
        dropped.to_string().bright_white().bold()
    );

    Ok(())
}

async fn handle_stats(pool: Arc<PgPool>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let levels: Vec<(i16, i64)> = sqlx::query_as(
        "SELECT level, COUNT(*) FROM admin_boundaries GROUP BY level ORDER BY level",
    )
    .fetch_all(pool.as_ref())
    .await?;

    for (level, count) in levels {
        let label = BoundaryLevel::try_from(level)
            .map(|l| l.as_str())
            .unwrap_or("unknown");
        println!(
            "  {:<15} {}",
            format!("{}:", label),
            count.to_string().bright_green().bold()
        );
    }

    let aliases: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boundary_aliases")
        .fetch_one(pool.as_ref())
        .await?;
    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool.as_ref())
            .await?;

    let orgs = PgOrganizationRepository::new(pool.clone())
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list organizations: {}", e))?;

    println!("  {:<15} {}", "Organizations:", orgs.len().to_string().bright_green().bold());
    println!("  {:<15} {}", "Aliases:", aliases.to_string().bright_green().bold());
    println!("  {:<15} {}", "Active tokens:", tokens.to_string().bright_green().bold());
    println!();

    if !orgs.is_empty() {
        println!("{}", "Aliases per organization".bright_blue().bold());
        let alias_repo = PgAliasRepository::new(pool);
        for org in &orgs {
            let count = alias_repo
                .count_for_org(org.id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to count aliases: {}", e))?;
            println!("  {:<30} {}", org.name, count.to_string().bright_green().bold());
        }
        println!();
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a random 48-character alphanumeric token.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
