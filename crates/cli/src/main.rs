//! `brand-store` CLI entry-point.
//!
//! Available sub-commands:
//! - `seed`   — connect, ping and insert the sample brands (the demo run).
//! - `ping`   — check connectivity only.
//! - `create` — insert one brand.
//! - `read`   — print one brand.
//! - `update` — change the mapped name of a brand.
//! - `delete` — remove a brand.
//!
//! Exit status: 0 on success, 1 on an operational failure, 2 when `read`
//! finds nothing.

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use db::{BrandRepository, BrandStore, DbConfig, DbError, NewBrand, SqlHandle};

#[derive(Parser)]
#[command(
    name = "brand-store",
    about = "Maintain the original-name to mapped-name brand table",
    version
)]
struct Cli {
    /// Connection URL (`mysql://…` or `sqlite:…`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "mysql://root@127.0.0.1:3306/whiskydb",
        global = true
    )]
    database_url: String,

    /// Pool ceiling.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5, global = true)]
    max_connections: u32,

    /// Deadline for each store operation, in milliseconds.
    #[arg(long, env = "BRAND_STORE_TIMEOUT_MS", default_value_t = 5_000, global = true)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect, ping and insert the sample brands.
    Seed,
    /// Check that the database answers.
    Ping,
    /// Insert a brand.
    Create { original_name: String, mapped_name: String },
    /// Print the brand stored under ORIGINAL_NAME.
    Read {
        original_name: String,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Replace the mapped name of a brand.
    Update { original_name: String, mapped_name: String },
    /// Delete a brand. Succeeds even if it does not exist.
    Delete { original_name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<DbError>() {
            Some(DbError::NotFound { original_name }) => {
                eprintln!("no brand with original_name '{original_name}'");
                ExitCode::from(2)
            }
            _ => {
                error!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DbConfig {
        database_url: cli.database_url,
        max_connections: cli.max_connections,
        acquire_timeout: Duration::from_millis(cli.timeout_ms),
    };
    let deadline = Duration::from_millis(cli.timeout_ms);

    let handle = SqlHandle::connect(&config)
        .await
        .context("failed to connect to the database")?;
    let store = BrandStore::new(Arc::new(handle.clone()));

    let outcome = dispatch(cli.command, &handle, &store, deadline).await;
    handle.close().await;
    outcome
}

async fn dispatch(
    command: Command,
    handle: &SqlHandle,
    store: &BrandStore,
    deadline: Duration,
) -> Result<()> {
    match command {
        Command::Seed => {
            with_deadline(deadline, handle.ping())
                .await
                .context("failed to ping the database")?;
            info!("Database connection established");
            with_deadline(deadline, store.seed_sample_data())
                .await
                .context("failed to insert sample data")?;
            info!("Sample data inserted");
        }
        Command::Ping => {
            with_deadline(deadline, handle.ping())
                .await
                .context("failed to ping the database")?;
            info!("Database connection established");
        }
        Command::Create { original_name, mapped_name } => {
            with_deadline(deadline, store.create(NewBrand::new(&original_name, mapped_name)))
                .await
                .with_context(|| format!("failed to create brand '{original_name}'"))?;
            info!(%original_name, "Brand created");
        }
        Command::Read { original_name, json } => {
            let brand = with_deadline(deadline, store.read(&original_name)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&brand)?);
            } else {
                println!("{}\t{}\t{}", brand.id, brand.original_name, brand.mapped_name);
            }
        }
        Command::Update { original_name, mapped_name } => {
            with_deadline(deadline, store.update(&original_name, &mapped_name))
                .await
                .with_context(|| format!("failed to update brand '{original_name}'"))?;
            info!(%original_name, "Brand updated");
        }
        Command::Delete { original_name } => {
            with_deadline(deadline, store.delete(&original_name))
                .await
                .with_context(|| format!("failed to delete brand '{original_name}'"))?;
            info!(%original_name, "Brand deleted");
        }
    }
    Ok(())
}

/// Bound a store call by `deadline`. Expiry drops the in-flight future.
async fn with_deadline<T>(
    deadline: Duration,
    op: impl Future<Output = Result<T, DbError>>,
) -> Result<T> {
    match tokio::time::timeout(deadline, op).await {
        Ok(res) => Ok(res?),
        Err(_) => anyhow::bail!("operation exceeded its {}ms deadline", deadline.as_millis()),
    }
}
