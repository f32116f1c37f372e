//! # shop-worker
//!
//! Wires the PostgreSQL repositories into a [`ServiceContext`] and runs the
//! background jobs: the periodic retention sweep, or a one-off alert report.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use shop_common::{AppConfig, AppError};
use shop_db::{create_pool, run_migrations, PgActivityLogRepository, PgOrderRepository};
use shop_service::{RetentionService, SecurityAlertService, ServiceContext, ServiceContextBuilder};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Shop worker - activity log retention and security alert reports
#[derive(Parser, Debug)]
#[command(name = "shop-worker", version)]
pub struct Cli {
    /// Apply the SQL migrations in this directory before running
    #[arg(long, env = "DATABASE_MIGRATIONS_DIR")]
    pub migrations: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Subcommand to run; `sweep` when none was given
    pub fn subcommand(&self) -> Command {
        self.command.unwrap_or(Command::Sweep)
    }
}

/// What the worker does once connected
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Archive old activity rows on a fixed interval until interrupted
    Sweep,
    /// Print the current alert feed as JSON and exit
    Alerts,
}

/// Connect to PostgreSQL, optionally migrate, and build the service context
pub async fn create_service_context(
    config: &AppConfig,
    migrations: Option<&Path>,
) -> Result<ServiceContext, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = shop_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if let Some(dir) = migrations {
        run_migrations(&pool, dir)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let activity_repo = Arc::new(PgActivityLogRepository::new(pool.clone()));
    let order_repo = Arc::new(PgOrderRepository::new(pool));

    let ctx = ServiceContextBuilder::new()
        .activity_repo(activity_repo)
        .order_repo(order_repo)
        .thresholds(config.security.clone())
        .retention(config.retention.clone())
        .build()?;

    Ok(ctx)
}

/// Run the selected command against a freshly connected context
pub async fn run(config: AppConfig, cli: &Cli) -> Result<(), AppError> {
    let ctx = create_service_context(&config, cli.migrations.as_deref()).await?;

    match cli.subcommand() {
        Command::Sweep => run_retention_loop(&ctx).await,
        Command::Alerts => print_alert_feed(&ctx).await,
    }
}

/// Sweep on every tick until Ctrl-C.
///
/// A failed sweep is logged and retried on the next tick.
pub async fn run_retention_loop(ctx: &ServiceContext) -> Result<(), AppError> {
    let period = Duration::from_secs(ctx.retention().sweep_interval_secs.max(1));
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        days_to_keep = ctx.retention().days_to_keep,
        interval_secs = period.as_secs(),
        "Retention sweep started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = RetentionService::new(ctx).archive_with_configured_retention().await {
                    error!(error = %e, "Retention sweep failed");
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for shutdown signal");
                }
                info!("Shutting down retention sweep");
                return Ok(());
            }
        }
    }
}

/// Write the current feed to stdout as pretty JSON
pub async fn print_alert_feed(ctx: &ServiceContext) -> Result<(), AppError> {
    let feed = SecurityAlertService::new(ctx).get_alert_feed().await?;
    let rendered = serde_json::to_string_pretty(&feed).map_err(AppError::internal)?;
    println!("{rendered}");
    Ok(())
}
