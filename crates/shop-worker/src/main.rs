//! Shop worker entry point
//!
//! Run with:
//! ```bash
//! cargo run -p shop-worker                                   # periodic retention sweep
//! cargo run -p shop-worker -- alerts                         # print the current alert feed as JSON
//! cargo run -p shop-worker -- --migrations crates/shop-db/migrations sweep
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use shop_common::{try_init_tracing, AppConfig, TracingConfig};
use clap::Parser;
use shop_worker::Cli;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        command = ?cli.subcommand(),
        "Configuration loaded"
    );

    if let Err(e) = shop_worker::run(config, &cli).await {
        error!(error = %e, "Worker failed");
        std::process::exit(1);
    }
}
