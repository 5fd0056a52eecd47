//! WooCommerce end-to-end suite runner.
//!
//! # Usage
//!
//! ```bash
//! # Run every scenario, writing a JSON report
//! woo-e2e run --report target/woo-e2e-report.json
//!
//! # Run one shopper scenario (its create scenario runs first)
//! woo-e2e run --only add-non-virtual-product-to-cart
//!
//! # Remove fixture products and leftover shipping zones
//! woo-e2e cleanup
//!
//! # Check REST credentials and the WebDriver endpoint
//! woo-e2e check
//! ```
//!
//! # Commands
//!
//! - `run` - Set up fixtures, run the scenarios, tear down
//! - `cleanup` - Tear down without running anything
//! - `check` - Verify connectivity
//!
//! Configuration comes from the environment (and `.env`); see
//! `woo_e2e_suite::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use woo_e2e_core::ShippingZoneId;
use woo_e2e_suite::ScenarioId;

mod commands;

#[derive(Parser)]
#[command(name = "woo-e2e")]
#[command(author, version, about = "WooCommerce simple-product end-to-end suite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the suite
    Run {
        /// Write the JSON report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Run only these scenarios (and the ones they depend on)
        #[arg(long, value_name = "SCENARIO")]
        only: Vec<ScenarioId>,
    },
    /// Delete fixture products and the shipping zone
    Cleanup {
        /// Zone to delete; without it every zone named like the fixture zone
        /// is removed
        #[arg(long)]
        zone_id: Option<ShippingZoneId>,
    },
    /// Check REST credentials and WebDriver reachability
    Check,
}

#[tokio::main]
async fn main() {
    // Load .env before the filter reads RUST_LOG
    let _ = dotenvy::dotenv();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "woo_e2e_suite=info,woo_e2e_cli=info".into());

    // Use JSON format under CI for structured log parsing, text format locally
    let is_ci = std::env::var("CI").is_ok();
    let json_layer = is_ci.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_ci).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run { report, only } => {
            commands::run::run(report.as_deref(), &only).await?;
        }
        Commands::Cleanup { zone_id } => commands::cleanup::cleanup(zone_id).await?,
        Commands::Check => commands::check::check().await?,
    }
    Ok(())
}
