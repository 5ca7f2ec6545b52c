//! spotlaunch - EC2 spot capacity acquisition and price reporting
//!
//! ## Usage
//!
//! ```bash
//! # Launch the preset named "testbox" from ./instances.json
//! spotlaunch launch testbox
//!
//! # Show current spot prices grouped by instance family
//! spotlaunch spot-prices
//! ```
//!
//! Both commands are run-once: any fatal failure aborts the process with
//! a non-zero status and a human-readable message.

use std::time::Duration;

use clap::{Parser, Subcommand};
use spotlaunch::{
    DEFAULT_MAX_WAIT_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REGION, Ec2Market, PollConfig,
    PresetFile, PriceCatalog, SpotMarket, provision, report,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Spotlaunch: EC2 spot capacity acquisition and price reporting
#[derive(Parser)]
#[command(name = "spotlaunch")]
#[command(about = "Launch EC2 spot instances and report spot prices", long_about = None)]
struct Cli {
    /// AWS region
    #[arg(long, global = true, default_value = DEFAULT_REGION)]
    region: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a named instance preset as spot capacity
    Launch {
        /// Preset name from the config file
        name: String,

        /// Preset config file (JSON)
        #[arg(long, default_value = "instances.json")]
        config: String,

        /// Seconds between spot request status polls
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        poll_interval: u64,

        /// Maximum seconds to wait for fulfillment
        #[arg(long, default_value_t = DEFAULT_MAX_WAIT_SECS)]
        max_wait: u64,
    },

    /// Show current spot prices, ranked and grouped by instance family
    SpotPrices {
        /// Product description filter
        #[arg(long, default_value = "Linux/UNIX")]
        product: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spotlaunch=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Launch {
            name,
            config,
            poll_interval,
            max_wait,
        } => launch_preset(cli.region, name, config, poll_interval, max_wait).await,
        Commands::SpotPrices { product } => spot_prices(cli.region, product).await,
    }
}

/// Handle `spotlaunch launch <name>`
async fn launch_preset(
    region: String,
    name: String,
    config: String,
    poll_interval: u64,
    max_wait: u64,
) -> anyhow::Result<()> {
    let presets = PresetFile::load(&config)?;
    let spec = presets.bid_spec(&name)?;

    info!(
        "Launching preset '{}': type={}, ami={}, bid=${}",
        name, spec.instance_type, spec.ami_id, spec.bid
    );

    let market = Ec2Market::from_region(Some(region)).await?;
    let poll = PollConfig::default()
        .with_interval(Duration::from_secs(poll_interval))
        .with_max_wait(Duration::from_secs(max_wait));

    // Ctrl+C aborts the poll loop instead of leaving it mid-flight
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, aborting acquisition");
            cancel_on_signal.cancel();
        }
    });

    let instances = provision::launch(&market, &spec, &poll, &cancel).await?;

    println!();
    println!("Instances:");
    for instance in &instances {
        println!("    {}", instance.id);
        println!("        type:        {}", instance.instance_type);
        println!(
            "        internal ip: {}",
            instance.private_ip.as_deref().unwrap_or("N/A")
        );
        println!(
            "        public ip:   {}",
            instance.public_ip.as_deref().unwrap_or("N/A")
        );
    }

    Ok(())
}

/// Handle `spotlaunch spot-prices`
async fn spot_prices(region: String, product: String) -> anyhow::Result<()> {
    let market = Ec2Market::from_region(Some(region)).await?;

    info!("Fetching spot price history for '{}'", product);
    let observations = market.price_history(&product).await?;

    let mut catalog = PriceCatalog::new();
    catalog.ingest(observations);

    if catalog.is_empty() {
        warn!("No spot price observations returned");
        return Ok(());
    }

    println!();
    print!("{}", report::render(&catalog)?);

    Ok(())
}
