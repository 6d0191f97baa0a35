use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use master_stats::api::state::AppState;
use master_stats::cache::SummonerCache;
use master_stats::calculate;
use master_stats::config::AppConfig;
use master_stats::source::{DataDragonClient, RiotSource};

#[derive(Parser)]
#[command(name = "master-stats")]
#[command(about = "Champion mastery statistics service with an in-process summoner cache")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Look up one summoner and print the derived view
    Lookup {
        /// Region shard (e.g. na, euw, kr)
        region: String,

        /// Summoner name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting master-stats v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(std::path::Path::new(&cli.config))?;

    let api_key = config.riot_api_key();
    if api_key.is_empty() {
        tracing::warn!("No Riot API key configured; summoner lookups will fail upstream");
    }

    let mut ddragon = DataDragonClient::new(config.riot.timeout_seconds);
    if let Some(version) = config.riot.ddragon_version.clone() {
        ddragon = ddragon.with_version(version);
    }
    let catalog = Arc::new(
        ddragon
            .load_catalog()
            .await
            .context("Failed to load champion catalog")?,
    );
    tracing::info!(
        "Loaded champion catalog: {} champions (static data {})",
        catalog.len(),
        catalog.version()
    );

    let source = Arc::new(RiotSource::new(api_key, config.riot.timeout_seconds));
    let cache = SummonerCache::new(source, catalog.clone(), config.cache.settings());

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState {
                cache,
                catalog: catalog.clone(),
            };
            let app = master_stats::api::build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Lookup { region, name } => {
            let stat = cache
                .lookup(&region, &name)
                .await
                .with_context(|| format!("Lookup failed for {} on {}", name, region))?;
            let view = calculate::build_view(&stat, &catalog);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}
