//! facility-finder - nearest facility search over HTTP
//!
//! Serves the `/api` routes backed by PostGIS and an OpenRouteService
//! compatible provider. With `--memory-fixtures` the database is replaced by
//! a JSON fixture file, and when no provider key is configured routing is
//! answered offline.

use anyhow::{Context, Result};
use clap::Parser;
use finder_api_client::{ClientConfig, RoutingClient};
use finder_core::config::{Config, ConfigSchema};
use finder_core::error::exit_codes;
use finder_server::{
    AppState, FacilityService, FacilityStore, FixtureRoutingProvider, MemoryFacilityStore,
    OrsRoutingProvider, PgFacilityStore, RoutingProvider, MIGRATOR,
};
use finder_telemetry::TelemetryConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "facility-finder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./finder.toml when present)
    #[arg(short, long, env = "FINDER_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides server.host
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides server.port and PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve facilities from a JSON fixture file instead of PostgreSQL
    #[arg(long, value_name = "FILE")]
    memory_fixtures: Option<PathBuf>,

    /// Apply pending migrations and exit
    #[arg(long, conflicts_with = "memory_fixtures")]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code(exit_codes::CONFIG_ERROR);
        }
    };
    if let Some(host) = cli.host.clone() {
        config.schema.server.host = host;
    }
    if let Some(port) = cli.port {
        config.schema.server.port = port;
    }

    let telemetry = TelemetryConfig::from(&config.schema.logging);
    if let Err(e) = finder_telemetry::init_with_config(telemetry) {
        eprintln!("Error: {e:#}");
        return exit_code(exit_codes::FAILURE);
    }

    match run(cli, config.schema).await {
        Ok(()) => exit_code(exit_codes::SUCCESS),
        Err(e) => {
            tracing::error!(error = format!("{e:#}"), "facility-finder stopped");
            eprintln!("Error: {e:#}");
            exit_code(exit_codes::FAILURE)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run(cli: Cli, config: ConfigSchema) -> Result<()> {
    info!(session = finder_telemetry::session_id(), "Starting facility-finder");

    let (store, pool): (Arc<dyn FacilityStore>, Option<PgPool>) = match &cli.memory_fixtures {
        Some(path) => {
            let store = MemoryFacilityStore::from_path(path)
                .with_context(|| format!("loading fixtures from {}", path.display()))?;
            info!(
                path = %path.display(),
                facilities = store.len(),
                "Using in-memory facility store"
            );
            (Arc::new(store), None)
        }
        None => {
            let pool = connect(&config).await?;
            if config.database.run_migrations || cli.migrate_only {
                MIGRATOR.run(&pool).await.context("running migrations")?;
                info!("Migrations applied");
            }
            if cli.migrate_only {
                pool.close().await;
                return Ok(());
            }
            (Arc::new(PgFacilityStore::new(pool.clone())), Some(pool))
        }
    };

    let offline = config.routing.api_key.is_none() && cli.memory_fixtures.is_some();
    let routing: Arc<dyn RoutingProvider> = if offline {
        warn!("No routing API key; answering routing requests offline");
        Arc::new(FixtureRoutingProvider::new().with_precision(config.routing.polyline_precision))
    } else {
        if config.routing.api_key.is_none() {
            warn!(base_url = %config.routing.base_url, "No routing API key configured");
        }
        let client_config = ClientConfig::from_routing(&config.routing, &config.geocode);
        let client = RoutingClient::with_config(client_config).context("building routing client")?;
        Arc::new(OrsRoutingProvider::new(client))
    };

    let service = FacilityService::new(store, routing)
        .with_polyline_precision(config.routing.polyline_precision);
    let app = finder_server::router(AppState::new(service));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);

    tokio::select! {
        result = server.into_future() => result.context("server error")?,
        () = async move {
            if shutdown_rx.changed().await.is_ok() {
                tokio::time::sleep(grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => warn!(grace_secs = grace.as_secs(), "In-flight requests did not drain in time"),
    }

    if let Some(pool) = pool {
        pool.close().await;
    }
    info!("Shutdown complete");
    Ok(())
}

async fn connect(config: &ConfigSchema) -> Result<PgPool> {
    let url = config
        .database
        .url
        .as_deref()
        .context("database.url (or DATABASE_URL) is required unless --memory-fixtures is given")?;

    PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(url)
        .await
        .context("connecting to database")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received, draining requests");
}
