use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use series_api::auth::CredentialValidator;
use series_api::config::AppConfig;
use series_api::database::{DatabaseManager, SeriesRepository};
use series_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "series-api")]
#[command(about = "Per-user series catalog API")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Create the series table before serving, regardless of DATABASE_AUTO_MIGRATE
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting series API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    if args.migrate || config.database.auto_migrate {
        DatabaseManager::ensure_schema(&pool).await.context("failed to prepare schema")?;
    }

    let validator = CredentialValidator::new(config.security.jwt_secret.as_bytes())
        .with_audit_logging(config.security.enable_audit_logging);
    let store = Arc::new(SeriesRepository::new(pool.clone()));
    let state = AppState::new(validator, store, config.database.query_timeout());

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Series API listening on http://{}", bind_addr);

    axum::serve(listener, app(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("Series API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
