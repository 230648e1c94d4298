//! CWS - Application Entry Point
//!
//! Startup is strictly ordered: everything needed to serve (configuration,
//! database, contest context) is established before the listener is bound.
//! Any fatal error terminates the process before it starts serving.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cws::{
    cli::Args,
    config::{cms_config_candidates, read_cms_config, Config, LogFormat},
    db,
    handlers,
    services::{ContextService, RetryPolicy},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting contest web server...");

    // The selector is fixed for the lifetime of the process
    let selector = args.selector()?;

    // Resolve the database target from cms.conf
    let candidates = cms_config_candidates(args.config.as_deref());
    let (path, raw) = read_cms_config(&candidates)?;
    let target = db::resolve(&raw)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    tracing::info!(database = %target, "Resolved database target");

    // Initialize database connection pool
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&target, &config.database).await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        db::run_migrations(&pool).await?;
    }

    // Resolve the contest context once
    let policy = RetryPolicy::from(&config.database);
    let context = ContextService::resolve(&pool, selector, &policy, &config.context).await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let static_dir = config.server.static_dir.clone();
    let state = AppState::new(context, config);

    // Build the router
    let app = handlers::app(state, &static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Start the server
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
