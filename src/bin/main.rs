use std::net::SocketAddr;

use anyhow::Context;
use certify::blockchain::{Notarizer, build_notary};
use certify::bootstrap::initialize_admin_user;
use certify::config::Config;
use certify::db::connect_database;
use certify::state::AppState;
use certify::{app, utils::tracing::init_standard_tracing};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::parse();
    init_standard_tracing(env!("CARGO_CRATE_NAME"), &config.log_level);

    tracing::info!(env = %config.app_env, "Starting application...");

    let db_connection = connect_database(&config.database_url).await?;
    tracing::info!("Database connected and migrated");

    tracing::info!("Checking admin user...");
    if let Err(e) = initialize_admin_user(&db_connection, &config).await {
        tracing::error!("Failed to initialize admin user: {:#}", e);
        tracing::warn!("Continuing without admin user initialization...");
    }

    let notary = build_notary(&config)?;
    let (notarizer, worker_handle) = match &notary {
        Some(notary) => {
            let (notarizer, handle) = Notarizer::spawn(db_connection.clone(), notary.clone());
            (Some(notarizer), Some(handle))
        }
        None => (None, None),
    };

    if let Some(notarizer) = &notarizer {
        match notarizer.reconcile(&db_connection).await {
            Ok(count) => tracing::info!(count, "Startup reconciliation finished"),
            Err(e) => tracing::error!("Startup reconciliation failed: {:#}", e),
        }
    }

    let http_address = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(db_connection, config, notary, notarizer);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {http_address}"))?;
    tracing::info!("HTTP server listening on {}", &http_address);

    let http_result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    // Unfinished jobs stay `pending` and are re-queued on next startup.
    if let Some(handle) = worker_handle {
        handle.abort();
    }

    http_result.context("HTTP server error")?;
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
