//! Fleet Trips server
//!
//! Reads configuration from TOML (`$FLEET_CONFIG`, default
//! `~/.config/fleet-trips/config.toml`) and serves the REST API.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use fleet_trips::application::ObjectStore;
use fleet_trips::domain::RepositoryProvider;
use fleet_trips::infrastructure::LocalObjectStore;
use fleet_trips::shared::shutdown::spawn_signal_listener;
use fleet_trips::{
    create_api_router, default_config_path, init_database, ApiServices, AppConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("FLEET_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();
            warn!("{}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Fleet Trips...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {}", e))?;
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_url = app_cfg.database.connection_url();
    info!("Database: {}", db_url);
    let db = match init_database(&db_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialise database: {}", e);
            return Err(e.into());
        }
    };

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let objects: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(
        &app_cfg.storage.root,
        &app_cfg.server.public_base_url,
    ));
    info!("Object storage at {}", app_cfg.storage.root);

    let services = ApiServices::new(repos, objects, &app_cfg);

    match services.identity.ensure_default_admin(&app_cfg.admin).await {
        Ok(Some(user_id)) => info!(user_id = %user_id, "Default admin created"),
        Ok(None) => {}
        Err(e) => {
            error!("Failed to create default admin: {}", e);
            return Err(e.into());
        }
    }

    // ── Shutdown signal (SIGTERM, SIGINT) ──────────────────────
    let shutdown = spawn_signal_listener();

    // ── REST API ───────────────────────────────────────────────
    let api_router = create_api_router(services, prometheus_handle);
    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown.clone();
    let server_done = shutdown.clone();
    let mut api_server = tokio::spawn(async move {
        let result = axum::serve(listener, api_router)
            .with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API received shutdown signal");
            })
            .await;
        // an early exit also stops the process
        server_done.trigger();
        result
    });

    shutdown.wait().await;
    let grace = Duration::from_secs(app_cfg.server.shutdown_timeout);
    match tokio::time::timeout(grace, &mut api_server).await {
        Ok(Ok(Ok(()))) => info!("REST API server stopped"),
        Ok(Ok(Err(e))) => error!("REST API server error: {}", e),
        Ok(Err(e)) => error!("REST API server task failed: {}", e),
        Err(_) => {
            warn!("In-flight requests did not finish within {:?}, aborting", grace);
            api_server.abort();
        }
    }

    // ── Cleanup ────────────────────────────────────────────────
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Fleet Trips shutdown complete");
    Ok(())
}
