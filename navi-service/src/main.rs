use navi_service::config::NaviConfig;
use navi_service::services::{metrics::init_metrics, DocumentStorage, DocumentStore, LocalStorage};
use navi_service::{build_router, db, AppState};
use service_core::observability::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = NaviConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    tracing::info!(
        environment = ?config.environment,
        version = %config.service_version,
        "Starting {}",
        config.service_name
    );

    let pool = db::create_pool(&config.database).await.map_err(|e| {
        tracing::error!("Failed to connect to database: {}", e);
        e
    })?;

    db::run_migrations(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;

    let document_store = match &config.document_store {
        Some(mongo) => Some(DocumentStore::connect(mongo).await?),
        None => {
            tracing::info!("MONGODB_URI not set, document store disabled");
            None
        }
    };

    let storage: Arc<dyn DocumentStorage> =
        Arc::new(LocalStorage::new(&config.upload.dir).await.map_err(|e| {
            tracing::error!(dir = %config.upload.dir.display(), "Failed to prepare upload directory: {}", e);
            e
        })?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    let state = AppState::new(config, pool, storage, document_store);
    let app = build_router(state)?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("navi-service listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("navi-service stopped");
    Ok(())
}
