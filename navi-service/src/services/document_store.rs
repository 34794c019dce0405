//! Provisioned document store for raw telemetry consumers.
//!
//! No route reads or writes it; the service only connects and reports its
//! health so operators notice a broken deployment early.

use mongodb::{bson::doc, Client as MongoClient, Database};
use service_core::error::AppError;

use crate::config::MongoConfig;

#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(database = %config.database, "Connecting to document store");
        let client = MongoClient::with_uri_str(&config.uri).await.map_err(|e| {
            tracing::error!("Failed to connect to document store: {}", e);
            AppError::from(e)
        })?;
        Ok(Self {
            db: client.database(&config.database),
        })
    }

    /// Ping the configured database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("Document store health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
