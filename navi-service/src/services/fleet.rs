use chrono::Utc;

use crate::{
    models::{Bus, BusPatch, BusStatus, NewBus},
    services::{metrics, Database, ServiceError},
};

/// Owns bus records: listing, creation, partial updates and the fleet-wide
/// emergency override.
#[derive(Clone)]
pub struct BusRegistry {
    db: Database,
}

impl BusRegistry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Bus>, ServiceError> {
        Ok(self.db.list_buses().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Bus, ServiceError> {
        self.db
            .find_bus(id)
            .await?
            .ok_or(ServiceError::BusNotFound(id))
    }

    pub async fn create(&self, bus: NewBus) -> Result<Bus, ServiceError> {
        if bus.name.trim().is_empty() || bus.route.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Name and route are required".to_string(),
            ));
        }

        let bus = self.db.insert_bus(&bus, Utc::now()).await?;
        tracing::info!(bus_id = bus.id, name = %bus.name, route = %bus.route, "Bus added");
        Ok(bus)
    }

    /// Overwrite the fields present in `patch`. Unknown ids leave the store untouched.
    pub async fn update(&self, id: i64, patch: BusPatch) -> Result<Bus, ServiceError> {
        validate_patch(&patch)?;

        let bus = self
            .db
            .update_bus(id, patch, Utc::now())
            .await?
            .ok_or(ServiceError::BusNotFound(id))?;

        tracing::info!(bus_id = bus.id, status = %bus.status, "Bus updated");
        Ok(bus)
    }

    /// Put every bus into "Emergency Stop" atomically; returns how many were changed.
    pub async fn broadcast_emergency(&self) -> Result<u64, ServiceError> {
        let affected = self
            .db
            .set_all_bus_status(&BusStatus::EmergencyStop, Utc::now())
            .await?;

        metrics::record_emergency_broadcast();
        tracing::warn!(affected, "Emergency stop broadcast to all buses");
        Ok(affected)
    }
}

fn validate_patch(patch: &BusPatch) -> Result<(), ServiceError> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ServiceError::Validation("name must not be empty".to_string()));
    }
    if patch.route.as_deref().is_some_and(|r| r.trim().is_empty()) {
        return Err(ServiceError::Validation("route must not be empty".to_string()));
    }
    if patch.capacity.is_some_and(|c| c < 0) {
        return Err(ServiceError::Validation(
            "capacity must not be negative".to_string(),
        ));
    }
    if patch.passengers.is_some_and(|p| p < 0) {
        return Err(ServiceError::Validation(
            "passengers must not be negative".to_string(),
        ));
    }
    Ok(())
}
