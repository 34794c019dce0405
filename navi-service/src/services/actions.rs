use serde_json::{Map, Value};

use crate::{
    models::{Bus, BusAction, BusStatus},
    services::{metrics, BusRegistry, ServiceError},
    utils::coerce_count,
};

/// Interprets named actions against a single bus and persists the result
/// through the registry.
#[derive(Clone)]
pub struct ActionDispatcher {
    registry: BusRegistry,
}

impl ActionDispatcher {
    pub fn new(registry: BusRegistry) -> Self {
        Self { registry }
    }

    /// Apply `action` to bus `id`. The bus must exist before the action is
    /// interpreted, so an unknown id is always reported as not found.
    pub async fn apply(
        &self,
        id: i64,
        action: Option<&str>,
        payload: &Map<String, Value>,
    ) -> Result<Bus, ServiceError> {
        self.registry.get(id).await?;

        let action = parse_action(action, payload)?;
        let name = action.name();

        let bus = self.registry.update(id, action.into_patch()).await?;

        metrics::record_bus_action(name);
        tracing::info!(bus_id = id, action = name, status = %bus.status, "Bus action applied");
        Ok(bus)
    }
}

/// Resolve the action name and its parameters from a request body.
pub fn parse_action(
    action: Option<&str>,
    payload: &Map<String, Value>,
) -> Result<BusAction, ServiceError> {
    let Some(action) = action else {
        return Err(ServiceError::Validation("Missing action".to_string()));
    };

    match action {
        "emergency_stop" => Ok(BusAction::EmergencyStop),
        "set_status" => match payload.get("status") {
            Some(Value::String(status)) => Ok(BusAction::SetStatus(BusStatus::from(status.as_str()))),
            Some(_) => Err(ServiceError::Validation(
                "status must be a string".to_string(),
            )),
            None => Err(ServiceError::Validation(
                "Missing parameter: status".to_string(),
            )),
        },
        "update_passengers" => {
            let raw = payload.get("passengers").ok_or_else(|| {
                ServiceError::Validation("Missing parameter: passengers".to_string())
            })?;
            let count = coerce_count(raw).ok_or_else(|| {
                ServiceError::Validation("passengers must be an integer".to_string())
            })?;
            if count < 0 {
                return Err(ServiceError::Validation(
                    "passengers must not be negative".to_string(),
                ));
            }
            Ok(BusAction::UpdatePassengers(count))
        }
        other => Err(ServiceError::UnknownAction(other.to_string())),
    }
}
