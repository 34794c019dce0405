use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Bus, BusPatch, BusStatus, NewBus, DEFAULT_DRIVER};
use crate::utils::deserialize_optional_count;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBusRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name and route are required"))]
    #[schema(example = "BGarden")]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Name and route are required"))]
    #[schema(example = "Route 101")]
    pub route: String,

    #[schema(example = 22.5726)]
    pub lat: Option<f64>,

    #[schema(example = 88.3639)]
    pub lng: Option<f64>,

    #[schema(example = "New Driver")]
    pub driver: Option<String>,
}

impl CreateBusRequest {
    pub fn into_new_bus(self) -> NewBus {
        NewBus {
            name: self.name,
            route: self.route,
            lat: self.lat.unwrap_or(0.0),
            lng: self.lng.unwrap_or(0.0),
            driver: self.driver.unwrap_or_else(|| DEFAULT_DRIVER.to_string()),
        }
    }
}

/// Partial bus update; absent fields are left untouched, unknown fields ignored.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBusRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "route must not be empty"))]
    pub route: Option<String>,

    pub lat: Option<f64>,
    pub lng: Option<f64>,

    #[schema(value_type = Option<String>, example = "Delayed")]
    pub status: Option<BusStatus>,

    pub driver: Option<String>,
    pub speed: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_optional_count")]
    #[validate(range(min = 0, message = "capacity must not be negative"))]
    #[schema(value_type = Option<i64>, example = 40)]
    pub capacity: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_optional_count")]
    #[validate(range(min = 0, message = "passengers must not be negative"))]
    #[schema(value_type = Option<i64>, example = 12)]
    pub passengers: Option<i64>,
}

impl UpdateBusRequest {
    pub fn into_patch(self) -> BusPatch {
        BusPatch {
            name: self.name,
            route: self.route,
            lat: self.lat,
            lng: self.lng,
            status: self.status,
            driver: self.driver,
            speed: self.speed,
            capacity: self.capacity,
            passengers: self.passengers,
        }
    }
}

/// `{"action": ..., ...parameters}`. Parameters stay raw until the action is known.
#[derive(Debug, Deserialize, Validate)]
pub struct ActionRequest {
    pub action: Option<String>,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Schema-only view of [`ActionRequest`] listing the parameters each action reads.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ActionBody {
    /// `emergency_stop`, `set_status` or `update_passengers`.
    #[schema(example = "update_passengers")]
    action: String,
    /// Required by `set_status`.
    #[schema(example = "Delayed")]
    status: Option<String>,
    /// Required by `update_passengers`; integer or numeric string.
    #[schema(value_type = Option<i64>, example = 12)]
    passengers: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BusEnvelope {
    #[schema(example = "Action applied")]
    pub msg: String,
    pub bus: Bus,
}

impl BusEnvelope {
    pub fn new(msg: &str, bus: Bus) -> Self {
        Self {
            msg: msg.to_string(),
            bus,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmergencyResponse {
    #[schema(example = "Emergency applied to all buses")]
    pub msg: String,
    #[schema(example = 6)]
    pub affected: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    #[schema(example = json!(["X1 - R1 - Emergency Stop - 0/40 passengers"]))]
    pub report: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_fills_defaults() {
        let req: CreateBusRequest =
            serde_json::from_str(r#"{"name":"X1","route":"R1"}"#).unwrap();
        assert!(req.validate().is_ok());

        let bus = req.into_new_bus();
        assert_eq!(bus.lat, 0.0);
        assert_eq!(bus.lng, 0.0);
        assert_eq!(bus.driver, DEFAULT_DRIVER);
    }

    #[test]
    fn create_request_requires_name_and_route() {
        let req: CreateBusRequest = serde_json::from_str(r#"{"name":"X1"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Name and route are required"));
    }

    #[test]
    fn update_request_ignores_unknown_fields_and_coerces_counts() {
        let req: UpdateBusRequest =
            serde_json::from_str(r#"{"passengers":"14","colour":"red","status":"Delayed"}"#)
                .unwrap();
        assert!(req.validate().is_ok());

        let patch = req.into_patch();
        assert_eq!(patch.passengers, Some(14));
        assert_eq!(patch.status, Some(BusStatus::Delayed));
        assert_eq!(patch.name, None);
    }

    #[test]
    fn update_request_rejects_negative_and_empty_values() {
        let req: UpdateBusRequest = serde_json::from_str(r#"{"passengers":-1}"#).unwrap();
        assert!(req.validate().is_err());

        let req: UpdateBusRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn action_request_keeps_remaining_fields_as_payload() {
        let req: ActionRequest =
            serde_json::from_str(r#"{"action":"set_status","status":"Delayed"}"#).unwrap();
        assert_eq!(req.action.as_deref(), Some("set_status"));
        assert_eq!(req.payload.get("status"), Some(&Value::from("Delayed")));
        assert!(!req.payload.contains_key("action"));
    }
}
