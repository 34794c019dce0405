//! Bus model - live tracked state of one vehicle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

pub const DEFAULT_DRIVER: &str = "New Driver";
pub const DEFAULT_CAPACITY: i64 = 40;

/// Operational status. The wire format is a free string; known labels map to
/// dedicated variants and anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BusStatus {
    #[default]
    OnTime,
    Delayed,
    EmergencyStop,
    OutOfService,
    Other(String),
}

impl BusStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BusStatus::OnTime => "On Time",
            BusStatus::Delayed => "Delayed",
            BusStatus::EmergencyStop => "Emergency Stop",
            BusStatus::OutOfService => "Out of Service",
            BusStatus::Other(label) => label,
        }
    }
}

impl From<String> for BusStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "On Time" => BusStatus::OnTime,
            "Delayed" => BusStatus::Delayed,
            "Emergency Stop" => BusStatus::EmergencyStop,
            "Out of Service" => BusStatus::OutOfService,
            _ => BusStatus::Other(label),
        }
    }
}

impl From<&str> for BusStatus {
    fn from(label: &str) -> Self {
        BusStatus::from(label.to_string())
    }
}

impl fmt::Display for BusStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BusStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BusStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(BusStatus::from)
    }
}

/// Bus record as stored and as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Bus {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "BGarden")]
    pub name: String,
    #[schema(example = "Route 101")]
    pub route: String,
    #[schema(example = 22.5726)]
    pub lat: f64,
    #[schema(example = 88.3639)]
    pub lng: f64,
    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "On Time")]
    pub status: BusStatus,
    #[schema(example = "New Driver")]
    pub driver: String,
    #[schema(example = 0.0)]
    pub speed: f64,
    #[schema(example = 40)]
    pub capacity: i64,
    #[schema(example = 0)]
    pub passengers: i64,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a new bus.
#[derive(Debug, Clone)]
pub struct NewBus {
    pub name: String,
    pub route: String,
    pub lat: f64,
    pub lng: f64,
    pub driver: String,
}

impl NewBus {
    pub fn new(name: String, route: String) -> Self {
        Self {
            name,
            route,
            lat: 0.0,
            lng: 0.0,
            driver: DEFAULT_DRIVER.to_string(),
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusPatch {
    pub name: Option<String>,
    pub route: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub status: Option<BusStatus>,
    pub driver: Option<String>,
    pub speed: Option<f64>,
    pub capacity: Option<i64>,
    pub passengers: Option<i64>,
}

impl BusPatch {
    pub fn status(status: BusStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn passengers(passengers: i64) -> Self {
        Self {
            passengers: Some(passengers),
            ..Self::default()
        }
    }
}

/// Named state transition applicable to a single bus.
#[derive(Debug, Clone, PartialEq)]
pub enum BusAction {
    EmergencyStop,
    SetStatus(BusStatus),
    UpdatePassengers(i64),
}

impl BusAction {
    pub fn name(&self) -> &'static str {
        match self {
            BusAction::EmergencyStop => "emergency_stop",
            BusAction::SetStatus(_) => "set_status",
            BusAction::UpdatePassengers(_) => "update_passengers",
        }
    }

    pub fn into_patch(self) -> BusPatch {
        match self {
            BusAction::EmergencyStop => BusPatch::status(BusStatus::EmergencyStop),
            BusAction::SetStatus(status) => BusPatch::status(status),
            BusAction::UpdatePassengers(count) => BusPatch::passengers(count),
        }
    }
}
