use crate::{
    models::Bus,
    services::{BusRegistry, ServiceError},
};

/// Renders the registry as one human-readable line per bus.
#[derive(Clone)]
pub struct ReportGenerator {
    registry: BusRegistry,
}

impl ReportGenerator {
    pub fn new(registry: BusRegistry) -> Self {
        Self { registry }
    }

    pub async fn generate(&self) -> Result<Vec<String>, ServiceError> {
        let buses = self.registry.list().await?;
        Ok(buses.iter().map(format_line).collect())
    }
}

/// `<name> - <route> - <status> - <passengers>/<capacity> passengers`
pub fn format_line(bus: &Bus) -> String {
    format!(
        "{} - {} - {} - {}/{} passengers",
        bus.name, bus.route, bus.status, bus.passengers, bus.capacity
    )
}
