use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        bus::{
            ActionBody, ActionRequest, BusEnvelope, CreateBusRequest, EmergencyResponse,
            UpdateBusRequest,
        },
        ErrorResponse,
    },
    middleware::AuthUser,
    models::Bus,
    utils::ValidatedJson,
    AppState,
};

/// Bus id taken from the path. An id that is not an integer names no bus,
/// so it is reported as not found.
pub struct BusId(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for BusId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(anyhow::anyhow!("Bus not found: {}", e.body_text())))?;

        raw.parse()
            .map(BusId)
            .map_err(|_| AppError::NotFound(anyhow::anyhow!("Bus {} not found", raw)))
    }
}

/// List every tracked bus
#[utoipa::path(
    get,
    path = "/api/buses",
    responses(
        (status = 200, description = "All buses in insertion order", body = Vec<Bus>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Buses"
)]
pub async fn list_buses(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let buses = state.registry.list().await?;
    Ok(Json(buses))
}

/// Add a bus
#[utoipa::path(
    post,
    path = "/api/buses",
    request_body = CreateBusRequest,
    responses(
        (status = 201, description = "Bus added", body = BusEnvelope),
        (status = 400, description = "Name and route are required", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Buses",
    security(("bearer_auth" = []))
)]
pub async fn create_bus(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bus = state.registry.create(req.into_new_bus()).await?;
    tracing::debug!(bus_id = bus.id, username = %user.0.sub, "Bus created by authority");
    Ok((StatusCode::CREATED, Json(BusEnvelope::new("Bus added", bus))))
}

/// Update any subset of a bus's fields
#[utoipa::path(
    put,
    path = "/api/buses/{id}",
    params(("id" = i64, Path, description = "Bus id")),
    request_body = UpdateBusRequest,
    responses(
        (status = 200, description = "Bus updated", body = BusEnvelope),
        (status = 400, description = "Invalid field value", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Bus not found", body = ErrorResponse)
    ),
    tag = "Buses",
    security(("bearer_auth" = []))
)]
pub async fn update_bus(
    State(state): State<AppState>,
    BusId(id): BusId,
    ValidatedJson(req): ValidatedJson<UpdateBusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bus = state.registry.update(id, req.into_patch()).await?;
    Ok(Json(BusEnvelope::new("Updated", bus)))
}

/// Apply a named action to one bus
#[utoipa::path(
    post,
    path = "/api/buses/{id}/action",
    params(("id" = i64, Path, description = "Bus id")),
    request_body = ActionBody,
    responses(
        (status = 200, description = "Action applied", body = BusEnvelope),
        (status = 400, description = "Unknown action or missing parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Bus not found", body = ErrorResponse)
    ),
    tag = "Buses",
    security(("bearer_auth" = []))
)]
pub async fn bus_action(
    State(state): State<AppState>,
    BusId(id): BusId,
    ValidatedJson(req): ValidatedJson<ActionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bus = state
        .dispatcher
        .apply(id, req.action.as_deref(), &req.payload)
        .await?;
    Ok(Json(BusEnvelope::new("Action applied", bus)))
}

/// Put every bus into "Emergency Stop"
#[utoipa::path(
    post,
    path = "/api/emergency",
    responses(
        (status = 200, description = "Emergency applied", body = EmergencyResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Buses",
    security(("bearer_auth" = []))
)]
pub async fn emergency_all(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let affected = state.registry.broadcast_emergency().await?;
    tracing::warn!(username = %user.0.sub, affected, "Emergency broadcast requested");
    Ok(Json(EmergencyResponse {
        msg: "Emergency applied to all buses".to_string(),
        affected,
    }))
}
