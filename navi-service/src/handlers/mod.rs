//! HTTP handlers for navi-service.

pub mod auth;
pub mod bus;
pub mod metrics;
pub mod report;

use axum::Json;

use crate::dtos::MsgResponse;

/// Liveness banner
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up", body = MsgResponse)),
    tag = "Observability"
)]
pub async fn index() -> Json<MsgResponse> {
    Json(MsgResponse {
        msg: "Navi X backend alive".to_string(),
    })
}
