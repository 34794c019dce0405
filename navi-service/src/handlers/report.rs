use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::{
    dtos::{bus::ReportResponse, ErrorResponse},
    AppState,
};

/// One summary line per bus
#[utoipa::path(
    get,
    path = "/api/report",
    responses(
        (status = 200, description = "Fleet report", body = ReportResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Reports",
    security(("bearer_auth" = []))
)]
pub async fn generate_report(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let report = state.reports.generate().await?;
    Ok(Json(ReportResponse { report }))
}
