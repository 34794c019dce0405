use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{
        auth::{
            LoginRequest, LoginResponse, RegisterForm, RegisterMultipart, RegisterResponse,
            UploadedDocument,
        },
        ErrorResponse,
    },
    utils::{Password, ValidatedJson},
    AppState,
};

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::ValidationError(format!("Invalid multipart body: {}", e.body_text()))
    }
}

/// Register a new authority with an identity document
#[utoipa::path(
    post,
    path = "/api/register",
    request_body(content = RegisterMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Authority registered", body = RegisterResponse),
        (status = 400, description = "Missing fields, file type not allowed, or already registered", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Registration body is not multipart");
        AppError::ValidationError("Missing required fields".to_string())
    })?;
    let mut form = RegisterForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                form.document = Some(UploadedDocument { filename, data });
            }
            "username" => form.username = Some(field.text().await.map_err(multipart_error)?),
            "email" => form.email = Some(field.text().await.map_err(multipart_error)?),
            "department" => form.department = Some(field.text().await.map_err(multipart_error)?),
            "password" => {
                form.password = Some(Password::new(field.text().await.map_err(multipart_error)?))
            }
            _ => {}
        }
    }

    let authority = state.credentials.register(form).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "Registration successful".to_string(),
            authority: authority.sanitized(),
        }),
    ))
}

/// Login with username or email and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Bad username/email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let authority = state
        .credentials
        .authenticate(&req.identifier, &Password::new(req.password))
        .await?;

    let access_token = state.tokens.issue(&authority.username)?;

    tracing::info!(username = %authority.username, "Authority logged in");

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.expires_in(),
            authority: authority.sanitized(),
        }),
    ))
}
