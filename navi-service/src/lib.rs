pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{http_request_span, request_id_middleware, REQUEST_ID_HEADER},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::config::NaviConfig;
use crate::services::{
    ActionDispatcher, BusRegistry, CredentialService, Database, DocumentStorage, DocumentStore,
    JwtService, ReportGenerator,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::index,
        handlers::auth::register,
        handlers::auth::login,
        handlers::bus::list_buses,
        handlers::bus::create_bus,
        handlers::bus::update_bus,
        handlers::bus::bus_action,
        handlers::bus::emergency_all,
        handlers::report::generate_report,
    ),
    components(
        schemas(
            dtos::MsgResponse,
            dtos::ErrorResponse,
            dtos::auth::RegisterMultipart,
            dtos::auth::RegisterResponse,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::bus::CreateBusRequest,
            dtos::bus::UpdateBusRequest,
            dtos::bus::ActionBody,
            dtos::bus::BusEnvelope,
            dtos::bus::EmergencyResponse,
            dtos::bus::ReportResponse,
            models::AuthorityResponse,
            models::Bus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Authority registration and login"),
        (name = "Buses", description = "Live bus state and actions"),
        (name = "Reports", description = "Fleet summaries"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: NaviConfig,
    pub db: Database,
    pub tokens: JwtService,
    pub credentials: CredentialService,
    pub registry: BusRegistry,
    pub dispatcher: ActionDispatcher,
    pub reports: ReportGenerator,
    pub document_store: Option<DocumentStore>,
}

impl AppState {
    /// Wire every service over one relational pool.
    pub fn new(
        config: NaviConfig,
        pool: SqlitePool,
        storage: Arc<dyn DocumentStorage>,
        document_store: Option<DocumentStore>,
    ) -> Self {
        let db = Database::new(pool);
        let registry = BusRegistry::new(db.clone());

        Self {
            tokens: JwtService::new(&config.jwt),
            credentials: CredentialService::new(db.clone(), storage, &config.registration),
            dispatcher: ActionDispatcher::new(registry.clone()),
            reports: ReportGenerator::new(registry.clone()),
            registry,
            db,
            document_store,
            config,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, AppError> {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        // Credentials rule out a literal `*`; echo the caller's origin instead.
        AllowOrigin::mirror_request()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ]))
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let require_auth = from_fn_with_state(state.clone(), middleware::auth_middleware);

    // Multipart uploads get their own limit instead of axum's 2 MiB default.
    // Overflow surfaces while reading fields and is answered as `AppError`.
    let register_route = Router::new()
        .route("/api/register", post(handlers::auth::register))
        .layer(DefaultBodyLimit::max(state.config.upload.max_bytes));

    let protected_routes = Router::new()
        .route("/api/buses/:id", put(handlers::bus::update_bus))
        .route("/api/buses/:id/action", post(handlers::bus::bus_action))
        .route("/api/emergency", post(handlers::bus::emergency_all))
        .route("/api/report", get(handlers::report::generate_report))
        .route_layer(require_auth.clone());

    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/api/login", post(handlers::auth::login))
        .route(
            "/api/buses",
            get(handlers::bus::list_buses)
                .merge(post(handlers::bus::create_bus).route_layer(require_auth)),
        )
        .merge(register_route)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload.dir))
        .with_state(state.clone())
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            http_request_span(request)
        }))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins)?);

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "A backing store is unreachable", body = dtos::ErrorResponse)
    ),
    tag = "Observability"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await?;

    let document_store = match &state.document_store {
        Some(store) => {
            store.health_check().await?;
            "up"
        }
        None => "not configured",
    };

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": "up",
            "document_store": document_store
        }
    })))
}
