//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::handlers::security_handler::page_not_found;
use super::handlers::{home_handler, home_routes, note_routes, security_routes};
use super::middleware::{flash_middleware, https_middleware, theme_middleware};
use super::AppState;
use crate::config::HttpsRequirement;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(home_handler::index))
        .route("/health", get(health))
        .nest("/home", home_routes())
        .nest("/security", security_routes())
        .nest("/notes", note_routes())
        .fallback(page_not_found)
        // Per-request stages, innermost first
        .layer(middleware::from_fn_with_state(state.clone(), theme_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), flash_middleware));

    if state.config.https_requirement != HttpsRequirement::Ignore {
        router = router.layer(middleware::from_fn_with_state(state.clone(), https_middleware));
    }

    router
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    flash_store: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let flash_status = match &state.cache {
        Some(cache) => match cache.exists("health:ping").await {
            Ok(_) => ServiceStatus {
                status: "healthy",
                backend: "redis",
                error: None,
            },
            Err(e) => ServiceStatus {
                status: "unhealthy",
                backend: "redis",
                error: Some(e.to_string()),
            },
        },
        None => ServiceStatus {
            status: "healthy",
            backend: "memory",
            error: None,
        },
    };

    let healthy = flash_status.status == "healthy";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            flash_store: flash_status,
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
