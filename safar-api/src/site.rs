use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use safar_core::{Journey, JourneyFilter, Service, ServiceStatus};
use safar_store::app_config::Backend;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{error::AppError, middleware::auth::verify_session, state::AppState};

#[derive(Debug, Serialize)]
struct HomeResponse {
    featured_journeys: Vec<Journey>,
    services: Vec<Service>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/home", get(home))
        .route("/api/test-connection", get(test_connection))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

/// GET /api/home
async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let featured = JourneyFilter {
        featured: Some(true),
        ..JourneyFilter::public()
    };
    let (featured_journeys, services) = tokio::try_join!(
        state.repos.journeys.list_journeys(&featured),
        state.repos.services.list_services(Some(ServiceStatus::Active)),
    )?;

    Ok(Json(HomeResponse { featured_journeys, services }))
}

async fn health() -> &'static str {
    "OK"
}

/// GET /api/test-connection
///
/// Reports whether auth is configured, whether the caller's session verifies,
/// and whether the `users` table can be read.
async fn test_connection(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    if state.auth.jwt_secret.is_empty() {
        return Json(json!({
            "success": false,
            "error": "Missing auth configuration",
            "details": { "has_jwt_secret": false }
        }));
    }

    let session = verify_session(&state, &headers);
    let database = state.repos.users.ping().await;
    let backend = match state.backend {
        Backend::Postgres => "postgres",
        Backend::Memory => "memory",
    };

    Json(json!({
        "success": true,
        "auth": {
            "connected": session.is_ok(),
            "error": session.err().map(|e| e.to_string()),
        },
        "database": {
            "backend": backend,
            "connected": database.is_ok(),
            "error": database.err().map(|e| e.to_string()),
        },
        "message": "Connection test completed"
    }))
}

/// GET /metrics
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
