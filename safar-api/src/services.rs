use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use safar_core::{Service, ServiceInput, ServiceStatus};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/services", get(list_active))
        .route("/api/services/{id}", get(get_service))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/services", get(list_all).post(create_service))
        .route("/api/admin/services/{id}", put(update_service).delete(delete_service))
}

/// GET /api/services
async fn list_active(State(state): State<AppState>) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.repos.services.list_services(Some(ServiceStatus::Active)).await?))
}

/// GET /api/services/{id}
async fn get_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Service>, AppError> {
    state
        .repos
        .services
        .get_service(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))
}

/// GET /api/admin/services
async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.repos.services.list_services(None).await?))
}

/// POST /api/admin/services
async fn create_service(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = Service::create(input, Utc::now())?;
    state.repos.services.create_service(&service).await?;

    tracing::info!(service_id = %service.id, title = %service.title, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/admin/services/{id}
async fn update_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<Json<Service>, AppError> {
    let mut service = state
        .repos
        .services
        .get_service(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
    service.apply(input, Utc::now())?;
    state.repos.services.update_service(&service).await?;

    Ok(Json(service))
}

/// DELETE /api/admin/services/{id}
async fn delete_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.repos.services.delete_service(id).await?;

    tracing::info!(service_id = %id, "Service deleted");
    Ok(Json(json!({ "success": true })))
}
