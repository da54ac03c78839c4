use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use safar_core::pii::Masked;
use safar_core::{Booking, BookingStatus, BookingWithPackage, NewBooking};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/bookings", post(create_booking))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/bookings", get(list_bookings))
        .route("/api/admin/bookings/{id}", get(get_booking).delete(delete_booking))
        .route("/api/admin/bookings/{id}/status", patch(update_status))
}

/// POST /api/bookings
async fn create_booking(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let package_id = form.package_id;
    let booking = form.into_booking(Utc::now())?;

    if state.repos.journeys.get_journey(package_id).await?.is_none() {
        return Err(AppError::Validation("Package not found".to_string()));
    }

    state.repos.bookings.create_booking(&booking).await?;

    tracing::info!(
        booking_id = %booking.id,
        package_id = %package_id,
        email = %Masked(&booking.email),
        phone = %Masked(&booking.phone),
        persons = booking.persons,
        "Booking received"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/admin/bookings
async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<BookingWithPackage>>, AppError> {
    Ok(Json(state.repos.bookings.list_bookings(None).await?))
}

/// GET /api/admin/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingWithPackage>, AppError> {
    state
        .repos
        .bookings
        .get_booking(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

/// PATCH /api/admin/bookings/{id}/status
async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let status: BookingStatus = req.status.parse()?;
    state.repos.bookings.update_booking_status(id, status).await?;

    tracing::info!(booking_id = %id, status = %status, "Booking status changed");
    Ok(Json(json!({ "success": true, "status": status })))
}

/// DELETE /api/admin/bookings/{id}
async fn delete_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.repos.bookings.delete_booking(id).await?;

    tracing::info!(booking_id = %id, "Booking deleted");
    Ok(Json(json!({ "success": true })))
}
