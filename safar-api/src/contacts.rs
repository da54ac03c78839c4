use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Utc;
use safar_core::pii::Masked;
use safar_core::{Contact, ContactFilter, ContactStatus, NewContact};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/contacts", post(create_contact))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/contacts", get(list_contacts))
        .route("/api/admin/contacts/{id}/status", patch(update_status))
        .route("/api/admin/contacts/{id}", delete(delete_contact))
}

/// POST /api/contacts
async fn create_contact(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<NewContact>,
) -> Result<(StatusCode, Json<Contact>), AppError> {
    let contact = form.into_contact(Utc::now())?;
    state.repos.contacts.create_contact(&contact).await?;

    tracing::info!(
        contact_id = %contact.id,
        email = %Masked(&contact.email),
        subject = %contact.subject,
        "Contact inquiry received"
    );
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /api/admin/contacts?status=&q=
async fn list_contacts(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ContactFilter>,
) -> Result<Json<Vec<Contact>>, AppError> {
    Ok(Json(state.repos.contacts.list_contacts(&filter, None).await?))
}

/// PATCH /api/admin/contacts/{id}/status
async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Contact>, AppError> {
    let status: ContactStatus = req.status.parse()?;
    let contact = state
        .repos
        .contacts
        .update_contact_status(id, status, Utc::now())
        .await?;

    tracing::info!(contact_id = %id, status = %status, "Contact status changed");
    Ok(Json(contact))
}

/// DELETE /api/admin/contacts/{id}
async fn delete_contact(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.repos.contacts.delete_contact(id).await?;

    tracing::info!(contact_id = %id, "Contact deleted");
    Ok(Json(json!({ "success": true })))
}
