use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection}, DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use safar_core::images::validate_image;
use safar_core::{Journey, JourneyCategory, JourneyFilter, JourneyInput};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

const JOURNEY_NOT_FOUND: &str = "Journey not found";

#[derive(Debug, Deserialize)]
pub struct PublicJourneyQuery {
    pub category: Option<JourneyCategory>,
    pub featured: Option<bool>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/journeys", get(list_public))
        .route("/api/journeys/{id}", get(get_public))
}

/// `upload_body_limit` caps the image route only; every other route keeps the default limit.
pub fn admin_routes(upload_body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/api/admin/journeys", get(list_all).post(create_journey))
        .route(
            "/api/admin/journeys/{id}",
            get(get_journey).put(update_journey).delete(delete_journey),
        )
        .route(
            "/api/admin/journeys/{id}/image",
            put(upload_image)
                .delete(delete_image)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
}

// ============================================================================
// Public
// ============================================================================

/// GET /api/journeys
async fn list_public(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PublicJourneyQuery>,
) -> Result<Json<Vec<Journey>>, AppError> {
    let filter = JourneyFilter {
        category: query.category,
        featured: query.featured,
        ..JourneyFilter::public()
    };
    Ok(Json(state.repos.journeys.list_journeys(&filter).await?))
}

/// GET /api/journeys/{id}
async fn get_public(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Journey>, AppError> {
    match state.repos.journeys.get_journey(id).await? {
        Some(journey) if journey.is_public() => Ok(Json(journey.with_view_defaults())),
        _ => Err(AppError::NotFound(JOURNEY_NOT_FOUND.to_string())),
    }
}

// ============================================================================
// Admin
// ============================================================================

async fn find(state: &AppState, id: Uuid) -> Result<Journey, AppError> {
    state
        .repos
        .journeys
        .get_journey(id)
        .await?
        .ok_or_else(|| AppError::NotFound(JOURNEY_NOT_FOUND.to_string()))
}

/// GET /api/admin/journeys
async fn list_all(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<JourneyFilter>,
) -> Result<Json<Vec<Journey>>, AppError> {
    Ok(Json(state.repos.journeys.list_journeys(&filter).await?))
}

/// POST /api/admin/journeys
async fn create_journey(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<JourneyInput>,
) -> Result<(StatusCode, Json<Journey>), AppError> {
    let journey = Journey::create(input, Utc::now())?;
    state.repos.journeys.create_journey(&journey).await?;

    tracing::info!(journey_id = %journey.id, title = %journey.title, "Journey created");
    Ok((StatusCode::CREATED, Json(journey)))
}

/// GET /api/admin/journeys/{id}
async fn get_journey(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Journey>, AppError> {
    Ok(Json(find(&state, id).await?))
}

/// PUT /api/admin/journeys/{id}
async fn update_journey(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<JourneyInput>,
) -> Result<Json<Journey>, AppError> {
    let mut journey = find(&state, id).await?;
    journey.apply(input, Utc::now())?;
    state.repos.journeys.update_journey(&journey).await?;

    tracing::info!(journey_id = %id, "Journey updated");
    Ok(Json(journey))
}

/// DELETE /api/admin/journeys/{id}
async fn delete_journey(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let removed = state.repos.journeys.delete_journey(id).await?;
    if let Some(url) = removed.main_image_url.as_deref() {
        // The row is already gone; a leftover file is only logged
        if let Err(e) = state.images.remove(url).await {
            tracing::warn!(journey_id = %id, "Failed to remove journey image: {}", e);
        }
    }

    tracing::info!(journey_id = %id, "Journey deleted");
    Ok(Json(json!({ "success": true })))
}

/// PUT /api/admin/journeys/{id}/image
///
/// Expects a multipart body with the file in the `image` field.
async fn upload_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Journey>, AppError> {
    let mut multipart = multipart?;
    let mut journey = find(&state, id).await?;
    let max_bytes = (state.max_image_mb as usize).saturating_mul(1024 * 1024);

    let mut upload = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state.max_image_mb, "Failed to parse multipart data"))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().unwrap_or("").to_string();

        // Keep counting past the limit so the error can report the real size
        let mut size = 0usize;
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, state.max_image_mb, "Failed to read image"))?
        {
            size += chunk.len();
            if size <= max_bytes {
                bytes.extend_from_slice(&chunk);
            }
        }
        upload = Some((content_type, size, bytes));
        break;
    }

    let (content_type, size, bytes) =
        upload.ok_or_else(|| AppError::Validation("No image provided".to_string()))?;
    validate_image(&content_type, size, state.max_image_mb)?;

    let url = state.images.save(&bytes, &content_type).await?;
    let previous = journey.main_image_url.replace(url);
    journey.updated_at = Utc::now();
    if let Err(e) = state.repos.journeys.update_journey(&journey).await {
        // Don't leave an orphan behind when the row could not be updated
        if let Some(url) = journey.main_image_url.as_deref() {
            if let Err(remove_err) = state.images.remove(url).await {
                tracing::warn!(journey_id = %id, "Failed to remove unused upload: {}", remove_err);
            }
        }
        return Err(e.into());
    }

    if let Some(old) = previous {
        if let Err(e) = state.images.remove(&old).await {
            tracing::warn!(journey_id = %id, "Failed to remove replaced image: {}", e);
        }
    }

    tracing::info!(journey_id = %id, size, "Journey image uploaded");
    Ok(Json(journey))
}

fn multipart_error(err: MultipartError, max_image_mb: u64, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::Validation(format!("Image size must be less than {}MB", max_image_mb));
    }
    AppError::Validation(format!("{}: {}", context, err.body_text()))
}

/// DELETE /api/admin/journeys/{id}/image
async fn delete_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Journey>, AppError> {
    let mut journey = find(&state, id).await?;
    let Some(url) = journey.main_image_url.take() else {
        return Ok(Json(journey));
    };

    journey.updated_at = Utc::now();
    state.repos.journeys.update_journey(&journey).await?;

    // The row no longer points at the file; a leftover file is only logged
    if let Err(e) = state.images.remove(&url).await {
        tracing::warn!(journey_id = %id, "Failed to remove journey image: {}", e);
    }

    tracing::info!(journey_id = %id, "Journey image removed");
    Ok(Json(journey))
}
