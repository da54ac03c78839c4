use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use safar_core::{Role, User};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, extract::ApiJson, middleware::auth::SessionClaims, state::AppState};

const MISSING_USER_ROW: &str =
    "User record not found in database. Please ensure your user record exists.";

#[derive(Debug, Serialize)]
struct MeResponse {
    user: User,
    is_admin: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Routes for any signed-in user; wrapped in the session middleware by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", post(sync_profile))
}

/// GET /api/auth/me
async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .repos
        .users
        .get_user(claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound(MISSING_USER_ROW.to_string()))?;

    let is_admin = user.is_admin();
    Ok(Json(MeResponse { user, is_admin }))
}

/// POST /api/auth/profile
///
/// Creates the caller's `users` row as a customer, or refreshes email and
/// name on an existing one. The email comes from the session token when it
/// carries one. The role column is never written here.
async fn sync_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    ApiJson(req): ApiJson<ProfileRequest>,
) -> Result<Json<User>, AppError> {
    // The verified token email wins; the body only fills in when the token has none
    let email = claims
        .email
        .into_iter()
        .chain(req.email)
        .map(|e| e.trim().to_string())
        .find(|e| !e.is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;
    let name = req.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

    let users = &state.repos.users;
    let user = match users.get_user(claims.sub).await? {
        Some(_) => users.update_profile(claims.sub, &email, name.as_deref()).await?,
        None => {
            let user = User {
                id: claims.sub,
                email,
                name,
                role: Role::Customer,
                created_at: Utc::now(),
            };
            users.create_user(&user).await?;
            tracing::info!(user_id = %user.id, "Created users row for new session subject");
            user
        }
    };

    Ok(Json(user))
}
