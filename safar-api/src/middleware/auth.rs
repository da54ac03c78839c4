use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use safar_core::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims of an access token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// The `users` row of an admin caller, set by [`admin_auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

/// Verifies the request's session token and returns its claims.
pub fn verify_session(state: &AppState, headers: &HeaderMap) -> Result<SessionClaims, AppError> {
    let token = session_token(headers, &state.auth.session_cookie).ok_or_else(AppError::unauthenticated)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[state.auth.audience.as_str()]);

    let token_data = decode::<SessionClaims>(
        &token,
        &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        AppError::unauthenticated()
    })?;

    Ok(token_data.claims)
}

// ============================================================================
// Session Middleware (any signed-in user)
// ============================================================================

pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = verify_session(&state, req.headers())?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

// ============================================================================
// Admin Authentication Middleware
// ============================================================================

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Verify token
    let claims = verify_session(&state, req.headers())?;

    // 2. Resolve the caller's users row
    let user = match state.repos.users.get_user(claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = %claims.sub, "No users row for session subject");
            return Err(AppError::forbidden());
        }
        Err(e) => {
            tracing::error!(user_id = %claims.sub, "Role lookup failed: {}", e);
            return Err(AppError::forbidden());
        }
    };

    // 3. Check role is admin
    if !user.is_admin() {
        tracing::warn!(user_id = %user.id, role = user.role.as_str(), "Admin route refused");
        return Err(AppError::forbidden());
    }

    // 4. Inject caller
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sb-access-token=xyz"));
        assert_eq!(session_token(&headers, "sb-access-token").as_deref(), Some("abc"));
    }

    #[test]
    fn cookie_is_used_without_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sb-access-token=xyz"));
        assert_eq!(session_token(&headers, "sb-access-token").as_deref(), Some("xyz"));
        assert_eq!(session_token(&headers, "other"), None);
    }

    #[test]
    fn non_bearer_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert_eq!(session_token(&headers, "sb-access-token"), None);
    }
}
