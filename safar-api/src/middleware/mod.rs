pub mod auth;
pub mod metrics;

pub use auth::{admin_auth_middleware, session_middleware, CurrentUser, SessionClaims};
pub use metrics::{track_requests, HttpMetrics};
