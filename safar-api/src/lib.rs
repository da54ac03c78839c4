use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod contacts;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod journeys;
pub mod middleware;
pub mod services;
pub mod site;
pub mod state;

pub use state::AppState;

use middleware::{admin_auth_middleware, session_middleware, track_requests};

/// Oversized images are read to the end, up to this multiple of the image limit,
/// so the rejection can report their real size.
const UPLOAD_BODY_FACTOR: usize = 4;

/// Room for multipart framing on top of the image itself.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

fn cors_layer(site_url: Option<&str>) -> CorsLayer {
    let origin = match site_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid site_url for CORS: {}", e);
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ])
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.site_url.as_deref());
    let upload_body_limit = (state.max_image_mb as usize)
        .saturating_mul(1024 * 1024)
        .saturating_mul(UPLOAD_BODY_FACTOR)
        .saturating_add(UPLOAD_OVERHEAD_BYTES);

    let session = auth::routes()
        .route_layer(from_fn_with_state(state.clone(), session_middleware));

    let admin = Router::new()
        .merge(dashboard::admin_routes())
        .merge(journeys::admin_routes(upload_body_limit))
        .merge(services::admin_routes())
        .merge(bookings::admin_routes())
        .merge(contacts::admin_routes())
        .route_layer(from_fn_with_state(state.clone(), admin_auth_middleware));

    Router::new()
        .merge(site::routes())
        .merge(journeys::routes())
        .merge(services::routes())
        .merge(bookings::routes())
        .merge(contacts::routes())
        .merge(session)
        .merge(admin)
        .nest_service(state.images.public_path(), ServeDir::new(state.images.dir()))
        .layer(from_fn_with_state(state.clone(), track_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
