use axum::{extract::State, routing::get, Json, Router};
use safar_core::dashboard::RECENT_LIMIT;
use safar_core::{ContactFilter, ContactStatus, DashboardStats, RecentBooking, StoreResult};

use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/api/admin/dashboard", get(dashboard))
}

/// Logs a failed stat and falls back to its zero value.
fn or_default<T: Default>(stat: &str, result: StoreResult<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(stat, "Error fetching dashboard stat: {}", e);
        T::default()
    })
}

async fn load_stats(state: &AppState) -> DashboardStats {
    let repos = &state.repos;
    let newest = ContactFilter::default();
    let (journeys, featured_journeys, bookings, contacts, pending_contacts, services, recent_bookings, recent_contacts) = tokio::join!(
        repos.journeys.count_journeys(false),
        repos.journeys.count_journeys(true),
        repos.bookings.count_bookings(),
        repos.contacts.count_contacts(None),
        repos.contacts.count_contacts(Some(ContactStatus::Pending)),
        repos.services.count_services(),
        repos.bookings.list_bookings(Some(RECENT_LIMIT)),
        repos.contacts.list_contacts(&newest, Some(RECENT_LIMIT)),
    );

    DashboardStats {
        journeys: or_default("journeys", journeys),
        featured_journeys: or_default("featured_journeys", featured_journeys),
        bookings: or_default("bookings", bookings),
        contacts: or_default("contacts", contacts),
        pending_contacts: or_default("pending_contacts", pending_contacts),
        services: or_default("services", services),
        recent_bookings: or_default("recent_bookings", recent_bookings)
            .into_iter()
            .map(RecentBooking::from)
            .collect(),
        recent_contacts: or_default("recent_contacts", recent_contacts),
    }
}

/// GET /api/admin/dashboard
///
/// A failing stat is logged and shown as zero; the others are still reported.
async fn dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(load_stats(&state).await)
}
