use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{dates, BookingStatus, BookingWithPackage, Contact};

/// Number of recent bookings and inquiries shown on the dashboard.
pub const RECENT_LIMIT: i64 = 4;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub journeys: i64,
    pub featured_journeys: i64,
    pub bookings: i64,
    pub contacts: i64,
    pub pending_contacts: i64,
    pub services: i64,
    pub recent_bookings: Vec<RecentBooking>,
    pub recent_contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentBooking {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub persons: i32,
    pub status: BookingStatus,
    pub package_title: String,
    pub travel_date: String,
    pub created_at: DateTime<Utc>,
    pub received: String,
}

impl From<BookingWithPackage> for RecentBooking {
    fn from(view: BookingWithPackage) -> Self {
        let b = view.booking;
        Self {
            id: b.id,
            name: b.name,
            email: b.email,
            phone: b.phone,
            persons: b.persons,
            status: b.status,
            package_title: view.package_name,
            travel_date: dates::format_date_readable(b.date),
            received: dates::format_date_time(b.created_at),
            created_at: b.created_at,
        }
    }
}
