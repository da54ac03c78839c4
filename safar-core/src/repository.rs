use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    BookingStatus, BookingWithPackage, Contact, ContactFilter, ContactStatus, Journey,
    JourneyFilter, Service, ServiceStatus, User,
};

/// Errors raised by a storage backend. Database messages are carried as-is so
/// callers can show them verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Storage(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository trait for journeys (the `packages` table)
#[async_trait]
pub trait JourneyRepository: Send + Sync {
    async fn create_journey(&self, journey: &Journey) -> StoreResult<()>;

    async fn get_journey(&self, id: Uuid) -> StoreResult<Option<Journey>>;

    /// Newest first.
    async fn list_journeys(&self, filter: &JourneyFilter) -> StoreResult<Vec<Journey>>;

    async fn update_journey(&self, journey: &Journey) -> StoreResult<()>;

    /// Removes the journey and returns what was deleted. Bookings that pointed
    /// at it keep existing with no package.
    async fn delete_journey(&self, id: Uuid) -> StoreResult<Journey>;

    async fn count_journeys(&self, featured_only: bool) -> StoreResult<i64>;
}

/// Repository trait for booking requests
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &crate::Booking) -> StoreResult<()>;

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<BookingWithPackage>>;

    /// Newest first, optionally capped.
    async fn list_bookings(&self, limit: Option<i64>) -> StoreResult<Vec<BookingWithPackage>>;

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<()>;

    async fn delete_booking(&self, id: Uuid) -> StoreResult<()>;

    async fn count_bookings(&self) -> StoreResult<i64>;
}

/// Repository trait for contact inquiries
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact(&self, contact: &Contact) -> StoreResult<()>;

    /// Newest first, optionally capped.
    async fn list_contacts(&self, filter: &ContactFilter, limit: Option<i64>) -> StoreResult<Vec<Contact>>;

    async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Contact>;

    async fn delete_contact(&self, id: Uuid) -> StoreResult<()>;

    async fn count_contacts(&self, status: Option<ContactStatus>) -> StoreResult<i64>;
}

/// Repository trait for marketing services
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create_service(&self, service: &Service) -> StoreResult<()>;

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>>;

    /// Newest first.
    async fn list_services(&self, status: Option<ServiceStatus>) -> StoreResult<Vec<Service>>;

    async fn update_service(&self, service: &Service) -> StoreResult<()>;

    async fn delete_service(&self, id: Uuid) -> StoreResult<()>;

    async fn count_services(&self) -> StoreResult<i64>;
}

/// Repository trait for user profiles and their roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn create_user(&self, user: &User) -> StoreResult<()>;

    /// Updates contact details only; the role column is never written here.
    async fn update_profile(&self, id: Uuid, email: &str, name: Option<&str>) -> StoreResult<User>;

    /// Cheap round trip used by the connection test.
    async fn ping(&self) -> StoreResult<()>;
}
