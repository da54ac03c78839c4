pub mod app_config;
pub mod booking_repo;
pub mod contact_repo;
pub mod database;
pub mod images;
pub mod journey_repo;
pub mod memory;
pub mod service_repo;
pub mod user_repo;

use std::sync::Arc;

use safar_core::repository::{
    BookingRepository, ContactRepository, JourneyRepository, ServiceRepository, UserRepository,
};
use sqlx::PgPool;

pub use booking_repo::StoreBookingRepository;
pub use contact_repo::StoreContactRepository;
pub use database::DbClient;
pub use images::LocalImageStore;
pub use journey_repo::StoreJourneyRepository;
pub use memory::MemoryStore;
pub use service_repo::StoreServiceRepository;
pub use user_repo::StoreUserRepository;

/// One handle per table, shared by every request handler.
#[derive(Clone)]
pub struct Repositories {
    pub journeys: Arc<dyn JourneyRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            journeys: Arc::new(StoreJourneyRepository::new(pool.clone())),
            bookings: Arc::new(StoreBookingRepository::new(pool.clone())),
            contacts: Arc::new(StoreContactRepository::new(pool.clone())),
            services: Arc::new(StoreServiceRepository::new(pool.clone())),
            users: Arc::new(StoreUserRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Wraps an existing store, so tests can seed it directly.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            journeys: store.clone(),
            bookings: store.clone(),
            contacts: store.clone(),
            services: store.clone(),
            users: store,
        }
    }
}
