//! In-process backend used for local runs without Postgres and by tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safar_core::repository::{
    BookingRepository, ContactRepository, JourneyRepository, ServiceRepository, UserRepository,
};
use safar_core::{
    Booking, BookingStatus, BookingWithPackage, Contact, ContactFilter, ContactStatus, Journey,
    JourneyFilter, PackageSummary, Service, ServiceStatus, StoreError, StoreResult, User,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    journeys: RwLock<Vec<Journey>>,
    bookings: RwLock<Vec<Booking>>,
    contacts: RwLock<Vec<Contact>>,
    services: RwLock<Vec<Service>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first. Rows inserted later win ties on `created_at`.
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

fn capped<T>(mut rows: Vec<T>, limit: Option<i64>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit.max(0) as usize);
    }
    rows
}

impl MemoryStore {
    async fn with_package(&self, booking: Booking) -> BookingWithPackage {
        let journeys = self.journeys.read().await;
        let package = booking
            .package_id
            .and_then(|id| journeys.iter().find(|j| j.id == id))
            .map(PackageSummary::from);
        BookingWithPackage::new(booking, package)
    }
}

#[async_trait]
impl JourneyRepository for MemoryStore {
    async fn create_journey(&self, journey: &Journey) -> StoreResult<()> {
        let mut journeys = self.journeys.write().await;
        if journeys.iter().any(|j| j.id == journey.id) {
            return Err(StoreError::Database("duplicate key value violates unique constraint \"packages_pkey\"".into()));
        }
        journeys.push(journey.clone());
        Ok(())
    }

    async fn get_journey(&self, id: Uuid) -> StoreResult<Option<Journey>> {
        Ok(self.journeys.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn list_journeys(&self, filter: &JourneyFilter) -> StoreResult<Vec<Journey>> {
        let journeys = self.journeys.read().await;
        let matching: Vec<Journey> = journeys.iter().filter(|j| filter.matches(j)).cloned().collect();
        Ok(newest_first(&matching, |j| j.created_at))
    }

    async fn update_journey(&self, journey: &Journey) -> StoreResult<()> {
        let mut journeys = self.journeys.write().await;
        let slot = journeys
            .iter_mut()
            .find(|j| j.id == journey.id)
            .ok_or(StoreError::NotFound("Journey"))?;
        *slot = journey.clone();
        Ok(())
    }

    async fn delete_journey(&self, id: Uuid) -> StoreResult<Journey> {
        let removed = {
            let mut journeys = self.journeys.write().await;
            let index = journeys
                .iter()
                .position(|j| j.id == id)
                .ok_or(StoreError::NotFound("Journey"))?;
            journeys.remove(index)
        };
        // Mirrors ON DELETE SET NULL on bookings.package_id
        for booking in self.bookings.write().await.iter_mut() {
            if booking.package_id == Some(id) {
                booking.package_id = None;
            }
        }
        Ok(removed)
    }

    async fn count_journeys(&self, featured_only: bool) -> StoreResult<i64> {
        let journeys = self.journeys.read().await;
        Ok(journeys.iter().filter(|j| !featured_only || j.featured).count() as i64)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, booking: &Booking) -> StoreResult<()> {
        // Held until the push so a concurrent delete_journey cannot slip in between
        let journeys = self.journeys.read().await;
        if let Some(package_id) = booking.package_id {
            if !journeys.iter().any(|j| j.id == package_id) {
                return Err(StoreError::Database(
                    "insert or update on table \"bookings\" violates foreign key constraint \"bookings_package_id_fkey\"".into(),
                ));
            }
        }
        self.bookings.write().await.push(booking.clone());
        drop(journeys);
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<BookingWithPackage>> {
        let found = self.bookings.read().await.iter().find(|b| b.id == id).cloned();
        match found {
            Some(booking) => Ok(Some(self.with_package(booking).await)),
            None => Ok(None),
        }
    }

    async fn list_bookings(&self, limit: Option<i64>) -> StoreResult<Vec<BookingWithPackage>> {
        let rows = {
            let bookings = self.bookings.read().await;
            capped(newest_first(&bookings, |b| b.created_at), limit)
        };
        let mut out = Vec::with_capacity(rows.len());
        for booking in rows {
            out.push(self.with_package(booking).await);
        }
        Ok(out)
    }

    async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> StoreResult<()> {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound("Booking"))?;
        booking.status = status;
        Ok(())
    }

    async fn delete_booking(&self, id: Uuid) -> StoreResult<()> {
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        if bookings.len() == before {
            return Err(StoreError::NotFound("Booking"));
        }
        Ok(())
    }

    async fn count_bookings(&self) -> StoreResult<i64> {
        Ok(self.bookings.read().await.len() as i64)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create_contact(&self, contact: &Contact) -> StoreResult<()> {
        self.contacts.write().await.push(contact.clone());
        Ok(())
    }

    async fn list_contacts(&self, filter: &ContactFilter, limit: Option<i64>) -> StoreResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        let matching: Vec<Contact> = contacts.iter().filter(|c| filter.matches(c)).cloned().collect();
        Ok(capped(newest_first(&matching, |c| c.created_at), limit))
    }

    async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Contact> {
        let mut contacts = self.contacts.write().await;
        let contact = contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound("Contact"))?;
        contact.set_status(status, now);
        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: Uuid) -> StoreResult<()> {
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|c| c.id != id);
        if contacts.len() == before {
            return Err(StoreError::NotFound("Contact"));
        }
        Ok(())
    }

    async fn count_contacts(&self, status: Option<ContactStatus>) -> StoreResult<i64> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .count() as i64)
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn create_service(&self, service: &Service) -> StoreResult<()> {
        self.services.write().await.push(service.clone());
        Ok(())
    }

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        Ok(self.services.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn list_services(&self, status: Option<ServiceStatus>) -> StoreResult<Vec<Service>> {
        let services = self.services.read().await;
        let matching: Vec<Service> = services
            .iter()
            .filter(|s| status.map_or(true, |st| s.status == st))
            .cloned()
            .collect();
        Ok(newest_first(&matching, |s| s.created_at))
    }

    async fn update_service(&self, service: &Service) -> StoreResult<()> {
        let mut services = self.services.write().await;
        let slot = services
            .iter_mut()
            .find(|s| s.id == service.id)
            .ok_or(StoreError::NotFound("Service"))?;
        *slot = service.clone();
        Ok(())
    }

    async fn delete_service(&self, id: Uuid) -> StoreResult<()> {
        let mut services = self.services.write().await;
        let before = services.len();
        services.retain(|s| s.id != id);
        if services.len() == before {
            return Err(StoreError::NotFound("Service"));
        }
        Ok(())
    }

    async fn count_services(&self) -> StoreResult<i64> {
        Ok(self.services.read().await.len() as i64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Database("duplicate key value violates unique constraint \"users_pkey\"".into()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, email: &str, name: Option<&str>) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.email = email.to_string();
        if let Some(name) = name {
            user.name = Some(name.to_string());
        }
        Ok(user.clone())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safar_core::{JourneyInput, NewBooking, NewContact, Role};

    fn journey(title: &str, featured: bool) -> Journey {
        let input: JourneyInput = serde_json::from_value(serde_json::json!({
            "title": title,
            "description": "desc",
            "price": 10000,
            "duration": "3 Days / 2 Nights",
            "days": 3,
            "nights": 2,
            "location": "Leh",
            "category": "Adventure",
            "featured": featured
        }))
        .unwrap();
        Journey::create(input, Utc::now()).unwrap()
    }

    fn booking_for(package_id: Uuid, persons: i32) -> Booking {
        NewBooking {
            package_id,
            name: "Ravi".into(),
            email: "ravi@example.com".into(),
            phone: "9999999999".into(),
            date: "2026-06-01".into(),
            persons,
            message: None,
        }
        .into_booking(Utc::now())
        .unwrap()
    }

    #[tokio::test]
    async fn journeys_list_newest_first_and_count_featured() {
        let store = MemoryStore::new();
        let older = journey("Ladakh Bikes", true);
        let newer = journey("Zanskar Trek", false);
        store.create_journey(&older).await.unwrap();
        store.create_journey(&newer).await.unwrap();

        let all = store.list_journeys(&JourneyFilter::default()).await.unwrap();
        assert_eq!(all[0].id, newer.id);
        assert_eq!(store.count_journeys(false).await.unwrap(), 2);
        assert_eq!(store.count_journeys(true).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_a_journey_orphans_its_bookings() {
        let store = MemoryStore::new();
        let j = journey("Spiti Valley", false);
        store.create_journey(&j).await.unwrap();
        let b = booking_for(j.id, 3);
        store.create_booking(&b).await.unwrap();

        let view = store.get_booking(b.id).await.unwrap().unwrap();
        assert_eq!(view.total_amount, 30000);

        store.delete_journey(j.id).await.unwrap();
        let view = store.get_booking(b.id).await.unwrap().unwrap();
        assert_eq!(view.booking.package_id, None);
        assert_eq!(view.package_name, safar_core::booking::MISSING_PACKAGE_NAME);
    }

    #[tokio::test]
    async fn booking_for_unknown_package_fails_like_a_foreign_key() {
        let store = MemoryStore::new();
        let err = store.create_booking(&booking_for(Uuid::new_v4(), 1)).await.unwrap_err();
        assert!(err.to_string().contains("foreign key"));
    }

    #[tokio::test]
    async fn status_update_touches_only_status() {
        let store = MemoryStore::new();
        let j = journey("Goa Beaches", false);
        store.create_journey(&j).await.unwrap();
        let b = booking_for(j.id, 2);
        store.create_booking(&b).await.unwrap();

        store.update_booking_status(b.id, BookingStatus::Confirmed).await.unwrap();
        let after = store.get_booking(b.id).await.unwrap().unwrap().booking;
        assert_eq!(after.status, BookingStatus::Confirmed);
        assert_eq!(Booking { status: BookingStatus::Pending, ..after }, b);

        let missing = store.update_booking_status(Uuid::new_v4(), BookingStatus::Cancelled).await;
        assert!(matches!(missing, Err(StoreError::NotFound("Booking"))));
    }

    #[tokio::test]
    async fn contacts_filter_limit_and_delete() {
        let store = MemoryStore::new();
        for subject in ["Houseboat", "Cab to airport", "Houseboat again"] {
            let c = NewContact {
                name: "Meera".into(),
                email: "meera@example.com".into(),
                phone: None,
                subject: subject.into(),
                message: "hi".into(),
            }
            .into_contact(Utc::now())
            .unwrap();
            store.create_contact(&c).await.unwrap();
        }

        let filter = ContactFilter { status: None, q: Some("houseboat".into()) };
        assert_eq!(store.list_contacts(&filter, None).await.unwrap().len(), 2);
        let latest = store.list_contacts(&ContactFilter::default(), Some(1)).await.unwrap();
        assert_eq!(latest[0].subject, "Houseboat again");

        let replied = store
            .update_contact_status(latest[0].id, ContactStatus::Replied, Utc::now())
            .await
            .unwrap();
        assert!(replied.replied_at.is_some());
        assert_eq!(store.count_contacts(Some(ContactStatus::Pending)).await.unwrap(), 2);

        store.delete_contact(latest[0].id).await.unwrap();
        assert_eq!(store.count_contacts(None).await.unwrap(), 2);
        assert!(store.delete_contact(latest[0].id).await.is_err());
    }

    #[tokio::test]
    async fn profile_update_never_touches_role() {
        let store = MemoryStore::new();
        let user = User {
            id: Uuid::new_v4(),
            email: "old@example.com".into(),
            name: None,
            role: Role::Admin,
            created_at: Utc::now(),
        };
        store.create_user(&user).await.unwrap();
        let updated = store.update_profile(user.id, "new@example.com", Some("Zoya")).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.name.as_deref(), Some("Zoya"));
        assert!(store.create_user(&user).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn bookings_racing_a_journey_delete_never_dangle() {
        for _ in 0..50 {
            let store = std::sync::Arc::new(MemoryStore::new());
            let trip = journey("Spiti Circuit", false);
            store.create_journey(&trip).await.unwrap();

            let mut inserts = Vec::new();
            for _ in 0..8 {
                let store = store.clone();
                let booking = booking_for(trip.id, 2);
                inserts.push(tokio::spawn(async move { store.create_booking(&booking).await }));
            }
            let deleter = {
                let store = store.clone();
                tokio::spawn(async move { store.delete_journey(trip.id).await })
            };

            deleter.await.unwrap().unwrap();
            for insert in inserts {
                // Inserts that land after the delete fail the foreign-key check
                let _ = insert.await.unwrap();
            }

            let bookings = store.bookings.read().await;
            assert!(bookings.iter().all(|b| b.package_id.is_none()));
        }
    }
}
