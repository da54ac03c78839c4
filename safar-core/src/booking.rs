use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{optional, required, CoreError, CoreResult, MISSING_FIELDS};

/// Shown in admin views when the booked package has since been deleted.
pub const MISSING_PACKAGE_NAME: &str = "Package Not Found";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

text_enum!(BookingStatus, "booking status" {
    Pending => "pending",
    Confirmed => "confirmed",
    Cancelled => "cancelled",
});

/// A reservation request made from a package page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub package_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub persons: i32,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub package_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub persons: i32,
    pub message: Option<String>,
}

impl NewBooking {
    /// Validates the form and produces a pending booking. Whether the package
    /// exists is checked by the caller against the store.
    pub fn into_booking(self, now: DateTime<Utc>) -> CoreResult<Booking> {
        let name = required(&self.name)?;
        let email = required(&self.email)?;
        let phone = required(&self.phone)?;
        let date = required(&self.date)?;
        if self.persons < 1 {
            return Err(CoreError::Validation(MISSING_FIELDS.to_string()));
        }
        if !email.contains('@') {
            return Err(CoreError::Validation("Please enter a valid email address".to_string()));
        }
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| CoreError::Validation("Travel date must be in YYYY-MM-DD format".to_string()))?;

        Ok(Booking {
            id: Uuid::new_v4(),
            package_id: Some(self.package_id),
            name,
            email,
            phone,
            date,
            persons: self.persons,
            message: optional(self.message),
            status: BookingStatus::Pending,
            created_at: now,
        })
    }
}

/// The package fields admin booking views pull in alongside a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageSummary {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub description: String,
    pub location: String,
    pub duration: String,
}

impl From<&crate::Journey> for PackageSummary {
    fn from(j: &crate::Journey) -> Self {
        Self {
            id: j.id,
            title: j.title.clone(),
            price: j.price,
            description: j.description.clone(),
            location: j.location.clone(),
            duration: j.duration.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingWithPackage {
    #[serde(flatten)]
    pub booking: Booking,
    pub package: Option<PackageSummary>,
    pub package_name: String,
    pub package_price: i64,
    pub total_amount: i64,
}

impl BookingWithPackage {
    pub fn new(booking: Booking, package: Option<PackageSummary>) -> Self {
        let package_name = package
            .as_ref()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| MISSING_PACKAGE_NAME.to_string());
        let package_price = package.as_ref().map(|p| p.price).unwrap_or(0);
        // Prices are only bounded below, so the product can exceed i64
        let total_amount = package_price.saturating_mul(i64::from(booking.persons));
        Self {
            booking,
            package,
            package_name,
            package_price,
            total_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewBooking {
        NewBooking {
            package_id: Uuid::new_v4(),
            name: " Asha Rao ".into(),
            email: "asha@example.com".into(),
            phone: "+91 98765 43210".into(),
            date: "2026-12-01".into(),
            persons: 2,
            message: Some("   ".into()),
        }
    }

    #[test]
    fn valid_form_becomes_pending_booking() {
        let booking = form().into_booking(Utc::now()).unwrap();
        assert_eq!(booking.name, "Asha Rao");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.message, None);
        assert_eq!(booking.date, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    }

    #[test]
    fn zero_persons_is_a_missing_field() {
        let mut f = form();
        f.persons = 0;
        assert_eq!(f.into_booking(Utc::now()).unwrap_err().to_string(), MISSING_FIELDS);
    }

    #[test]
    fn blank_phone_is_a_missing_field() {
        let mut f = form();
        f.phone = "".into();
        assert_eq!(f.into_booking(Utc::now()).unwrap_err().to_string(), MISSING_FIELDS);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut f = form();
        f.date = "01/12/2026".into();
        assert!(f.into_booking(Utc::now()).is_err());
    }

    #[test]
    fn totals_use_package_price_times_persons() {
        let booking = form().into_booking(Utc::now()).unwrap();
        let package = PackageSummary {
            id: Uuid::new_v4(),
            title: "Kerala Backwaters".into(),
            price: 12000,
            description: String::new(),
            location: "Alleppey".into(),
            duration: "3 Days / 2 Nights".into(),
        };
        let view = BookingWithPackage::new(booking.clone(), Some(package));
        assert_eq!(view.package_name, "Kerala Backwaters");
        assert_eq!(view.total_amount, 24000);

        let orphan = BookingWithPackage::new(booking, None);
        assert_eq!(orphan.package_name, MISSING_PACKAGE_NAME);
        assert_eq!(orphan.total_amount, 0);
    }

    #[test]
    fn huge_price_total_saturates() {
        let mut booking = form().into_booking(Utc::now()).unwrap();
        booking.persons = 3;
        let package = PackageSummary {
            id: Uuid::new_v4(),
            title: "Private Island".into(),
            price: i64::MAX / 2,
            description: String::new(),
            location: "Lakshadweep".into(),
            duration: "7 Days / 6 Nights".into(),
        };
        let view = BookingWithPackage::new(booking, Some(package));
        assert_eq!(view.package_price, i64::MAX / 2);
        assert_eq!(view.total_amount, i64::MAX);
    }
}
