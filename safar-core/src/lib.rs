/// Implements `as_str`, `Display` and `FromStr` for a status-like enum stored
/// as text.
macro_rules! text_enum {
    ($ty:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($ty::$variant),)+
                    other => Err($crate::CoreError::Validation(format!(
                        "Invalid {}: {}",
                        $label,
                        other
                    ))),
                }
            }
        }
    };
}

pub mod booking;
pub mod contact;
pub mod dashboard;
pub mod dates;
pub mod images;
pub mod journey;
pub mod pii;
pub mod repository;
pub mod service;
pub mod user;

pub use booking::{Booking, BookingStatus, BookingWithPackage, NewBooking, PackageSummary};
pub use contact::{Contact, ContactFilter, ContactStatus, NewContact};
pub use dashboard::{DashboardStats, RecentBooking};
pub use journey::{Journey, JourneyCategory, JourneyFilter, JourneyInput, JourneyStatus};
pub use repository::{StoreError, StoreResult};
pub use service::{Service, ServiceInput, ServiceStatus};
pub use user::{Role, User};

/// Message returned whenever a form is missing one of its required fields.
pub const MISSING_FIELDS: &str = "All required fields must be filled";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Trims a form field and reports whether anything is left.
pub(crate) fn required(value: &str) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(MISSING_FIELDS.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Blank optional fields collapse to `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
