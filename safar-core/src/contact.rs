use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{optional, required, CoreResult};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Replied,
    Closed,
}

text_enum!(ContactStatus, "contact status" {
    Pending => "pending",
    Replied => "replied",
    Closed => "closed",
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Moves the inquiry to `status`. The first transition to `replied`
    /// records when it happened.
    pub fn set_status(&mut self, status: ContactStatus, now: DateTime<Utc>) {
        if status == ContactStatus::Replied && self.replied_at.is_none() {
            self.replied_at = Some(now);
        }
        self.status = status;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl NewContact {
    pub fn into_contact(self, now: DateTime<Utc>) -> CoreResult<Contact> {
        Ok(Contact {
            id: Uuid::new_v4(),
            name: required(&self.name)?,
            email: required(&self.email)?,
            phone: optional(self.phone),
            subject: required(&self.subject)?,
            message: required(&self.message)?,
            status: ContactStatus::Pending,
            replied_at: None,
            created_at: now,
        })
    }
}

/// Admin inbox filter: exact status and a case-insensitive search over
/// name, email and subject.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub q: Option<String>,
}

impl ContactFilter {
    pub fn search_term(&self) -> Option<String> {
        optional(self.q.clone()).map(|q| q.to_lowercase())
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        if let Some(status) = self.status {
            if contact.status != status {
                return false;
            }
        }
        match self.search_term() {
            Some(term) => [&contact.name, &contact.email, &contact.subject]
                .iter()
                .any(|field| field.to_lowercase().contains(&term)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        NewContact {
            name: "Imran Sheikh".into(),
            email: "imran@example.com".into(),
            phone: None,
            subject: "Houseboat availability".into(),
            message: "Is the deluxe houseboat free in May?".into(),
        }
        .into_contact(Utc::now())
        .unwrap()
    }

    #[test]
    fn replied_at_is_stamped_once() {
        let mut c = contact();
        let first = Utc::now();
        c.set_status(ContactStatus::Replied, first);
        assert_eq!(c.replied_at, Some(first));

        c.set_status(ContactStatus::Closed, Utc::now());
        c.set_status(ContactStatus::Replied, Utc::now() + chrono::Duration::hours(1));
        assert_eq!(c.replied_at, Some(first));
        assert_eq!(c.status, ContactStatus::Replied);
    }

    #[test]
    fn closing_does_not_stamp_replied_at() {
        let mut c = contact();
        c.set_status(ContactStatus::Closed, Utc::now());
        assert!(c.replied_at.is_none());
    }

    #[test]
    fn filter_searches_case_insensitively() {
        let c = contact();
        let by_subject = ContactFilter { status: None, q: Some("HOUSEBOAT".into()) };
        assert!(by_subject.matches(&c));
        let wrong_status = ContactFilter { status: Some(ContactStatus::Closed), q: None };
        assert!(!wrong_status.matches(&c));
        let blank = ContactFilter { status: None, q: Some("  ".into()) };
        assert!(blank.matches(&c));
    }

    #[test]
    fn blank_subject_is_rejected() {
        let form = NewContact {
            name: "A".into(),
            email: "a@example.com".into(),
            phone: None,
            subject: " ".into(),
            message: "hello".into(),
        };
        assert!(form.into_contact(Utc::now()).is_err());
    }
}
