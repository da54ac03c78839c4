use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{required, CoreResult};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Active,
    Inactive,
}

text_enum!(ServiceStatus, "service status" {
    Active => "active",
    Inactive => "inactive",
});

/// A standalone offering such as cab rental or hotel booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub featured: bool,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub status: ServiceStatus,
}

impl Service {
    pub fn create(input: ServiceInput, now: DateTime<Utc>) -> CoreResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: required(&input.title)?,
            description: input.description.trim().to_string(),
            icon: input.icon.trim().to_string(),
            featured: input.featured,
            status: input.status,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, input: ServiceInput, now: DateTime<Utc>) -> CoreResult<()> {
        self.title = required(&input.title)?;
        self.description = input.description.trim().to_string();
        self.icon = input.icon.trim().to_string();
        self.featured = input.featured;
        self.status = input.status;
        self.updated_at = now;
        Ok(())
    }
}
