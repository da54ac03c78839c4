use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{optional, required, CoreError, CoreResult};

/// Rating shown on the detail page when a journey has not been rated yet.
pub const DEFAULT_RATING: f64 = 4.5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JourneyCategory {
    Family,
    Honeymoon,
    Adventure,
    Group,
    Offbeat,
}

text_enum!(JourneyCategory, "category" {
    Family => "Family",
    Honeymoon => "Honeymoon",
    Adventure => "Adventure",
    Group => "Group",
    Offbeat => "Offbeat",
});

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JourneyStatus {
    #[default]
    Active,
    Draft,
}

text_enum!(JourneyStatus, "journey status" {
    Active => "active",
    Draft => "draft",
});

/// A travel package offered on the site. Stored in the `packages` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Journey {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub duration: String,
    pub days: i32,
    pub nights: i32,
    pub location: String,
    pub category: JourneyCategory,
    pub status: JourneyStatus,
    pub featured: bool,
    pub rating: Option<f64>,
    pub main_image_url: Option<String>,
    pub itinerary: Vec<serde_json::Value>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a journey, as submitted by the admin form.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<i64>,
    #[serde(default)]
    pub duration: String,
    pub days: Option<i32>,
    pub nights: Option<i32>,
    #[serde(default)]
    pub location: String,
    pub category: Option<JourneyCategory>,
    #[serde(default)]
    pub status: JourneyStatus,
    #[serde(default)]
    pub featured: bool,
    pub rating: Option<f64>,
    #[serde(default)]
    pub itinerary: Vec<serde_json::Value>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl JourneyInput {
    /// Checks required fields and returns a copy with text fields trimmed.
    pub fn validate(self) -> CoreResult<Self> {
        let title = required(&self.title)?;
        let description = required(&self.description)?;
        let duration = required(&self.duration)?;
        let location = required(&self.location)?;
        let (price, days, nights, category) = match (self.price, self.days, self.nights, self.category) {
            (Some(p), Some(d), Some(n), Some(c)) => (p, d, n, c),
            _ => return Err(CoreError::Validation(crate::MISSING_FIELDS.to_string())),
        };

        if price < 0 {
            return Err(CoreError::Validation("Price cannot be negative".to_string()));
        }
        if days < 1 || nights < 0 {
            return Err(CoreError::Validation(
                "Days must be at least 1 and nights cannot be negative".to_string(),
            ));
        }
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(CoreError::Validation("Rating must be between 0 and 5".to_string()));
            }
        }

        Ok(Self {
            title,
            description,
            price: Some(price),
            duration,
            days: Some(days),
            nights: Some(nights),
            location,
            category: Some(category),
            status: self.status,
            featured: self.featured,
            rating: self.rating,
            itinerary: self.itinerary,
            inclusions: clean_list(self.inclusions),
            exclusions: clean_list(self.exclusions),
        })
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items.into_iter().filter_map(|i| optional(Some(i))).collect()
}

impl Journey {
    /// Builds a new journey from a form submission.
    pub fn create(input: JourneyInput, now: DateTime<Utc>) -> CoreResult<Self> {
        let mut journey = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            price: 0,
            duration: String::new(),
            days: 1,
            nights: 0,
            location: String::new(),
            category: JourneyCategory::Family,
            status: JourneyStatus::Active,
            featured: false,
            rating: None,
            main_image_url: None,
            itinerary: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        journey.apply(input, now)?;
        Ok(journey)
    }

    /// Replaces the editable fields. The image and identity are untouched.
    pub fn apply(&mut self, input: JourneyInput, now: DateTime<Utc>) -> CoreResult<()> {
        let input = input.validate()?;
        self.title = input.title;
        self.description = input.description;
        self.price = input.price.unwrap_or(self.price);
        self.duration = input.duration;
        self.days = input.days.unwrap_or(self.days);
        self.nights = input.nights.unwrap_or(self.nights);
        self.location = input.location;
        self.category = input.category.unwrap_or(self.category);
        self.status = input.status;
        self.featured = input.featured;
        self.rating = input.rating;
        self.itinerary = input.itinerary;
        self.inclusions = input.inclusions;
        self.exclusions = input.exclusions;
        self.updated_at = now;
        Ok(())
    }

    pub fn is_public(&self) -> bool {
        self.status == JourneyStatus::Active
    }

    /// Fills display defaults used by the package detail page.
    pub fn with_view_defaults(mut self) -> Self {
        if self.rating.is_none() {
            self.rating = Some(DEFAULT_RATING);
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneyFilter {
    pub category: Option<JourneyCategory>,
    pub status: Option<JourneyStatus>,
    pub featured: Option<bool>,
}

impl JourneyFilter {
    pub fn public() -> Self {
        Self {
            status: Some(JourneyStatus::Active),
            ..Default::default()
        }
    }

    pub fn matches(&self, journey: &Journey) -> bool {
        self.category.map_or(true, |c| journey.category == c)
            && self.status.map_or(true, |s| journey.status == s)
            && self.featured.map_or(true, |f| journey.featured == f)
    }
}
