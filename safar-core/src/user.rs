use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    /// Role columns are compared case-insensitively with surrounding
    /// whitespace ignored. Anything unrecognised carries no privileges.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "customer" => Role::Customer,
            other => {
                tracing::warn!("Unrecognised role '{}' treated as customer", other);
                Role::Customer
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

/// Profile row in `users`, keyed by the identity provider's subject id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_ignores_case_and_whitespace() {
        assert_eq!(Role::parse_lenient(" Admin \n"), Role::Admin);
        assert_eq!(Role::parse_lenient("CUSTOMER"), Role::Customer);
        assert_eq!(Role::parse_lenient("superuser"), Role::Customer);
    }
}
