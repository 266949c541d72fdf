//! Client profiles captured at sign-up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact details for a registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub alternative_contact_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive match over first name, last name and email.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
    }
}

/// Unvalidated sign-up form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    #[serde(default)]
    pub alternative_contact_number: Option<String>,
    pub password: String,
    pub confirm_password: String,
}
