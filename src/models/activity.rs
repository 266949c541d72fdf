//! Activity log entries shown on the admin activities screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of actions recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Login,
    Upload,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Upload => "upload",
        }
    }
}

/// A recorded activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub user_id: Option<String>,
    pub user_email: String,
    pub action: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub browser_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Activity about to be logged.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Option<String>,
    pub user_email: String,
    pub action: ActivityAction,
    pub description: String,
    pub ip_address: Option<String>,
    pub browser_info: Option<String>,
}

impl NewActivity {
    pub fn new(
        user_id: Option<String>,
        user_email: impl Into<String>,
        action: ActivityAction,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            user_email: user_email.into(),
            action,
            description: description.into(),
            ip_address: None,
            browser_info: None,
        }
    }

    /// Attach request metadata.
    pub fn with_client(mut self, ip_address: Option<String>, browser_info: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.browser_info = browser_info;
        self
    }
}
