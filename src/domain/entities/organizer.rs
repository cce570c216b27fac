use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Organizing group profile, referenced by events as the publisher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organizer {
    pub account_id: String,
    pub org_name: String,
    pub email: String,
    pub description: String,
    pub created_at: i64,
}

impl Organizer {
    pub fn new(account_id: String, org_name: String, email: String, description: String) -> Self {
        Self {
            account_id,
            org_name,
            email,
            description,
            created_at: Utc::now().timestamp(),
        }
    }
}
