use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity issued by the external auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Organizer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Organizer => "organizer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Role::Student),
            "organizer" => Some(Role::Organizer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role record attached to an account. Created once at signup; the role is
/// immutable afterwards — a profile is a student profile or an organizer
/// profile, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub account_id: String,
    pub role: Role,
    pub email: String,
    pub display_name: String,
    pub created_at: i64,
}

impl Profile {
    pub fn new(account: &Account, role: Role) -> Self {
        let display_name = account
            .display_name
            .clone()
            .unwrap_or_else(|| account.email.split('@').next().unwrap_or("").to_string());
        Self {
            account_id: account.id.clone(),
            role,
            email: account.email.clone(),
            display_name,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}
