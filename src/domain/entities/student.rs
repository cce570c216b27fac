use crate::domain::value_objects::Usn;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Student profile. The set of events the student is registered for lives
/// in its own reference list (the `student_events` collection) so the
/// profile page never has to scan all registrations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub account_id: String,
    pub name: String,
    pub usn: Usn,
    pub email: String,
    pub semester: u8,
    pub contact_no: Option<String>,
    pub created_at: i64,
}

impl Student {
    pub fn new(
        account_id: String,
        name: String,
        usn: Usn,
        email: String,
        semester: u8,
        contact_no: Option<String>,
    ) -> Self {
        Self {
            account_id,
            name,
            usn,
            email,
            semester,
            contact_no,
            created_at: Utc::now().timestamp(),
        }
    }
}
