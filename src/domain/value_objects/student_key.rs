use serde::{Deserialize, Serialize};
use std::fmt;

/// University seat number, the student half of the registration composite
/// key. Stored uppercase so lookups are case-stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Usn(String);

impl Usn {
    pub fn new(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("USN cannot be empty".to_string());
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("USN must be alphanumeric: {trimmed}"));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Usn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Usn> for String {
    fn from(usn: Usn) -> Self {
        usn.0
    }
}
