use super::{EventId, Usn};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Deterministic composite key of a registration: `{event_id}_{usn}`.
/// Being derivable from the pair lets the duplicate check be a single
/// get-by-id instead of a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegistrationId(String);

impl<'de> Deserialize<'de> for RegistrationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        RegistrationId::parse(&value)
            .ok_or_else(|| de::Error::custom(format!("invalid registration id: {value}")))
    }
}

impl RegistrationId {
    pub fn from_parts(event_id: &EventId, usn: &Usn) -> Self {
        Self(format!("{}_{}", event_id.as_str(), usn.as_str()))
    }

    pub fn parse(value: &str) -> Option<Self> {
        let (event_part, usn_part) = value.split_once('_')?;
        let event_id = EventId::new(event_part.to_string()).ok()?;
        let usn = Usn::new(usn_part).ok()?;
        Some(Self::from_parts(&event_id, &usn))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn event_id(&self) -> EventId {
        // Constructed only via from_parts/parse, so the split cannot fail.
        let (event_part, _) = self.0.split_once('_').expect("composite id");
        EventId::new(event_part.to_string()).expect("valid event id")
    }

    pub fn usn(&self) -> Usn {
        let (_, usn_part) = self.0.split_once('_').expect("composite id");
        Usn::new(usn_part).expect("valid usn")
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RegistrationId> for String {
    fn from(id: RegistrationId) -> Self {
        id.0
    }
}
