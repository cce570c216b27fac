use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Reference from an event to its publishing organizer.
///
/// Stored data carries this in two shapes: a plain account-id string, or an
/// object wrapping the id. Both deserialize into this one representation so
/// no consumer has to handle the split.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizerRef {
    id: String,
}

impl OrganizerRef {
    pub fn new(id: String) -> Result<Self, String> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Organizer reference cannot be empty".to_string());
        }
        Ok(Self {
            id: trimmed.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for OrganizerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Serialize for OrganizerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<'de> Deserialize<'de> for OrganizerRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RefVisitor;

        impl<'de> Visitor<'de> for RefVisitor {
            type Value = OrganizerRef;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an organizer id string or an object with an `id` field")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                OrganizerRef::new(value.to_string()).map_err(de::Error::custom)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut id: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "id" {
                        id = Some(map.next_value()?);
                    } else {
                        let _: de::IgnoredAny = map.next_value()?;
                    }
                }
                let id = id.ok_or_else(|| de::Error::missing_field("id"))?;
                OrganizerRef::new(id).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(RefVisitor)
    }
}
