use crate::domain::value_objects::{EventId, RegistrationId, Usn};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A student's commitment to attend an event.
///
/// The name/USN/email/semester/contact fields are a snapshot of what the
/// student submitted at registration time, not a live join against the
/// student record; rosters stay historically stable even if the profile is
/// edited later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub name: String,
    pub usn: Usn,
    pub email: String,
    pub semester: u8,
    pub contact_no: Option<String>,
    pub created_at: i64,
}

/// Snapshot fields submitted on the registration form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistrationSnapshot {
    pub name: String,
    pub usn: Usn,
    pub email: String,
    pub semester: u8,
    pub contact_no: Option<String>,
}

/// Correction to the mutable snapshot fields. Email is not here: it is the
/// author-identity anchor and immutable post-creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationPatch {
    pub name: Option<String>,
    pub usn: Option<Usn>,
    pub semester: Option<u8>,
    pub contact_no: Option<String>,
}

impl Registration {
    pub fn new(event_id: EventId, snapshot: RegistrationSnapshot) -> Self {
        Self {
            id: RegistrationId::from_parts(&event_id, &snapshot.usn),
            event_id,
            name: snapshot.name,
            usn: snapshot.usn,
            email: snapshot.email,
            semester: snapshot.semester,
            contact_no: snapshot.contact_no,
            created_at: Utc::now().timestamp(),
        }
    }

    /// Applies a correction to the snapshot. The composite id stays fixed
    /// even when the USN snapshot is corrected; the registration's identity
    /// and its event/student linkage never change.
    pub fn apply_patch(&mut self, patch: RegistrationPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(usn) = patch.usn {
            self.usn = usn;
        }
        if let Some(semester) = patch.semester {
            self.semester = semester;
        }
        if let Some(contact_no) = patch.contact_no {
            self.contact_no = Some(contact_no);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> RegistrationSnapshot {
        RegistrationSnapshot {
            name: "Asha Rao".to_string(),
            usn: Usn::new("4NI21CS001").unwrap(),
            email: "asha@college.edu".to_string(),
            semester: 4,
            contact_no: Some("9876543210".to_string()),
        }
    }

    #[test]
    fn id_is_derived_from_event_and_usn() {
        let event_id = EventId::new("ev1".to_string()).unwrap();
        let registration = Registration::new(event_id.clone(), sample_snapshot());
        assert_eq!(registration.id.as_str(), "ev1_4NI21CS001");
        assert_eq!(registration.event_id, event_id);
    }

    #[test]
    fn patch_updates_snapshot_but_not_identity() {
        let event_id = EventId::new("ev1".to_string()).unwrap();
        let mut registration = Registration::new(event_id, sample_snapshot());
        let original_id = registration.id.clone();

        registration.apply_patch(RegistrationPatch {
            name: Some("Asha R".to_string()),
            usn: Some(Usn::new("4NI21CS002").unwrap()),
            semester: Some(5),
            contact_no: None,
        });

        assert_eq!(registration.name, "Asha R");
        assert_eq!(registration.usn.as_str(), "4NI21CS002");
        assert_eq!(registration.semester, 5);
        assert_eq!(registration.id, original_id);
        assert_eq!(registration.contact_no.as_deref(), Some("9876543210"));
    }
}
