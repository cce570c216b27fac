pub mod event_id;
pub mod organizer_ref;
pub mod registration_id;
pub mod student_key;

pub use event_id::EventId;
pub use organizer_ref::OrganizerRef;
pub use registration_id::RegistrationId;
pub use student_key::Usn;
