pub mod event;
pub mod feedback;
pub mod organizer;
pub mod profile;
pub mod registration;
pub mod student;

pub use event::{Event, EventCategory};
pub use feedback::{Feedback, FeedbackSummary};
pub use organizer::Organizer;
pub use profile::{Account, Profile, Role};
pub use registration::{Registration, RegistrationPatch, RegistrationSnapshot};
pub use student::Student;
