pub mod dashboard_service;
pub mod event_directory;
pub mod feedback_service;
pub mod identity_service;
pub mod registration_service;
pub mod repair_service;
pub mod roster_service;

pub use dashboard_service::{
    DashboardService, OrganizerDashboard, OrganizerEventSummary, StudentDashboard,
};
pub use event_directory::{
    DirectoryEntry, EventDirectory, EventSearch, EventUpdate, NewEvent, search, UNKNOWN_ORGANIZER,
};
pub use feedback_service::FeedbackService;
pub use identity_service::{IdentityService, Resolution};
pub use registration_service::RegistrationService;
pub use repair_service::{RepairReport, RepairService};
pub use roster_service::RosterService;
