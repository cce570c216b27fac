use crate::domain::entities::{Event, Feedback, Organizer, Profile, Registration, Student};
use crate::domain::value_objects::{EventId, OrganizerRef, RegistrationId, Usn};
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Creates the role record for an account. Fails with
    /// `AlreadyRegistered` when a profile for the account exists; the role
    /// is immutable after creation.
    async fn create_profile(&self, profile: &Profile) -> Result<(), AppError>;
    async fn get_profile(&self, account_id: &str) -> Result<Option<Profile>, AppError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create_student(&self, student: &Student) -> Result<(), AppError>;
    async fn get_student(&self, account_id: &str) -> Result<Option<Student>, AppError>;
    async fn get_student_by_usn(&self, usn: &Usn) -> Result<Option<Student>, AppError>;
    /// Fallback lookup for legacy rows with no profile document. Primary
    /// resolution is always the account-id get.
    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>, AppError>;
    async fn update_student(&self, student: &Student) -> Result<(), AppError>;

    /// The student-side reference list: ids of events this student holds a
    /// live registration for. Maintained by the registration workflow.
    async fn registered_event_ids(&self, usn: &Usn) -> Result<Vec<EventId>, AppError>;

    /// Drops reference-list entries whose registration no longer exists.
    /// Returns how many were pruned. Used by the repair pass only.
    async fn prune_orphan_references(&self) -> Result<u32, AppError>;
}

#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    async fn create_organizer(&self, organizer: &Organizer) -> Result<(), AppError>;
    async fn get_organizer(&self, account_id: &str) -> Result<Option<Organizer>, AppError>;
    async fn get_organizer_by_email(&self, email: &str) -> Result<Option<Organizer>, AppError>;
    async fn update_organizer(&self, organizer: &Organizer) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create_event(&self, event: &Event) -> Result<(), AppError>;
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, AppError>;
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;
    async fn list_events_by_organizer(
        &self,
        organizer: &OrganizerRef,
    ) -> Result<Vec<Event>, AppError>;
    /// Updates descriptive fields only; the registration counter is owned
    /// by the registration workflow and is not written here.
    async fn update_event(&self, event: &Event) -> Result<(), AppError>;

    /// Deletes the event's registrations (and their reference-list entries)
    /// and then the event, as one all-or-nothing operation. Returns the
    /// number of registrations removed. On failure nothing is deleted.
    async fn delete_event_cascade(&self, id: &EventId) -> Result<u32, AppError>;

    /// Live count of registration records for the event, bypassing the
    /// denormalized counter. Used by the repair pass and dashboards.
    async fn live_registration_count(&self, id: &EventId) -> Result<u32, AppError>;
    /// Overwrites the stored counter. Repair pass only; no workflow
    /// operation may set the counter directly.
    async fn set_registration_count(&self, id: &EventId, count: u32) -> Result<(), AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn get_registration(
        &self,
        id: &RegistrationId,
    ) -> Result<Option<Registration>, AppError>;
    async fn list_by_event(&self, event_id: &EventId) -> Result<Vec<Registration>, AppError>;

    /// Inserts the registration record, increments the event's counter, and
    /// adds the event to the student's reference list in one store
    /// transaction. Fails with `AlreadyRegistered` on a duplicate composite
    /// key.
    async fn create(&self, registration: &Registration) -> Result<(), AppError>;

    /// Updates snapshot fields only; id, event linkage, and email are never
    /// rewritten.
    async fn update(&self, registration: &Registration) -> Result<(), AppError>;

    /// Deletes the record, decrements the counter, and removes the
    /// reference-list entry in one store transaction. Returns `false` when
    /// the counter was already 0 and had to be floored, so the caller can
    /// log the drift.
    async fn delete(&self, id: &RegistrationId) -> Result<bool, AppError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn get_feedback(
        &self,
        event_id: &EventId,
        usn: &Usn,
    ) -> Result<Option<Feedback>, AppError>;
    /// Fails with `DuplicateFeedback` when the (event, usn) pair already
    /// has a submission.
    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), AppError>;
    async fn list_by_event(&self, event_id: &EventId) -> Result<Vec<Feedback>, AppError>;
}
