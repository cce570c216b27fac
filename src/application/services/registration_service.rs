use crate::application::ports::repositories::{EventRepository, RegistrationRepository};
use crate::application::services::identity_service::IdentityService;
use crate::domain::entities::{Event, Registration, RegistrationPatch, RegistrationSnapshot};
use crate::domain::value_objects::{EventId, RegistrationId};
use crate::shared::error::AppError;
use crate::shared::validation;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

/// The registration workflow: keeps the registration record, the event's
/// registration counter, and the student's reference list consistent.
///
/// Every operation runs its checks before any write, and the multi-record
/// effect itself is a single store transaction in the repository. A crash
/// can therefore never leave a phantom counter increment; at worst the
/// repair pass recounts an event.
pub struct RegistrationService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    identity: Arc<IdentityService>,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        identity: Arc<IdentityService>,
    ) -> Self {
        Self {
            events,
            registrations,
            identity,
        }
    }

    /// Registers the signed-in student for an event.
    ///
    /// Checks, in order: student role, event exists, event still upcoming,
    /// capacity, duplicate composite key. Only then is the triple write
    /// (record, counter, reference list) issued.
    pub async fn register(
        &self,
        event_id: &EventId,
        snapshot: RegistrationSnapshot,
        now: DateTime<Utc>,
    ) -> Result<RegistrationId, AppError> {
        let student = self.identity.require_student().await?;

        validation::require_non_empty("name", &snapshot.name)?;
        validation::validate_email(&snapshot.email)?;
        validation::validate_semester(snapshot.semester)?;
        if let Some(contact_no) = snapshot.contact_no.as_deref() {
            validation::validate_contact_no(contact_no)?;
        }
        // The snapshot email anchors edit authorization and the USN keys
        // the reference list; both must match the caller's profile.
        if !snapshot.email.eq_ignore_ascii_case(&student.email) {
            return Err(AppError::Validation(
                "registration email must match your account email".to_string(),
            ));
        }
        if snapshot.usn != student.usn {
            return Err(AppError::Validation(
                "registration USN must match your student profile".to_string(),
            ));
        }

        let event = self.lookup_event(event_id).await?;
        if !event.is_upcoming(now) {
            return Err(AppError::RegistrationClosed(format!(
                "event {} has already taken place",
                event.name
            )));
        }
        if !event.has_room() {
            return Err(AppError::EventFull(format!(
                "event {} has reached its capacity",
                event.name
            )));
        }

        // Duplicate check is a get on the deterministic composite key, not
        // a query.
        let registration_id = RegistrationId::from_parts(event_id, &snapshot.usn);
        if self
            .registrations
            .get_registration(&registration_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyRegistered(format!(
                "{} is already registered for {}",
                snapshot.usn, event.name
            )));
        }

        let registration = Registration::new(event_id.clone(), snapshot);
        self.registrations.create(&registration).await?;
        debug!(registration_id = %registration.id, "registration created");
        Ok(registration.id)
    }

    /// Corrects a registration's snapshot fields. Only the original author
    /// may edit; the email itself is immutable after creation.
    pub async fn edit_registration(
        &self,
        id: &RegistrationId,
        patch: RegistrationPatch,
    ) -> Result<Registration, AppError> {
        let student = self.identity.require_student().await?;
        let mut registration = self.lookup_registration(id).await?;
        if !registration.email.eq_ignore_ascii_case(&student.email) {
            return Err(AppError::Forbidden(
                "only the original registrant may edit this registration".to_string(),
            ));
        }

        if let Some(name) = patch.name.as_deref() {
            validation::require_non_empty("name", name)?;
        }
        if let Some(semester) = patch.semester {
            validation::validate_semester(semester)?;
        }
        if let Some(contact_no) = patch.contact_no.as_deref() {
            validation::validate_contact_no(contact_no)?;
        }

        registration.apply_patch(patch);
        self.registrations.update(&registration).await?;
        Ok(registration)
    }

    /// Cancels the student's own registration. Blocked once the event has
    /// taken place so feedback eligibility stays meaningful.
    pub async fn cancel(&self, id: &RegistrationId, now: DateTime<Utc>) -> Result<(), AppError> {
        let student = self.identity.require_student().await?;
        let registration = self.lookup_registration(id).await?;
        if !registration.email.eq_ignore_ascii_case(&student.email) {
            return Err(AppError::Forbidden(
                "only the original registrant may cancel this registration".to_string(),
            ));
        }

        let event = self.lookup_event(&registration.event_id).await?;
        if !event.is_upcoming(now) {
            return Err(AppError::RegistrationClosed(format!(
                "cannot cancel after event {} has taken place",
                event.name
            )));
        }

        self.remove(&registration).await
    }

    /// Administrative removal by the event's owning organizer, regardless
    /// of event timing. Used by the roster manager.
    pub async fn organizer_remove(&self, id: &RegistrationId) -> Result<(), AppError> {
        let organizer = self.identity.require_organizer().await?;
        let registration = self.lookup_registration(id).await?;
        let event = self.lookup_event(&registration.event_id).await?;
        if event.organizer.id() != organizer.account_id {
            return Err(AppError::Forbidden(
                "only the owning organizer may remove registrations".to_string(),
            ));
        }

        self.remove(&registration).await
    }

    async fn remove(&self, registration: &Registration) -> Result<(), AppError> {
        let counter_decremented = self.registrations.delete(&registration.id).await?;
        if !counter_decremented {
            // The floor itself already kept the counter at 0; the log is
            // the signal that earlier drift exists for the repair pass.
            warn!(
                registration_id = %registration.id,
                event_id = %registration.event_id,
                "registration counter was already 0 on delete; counter drift detected"
            );
        }
        debug!(registration_id = %registration.id, "registration removed");
        Ok(())
    }

    async fn lookup_event(&self, id: &EventId) -> Result<Event, AppError> {
        self.events
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event {id}")))
    }

    async fn lookup_registration(&self, id: &RegistrationId) -> Result<Registration, AppError> {
        self.registrations
            .get_registration(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("registration {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::identity_service::test_support::*;
    use crate::domain::entities::{EventCategory, Profile, Role};
    use crate::domain::value_objects::{OrganizerRef, Usn};
    use chrono::TimeZone;

    fn student_identity() -> Arc<IdentityService> {
        let mut auth = MockAuth::new();
        auth.expect_current_account()
            .returning(|| Ok(Some(student_account())));
        let mut profiles = MockProfiles::new();
        profiles
            .expect_get_profile()
            .returning(|_| Ok(Some(Profile::new(&student_account(), Role::Student))));
        let mut students = MockStudents::new();
        students
            .expect_get_student()
            .returning(|_| Ok(Some(sample_student())));
        Arc::new(IdentityService::new(
            Arc::new(auth),
            Arc::new(profiles),
            Arc::new(students),
            Arc::new(MockOrganizers::new()),
        ))
    }

    fn organizer_identity() -> Arc<IdentityService> {
        let mut auth = MockAuth::new();
        auth.expect_current_account()
            .returning(|| Ok(Some(organizer_account())));
        let mut profiles = MockProfiles::new();
        profiles
            .expect_get_profile()
            .returning(|_| Ok(Some(Profile::new(&organizer_account(), Role::Organizer))));
        let mut organizers = MockOrganizers::new();
        organizers
            .expect_get_organizer()
            .returning(|_| Ok(Some(sample_organizer())));
        Arc::new(IdentityService::new(
            Arc::new(auth),
            Arc::new(profiles),
            Arc::new(MockStudents::new()),
            Arc::new(organizers),
        ))
    }

    fn upcoming_event() -> Event {
        Event::new(
            "Tech Fest 2025".to_string(),
            Utc.with_ymd_and_hms(2025, 4, 5, 0, 0, 0).unwrap(),
            "10:00".to_string(),
            "Main Auditorium".to_string(),
            "Annual fest".to_string(),
            EventCategory::Fest,
            OrganizerRef::new("uid-org".to_string()).unwrap(),
            None,
        )
    }

    fn snapshot() -> RegistrationSnapshot {
        RegistrationSnapshot {
            name: "Asha Rao".to_string(),
            usn: Usn::new("4NI21CS001").unwrap(),
            email: "asha@college.edu".to_string(),
            semester: 4,
            contact_no: Some("9876543210".to_string()),
        }
    }

    fn before_event() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn after_event() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 6, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn register_creates_registration_with_composite_id() {
        let event = upcoming_event();
        let event_id = event.id.clone();
        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(|_| Ok(None));
        let expected_id = RegistrationId::from_parts(&event_id, &snapshot().usn);
        let expected = expected_id.clone();
        registrations
            .expect_create()
            .withf(move |r| r.id == expected && r.semester == 4)
            .times(1)
            .returning(|_| Ok(()));

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            student_identity(),
        );
        let id = service
            .register(&event_id, snapshot(), before_event())
            .await
            .unwrap();
        assert_eq!(id, expected_id);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_pair() {
        let event = upcoming_event();
        let event_id = event.id.clone();
        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrations::new();
        let existing_event_id = event_id.clone();
        registrations.expect_get_registration().returning(move |_| {
            Ok(Some(Registration::new(
                existing_event_id.clone(),
                snapshot(),
            )))
        });
        registrations.expect_create().times(0);

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            student_identity(),
        );
        let result = service.register(&event_id, snapshot(), before_event()).await;
        assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn register_rejects_past_event() {
        let event = upcoming_event();
        let event_id = event.id.clone();
        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let registrations = MockRegistrations::new();

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            student_identity(),
        );
        let result = service.register(&event_id, snapshot(), after_event()).await;
        assert!(matches!(result, Err(AppError::RegistrationClosed(_))));
    }

    #[tokio::test]
    async fn register_rejects_full_event() {
        let mut event = upcoming_event();
        event.capacity = Some(2);
        event.registration_count = 2;
        let event_id = event.id.clone();
        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(MockRegistrations::new()),
            student_identity(),
        );
        let result = service.register(&event_id, snapshot(), before_event()).await;
        assert!(matches!(result, Err(AppError::EventFull(_))));
    }

    #[tokio::test]
    async fn register_rejects_missing_event() {
        let mut events = MockEvents::new();
        events.expect_get_event().returning(|_| Ok(None));
        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(MockRegistrations::new()),
            student_identity(),
        );
        let result = service
            .register(
                &EventId::new("missing".to_string()).unwrap(),
                snapshot(),
                before_event(),
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn register_rejects_organizer_caller() {
        let service = RegistrationService::new(
            Arc::new(MockEvents::new()),
            Arc::new(MockRegistrations::new()),
            organizer_identity(),
        );
        let result = service
            .register(
                &EventId::new("ev1".to_string()).unwrap(),
                snapshot(),
                before_event(),
            )
            .await;
        assert!(matches!(result, Err(AppError::WrongRole(_))));
    }

    #[tokio::test]
    async fn register_rejects_foreign_email_snapshot() {
        let service = RegistrationService::new(
            Arc::new(MockEvents::new()),
            Arc::new(MockRegistrations::new()),
            student_identity(),
        );
        let mut foreign = snapshot();
        foreign.email = "someone.else@college.edu".to_string();
        let result = service
            .register(
                &EventId::new("ev1".to_string()).unwrap(),
                foreign,
                before_event(),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn cancel_blocked_after_event_date() {
        let event = upcoming_event();
        let event_id = event.id.clone();
        let registration = Registration::new(event_id, snapshot());
        let registration_id = registration.id.clone();

        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations.expect_delete().times(0);

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            student_identity(),
        );
        let result = service.cancel(&registration_id, after_event()).await;
        assert!(matches!(result, Err(AppError::RegistrationClosed(_))));
    }

    #[tokio::test]
    async fn cancel_deletes_through_repository() {
        let event = upcoming_event();
        let registration = Registration::new(event.id.clone(), snapshot());
        let registration_id = registration.id.clone();

        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        let expected = registration_id.clone();
        registrations
            .expect_delete()
            .withf(move |id| *id == expected)
            .times(1)
            .returning(|_| Ok(true));

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            student_identity(),
        );
        service.cancel(&registration_id, before_event()).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_rejects_other_students_registration() {
        let event = upcoming_event();
        let mut foreign = snapshot();
        foreign.email = "someone.else@college.edu".to_string();
        foreign.usn = Usn::new("4NI21CS099").unwrap();
        let registration = Registration::new(event.id.clone(), foreign);
        let registration_id = registration.id.clone();

        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations.expect_delete().times(0);

        let service = RegistrationService::new(
            Arc::new(MockEvents::new()),
            Arc::new(registrations),
            student_identity(),
        );
        let result = service.cancel(&registration_id, before_event()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn organizer_remove_works_after_event_date() {
        let event = upcoming_event();
        let registration = Registration::new(event.id.clone(), snapshot());
        let registration_id = registration.id.clone();

        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations
            .expect_delete()
            .times(1)
            .returning(|_| Ok(true));

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            organizer_identity(),
        );
        service.organizer_remove(&registration_id).await.unwrap();
    }

    #[tokio::test]
    async fn organizer_remove_rejects_non_owner() {
        let mut event = upcoming_event();
        event.organizer = OrganizerRef::new("someone-else".to_string()).unwrap();
        let registration = Registration::new(event.id.clone(), snapshot());
        let registration_id = registration.id.clone();

        let mut events = MockEvents::new();
        events
            .expect_get_event()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations.expect_delete().times(0);

        let service = RegistrationService::new(
            Arc::new(events),
            Arc::new(registrations),
            organizer_identity(),
        );
        let result = service.organizer_remove(&registration_id).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn edit_rejects_author_mismatch() {
        let event = upcoming_event();
        let mut foreign = snapshot();
        foreign.email = "someone.else@college.edu".to_string();
        let registration = Registration::new(event.id.clone(), foreign);
        let registration_id = registration.id.clone();

        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations.expect_update().times(0);

        let service = RegistrationService::new(
            Arc::new(MockEvents::new()),
            Arc::new(registrations),
            student_identity(),
        );
        let result = service
            .edit_registration(&registration_id, RegistrationPatch::default())
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn edit_updates_snapshot_fields() {
        let event = upcoming_event();
        let registration = Registration::new(event.id.clone(), snapshot());
        let registration_id = registration.id.clone();

        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations
            .expect_update()
            .withf(|r| r.name == "Asha R" && r.semester == 5 && r.email == "asha@college.edu")
            .times(1)
            .returning(|_| Ok(()));

        let service = RegistrationService::new(
            Arc::new(MockEvents::new()),
            Arc::new(registrations),
            student_identity(),
        );
        let updated = service
            .edit_registration(
                &registration_id,
                RegistrationPatch {
                    name: Some("Asha R".to_string()),
                    semester: Some(5),
                    ..RegistrationPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, registration_id);
    }

    #[tokio::test]
    async fn edit_validates_patch_fields() {
        let event = upcoming_event();
        let registration = Registration::new(event.id.clone(), snapshot());
        let registration_id = registration.id.clone();

        let mut registrations = MockRegistrations::new();
        registrations
            .expect_get_registration()
            .returning(move |_| Ok(Some(registration.clone())));
        registrations.expect_update().times(0);

        let service = RegistrationService::new(
            Arc::new(MockEvents::new()),
            Arc::new(registrations),
            student_identity(),
        );
        let result = service
            .edit_registration(
                &registration_id,
                RegistrationPatch {
                    semester: Some(11),
                    ..RegistrationPatch::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
