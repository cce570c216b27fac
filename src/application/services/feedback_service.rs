use crate::application::ports::repositories::{
    EventRepository, FeedbackRepository, RegistrationRepository,
};
use crate::application::services::identity_service::IdentityService;
use crate::domain::entities::{Event, Feedback, FeedbackSummary};
use crate::domain::value_objects::{EventId, RegistrationId};
use crate::shared::error::AppError;
use crate::shared::validation;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Post-event feedback: collection from registered students, aggregation
/// for organizers.
pub struct FeedbackService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    identity: Arc<IdentityService>,
}

impl FeedbackService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        identity: Arc<IdentityService>,
    ) -> Self {
        Self {
            events,
            registrations,
            feedback,
            identity,
        }
    }

    /// Submits the signed-in student's feedback for an event, once.
    ///
    /// Eligibility: the event's date has passed, the student holds a live
    /// registration for it, and no prior feedback exists for the pair.
    /// Ratings outside 1..=5 are rejected, never clamped.
    pub async fn submit_feedback(
        &self,
        event_id: &EventId,
        rating: i64,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<Feedback, AppError> {
        let student = self.identity.require_student().await?;
        let rating = validation::validate_rating(rating)?;

        let event = self.lookup_event(event_id).await?;
        if event.is_upcoming(now) {
            return Err(AppError::RegistrationClosed(format!(
                "feedback for {} opens after the event has taken place",
                event.name
            )));
        }

        let registration_id = RegistrationId::from_parts(event_id, &student.usn);
        if self
            .registrations
            .get_registration(&registration_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "no registration for {} held by {}",
                event.name, student.usn
            )));
        }

        if self
            .feedback
            .get_feedback(event_id, &student.usn)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateFeedback(format!(
                "{} already submitted feedback for {}",
                student.usn, event.name
            )));
        }

        let feedback = Feedback::new(
            event_id.clone(),
            student.usn.clone(),
            student.email.clone(),
            student.name.clone(),
            rating,
            comment.to_string(),
        );
        self.feedback.insert_feedback(&feedback).await?;
        debug!(event_id = %event_id, usn = %feedback.usn, "feedback submitted");
        Ok(feedback)
    }

    /// All feedback for the organizer's own event.
    pub async fn list_feedback(&self, event_id: &EventId) -> Result<Vec<Feedback>, AppError> {
        let organizer = self.identity.require_organizer().await?;
        let event = self.lookup_event(event_id).await?;
        if event.organizer.id() != organizer.account_id {
            return Err(AppError::Forbidden(
                "only the owning organizer may read event feedback".to_string(),
            ));
        }
        self.feedback.list_by_event(event_id).await
    }

    /// Count and mean rating for an event. The mean is `None` when there is
    /// no feedback.
    pub async fn aggregate_feedback(&self, event_id: &EventId) -> Result<FeedbackSummary, AppError> {
        let ratings: Vec<u8> = self
            .feedback
            .list_by_event(event_id)
            .await?
            .into_iter()
            .map(|f| f.rating)
            .collect();
        Ok(FeedbackSummary::from_ratings(&ratings))
    }

    async fn lookup_event(&self, id: &EventId) -> Result<Event, AppError> {
        self.events
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event {id}")))
    }
}
