use crate::application::ports::change_feed::{ChangeFeed, StoreChange};
use crate::application::ports::repositories::{
    EventRepository, FeedbackRepository, StudentRepository,
};
use crate::application::services::identity_service::IdentityService;
use crate::domain::entities::{Event, FeedbackSummary, Organizer, Student};
use crate::domain::value_objects::OrganizerRef;
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

/// Student profile page data: the registered events split around `now`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDashboard {
    pub student: Student,
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

/// One row of the organizer dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizerEventSummary {
    pub event: Event,
    /// Live count of registration records, not the denormalized counter.
    pub roster_size: u32,
    pub feedback: FeedbackSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrganizerDashboard {
    pub organizer: Organizer,
    pub events: Vec<OrganizerEventSummary>,
}

/// Composes directory, registration, and feedback state into the two
/// summary views. Pure reader: observes the same store the workflow writes
/// and tolerates momentarily stale counters.
pub struct DashboardService {
    events: Arc<dyn EventRepository>,
    students: Arc<dyn StudentRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    identity: Arc<IdentityService>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl DashboardService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        students: Arc<dyn StudentRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        identity: Arc<IdentityService>,
        change_feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            events,
            students,
            feedback,
            identity,
            change_feed,
        }
    }

    /// The signed-in student's registered events, resolved through the
    /// student's own reference list rather than a scan of all
    /// registrations.
    pub async fn student_dashboard(
        &self,
        now: DateTime<Utc>,
    ) -> Result<StudentDashboard, AppError> {
        let student = self.identity.require_student().await?;
        let event_ids = self.students.registered_event_ids(&student.usn).await?;

        let mut upcoming = Vec::new();
        let mut past = Vec::new();
        for event_id in event_ids {
            // A reference whose event has vanished is repair-pass fodder,
            // not a reason to blank the profile page.
            let Some(event) = self.events.get_event(&event_id).await? else {
                warn!(event_id = %event_id, usn = %student.usn, "registered event no longer exists");
                continue;
            };
            if event.is_upcoming(now) {
                upcoming.push(event);
            } else {
                past.push(event);
            }
        }
        upcoming.sort_by_key(|e| e.registration_cutoff());
        past.sort_by_key(|e| std::cmp::Reverse(e.registration_cutoff()));

        Ok(StudentDashboard {
            student,
            upcoming,
            past,
        })
    }

    /// The signed-in organizer's events with live roster sizes and
    /// feedback summaries.
    pub async fn organizer_dashboard(&self) -> Result<OrganizerDashboard, AppError> {
        let organizer = self.identity.require_organizer().await?;
        let organizer_ref = OrganizerRef::new(organizer.account_id.clone())
            .map_err(AppError::Validation)?;
        let events = self.events.list_events_by_organizer(&organizer_ref).await?;

        let mut summaries = Vec::with_capacity(events.len());
        for event in events {
            let roster_size = self.events.live_registration_count(&event.id).await?;
            let ratings: Vec<u8> = self
                .feedback
                .list_by_event(&event.id)
                .await?
                .into_iter()
                .map(|f| f.rating)
                .collect();
            summaries.push(OrganizerEventSummary {
                event,
                roster_size,
                feedback: FeedbackSummary::from_ratings(&ratings),
            });
        }

        Ok(OrganizerDashboard {
            organizer,
            events: summaries,
        })
    }

    pub fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.change_feed.subscribe()
    }
}
