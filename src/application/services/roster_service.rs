use crate::application::ports::change_feed::{ChangeFeed, StoreChange};
use crate::application::ports::repositories::{EventRepository, RegistrationRepository};
use crate::application::services::identity_service::IdentityService;
use crate::domain::entities::{Event, Registration};
use crate::domain::value_objects::EventId;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Organizer-facing views over the registration workflow's output.
pub struct RosterService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    identity: Arc<IdentityService>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl RosterService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        identity: Arc<IdentityService>,
        change_feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self {
            events,
            registrations,
            identity,
            change_feed,
        }
    }

    /// All registrations for the organizer's own event, optionally filtered
    /// by a case-insensitive substring of name, USN, or email.
    pub async fn list_registrations(
        &self,
        event_id: &EventId,
        search_term: Option<&str>,
    ) -> Result<Vec<Registration>, AppError> {
        self.owned_event(event_id).await?;
        let registrations = self.registrations.list_by_event(event_id).await?;
        Ok(filter_registrations(registrations, search_term))
    }

    /// Deletes the organizer's event and all of its registrations.
    ///
    /// The cascade is all-or-nothing: when it cannot complete, the store
    /// leaves the event and every registration in place and the caller gets
    /// `CascadeIncomplete` to retry. A partially deleted roster is never
    /// observable.
    pub async fn delete_event(&self, event_id: &EventId) -> Result<u32, AppError> {
        let event = self.owned_event(event_id).await?;
        let removed = self
            .events
            .delete_event_cascade(event_id)
            .await
            .map_err(|err| match err {
                AppError::StoreUnavailable(msg) => AppError::CascadeIncomplete(format!(
                    "event {} left intact, retry the delete: {msg}",
                    event.name
                )),
                other => other,
            })?;
        info!(event_id = %event_id, removed, "event deleted with cascading registrations");
        Ok(removed)
    }

    /// Live-update stream for roster views; observers re-query on change.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<StoreChange> {
        self.change_feed.subscribe()
    }

    async fn owned_event(&self, event_id: &EventId) -> Result<Event, AppError> {
        let organizer = self.identity.require_organizer().await?;
        let event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event {event_id}")))?;
        if event.organizer.id() != organizer.account_id {
            return Err(AppError::Forbidden(
                "only the owning organizer may manage this event".to_string(),
            ));
        }
        Ok(event)
    }
}

fn filter_registrations(
    registrations: Vec<Registration>,
    search_term: Option<&str>,
) -> Vec<Registration> {
    let Some(term) = search_term.map(str::trim).filter(|t| !t.is_empty()) else {
        return registrations;
    };
    let needle = term.to_lowercase();
    registrations
        .into_iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.usn.as_str().to_lowercase().contains(&needle)
                || r.email.to_lowercase().contains(&needle)
        })
        .collect()
}
