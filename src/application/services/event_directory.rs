use crate::application::ports::repositories::{EventRepository, OrganizerRepository};
use crate::application::services::identity_service::IdentityService;
use crate::domain::entities::{Event, EventCategory};
use crate::domain::value_objects::{EventId, OrganizerRef};
use crate::shared::config::RetryConfig;
use crate::shared::error::AppError;
use crate::shared::retry::retry_read;
use crate::shared::validation;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::warn;

pub const UNKNOWN_ORGANIZER: &str = "Unknown Organizer";

/// An event joined with its resolved organizer display name, as listed to
/// students. Search filters operate on this without further store calls.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub event: Event,
    pub organizer_name: String,
}

/// Client-side search filter. Absent fields constrain nothing; present
/// fields are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct EventSearch {
    pub name_contains: Option<String>,
    pub organizer_contains: Option<String>,
    pub on_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub venue: String,
    pub description: String,
    pub category: EventCategory,
    pub capacity: Option<u32>,
    pub image_name: Option<String>,
}

/// Organizer-editable descriptive fields. The registration counter is not
/// here: only the registration workflow writes it.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub capacity: Option<Option<u32>>,
    pub image_name: Option<Option<String>>,
}

pub struct EventDirectory {
    events: Arc<dyn EventRepository>,
    organizers: Arc<dyn OrganizerRepository>,
    identity: Arc<IdentityService>,
    retry: RetryConfig,
}

impl EventDirectory {
    pub fn new(
        events: Arc<dyn EventRepository>,
        organizers: Arc<dyn OrganizerRepository>,
        identity: Arc<IdentityService>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            events,
            organizers,
            identity,
            retry,
        }
    }

    pub async fn get_event(&self, id: &EventId) -> Result<Event, AppError> {
        retry_read(&self.retry, || self.events.get_event(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event {id}")))
    }

    /// Publishes a new event owned by the signed-in organizer. The
    /// registration counter starts at 0; this is its only direct write
    /// outside the repair pass.
    pub async fn create_event(&self, input: NewEvent) -> Result<Event, AppError> {
        let organizer = self.identity.require_organizer().await?;
        validation::require_non_empty("event name", &input.name)?;
        validation::require_non_empty("venue", &input.venue)?;
        validation::require_non_empty("time", &input.time)?;

        let organizer_ref = OrganizerRef::new(organizer.account_id.clone())
            .map_err(AppError::Validation)?;
        let mut event = Event::new(
            input.name,
            input.date,
            input.time,
            input.venue,
            input.description,
            input.category,
            organizer_ref,
            input.capacity,
        );
        event.image_name = input.image_name;
        if event.effective_instant().is_none() {
            return Err(AppError::Validation(format!(
                "time must be HH:MM, got {:?}",
                event.time
            )));
        }

        self.events.create_event(&event).await?;
        Ok(event)
    }

    /// Applies descriptive edits; only the owning organizer may edit.
    pub async fn update_event(&self, id: &EventId, update: EventUpdate) -> Result<Event, AppError> {
        let organizer = self.identity.require_organizer().await?;
        let mut event = self.get_event(id).await?;
        if event.organizer.id() != organizer.account_id {
            return Err(AppError::Forbidden(
                "only the owning organizer may edit this event".to_string(),
            ));
        }

        if let Some(name) = update.name {
            validation::require_non_empty("event name", &name)?;
            event.name = name;
        }
        if let Some(date) = update.date {
            event.date = date;
        }
        if let Some(time) = update.time {
            validation::require_non_empty("time", &time)?;
            event.time = time;
        }
        if let Some(venue) = update.venue {
            validation::require_non_empty("venue", &venue)?;
            event.venue = venue;
        }
        if let Some(description) = update.description {
            event.description = description;
        }
        if let Some(category) = update.category {
            event.category = category;
        }
        if let Some(capacity) = update.capacity {
            event.capacity = capacity;
        }
        if let Some(image_name) = update.image_name {
            event.image_name = image_name;
        }
        event.updated_at = Utc::now().timestamp();

        self.events.update_event(&event).await?;
        Ok(event)
    }

    pub async fn list_events_by_organizer(
        &self,
        organizer_ref: &OrganizerRef,
    ) -> Result<Vec<Event>, AppError> {
        self.events.list_events_by_organizer(organizer_ref).await
    }

    /// All events whose effective instant is at or after `now`, ascending.
    /// Events with an unparsable date/time are skipped, not failed on.
    pub async fn list_upcoming(&self, now: DateTime<Utc>) -> Result<Vec<DirectoryEntry>, AppError> {
        let events = retry_read(&self.retry, || self.events.list_events()).await?;
        let mut upcoming: Vec<(DateTime<Utc>, Event)> = events
            .into_iter()
            .filter_map(|event| {
                let instant = event.effective_instant()?;
                (instant >= now).then_some((instant, event))
            })
            .collect();
        upcoming.sort_by_key(|(instant, _)| *instant);

        let mut entries = Vec::with_capacity(upcoming.len());
        for (_, event) in upcoming {
            let organizer_name = self.resolve_organizer_name(&event).await?;
            entries.push(DirectoryEntry {
                event,
                organizer_name,
            });
        }
        Ok(entries)
    }

    /// Resolves the publisher's display name. A dangling reference yields
    /// the sentinel instead of failing the whole listing.
    pub async fn resolve_organizer_name(&self, event: &Event) -> Result<String, AppError> {
        let organizer = retry_read(&self.retry, || {
            self.organizers.get_organizer(event.organizer.id())
        })
        .await?;
        match organizer {
            Some(organizer) => Ok(organizer.org_name),
            None => {
                warn!(event_id = %event.id, organizer_id = %event.organizer, "dangling organizer reference");
                Ok(UNKNOWN_ORGANIZER.to_string())
            }
        }
    }
}

/// Pure, case-insensitive filter over an already-fetched listing; makes no
/// store calls. All present filters must match.
pub fn search(entries: Vec<DirectoryEntry>, filter: &EventSearch) -> Vec<DirectoryEntry> {
    let name_needle = filter.name_contains.as_deref().map(str::to_lowercase);
    let organizer_needle = filter.organizer_contains.as_deref().map(str::to_lowercase);

    entries
        .into_iter()
        .filter(|entry| {
            if let Some(needle) = &name_needle {
                if !needle.is_empty() && !entry.event.name.to_lowercase().contains(needle) {
                    return false;
                }
            }
            if let Some(needle) = &organizer_needle {
                if !needle.is_empty() && !entry.organizer_name.to_lowercase().contains(needle) {
                    return false;
                }
            }
            if let Some(day) = filter.on_date {
                if entry.event.date.date_naive() != day {
                    return false;
                }
            }
            true
        })
        .collect()
}
