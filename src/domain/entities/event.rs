use crate::domain::value_objects::{EventId, OrganizerRef};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Workshop,
    Seminar,
    Fest,
    ClubEvent,
    Competition,
    General,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Workshop => "Workshop",
            EventCategory::Seminar => "Seminar",
            EventCategory::Fest => "Fest",
            EventCategory::ClubEvent => "Club Event",
            EventCategory::Competition => "Competition",
            EventCategory::General => "General",
        }
    }

    /// Stored category strings are free text in old data; anything
    /// unrecognized falls back to `General` instead of failing the read.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Workshop" => EventCategory::Workshop,
            "Seminar" => EventCategory::Seminar,
            "Fest" => EventCategory::Fest,
            "Club Event" => EventCategory::ClubEvent,
            "Competition" => EventCategory::Competition,
            _ => EventCategory::General,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organizer-published activity students can register for.
///
/// `registration_count` is the denormalized count of live registrations and
/// is owned by the registration workflow; event edits never touch it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub venue: String,
    pub description: String,
    pub category: EventCategory,
    pub organizer: OrganizerRef,
    pub image_name: Option<String>,
    pub registration_count: u32,
    pub capacity: Option<u32>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Event {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        date: DateTime<Utc>,
        time: String,
        venue: String,
        description: String,
        category: EventCategory,
        organizer: OrganizerRef,
        capacity: Option<u32>,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: EventId::generate(),
            name,
            date,
            time,
            venue,
            description,
            category,
            organizer,
            image_name: None,
            registration_count: 0,
            capacity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Date plus parsed time-of-day. `None` when the time string is
    /// unparsable; listings skip such events rather than crash.
    pub fn effective_instant(&self) -> Option<DateTime<Utc>> {
        let time = parse_time_of_day(&self.time)?;
        Some(
            Utc.from_utc_datetime(&self.date.date_naive().and_time(time)),
        )
    }

    /// Registration cutoff. Falls back to the date at midnight when the
    /// time is unparsable, so a bad time string never reopens a past event.
    pub fn registration_cutoff(&self) -> DateTime<Utc> {
        self.effective_instant().unwrap_or_else(|| {
            Utc.from_utc_datetime(&self.date.date_naive().and_time(NaiveTime::MIN))
        })
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.registration_cutoff() >= now
    }

    pub fn has_room(&self) -> bool {
        match self.capacity {
            Some(capacity) => self.registration_count < capacity,
            None => true,
        }
    }

    pub fn record_registration(&mut self) {
        self.registration_count += 1;
        self.updated_at = Utc::now().timestamp();
    }

    /// Returns false when the counter was already 0 and the decrement had
    /// to be floored, which indicates earlier drift the caller must log.
    pub fn record_cancellation(&mut self) -> bool {
        self.updated_at = Utc::now().timestamp();
        if self.registration_count == 0 {
            return false;
        }
        self.registration_count -= 1;
        true
    }
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event(time: &str) -> Event {
        Event::new(
            "Tech Fest 2025".to_string(),
            Utc.with_ymd_and_hms(2025, 3, 25, 0, 0, 0).unwrap(),
            time.to_string(),
            "Main Auditorium".to_string(),
            "Annual tech fest".to_string(),
            EventCategory::Fest,
            OrganizerRef::new("org-1".to_string()).unwrap(),
            None,
        )
    }

    #[test]
    fn effective_instant_combines_date_and_time() {
        let event = sample_event("18:30");
        let instant = event.effective_instant().unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 3, 25, 18, 30, 0).unwrap());
    }

    #[test]
    fn unparsable_time_yields_no_instant_but_still_closes() {
        let event = sample_event("six pm");
        assert!(event.effective_instant().is_none());
        // Midnight fallback keeps the past date closed.
        let after = Utc.with_ymd_and_hms(2025, 3, 26, 0, 0, 0).unwrap();
        assert!(!event.is_upcoming(after));
    }

    #[test]
    fn counter_floors_at_zero() {
        let mut event = sample_event("18:30");
        assert!(!event.record_cancellation());
        assert_eq!(event.registration_count, 0);
        event.record_registration();
        assert!(event.record_cancellation());
        assert_eq!(event.registration_count, 0);
    }

    #[test]
    fn capacity_gates_room() {
        let mut event = sample_event("18:30");
        event.capacity = Some(1);
        assert!(event.has_room());
        event.record_registration();
        assert!(!event.has_room());
        event.capacity = None;
        assert!(event.has_room());
    }

    #[test]
    fn unknown_category_falls_back_to_general() {
        assert_eq!(EventCategory::parse("Workshop"), EventCategory::Workshop);
        assert_eq!(EventCategory::parse("12"), EventCategory::General);
    }
}
