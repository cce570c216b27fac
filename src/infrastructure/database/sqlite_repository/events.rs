use super::queries::{
    COUNT_REGISTRATIONS_FOR_EVENT, DELETE_EVENT, DELETE_REGISTRATIONS_BY_EVENT,
    DELETE_STUDENT_EVENTS_BY_EVENT, INSERT_EVENT, SELECT_ALL_EVENTS, SELECT_EVENT,
    SELECT_EVENTS_BY_ORGANIZER, SET_EVENT_REGISTRATION_COUNT, UPDATE_EVENT,
};
use super::SqliteRepository;
use crate::application::ports::change_feed::StoreCollection;
use crate::application::ports::repositories::EventRepository;
use crate::domain::entities::{Event, EventCategory};
use crate::domain::value_objects::{EventId, OrganizerRef};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct EventRow {
    id: String,
    name: String,
    date: i64,
    time: String,
    venue: String,
    description: String,
    category: String,
    organizer_id: String,
    image_name: Option<String>,
    registration_count: i64,
    capacity: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl EventRow {
    fn into_domain(self) -> Result<Event, AppError> {
        let id = EventId::new(self.id)
            .map_err(|err| AppError::Serialization(format!("invalid event id: {err}")))?;
        let organizer = OrganizerRef::new(self.organizer_id)
            .map_err(|err| AppError::Serialization(format!("invalid organizer ref: {err}")))?;
        let date = Utc
            .timestamp_opt(self.date, 0)
            .single()
            .ok_or_else(|| AppError::Serialization("invalid event date".to_string()))?;
        let registration_count = u32::try_from(self.registration_count).map_err(|_| {
            AppError::Serialization(format!(
                "negative registration count: {}",
                self.registration_count
            ))
        })?;
        let capacity = self
            .capacity
            .map(|c| {
                u32::try_from(c)
                    .map_err(|_| AppError::Serialization(format!("invalid capacity: {c}")))
            })
            .transpose()?;

        Ok(Event {
            id,
            name: self.name,
            date,
            time: self.time,
            venue: self.venue,
            description: self.description,
            category: EventCategory::parse(&self.category),
            organizer,
            image_name: self.image_name,
            registration_count,
            capacity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn create_event(&self, event: &Event) -> Result<(), AppError> {
        sqlx::query(INSERT_EVENT)
            .bind(event.id.as_str())
            .bind(&event.name)
            .bind(event.date.timestamp())
            .bind(&event.time)
            .bind(&event.venue)
            .bind(&event.description)
            .bind(event.category.as_str())
            .bind(event.organizer.id())
            .bind(&event.image_name)
            .bind(i64::from(event.registration_count))
            .bind(event.capacity.map(i64::from))
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(self.pool.get_pool())
            .await?;
        self.notify(StoreCollection::Events);
        Ok(())
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRow>(SELECT_EVENT)
            .bind(id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(EventRow::into_domain).transpose()
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(SELECT_ALL_EVENTS)
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(EventRow::into_domain).collect()
    }

    async fn list_events_by_organizer(
        &self,
        organizer: &OrganizerRef,
    ) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(SELECT_EVENTS_BY_ORGANIZER)
            .bind(organizer.id())
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(EventRow::into_domain).collect()
    }

    async fn update_event(&self, event: &Event) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_EVENT)
            .bind(&event.name)
            .bind(event.date.timestamp())
            .bind(&event.time)
            .bind(&event.venue)
            .bind(&event.description)
            .bind(event.category.as_str())
            .bind(&event.image_name)
            .bind(event.capacity.map(i64::from))
            .bind(event.updated_at)
            .bind(event.id.as_str())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("event {}", event.id)));
        }
        self.notify(StoreCollection::Events);
        Ok(())
    }

    async fn delete_event_cascade(&self, id: &EventId) -> Result<u32, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;

        let (registration_count,): (i64,) = sqlx::query_as(COUNT_REGISTRATIONS_FOR_EVENT)
            .bind(id.as_str())
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query(DELETE_STUDENT_EVENTS_BY_EVENT)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_REGISTRATIONS_BY_EVENT)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query(DELETE_EVENT)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the registration deletes back.
            return Err(AppError::NotFound(format!("event {id}")));
        }

        tx.commit().await?;
        self.notify(StoreCollection::Events);
        self.notify(StoreCollection::Registrations);
        Ok(registration_count as u32)
    }

    async fn live_registration_count(&self, id: &EventId) -> Result<u32, AppError> {
        let (count,): (i64,) = sqlx::query_as(COUNT_REGISTRATIONS_FOR_EVENT)
            .bind(id.as_str())
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(count as u32)
    }

    async fn set_registration_count(&self, id: &EventId, count: u32) -> Result<(), AppError> {
        let result = sqlx::query(SET_EVENT_REGISTRATION_COUNT)
            .bind(i64::from(count))
            .bind(Utc::now().timestamp())
            .bind(id.as_str())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("event {id}")));
        }
        self.notify(StoreCollection::Events);
        Ok(())
    }
}
