use super::queries::{
    DECREMENT_EVENT_REGISTRATIONS, DELETE_REGISTRATION, DELETE_STUDENT_EVENT,
    INCREMENT_EVENT_REGISTRATIONS, INSERT_REGISTRATION, INSERT_STUDENT_EVENT,
    SELECT_EVENT_REGISTRATION_COUNT, SELECT_REGISTRATION, SELECT_REGISTRATIONS_BY_EVENT,
    UPDATE_REGISTRATION,
};
use super::{SqliteRepository, is_unique_violation};
use crate::application::ports::change_feed::StoreCollection;
use crate::application::ports::repositories::RegistrationRepository;
use crate::domain::entities::Registration;
use crate::domain::value_objects::{EventId, RegistrationId, Usn};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct RegistrationRow {
    id: String,
    event_id: String,
    name: String,
    usn: String,
    email: String,
    semester: i64,
    contact_no: Option<String>,
    created_at: i64,
}

impl RegistrationRow {
    fn into_domain(self) -> Result<Registration, AppError> {
        let id = RegistrationId::parse(&self.id).ok_or_else(|| {
            AppError::Serialization(format!("invalid registration id: {}", self.id))
        })?;
        let event_id = EventId::new(self.event_id)
            .map_err(|err| AppError::Serialization(format!("invalid event id: {err}")))?;
        let usn = Usn::new(&self.usn)
            .map_err(|err| AppError::Serialization(format!("invalid USN: {err}")))?;
        let semester = u8::try_from(self.semester)
            .map_err(|_| AppError::Serialization(format!("invalid semester: {}", self.semester)))?;
        Ok(Registration {
            id,
            event_id,
            name: self.name,
            usn,
            email: self.email,
            semester,
            contact_no: self.contact_no,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRepository {
    async fn get_registration(
        &self,
        id: &RegistrationId,
    ) -> Result<Option<Registration>, AppError> {
        let row = sqlx::query_as::<_, RegistrationRow>(SELECT_REGISTRATION)
            .bind(id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(RegistrationRow::into_domain).transpose()
    }

    async fn list_by_event(&self, event_id: &EventId) -> Result<Vec<Registration>, AppError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(SELECT_REGISTRATIONS_BY_EVENT)
            .bind(event_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(RegistrationRow::into_domain).collect()
    }

    async fn create(&self, registration: &Registration) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;

        // Record first, then the counter and the reference list; all three
        // land together or not at all.
        sqlx::query(INSERT_REGISTRATION)
            .bind(registration.id.as_str())
            .bind(registration.event_id.as_str())
            .bind(&registration.name)
            .bind(registration.usn.as_str())
            .bind(&registration.email)
            .bind(i64::from(registration.semester))
            .bind(&registration.contact_no)
            .bind(registration.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::AlreadyRegistered(format!(
                        "registration {} already exists",
                        registration.id
                    ))
                } else {
                    err.into()
                }
            })?;

        let incremented = sqlx::query(INCREMENT_EVENT_REGISTRATIONS)
            .bind(Utc::now().timestamp())
            .bind(registration.event_id.as_str())
            .execute(&mut *tx)
            .await?;
        if incremented.rows_affected() == 0 {
            // Event vanished between the service's check and the write;
            // dropping the transaction discards the inserted record.
            return Err(AppError::NotFound(format!(
                "event {}",
                registration.event_id
            )));
        }

        sqlx::query(INSERT_STUDENT_EVENT)
            .bind(registration.usn.as_str())
            .bind(registration.event_id.as_str())
            .bind(registration.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.notify(StoreCollection::Registrations);
        self.notify(StoreCollection::Events);
        Ok(())
    }

    async fn update(&self, registration: &Registration) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_REGISTRATION)
            .bind(&registration.name)
            .bind(registration.usn.as_str())
            .bind(i64::from(registration.semester))
            .bind(&registration.contact_no)
            .bind(registration.id.as_str())
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "registration {}",
                registration.id
            )));
        }
        self.notify(StoreCollection::Registrations);
        Ok(())
    }

    async fn delete(&self, id: &RegistrationId) -> Result<bool, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;

        let row = sqlx::query_as::<_, RegistrationRow>(SELECT_REGISTRATION)
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(AppError::NotFound(format!("registration {id}")));
        };

        sqlx::query(DELETE_REGISTRATION)
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        // Guarded decrement: a counter already at 0 stays at 0 and is
        // reported to the caller as drift.
        let counter: Option<(i64,)> = sqlx::query_as(SELECT_EVENT_REGISTRATION_COUNT)
            .bind(row.event_id.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        let decremented = match counter {
            Some((count,)) if count > 0 => {
                sqlx::query(DECREMENT_EVENT_REGISTRATIONS)
                    .bind(Utc::now().timestamp())
                    .bind(row.event_id.as_str())
                    .execute(&mut *tx)
                    .await?;
                true
            }
            Some(_) => false,
            // Event already gone; nothing to decrement.
            None => true,
        };

        sqlx::query(DELETE_STUDENT_EVENT)
            .bind(row.usn.as_str())
            .bind(row.event_id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.notify(StoreCollection::Registrations);
        self.notify(StoreCollection::Events);
        Ok(decremented)
    }
}
