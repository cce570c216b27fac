use super::queries::{INSERT_FEEDBACK, SELECT_FEEDBACK, SELECT_FEEDBACK_BY_EVENT};
use super::{SqliteRepository, is_unique_violation};
use crate::application::ports::change_feed::StoreCollection;
use crate::application::ports::repositories::FeedbackRepository;
use crate::domain::entities::Feedback;
use crate::domain::value_objects::{EventId, Usn};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct FeedbackRow {
    event_id: String,
    usn: String,
    author_email: String,
    author_name: String,
    rating: i64,
    comment: String,
    submitted_at: i64,
}

impl FeedbackRow {
    fn into_domain(self) -> Result<Feedback, AppError> {
        let event_id = EventId::new(self.event_id)
            .map_err(|err| AppError::Serialization(format!("invalid event id: {err}")))?;
        let usn = Usn::new(&self.usn)
            .map_err(|err| AppError::Serialization(format!("invalid USN: {err}")))?;
        let rating = u8::try_from(self.rating)
            .map_err(|_| AppError::Serialization(format!("invalid rating: {}", self.rating)))?;
        Ok(Feedback {
            event_id,
            usn,
            author_email: self.author_email,
            author_name: self.author_name,
            rating,
            comment: self.comment,
            submitted_at: self.submitted_at,
        })
    }
}

#[async_trait]
impl FeedbackRepository for SqliteRepository {
    async fn get_feedback(
        &self,
        event_id: &EventId,
        usn: &Usn,
    ) -> Result<Option<Feedback>, AppError> {
        let row = sqlx::query_as::<_, FeedbackRow>(SELECT_FEEDBACK)
            .bind(event_id.as_str())
            .bind(usn.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(FeedbackRow::into_domain).transpose()
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<(), AppError> {
        sqlx::query(INSERT_FEEDBACK)
            .bind(feedback.event_id.as_str())
            .bind(feedback.usn.as_str())
            .bind(&feedback.author_email)
            .bind(&feedback.author_name)
            .bind(i64::from(feedback.rating))
            .bind(&feedback.comment)
            .bind(feedback.submitted_at)
            .execute(self.pool.get_pool())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::DuplicateFeedback(format!(
                        "feedback exists for {} on event {}",
                        feedback.usn, feedback.event_id
                    ))
                } else {
                    err.into()
                }
            })?;
        self.notify(StoreCollection::Feedback);
        Ok(())
    }

    async fn list_by_event(&self, event_id: &EventId) -> Result<Vec<Feedback>, AppError> {
        let rows = sqlx::query_as::<_, FeedbackRow>(SELECT_FEEDBACK_BY_EVENT)
            .bind(event_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(FeedbackRow::into_domain).collect()
    }
}
