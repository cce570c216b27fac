use super::queries::{
    INSERT_ORGANIZER, SELECT_ORGANIZER, SELECT_ORGANIZER_BY_EMAIL, UPDATE_ORGANIZER,
};
use super::{SqliteRepository, is_unique_violation};
use crate::application::ports::change_feed::StoreCollection;
use crate::application::ports::repositories::OrganizerRepository;
use crate::domain::entities::Organizer;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct OrganizerRow {
    account_id: String,
    org_name: String,
    email: String,
    description: String,
    created_at: i64,
}

impl OrganizerRow {
    fn into_domain(self) -> Organizer {
        Organizer {
            account_id: self.account_id,
            org_name: self.org_name,
            email: self.email,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
impl OrganizerRepository for SqliteRepository {
    async fn create_organizer(&self, organizer: &Organizer) -> Result<(), AppError> {
        sqlx::query(INSERT_ORGANIZER)
            .bind(&organizer.account_id)
            .bind(&organizer.org_name)
            .bind(&organizer.email)
            .bind(&organizer.description)
            .bind(organizer.created_at)
            .execute(self.pool.get_pool())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::AlreadyRegistered(format!(
                        "organizer record exists for account {}",
                        organizer.account_id
                    ))
                } else {
                    err.into()
                }
            })?;
        self.notify(StoreCollection::Organizers);
        Ok(())
    }

    async fn get_organizer(&self, account_id: &str) -> Result<Option<Organizer>, AppError> {
        let row = sqlx::query_as::<_, OrganizerRow>(SELECT_ORGANIZER)
            .bind(account_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(row.map(OrganizerRow::into_domain))
    }

    async fn get_organizer_by_email(&self, email: &str) -> Result<Option<Organizer>, AppError> {
        let row = sqlx::query_as::<_, OrganizerRow>(SELECT_ORGANIZER_BY_EMAIL)
            .bind(email)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(row.map(OrganizerRow::into_domain))
    }

    async fn update_organizer(&self, organizer: &Organizer) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_ORGANIZER)
            .bind(&organizer.org_name)
            .bind(&organizer.description)
            .bind(&organizer.account_id)
            .execute(self.pool.get_pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "organizer {}",
                organizer.account_id
            )));
        }
        self.notify(StoreCollection::Organizers);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::memory_repository;
    use super::*;

    fn sample_organizer() -> Organizer {
        Organizer::new(
            "uid-org".to_string(),
            "IEEE".to_string(),
            "ieee@college.edu".to_string(),
            "Student branch".to_string(),
        )
    }

    #[tokio::test]
    async fn create_get_update_organizer() {
        let repo = memory_repository().await;
        repo.create_organizer(&sample_organizer())
            .await
            .expect("created");

        let mut found = repo.get_organizer("uid-org").await.unwrap().unwrap();
        assert_eq!(found.org_name, "IEEE");

        found.description = "IEEE student branch".to_string();
        repo.update_organizer(&found).await.expect("updated");
        let updated = repo
            .get_organizer_by_email("ieee@college.edu")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, "IEEE student branch");
    }

    #[tokio::test]
    async fn duplicate_account_is_rejected() {
        let repo = memory_repository().await;
        repo.create_organizer(&sample_organizer())
            .await
            .expect("created");
        let result = repo.create_organizer(&sample_organizer()).await;
        assert!(matches!(result, Err(AppError::AlreadyRegistered(_))));
    }
}
