use super::queries::{INSERT_PROFILE, SELECT_PROFILE};
use super::{SqliteRepository, is_unique_violation};
use crate::application::ports::change_feed::StoreCollection;
use crate::application::ports::repositories::ProfileRepository;
use crate::domain::entities::{Profile, Role};
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
struct ProfileRow {
    account_id: String,
    role: String,
    email: String,
    display_name: String,
    created_at: i64,
}

impl ProfileRow {
    fn into_domain(self) -> Result<Profile, AppError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            AppError::Serialization(format!("unknown role in profile row: {}", self.role))
        })?;
        Ok(Profile {
            account_id: self.account_id,
            role,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn create_profile(&self, profile: &Profile) -> Result<(), AppError> {
        sqlx::query(INSERT_PROFILE)
            .bind(&profile.account_id)
            .bind(profile.role.as_str())
            .bind(&profile.email)
            .bind(&profile.display_name)
            .bind(profile.created_at)
            .execute(self.pool.get_pool())
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AppError::AlreadyRegistered(format!(
                        "profile exists for account {}",
                        profile.account_id
                    ))
                } else {
                    err.into()
                }
            })?;
        self.notify(StoreCollection::Profiles);
        Ok(())
    }

    async fn get_profile(&self, account_id: &str) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<_, ProfileRow>(SELECT_PROFILE)
            .bind(account_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        row.map(ProfileRow::into_domain).transpose()
    }
}
