use crate::domain::entities::Account;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Boundary to the hosted auth service: yields the currently signed-in
/// account (stable principal id plus verified email), or `None` when no
/// session is active.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn current_account(&self) -> Result<Option<Account>, AppError>;
}
