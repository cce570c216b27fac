use crate::application::ports::auth_gateway::AuthGateway;
use crate::domain::entities::Account;
use crate::shared::error::AppError;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process session holder. The UI shell stores the account here after
/// the hosted provider authenticates it, and clears it on sign-out; the
/// services only ever read it through the `AuthGateway` port.
#[derive(Default)]
pub struct SessionAuthGateway {
    session: RwLock<Option<Account>>,
}

impl SessionAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, account: Account) {
        *self.session.write().await = Some(account);
    }

    pub async fn sign_out(&self) {
        *self.session.write().await = None;
    }
}

#[async_trait]
impl AuthGateway for SessionAuthGateway {
    async fn current_account(&self) -> Result<Option<Account>, AppError> {
        Ok(self.session.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_round_trip() {
        let gateway = SessionAuthGateway::new();
        assert!(gateway.current_account().await.unwrap().is_none());

        gateway
            .sign_in(Account {
                id: "uid-1".to_string(),
                email: "asha@college.edu".to_string(),
                display_name: None,
            })
            .await;
        assert_eq!(
            gateway.current_account().await.unwrap().unwrap().id,
            "uid-1"
        );

        gateway.sign_out().await;
        assert!(gateway.current_account().await.unwrap().is_none());
    }
}
