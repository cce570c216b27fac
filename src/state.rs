use crate::application::services::{
    DashboardService, EventDirectory, FeedbackService, IdentityService, RegistrationService,
    RepairService, RosterService,
};
use crate::infrastructure::auth::SessionAuthGateway;
use crate::infrastructure::database::{ConnectionPool, SqliteRepository};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Composition root: wires config, store, auth session, and services. The
/// UI shell holds one of these and calls into the services; nothing reads
/// a process-wide global.
pub struct AppState {
    pub config: AppConfig,
    pub auth: Arc<SessionAuthGateway>,
    pub identity: Arc<IdentityService>,
    pub directory: Arc<EventDirectory>,
    pub registrations: Arc<RegistrationService>,
    pub roster: Arc<RosterService>,
    pub feedback: Arc<FeedbackService>,
    pub dashboards: Arc<DashboardService>,
    pub repair: Arc<RepairService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Configuration)?;
        let pool = ConnectionPool::with_max_connections(
            &config.database.url,
            config.database.max_connections,
        )
        .await?;
        pool.migrate().await?;
        Ok(Self::assemble(config, pool))
    }

    /// Wires services over an already-migrated pool. Used by tests with an
    /// in-memory database.
    pub fn assemble(config: AppConfig, pool: ConnectionPool) -> Self {
        let store = Arc::new(SqliteRepository::new(pool));
        let auth = Arc::new(SessionAuthGateway::new());

        let identity = Arc::new(IdentityService::new(
            auth.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ));
        let directory = Arc::new(EventDirectory::new(
            store.clone(),
            store.clone(),
            identity.clone(),
            config.retry.clone(),
        ));
        let registrations = Arc::new(RegistrationService::new(
            store.clone(),
            store.clone(),
            identity.clone(),
        ));
        let roster = Arc::new(RosterService::new(
            store.clone(),
            store.clone(),
            identity.clone(),
            store.clone(),
        ));
        let feedback = Arc::new(FeedbackService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            identity.clone(),
        ));
        let dashboards = Arc::new(DashboardService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            identity.clone(),
            store.clone(),
        ));
        let repair = Arc::new(RepairService::new(store.clone(), store));

        Self {
            config,
            auth,
            identity,
            directory,
            registrations,
            roster,
            feedback,
            dashboards,
            repair,
        }
    }

    /// Starts the periodic repair loop when enabled. The handle aborts the
    /// loop on drop by the caller.
    pub fn spawn_repair(&self) -> Option<JoinHandle<()>> {
        self.config
            .repair
            .auto_repair
            .then(|| self.repair.clone().spawn(&self.config.repair))
    }
}
