mod events;
mod feedback;
mod organizers;
mod profiles;
pub(crate) mod queries;
mod registrations;
mod students;

use crate::application::ports::change_feed::{ChangeFeed, StoreChange, StoreCollection};
use crate::infrastructure::database::connection_pool::ConnectionPool;
use tokio::sync::broadcast;

const CHANGE_FEED_CAPACITY: usize = 64;

/// SQLite adapter for every collection port. One struct implements all the
/// repository traits so a single store handle can be shared as any of them.
pub struct SqliteRepository {
    pool: ConnectionPool,
    changes: broadcast::Sender<StoreChange>,
}

impl SqliteRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { pool, changes }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Best-effort change notification, sent after the write committed.
    /// No receivers is fine.
    fn notify(&self, collection: StoreCollection) {
        let _ = self.changes.send(StoreChange { collection });
    }
}

impl ChangeFeed for SqliteRepository {
    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SqliteRepository;
    use crate::infrastructure::database::connection_pool::ConnectionPool;

    pub async fn memory_repository() -> SqliteRepository {
        let pool = ConnectionPool::from_memory()
            .await
            .expect("failed to create pool");
        pool.migrate().await.expect("failed to run migrations");
        SqliteRepository::new(pool)
    }
}
