use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCollection {
    Profiles,
    Students,
    Organizers,
    Events,
    Registrations,
    Feedback,
}

/// Notification that a collection changed. Carries no payload: observers
/// re-query the store, which is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub collection: StoreCollection,
}

/// Live-update boundary for roster and dashboard views. Delivery is
/// best-effort (lagging receivers miss intermediate notifications);
/// workflow correctness never depends on it.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}
