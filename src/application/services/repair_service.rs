use crate::application::ports::repositories::{EventRepository, StudentRepository};
use crate::domain::value_objects::EventId;
use crate::shared::config::RepairConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Result of one repair sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub events_checked: u32,
    pub counters_corrected: u32,
    pub references_pruned: u32,
}

/// Idempotent self-healing pass for the denormalized registration state.
///
/// The workflow's transactional writes prevent drift on their own; this
/// pass cleans up after crashed clients and legacy non-transactional data.
/// Corrections are logged, never surfaced to end users.
pub struct RepairService {
    events: Arc<dyn EventRepository>,
    students: Arc<dyn StudentRepository>,
}

impl RepairService {
    pub fn new(events: Arc<dyn EventRepository>, students: Arc<dyn StudentRepository>) -> Self {
        Self { events, students }
    }

    /// Recomputes one event's counter from the live registration records.
    /// Returns the correction applied, if any.
    pub async fn repair_event(&self, event_id: &EventId) -> Result<Option<(u32, u32)>, AppError> {
        let event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event {event_id}")))?;
        let actual = self.events.live_registration_count(event_id).await?;
        if event.registration_count == actual {
            return Ok(None);
        }

        self.events.set_registration_count(event_id, actual).await?;
        warn!(
            event_id = %event_id,
            stored = event.registration_count,
            actual,
            "registration counter drift corrected"
        );
        Ok(Some((event.registration_count, actual)))
    }

    /// Sweeps every event's counter and prunes orphaned reference-list
    /// entries.
    pub async fn run_once(&self) -> Result<RepairReport, AppError> {
        let mut report = RepairReport::default();
        for event in self.events.list_events().await? {
            report.events_checked += 1;
            if self.repair_event(&event.id).await?.is_some() {
                report.counters_corrected += 1;
            }
        }
        report.references_pruned = self.students.prune_orphan_references().await?;
        if report.counters_corrected > 0 || report.references_pruned > 0 {
            info!(?report, "repair pass corrected drift");
        } else {
            debug!(?report, "repair pass found no drift");
        }
        Ok(report)
    }

    /// Runs the sweep on a fixed interval until the handle is aborted.
    pub fn spawn(self: Arc<Self>, config: &RepairConfig) -> JoinHandle<()> {
        let interval = Duration::from_secs(config.interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The immediate first tick doubles as a startup consistency
            // check.
            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once().await {
                    error!("repair pass failed: {err}");
                }
            }
        })
    }
}
