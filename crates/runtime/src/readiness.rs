//! Subsystem readiness signalling.
//!
//! Each subsystem announces itself once through [`ReadinessTracker::signal`].
//! The simulation worker waits on the tracker before generating the map:
//! unconditionally for [`Subsystem::CORE`], and with a bounded timeout for the
//! optional ones.
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::events::{EventBus, LifecycleEvent};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Subsystem {
    Grid,
    Pathfinder,
    MapGenerator,
    Rounds,
    Presentation,
    Audio,
    Persistence,
}

impl Subsystem {
    /// Subsystems the turn cycle cannot start without.
    pub const CORE: [Subsystem; 3] = [Subsystem::Grid, Subsystem::Pathfinder, Subsystem::MapGenerator];

    pub fn is_core(self) -> bool {
        Self::CORE.contains(&self)
    }
}

/// Shared set of subsystems that have signalled readiness.
#[derive(Clone)]
pub struct ReadinessTracker {
    ready: Arc<watch::Sender<BTreeSet<Subsystem>>>,
    event_bus: EventBus,
}

impl ReadinessTracker {
    pub fn new(event_bus: EventBus) -> Self {
        let (ready, _) = watch::channel(BTreeSet::new());
        Self {
            ready: Arc::new(ready),
            event_bus,
        }
    }

    /// Marks `subsystem` ready. Returns `false` if it had already signalled.
    pub fn signal(&self, subsystem: Subsystem) -> bool {
        let first = self.ready.send_if_modified(|ready| ready.insert(subsystem));
        if first {
            tracing::debug!(target: "runtime::readiness", %subsystem, "subsystem ready");
            self.event_bus
                .publish(LifecycleEvent::SubsystemReady { subsystem });
        }
        first
    }

    pub fn is_ready(&self, subsystem: Subsystem) -> bool {
        self.ready.borrow().contains(&subsystem)
    }

    /// Members of `subsystems` that have not signalled yet.
    pub fn missing(&self, subsystems: &[Subsystem]) -> Vec<Subsystem> {
        let ready = self.ready.borrow();
        subsystems
            .iter()
            .copied()
            .filter(|subsystem| !ready.contains(subsystem))
            .collect()
    }

    /// Waits until every member of `subsystems` has signalled.
    pub async fn wait_for(&self, subsystems: &[Subsystem]) {
        let mut rx = self.ready.subscribe();
        // The tracker owns the sender, so the channel stays open while we wait.
        let _ = rx
            .wait_for(|ready| subsystems.iter().all(|subsystem| ready.contains(subsystem)))
            .await;
    }

    /// Waits at most `timeout` for `subsystems` and returns the ones still missing.
    pub async fn wait_for_within(&self, subsystems: &[Subsystem], timeout: Duration) -> Vec<Subsystem> {
        if tokio::time::timeout(timeout, self.wait_for(subsystems))
            .await
            .is_err()
        {
            tracing::debug!(
                target: "runtime::readiness",
                ?timeout,
                "readiness wait timed out"
            );
        }
        self.missing(subsystems)
    }
}
