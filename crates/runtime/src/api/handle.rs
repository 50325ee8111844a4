//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting player actions, inspecting the world, or streaming events from
//! specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{EntityId, Position};

use super::errors::{Result, RuntimeError};
use super::snapshot::GameSnapshot;
use crate::coordinator::{PlayerAction, PlayerActionReport};
use crate::events::{Event, EventBus, Topic};
use crate::readiness::{ReadinessTracker, Subsystem};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    readiness: ReadinessTracker,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        readiness: ReadinessTracker,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            readiness,
        }
    }

    /// Submit the player's action for the current player phase.
    ///
    /// Resolves after the enemy phase triggered by the action has finished.
    pub async fn submit_player_action(&self, action: PlayerAction) -> Result<PlayerActionReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SubmitPlayerAction {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_snapshot(&self) -> Result<GameSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QuerySnapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Spawn a spider at `position`. Returns `None` if the tile is not free walkable floor.
    pub async fn spawn_enemy(&self, position: Position) -> Result<Option<EntityId>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SpawnEnemy {
                position,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Remove an enemy without a kill. Returns `false` if it did not exist.
    pub async fn despawn_enemy(&self, enemy: EntityId) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::DespawnEnemy {
                enemy,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Announce that an external subsystem (presentation, audio, ...) is up.
    pub fn signal_ready(&self, subsystem: Subsystem) -> bool {
        self.readiness.signal(subsystem)
    }

    pub fn is_ready(&self, subsystem: Subsystem) -> bool {
        self.readiness.is_ready(subsystem)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Handle attacks and deaths
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }
}
