//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`PlayerProvider`] implementations so the simulation
//! can run with human input, scripted fixtures, or automated policies.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::Result;
use super::snapshot::GameSnapshot;
use crate::coordinator::PlayerAction;

/// Trait for choosing the player's action from the current snapshot.
#[async_trait]
pub trait PlayerProvider: Send + Sync {
    async fn provide_action(&self, snapshot: &GameSnapshot) -> Result<PlayerAction>;
}

/// Never moves; swings at whatever it is facing.
pub struct HoldPositionProvider;

#[async_trait]
impl PlayerProvider for HoldPositionProvider {
    async fn provide_action(&self, _snapshot: &GameSnapshot) -> Result<PlayerAction> {
        Ok(PlayerAction::Attack)
    }
}

/// Replays a fixed list of actions, then holds position.
#[derive(Default)]
pub struct ScriptedPlayerProvider {
    actions: Mutex<VecDeque<PlayerAction>>,
}

impl ScriptedPlayerProvider {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: Mutex::new(actions.into_iter().collect()),
        }
    }
}

#[async_trait]
impl PlayerProvider for ScriptedPlayerProvider {
    async fn provide_action(&self, _snapshot: &GameSnapshot) -> Result<PlayerAction> {
        let next = self
            .actions
            .lock()
            .ok()
            .and_then(|mut actions| actions.pop_front());
        Ok(next.unwrap_or(PlayerAction::Attack))
    }
}
