//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels
//! and readiness signalling, and exposes a builder-based API for clients to
//! drive the turn cycle.

use std::time::Duration;

use rand::RngCore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use game_core::GameConfig;

use crate::api::{PlayerProvider, Result, RuntimeError, RuntimeHandle};
use crate::coordinator::PlayerActionReport;
use crate::events::EventBus;
use crate::readiness::{ReadinessTracker, Subsystem};
use crate::rounds::{RoundSettings, RoundTracker};
use crate::workers::{Command, SimulationWorker, WorkerSettings};
use crate::world::World;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Seed for map generation and spawning; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Pause before each enemy acts.
    pub enemy_action_delay: Duration,
    /// Pause after the last enemy acts, before the next player phase.
    pub enemy_phase_settle_delay: Duration,
    /// How long startup waits for `optional_subsystems`.
    pub optional_subsystem_timeout: Duration,
    pub optional_subsystems: Vec<Subsystem>,
    pub rounds: RoundSettings,
}

impl RuntimeConfig {
    /// No pacing delays and no wait for optional subsystems.
    pub fn headless() -> Self {
        Self {
            enemy_action_delay: Duration::ZERO,
            enemy_phase_settle_delay: Duration::ZERO,
            optional_subsystem_timeout: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        if self.command_buffer_size == 0 {
            return Err(RuntimeError::ZeroBufferSize { name: "command" });
        }
        if self.event_buffer_size == 0 {
            return Err(RuntimeError::ZeroBufferSize { name: "event" });
        }
        Ok(())
    }

    fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            enemy_action_delay: self.enemy_action_delay,
            enemy_phase_settle_delay: self.enemy_phase_settle_delay,
            optional_subsystem_timeout: self.optional_subsystem_timeout,
            optional_subsystems: self.optional_subsystems.clone(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed: None,
            command_buffer_size: 32,
            event_buffer_size: 100,
            enemy_action_delay: Duration::from_millis(200),
            enemy_phase_settle_delay: Duration::from_millis(300),
            optional_subsystem_timeout: Duration::from_secs(2),
            optional_subsystems: vec![Subsystem::Presentation, Subsystem::Rounds],
            rounds: RoundSettings::default(),
        }
    }
}

/// Main runtime that orchestrates game simulation
///
/// Design: Runtime owns the worker and the player provider.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    player_provider: Option<Box<dyn PlayerProvider>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Plays one turn: asks the provider for an action and submits it.
    pub async fn step(&mut self) -> Result<PlayerActionReport> {
        let provider = self
            .player_provider
            .as_ref()
            .ok_or(RuntimeError::ProviderNotSet)?;

        let snapshot = self.handle.query_snapshot().await?;
        if snapshot.game_over {
            return Err(RuntimeError::GameOver {
                final_score: snapshot.score,
            });
        }

        let action = provider.provide_action(&snapshot).await?;
        self.handle.submit_player_action(action).await
    }

    /// Plays up to `turns` turns and returns how many resolved.
    ///
    /// Stops early without error when the game ends.
    pub async fn run_turns(&mut self, turns: u64) -> Result<u64> {
        let mut played = 0;
        while played < turns {
            match self.step().await {
                Ok(PlayerActionReport::Resolved { .. }) => played += 1,
                Ok(PlayerActionReport::Ignored { phase }) => {
                    tracing::debug!(target: "runtime", %phase, "action ignored; retrying");
                }
                Err(RuntimeError::GameOver { final_score }) => {
                    tracing::info!(target: "runtime", played, final_score, "game over");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(played)
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl PlayerProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    player_provider: Option<Box<dyn PlayerProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            player_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl PlayerProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime
    ///
    /// The core subsystems are signalled ready here; optional ones are
    /// signalled by whoever owns them through [`RuntimeHandle::signal_ready`].
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::rngs::OsRng.next_u64());
        tracing::info!(target: "runtime", seed, "building runtime");

        let world = World::new(self.config.game.clone(), seed)?;
        let rounds = self
            .config
            .rounds
            .enabled
            .then(|| RoundTracker::new(self.config.rounds.clone()));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let readiness = ReadinessTracker::new(event_bus.clone());

        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), readiness.clone());

        for subsystem in Subsystem::CORE {
            readiness.signal(subsystem);
        }
        if rounds.is_some() {
            readiness.signal(Subsystem::Rounds);
        }

        let sim_worker = SimulationWorker::new(
            world,
            rounds,
            self.config.worker_settings(),
            command_rx,
            event_bus,
            readiness,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            player_provider: self.player_provider,
            sim_worker_handle,
        })
    }
}
