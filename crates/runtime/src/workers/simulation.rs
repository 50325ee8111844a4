//! Simulation worker that owns the authoritative [`World`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives the turn cycle
//! through [`TurnCoordinator`], and publishes what happened to the
//! [`EventBus`]. The worker is the only task that ever mutates the world, so
//! a whole enemy phase runs to completion before the next command is read.
use std::time::Duration;

use game_core::{EnemyKind, EntityId, Position};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::ai::{self, EnemyOutcome};
use crate::api::{GameSnapshot, Result, RuntimeError};
use crate::coordinator::{PlayerAction, PlayerActionReport, TurnCoordinator};
use crate::events::{CombatEvent, EventBus, LifecycleEvent, MapEvent, RoundEvent, TurnEvent};
use crate::readiness::{ReadinessTracker, Subsystem};
use crate::rounds::{RoundProgress, RoundTracker};
use crate::world::{StrikeResult, World};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Resolve the player's action and the enemy phase that follows it.
    SubmitPlayerAction {
        action: PlayerAction,
        reply: oneshot::Sender<Result<PlayerActionReport>>,
    },
    /// Query the current game state (read-only).
    QuerySnapshot { reply: oneshot::Sender<GameSnapshot> },
    /// Spawn a spider at a specific tile.
    SpawnEnemy {
        position: Position,
        reply: oneshot::Sender<Result<Option<EntityId>>>,
    },
    DespawnEnemy {
        enemy: EntityId,
        reply: oneshot::Sender<Result<bool>>,
    },
}

/// Timing and startup knobs the worker needs from [`crate::RuntimeConfig`].
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub enemy_action_delay: Duration,
    pub enemy_phase_settle_delay: Duration,
    pub optional_subsystem_timeout: Duration,
    pub optional_subsystems: Vec<Subsystem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerStatus {
    Running,
    /// Startup could not place the player.
    Unplayable,
    GameOver { final_score: u32 },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    world: World,
    coordinator: TurnCoordinator,
    rounds: Option<RoundTracker>,
    status: WorkerStatus,
    settings: WorkerSettings,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    readiness: ReadinessTracker,
}

impl SimulationWorker {
    pub fn new(
        world: World,
        rounds: Option<RoundTracker>,
        settings: WorkerSettings,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        readiness: ReadinessTracker,
    ) -> Self {
        Self {
            world,
            coordinator: TurnCoordinator::new(),
            rounds,
            status: WorkerStatus::Running,
            settings,
            command_rx,
            event_bus,
            readiness,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        self.start().await;

        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        debug!(target: "runtime::simulation", "command channel closed; worker exiting");
    }

    /// Waits for subsystems, generates the map, places the player and opens
    /// the first player phase.
    async fn start(&mut self) {
        self.readiness.wait_for(&Subsystem::CORE).await;

        let missing = self
            .readiness
            .wait_for_within(
                &self.settings.optional_subsystems,
                self.settings.optional_subsystem_timeout,
            )
            .await;
        for subsystem in missing {
            warn!(
                target: "runtime::simulation",
                %subsystem,
                "optional subsystem not ready; continuing without it"
            );
            self.event_bus
                .publish(LifecycleEvent::SubsystemMissing { subsystem });
        }

        self.event_bus.publish(MapEvent::GenerationRequested);
        let report = self.world.generate_map();
        info!(
            target: "runtime::simulation",
            rooms = report.rooms,
            walkable_tiles = report.walkable_tiles,
            failed_corridors = report.failed_corridors,
            "map generated"
        );
        self.event_bus.publish(MapEvent::Generated { report });

        match self.world.place_player() {
            Some(position) => {
                info!(target: "runtime::simulation", %position, "player placed");
            }
            None => {
                error!(
                    target: "runtime::simulation",
                    "no free walkable tile for the player; game cannot start"
                );
                self.status = WorkerStatus::Unplayable;
                return;
            }
        }

        if self.rounds.is_some() {
            self.start_round();
        }
        self.begin_player_phase();
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SubmitPlayerAction { action, reply } => {
                let result = self.handle_player_action(action).await;
                if reply.send(result).is_err() {
                    debug!("SubmitPlayerAction reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::SpawnEnemy { position, reply } => {
                let result = self.handle_spawn(position);
                if reply.send(result).is_err() {
                    debug!("SpawnEnemy reply channel closed (caller dropped)");
                }
            }
            Command::DespawnEnemy { enemy, reply } => {
                let result = self.handle_despawn(enemy);
                if reply.send(result).is_err() {
                    debug!("DespawnEnemy reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn ensure_playable(&self) -> Result<()> {
        match self.status {
            WorkerStatus::Running => Ok(()),
            WorkerStatus::Unplayable => Err(RuntimeError::NoWalkableTile),
            WorkerStatus::GameOver { final_score } => Err(RuntimeError::GameOver { final_score }),
        }
    }

    async fn handle_player_action(&mut self, action: PlayerAction) -> Result<PlayerActionReport> {
        self.ensure_playable()?;

        if !self.coordinator.commit_player_action() {
            let phase = self.coordinator.phase();
            debug!(target: "runtime::simulation", %phase, "player action outside player phase ignored");
            return Ok(PlayerActionReport::Ignored { phase });
        }

        let turn = self.coordinator.turn();
        let effect = match action {
            PlayerAction::Move(direction) => self.world.move_player(direction),
            PlayerAction::Attack => {
                let (effect, strike) = self.world.player_attack();
                if let Some(strike) = strike {
                    self.on_strike(strike);
                }
                effect
            }
        };
        debug!(target: "runtime::simulation", turn, ?action, ?effect, "player acted");
        self.event_bus.publish(TurnEvent::PlayerPhaseEnded {
            turn,
            action,
            effect,
        });

        let enemies_acted = self.run_enemy_phase().await;

        if self.status == WorkerStatus::Running {
            self.begin_player_phase();
        }

        Ok(PlayerActionReport::Resolved {
            turn,
            effect,
            enemies_acted,
        })
    }

    /// Lets every enemy registered at phase start act once, in id order.
    async fn run_enemy_phase(&mut self) -> usize {
        let turn = self.coordinator.turn();
        let roster = self.coordinator.start_enemy_phase();
        self.event_bus.publish(TurnEvent::EnemyPhaseStarted {
            turn,
            enemies: roster.len(),
        });

        let mut acted = 0;
        for enemy in roster {
            if self.status != WorkerStatus::Running {
                break;
            }
            if !self.coordinator.is_registered(enemy) {
                debug!(target: "runtime::simulation", %enemy, "enemy left the roster; skipping");
                continue;
            }

            pause(self.settings.enemy_action_delay).await;

            let (outcome, strike) = ai::take_turn(&mut self.world, enemy);
            acted += 1;
            if let Some(strike) = strike {
                self.on_strike(strike);
            }
            if outcome == EnemyOutcome::NoPath {
                warn!(target: "runtime::simulation", %enemy, "enemy has no path to the player");
            }
            self.event_bus
                .publish(TurnEvent::EnemyActed { enemy, outcome });
        }

        pause(self.settings.enemy_phase_settle_delay).await;
        self.coordinator.end_enemy_phase();
        self.event_bus.publish(TurnEvent::EnemyPhaseEnded { turn });
        acted
    }

    fn begin_player_phase(&mut self) {
        if self
            .rounds
            .as_mut()
            .is_some_and(RoundTracker::take_pending_round)
        {
            self.start_round();
        }

        let turn = self.coordinator.start_player_phase();
        self.event_bus
            .publish(TurnEvent::PlayerPhaseStarted { turn });
    }

    fn start_round(&mut self) {
        let Some(rounds) = self.rounds.as_mut() else {
            return;
        };
        let (round, count) = rounds.begin_next_round();
        let attempts = rounds.settings().spawn_attempts;
        info!(target: "runtime::rounds", round, enemies = count, "round started");
        self.event_bus.publish(RoundEvent::RoundStarted {
            round,
            enemies: count,
        });

        let mut spawned = 0;
        for _ in 0..count {
            let Some((enemy, position)) = self.world.spawn_enemy_randomly(attempts) else {
                warn!(
                    target: "runtime::rounds",
                    round,
                    spawned,
                    requested = count,
                    "no free walkable tile for enemy spawn"
                );
                break;
            };
            self.coordinator.register(enemy);
            rounds.track(enemy);
            spawned += 1;
            self.event_bus.publish(RoundEvent::EnemySpawned {
                enemy,
                kind: EnemyKind::Spider,
                position,
            });
        }

        if spawned == 0 {
            warn!(target: "runtime::rounds", round, "round spawned no enemies and cannot be cleared");
        }
    }

    fn on_strike(&mut self, strike: StrikeResult) {
        self.event_bus.publish(CombatEvent::Attacked {
            attacker: strike.attacker,
            target: strike.target,
            damage: strike.damage,
            outcome: strike.outcome,
        });
        if !strike.outcome.is_fatal() {
            return;
        }

        self.event_bus.publish(CombatEvent::EntityDied {
            entity: strike.target,
            position: strike.position,
        });
        if strike.target.is_player() {
            self.on_player_killed();
        } else {
            self.on_enemy_killed(strike.target);
        }
    }

    fn on_enemy_killed(&mut self, enemy: EntityId) {
        self.coordinator.unregister(enemy);
        if let Some(rounds) = self.rounds.as_mut() {
            let score = rounds.record_kill();
            self.event_bus.publish(RoundEvent::ScoreChanged { score });
        }
        self.on_enemy_left_round(enemy);
    }

    fn on_enemy_left_round(&mut self, enemy: EntityId) {
        let Some(rounds) = self.rounds.as_mut() else {
            return;
        };
        if let RoundProgress::Cleared { round } = rounds.enemy_removed(enemy) {
            let heal = rounds.settings().heal_per_round;
            let health = self.world.heal_player(heal);
            info!(target: "runtime::rounds", round, ?health, "round cleared");
            self.event_bus.publish(RoundEvent::RoundEnded { round });
        }
    }

    fn on_player_killed(&mut self) {
        let final_score = self.score();
        let turns = self.coordinator.turn();
        info!(target: "runtime::simulation", final_score, turns, "player died; game over");
        self.status = WorkerStatus::GameOver { final_score };
        self.event_bus
            .publish(LifecycleEvent::GameOver { final_score, turns });
    }

    fn handle_spawn(&mut self, position: Position) -> Result<Option<EntityId>> {
        self.ensure_playable()?;

        let Some(enemy) = self.world.spawn_enemy_at(position) else {
            debug!(target: "runtime::simulation", %position, "spawn refused");
            return Ok(None);
        };
        self.coordinator.register(enemy);
        self.event_bus.publish(RoundEvent::EnemySpawned {
            enemy,
            kind: EnemyKind::Spider,
            position,
        });
        Ok(Some(enemy))
    }

    fn handle_despawn(&mut self, enemy: EntityId) -> Result<bool> {
        self.ensure_playable()?;

        if !self.world.despawn_enemy(enemy) {
            return Ok(false);
        }
        self.coordinator.unregister(enemy);
        self.on_enemy_left_round(enemy);
        Ok(true)
    }

    fn score(&self) -> u32 {
        self.rounds.as_ref().map_or(0, RoundTracker::score)
    }

    fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.coordinator.phase(),
            turn: self.coordinator.turn(),
            player: self.world.player_view(),
            enemies: self.world.enemy_views(),
            score: self.score(),
            round: self.rounds.as_ref().map_or(0, RoundTracker::round),
            game_over: matches!(self.status, WorkerStatus::GameOver { .. }),
        }
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
