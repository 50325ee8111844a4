//! Runtime orchestration for the turn-based dungeon simulation.
//!
//! This crate wires the `game-core` services into a single-owner simulation
//! worker and exposes it through an async API. Consumers embed [`Runtime`] to
//! drive turns, subscribe to events, and interact with the world through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`coordinator`] is the player/enemy phase state machine
//! - [`world`], [`ai`] and [`rounds`] hold the gameplay rules the worker applies
//! - [`readiness`] gates startup on subsystem signals
//! - `workers` keeps background tasks internal to the crate
pub mod ai;
pub mod api;
pub mod coordinator;
pub mod events;
pub mod readiness;
pub mod rounds;
pub mod runtime;
pub mod world;

mod workers;

pub use ai::EnemyOutcome;
pub use api::{
    EnemyView, GameSnapshot, HoldPositionProvider, PlayerProvider, PlayerView, Result,
    RuntimeError, RuntimeHandle, ScriptedPlayerProvider,
};
pub use coordinator::{ActionEffect, PlayerAction, PlayerActionReport, TurnCoordinator, TurnPhase};
pub use events::{
    CombatEvent, Event, EventBus, LifecycleEvent, MapEvent, RoundEvent, Topic, TurnEvent,
};
pub use readiness::{ReadinessTracker, Subsystem};
pub use rounds::{RoundSettings, RoundTracker};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use world::{StrikeResult, World};
