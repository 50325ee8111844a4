//! Deterministic dungeon simulation core shared by the runtime and tools.
//!
//! `game-core` owns the grid (tile identity and occupancy), the A* pathfinder
//! that reads it, the procedural map generator that writes it, and the entity
//! capability traits the turn logic drives. Nothing here is async or global:
//! every service is an owned value handed to whoever needs it, and all
//! randomness comes in through a caller-supplied [`rand::Rng`].
pub mod config;
pub mod entity;
pub mod env;
pub mod grid;
pub mod mapgen;
pub mod path;
pub mod state;

pub use config::{ConfigError, GameConfig, GenerationConfig};
pub use entity::{
    DamageOutcome, Damageable, Enemy, EnemyKind, EntityTable, GridOccupant, Player, Spider,
};
pub use env::MapOracle;
pub use grid::{CellRecord, GridExtent, GridStore, WriteMode};
pub use mapgen::{GenerationReport, MapBounds, MapGenerator};
pub use path::{PathNode, PathOptions, Pathfinder, TileCosts};
pub use state::{CardinalDirection, EntityId, Position, Tile};
