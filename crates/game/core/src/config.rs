use std::ops::RangeInclusive;

/// Tunable parameters for procedural dungeon generation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationConfig {
    /// Side length of the square in which room corners are picked.
    pub map_dimension: u32,
    /// Number of room stamps.
    pub iterations: u32,
    /// Side length of each square room stamp.
    pub room_size: u32,
    /// Lower bound of the per-room target connection count.
    pub min_connections: u32,
    /// Upper bound of the per-room target connection count.
    pub max_connections: u32,
    /// Blocked margin added around the room bounds after carving.
    pub fill_padding: u32,
}

impl GenerationConfig {
    pub const DEFAULT_MAP_DIMENSION: u32 = 30;
    pub const DEFAULT_ITERATIONS: u32 = 8;
    pub const DEFAULT_ROOM_SIZE: u32 = 5;
    pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 3;
    pub const DEFAULT_FILL_PADDING: u32 = 10;

    pub const MAP_DIMENSION_RANGE: RangeInclusive<u32> = 10..=50;
    pub const ITERATIONS_RANGE: RangeInclusive<u32> = 0..=15;
    pub const ROOM_SIZE_RANGE: RangeInclusive<u32> = 1..=10;
    pub const CONNECTIONS_RANGE: RangeInclusive<u32> = 1..=5;
    pub const FILL_PADDING_RANGE: RangeInclusive<u32> = 0..=20;

    pub fn new() -> Self {
        Self {
            map_dimension: Self::DEFAULT_MAP_DIMENSION,
            iterations: Self::DEFAULT_ITERATIONS,
            room_size: Self::DEFAULT_ROOM_SIZE,
            min_connections: Self::DEFAULT_MIN_CONNECTIONS,
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            fill_padding: Self::DEFAULT_FILL_PADDING,
        }
    }

    pub fn with_map_dimension(mut self, map_dimension: u32) -> Self {
        self.map_dimension = map_dimension;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_room_size(mut self, room_size: u32) -> Self {
        self.room_size = room_size;
        self
    }

    pub fn with_connections(mut self, min_connections: u32, max_connections: u32) -> Self {
        self.min_connections = min_connections;
        self.max_connections = max_connections;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("map_dimension", self.map_dimension, Self::MAP_DIMENSION_RANGE)?;
        check_range("iterations", self.iterations, Self::ITERATIONS_RANGE)?;
        check_range("room_size", self.room_size, Self::ROOM_SIZE_RANGE)?;
        check_range("min_connections", self.min_connections, Self::CONNECTIONS_RANGE)?;
        check_range("max_connections", self.max_connections, Self::CONNECTIONS_RANGE)?;
        check_range("fill_padding", self.fill_padding, Self::FILL_PADDING_RANGE)?;
        if self.min_connections > self.max_connections {
            return Err(ConfigError::ConnectionRange {
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Gameplay configuration: map generation plus entity stats.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub generation: GenerationConfig,
    pub player_max_health: i32,
    pub player_attack: u32,
    pub spider_health: i32,
    pub spider_attack: u32,
}

impl GameConfig {
    pub const DEFAULT_PLAYER_MAX_HEALTH: i32 = 20;
    pub const DEFAULT_PLAYER_ATTACK: u32 = 5;
    pub const DEFAULT_SPIDER_HEALTH: i32 = 10;
    pub const DEFAULT_SPIDER_ATTACK: u32 = 2;

    pub fn new() -> Self {
        Self {
            generation: GenerationConfig::new(),
            player_max_health: Self::DEFAULT_PLAYER_MAX_HEALTH,
            player_attack: Self::DEFAULT_PLAYER_ATTACK,
            spider_health: Self::DEFAULT_SPIDER_HEALTH,
            spider_attack: Self::DEFAULT_SPIDER_ATTACK,
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        if self.player_max_health <= 0 {
            return Err(ConfigError::NonPositiveHealth {
                entity: "player",
                health: self.player_max_health,
            });
        }
        if self.spider_health <= 0 {
            return Err(ConfigError::NonPositiveHealth {
                entity: "spider",
                health: self.spider_health,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be within {min}..={max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("min connections ({min}) exceeds max connections ({max})")]
    ConnectionRange { min: u32, max: u32 },

    #[error("{entity} health must be positive (got {health})")]
    NonPositiveHealth { entity: &'static str, health: i32 },
}
