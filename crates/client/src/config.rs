//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::{GameConfig, GenerationConfig};
use runtime::{RuntimeConfig, Subsystem};

/// Configuration required to bootstrap a headless client session.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub seed: Option<u64>,
    pub generation: GenerationConfig,
    pub max_turns: u64,
    pub enemy_delay: Duration,
    pub log_dir: Option<PathBuf>,
    pub player_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: None,
            generation: GenerationConfig::default(),
            max_turns: 200,
            enemy_delay: Duration::ZERO,
            log_dir: None,
            player_name: "adventurer".to_owned(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUNGEON_SEED` - RNG seed (default: random)
    /// - `DUNGEON_MAP_DIMENSION` - Room corner range (default: 30)
    /// - `DUNGEON_ITERATIONS` - Rooms stamped (default: 8)
    /// - `DUNGEON_ROOM_SIZE` - Room side length (default: 5)
    /// - `DUNGEON_MAX_TURNS` - Turns before the session stops (default: 200)
    /// - `DUNGEON_ENEMY_DELAY_MS` - Pause before each enemy acts (default: 0)
    /// - `DUNGEON_LOG_DIR` - Also write logs to this directory (default: unset)
    /// - `DUNGEON_PLAYER_NAME` - Name used for score submission (default: adventurer)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).and_then(|value| value.trim().parse::<u64>().ok());
        let mut config = Self::default();

        config.seed = read("DUNGEON_SEED");

        if let Some(dimension) = read("DUNGEON_MAP_DIMENSION") {
            config.generation = config.generation.with_map_dimension(clamp_u32(dimension));
        }
        if let Some(iterations) = read("DUNGEON_ITERATIONS") {
            config.generation = config.generation.with_iterations(clamp_u32(iterations));
        }
        if let Some(room_size) = read("DUNGEON_ROOM_SIZE") {
            config.generation = config.generation.with_room_size(clamp_u32(room_size));
        }
        if let Some(max_turns) = read("DUNGEON_MAX_TURNS") {
            config.max_turns = max_turns;
        }
        if let Some(delay) = read("DUNGEON_ENEMY_DELAY_MS") {
            config.enemy_delay = Duration::from_millis(delay);
        }

        config.log_dir = lookup("DUNGEON_LOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);
        if let Some(name) = lookup("DUNGEON_PLAYER_NAME").filter(|name| !name.trim().is_empty()) {
            config.player_name = name.trim().to_owned();
        }

        config
    }

    /// Runtime configuration for this session.
    ///
    /// The client's event presenter is the only optional subsystem; it
    /// signals itself ready right after the runtime is built.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            game: GameConfig::default().with_generation(self.generation.clone()),
            seed: self.seed,
            enemy_action_delay: self.enemy_delay,
            enemy_phase_settle_delay: self.enemy_delay,
            optional_subsystems: vec![Subsystem::Presentation],
            ..RuntimeConfig::default()
        }
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
