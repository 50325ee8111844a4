//! Headless dungeon client.
//!
//! The binary is the composition root: it loads [`config::ClientConfig`] from
//! the environment, installs [`logging`], builds the runtime with the
//! [`player::AutoPlayer`] provider, follows events through the
//! [`presenter`], and reports the final score in the shape the external
//! [`leaderboard`] service accepts.

pub mod config;
pub mod leaderboard;
pub mod logging;
pub mod player;
pub mod presenter;

pub use config::ClientConfig;
pub use leaderboard::{HighScore, LeaderboardEntry, LeaderboardResponse, ScoreSubmission};
pub use player::AutoPlayer;
