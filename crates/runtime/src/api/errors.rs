//! Unified error types surfaced by the runtime API.
//!
//! Expected gameplay outcomes (a blocked move, a missing path, an ignored
//! action) are reported through return values; only orchestration failures
//! end up here.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::ConfigError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("invalid game configuration")]
    InvalidConfig(#[from] ConfigError),

    #[error("{name} buffer size must be at least 1")]
    ZeroBufferSize { name: &'static str },

    #[error("player action provider not set")]
    ProviderNotSet,

    #[error("no walkable tile available to place the player")]
    NoWalkableTile,

    #[error("game is over (final score {final_score})")]
    GameOver { final_score: u32 },
}
