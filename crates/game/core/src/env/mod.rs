//! Read-only views over world data.
//!
//! The pathfinder only needs to ask "what tile is here", so it is written
//! against [`MapOracle`] instead of the concrete [`crate::GridStore`].
mod map;

pub use map::MapOracle;
