//! Plain data types shared by every subsystem: coordinates, directions,
//! entity identifiers, and tile classes.
mod common;
mod tile;

pub use common::{CardinalDirection, EntityId, Position};
pub use tile::Tile;
