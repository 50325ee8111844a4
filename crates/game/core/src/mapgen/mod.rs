//! Procedural dungeon generation.
//!
//! Generation runs in four passes over a [`GridStore`]:
//!
//! 1. **Stamping**: square rooms of floor are written at random corners and
//!    merged with every room they overlap or touch.
//! 2. **Spanning connection**: starting from the first room, the closest
//!    (connected, unconnected) pair by edge-tile distance is joined with a
//!    corridor carved by the [`Pathfinder`] through unset space.
//! 3. **Extra connection**: rooms below their random target connection count
//!    get additional corridors.
//! 4. **Bounding fill**: the padded bounding box of all rooms is filled with
//!    [`Tile::Blocked`] without touching carved floor.
mod room;

use rand::Rng;
use rand::seq::SliceRandom;

use room::{Room, absorb};

use crate::config::{ConfigError, GenerationConfig};
use crate::grid::{GridStore, WriteMode};
use crate::path::{PathOptions, Pathfinder};
use crate::state::{Position, Tile};

/// Inclusive axis-aligned rectangle of grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapBounds {
    pub min: Position,
    pub max: Position,
}

impl MapBounds {
    pub fn point(position: Position) -> Self {
        Self {
            min: position,
            max: position,
        }
    }

    pub fn including(self, position: Position) -> Self {
        Self {
            min: Position::new(self.min.x.min(position.x), self.min.y.min(position.y)),
            max: Position::new(self.max.x.max(position.x), self.max.y.max(position.y)),
        }
    }

    pub fn union(self, other: MapBounds) -> Self {
        self.including(other.min).including(other.max)
    }

    pub fn expanded(self, padding: i32) -> Self {
        Self {
            min: Position::new(self.min.x.saturating_sub(padding), self.min.y.saturating_sub(padding)),
            max: Position::new(self.max.x.saturating_add(padding), self.max.y.saturating_add(padding)),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.min.x..=self.max.x).contains(&position.x)
            && (self.min.y..=self.max.y).contains(&position.y)
    }

    pub fn width(&self) -> u32 {
        self.min.x.abs_diff(self.max.x) + 1
    }

    pub fn height(&self) -> u32 {
        self.min.y.abs_diff(self.max.y) + 1
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| Position::new(x, y)))
    }
}

/// Summary of one [`MapGenerator::generate`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationReport {
    /// Room stamps written.
    pub stamps: u32,
    /// Rooms left after merging.
    pub rooms: usize,
    /// Corridors carved by the spanning pass.
    pub corridors: u32,
    /// Corridors carved by the extra-connection pass.
    pub extra_corridors: u32,
    /// Corridors the pathfinder could not carve.
    pub failed_corridors: u32,
    /// Distinct walkable cells after generation.
    pub walkable_tiles: usize,
    /// Padded rectangle filled with blocked tiles, if any room exists.
    pub bounds: Option<MapBounds>,
}

#[derive(Clone, Debug, Default)]
pub struct MapGenerator {
    config: GenerationConfig,
}

impl MapGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a dungeon into `grid`.
    ///
    /// Existing tiles are overwritten where rooms and corridors land, and
    /// left untouched by the bounding fill.
    pub fn generate<R>(
        &self,
        grid: &mut GridStore,
        pathfinder: &Pathfinder,
        rng: &mut R,
    ) -> GenerationReport
    where
        R: Rng + ?Sized,
    {
        let mut report = GenerationReport::default();
        let mut rooms: Vec<Room> = Vec::new();
        let dimension = clamp_to_i32(self.config.map_dimension);

        for _ in 0..self.config.iterations {
            let corner = Position::new(rng.gen_range(0..=dimension), rng.gen_range(0..=dimension));
            let stamp = self.stamp_room(grid, corner);
            absorb(&mut rooms, stamp);
            report.stamps += 1;
        }
        report.rooms = rooms.len();
        tracing::debug!(
            target: "game_core::mapgen",
            stamps = report.stamps,
            rooms = report.rooms,
            "room stamping finished"
        );

        self.connect_rooms(&rooms, grid, pathfinder, rng, &mut report);
        report.bounds = self.fill_bounds(&rooms, grid);
        report.walkable_tiles = grid.walkable_positions().count();

        tracing::info!(
            target: "game_core::mapgen",
            rooms = report.rooms,
            corridors = report.corridors,
            extra_corridors = report.extra_corridors,
            failed_corridors = report.failed_corridors,
            walkable_tiles = report.walkable_tiles,
            "map generated"
        );
        report
    }

    fn stamp_room(&self, grid: &mut GridStore, corner: Position) -> Room {
        let size = clamp_to_i32(self.config.room_size);
        let tiles = (0..size).flat_map(|i| (0..size).map(move |j| Position::new(corner.x + i, corner.y - j)));
        Room::from_tiles(tiles.inspect(|tile| {
            grid.set_tile(*tile, Tile::Pathable, WriteMode::Overwrite);
        }))
    }

    fn connect_rooms<R>(
        &self,
        rooms: &[Room],
        grid: &mut GridStore,
        pathfinder: &Pathfinder,
        rng: &mut R,
        report: &mut GenerationReport,
    ) where
        R: Rng + ?Sized,
    {
        if rooms.len() <= 1 {
            return;
        }

        let targets: Vec<u32> = rooms
            .iter()
            .map(|_| rng.gen_range(self.config.min_connections..=self.config.max_connections))
            .collect();
        let mut connections = vec![0u32; rooms.len()];
        let mut connected = vec![false; rooms.len()];
        connected[0] = true;
        let mut unconnected = rooms.len() - 1;

        while unconnected > 0 {
            let mut best: Option<(f64, usize, usize, Position, Position)> = None;
            for from in (0..rooms.len()).filter(|index| connected[*index]) {
                for to in (0..rooms.len()).filter(|index| !connected[*index]) {
                    let (Some(start), Some(end)) =
                        (rooms[from].random_edge_tile(rng), rooms[to].random_edge_tile(rng))
                    else {
                        continue;
                    };
                    let distance = start.euclidean_distance(end);
                    if best.is_none_or(|(shortest, ..)| distance < shortest) {
                        best = Some((distance, from, to, start, end));
                    }
                }
            }

            let Some((_, from, to, start, end)) = best else {
                tracing::warn!(
                    target: "game_core::mapgen",
                    unconnected,
                    "no candidate corridor endpoints left"
                );
                break;
            };

            connected[to] = true;
            unconnected -= 1;
            if carve_corridor(grid, pathfinder, start, end) {
                connections[from] += 1;
                connections[to] += 1;
                report.corridors += 1;
            } else {
                report.failed_corridors += 1;
                tracing::warn!(
                    target: "game_core::mapgen",
                    %start,
                    %end,
                    "could not carve corridor between rooms; skipping"
                );
            }
        }

        let needing: Vec<usize> = (0..rooms.len())
            .filter(|index| connections[*index] < targets[*index])
            .collect();

        for room in needing {
            let needed = targets[room].saturating_sub(connections[room]);
            for _ in 0..needed {
                let mut candidates: Vec<usize> = (0..rooms.len())
                    .filter(|other| *other != room && connections[*other] < targets[*other])
                    .collect();
                if candidates.is_empty() {
                    candidates = (0..rooms.len()).filter(|other| *other != room).collect();
                }
                let Some(&target) = candidates.choose(rng) else {
                    break;
                };

                let (Some(start), Some(end)) =
                    (rooms[room].random_edge_tile(rng), rooms[target].random_edge_tile(rng))
                else {
                    continue;
                };
                if carve_corridor(grid, pathfinder, start, end) {
                    connections[room] += 1;
                    connections[target] += 1;
                    report.extra_corridors += 1;
                } else {
                    report.failed_corridors += 1;
                    tracing::warn!(
                        target: "game_core::mapgen",
                        %start,
                        %end,
                        "could not carve extra corridor"
                    );
                }
            }
        }
    }

    fn fill_bounds(&self, rooms: &[Room], grid: &mut GridStore) -> Option<MapBounds> {
        let bounds = rooms
            .iter()
            .filter_map(Room::bounds)
            .reduce(MapBounds::union)?
            .expanded(clamp_to_i32(self.config.fill_padding));

        for position in bounds.positions() {
            grid.set_tile(position, Tile::Blocked, WriteMode::KeepExisting);
        }
        tracing::debug!(
            target: "game_core::mapgen",
            min = %bounds.min,
            max = %bounds.max,
            "filled grid bounds"
        );
        Some(bounds)
    }
}

fn carve_corridor(
    grid: &mut GridStore,
    pathfinder: &Pathfinder,
    start: Position,
    end: Position,
) -> bool {
    match pathfinder.find_path(&*grid, start, end, &PathOptions::carving()) {
        Some(path) => {
            for position in path {
                grid.set_tile(position, Tile::Pathable, WriteMode::Overwrite);
            }
            true
        }
        None => false,
    }
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
