//! Least-cost 4-directional path search over a [`MapOracle`].
//!
//! [`Pathfinder`] is a stateless service: every call builds its own open and
//! closed sets and discards them on return. "No path" is an ordinary answer
//! (`None`), never an error.
mod node;

use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

pub use node::PathNode;
use node::OpenEntry;

use crate::env::MapOracle;
use crate::state::{Position, Tile};

/// Per-tile movement costs. Tiles without an entry, and unset cells, cost 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileCosts {
    costs: HashMap<Tile, u32>,
}

impl TileCosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cost of entering `tile`. Costs are positive; zero is raised to 1.
    pub fn with_cost(mut self, tile: Tile, cost: u32) -> Self {
        self.costs.insert(tile, cost.max(1));
        self
    }

    /// Cost of stepping onto a cell holding `tile`.
    pub fn cost_of(&self, tile: Option<Tile>) -> u32 {
        match tile {
            Some(tile) => self.costs.get(&tile).copied().unwrap_or(1),
            None => 1,
        }
    }
}

/// Knobs for a single [`Pathfinder::find_path`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathOptions {
    pub tile_costs: TileCosts,
    /// Lets the search leave recorded terrain, treating every cell as
    /// traversable. Used to dig corridors through space that was never generated.
    pub allow_unset_tiles: bool,
}

impl PathOptions {
    /// Gameplay search: walkable tiles only, unit costs.
    pub fn walkable() -> Self {
        Self::default()
    }

    /// Corridor-digging search: any cell may be crossed.
    pub fn carving() -> Self {
        Self {
            allow_unset_tiles: true,
            ..Self::default()
        }
    }

    pub fn with_tile_costs(mut self, tile_costs: TileCosts) -> Self {
        self.tile_costs = tile_costs;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Pathfinder;

impl Pathfinder {
    pub fn new() -> Self {
        Self
    }

    /// A* from `start` to `end` with a Manhattan heuristic.
    ///
    /// Returns the inclusive coordinate sequence `start..=end`, so a
    /// successful result always has at least one element. Unless
    /// `allow_unset_tiles` is set, both endpoints must have a recorded tile
    /// and only walkable cells are expanded.
    pub fn find_path<M>(
        &self,
        map: &M,
        start: Position,
        end: Position,
        options: &PathOptions,
    ) -> Option<Vec<Position>>
    where
        M: MapOracle + ?Sized,
    {
        if !options.allow_unset_tiles && (!map.contains(start) || !map.contains(end)) {
            tracing::warn!(
                target: "game_core::path",
                %start,
                %end,
                "path endpoint lies outside recorded terrain"
            );
            return None;
        }

        let mut open = BinaryHeap::new();
        let mut nodes: HashMap<Position, PathNode> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();

        let start_node = PathNode {
            position: start,
            cost_from_start: 0,
            estimate_to_goal: start.manhattan_distance(end),
            came_from: None,
        };
        open.push(OpenEntry {
            total_cost: start_node.total_cost(),
            cost_from_start: 0,
            position: start,
        });
        nodes.insert(start, start_node);

        while let Some(entry) = open.pop() {
            let current = nodes[&entry.position];
            if closed.contains(&current.position) || entry.cost_from_start > current.cost_from_start {
                continue;
            }

            if current.position == end {
                return Some(reconstruct(&nodes, end));
            }
            closed.insert(current.position);

            for (_, neighbor) in current.position.neighbors() {
                if closed.contains(&neighbor) {
                    continue;
                }

                let tile = map.tile(neighbor);
                if !options.allow_unset_tiles && !tile.is_some_and(Tile::is_pathable) {
                    continue;
                }

                let tentative = current
                    .cost_from_start
                    .saturating_add(options.tile_costs.cost_of(tile));

                let node = match nodes.entry(neighbor) {
                    Entry::Vacant(slot) => *slot.insert(PathNode {
                        position: neighbor,
                        cost_from_start: tentative,
                        estimate_to_goal: neighbor.manhattan_distance(end),
                        came_from: Some(current.position),
                    }),
                    Entry::Occupied(mut slot) => {
                        let known = slot.get_mut();
                        if tentative >= known.cost_from_start {
                            continue;
                        }
                        known.cost_from_start = tentative;
                        known.came_from = Some(current.position);
                        *known
                    }
                };

                open.push(OpenEntry {
                    total_cost: node.total_cost(),
                    cost_from_start: node.cost_from_start,
                    position: neighbor,
                });
            }
        }

        None
    }
}

fn reconstruct(nodes: &HashMap<Position, PathNode>, end: Position) -> Vec<Position> {
    let mut path = vec![end];
    let mut cursor = nodes.get(&end).and_then(|node| node.came_from);
    while let Some(position) = cursor {
        path.push(position);
        cursor = nodes.get(&position).and_then(|node| node.came_from);
    }
    path.reverse();
    path
}
