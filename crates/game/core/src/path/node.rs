use std::cmp::Ordering;

use crate::state::Position;

/// Search bookkeeping for one coordinate within a single pathfinding call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathNode {
    pub position: Position,
    pub cost_from_start: u32,
    pub estimate_to_goal: u32,
    pub came_from: Option<Position>,
}

impl PathNode {
    pub fn total_cost(&self) -> u32 {
        self.cost_from_start.saturating_add(self.estimate_to_goal)
    }
}

/// Heap entry ordered so that [`std::collections::BinaryHeap`] pops the
/// lowest total cost first.
///
/// Entries are never updated in place; a relaxed node is pushed again and the
/// stale copy is skipped when popped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct OpenEntry {
    pub total_cost: u32,
    pub cost_from_start: u32,
    pub position: Position,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .total_cost
            .cmp(&self.total_cost)
            .then_with(|| self.cost_from_start.cmp(&other.cost_from_start))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
