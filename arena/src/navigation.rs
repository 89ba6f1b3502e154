//! Breadth-first distance field used by the reference arena's pathfinder.

use std::collections::VecDeque;

use redoubt_core::{GridCoord, BOARD_SIZE};

const UNREACHABLE: u16 = u16::MAX;

/// Dense distance grid seeded from a set of goal cells.
///
/// Distances decrease monotonically toward the goals, so a path can be
/// recovered by walking downhill from any cell with a finite distance.
/// Unreachable and blocked cells hold `u16::MAX`.
#[derive(Clone, Debug)]
pub(crate) struct DistanceField {
    distances: Vec<u16>,
}

impl DistanceField {
    /// Builds the field with a reverse breadth-first search from the goals.
    pub(crate) fn seeded_from<F>(goals: &[GridCoord], mut is_blocked: F) -> Self
    where
        F: FnMut(GridCoord) -> bool,
    {
        let cell_count = (BOARD_SIZE * BOARD_SIZE) as usize;
        let mut field = Self {
            distances: vec![UNREACHABLE; cell_count],
        };

        let mut frontier = VecDeque::new();
        for &goal in goals {
            if is_blocked(goal) {
                continue;
            }
            let index = cell_index(goal);
            if field.distances[index] == 0 {
                continue;
            }
            field.distances[index] = 0;
            frontier.push_back(goal);
        }

        while let Some(cell) = frontier.pop_front() {
            let next_distance = field.distances[cell_index(cell)] + 1;

            for neighbor in neighbors(cell) {
                if is_blocked(neighbor) {
                    continue;
                }
                let index = cell_index(neighbor);
                if field.distances[index] <= next_distance {
                    continue;
                }
                field.distances[index] = next_distance;
                frontier.push_back(neighbor);
            }
        }

        field
    }

    /// Distance recorded for the cell, `None` when it cannot reach a goal.
    pub(crate) fn distance(&self, cell: GridCoord) -> Option<u16> {
        let value = self.distances[cell_index(cell)];
        (value != UNREACHABLE).then_some(value)
    }

    /// Walks downhill from `start` to a goal, appending every visited cell.
    ///
    /// Returns `false` and leaves `out` untouched when `start` is cut off.
    pub(crate) fn trace_downhill(&self, start: GridCoord, out: &mut Vec<GridCoord>) -> bool {
        let Some(mut current_distance) = self.distance(start) else {
            return false;
        };

        let mut current = start;
        loop {
            out.push(current);
            if current_distance == 0 {
                return true;
            }

            let mut next = None;
            for neighbor in neighbors(current) {
                let Some(distance) = self.distance(neighbor) else {
                    continue;
                };
                if distance < current_distance {
                    current_distance = distance;
                    next = Some(neighbor);
                    break;
                }
            }

            match next {
                Some(cell) => current = cell,
                // A finite distance always has a strictly closer neighbour.
                None => return true,
            }
        }
    }
}

fn cell_index(cell: GridCoord) -> usize {
    (cell.y() * BOARD_SIZE + cell.x()) as usize
}

/// In-grid orthogonal neighbours in a fixed north, east, south, west order.
fn neighbors(cell: GridCoord) -> impl Iterator<Item = GridCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(y) = cell.y().checked_sub(1) {
        candidates[count] = Some(GridCoord::new(cell.x(), y));
        count += 1;
    }
    if cell.x() + 1 < BOARD_SIZE {
        candidates[count] = Some(GridCoord::new(cell.x() + 1, cell.y()));
        count += 1;
    }
    if cell.y() + 1 < BOARD_SIZE {
        candidates[count] = Some(GridCoord::new(cell.x(), cell.y() + 1));
        count += 1;
    }
    if let Some(x) = cell.x().checked_sub(1) {
        candidates[count] = Some(GridCoord::new(x, cell.y()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

#[cfg(test)]
mod tests {
    use super::DistanceField;
    use redoubt_core::GridCoord;

    #[test]
    fn goals_seed_zero_and_distances_grow_outward() {
        let goal = GridCoord::new(5, 5);
        let field = DistanceField::seeded_from(&[goal], |_| false);

        assert_eq!(field.distance(goal), Some(0));
        assert_eq!(field.distance(GridCoord::new(5, 4)), Some(1));
        assert_eq!(field.distance(GridCoord::new(7, 5)), Some(2));
    }

    #[test]
    fn blocked_cells_are_routed_around() {
        let goal = GridCoord::new(2, 2);
        let wall = GridCoord::new(2, 1);
        let field = DistanceField::seeded_from(&[goal], |cell| cell == wall);

        assert_eq!(field.distance(wall), None);
        assert_eq!(field.distance(GridCoord::new(2, 0)), Some(4));
    }

    #[test]
    fn trace_downhill_recovers_a_complete_path() {
        let goal = GridCoord::new(4, 2);
        let field = DistanceField::seeded_from(&[goal], |_| false);

        let mut path = Vec::new();
        assert!(field.trace_downhill(GridCoord::new(2, 2), &mut path));
        assert_eq!(path.first(), Some(&GridCoord::new(2, 2)));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn an_enclosed_start_reports_no_path() {
        let goal = GridCoord::new(10, 10);
        let blockers = [
            GridCoord::new(0, 1),
            GridCoord::new(1, 0),
            GridCoord::new(1, 1),
        ];
        let field = DistanceField::seeded_from(&[goal], |cell| blockers.contains(&cell));

        let mut path = Vec::new();
        assert!(!field.trace_downhill(GridCoord::new(0, 0), &mut path));
        assert!(path.is_empty());
    }
}
