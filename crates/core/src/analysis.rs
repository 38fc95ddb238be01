//! Structural checks over a grid's open cells.

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::types::Position;

/// Connectivity summary of a grid's open cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeReport {
    pub open_cells: usize,
    /// Unordered pairs of orthogonally adjacent open cells.
    pub adjacencies: usize,
    /// Connected components of open cells.
    pub components: usize,
}

impl MazeReport {
    /// A single connected component with exactly `open_cells - 1` adjacencies
    /// is a spanning tree: one simple path between any two open cells.
    pub fn is_perfect(&self) -> bool {
        self.open_cells > 0 && self.components == 1 && self.adjacencies + 1 == self.open_cells
    }
}

pub fn inspect(grid: &Grid) -> MazeReport {
    let mut adjacencies = 0;
    for pos in grid.open_cells() {
        if grid.is_open(Position::new(pos.row, pos.col + 1)) {
            adjacencies += 1;
        }
        if grid.is_open(Position::new(pos.row + 1, pos.col)) {
            adjacencies += 1;
        }
    }

    let mut seen = vec![false; grid.width() * grid.height()];
    let mut components = 0;
    let mut queue = VecDeque::new();
    for start in grid.open_cells() {
        let idx = start.row * grid.width() + start.col;
        if seen[idx] {
            continue;
        }
        components += 1;
        seen[idx] = true;
        queue.push_back(start);
        while let Some(pos) = queue.pop_front() {
            for next in grid.open_neighbors(pos) {
                let nidx = next.row * grid.width() + next.col;
                if !seen[nidx] {
                    seen[nidx] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    MazeReport {
        open_cells: grid.open_count(),
        adjacencies,
        components,
    }
}

/// Shortest open path from `from` to `to`, both ends included.
///
/// Returns `None` when either end is not open or they are disconnected.
pub fn shortest_path(grid: &Grid, from: Position, to: Position) -> Option<Vec<Position>> {
    if !grid.is_open(from) || !grid.is_open(to) {
        return None;
    }

    let width = grid.width();
    let mut parent: Vec<Option<Position>> = vec![None; width * grid.height()];
    let mut queue = VecDeque::from([from]);
    parent[from.row * width + from.col] = Some(from);

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            let mut path = vec![pos];
            let mut cur = pos;
            while cur != from {
                cur = parent[cur.row * width + cur.col]?;
                path.push(cur);
            }
            path.reverse();
            return Some(path);
        }
        for next in grid.open_neighbors(pos) {
            let slot = &mut parent[next.row * width + next.col];
            if slot.is_none() {
                *slot = Some(pos);
                queue.push_back(next);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_is_not_perfect() {
        let grid = Grid::from_rows(&["#####", "#...#", "#.#.#", "#...#", "#####"]).unwrap();
        let report = inspect(&grid);
        assert_eq!(report.open_cells, 8);
        assert_eq!(report.adjacencies, 8);
        assert_eq!(report.components, 1);
        assert!(!report.is_perfect());
    }

    #[test]
    fn test_disconnected_is_not_perfect() {
        let grid = Grid::from_rows(&["#####", "#.#.#", "#####"]).unwrap();
        let report = inspect(&grid);
        assert_eq!(report.components, 2);
        assert!(!report.is_perfect());
    }

    #[test]
    fn test_corridor_is_perfect() {
        let grid = Grid::from_rows(&["#####", "#...#", "#####"]).unwrap();
        assert!(inspect(&grid).is_perfect());
    }

    #[test]
    fn test_shortest_path_follows_corridor() {
        let grid = Grid::from_rows(&["#####", "#...#", "###.#", "#...#", "#####"]).unwrap();
        let path = shortest_path(&grid, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert_eq!(path.first(), Some(&Position::new(1, 1)));
        assert_eq!(path.last(), Some(&Position::new(3, 1)));
        assert_eq!(path.len(), 7);
        assert!(shortest_path(&grid, Position::new(0, 0), Position::new(1, 1)).is_none());
    }
}
