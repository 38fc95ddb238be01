//! Maze generator - randomized depth-first carving ("recursive backtracker")
//!
//! Carving runs over the lattice of odd coordinates, two cells apart, starting
//! at `(1, 1)`. Entering a lattice cell opens it and shuffles the four lattice
//! directions; each direction whose target is still a wall inside
//! `[1, dimension - 2]` gets the wall between the two cells opened and is
//! entered in turn. A cell with no uncarved neighbour backtracks to its parent.
//!
//! The recursion is run on an explicit stack so that large mazes cannot blow
//! the call stack. Each frame keeps its shuffled directions and a cursor, so
//! the traversal order is exactly that of the recursive formulation.
//!
//! The result is a perfect maze: open cells form a spanning tree over the
//! lattice, and the outer border stays closed.

use log::{debug, info};

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{MazeSize, Position};

/// Lattice step as `(d_row, d_col)`, in pre-shuffle order: up, right, down, left.
const LATTICE_STEPS: [(isize, isize); 4] = [(-2, 0), (0, 2), (2, 0), (0, -2)];

/// One pending lattice cell on the carving stack.
struct Frame {
    cell: Position,
    steps: [(isize, isize); 4],
    next: usize,
}

/// Produces perfect mazes of a fixed (coerced) size.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    size: MazeSize,
}

impl MazeGenerator {
    /// Create a generator; dimensions are coerced to odd values of at least 3.
    pub fn new(width: usize, height: usize) -> Self {
        let grid = Grid::filled(width, height);
        Self { size: grid.size() }
    }

    /// The coerced maze size this generator produces.
    pub fn size(&self) -> MazeSize {
        self.size
    }

    /// Generate a fresh maze.
    pub fn generate(&self, rng: &mut SimpleRng) -> Grid {
        info!(
            "generating maze ({}x{})",
            self.size.width, self.size.height
        );

        let mut grid = Grid::filled(self.size.width, self.size.height);
        let start = Position::new(1, 1);
        let mut stack = vec![self.enter(&mut grid, start, rng)];

        while let Some(top) = stack.last_mut() {
            if top.next == top.steps.len() {
                stack.pop();
                continue;
            }

            let (d_row, d_col) = top.steps[top.next];
            top.next += 1;
            let cell = top.cell;

            let Some(neighbor) = self.lattice_neighbor(cell, d_row, d_col) else {
                continue;
            };
            if !grid.is_wall(neighbor) {
                continue;
            }

            let between = Position::new(
                cell.row.wrapping_add_signed(d_row / 2),
                cell.col.wrapping_add_signed(d_col / 2),
            );
            grid.carve(between);
            let frame = self.enter(&mut grid, neighbor, rng);
            stack.push(frame);
        }

        debug_assert!(crate::analysis::inspect(&grid).is_perfect());
        debug!("maze carved with {} open cells", grid.open_count());
        grid
    }

    /// Open a lattice cell and shuffle its carving order.
    fn enter(&self, grid: &mut Grid, cell: Position, rng: &mut SimpleRng) -> Frame {
        grid.carve(cell);
        let mut steps = LATTICE_STEPS;
        rng.shuffle(&mut steps);
        Frame {
            cell,
            steps,
            next: 0,
        }
    }

    /// Lattice neighbour two cells away, if it lies inside `[1, dimension - 2]`.
    fn lattice_neighbor(&self, cell: Position, d_row: isize, d_col: isize) -> Option<Position> {
        let row = cell.row.checked_add_signed(d_row)?;
        let col = cell.col.checked_add_signed(d_col)?;
        let interior = |v: usize, dim: usize| v >= 1 && v + 2 <= dim;
        if interior(row, self.size.height) && interior(col, self.size.width) {
            Some(Position::new(row, col))
        } else {
            None
        }
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        let size = MazeSize::default();
        Self::new(size.width, size.height)
    }
}
