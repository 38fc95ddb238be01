//! Grid module - wall/open occupancy map
//!
//! The grid is a rectangular matrix where every cell is either a wall or open.
//! Uses a flat row-major vector for cache locality.
//! Coordinates: `(row, col)` with row 0 at the top and col 0 at the left.
//!
//! Dimensions are always odd and at least 3 so that a one-cell border plus
//! alternating wall/cell columns can hold a maze with single-cell-thick walls.
//!
//! Out-of-bounds queries are closed: [`Grid::is_wall`] answers `true` and
//! [`Grid::is_open`] answers `false`.

use arrayvec::ArrayVec;

use crate::error::{EngineError, Result};
use crate::types::{Direction, MazeSize, Position, MIN_MAZE_DIMENSION};

/// Coerce a requested dimension to an odd value of at least 3.
///
/// Even values are rounded up by one.
///
/// ```
/// use tui_maze_core::grid::coerce_dimension;
///
/// assert_eq!(coerce_dimension(54), 55);
/// assert_eq!(coerce_dimension(35), 35);
/// assert_eq!(coerce_dimension(1), 3);
/// assert_eq!(coerce_dimension(0), 3);
/// ```
pub fn coerce_dimension(n: usize) -> usize {
    let n = n.max(MIN_MAZE_DIMENSION);
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

/// Contents of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Open,
}

impl CellKind {
    /// Text form used by [`Grid::from_rows`] and [`Grid::to_rows`]
    pub fn as_char(&self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Open => '.',
        }
    }
}

/// The maze grid - `height` rows of `width` cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Create a grid filled with walls.
    ///
    /// Both dimensions are coerced with [`coerce_dimension`].
    pub fn filled(width: usize, height: usize) -> Self {
        let width = coerce_dimension(width);
        let height = coerce_dimension(height);
        Self {
            width,
            height,
            cells: vec![CellKind::Wall; width * height],
        }
    }

    /// Parse a grid from text rows (`#` = wall, `.` = open).
    ///
    /// Rows must be non-empty, of equal length, and both dimensions must
    /// already be odd and at least 3.
    ///
    /// ```
    /// use tui_maze_core::Grid;
    /// use tui_maze_types::Position;
    ///
    /// let grid = Grid::from_rows(&["###", "#..", "###"]).unwrap();
    /// assert!(grid.is_open(Position::new(1, 2)));
    /// assert!(grid.is_wall(Position::new(0, 0)));
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);

        if coerce_dimension(width) != width || coerce_dimension(height) != height {
            return Err(EngineError::InvalidGrid(format!(
                "dimensions {}x{} must be odd and at least {}",
                width, height, MIN_MAZE_DIMENSION
            )));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != width {
                return Err(EngineError::InvalidGrid(format!(
                    "row {} has length {}, expected {}",
                    row,
                    line.chars().count(),
                    width
                )));
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Open,
                    other => {
                        return Err(EngineError::InvalidGrid(format!(
                            "unexpected {:?} at ({}, {})",
                            other, row, col
                        )))
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Render the grid back into text rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(CellKind::as_char).collect())
            .collect()
    }

    /// Calculate flat index for a position.
    /// Returns None if out of bounds
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        Some(pos.row * self.width + pos.col)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> MazeSize {
        MazeSize::new(self.width, self.height)
    }

    /// Check if position lies inside the grid
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Get cell at position.
    /// Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<CellKind> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Wall check used for collisions. Out-of-bounds counts as wall.
    pub fn is_wall(&self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) => self.cells[idx] == CellKind::Wall,
            None => true,
        }
    }

    /// Open check. Out-of-bounds is never open.
    pub fn is_open(&self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) => self.cells[idx] == CellKind::Open,
            None => false,
        }
    }

    /// Open a cell.
    ///
    /// Only maze construction writes to a grid: the generator while carving
    /// and level setup while breaching the border at the anchors.
    /// Returns false if out of bounds.
    pub fn carve(&mut self, pos: Position) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = CellKind::Open;
                true
            }
            None => false,
        }
    }

    /// Open cells orthogonally adjacent to `pos`.
    pub fn open_neighbors(&self, pos: Position) -> ArrayVec<Position, 4> {
        let mut out = ArrayVec::new();
        for dir in [Direction::Up, Direction::Right, Direction::Down, Direction::Left] {
            if let Some(next) = pos.step(dir) {
                if self.is_open(next) {
                    out.push(next);
                }
            }
        }
        out
    }

    /// Iterate all open positions in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == CellKind::Open)
            .map(move |(i, _)| Position::new(i / width, i % width))
    }

    /// Number of open cells
    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == CellKind::Open).count()
    }

    /// Get a reference to the internal cells (row-major)
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_grid_coerces_dimensions() {
        let grid = Grid::filled(54, 34);
        assert_eq!(grid.width(), 55);
        assert_eq!(grid.height(), 35);
        assert!(grid.cells().iter().all(|c| *c == CellKind::Wall));
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::filled(5, 3);
        assert_eq!(grid.index(Position::new(0, 0)), Some(0));
        assert_eq!(grid.index(Position::new(0, 4)), Some(4));
        assert_eq!(grid.index(Position::new(1, 0)), Some(5));
        assert_eq!(grid.index(Position::new(2, 4)), Some(14));
        assert_eq!(grid.index(Position::new(3, 0)), None);
        assert_eq!(grid.index(Position::new(0, 5)), None);
    }

    #[test]
    fn test_carve_and_query() {
        let mut grid = Grid::filled(5, 5);
        let p = Position::new(1, 1);
        assert!(grid.is_wall(p));
        assert!(!grid.is_open(p));

        assert!(grid.carve(p));
        assert!(grid.is_open(p));
        assert!(!grid.is_wall(p));

        assert!(!grid.carve(Position::new(9, 9)));
    }

    #[test]
    fn test_out_of_bounds_is_wall_and_not_open() {
        let grid = Grid::from_rows(&["...", "...", "..."]).unwrap();
        for pos in [Position::new(3, 0), Position::new(0, 3), Position::new(100, 100)] {
            assert!(grid.is_wall(pos));
            assert!(!grid.is_open(pos));
        }
    }

    #[test]
    fn test_rows_round_trip() {
        let rows = ["#####", "#...#", "#.#.#", "#...#", "#####"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_rows(), rows);
        assert_eq!(grid.open_count(), 8);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert!(Grid::from_rows::<&str>(&[]).is_err());
        assert!(Grid::from_rows(&["####", "####", "####"]).is_err());
        assert!(Grid::from_rows(&["###", "##", "###"]).is_err());
        assert!(Grid::from_rows(&["###", "#x#", "###"]).is_err());
    }

    #[test]
    fn test_open_neighbors() {
        let grid = Grid::from_rows(&["#.#", "...", "###"]).unwrap();
        let n = grid.open_neighbors(Position::new(1, 1));
        assert_eq!(n.as_slice(), &[Position::new(0, 1), Position::new(1, 2), Position::new(1, 0)]);
        assert!(grid.open_neighbors(Position::new(2, 0)).iter().all(|p| grid.is_open(*p)));
    }
}
