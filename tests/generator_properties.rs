use tui_maze::core::analysis::inspect;
use tui_maze::core::{MazeGenerator, SimpleRng};
use tui_maze::types::Position;

#[test]
fn generated_mazes_are_perfect() {
    for (w, h) in [(3, 3), (5, 5), (7, 15), (21, 9), (55, 35)] {
        for seed in 0..10 {
            let grid = MazeGenerator::new(w, h).generate(&mut SimpleRng::new(seed));
            let report = inspect(&grid);
            assert!(report.is_perfect(), "{}x{} seed {}: {:?}", w, h, seed, report);
        }
    }
}

#[test]
fn every_lattice_cell_is_carved() {
    let grid = MazeGenerator::new(31, 21).generate(&mut SimpleRng::new(77));
    for row in (1..21).step_by(2) {
        for col in (1..31).step_by(2) {
            assert!(grid.is_open(Position::new(row, col)));
        }
    }
}

#[test]
fn border_is_left_closed() {
    let grid = MazeGenerator::new(15, 11).generate(&mut SimpleRng::new(5));
    for col in 0..15 {
        assert!(grid.is_wall(Position::new(0, col)));
        assert!(grid.is_wall(Position::new(10, col)));
    }
    for row in 0..11 {
        assert!(grid.is_wall(Position::new(row, 0)));
        assert!(grid.is_wall(Position::new(row, 14)));
    }
}

#[test]
fn even_and_tiny_dimensions_are_coerced() {
    let grid = MazeGenerator::new(54, 34).generate(&mut SimpleRng::new(1));
    assert_eq!((grid.width(), grid.height()), (55, 35));

    let grid = MazeGenerator::new(1, 1).generate(&mut SimpleRng::new(1));
    assert_eq!((grid.width(), grid.height()), (3, 3));
    assert_eq!(grid.open_count(), 1);
    assert!(grid.is_open(Position::new(1, 1)));
}

#[test]
fn out_of_bounds_is_wall_and_not_open() {
    let grid = MazeGenerator::new(9, 9).generate(&mut SimpleRng::new(2));
    for pos in [
        Position::new(9, 0),
        Position::new(0, 9),
        Position::new(100, 100),
        Position::new(usize::MAX, 3),
    ] {
        assert!(grid.is_wall(pos));
        assert!(!grid.is_open(pos));
    }
}

#[test]
fn same_seed_same_maze() {
    let a = MazeGenerator::new(25, 25).generate(&mut SimpleRng::new(123));
    let b = MazeGenerator::new(25, 25).generate(&mut SimpleRng::new(123));
    assert_eq!(a.to_rows(), b.to_rows());
}
