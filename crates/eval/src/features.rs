//! Raw board features consumed by the evaluator, before any coefficient.

use rabbit_core::{is_tuck_setup, Board, BoardSurface};

const ROWS: usize = Board::HEIGHT;

/// Level once `cleared` more lines are added, for 18/19/29 starts.
pub fn level_after_placement(level: u32, lines: u32, cleared: u8) -> u32 {
    if level >= 29 {
        return 29;
    }
    let total = lines + cleared as u32;
    if total < 130 {
        level.max(18)
    } else if total < 230 {
        19 + (total - 130) / 10
    } else {
        29
    }
}

/// Height above `scare` of the tallest middle column that rises over its left neighbour.
pub fn spire_height(surface: &[u8; 9], scare: f64) -> f64 {
    let spire = (2..8)
        .filter(|&i| surface[i] > surface[i - 1])
        .map(|i| surface[i])
        .max()
        .unwrap_or(0);
    (spire as f64 - scare).max(0.0)
}

/// Mean height of the columns between the left edge and the well.
pub fn average_height(surface: &[u8; 9]) -> f64 {
    let inner = &surface[1..];
    inner.iter().map(|&h| h as f64).sum::<f64>() / inner.len() as f64
}

/// Cells that must be filled in columns 0..=7 before they reach column 8's height.
pub fn cells_below_col_9(surface: &[u8; 9]) -> u32 {
    let target = surface[8];
    surface[..8]
        .iter()
        .filter(|&&h| h < target)
        .map(|&h| (target - h) as u32)
        .sum()
}

/// Hole count with tuck-recoverable holes discounted, plus well holes at endgame.
pub fn adjusted_holes(board: &Board, surface: &BoardSurface, tuck_proportion: f64, count_well: bool) -> f64 {
    let mut holes = surface.holes;
    for &(row, col) in &surface.hole_cells {
        let (row, col) = (row as usize, col as usize);
        let run_start = row > 0 && board.get(col, row - 1);
        if run_start && is_tuck_setup(board, row, col) {
            holes -= 1.0 - tuck_proportion;
        }
    }
    if count_well {
        holes += surface.well_holes as f64 * 0.7;
    }
    holes
}

/// Rows that must be cleared before every hole outside the well is exposed.
pub fn lines_needed_until_clean(board: &Board, well: usize) -> u32 {
    let mut needed = 0u32;
    let mut highest_hole_row = ROWS;
    for col in (0..Board::WIDTH).filter(|&c| c != well) {
        let height = board.column_height(col) as usize;
        let mut row = ROWS - height;
        let mut above = 0u32;
        while height > 0 && row < ROWS - 1 {
            above |= 1 << row;
            row += 1;
            if !board.get(col, row) {
                needed |= above;
                highest_hole_row = highest_hole_row.min(row);
            }
        }
    }
    if needed != 0 {
        for row in 0..highest_hole_row {
            if board.get(well, row) {
                needed |= 1 << row;
            }
        }
    }
    needed.count_ones()
}

/// Signed coverage of filled well cells: open cells beside them count up
/// by height when exposed, and down by one when they are holes.
pub fn well_coverage(board: &Board, well: usize, scare: f64) -> f64 {
    let mut sum = 0.0;
    for row in (0..ROWS).filter(|&r| board.get(well, r)) {
        for col in (0..Board::WIDTH).filter(|&c| c != well && !board.get(c, row)) {
            let covered = (0..row).any(|r| board.get(col, r));
            if covered {
                sum -= 1.0;
            } else if scare < 2.0 {
                sum += 1.0;
            } else {
                sum += (ROWS - row) as f64 / scare;
            }
        }
    }
    sum
}

pub fn well_cells(board: &Board, well: usize) -> u32 {
    board.column(well).count_ones()
}

/// The four rows above the well's stack top are full everywhere else.
pub fn is_tetris_ready(board: &Board, well: usize) -> bool {
    let stop = ROWS - board.column_height(well) as usize;
    if stop < 4 {
        return false;
    }
    (stop - 4..stop).all(|row| (0..Board::WIDTH).all(|col| col == well || board.get(col, row)))
}

pub fn built_out_left(surface: &BoardSurface, scare: f64) -> f64 {
    if surface.has_hole_in_column(0) || surface.has_hole_in_column(1) {
        return 0.0;
    }
    (surface.heights[0] as f64 - scare).max(0.0)
}

pub fn built_out_right(board: &Board, surface: &BoardSurface, scare: f64) -> f64 {
    let last = Board::WIDTH - 1;
    if column_has_hole(board, last) || column_has_hole(board, last - 1) {
        return 0.0;
    }
    (surface.heights[last] as f64 - scare).max(0.0)
}

/// Any empty cell under the top of `col`, well column included.
pub fn column_has_hole(board: &Board, col: usize) -> bool {
    let height = board.column_height(col) as usize;
    (ROWS - height..ROWS).any(|row| !board.get(col, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rabbit_core::DEFAULT_WELL_COLUMN;

    const WELL: usize = DEFAULT_WELL_COLUMN;

    #[test]
    fn test_level_after_placement() {
        assert_eq!(level_after_placement(18, 0, 4), 18);
        assert_eq!(level_after_placement(18, 128, 2), 19);
        assert_eq!(level_after_placement(19, 138, 4), 20);
        assert_eq!(level_after_placement(28, 228, 2), 29);
        assert_eq!(level_after_placement(29, 0, 0), 29);
        assert_eq!(level_after_placement(5, 10, 0), 18);
    }

    #[test]
    fn test_spire_ignores_slopes() {
        assert_eq!(spire_height(&[1, 2, 3, 4, 5, 6, 7, 8, 9], 0.0), 8.0);
        assert_eq!(spire_height(&[9, 8, 7, 6, 5, 4, 3, 2, 1], 0.0), 0.0);
        assert_eq!(spire_height(&[2, 2, 2, 12, 2, 2, 2, 2, 2], 10.032), 12.0 - 10.032);
        assert_eq!(spire_height(&[2, 2, 2, 5, 2, 2, 2, 2, 2], 10.032), 0.0);
    }

    #[test]
    fn test_col_9_cells() {
        assert_eq!(cells_below_col_9(&[3, 3, 3, 3, 3, 3, 3, 3, 5]), 16);
        assert_eq!(cells_below_col_9(&[6, 3, 3, 3, 3, 3, 3, 3, 5]), 14);
        assert_eq!(cells_below_col_9(&[3; 9]), 0);
    }

    #[test]
    fn test_tuck_setup_hole_discounted() {
        let board = Board::from_rows(&["#.#.......", "##...#####"]).expect("valid rows");
        let surface = BoardSurface::analyze(&board, WELL);
        assert_eq!(surface.holes, 1.0);
        assert!((adjusted_holes(&board, &surface, 0.81, false) - 0.81).abs() < 1e-9);
    }

    #[test]
    fn test_lines_needed_until_clean() {
        let board = Board::from_rows(&["#.........", "#.........", ".#########"]).expect("valid rows");
        assert_eq!(lines_needed_until_clean(&board, WELL), 2);
        assert_eq!(lines_needed_until_clean(&Board::flat_stack(4), WELL), 0);
    }

    #[test]
    fn test_lines_needed_counts_well_rows_above_holes() {
        let board = Board::from_rows(&[".........#", "#.........", ".#########"]).expect("valid rows");
        assert_eq!(lines_needed_until_clean(&board, WELL), 2);
    }

    #[test]
    fn test_lines_needed_skips_holes_in_the_well() {
        let board = Board::from_rows(&[".........#", "#########."]).expect("valid rows");
        assert_eq!(lines_needed_until_clean(&board, WELL), 0);
        // the same covered cell counts once column 9 is an ordinary column
        assert_eq!(lines_needed_until_clean(&board, 0), 1);
    }

    #[test]
    fn test_well_coverage() {
        let board = Board::from_rows(&["#########.", "#####....#"]).expect("valid rows");
        // four open cells on the bottom row, all covered
        assert_eq!(well_coverage(&board, WELL, 10.0), -4.0);
        let board = Board::from_rows(&["#####....#"]).expect("valid rows");
        assert!((well_coverage(&board, WELL, 10.0) - 4.0 * 0.1).abs() < 1e-9);
        assert_eq!(well_coverage(&board, WELL, 0.0), 4.0);
        assert_eq!(well_cells(&board, WELL), 1);
    }

    #[test]
    fn test_tetris_ready() {
        assert!(is_tetris_ready(&Board::flat_stack(4), WELL));
        assert!(!is_tetris_ready(&Board::flat_stack(3), WELL));
        let mut board = Board::flat_stack(6);
        board.set(WELL, 19, true);
        board.set(WELL, 18, true);
        assert!(is_tetris_ready(&board, WELL));
        board.set(3, 14, false);
        assert!(!is_tetris_ready(&board, WELL));
    }

    #[test]
    fn test_built_out_edges() {
        let board = Board::from_rows(&["#.........", "#.........", "##.......#", "##.......#"]).expect("valid rows");
        let surface = BoardSurface::analyze(&board, WELL);
        assert_eq!(built_out_left(&surface, 1.0), 3.0);
        assert_eq!(built_out_right(&board, &surface, 1.0), 1.0);
        let holey = Board::from_rows(&["#.........", "..........", "##........"]).expect("valid rows");
        let surface = BoardSurface::analyze(&holey, WELL);
        assert_eq!(built_out_left(&surface, 0.0), 0.0);
    }

    #[test]
    fn test_column_hole() {
        let board = Board::from_rows(&["#.........", "#.........", "#.........", "#.........", ".........."]).expect("valid rows");
        assert!(column_has_hole(&board, 0));
        assert!(!column_has_hole(&board, 1));
        assert!(!column_has_hole(&Board::flat_stack(3), 0));
    }
}
