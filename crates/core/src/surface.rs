//! Column heights and holes of a board, computed once per placement.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::Board;

/// Column kept open for tetrises unless configured otherwise.
pub const DEFAULT_WELL_COLUMN: usize = 9;

/// Hole cells as (row, col).
pub type HoleCells = SmallVec<[(u8, u8); 8]>;

/// Heights and hole summary of one board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSurface {
    pub heights: [u8; 10],
    /// First cell of each vertical run counts 1, each further cell 0.2.
    pub holes: f64,
    pub hole_cells: HoleCells,
    /// Empty cells under the stack top of the well column.
    pub well_holes: u8,
}

impl BoardSurface {
    pub fn analyze(board: &Board, well: usize) -> Self {
        let heights = board.heights();
        let mut holes = 0.0;
        let mut hole_cells = HoleCells::new();
        let mut well_holes = 0;
        for (x, &h) in heights.iter().enumerate() {
            if h == 0 {
                continue;
            }
            let top = Board::HEIGHT - h as usize;
            if x == well {
                well_holes = (top..Board::HEIGHT).filter(|&y| !board.get(x, y)).count() as u8;
                continue;
            }
            let mut in_run = false;
            for y in top..Board::HEIGHT {
                if board.get(x, y) {
                    in_run = false;
                    continue;
                }
                holes += if in_run { 0.2 } else { 1.0 };
                in_run = true;
                hole_cells.push((y as u8, x as u8));
            }
        }
        Self {
            heights,
            holes,
            hole_cells,
            well_holes,
        }
    }

    /// Heights of the nine columns other than the well, left to right.
    pub fn without_well(&self, well: usize) -> [u8; 9] {
        let mut out = [0u8; 9];
        let mut i = 0;
        for (x, &h) in self.heights.iter().enumerate() {
            if x != well && i < 9 {
                out[i] = h;
                i += 1;
            }
        }
        out
    }

    pub fn max_height(&self) -> u8 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    pub fn has_hole_in_column(&self, col: usize) -> bool {
        self.hole_cells.iter().any(|&(_, c)| c as usize == col)
    }
}

/// True if the two cells beside (row, col) on one side are both open,
/// i.e. the hole could later be filled by a tuck.
pub fn is_tuck_setup(board: &Board, row: usize, col: usize) -> bool {
    let open = |x: isize| x >= 0 && (x as usize) < Board::WIDTH && !board.get(x as usize, row);
    let c = col as isize;
    (open(c + 1) && open(c + 2)) || (open(c - 1) && open(c - 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_surface() {
        let s = BoardSurface::analyze(&Board::new(), DEFAULT_WELL_COLUMN);
        assert_eq!(s.heights, [0; 10]);
        assert_eq!(s.holes, 0.0);
        assert!(s.hole_cells.is_empty());
    }

    #[test]
    fn test_hole_runs_weighted() {
        let board = Board::from_rows(&[
            "#.........",
            "..........",
            "..........",
            "#.#.......",
            ".##.......",
        ])
        .expect("valid rows");
        let s = BoardSurface::analyze(&board, DEFAULT_WELL_COLUMN);
        assert_eq!(s.heights[0], 5);
        // column 0: run of two (1.2) and a separate single (1.0)
        assert!((s.holes - 2.2).abs() < 1e-9);
        assert_eq!(s.hole_cells.len(), 3);
        assert!(s.has_hole_in_column(0));
        assert!(!s.has_hole_in_column(2));
    }

    #[test]
    fn test_well_column_holes_tracked_separately() {
        let board = Board::from_rows(&[".........#", ".........."]).expect("valid rows");
        let s = BoardSurface::analyze(&board, DEFAULT_WELL_COLUMN);
        assert_eq!(s.holes, 0.0);
        assert_eq!(s.well_holes, 1);
        assert_eq!(s.without_well(DEFAULT_WELL_COLUMN), [0; 9]);
    }

    #[test]
    fn test_tuck_setup() {
        let board = Board::from_rows(&["#.##......", "##########"]).expect("valid rows");
        assert!(is_tuck_setup(&board, 18, 5));
        assert!(!is_tuck_setup(&board, 18, 1));
    }
}
