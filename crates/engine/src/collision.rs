//! collision detection - walls, floor, filled cells

use rabbit_core::{Board, Piece};

/// does the piece's 4x4 box at (x, y) overlap a wall, the floor or a filled cell?
/// Cells above the top of the board never collide.
#[inline]
pub fn collides(board: &Board, piece: Piece, rotation: u8, x: i8, y: i8) -> bool {
    for (dx, dy) in piece.minos(rotation) {
        let col = x + dx;
        let row = y + dy;
        if col < 0 || col >= Board::WIDTH as i8 || row >= Board::HEIGHT as i8 {
            return true;
        }
        if row >= 0 && board.get(col as usize, row as usize) {
            return true;
        }
    }
    false
}

/// can we place here? (just !collides)
pub fn can_place(board: &Board, piece: Piece, rotation: u8, x: i8, y: i8) -> bool {
    !collides(board, piece, rotation, x, y)
}

/// Lowest y reachable by dropping straight down from `y`.
#[inline]
pub fn drop_y(board: &Board, piece: Piece, rotation: u8, x: i8, y: i8) -> i8 {
    let mut landing_y = y;
    while !collides(board, piece, rotation, x, landing_y + 1) {
        landing_y += 1;
    }
    landing_y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_collision_at_spawn() {
        let board = Board::new();
        for piece in Piece::ALL {
            assert!(!collides(&board, piece, 0, 3, piece.spawn_y()));
        }
    }

    #[test]
    fn test_collision_with_walls() {
        let board = Board::new();
        // I flat spans the whole box width
        assert!(collides(&board, Piece::I, 0, -1, 0));
        assert!(collides(&board, Piece::I, 0, 7, 0));
        assert!(!collides(&board, Piece::I, 0, 6, 0));
        // vertical I sits in box column 2
        assert!(!collides(&board, Piece::I, 1, -2, 0));
        assert!(collides(&board, Piece::I, 1, -3, 0));
    }

    #[test]
    fn test_above_board_is_vacuous() {
        let board = Board::new();
        assert!(!collides(&board, Piece::I, 1, 3, -3));
    }

    #[test]
    fn test_collision_with_floor_and_cells() {
        let mut board = Board::new();
        // O occupies box rows 1-2
        assert!(!collides(&board, Piece::O, 0, 3, 17));
        assert!(collides(&board, Piece::O, 0, 3, 18));
        board.set(4, 10, true);
        assert!(collides(&board, Piece::O, 0, 3, 9));
    }

    #[test]
    fn test_drop_y() {
        let board = Board::flat_stack(3);
        // O rests with its bottom row on row 16
        assert_eq!(drop_y(&board, Piece::O, 0, 3, -1), 14);
        assert_eq!(drop_y(&Board::new(), Piece::O, 0, 3, -1), 17);
    }
}
