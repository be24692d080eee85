use rabbit_core::{Board, BoardSurface, Input, InputClass, InputSequence, Piece, Placement, Possibility};

use crate::sim::{SimParams, SimState};

/// Lock the piece into a copy of the board and clear full rows.
/// Cells above the top edge are dropped.
pub fn place_piece(board: &Board, piece: Piece, rotation: u8, x: i8, y: i8) -> (Board, u8) {
    let mut next = *board;
    for (dx, dy) in piece.minos(rotation) {
        let col = x + dx;
        let row = y + dy;
        if row >= 0 && col >= 0 && col < Board::WIDTH as i8 && row < Board::HEIGHT as i8 {
            next.set(col as usize, row as usize, true);
        }
    }
    let lines = next.clear_lines();
    (next, lines)
}

/// Entry delay (ARE) after a piece locks with its box at row `y`.
pub fn entry_delay_frames(piece: Piece, y: i8) -> usize {
    let lock_height = Board::HEIGHT as i32 - (y as i32 - piece.spawn_y() as i32);
    (10 + ((lock_height + 1).div_euclid(4)) * 2).min(18) as usize
}

/// Builds the full record for a piece locking at `state`, appending the
/// entry delay and line clear frames to `inputs`.
pub fn build_possibility(
    params: &SimParams,
    state: &SimState,
    mut inputs: InputSequence,
    class: InputClass,
    well: usize,
) -> Possibility {
    let (board_after, lines_cleared) = place_piece(params.board, params.piece, state.rotation, state.x, state.y);
    let surface = BoardSurface::analyze(&board_after, well);

    let are = entry_delay_frames(params.piece, state.y);
    inputs.push_repeated(Input::Entry, are.saturating_sub(5));
    if lines_cleared > 0 {
        inputs.push_repeated(Input::LineClear, 17);
    }
    inputs.push_repeated(Input::Entry, 5);

    Possibility {
        piece: params.piece,
        placement: Placement {
            rotation: state.rotation,
            x_offset: state.x - params.initial_x,
            lock_y: state.y,
        },
        x: state.x,
        inputs,
        board_after,
        lines_cleared,
        surface,
        class,
        input_cost: class.input_cost(),
    }
}
