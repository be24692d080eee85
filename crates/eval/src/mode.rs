//! Strategy mode chosen from the board and game progress before each search.

use std::fmt;

use rabbit_core::{is_tuck_setup, Board, Piece};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::features::column_has_hole;
use crate::params::AiParams;
use crate::tap::TapHeights;

/// Line count from which the last transition before killscreen is near.
/// Applies at every level below 29, not only level 28.
pub const NEAR_ENDGAME_LINES: u32 = 220;
pub const ENDGAME_LEVEL: u32 = 29;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiMode {
    #[default]
    Standard,
    Dig,
    NearEndgame,
    Endgame,
    EndgameForMaxClears,
    ImminentDeath,
}

impl AiMode {
    pub const ALL: [AiMode; 6] = [
        AiMode::Standard,
        AiMode::Dig,
        AiMode::NearEndgame,
        AiMode::Endgame,
        AiMode::EndgameForMaxClears,
        AiMode::ImminentDeath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AiMode::Standard => "STANDARD",
            AiMode::Dig => "DIG",
            AiMode::NearEndgame => "NEAR_ENDGAME",
            AiMode::Endgame => "ENDGAME",
            AiMode::EndgameForMaxClears => "ENDGAME_FOR_MAX_CLEARS",
            AiMode::ImminentDeath => "IMMINENT_DEATH",
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything mode selection looks at.
#[derive(Clone, Copy, Debug)]
pub struct ModeInputs<'a> {
    pub board: &'a Board,
    pub lines: u32,
    pub level: u32,
    pub piece: Piece,
    pub taps: &'a TapHeights,
    pub params: &'a AiParams,
    pub well: usize,
}

pub fn select_mode(inputs: &ModeInputs) -> AiMode {
    let mode = if inputs.level < ENDGAME_LEVEL
        && inputs.lines >= NEAR_ENDGAME_LINES
        && hole_in_tetris_zone(inputs.board, inputs.well)
    {
        AiMode::ImminentDeath
    } else if inputs.level >= ENDGAME_LEVEL && inputs.taps.max_5_tap(inputs.level) <= 4 {
        AiMode::Endgame
    } else if inputs.level < ENDGAME_LEVEL && inputs.lines >= NEAR_ENDGAME_LINES {
        AiMode::NearEndgame
    } else if should_dig(inputs) {
        AiMode::Dig
    } else if inputs.level >= ENDGAME_LEVEL {
        AiMode::EndgameForMaxClears
    } else {
        AiMode::Standard
    };
    trace!(%mode, level = inputs.level, lines = inputs.lines, "selected mode");
    mode
}

/// Rows (inclusive start, exclusive end) the next tetris will clear.
fn tetris_zone(board: &Board, well: usize) -> (usize, usize) {
    let stop = Board::HEIGHT - board.column_height(well) as usize;
    (stop.saturating_sub(4), stop)
}

fn hole_in_tetris_zone(board: &Board, well: usize) -> bool {
    let (start, end) = tetris_zone(board, well);
    (0..Board::WIDTH)
        .filter(|&c| c != well)
        .any(|col| (start..end).any(|row| !board.get(col, row) && (0..row).any(|r| board.get(col, r))))
}

fn should_dig(inputs: &ModeInputs) -> bool {
    if inputs.params.play_perfect {
        return false;
    }
    let board = inputs.board;
    let well = inputs.well;
    let (zone_start, zone_end) = tetris_zone(board, well);
    let scare = (inputs.taps.max_5_tap(inputs.level) as f64 + inputs.params.scare_height_offset).max(0.0);
    let max_dirty_height = inputs.params.max_dirty_tetris_height * scare;

    for col in (0..Board::WIDTH).filter(|&c| c != well) {
        let height = board.column_height(col) as usize;
        if !column_has_hole(board, col) {
            continue;
        }
        let first_full_row = Board::HEIGHT - height;
        for row in first_full_row + 1..Board::HEIGHT {
            if board.get(col, row) || is_tuck_setup(board, row, col) {
                continue;
            }
            let blocks_well = board.get(well, row);
            let garbage_rows = row - first_full_row;
            if (blocks_well && (Board::HEIGHT - row) as f64 > max_dirty_height)
                || (inputs.piece == Piece::I && (zone_start..zone_end).contains(&row))
                || garbage_rows <= 3
            {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rabbit_core::{InputTimeline, DEFAULT_WELL_COLUMN};
    use rabbit_engine::GravitySystem;

    fn mode_of(board: &Board, lines: u32, level: u32, piece: Piece, params: &AiParams) -> AiMode {
        let taps = TapHeights::compute(&InputTimeline::hz_12(), GravitySystem::Ntsc);
        select_mode(&ModeInputs {
            board,
            lines,
            level,
            piece,
            taps: &taps,
            params,
            well: DEFAULT_WELL_COLUMN,
        })
    }

    fn shallow_hole() -> Board {
        let mut board = Board::flat_stack(5);
        board.set(4, 17, false);
        board
    }

    #[test]
    fn test_clean_board_is_standard() {
        let params = AiParams::default();
        assert_eq!(mode_of(&Board::flat_stack(4), 0, 18, Piece::T, &params), AiMode::Standard);
    }

    #[test]
    fn test_shallow_hole_digs() {
        let params = AiParams::default();
        assert_eq!(mode_of(&shallow_hole(), 40, 18, Piece::T, &params), AiMode::Dig);
    }

    #[test]
    fn test_play_perfect_never_digs() {
        let params = AiParams {
            play_perfect: true,
            ..AiParams::default()
        };
        assert_eq!(mode_of(&shallow_hole(), 40, 18, Piece::T, &params), AiMode::Standard);
    }

    #[test]
    fn test_deeply_buried_hole_keeps_stacking() {
        let mut board = Board::flat_stack(9);
        board.set(4, 19, false);
        board.set(3, 19, true);
        let params = AiParams::default();
        assert_eq!(mode_of(&board, 40, 18, Piece::T, &params), AiMode::Standard);
    }

    #[test]
    fn test_tuck_setup_is_not_dug() {
        let mut board = Board::flat_stack(5);
        for row in 15..20 {
            board.set(5, row, false);
            board.set(6, row, false);
        }
        board.set(4, 19, false);
        // the only hole has two open cells to its right
        let params = AiParams::default();
        assert_eq!(mode_of(&board, 40, 18, Piece::T, &params), AiMode::Standard);
    }

    #[test]
    fn test_endgame_modes() {
        let params = AiParams::default();
        let board = Board::flat_stack(2);
        assert_eq!(mode_of(&board, 230, 29, Piece::T, &params), AiMode::Endgame);
        assert_eq!(mode_of(&board, 222, 28, Piece::T, &params), AiMode::NearEndgame);
    }

    #[test]
    fn test_near_endgame_below_level_28() {
        let params = AiParams::default();
        let board = Board::flat_stack(2);
        assert_eq!(mode_of(&board, 225, 19, Piece::T, &params), AiMode::NearEndgame);
        assert_eq!(mode_of(&board, 219, 19, Piece::T, &params), AiMode::Standard);
    }

    #[test]
    fn test_imminent_death_needs_hole_in_zone() {
        let params = AiParams::default();
        let mut board = Board::flat_stack(6);
        board.set(2, 17, false);
        assert_eq!(mode_of(&board, 225, 28, Piece::T, &params), AiMode::ImminentDeath);
        assert_eq!(mode_of(&board, 100, 18, Piece::T, &params), AiMode::Dig);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(AiMode::EndgameForMaxClears.to_string(), "ENDGAME_FOR_MAX_CLEARS");
        let json = serde_json::to_string(&AiMode::ImminentDeath).expect("serializable");
        assert_eq!(json, "\"IMMINENT_DEATH\"");
    }
}
