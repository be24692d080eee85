//! Placement keys and the fully-described result of placing a piece.

use serde::{Deserialize, Serialize};

use crate::{Board, BoardSurface, InputSequence, Piece};

/// Where a piece came to rest, relative to its spawn column.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placement {
    pub rotation: u8,
    pub x_offset: i8,
    pub lock_y: i8,
}

/// How much in-air finesse a placement needs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum InputClass {
    #[default]
    Tap,
    Tuck,
    Spin,
    SpinTuck,
}

impl InputClass {
    /// Evaluation penalty for the execution risk of this class.
    pub fn input_cost(self) -> f64 {
        match self {
            InputClass::Tap => 0.0,
            InputClass::Tuck => -0.02,
            InputClass::Spin => -0.05,
            InputClass::SpinTuck => -0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Possibility {
    pub piece: Piece,
    pub placement: Placement,
    /// Absolute column of the 4x4 box.
    pub x: i8,
    pub inputs: InputSequence,
    pub board_after: Board,
    pub lines_cleared: u8,
    pub surface: BoardSurface,
    pub class: InputClass,
    pub input_cost: f64,
}

impl Possibility {
    pub fn holes(&self) -> f64 {
        self.surface.holes
    }
}
