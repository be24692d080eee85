//! Piece types and their NES rotation grids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RabbitError;

/// Column of the top-left corner of the 4x4 spawn box.
pub const SPAWN_X: i8 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Piece {
    I,
    O,
    L,
    J,
    T,
    S,
    Z,
}

type Grid = [(i8, i8); 4];

// (col, row) offsets inside the 4x4 box, rotation states in NES order
const I_GRIDS: [Grid; 2] = [
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
];
const O_GRIDS: [Grid; 1] = [[(1, 1), (2, 1), (1, 2), (2, 2)]];
const L_GRIDS: [Grid; 4] = [
    [(1, 1), (2, 1), (3, 1), (1, 2)],
    [(1, 0), (2, 0), (2, 1), (2, 2)],
    [(3, 0), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (2, 2), (3, 2)],
];
const J_GRIDS: [Grid; 4] = [
    [(1, 1), (2, 1), (3, 1), (3, 2)],
    [(2, 0), (2, 1), (1, 2), (2, 2)],
    [(1, 0), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (3, 0), (2, 1), (2, 2)],
];
const T_GRIDS: [Grid; 4] = [
    [(1, 1), (2, 1), (3, 1), (2, 2)],
    [(2, 0), (1, 1), (2, 1), (2, 2)],
    [(2, 0), (1, 1), (2, 1), (3, 1)],
    [(2, 0), (2, 1), (3, 1), (2, 2)],
];
const S_GRIDS: [Grid; 2] = [
    [(2, 1), (3, 1), (1, 2), (2, 2)],
    [(2, 0), (2, 1), (3, 1), (3, 2)],
];
const Z_GRIDS: [Grid; 2] = [
    [(1, 1), (2, 1), (2, 2), (3, 2)],
    [(3, 0), (2, 1), (3, 1), (2, 2)],
];

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::O,
        Piece::L,
        Piece::J,
        Piece::T,
        Piece::S,
        Piece::Z,
    ];

    fn grids(self) -> &'static [Grid] {
        match self {
            Piece::I => &I_GRIDS,
            Piece::O => &O_GRIDS,
            Piece::L => &L_GRIDS,
            Piece::J => &J_GRIDS,
            Piece::T => &T_GRIDS,
            Piece::S => &S_GRIDS,
            Piece::Z => &Z_GRIDS,
        }
    }

    /// Number of distinct rotation states (1, 2 or 4).
    #[inline]
    pub fn num_rotations(self) -> u8 {
        self.grids().len() as u8
    }

    /// Occupied (col, row) offsets within the 4x4 box.
    /// `rotation` is taken modulo the rotation count.
    #[inline]
    pub fn minos(self, rotation: u8) -> [(i8, i8); 4] {
        let grids = self.grids();
        grids[rotation as usize % grids.len()]
    }

    /// Spawn row of the box's top edge.
    pub fn spawn_y(self) -> i8 {
        match self {
            Piece::I => -2,
            _ => -1,
        }
    }

    pub fn id(self) -> char {
        match self {
            Piece::I => 'I',
            Piece::O => 'O',
            Piece::L => 'L',
            Piece::J => 'J',
            Piece::T => 'T',
            Piece::S => 'S',
            Piece::Z => 'Z',
        }
    }

    pub fn from_id(c: char) -> Option<Piece> {
        Piece::ALL.into_iter().find(|p| p.id() == c)
    }

    /// One rotation step from `current` toward `goal`: left if that lands on
    /// the goal, right otherwise.
    #[inline]
    pub fn rotate_toward(current: u8, goal: u8) -> u8 {
        if current == goal {
            current
        } else if (current + 3) % 4 == goal {
            goal
        } else {
            (current + 1) % 4
        }
    }

    /// Rotation index after `steps` (+1 right, -1 left), wrapped to this piece.
    #[inline]
    pub fn rotate_by(self, rotation: u8, steps: i8) -> u8 {
        let n = self.num_rotations() as i8;
        (rotation as i8 + steps).rem_euclid(n) as u8
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Piece {
    type Err = RabbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Piece::from_id(c).ok_or_else(|| RabbitError::UnknownPiece(s.to_string()))
            }
            _ => Err(RabbitError::UnknownPiece(s.to_string())),
        }
    }
}
