//! board representation - column-major u32s, row 0 at the top

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RabbitError, RabbitResult};

/// 20x10 playfield using column-major u32 bitfields.
/// Bit `y` of column `x` is row `y`, counted downward from the top.
/// Only filled vs empty is tracked.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub struct Board {
    cols: [u32; 10],
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;
    const FULL_COLUMN: u32 = (1 << Self::HEIGHT) - 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Bottom `height` rows filled in columns 0-8, column 9 left open.
    pub fn flat_stack(height: usize) -> Self {
        let height = height.min(Self::HEIGHT);
        let mut board = Self::new();
        let mask = if height == 0 {
            0
        } else {
            Self::FULL_COLUMN & !((1u32 << (Self::HEIGHT - height)) - 1)
        };
        for col in board.cols.iter_mut().take(Self::WIDTH - 1) {
            *col = mask;
        }
        board
    }

    /// Builds a board from bottom-aligned text rows (`#`/`1` filled, `.`/`0` empty).
    /// The last row given is the bottom row of the board.
    pub fn from_rows(rows: &[&str]) -> RabbitResult<Self> {
        if rows.len() > Self::HEIGHT {
            return Err(RabbitError::InvalidBoard(format!(
                "{} rows given, at most {} allowed",
                rows.len(),
                Self::HEIGHT
            )));
        }
        let mut board = Self::new();
        let top = Self::HEIGHT - rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.chars().count() != Self::WIDTH {
                return Err(RabbitError::InvalidBoard(format!(
                    "row {:?} is not {} cells wide",
                    row,
                    Self::WIDTH
                )));
            }
            for (x, c) in row.chars().enumerate() {
                match c {
                    '#' | '1' => board.set(x, top + i, true),
                    '.' | '0' => {}
                    other => {
                        return Err(RabbitError::InvalidBoard(format!(
                            "unexpected cell character {:?}",
                            other
                        )))
                    }
                }
            }
        }
        Ok(board)
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> bool {
        (self.cols[x] >> y) & 1 == 1
    }

    pub fn set(&mut self, x: usize, y: usize, filled: bool) {
        if filled {
            self.cols[x] |= 1 << y;
        } else {
            self.cols[x] &= !(1 << y);
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.cols.iter().all(|col| (col >> y) & 1 == 1)
    }

    pub fn is_empty(&self) -> bool {
        self.cols.iter().all(|&col| col == 0)
    }

    /// Removes full rows bottom-up; everything above a cleared row drops by one.
    pub fn clear_lines(&mut self) -> u8 {
        let mut cleared = 0u8;
        let mut y = Self::HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                let above = (1u32 << row) - 1;
                let keep_below = !((1u32 << (row + 1)) - 1);
                for col in self.cols.iter_mut() {
                    *col = (*col & keep_below) | ((*col & above) << 1);
                }
                cleared += 1;
                // re-check the same row, it now holds what was above
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Raw column bits, bit `y` = row `y`.
    #[inline(always)]
    pub fn column(&self, x: usize) -> u32 {
        self.cols[x]
    }

    #[inline]
    pub fn columns(&self) -> &[u32; 10] {
        &self.cols
    }

    /// 20 minus the row of the topmost filled cell, 0 for an empty column.
    #[inline]
    pub fn column_height(&self, x: usize) -> u8 {
        let col = self.cols[x];
        if col == 0 {
            0
        } else {
            (Self::HEIGHT as u32 - col.trailing_zeros()) as u8
        }
    }

    pub fn heights(&self) -> [u8; 10] {
        std::array::from_fn(|x| self.column_height(x))
    }

    pub fn filled_cells(&self) -> u32 {
        self.cols.iter().map(|c| c.count_ones()).sum()
    }

    /// Row bitmask, bit `x` = column `x`.
    pub fn row(&self, y: usize) -> u16 {
        (0..Self::WIDTH).fold(0u16, |acc, x| acc | ((((self.cols[x] >> y) & 1) as u16) << x))
    }

    /// 200-character `0`/`1` string, row-major from the top.
    pub fn to_compact_string(&self) -> String {
        let mut out = String::with_capacity(Self::WIDTH * Self::HEIGHT);
        for y in 0..Self::HEIGHT {
            for x in 0..Self::WIDTH {
                out.push(if self.get(x, y) { '1' } else { '0' });
            }
        }
        out
    }
}

impl FromStr for Board {
    type Err = RabbitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != Self::WIDTH * Self::HEIGHT {
            return Err(RabbitError::InvalidBoard(format!(
                "expected {} cells, got {}",
                Self::WIDTH * Self::HEIGHT,
                cells.len()
            )));
        }
        let mut board = Self::new();
        for (i, c) in cells.into_iter().enumerate() {
            match c {
                '1' => board.set(i % Self::WIDTH, i / Self::WIDTH, true),
                '0' => {}
                other => {
                    return Err(RabbitError::InvalidBoard(format!(
                        "unexpected cell character {:?}",
                        other
                    )))
                }
            }
        }
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut rows = [0u16; Board::HEIGHT];
        for (y, row) in rows.iter_mut().enumerate() {
            *row = self.row(y);
        }
        rows.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<u16> = Vec::deserialize(deserializer)?;
        if rows.len() != Board::HEIGHT {
            return Err(serde::de::Error::custom("expected 20 rows"));
        }
        let mut cols = [0u32; Board::WIDTH];
        for (y, &value) in rows.iter().enumerate() {
            for (x, col) in cols.iter_mut().enumerate() {
                if (value >> x) & 1 == 1 {
                    *col |= 1 << y;
                }
            }
        }
        Ok(Board { cols })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..Self::HEIGHT {
            for x in 0..Self::WIDTH {
                write!(f, "{}", if self.get(x, y) { "[]" } else { " ." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
