//! Everything a search request knows about the current moment of play.

use crate::error::{ensure_range, RabbitError, RabbitResult};
use crate::{Board, InputTimeline, Piece};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SearchState {
    pub board: Board,
    pub piece: Piece,
    pub next_piece: Option<Piece>,
    pub level: u32,
    pub lines: u32,
    pub x_offset: i8,
    pub y_offset: i8,
    pub rotation: u8,
    pub frames_elapsed: u32,
    pub can_first_frame_shift: bool,
    pub timeline: InputTimeline,
}

impl SearchState {
    /// A freshly spawned piece with nothing done to it yet.
    pub fn new(board: Board, piece: Piece, level: u32, lines: u32, timeline: InputTimeline) -> Self {
        Self {
            board,
            piece,
            next_piece: None,
            level,
            lines,
            x_offset: 0,
            y_offset: 0,
            rotation: 0,
            frames_elapsed: 0,
            can_first_frame_shift: false,
            timeline,
        }
    }

    pub fn with_next(mut self, next: Piece) -> Self {
        self.next_piece = Some(next);
        self
    }

    /// Piece already moved before the search starts (adjustment search).
    pub fn with_progress(
        mut self,
        x_offset: i8,
        y_offset: i8,
        rotation: u8,
        frames_elapsed: u32,
        can_first_frame_shift: bool,
    ) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self.rotation = rotation;
        self.frames_elapsed = frames_elapsed;
        self.can_first_frame_shift = can_first_frame_shift;
        self
    }

    pub fn validate(&self) -> RabbitResult<()> {
        ensure_range("level", self.level as i64, 0, 999)?;
        ensure_range("lines", self.lines as i64, 0, 9999)?;
        ensure_range("x_offset", self.x_offset as i64, -5, 4)?;
        ensure_range("y_offset", self.y_offset as i64, 0, 20)?;
        ensure_range("frames_elapsed", self.frames_elapsed as i64, 0, 999)?;
        ensure_range("rotation", self.rotation as i64, 0, 3)?;
        if self.rotation >= self.piece.num_rotations() {
            return Err(RabbitError::OutOfRange {
                name: "rotation",
                value: self.rotation as i64,
                min: 0,
                max: self.piece.num_rotations() as i64 - 1,
            });
        }
        Ok(())
    }
}
