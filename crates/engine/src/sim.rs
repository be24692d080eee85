//! Frame-by-frame piece simulation under NES timing rules.
//!
//! Callers drive the simulation one frame at a time; each frame applies at
//! most one shift and one rotation (on input frames only) and then gravity.

use rabbit_core::{Board, InputTimeline, Piece, SPAWN_X};

use crate::collision::collides;
use crate::gravity::{is_gravity_frame, GravitySystem};
use crate::movegen::PlacementRequest;

/// Fixed inputs of one placement search.
#[derive(Clone, Debug)]
pub struct SimParams<'a> {
    pub board: &'a Board,
    pub piece: Piece,
    pub initial_x: i8,
    pub initial_y: i8,
    pub frames_elapsed: u32,
    pub frames_per_row: u32,
    pub timeline: &'a InputTimeline,
    pub existing_rotation: u8,
    pub can_first_frame_shift: bool,
}

/// Position and clocks of a falling piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct SimState {
    pub x: i8,
    pub y: i8,
    pub rotation: u8,
    /// Absolute frame, drives gravity.
    pub frame: u32,
    /// Frame counter indexing the input timeline.
    pub arr_frame: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameOutcome {
    /// A shift or rotation collided; the state is left mid-frame.
    Blocked,
    /// Gravity could not move the piece down.
    Locked,
    Advanced { input_frame: bool },
}

impl<'a> SimParams<'a> {
    /// Params for a freshly spawned piece.
    pub fn fresh(
        board: &'a Board,
        piece: Piece,
        level: u32,
        timeline: &'a InputTimeline,
        gravity: GravitySystem,
    ) -> Self {
        Self {
            board,
            piece,
            initial_x: SPAWN_X,
            initial_y: piece.spawn_y(),
            frames_elapsed: 0,
            frames_per_row: gravity.frames_per_row(level),
            timeline,
            existing_rotation: 0,
            can_first_frame_shift: false,
        }
    }

    /// Params continuing from a piece that may already have moved.
    pub fn from_request(board: &'a Board, request: &PlacementRequest<'a>, gravity: GravitySystem) -> Self {
        Self {
            board,
            piece: request.piece,
            initial_x: SPAWN_X + request.x_offset,
            initial_y: request.piece.spawn_y() + request.y_offset,
            frames_elapsed: request.frames_elapsed,
            frames_per_row: gravity.frames_per_row(request.level),
            timeline: request.timeline,
            existing_rotation: request.rotation,
            can_first_frame_shift: request.can_first_frame_shift,
        }
    }

    /// Starting state, or `None` if the piece already collides where it is.
    pub fn spawn_state(&self) -> Option<SimState> {
        if collides(
            self.board,
            self.piece,
            self.existing_rotation,
            self.initial_x,
            self.initial_y,
        ) {
            return None;
        }
        Some(SimState {
            x: self.initial_x,
            y: self.initial_y,
            rotation: self.existing_rotation,
            frame: self.frames_elapsed,
            arr_frame: if self.can_first_frame_shift {
                0
            } else {
                self.frames_elapsed
            },
        })
    }

    #[inline]
    pub fn is_input_frame(&self, state: &SimState) -> bool {
        self.timeline.is_input_frame(state.arr_frame)
    }

    #[inline]
    pub fn is_gravity_frame(&self, frame: u32) -> bool {
        is_gravity_frame(frame, self.frames_per_row)
    }

    #[inline]
    pub fn collides_at(&self, rotation: u8, x: i8, y: i8) -> bool {
        collides(self.board, self.piece, rotation, x, y)
    }

    /// True if the piece cannot fall one more row.
    #[inline]
    pub fn resting(&self, state: &SimState) -> bool {
        self.collides_at(state.rotation, state.x, state.y + 1)
    }

    /// Runs one frame: shift and rotate toward `goal_rotation` on input
    /// frames, then gravity, then advance both clocks.
    pub fn step(&self, state: &mut SimState, shift: i8, goal_rotation: u8) -> FrameOutcome {
        let input_frame = self.is_input_frame(state);
        if input_frame {
            if shift != 0 {
                if self.collides_at(state.rotation, state.x + shift, state.y) {
                    return FrameOutcome::Blocked;
                }
                state.x += shift;
            }
            if state.rotation != goal_rotation {
                let next = Piece::rotate_toward(state.rotation, goal_rotation);
                if self.collides_at(next, state.x, state.y) {
                    return FrameOutcome::Blocked;
                }
                state.rotation = next;
            }
        }
        if self.is_gravity_frame(state.frame) {
            if self.resting(state) {
                return FrameOutcome::Locked;
            }
            state.y += 1;
        }
        state.frame += 1;
        state.arr_frame += 1;
        FrameOutcome::Advanced { input_frame }
    }
}
