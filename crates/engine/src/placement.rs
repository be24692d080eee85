//! Hover-state enumeration: where can the piece be tapped and rotated to
//! before it starts falling freely?

use rabbit_core::{Board, InputTimeline, Piece};

use crate::gravity::GravitySystem;
use crate::sim::{FrameOutcome, SimParams, SimState};

/// Every legal (rotation, x) the piece can be held at, each exactly once.
pub fn hover_states(params: &SimParams) -> Vec<SimState> {
    let mut states = Vec::new();
    if params.spawn_state().is_none() {
        return states;
    }
    let num_rotations = params.piece.num_rotations();

    for shift in [-1, 1] {
        for goal in 0..num_rotations {
            shift_repeatedly(params, shift, goal, &mut states);
        }
    }

    // placements needing more rotations than shifts
    for goal in 0..num_rotations {
        let diff = (goal as i8 - params.existing_rotation as i8).rem_euclid(num_rotations as i8);
        let rotation_inputs = if diff == 3 { 1 } else { diff };
        let offsets: &[i8] = if rotation_inputs == 2 { &[-1, 0, 1] } else { &[0] };
        for &offset in offsets {
            if let Some(state) = run_to_placement(params, goal, offset) {
                states.push(state);
            }
        }
    }

    let mut seen = [[false; 16]; 4];
    states.retain(|s| {
        let slot = &mut seen[s.rotation as usize][(s.x + 3) as usize];
        !std::mem::replace(slot, true)
    });
    states
}

/// Taps in one direction while rotating toward `goal`, recording every input
/// frame that ends at the goal rotation.
fn shift_repeatedly(params: &SimParams, shift: i8, goal: u8, out: &mut Vec<SimState>) {
    let Some(mut state) = params.spawn_state() else {
        return;
    };
    loop {
        match params.step(&mut state, shift, goal) {
            FrameOutcome::Advanced { input_frame } => {
                if input_frame && state.rotation == goal {
                    out.push(state);
                }
            }
            FrameOutcome::Blocked | FrameOutcome::Locked => return,
        }
    }
}

/// Drives the piece toward (`goal`, `initial_x + offset`), returning the
/// hover state on arrival.
fn run_to_placement(params: &SimParams, goal: u8, offset: i8) -> Option<SimState> {
    let mut state = params.spawn_state()?;
    let target_x = params.initial_x + offset;
    let direction = if offset < 0 { -1 } else { 1 };
    while state.x != target_x || state.rotation != goal {
        let shift = if state.x != target_x { direction } else { 0 };
        match params.step(&mut state, shift, goal) {
            FrameOutcome::Advanced { .. } => {}
            FrameOutcome::Blocked => return None,
            FrameOutcome::Locked => {
                return (state.x == target_x && state.rotation == goal).then_some(state);
            }
        }
    }
    Some(state)
}

/// Whether the piece can reach (`rotation`, `x_offset`) from the given start.
pub fn placement_is_legal(params: &SimParams, rotation: u8, x_offset: i8) -> bool {
    run_to_placement(params, rotation, x_offset).is_some()
}

/// Whether a freshly spawned piece can be moved to (`rotation`, `x_offset`).
pub fn can_do_placement(
    board: &Board,
    level: u32,
    piece: Piece,
    rotation: u8,
    x_offset: i8,
    timeline: &InputTimeline,
    gravity: GravitySystem,
) -> bool {
    let params = SimParams::fresh(board, piece, level, timeline, gravity);
    placement_is_legal(&params, rotation, x_offset)
}

/// Tallest flat stack a vertical I can still be tapped `taps` columns left
/// over, or -1 if not even an empty board allows it.
pub fn tap_height(level: u32, timeline: &InputTimeline, taps: i8, gravity: GravitySystem) -> i8 {
    let mut height = 0;
    while height <= Board::HEIGHT
        && can_do_placement(
            &Board::flat_stack(height),
            level,
            Piece::I,
            1,
            -taps,
            timeline,
            gravity,
        )
    {
        height += 1;
    }
    height as i8 - 1
}
