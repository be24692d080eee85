//! Where the piece will be when the player sees the next piece.
//!
//! A player commits to a default input sequence on spawn and only reacts to
//! the next box after `reaction_frames`. Adjustments are searched from the
//! piece state predicted for that frame.

use rabbit_core::{Board, InputSequence, SearchState};
use rabbit_engine::GravitySystem;

/// Replays the first `reaction_frames` of `inputs` from `state`.
///
/// Frames past the end of the sequence are waits. The first-frame flag is set
/// when the timeline allowed more inputs than the sequence used, so the
/// adjustment may start with a press.
pub fn predict_state_at_adjustment_time(
    state: &SearchState,
    inputs: &InputSequence,
    reaction_frames: u32,
    gravity: GravitySystem,
) -> SearchState {
    let mut possible = 0u32;
    let mut used = 0u32;
    let mut shift = 0i8;
    let mut rotation_steps = 0i8;

    for frame in 0..reaction_frames {
        if state.timeline.is_input_frame(frame) {
            possible += 1;
        }
        let Some(&input) = inputs.frames().get(frame as usize) else {
            continue;
        };
        shift += input.shift();
        rotation_steps += input.rotation();
        if input.is_press() {
            used += 1;
        }
    }

    let frames_per_row = gravity.frames_per_row(state.level);
    let fallen = (reaction_frames / frames_per_row).min(Board::HEIGHT as u32) as i8;

    let mut predicted = state.clone();
    predicted.x_offset = state.x_offset + shift;
    predicted.rotation = state.piece.rotate_by(state.rotation, rotation_steps);
    predicted.y_offset = (state.y_offset + fallen).min(Board::HEIGHT as i8);
    predicted.frames_elapsed = state.frames_elapsed + reaction_frames;
    predicted.can_first_frame_shift = used < possible;
    predicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rabbit_core::{InputTimeline, Piece};

    fn spawn(piece: Piece, level: u32, timeline: InputTimeline) -> SearchState {
        SearchState::new(Board::new(), piece, level, 0, timeline)
    }

    #[test]
    fn test_replays_shifts_and_rotations() {
        let timeline = InputTimeline::new("X....X...X...X").expect("valid timeline");
        let state = spawn(Piece::J, 18, timeline);
        let inputs: InputSequence = "E....E...L...L".parse().expect("valid inputs");
        let predicted = predict_state_at_adjustment_time(&state, &inputs, 15, GravitySystem::Ntsc);
        assert_eq!(predicted.x_offset, -4);
        assert_eq!(predicted.rotation, 2);
        assert_eq!(predicted.y_offset, 5);
        assert_eq!(predicted.frames_elapsed, 15);
        assert!(predicted.can_first_frame_shift);
        assert!(predicted.validate().is_ok());
    }

    #[test]
    fn test_all_input_frames_used() {
        let state = spawn(Piece::I, 18, InputTimeline::hz_12());
        let inputs: InputSequence = "R....R....R....R".parse().expect("valid inputs");
        let predicted = predict_state_at_adjustment_time(&state, &inputs, 16, GravitySystem::Ntsc);
        assert_eq!(predicted.x_offset, 4);
        assert_eq!(predicted.rotation, 0);
        assert!(!predicted.can_first_frame_shift);
    }

    #[test]
    fn test_rotation_wraps_per_piece() {
        let state = spawn(Piece::S, 18, InputTimeline::hz_30());
        let inputs: InputSequence = "A.A.A".parse().expect("valid inputs");
        let predicted = predict_state_at_adjustment_time(&state, &inputs, 5, GravitySystem::Ntsc);
        assert_eq!(predicted.rotation, 1);
    }

    #[test]
    fn test_fall_is_capped_at_board_height() {
        let state = spawn(Piece::O, 29, InputTimeline::hz_12());
        let predicted = predict_state_at_adjustment_time(&state, &InputSequence::new(), 60, GravitySystem::Ntsc);
        assert_eq!(predicted.y_offset, 20);
        assert_eq!(predicted.x_offset, 0);
        assert!(predicted.can_first_frame_shift);
    }
}
