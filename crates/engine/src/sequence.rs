//! Frame-by-frame tap inputs for reaching a hover placement.

use rabbit_core::{Input, InputSequence, InputTimeline};

/// Inputs that rotate `rotation_diff` steps (3 means one left) and shift
/// `x_offset` columns, one press per input frame starting at `start_arr_frame`.
/// Shifts carry a pending rotation on the same frame.
pub fn generate_input_sequence(
    rotation_diff: u8,
    x_offset: i8,
    timeline: &InputTimeline,
    start_arr_frame: u32,
) -> InputSequence {
    let mut shifts_left = if x_offset < 0 { -x_offset } else { 0 };
    let mut shifts_right = if x_offset > 0 { x_offset } else { 0 };
    let mut rotations_left = if rotation_diff == 3 { 1 } else { 0 };
    let mut rotations_right = if rotation_diff < 3 { rotation_diff as i8 } else { 0 };

    let mut sequence = InputSequence::new();
    let mut frame = start_arr_frame;
    while shifts_left + shifts_right + rotations_left + rotations_right > 0 {
        if !timeline.is_input_frame(frame) {
            sequence.push(Input::Wait);
            frame += 1;
            continue;
        }
        let shift = if shifts_left > 0 {
            shifts_left -= 1;
            -1
        } else if shifts_right > 0 {
            shifts_right -= 1;
            1
        } else {
            0
        };
        let rotation = if rotations_right > 0 {
            rotations_right -= 1;
            1
        } else if rotations_left > 0 {
            rotations_left -= 1;
            -1
        } else {
            0
        };
        sequence.push(Input::combine(shift, rotation));
        frame += 1;
    }
    sequence
}
