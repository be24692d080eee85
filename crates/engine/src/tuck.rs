//! Late in-air adjustments: tucks, spins and spin-tucks from departure points.

use rabbit_core::{Input, InputClass, Placement, Possibility};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::apply::build_possibility;
use crate::lock::{Departure, HeightTable};
use crate::sim::{SimParams, SimState};

/// Single-frame inputs tried for `class`, given the piece's rotation count.
fn input_menu(class: InputClass, num_rotations: u8) -> &'static [Input] {
    match (class, num_rotations) {
        (InputClass::Tap, _) => &[],
        (InputClass::Tuck, _) => &[Input::Left, Input::Right],
        (_, 1) => &[],
        (InputClass::Spin, 2) => &[Input::RotateRight],
        (InputClass::Spin, _) => &[Input::RotateRight, Input::RotateLeft],
        (InputClass::SpinTuck, 2) => &[Input::LeftRotateRight, Input::RightRotateRight],
        (InputClass::SpinTuck, _) => &[
            Input::LeftRotateRight,
            Input::RightRotateRight,
            Input::LeftRotateLeft,
            Input::RightRotateLeft,
        ],
    }
}

/// Tries every late input from every departure, cheapest class first.
/// `seen` must already hold the tap placements; new placements are added to it.
pub fn search_tucks_and_spins(
    params: &SimParams,
    departures: &[Departure],
    heights: &mut HeightTable,
    seen: &mut FxHashSet<Placement>,
    well: usize,
) -> Vec<Possibility> {
    let mut found = Vec::new();
    let num_rotations = params.piece.num_rotations();

    for class in [InputClass::Tuck, InputClass::Spin, InputClass::SpinTuck] {
        for departure in departures {
            for &input in input_menu(class, num_rotations) {
                let rotation = params.piece.rotate_by(departure.state.rotation, input.rotation());
                let x = departure.state.x + input.shift();
                if heights.already_reached(rotation, x, departure.state.y) {
                    continue;
                }
                let Some(locked) = try_input(params, departure, rotation, x) else {
                    continue;
                };
                let placement = Placement {
                    rotation: locked.rotation,
                    x_offset: locked.x - params.initial_x,
                    lock_y: locked.y,
                };
                if !seen.insert(placement) {
                    continue;
                }
                heights.record(locked.rotation, locked.x, locked.y);
                trace!(?placement, ?class, "found adjustment placement");

                let mut inputs = departure.inputs.clone();
                inputs.push(input);
                inputs.push_repeated(Input::Wait, (locked.frame - departure.state.frame) as usize);
                found.push(build_possibility(params, &locked, inputs, class, well));
            }
        }
    }
    found
}

/// Shifts to `x` then rotates to `rotation` on the departure frame, then lets gravity finish.
/// Returns the state the piece locks in (its frame is the locking frame).
fn try_input(params: &SimParams, departure: &Departure, rotation: u8, x: i8) -> Option<SimState> {
    let mut state = departure.state;
    if x != state.x && params.collides_at(state.rotation, x, state.y) {
        return None;
    }
    state.x = x;
    if rotation != state.rotation && params.collides_at(rotation, state.x, state.y) {
        return None;
    }
    state.rotation = rotation;

    loop {
        if params.is_gravity_frame(state.frame) {
            if params.resting(&state) {
                return Some(state);
            }
            state.y += 1;
        }
        state.frame += 1;
        state.arr_frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menus_by_rotation_count() {
        assert_eq!(input_menu(InputClass::Tuck, 1).len(), 2);
        assert!(input_menu(InputClass::Spin, 1).is_empty());
        assert!(input_menu(InputClass::SpinTuck, 1).is_empty());
        assert_eq!(input_menu(InputClass::Spin, 2).len(), 1);
        assert_eq!(input_menu(InputClass::SpinTuck, 2).len(), 2);
        assert_eq!(input_menu(InputClass::Spin, 4).len(), 2);
        assert_eq!(input_menu(InputClass::SpinTuck, 4).len(), 4);
    }
}
