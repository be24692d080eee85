use rabbit_core::{Board, Input, InputClass, InputTimeline, Piece, Placement, Possibility};
use rabbit_engine::{enumerate_placements, enumerate_tap_placements, EngineConfig, PlacementRequest};
use rustc_hash::FxHashSet;

/// Four filled cells hanging over an empty pocket on the left.
fn overhang() -> Board {
    Board::from_rows(&["####......", "..........", "..........", "..........", ".........."])
        .expect("valid rows")
}

fn enumerate(piece: Piece) -> (Vec<Possibility>, usize) {
    let board = overhang();
    let timeline = InputTimeline::new("X.").expect("valid timeline");
    let request = PlacementRequest::fresh(piece, 18, &timeline);
    let config = EngineConfig::default();
    let all = enumerate_placements(&board, &request, &config).expect("valid request");
    let taps = enumerate_tap_placements(&board, &request, &config).expect("valid request");
    (all, taps.len())
}

fn last_press(p: &Possibility) -> Input {
    p.inputs
        .frames()
        .iter()
        .rev()
        .copied()
        .find(|i| i.is_press())
        .expect("adjustments press something")
}

fn check_counts_and_classes(piece: Piece, total: usize, tap_count: usize) {
    let (all, taps) = enumerate(piece);
    assert_eq!(all.len(), total, "{piece}");
    assert_eq!(taps, tap_count, "{piece}");
    assert_eq!(all.iter().filter(|p| p.class == InputClass::Tap).count(), tap_count, "{piece}");

    let keys: FxHashSet<Placement> = all.iter().map(|p| p.placement).collect();
    assert_eq!(keys.len(), all.len(), "{piece}");

    for p in all.iter().filter(|p| p.class != InputClass::Tap) {
        let press = last_press(p);
        match p.class {
            InputClass::Tuck => {
                assert_eq!(p.input_cost, -0.02);
                assert!(press.shift() != 0 && press.rotation() == 0, "{piece} {press:?}");
            }
            InputClass::Spin => {
                assert_eq!(p.input_cost, -0.05);
                assert!(press.shift() == 0 && press.rotation() != 0, "{piece} {press:?}");
            }
            InputClass::SpinTuck => {
                assert_eq!(p.input_cost, -0.1);
                assert!(press.shift() != 0 && press.rotation() != 0, "{piece} {press:?}");
            }
            InputClass::Tap => unreachable!(),
        }
    }
}

#[test]
fn test_o_tucks_under_overhang() {
    check_counts_and_classes(Piece::O, 10, 9);
    let (all, _) = enumerate(Piece::O);
    let tucks: Vec<&Possibility> = all.iter().filter(|p| p.class != InputClass::Tap).collect();
    assert_eq!(tucks.len(), 1);
    assert_eq!(tucks[0].class, InputClass::Tuck);
    assert_eq!(
        tucks[0].placement,
        Placement {
            rotation: 0,
            x_offset: -1,
            lock_y: 17,
        }
    );
    assert_eq!(last_press(tucks[0]), Input::Left);
}

#[test]
fn test_t_and_l_find_six_adjustments() {
    check_counts_and_classes(Piece::T, 40, 34);
    check_counts_and_classes(Piece::L, 40, 34);
}

#[test]
fn test_i_uses_every_adjustment_class() {
    check_counts_and_classes(Piece::I, 21, 17);
    let (all, _) = enumerate(Piece::I);
    for class in [InputClass::Tuck, InputClass::Spin, InputClass::SpinTuck] {
        assert!(all.iter().any(|p| p.class == class), "{class:?}");
    }
}

#[test]
fn test_tap_only_misses_the_pocket() {
    let board = overhang();
    let timeline = InputTimeline::new("X.").expect("valid timeline");
    let request = PlacementRequest::fresh(Piece::O, 18, &timeline);
    let taps = enumerate_placements(&board, &request, &EngineConfig::tap_only()).expect("valid request");
    assert!(taps.iter().all(|p| p.class == InputClass::Tap));
    assert!(!taps.iter().any(|p| p.placement.x_offset == -1 && p.placement.lock_y == 17));
}
