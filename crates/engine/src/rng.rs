//! Piece-to-piece transition odds of the NES randomizer.

use rabbit_core::Piece;
use serde::{Deserialize, Serialize};

/// Row and column order of the transition tables.
pub const RNG_ORDER: [Piece; 7] = [Piece::T, Piece::J, Piece::Z, Piece::O, Piece::S, Piece::L, Piece::I];

const ROW_TOTAL: f64 = 64.0;

// [previous][next], each row sums to 64
const TRANSITIONS: [[u8; 7]; 7] = [
    [2, 10, 12, 10, 10, 10, 10],
    [12, 2, 10, 10, 10, 10, 10],
    [10, 12, 2, 10, 10, 10, 10],
    [10, 10, 10, 4, 10, 10, 10],
    [10, 10, 10, 10, 4, 10, 10],
    [12, 10, 10, 10, 10, 2, 10],
    [10, 10, 10, 10, 12, 10, 2],
];

// hacked ROM that starves the I piece
const TRANSITIONS_DROUGHT: [[u8; 7]; 7] = [
    [3, 11, 14, 11, 11, 11, 3],
    [14, 3, 11, 11, 11, 11, 3],
    [11, 14, 3, 11, 11, 11, 3],
    [11, 11, 11, 6, 11, 11, 3],
    [11, 11, 11, 11, 6, 11, 3],
    [14, 11, 11, 11, 11, 3, 3],
    [10, 10, 10, 10, 12, 10, 2],
];

fn rng_index(piece: Piece) -> usize {
    match piece {
        Piece::T => 0,
        Piece::J => 1,
        Piece::Z => 2,
        Piece::O => 3,
        Piece::S => 4,
        Piece::L => 5,
        Piece::I => 6,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct PieceRngModel {
    pub drought: bool,
}

impl PieceRngModel {
    pub fn standard() -> Self {
        Self { drought: false }
    }

    fn table(&self) -> &'static [[u8; 7]; 7] {
        if self.drought {
            &TRANSITIONS_DROUGHT
        } else {
            &TRANSITIONS
        }
    }

    /// P(next | previous).
    pub fn probability(&self, previous: Piece, next: Piece) -> f64 {
        self.table()[rng_index(previous)][rng_index(next)] as f64 / ROW_TOTAL
    }

    /// Probability of `sequence` following `previous`.
    pub fn sequence_probability(&self, previous: Piece, sequence: &[Piece]) -> f64 {
        let mut prev = previous;
        let mut p = 1.0;
        for &piece in sequence {
            p *= self.probability(prev, piece);
            prev = piece;
        }
        p
    }

    /// All 7^len piece sequences, in table order.
    pub fn all_sequences(len: usize) -> Vec<Vec<Piece>> {
        let mut sequences = vec![Vec::with_capacity(len)];
        for _ in 0..len {
            sequences = sequences
                .into_iter()
                .flat_map(|seq| {
                    RNG_ORDER.into_iter().map(move |p| {
                        let mut next = seq.clone();
                        next.push(p);
                        next
                    })
                })
                .collect();
        }
        sequences
    }

    /// Draws the piece after `previous`.
    ///
    /// The standard randomizer rolls eight slots, the last a no-op; a no-op or
    /// a repeat of `previous` rerolls once over the seven pieces. The drought
    /// ROM draws straight from its table.
    pub fn sample(&self, previous: Piece, rng: &mut fastrand::Rng) -> Piece {
        if self.drought {
            let row = &self.table()[rng_index(previous)];
            let mut roll = rng.u8(0..64);
            for (i, &weight) in row.iter().enumerate() {
                if roll < weight {
                    return RNG_ORDER[i];
                }
                roll -= weight;
            }
            return RNG_ORDER[6];
        }
        let roll = rng.usize(0..8);
        if roll < 7 && RNG_ORDER[roll] != previous {
            return RNG_ORDER[roll];
        }
        RNG_ORDER[rng.usize(0..7)]
    }

    /// A sampled sequence of `len` pieces following `first`.
    pub fn sample_sequence(&self, first: Piece, len: usize, rng: &mut fastrand::Rng) -> Vec<Piece> {
        let mut out = Vec::with_capacity(len);
        let mut prev = first;
        for _ in 0..len {
            prev = self.sample(prev, rng);
            out.push(prev);
        }
        out
    }
}
