//! A placement together with the placements searched after it.

use rabbit_core::{Piece, Possibility};
use serde::{Deserialize, Serialize};

/// One hypothetical piece line and what it was worth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HypotheticalOutcome {
    pub sequence: Vec<Piece>,
    pub probability: f64,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PossibilityChain {
    pub possibility: Possibility,
    pub inner: Option<Box<PossibilityChain>>,
    /// Line-clear value of this placement alone.
    pub partial_value: f64,
    /// Full value of the deepest placement plus the partials above it.
    pub total_value: f64,
    pub expected_value: Option<f64>,
    pub outcomes: Vec<HypotheticalOutcome>,
    pub explanation: String,
}

impl PossibilityChain {
    /// A chain of one placement valued on its own.
    pub fn single(possibility: Possibility, partial_value: f64, value: f64, explanation: String) -> Self {
        Self {
            possibility,
            inner: None,
            partial_value,
            total_value: value,
            expected_value: None,
            outcomes: Vec::new(),
            explanation,
        }
    }

    /// `outer` followed by `inner`, valued as the inner total plus the outer clear.
    pub fn extend(outer: Possibility, outer_partial: f64, inner: PossibilityChain) -> Self {
        Self {
            possibility: outer,
            total_value: inner.total_value + outer_partial,
            explanation: inner.explanation.clone(),
            inner: Some(Box::new(inner)),
            partial_value: outer_partial,
            expected_value: None,
            outcomes: Vec::new(),
        }
    }

    /// The value chains are ranked by.
    pub fn score(&self) -> f64 {
        self.expected_value.unwrap_or(self.total_value)
    }

    pub fn depth(&self) -> usize {
        1 + self.inner.as_ref().map_or(0, |inner| inner.depth())
    }

    pub fn leaf(&self) -> &PossibilityChain {
        match &self.inner {
            Some(inner) => inner.leaf(),
            None => self,
        }
    }

    /// Sum of the line-clear partials along the chain.
    pub fn partial_sum(&self) -> f64 {
        self.partial_value + self.inner.as_ref().map_or(0.0, |inner| inner.partial_sum())
    }

    pub fn lines_cleared(&self) -> u32 {
        self.possibility.lines_cleared as u32 + self.inner.as_ref().map_or(0, |inner| inner.lines_cleared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rabbit_core::{Board, BoardSurface, InputClass, InputSequence, Placement, DEFAULT_WELL_COLUMN};

    fn possibility(piece: Piece, lines_cleared: u8) -> Possibility {
        let board = Board::new();
        Possibility {
            piece,
            placement: Placement {
                rotation: 0,
                x_offset: 0,
                lock_y: 18,
            },
            x: 3,
            inputs: InputSequence::new(),
            board_after: board,
            lines_cleared,
            surface: BoardSurface::analyze(&board, DEFAULT_WELL_COLUMN),
            class: InputClass::Tap,
            input_cost: 0.0,
        }
    }

    #[test]
    fn test_extend_adds_outer_partial() {
        let inner = PossibilityChain::single(possibility(Piece::I, 4), 28.0, 40.0, String::new());
        let chain = PossibilityChain::extend(possibility(Piece::T, 1), -2.2, inner);
        assert!((chain.total_value - 37.8).abs() < 1e-12);
        assert!((chain.partial_sum() - 25.8).abs() < 1e-12);
        assert_eq!(chain.depth(), 2);
        assert_eq!(chain.leaf().possibility.piece, Piece::I);
        assert_eq!(chain.lines_cleared(), 5);
    }

    #[test]
    fn test_score_prefers_expected_value() {
        let mut chain = PossibilityChain::single(possibility(Piece::O, 0), 0.0, 5.0, String::new());
        assert_eq!(chain.score(), 5.0);
        chain.expected_value = Some(-3.0);
        assert_eq!(chain.score(), -3.0);
    }
}
