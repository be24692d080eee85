//! Surface-shape rating: the ranked-surface lookup table and its fallback.

use std::path::Path;
use std::sync::Arc;

use rabbit_core::{RabbitError, RabbitResult};
use tracing::{info, warn};

/// Number of surface patterns: 8 differences, 9 values each.
pub const RANK_TABLE_ENTRIES: usize = 9usize.pow(8);

const TOKEN_LEN: usize = 2;
const MAX_DIFF: i32 = 4;

/// Base-9 index of the clamped column differences, first difference most significant.
pub fn surface_index(surface: &[i32; 9]) -> usize {
    surface.windows(2).fold(0, |index, pair| {
        let diff = (pair[1] - pair[0]).clamp(-MAX_DIFF, MAX_DIFF) + MAX_DIFF;
        index * 9 + diff as usize
    })
}

/// Shifts every column after an adjacent gap wider than 4 back toward its
/// neighbour, returning the corrected heights and the total height removed.
pub fn correct_for_extreme_gaps(surface: &[u8; 9]) -> ([i32; 9], i32) {
    let mut corrected = surface.map(i32::from);
    let mut excess_total = 0;
    for i in 1..corrected.len() {
        let diff = corrected[i] - corrected[i - 1];
        if diff.abs() > MAX_DIFF {
            let excess = diff.abs() - MAX_DIFF;
            let shift = if diff > 0 { -excess } else { excess };
            for h in &mut corrected[i..] {
                *h += shift;
            }
            excess_total += excess;
        }
    }
    (corrected, excess_total)
}

/// The ranked-surface table, shared read-only once loaded.
#[derive(Clone, Debug)]
pub struct RankTable {
    tokens: Arc<[u8]>,
}

impl RankTable {
    pub fn parse(text: &str) -> RabbitResult<Self> {
        let text = text.trim_end();
        if text.len() != RANK_TABLE_ENTRIES * TOKEN_LEN {
            return Err(RabbitError::RankTable(format!(
                "expected {} characters, found {}",
                RANK_TABLE_ENTRIES * TOKEN_LEN,
                text.len()
            )));
        }
        if let Some(pos) = text.bytes().position(|b| !b.is_ascii_alphanumeric()) {
            return Err(RabbitError::RankTable(format!(
                "non base-36 character at offset {pos}"
            )));
        }
        Ok(Self {
            tokens: Arc::from(text.as_bytes()),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> RabbitResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table = Self::parse(&text)?;
        info!(path = %path.display(), entries = RANK_TABLE_ENTRIES, "loaded rank table");
        Ok(table)
    }

    pub fn value_at(&self, index: usize) -> f64 {
        let start = index * TOKEN_LEN;
        let token = &self.tokens[start..start + TOKEN_LEN];
        let raw = token
            .iter()
            .fold(0u32, |acc, &b| acc * 36 + (b as char).to_digit(36).unwrap_or(0));
        raw as f64 / 10.0 - 1.0
    }

    pub fn rate(&self, surface: &[i32; 9]) -> f64 {
        self.value_at(surface_index(surface))
    }
}

/// Source of the surface-shape score.
#[derive(Clone, Debug)]
pub enum SurfaceRater {
    Ranked(RankTable),
    /// Smoothness heuristic used when no table is available.
    Flatness,
}

impl SurfaceRater {
    pub fn flatness() -> Self {
        warn!("no rank table supplied, rating surfaces by flatness");
        SurfaceRater::Flatness
    }

    pub fn rate(&self, surface: &[i32; 9]) -> f64 {
        match self {
            SurfaceRater::Ranked(table) => table.rate(surface),
            SurfaceRater::Flatness => flatness_rating(surface),
        }
    }
}

fn flatness_rating(surface: &[i32; 9]) -> f64 {
    let mut rating = 30.0;
    for i in 0..surface.len() - 1 {
        let diff = surface[i + 1] - surface[i];
        rating -= (diff.abs() as f64).powf(1.5);
        let walled_left = i == 0 || surface[i - 1] - surface[i] >= 3;
        if diff >= 3 && walled_left {
            rating -= 25.0;
        }
    }
    rating
}
