//! Error type shared by every rabbit crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RabbitError {
    #[error("{name} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("unknown piece: {0:?}")]
    UnknownPiece(String),
    #[error("invalid input timeline: {0}")]
    InvalidTimeline(String),
    #[error("invalid input sequence: {0}")]
    InvalidInput(String),
    #[error("invalid board: {0}")]
    InvalidBoard(String),
    #[error("evaluation factor {0} is NaN")]
    NanFactor(&'static str),
    #[error("unknown parameter: {0}")]
    UnknownParam(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("rank table error: {0}")]
    RankTable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type RabbitResult<T> = Result<T, RabbitError>;

/// Fails with `OutOfRange` unless `min <= value <= max`.
pub fn ensure_range(name: &'static str, value: i64, min: i64, max: i64) -> RabbitResult<()> {
    if value < min || value > max {
        return Err(RabbitError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_range_bounds_inclusive() {
        assert!(ensure_range("level", 0, 0, 999).is_ok());
        assert!(ensure_range("level", 999, 0, 999).is_ok());
        let err = ensure_range("level", 1000, 0, 999).unwrap_err();
        assert!(matches!(err, RabbitError::OutOfRange { name: "level", .. }));
        assert_eq!(err.to_string(), "level out of range: 1000 (expected 0..=999)");
    }
}
