use thiserror::Error;

/// Errors originating from the core numeric and navigation layer.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },

    #[error("invalid pan fraction: {0} (must be in (0, 1])")]
    InvalidPanFraction(f64),

    #[error("invalid zoom percentage: {0} (must be in (0, 1))")]
    InvalidZoomPct(f64),

    #[error("invalid working precision: {0} bits (must be >= 64)")]
    InvalidPrecision(usize),

    #[error("non-finite coordinate: {0}")]
    NonFiniteCoordinate(f64),
}
