pub mod bigreal;
pub mod error;
pub mod escape;
pub mod precision;
pub mod real;
pub mod rect;
pub mod viewport;

// Re-export primary types for convenience.
pub use bigreal::BigReal;
pub use error::CoreError;
pub use escape::{escape_time, ESCAPE_BOUND};
pub use precision::recommended_precision_bits;
pub use real::Real;
pub use rect::{PixelRect, PlaneRect, PlaneRegion};
pub use viewport::{
    PanDirection, PanOutcome, PrecisionMode, RedrawRegion, ViewportMapping, ZoomDirection,
};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
