//! Working-precision estimation for the arbitrary backend.
//!
//! When the session switches to arbitrary precision it has to pick a bit
//! width once; this module sizes it from the viewport so that adjacent
//! pixels stay distinguishable and iteration error has headroom.

use crate::viewport::ViewportMapping;

/// Guard bits against rounding-error accumulation in the iteration loop.
const SAFETY_BITS: u32 = 64;

/// Bit width the arbitrary backend should use for this viewport.
///
/// Counts the bits needed to separate the per-pixel plane step from the
/// coordinate magnitude, adds `log2(max_iter)` for error amplification and
/// a fixed safety margin, then rounds up to a power of two (min 64).
pub fn recommended_precision_bits(viewport: &ViewportMapping, max_iter: u32) -> usize {
    let (x, y, w, h) = viewport.approx_bounds();

    let step = (w / viewport.px_width() as f64).min(h / viewport.px_height() as f64);
    let magnitude = x
        .abs()
        .max((x + w).abs())
        .max(y.abs())
        .max((y + h).abs())
        .max(1.0);

    // Bits separating the largest coordinate from one pixel step.
    let ratio_bits = if step > 0.0 && step.is_finite() {
        (magnitude / step).log2().ceil().max(0.0) as u32
    } else {
        0
    };
    let iter_bits = if max_iter > 1 {
        (max_iter as f64).log2().ceil() as u32
    } else {
        0
    };

    ((ratio_bits + iter_bits + SAFETY_BITS) as usize)
        .next_power_of_two()
        .max(64)
}
