use dashu_base::Approximation;
use dashu_float::FBig;

use crate::error::CoreError;
use crate::real::Real;

/// Minimum working precision accepted for the arbitrary backend.
pub const MIN_PRECISION_BITS: usize = 64;

/// Arbitrary-precision real number with a fixed working precision.
///
/// Wraps a binary [`FBig`] whose precision is set once at construction —
/// the session picks a bit width when switching to the deep-zoom backend
/// and every derived value (tile bounds, iteration state) stays at that
/// width. Conversion back to `f64` truncates.
#[derive(Clone, Debug)]
pub struct BigReal {
    value: FBig,
    bits: usize,
}

/// Collapse an exact-or-inexact result to its value; rounding to the
/// working precision is the expected behaviour here.
fn rounded<T, E>(approx: Approximation<T, E>) -> T {
    match approx {
        Approximation::Exact(v) => v,
        Approximation::Inexact(v, _) => v,
    }
}

fn fbig_at(v: f64, bits: usize) -> FBig {
    debug_assert!(v.is_finite(), "viewport invariants keep coordinates finite");
    let base = if v == 0.0 {
        FBig::ZERO
    } else {
        match FBig::try_from(v) {
            Ok(b) => b,
            // Non-finite input; unreachable under viewport invariants.
            Err(_) => FBig::ZERO,
        }
    };
    rounded(base.with_precision(bits))
}

impl BigReal {
    /// Create a value from `f64` at an explicit working precision.
    pub fn from_f64(v: f64, bits: usize) -> crate::Result<Self> {
        if bits < MIN_PRECISION_BITS {
            return Err(CoreError::InvalidPrecision(bits));
        }
        if !v.is_finite() {
            return Err(CoreError::NonFiniteCoordinate(v));
        }
        Ok(Self {
            value: fbig_at(v, bits),
            bits,
        })
    }

    /// The working precision in bits.
    pub fn precision_bits(&self) -> usize {
        self.bits
    }
}

impl PartialEq for BigReal {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for BigReal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for BigReal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Real for BigReal {
    fn constant(&self, v: f64) -> Self {
        Self {
            value: fbig_at(v, self.bits),
            bits: self.bits,
        }
    }

    fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }

    fn add(&self, rhs: &Self) -> Self {
        Self {
            value: &self.value + &rhs.value,
            bits: self.bits,
        }
    }

    fn sub(&self, rhs: &Self) -> Self {
        Self {
            value: &self.value - &rhs.value,
            bits: self.bits,
        }
    }

    fn mul(&self, rhs: &Self) -> Self {
        Self {
            value: &self.value * &rhs.value,
            bits: self.bits,
        }
    }

    fn square(&self) -> Self {
        Self {
            value: &self.value * &self.value,
            bits: self.bits,
        }
    }

    fn scale(&self, factor: f64) -> Self {
        Self {
            value: &self.value * &fbig_at(factor, self.bits),
            bits: self.bits,
        }
    }

    fn exceeds(&self, bound: f64) -> bool {
        self.value >= fbig_at(bound, self.bits)
    }
}
