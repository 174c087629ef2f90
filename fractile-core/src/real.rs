/// Shared arithmetic capability of the two numeric backends.
///
/// The tiling scheduler and the escape-time evaluator are written once
/// against this trait; `f64` covers the machine-precision path and
/// [`BigReal`](crate::BigReal) the arbitrary-precision path. The capability
/// set is deliberately small: everything the render path needs reduces to
/// add/sub/mul, squaring, scaling by a machine ratio, and a bound check.
pub trait Real: Clone + PartialOrd + Send + Sync + 'static {
    /// Materialize `v` in the same representation (and working precision)
    /// as `self`.
    fn constant(&self, v: f64) -> Self;

    /// Truncate to machine precision, discarding any extra bits.
    fn to_f64(&self) -> f64;

    fn add(&self, rhs: &Self) -> Self;

    fn sub(&self, rhs: &Self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    /// `self * self`. Backends may specialize this over `mul`.
    fn square(&self) -> Self;

    /// Multiply by a machine-precision ratio. Used for pixel-ratio
    /// interpolation when subdividing plane rectangles; the ratio itself
    /// never needs more than `f64` precision.
    fn scale(&self, factor: f64) -> Self;

    /// `self >= bound`, evaluated in the backend's own comparison.
    fn exceeds(&self, bound: f64) -> bool;
}

impl Real for f64 {
    #[inline]
    fn constant(&self, v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    #[inline]
    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        self * rhs
    }

    #[inline]
    fn square(&self) -> Self {
        self * self
    }

    #[inline]
    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    #[inline]
    fn exceeds(&self, bound: f64) -> bool {
        *self >= bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_arithmetic() {
        let a: f64 = 1.5;
        let b: f64 = -0.5;
        assert_eq!(a.add(&b), 1.0);
        assert_eq!(a.sub(&b), 2.0);
        assert_eq!(a.mul(&b), -0.75);
        assert_eq!(b.square(), 0.25);
        assert_eq!(a.scale(2.0), 3.0);
    }

    #[test]
    fn native_constant_ignores_receiver() {
        let a: f64 = 123.0;
        assert_eq!(a.constant(4.0), 4.0);
    }

    #[test]
    fn native_bound_check() {
        assert!(16.0f64.exceeds(16.0));
        assert!(17.0f64.exceeds(16.0));
        assert!(!15.9f64.exceeds(16.0));
    }
}
