use serde::{Deserialize, Serialize};

use crate::bigreal::BigReal;
use crate::real::Real;

/// A rectangle in canvas coordinates: top-left corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle on the complex plane: top-left corner plus extent, in the
/// representation of one numeric backend.
///
/// `x` runs along the real axis; `y` increases with pixel rows, so the
/// imaginary axis is implicitly flipped. The pan/zoom/subdivision algebra
/// lives here, written once over [`Real`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneRect<T: Real> {
    pub x: T,
    pub y: T,
    pub w: T,
    pub h: T,
}

impl<T: Real> PlaneRect<T> {
    /// The sub-rectangle at fractional offset `(fx, fy)` with fractional
    /// extent `(fw, fh)` of this rectangle. Fractions are pixel ratios and
    /// never need more than machine precision; the resulting bounds are
    /// fresh allocations at the backend's working precision.
    pub fn sub_rect(&self, fx: f64, fy: f64, fw: f64, fh: f64) -> Self {
        Self {
            x: self.x.add(&self.w.scale(fx)),
            y: self.y.add(&self.h.scale(fy)),
            w: self.w.scale(fw),
            h: self.h.scale(fh),
        }
    }

    /// Map a fractional position inside the rectangle to a plane point.
    pub fn point_at(&self, fx: f64, fy: f64) -> (T, T) {
        (
            self.x.add(&self.w.scale(fx)),
            self.y.add(&self.h.scale(fy)),
        )
    }

    /// Shift the rectangle by signed fractions of its own extent.
    pub fn shifted(&self, fx: f64, fy: f64) -> Self {
        Self {
            x: self.x.add(&self.w.scale(fx)),
            y: self.y.add(&self.h.scale(fy)),
            w: self.w.clone(),
            h: self.h.clone(),
        }
    }

    /// Scale the extent by `factor` around the rectangle centre.
    pub fn scaled_about_center(&self, factor: f64) -> Self {
        // x' = x + w·(1 − factor)/2 keeps (x + w/2, y + h/2) fixed.
        let off = (1.0 - factor) / 2.0;
        Self {
            x: self.x.add(&self.w.scale(off)),
            y: self.y.add(&self.h.scale(off)),
            w: self.w.scale(factor),
            h: self.h.scale(factor),
        }
    }
}

/// A plane rectangle in whichever representation the session is running —
/// the closed sum over the two numeric backends.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaneRegion {
    Native(PlaneRect<f64>),
    Deep(PlaneRect<BigReal>),
}

impl From<PlaneRect<f64>> for PlaneRegion {
    fn from(rect: PlaneRect<f64>) -> Self {
        Self::Native(rect)
    }
}

impl From<PlaneRect<BigReal>> for PlaneRegion {
    fn from(rect: PlaneRect<BigReal>) -> Self {
        Self::Deep(rect)
    }
}

impl PlaneRegion {
    /// Machine-precision approximation of the bounds, for display and
    /// threshold checks.
    pub fn approx(&self) -> (f64, f64, f64, f64) {
        match self {
            Self::Native(r) => (r.x, r.y, r.w, r.h),
            Self::Deep(r) => (r.x.to_f64(), r.y.to_f64(), r.w.to_f64(), r.h.to_f64()),
        }
    }
}
