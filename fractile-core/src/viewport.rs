use tracing::debug;

use crate::bigreal::BigReal;
use crate::error::CoreError;
use crate::real::Real;
use crate::rect::{PixelRect, PlaneRect, PlaneRegion};

/// Which numeric backend the viewport currently stores its bounds in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionMode {
    Native,
    ArbitraryPrecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// A pixel rectangle that needs re-rendering, paired with the plane region
/// it maps to under the current viewport.
#[derive(Debug, Clone)]
pub struct RedrawRegion {
    pub pixels: PixelRect,
    pub plane: PlaneRegion,
}

/// What a pan did to the canvas: the block-copy shift to apply to retained
/// pixels, and the vacated strip that must be re-rendered.
///
/// `redraw` is `None` when the pan rounds to a zero-pixel shift.
#[derive(Debug, Clone)]
pub struct PanOutcome {
    /// Content displacement in pixels `(dx, dy)`; positive moves right/down.
    pub shift: (i32, i32),
    pub redraw: Option<RedrawRegion>,
}

/// The visible plane rectangle bound to a fixed pixel canvas.
///
/// Bounds are stored in the representation of the active precision mode.
/// The aspect ratio is fixed at construction and preserved by every pan and
/// zoom; it is never recomputed against the canvas.
#[derive(Debug, Clone)]
pub struct ViewportMapping {
    region: PlaneRegion,
    px_width: u32,
    px_height: u32,
}

impl ViewportMapping {
    /// Create a native-precision viewport with explicit plane bounds.
    pub fn new(x: f64, y: f64, w: f64, h: f64, px_width: u32, px_height: u32) -> crate::Result<Self> {
        if px_width == 0 || px_height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("canvas must be non-empty, got {px_width}×{px_height}"),
            });
        }
        if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
            return Err(CoreError::InvalidViewport {
                reason: "plane bounds must be finite".into(),
            });
        }
        if w <= 0.0 || h <= 0.0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("plane extent must be positive, got {w}×{h}"),
            });
        }
        Ok(Self {
            region: PlaneRegion::Native(PlaneRect { x, y, w, h }),
            px_width,
            px_height,
        })
    }

    /// The stock startup view: real axis from −2.5 to 1.5, imaginary span
    /// derived from the canvas aspect ratio and centred on zero.
    pub fn default_view(px_width: u32, px_height: u32) -> crate::Result<Self> {
        let w = 4.0;
        let h = w * px_height as f64 / px_width.max(1) as f64;
        Self::new(-2.5, -h / 2.0, w, h, px_width, px_height)
    }

    pub fn precision_mode(&self) -> PrecisionMode {
        match self.region {
            PlaneRegion::Native(_) => PrecisionMode::Native,
            PlaneRegion::Deep(_) => PrecisionMode::ArbitraryPrecision,
        }
    }

    pub fn region(&self) -> &PlaneRegion {
        &self.region
    }

    pub fn px_width(&self) -> u32 {
        self.px_width
    }

    pub fn px_height(&self) -> u32 {
        self.px_height
    }

    /// Machine-precision `(x, y, w, h)` of the plane bounds.
    pub fn approx_bounds(&self) -> (f64, f64, f64, f64) {
        self.region.approx()
    }

    /// The plane region a pixel rectangle maps to under this viewport's
    /// linear pixel→plane map.
    pub fn plane_of(&self, pixels: &PixelRect) -> PlaneRegion {
        let fx = pixels.x as f64 / self.px_width as f64;
        let fy = pixels.y as f64 / self.px_height as f64;
        let fw = pixels.width as f64 / self.px_width as f64;
        let fh = pixels.height as f64 / self.px_height as f64;
        match &self.region {
            PlaneRegion::Native(r) => PlaneRegion::Native(r.sub_rect(fx, fy, fw, fh)),
            PlaneRegion::Deep(r) => PlaneRegion::Deep(r.sub_rect(fx, fy, fw, fh)),
        }
    }

    /// The whole canvas as a redraw request.
    pub fn full_redraw(&self) -> RedrawRegion {
        RedrawRegion {
            pixels: PixelRect::new(0, 0, self.px_width, self.px_height),
            plane: self.region.clone(),
        }
    }

    /// Shift the view by `fraction` of its extent in `direction`.
    ///
    /// Returns the block-copy shift for retained pixels and the vacated
    /// strip to re-render. Only the strip needs evaluation; everything else
    /// is relocated by the copy.
    pub fn pan(&mut self, direction: PanDirection, fraction: f64) -> crate::Result<PanOutcome> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(CoreError::InvalidPanFraction(fraction));
        }

        let (fx, fy) = match direction {
            PanDirection::Left => (-fraction, 0.0),
            PanDirection::Right => (fraction, 0.0),
            PanDirection::Up => (0.0, -fraction),
            PanDirection::Down => (0.0, fraction),
        };

        self.region = match &self.region {
            PlaneRegion::Native(r) => PlaneRegion::Native(r.shifted(fx, fy)),
            PlaneRegion::Deep(r) => PlaneRegion::Deep(r.shifted(fx, fy)),
        };

        // Content moves opposite to the view.
        let dx = -(fx * self.px_width as f64).round() as i32;
        let dy = -(fy * self.px_height as f64).round() as i32;
        debug!(?direction, fraction, dx, dy, "pan");

        let strip = self.vacated_strip(dx, dy);
        let redraw = strip.map(|pixels| RedrawRegion {
            plane: self.plane_of(&pixels),
            pixels,
        });

        Ok(PanOutcome {
            shift: (dx, dy),
            redraw,
        })
    }

    /// The pixel strip uncovered by a content shift of `(dx, dy)`, or the
    /// whole canvas when nothing is retained. `None` for a zero shift.
    fn vacated_strip(&self, dx: i32, dy: i32) -> Option<PixelRect> {
        let (pw, ph) = (self.px_width, self.px_height);
        if dx.unsigned_abs() >= pw || dy.unsigned_abs() >= ph {
            return Some(PixelRect::new(0, 0, pw, ph));
        }
        if dx > 0 {
            Some(PixelRect::new(0, 0, dx as u32, ph))
        } else if dx < 0 {
            let w = (-dx) as u32;
            Some(PixelRect::new(pw - w, 0, w, ph))
        } else if dy > 0 {
            Some(PixelRect::new(0, 0, pw, dy as u32))
        } else if dy < 0 {
            let h = (-dy) as u32;
            Some(PixelRect::new(0, ph - h, pw, h))
        } else {
            None
        }
    }

    /// Scale the view about its centre. Zoom-in shrinks the extent by
    /// `1 − pct`; zoom-out is the exact inverse. The caller re-renders the
    /// whole canvas — no pixels survive a scale change.
    pub fn zoom(&mut self, direction: ZoomDirection, pct: f64) -> crate::Result<()> {
        if !(pct > 0.0 && pct < 1.0) {
            return Err(CoreError::InvalidZoomPct(pct));
        }
        let factor = match direction {
            ZoomDirection::In => 1.0 - pct,
            ZoomDirection::Out => 1.0 / (1.0 - pct),
        };
        self.region = match &self.region {
            PlaneRegion::Native(r) => PlaneRegion::Native(r.scaled_about_center(factor)),
            PlaneRegion::Deep(r) => PlaneRegion::Deep(r.scaled_about_center(factor)),
        };
        debug!(?direction, factor, "zoom");
        Ok(())
    }

    /// Swap numeric backends in place.
    ///
    /// Native → arbitrary seeds every bound from the current `f64` values at
    /// `bits` working precision; the reverse direction truncates, discarding
    /// whatever precision was gained. No redraw is implied by the toggle.
    pub fn toggle_precision(&mut self, bits: usize) -> crate::Result<()> {
        self.region = match &self.region {
            PlaneRegion::Native(r) => PlaneRegion::Deep(PlaneRect {
                x: BigReal::from_f64(r.x, bits)?,
                y: BigReal::from_f64(r.y, bits)?,
                w: BigReal::from_f64(r.w, bits)?,
                h: BigReal::from_f64(r.h, bits)?,
            }),
            PlaneRegion::Deep(r) => PlaneRegion::Native(PlaneRect {
                x: r.x.to_f64(),
                y: r.y.to_f64(),
                w: r.w.to_f64(),
                h: r.h.to_f64(),
            }),
        };
        debug!(mode = ?self.precision_mode(), "precision toggled");
        Ok(())
    }

    /// True when the per-pixel plane step has fallen within a few ulps of
    /// the coordinate magnitude — adjacent pixels would round to the same
    /// representable `f64`, so the native backend is out of resolution.
    pub fn native_resolution_exhausted(&self) -> bool {
        let (x, _, w, _) = self.approx_bounds();
        let step = w / self.px_width as f64;
        let magnitude = x.abs().max((x + w).abs());
        step <= magnitude * f64::EPSILON * 8.0
    }
}
