/// Tile painted in place of a failed evaluation, so one bad tile is visible
/// instead of killing its worker.
pub const ERROR_SENTINEL: [u8; 3] = [255, 0, 255];

/// Maps an escape-time count to a displayable color.
///
/// This is the seam towards the presentation layer; the engine only ever
/// calls [`color`](Self::color) per pixel from worker threads.
pub trait ColorMapper: Send + Sync {
    fn color(&self, count: u32, max_iter: u32) -> [u8; 3];
}

/// The stock mapper: hue sweeps the full circle with the iteration count,
/// full saturation and value, in-set points drawn black.
#[derive(Debug, Clone, Copy, Default)]
pub struct HueRamp {
    /// Degrees added to every hue, wrapped at 360.
    pub hue_offset: f64,
}

impl ColorMapper for HueRamp {
    fn color(&self, count: u32, max_iter: u32) -> [u8; 3] {
        if count >= max_iter {
            return [0, 0, 0];
        }
        let hue = (360.0 * count as f64 / max_iter as f64 + self.hue_offset).rem_euclid(360.0);
        hsv_to_rgb(hue, 1.0, 1.0)
    }
}

/// Standard HSV→RGB conversion; `h` in degrees `[0, 360)`, `s`/`v` in
/// `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let c = v * s;
    let sector = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ]
}
