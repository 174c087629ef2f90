use std::sync::atomic::{AtomicU32, Ordering};

use fractile_core::PixelRect;

use crate::error::EngineError;

/// Shared RGBA pixel grid the workers paint into.
///
/// Pixels are packed `u32`s stored as relaxed atomics, so every worker can
/// write its own tile without a lock; image correctness relies on the
/// scheduler's non-overlap invariant, never on synchronization. The control
/// thread reads a [`snapshot`](Self::snapshot) to present.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Row stride in pixels. Equal to `width` here, but kept separate since
    /// the presenting surface may be padded.
    pitch: usize,
    pixels: Vec<AtomicU32>,
}

impl Canvas {
    /// Allocate a canvas cleared to opaque black.
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidCanvas { width, height });
        }
        let pitch = width as usize;
        let len = pitch * height as usize;
        let mut pixels = Vec::with_capacity(len);
        pixels.resize_with(len, || AtomicU32::new(Self::pack(0, 0, 0)));
        Ok(Self {
            width,
            height,
            pitch,
            pixels,
        })
    }

    /// Pack an opaque RGB triple into the canvas pixel format.
    #[inline]
    pub fn pack(r: u8, g: u8, b: u8) -> u32 {
        u32::from_le_bytes([r, g, b, 0xff])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.pitch + x as usize
    }

    /// Write one pixel. Lock-free; concurrent writers must target disjoint
    /// rectangles.
    #[inline]
    pub fn put(&self, x: u32, y: u32, pixel: u32) {
        self.pixels[self.index(x, y)].store(pixel, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// Fill a rectangle with one pixel value.
    pub fn fill(&self, rect: &PixelRect, pixel: u32) {
        let x_end = (rect.x + rect.width).min(self.width);
        let y_end = (rect.y + rect.height).min(self.height);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.put(x, y, pixel);
            }
        }
    }

    /// Block-copy the retained region by `(dx, dy)` pixels, same semantics
    /// as a surface self-blit during a pan. Vacated pixels keep their old
    /// contents; the caller repaints them.
    ///
    /// Runs on the control thread while no tiles for the old view should be
    /// in flight.
    pub fn shift(&self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let w = self.width as i32;
        let h = self.height as i32;

        let x_start = dx.max(0);
        let x_end = (w + dx).min(w);
        if x_start >= x_end || dx.abs() >= w || dy.abs() >= h {
            return;
        }
        let count = (x_end - x_start) as usize;
        let src_x = (x_start - dx) as usize;

        // Row order follows the copy direction so sources are read before
        // they are overwritten; a row buffer handles horizontal overlap.
        let rows: Vec<i32> = if dy > 0 {
            (0..h).rev().collect()
        } else {
            (0..h).collect()
        };
        let mut row_buf = vec![0u32; count];
        for dst_y in rows {
            let src_y = dst_y - dy;
            if src_y < 0 || src_y >= h {
                continue;
            }
            let src_row = src_y as usize * self.pitch + src_x;
            for (i, slot) in row_buf.iter_mut().enumerate() {
                *slot = self.pixels[src_row + i].load(Ordering::Relaxed);
            }
            let dst_row = dst_y as usize * self.pitch + x_start as usize;
            for (i, &px) in row_buf.iter().enumerate() {
                self.pixels[dst_row + i].store(px, Ordering::Relaxed);
            }
        }
    }

    /// Copy the pixel grid out as bytes (RGBA, row-major) for presentation.
    pub fn snapshot(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            out.extend_from_slice(&px.load(Ordering::Relaxed).to_le_bytes());
        }
        out
    }
}
