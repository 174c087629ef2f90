use tracing::debug;

use fractile_core::{PixelRect, PlaneRect, PlaneRegion, Real, RedrawRegion};

use crate::progress::RenderProgress;
use crate::queue::{Task, TaskQueue, TileTask};

/// Widest leaf tile emitted, in pixels.
pub const MAX_TILE_WIDTH: u32 = 64;
/// Tallest leaf tile emitted, in pixels.
pub const MAX_TILE_HEIGHT: u32 = 36;

/// Recursively subdivide a redraw region into leaf tiles and enqueue one
/// task per leaf. Returns the number of leaves submitted.
///
/// Bisection is width-first: any rectangle wider than [`MAX_TILE_WIDTH`] is
/// split into floor/ceiling halves before height is even considered. Equal
/// static partitions would leave workers idle near the image edges, where
/// points escape almost immediately, while the interior saturates at the
/// iteration cap; many small independently scheduled tiles approximate
/// work-stealing balance over the one shared FIFO.
///
/// The leaves exactly tile the request — no gaps, no overlaps, no
/// zero-area leaf — which is what lets the workers paint the canvas
/// without a lock.
pub fn submit(
    queue: &TaskQueue,
    progress: &RenderProgress,
    redraw: RedrawRegion,
    max_iterations: u32,
    generation: u64,
) -> usize {
    if redraw.pixels.is_empty() {
        return 0;
    }
    let leaves = match redraw.plane {
        PlaneRegion::Native(rect) => subdivide(
            queue,
            progress,
            rect,
            redraw.pixels,
            max_iterations,
            generation,
        ),
        PlaneRegion::Deep(rect) => subdivide(
            queue,
            progress,
            rect,
            redraw.pixels,
            max_iterations,
            generation,
        ),
    };
    debug!(
        leaves,
        x = redraw.pixels.x,
        y = redraw.pixels.y,
        width = redraw.pixels.width,
        height = redraw.pixels.height,
        generation,
        "scheduled redraw"
    );
    leaves
}

fn subdivide<T: Real>(
    queue: &TaskQueue,
    progress: &RenderProgress,
    plane: PlaneRect<T>,
    pixels: PixelRect,
    max_iterations: u32,
    generation: u64,
) -> usize
where
    PlaneRect<T>: Into<PlaneRegion>,
{
    if pixels.width > MAX_TILE_WIDTH {
        let left_w = pixels.width / 2;
        let right_w = pixels.width - left_w;
        let ratio = left_w as f64 / pixels.width as f64;
        // Child plane bounds are fresh values at the parent's working
        // precision; splitting never changes precision.
        let left_plane = plane.sub_rect(0.0, 0.0, ratio, 1.0);
        let right_plane = plane.sub_rect(ratio, 0.0, 1.0 - ratio, 1.0);
        let left_px = PixelRect::new(pixels.x, pixels.y, left_w, pixels.height);
        let right_px = PixelRect::new(pixels.x + left_w, pixels.y, right_w, pixels.height);
        subdivide(queue, progress, left_plane, left_px, max_iterations, generation)
            + subdivide(queue, progress, right_plane, right_px, max_iterations, generation)
    } else if pixels.height > MAX_TILE_HEIGHT {
        let top_h = pixels.height / 2;
        let bottom_h = pixels.height - top_h;
        let ratio = top_h as f64 / pixels.height as f64;
        let top_plane = plane.sub_rect(0.0, 0.0, 1.0, ratio);
        let bottom_plane = plane.sub_rect(0.0, ratio, 1.0, 1.0 - ratio);
        let top_px = PixelRect::new(pixels.x, pixels.y, pixels.width, top_h);
        let bottom_px = PixelRect::new(pixels.x, pixels.y + top_h, pixels.width, bottom_h);
        subdivide(queue, progress, top_plane, top_px, max_iterations, generation)
            + subdivide(queue, progress, bottom_plane, bottom_px, max_iterations, generation)
    } else {
        progress.tile_queued();
        queue.submit(Task::RenderTile(TileTask {
            region: plane.into(),
            pixels,
            max_iterations,
            generation,
        }));
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractile_core::ViewportMapping;

    fn drain(queue: &TaskQueue) -> Vec<TileTask> {
        let mut tiles = Vec::new();
        while !queue.is_empty() {
            match queue.take() {
                Task::RenderTile(t) => tiles.push(t),
                Task::Exit => panic!("scheduler never emits Exit"),
            }
        }
        tiles
    }

    fn schedule(px_width: u32, px_height: u32) -> Vec<TileTask> {
        let queue = TaskQueue::new();
        let progress = RenderProgress::new();
        let viewport = ViewportMapping::default_view(px_width, px_height).unwrap();
        let leaves = submit(&queue, &progress, viewport.full_redraw(), 128, 0);
        let tiles = drain(&queue);
        assert_eq!(tiles.len(), leaves);
        assert_eq!(progress.counts().1, leaves);
        tiles
    }

    #[test]
    fn trivial_request_yields_one_leaf() {
        let tiles = schedule(64, 36);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].pixels, PixelRect::new(0, 0, 64, 36));

        let tiles = schedule(40, 20);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].pixels, PixelRect::new(0, 0, 40, 20));
    }

    #[test]
    fn one_split_each_axis_yields_four_leaves() {
        let tiles = schedule(128, 72);
        assert_eq!(tiles.len(), 4);
        let mut rects: Vec<_> = tiles.iter().map(|t| t.pixels).collect();
        rects.sort_by_key(|r| (r.y, r.x));
        assert_eq!(
            rects,
            vec![
                PixelRect::new(0, 0, 64, 36),
                PixelRect::new(64, 0, 64, 36),
                PixelRect::new(0, 36, 64, 36),
                PixelRect::new(64, 36, 64, 36),
            ]
        );
    }

    #[test]
    fn width_splits_before_height() {
        // 130 wide: floor/ceiling halves are 65 and 65, each split again.
        let tiles = schedule(130, 10);
        let widths: Vec<u32> = {
            let mut r: Vec<_> = tiles.iter().map(|t| t.pixels).collect();
            r.sort_by_key(|p| p.x);
            r.iter().map(|p| p.width).collect()
        };
        assert_eq!(widths, vec![32, 33, 32, 33]);
        assert!(tiles.iter().all(|t| t.pixels.height == 10));
    }

    #[test]
    fn partition_covers_exactly_without_overlap() {
        for (w, h) in [(1280, 800), (641, 403), (65, 37), (200, 150)] {
            let tiles = schedule(w, h);
            let mut covered = vec![false; (w * h) as usize];
            for t in &tiles {
                assert!(t.pixels.width <= MAX_TILE_WIDTH);
                assert!(t.pixels.height <= MAX_TILE_HEIGHT);
                assert!(!t.pixels.is_empty(), "no zero-area leaf");
                for py in t.pixels.y..t.pixels.y + t.pixels.height {
                    for px in t.pixels.x..t.pixels.x + t.pixels.width {
                        let idx = (py * w + px) as usize;
                        assert!(!covered[idx], "pixel ({px}, {py}) covered twice");
                        covered[idx] = true;
                    }
                }
            }
            assert!(covered.iter().all(|&c| c), "gap in {w}×{h} partition");
        }
    }

    #[test]
    fn leaf_planes_match_parent_affine_map() {
        const EPSILON: f64 = 1e-12;
        let viewport = ViewportMapping::default_view(256, 144).unwrap();
        let (vx, vy, vw, vh) = viewport.approx_bounds();
        let queue = TaskQueue::new();
        let progress = RenderProgress::new();
        submit(&queue, &progress, viewport.full_redraw(), 128, 0);

        for tile in drain(&queue) {
            let (tx, ty, tw, th) = tile.region.approx();
            let expect_x = vx + vw * tile.pixels.x as f64 / 256.0;
            let expect_y = vy + vh * tile.pixels.y as f64 / 144.0;
            let expect_w = vw * tile.pixels.width as f64 / 256.0;
            let expect_h = vh * tile.pixels.height as f64 / 144.0;
            assert!((tx - expect_x).abs() < EPSILON);
            assert!((ty - expect_y).abs() < EPSILON);
            assert!((tw - expect_w).abs() < EPSILON);
            assert!((th - expect_h).abs() < EPSILON);
        }
    }

    #[test]
    fn deep_mode_leaves_keep_working_precision() {
        let mut viewport = ViewportMapping::default_view(128, 72).unwrap();
        viewport.toggle_precision(192).unwrap();
        let queue = TaskQueue::new();
        let progress = RenderProgress::new();
        let leaves = submit(&queue, &progress, viewport.full_redraw(), 128, 3);
        assert_eq!(leaves, 4);
        for tile in drain(&queue) {
            assert_eq!(tile.generation, 3);
            match tile.region {
                PlaneRegion::Deep(r) => {
                    assert_eq!(r.x.precision_bits(), 192);
                    assert_eq!(r.w.precision_bits(), 192);
                }
                PlaneRegion::Native(_) => panic!("leaf dropped to native precision"),
            }
        }
    }

    #[test]
    fn empty_redraw_schedules_nothing() {
        let viewport = ViewportMapping::default_view(64, 36).unwrap();
        let queue = TaskQueue::new();
        let progress = RenderProgress::new();
        let redraw = fractile_core::RedrawRegion {
            pixels: PixelRect::new(0, 0, 0, 36),
            plane: viewport.region().clone(),
        };
        assert_eq!(submit(&queue, &progress, redraw, 128, 0), 0);
        assert!(queue.is_empty());
    }
}
