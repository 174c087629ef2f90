use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, error};

use fractile_core::{escape_time, PlaneRect, PlaneRegion, Real};

use crate::canvas::Canvas;
use crate::color::{ColorMapper, ERROR_SENTINEL};
use crate::error::EngineError;
use crate::progress::RenderProgress;
use crate::queue::{Task, TaskQueue, TileTask};

/// Fixed set of render threads draining the task queue.
///
/// Each worker runs an identical loop: block on `take()`, execute, repeat,
/// until it receives an [`Task::Exit`]. Workers never talk to each other;
/// the queue is the only shared mutable state besides the canvas, and
/// canvas writes stay inside each tile's own rectangle.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers against the shared queue and canvas.
    pub fn spawn(
        count: usize,
        queue: Arc<TaskQueue>,
        canvas: Arc<Canvas>,
        mapper: Arc<dyn ColorMapper>,
        progress: Arc<RenderProgress>,
    ) -> crate::Result<Self> {
        if count == 0 {
            return Err(EngineError::NoWorkers);
        }
        let mut handles = Vec::with_capacity(count);
        for id in 0..count {
            let queue = Arc::clone(&queue);
            let canvas = Arc::clone(&canvas);
            let mapper = Arc::clone(&mapper);
            let progress = Arc::clone(&progress);
            let handle = std::thread::Builder::new()
                .name(format!("render-{id}"))
                .spawn(move || worker_loop(id, &queue, &canvas, mapper.as_ref(), &progress))?;
            handles.push(handle);
        }
        Ok(Self { handles })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Shutdown rendezvous: enqueue one Exit per worker, then join every
    /// thread. Tasks already queued ahead of the sentinels still run.
    pub fn shutdown(self, queue: &TaskQueue) {
        for _ in 0..self.handles.len() {
            queue.submit(Task::Exit);
        }
        for handle in self.handles {
            // Worker bodies catch tile panics, so join only fails if the
            // loop itself died; nothing to salvage then.
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
    }
}

fn worker_loop(
    id: usize,
    queue: &TaskQueue,
    canvas: &Canvas,
    mapper: &dyn ColorMapper,
    progress: &RenderProgress,
) {
    debug!(id, "worker started");
    loop {
        match queue.take() {
            Task::Exit => {
                debug!(id, "worker exiting");
                break;
            }
            Task::RenderTile(tile) => {
                execute_tile(id, &tile, canvas, mapper, progress);
                progress.tile_done();
            }
        }
    }
}

/// Run one tile, dropping it if stale and containing any evaluation panic
/// to the tile's own rectangle.
fn execute_tile(
    id: usize,
    tile: &TileTask,
    canvas: &Canvas,
    mapper: &dyn ColorMapper,
    progress: &RenderProgress,
) {
    if tile.generation != progress.generation() {
        debug!(
            id,
            tile_generation = tile.generation,
            current = progress.generation(),
            "dropping stale tile"
        );
        return;
    }
    let outcome = catch_unwind(AssertUnwindSafe(|| paint_tile(tile, canvas, mapper)));
    if outcome.is_err() {
        error!(
            id,
            x = tile.pixels.x,
            y = tile.pixels.y,
            width = tile.pixels.width,
            height = tile.pixels.height,
            "tile evaluation panicked; painting error sentinel"
        );
        let [r, g, b] = ERROR_SENTINEL;
        canvas.fill(&tile.pixels, Canvas::pack(r, g, b));
    }
}

fn paint_tile(tile: &TileTask, canvas: &Canvas, mapper: &dyn ColorMapper) {
    match &tile.region {
        PlaneRegion::Native(rect) => {
            paint_rect(rect, tile, canvas, mapper);
        }
        PlaneRegion::Deep(rect) => {
            paint_rect(rect, tile, canvas, mapper);
        }
    }
}

/// Evaluate and store every pixel of one tile. Written once over [`Real`].
fn paint_rect<T: Real>(plane: &PlaneRect<T>, tile: &TileTask, canvas: &Canvas, mapper: &dyn ColorMapper) {
    let px = &tile.pixels;
    for row in 0..px.height {
        let fy = row as f64 / px.height as f64;
        for col in 0..px.width {
            let fx = col as f64 / px.width as f64;
            let (cre, cim) = plane.point_at(fx, fy);
            let count = escape_time(&cre, &cim, tile.max_iterations);
            let [r, g, b] = mapper.color(count, tile.max_iterations);
            canvas.put(px.x + col, px.y + row, Canvas::pack(r, g, b));
        }
    }
}
