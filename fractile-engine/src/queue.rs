use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

use fractile_core::{PixelRect, PlaneRegion};

/// One leaf tile of rendering work.
///
/// Immutable once created; ownership transfers to whichever worker dequeues
/// it. The plane rectangle is carried in the precision representation the
/// viewport was in when the tile was scheduled.
#[derive(Debug, Clone)]
pub struct TileTask {
    pub region: PlaneRegion,
    pub pixels: PixelRect,
    pub max_iterations: u32,
    /// Viewport generation this tile belongs to; workers drop stale tiles.
    pub generation: u64,
}

/// A unit of work for the pool: render one tile, or terminate.
#[derive(Debug, Clone)]
pub enum Task {
    RenderTile(TileTask),
    /// Instructs the receiving worker to exit its loop immediately,
    /// without draining the rest of the queue.
    Exit,
}

/// Thread-safe FIFO of tasks: one mutex, one condition variable.
///
/// Producers never block; consumers block in [`take`](Self::take) while the
/// queue is empty. FIFO order is total relative to a single producer
/// stream. Growth is unbounded but self-limited in practice by the tile
/// count of one viewport, since subdivision is synchronous and finite.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
    ready: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        // A poisoned queue only means a producer panicked mid-push; the
        // structure itself is still coherent.
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a task and wake one waiting worker.
    pub fn submit(&self, task: Task) {
        self.lock().push_back(task);
        self.ready.notify_one();
    }

    /// Pop the oldest task, blocking while the queue is empty.
    pub fn take(&self) -> Task {
        let mut tasks = self.lock();
        loop {
            if let Some(task) = tasks.pop_front() {
                return task;
            }
            // Loop to tolerate spurious wakeups.
            tasks = self
                .ready
                .wait(tasks)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
