use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Generation counter and tile accounting shared between the control
/// thread and the workers.
///
/// Every viewport change advances the generation; tiles are tagged with the
/// generation they were scheduled under, and workers drop any tile whose
/// tag is stale instead of painting an outdated view over a newer one.
/// The queued/done counters let the presenter ask whether all scheduled
/// work has drained.
#[derive(Debug, Default)]
pub struct RenderProgress {
    generation: AtomicU64,
    tiles_queued: AtomicUsize,
    tiles_done: AtomicUsize,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// The generation current tiles must carry to be painted.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate all in-flight and queued tiles; returns the new
    /// generation to tag the replacement work with.
    pub fn invalidate(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record one scheduled tile.
    pub fn tile_queued(&self) {
        self.tiles_queued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one finished tile — painted, dropped as stale, or failed.
    pub fn tile_done(&self) {
        self.tiles_done.fetch_add(1, Ordering::Relaxed);
    }

    /// `(done, queued)` since session start.
    pub fn counts(&self) -> (usize, usize) {
        (
            self.tiles_done.load(Ordering::Relaxed),
            self.tiles_queued.load(Ordering::Relaxed),
        )
    }

    /// True when every scheduled tile has been consumed.
    pub fn idle(&self) -> bool {
        let (done, queued) = self.counts();
        done >= queued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_at_generation_zero() {
        let p = RenderProgress::new();
        assert_eq!(p.generation(), 0);
        assert!(p.idle());
    }

    #[test]
    fn invalidate_advances_generation() {
        let p = RenderProgress::new();
        assert_eq!(p.invalidate(), 1);
        assert_eq!(p.invalidate(), 2);
        assert_eq!(p.generation(), 2);
    }

    #[test]
    fn idle_tracks_queued_vs_done() {
        let p = RenderProgress::new();
        p.tile_queued();
        p.tile_queued();
        assert!(!p.idle());
        p.tile_done();
        assert!(!p.idle());
        p.tile_done();
        assert!(p.idle());
        assert_eq!(p.counts(), (2, 2));
    }
}
