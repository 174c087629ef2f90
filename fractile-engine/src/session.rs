use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fractile_core::{
    recommended_precision_bits, PanDirection, PrecisionMode, RedrawRegion, ViewportMapping,
    ZoomDirection,
};

use crate::canvas::Canvas;
use crate::color::{ColorMapper, HueRamp};
use crate::error::EngineError;
use crate::progress::RenderProgress;
use crate::queue::TaskQueue;
use crate::scheduler;
use crate::worker::WorkerPool;

/// Iteration caps step multiplicatively until this point, additively after.
const ITERATION_STEP_KNEE: u32 = 128;

/// Startup configuration for a render session. Defaults mirror the classic
/// build: 1280×800 canvas, view of `[-2.5, 1.5]` on the real axis, cap 128.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Fraction of the viewport extent moved per pan.
    pub move_fraction: f64,
    /// Zoom strength: zoom-in scales the extent by `1 − zoom_pct`.
    pub zoom_pct: f64,
    pub max_iterations: u32,
    /// Working bit width used when precision is toggled. `None` sizes it
    /// from the viewport at toggle time.
    pub precision_bits: Option<usize>,
    pub hue_offset: f64,
    /// Worker thread count. `None` uses available hardware parallelism.
    pub workers: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1280,
            canvas_height: 800,
            move_fraction: 0.25,
            zoom_pct: 0.25,
            max_iterations: 128,
            precision_bits: None,
            hue_offset: 0.0,
            workers: None,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> crate::Result<()> {
        if !(self.move_fraction > 0.0 && self.move_fraction <= 1.0) {
            return Err(EngineError::InvalidConfig {
                reason: format!("move_fraction {} outside (0, 1]", self.move_fraction),
            });
        }
        if !(self.zoom_pct > 0.0 && self.zoom_pct < 1.0) {
            return Err(EngineError::InvalidConfig {
                reason: format!("zoom_pct {} outside (0, 1)", self.zoom_pct),
            });
        }
        if self.max_iterations == 0 {
            return Err(EngineError::InvalidConfig {
                reason: "max_iterations must be >= 1".into(),
            });
        }
        if self.workers == Some(0) {
            return Err(EngineError::InvalidConfig {
                reason: "workers must be >= 1 when set".into(),
            });
        }
        Ok(())
    }
}

/// The operation vocabulary the windowing layer drives the engine with.
/// Each command is one viewport operation plus the redraw it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Quit,
    ResetView,
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    IncreaseIterations,
    DecreaseIterations,
    TogglePrecision,
}

/// Whether the event loop should keep running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
}

/// One interactive rendering run: the viewport, its immutable default
/// snapshot, the queue, the canvas, and the worker pool. Exactly one
/// session exists per run; dropping it without [`shutdown`](Self::shutdown)
/// leaks the workers, so the windowing layer is expected to quit through
/// the command surface.
pub struct RenderSession {
    viewport: ViewportMapping,
    default_view: ViewportMapping,
    max_iterations: u32,
    config: EngineConfig,
    queue: Arc<TaskQueue>,
    canvas: Arc<Canvas>,
    progress: Arc<RenderProgress>,
    workers: WorkerPool,
}

impl RenderSession {
    /// Build a session with the stock hue mapper and schedule the first
    /// full frame.
    pub fn new(config: EngineConfig) -> crate::Result<Self> {
        let mapper = Arc::new(HueRamp {
            hue_offset: config.hue_offset,
        });
        Self::with_mapper(config, mapper)
    }

    /// Build a session with a caller-supplied color mapper.
    pub fn with_mapper(
        config: EngineConfig,
        mapper: Arc<dyn ColorMapper>,
    ) -> crate::Result<Self> {
        config.validate()?;
        let viewport = ViewportMapping::default_view(config.canvas_width, config.canvas_height)?;
        let canvas = Arc::new(Canvas::new(config.canvas_width, config.canvas_height)?);
        let queue = Arc::new(TaskQueue::new());
        let progress = Arc::new(RenderProgress::new());

        let worker_count = config.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        let workers = WorkerPool::spawn(
            worker_count,
            Arc::clone(&queue),
            Arc::clone(&canvas),
            mapper,
            Arc::clone(&progress),
        )?;
        info!(
            width = config.canvas_width,
            height = config.canvas_height,
            workers = worker_count,
            max_iterations = config.max_iterations,
            "render session started"
        );

        let session = Self {
            default_view: viewport.clone(),
            viewport,
            max_iterations: config.max_iterations,
            config,
            queue,
            canvas,
            progress,
            workers,
        };
        session.schedule(session.viewport.full_redraw());
        Ok(session)
    }

    pub fn viewport(&self) -> &ViewportMapping {
        &self.viewport
    }

    pub fn canvas(&self) -> &Arc<Canvas> {
        &self.canvas
    }

    pub fn progress(&self) -> &Arc<RenderProgress> {
        &self.progress
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Apply one command from the event loop.
    pub fn apply(&mut self, command: Command) -> crate::Result<CommandOutcome> {
        debug!(?command, "applying command");
        match command {
            Command::Quit => return Ok(CommandOutcome::Quit),
            Command::ResetView => {
                self.viewport = self.default_view.clone();
                self.max_iterations = self.config.max_iterations;
                self.schedule(self.viewport.full_redraw());
            }
            Command::ZoomIn => self.zoom(ZoomDirection::In)?,
            Command::ZoomOut => self.zoom(ZoomDirection::Out)?,
            Command::PanLeft => self.pan(PanDirection::Left)?,
            Command::PanRight => self.pan(PanDirection::Right)?,
            Command::PanUp => self.pan(PanDirection::Up)?,
            Command::PanDown => self.pan(PanDirection::Down)?,
            Command::IncreaseIterations => {
                self.max_iterations = if self.max_iterations >= ITERATION_STEP_KNEE {
                    self.max_iterations.saturating_add(ITERATION_STEP_KNEE)
                } else {
                    self.max_iterations * 2
                };
                debug!(max_iterations = self.max_iterations, "iteration cap raised");
                self.schedule(self.viewport.full_redraw());
            }
            Command::DecreaseIterations => {
                self.max_iterations = if self.max_iterations > ITERATION_STEP_KNEE {
                    self.max_iterations - ITERATION_STEP_KNEE
                } else {
                    (self.max_iterations / 2).max(1)
                };
                debug!(max_iterations = self.max_iterations, "iteration cap lowered");
                self.schedule(self.viewport.full_redraw());
            }
            Command::TogglePrecision => {
                let bits = self.config.precision_bits.unwrap_or_else(|| {
                    recommended_precision_bits(&self.viewport, self.max_iterations)
                });
                self.viewport.toggle_precision(bits)?;
                info!(mode = ?self.viewport.precision_mode(), bits, "precision toggled");
                // The toggle alone changes no pixels; the next operation
                // renders in the new representation.
            }
        }
        Ok(CommandOutcome::Continue)
    }

    /// True when the native backend can no longer separate adjacent pixels
    /// and the windowing layer should offer the precision toggle.
    pub fn precision_toggle_recommended(&self) -> bool {
        self.viewport.precision_mode() == PrecisionMode::Native
            && self.viewport.native_resolution_exhausted()
    }

    fn pan(&mut self, direction: PanDirection) -> crate::Result<()> {
        let outcome = self.viewport.pan(direction, self.config.move_fraction)?;
        let (dx, dy) = outcome.shift;
        self.canvas.shift(dx, dy);
        if let Some(redraw) = outcome.redraw {
            self.schedule(redraw);
        }
        Ok(())
    }

    fn zoom(&mut self, direction: ZoomDirection) -> crate::Result<()> {
        self.viewport.zoom(direction, self.config.zoom_pct)?;
        // No pixel survives a scale change.
        self.schedule(self.viewport.full_redraw());
        Ok(())
    }

    fn schedule(&self, redraw: RedrawRegion) {
        let generation = self.progress.invalidate();
        scheduler::submit(
            &self.queue,
            &self.progress,
            redraw,
            self.max_iterations,
            generation,
        );
    }

    /// Tear the session down: one Exit sentinel per worker, then join them
    /// all. No thread is left unawaited.
    pub fn shutdown(self) {
        info!("render session shutting down");
        self.workers.shutdown(&self.queue);
    }
}
