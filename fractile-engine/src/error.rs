use thiserror::Error;

/// Errors originating from the rendering engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid canvas dimensions: {width}×{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("worker pool needs at least one thread")]
    NoWorkers,

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Core(#[from] fractile_core::CoreError),
}
