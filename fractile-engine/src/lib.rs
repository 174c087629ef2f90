pub mod canvas;
pub mod color;
pub mod error;
pub mod progress;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod worker;

pub use canvas::Canvas;
pub use color::{ColorMapper, HueRamp, ERROR_SENTINEL};
pub use error::EngineError;
pub use progress::RenderProgress;
pub use queue::{Task, TaskQueue, TileTask};
pub use scheduler::{MAX_TILE_HEIGHT, MAX_TILE_WIDTH};
pub use session::{Command, CommandOutcome, EngineConfig, RenderSession};
pub use worker::WorkerPool;

/// Convenience result type for the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
