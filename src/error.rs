use thiserror::Error;

/// result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// errors surfaced by the engine and its control handle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// the platform refused to open an audio rendering context
    #[error("audio context unavailable: {0}")]
    ContextUnavailable(String),

    /// a context opened but the signal graph could not be connected to it
    #[error("signal graph error: {0}")]
    Graph(String),

    /// a sound id that does not name any `SoundType`
    #[error("unknown sound type '{0}'")]
    UnknownSound(String),

    /// the engine runtime behind a handle has shut down
    #[error("engine runtime is closed")]
    EngineClosed,
}
