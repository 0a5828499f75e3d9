pub mod audio_system;
pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod sound;
pub mod waveform;

pub use audio_system::{AmbientHandle, EngineSnapshot};
pub use engine::{AmbientEngine, EngineConfig};
pub use error::{EngineError, Result};
pub use sound::{PlaybackState, SoundType};
