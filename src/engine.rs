use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::backend::{AudioBackend, RenderContext};
use crate::error::Result;
use crate::graph::{build_graph, BinauralConfig};
use crate::sound::{clamp_volume, PlaybackState, SoundType};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub binaural: BinauralConfig,
    /// fixed seed for buffer generation; `None` seeds from the OS
    pub seed: Option<u64>,
}

/// everything one session owns. dropping it closes the context, so a
/// half-built session is released on every exit path.
struct GenerationContext {
    sound: SoundType,
    context: Box<dyn RenderContext>,
}

impl Drop for GenerationContext {
    fn drop(&mut self) {
        self.context.close();
    }
}

pub struct AmbientEngine<B: AudioBackend> {
    backend: B,
    binaural: BinauralConfig,
    rng: StdRng,
    session: Option<GenerationContext>,
}

impl<B: AudioBackend> AmbientEngine<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, EngineConfig::default())
    }

    pub fn with_config(backend: B, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            backend,
            binaural: config.binaural,
            rng,
            session: None,
        }
    }

    /// tear down whatever is playing, then build and start a fresh graph for `sound`.
    /// On error the engine is left idle.
    pub fn start(&mut self, sound: SoundType, volume: f32) -> Result<()> {
        self.stop();

        let volume = clamp_volume(volume);
        let context = self.backend.open_context().inspect_err(|e| {
            warn!(sound = sound.as_str(), error = %e, "could not open audio context");
        })?;
        let mut session = GenerationContext { sound, context };

        let graph = build_graph(sound, session.context.sample_rate(), &self.binaural, &mut self.rng);
        debug!(sound = sound.as_str(), stages = graph.stages(), "built signal graph");
        session.context.connect(graph, volume).inspect_err(|e| {
            warn!(sound = sound.as_str(), error = %e, "could not connect signal graph");
        })?;

        info!(sound = sound.as_str(), volume, "playback started");
        self.session = Some(session);
        Ok(())
    }

    /// update the live gain; ignored while idle
    pub fn set_volume(&mut self, volume: f32) {
        let Some(session) = self.session.as_mut() else { return; };
        let volume = clamp_volume(volume);
        session.context.set_gain(volume);
        debug!(volume, "volume changed");
    }

    /// release every node and the rendering context; no-op while idle
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            info!(sound = session.sound.as_str(), "playback stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> PlaybackState {
        match &self.session {
            Some(s) => PlaybackState::Playing(s.sound),
            None => PlaybackState::Idle,
        }
    }

    /// value read back from the live gain stage, `None` while idle
    pub fn volume(&self) -> Option<f32> {
        self.session.as_ref().and_then(|s| s.context.gain())
    }
}
