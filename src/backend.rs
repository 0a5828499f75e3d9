use rodio::buffer::SamplesBuffer;
use rodio::source::{ChannelVolume, SineWave};
use rodio::stream::{OutputStream, OutputStreamBuilder};
use rodio::{Sink, Source};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::graph::{pan_gains, GraphSource, Oscillator, SignalGraph};

/// boxed Rodio source producing `f32` samples, `Send` so the mixer thread can own it
pub type SynthSource = Box<dyn Source<Item = f32> + Send>;

/// something that can hand out fresh rendering contexts
pub trait AudioBackend {
    fn open_context(&mut self) -> Result<Box<dyn RenderContext>>;
}

/// one live rendering context plus its gain stage
pub trait RenderContext {
    fn sample_rate(&self) -> u32;

    /// wire `graph` through a new gain stage set to `gain` and start every source
    fn connect(&mut self, graph: SignalGraph, gain: f32) -> Result<()>;

    fn set_gain(&mut self, gain: f32);

    /// current gain, `None` until a graph is connected
    fn gain(&self) -> Option<f32>;

    /// stop every source, disconnect the gain stage and release the device.
    /// must tolerate being called more than once or before `connect`.
    fn close(&mut self);
}

#[derive(Debug, Default)]
pub struct RodioBackend;

impl RodioBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for RodioBackend {
    fn open_context(&mut self) -> Result<Box<dyn RenderContext>> {
        let mut stream = OutputStreamBuilder::open_default_stream().map_err(|e| {
            warn!(error = %e, "failed to open default output stream");
            EngineError::ContextUnavailable(e.to_string())
        })?;
        stream.log_on_drop(false);
        let sample_rate = stream.config().sample_rate();
        debug!(sample_rate, "opened output stream");
        Ok(Box::new(RodioContext {
            stream: Some(stream),
            sink: None,
            sample_rate,
        }))
    }
}

/// runtime-owned output stream + the single sink playing the current graph
pub struct RodioContext {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    sample_rate: u32,
}

impl RenderContext for RodioContext {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn connect(&mut self, graph: SignalGraph, gain: f32) -> Result<()> {
        let Some(stream) = &self.stream else {
            return Err(EngineError::Graph("output stream already closed".into()));
        };
        if self.sink.is_some() {
            return Err(EngineError::Graph("context already has a graph".into()));
        }

        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(gain);
        sink.append(realize(graph));
        self.sink = Some(sink);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(gain);
        }
    }

    fn gain(&self) -> Option<f32> {
        self.sink.as_ref().map(Sink::volume)
    }

    fn close(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        // dropping the stream releases the device
        self.stream = None;
    }
}

impl Drop for RodioContext {
    fn drop(&mut self) {
        self.close();
    }
}

/// sine tone spread over two channels by the pan law
fn panned(osc: Oscillator) -> ChannelVolume<SineWave> {
    ChannelVolume::new(SineWave::new(osc.frequency), pan_gains(osc.pan).to_vec())
}

/// turn a graph description into the Rodio source chain feeding the sink
fn realize(graph: SignalGraph) -> SynthSource {
    match graph.source {
        GraphSource::Buffer(buf) => {
            let looped = SamplesBuffer::new(1, buf.sample_rate, buf.samples).repeat_infinite();
            match graph.filter {
                Some(f) => Box::new(looped.low_pass_with_q(f.cutoff_hz as u32, f.q)),
                None => Box::new(looped),
            }
        }
        GraphSource::Oscillators([left, right]) => Box::new(panned(left).mix(panned(right))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, BinauralConfig, LoopBuffer};
    use crate::sound::SoundType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SR: u32 = 16_000;

    fn graph(sound: SoundType) -> SignalGraph {
        build_graph(sound, SR, &BinauralConfig::default(), &mut StdRng::seed_from_u64(3))
    }

    fn raw_buffer(graph: &SignalGraph) -> LoopBuffer {
        match &graph.source {
            GraphSource::Buffer(buf) => buf.clone(),
            GraphSource::Oscillators(_) => panic!("{} is not buffer based", graph.sound),
        }
    }

    /// mean squared step between neighbours, a cheap high-frequency measure
    fn roughness(x: &[f32]) -> f64 {
        let sum: f64 = x.windows(2).map(|w| ((w[1] - w[0]) as f64).powi(2)).sum();
        sum / (x.len() - 1) as f64
    }

    fn sign_changes(x: &[f32]) -> usize {
        x.windows(2).filter(|w| (w[0] < 0.0) != (w[1] < 0.0)).count()
    }

    #[test]
    fn pink_loop_wraps_end_to_start() {
        let g = graph(SoundType::PinkNoise);
        let buf = raw_buffer(&g);
        let len = buf.samples.len();

        let src = realize(g);
        assert_eq!(src.channels(), 1);
        assert_eq!(src.sample_rate(), SR);
        let s: Vec<f32> = src.take(2 * len).collect();

        assert_eq!(s.len(), 2 * len);
        assert_eq!(s[..len], buf.samples[..]);
        assert_eq!(s[len - 1], buf.samples[len - 1]);
        assert_eq!(s[len], s[0]);
        assert_eq!(s[len..], s[..len]);
    }

    #[test]
    fn binaural_sends_one_tone_to_each_ear() {
        let src = realize(graph(SoundType::Binaural));
        assert_eq!(src.channels(), 2);

        let rate = src.sample_rate() as usize;
        let frames: Vec<f32> = src.take(2 * rate).collect();
        let left: Vec<f32> = frames.iter().step_by(2).copied().collect();
        let right: Vec<f32> = frames.iter().skip(1).step_by(2).copied().collect();

        // a sine crosses zero twice per cycle over the one second of frames
        let l = sign_changes(&left) as i64;
        let r = sign_changes(&right) as i64;
        assert!((l - 400).abs() <= 3, "left crossed zero {l} times");
        assert!((r - 480).abs() <= 3, "right crossed zero {r} times");
        assert!(left.iter().all(|s| s.abs() <= 1.0 + 1e-4));
        assert!(right.iter().all(|s| s.abs() <= 1.0 + 1e-4));
    }

    #[test]
    fn rain_and_wind_are_lowpassed_on_playback() {
        for sound in [SoundType::Rain, SoundType::Wind] {
            let g = graph(sound);
            let buf = raw_buffer(&g);
            let out: Vec<f32> = realize(g).take(buf.samples.len()).collect();

            assert_eq!(out.len(), buf.samples.len());
            assert_ne!(out, buf.samples, "{sound} was not filtered");
            assert!(
                roughness(&out) < roughness(&buf.samples),
                "{sound} kept its high end"
            );
        }
    }

    #[test]
    fn unfiltered_noise_plays_back_untouched() {
        for sound in [SoundType::WhiteNoise, SoundType::BrownNoise] {
            let g = graph(sound);
            let buf = raw_buffer(&g);
            let out: Vec<f32> = realize(g).take(buf.samples.len()).collect();
            assert_eq!(out, buf.samples);
        }
    }
}
