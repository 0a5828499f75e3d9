use std::f32::consts::FRAC_PI_2;

use rand::Rng;

use crate::config::{
    BINAURAL_BASE_FREQ, BINAURAL_BEAT_FREQ, LOWPASS_Q, PAN_LEFT, PAN_RIGHT, RAIN_CUTOFF_HZ,
    WIND_CUTOFF_HZ,
};
use crate::sound::SoundType;
use crate::waveform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinauralConfig {
    pub base_freq: f32,
    pub beat_freq: f32,
}

impl Default for BinauralConfig {
    fn default() -> Self {
        Self {
            base_freq: BINAURAL_BASE_FREQ,
            beat_freq: BINAURAL_BEAT_FREQ,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowpassFilter {
    pub cutoff_hz: f32,
    pub q: f32,
}

impl LowpassFilter {
    pub fn new(cutoff_hz: f32) -> Self {
        Self { cutoff_hz, q: LOWPASS_Q }
    }
}

/// one continuous sine tone and where it sits in the stereo field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub frequency: f32,
    pub pan: f32,
}

/// mono samples looped end-to-start for as long as the session lives
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBuffer {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    Buffer(LoopBuffer),
    Oscillators([Oscillator; 2]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalGraph {
    pub sound: SoundType,
    pub source: GraphSource,
    pub filter: Option<LowpassFilter>,
}

impl SignalGraph {
    /// number of stages between source and output, gain included
    pub fn stages(&self) -> usize {
        let middle = match (&self.source, &self.filter) {
            (GraphSource::Oscillators(_), _) => 1,
            (GraphSource::Buffer(_), Some(_)) => 1,
            (GraphSource::Buffer(_), None) => 0,
        };
        2 + middle
    }
}

/// equal-power stereo pan: -1 is hard left, +1 hard right
pub fn pan_gains(pan: f32) -> [f32; 2] {
    let x = (pan.clamp(-1.0, 1.0) + 1.0) / 2.0;
    if x <= 0.0 {
        return [1.0, 0.0];
    }
    if x >= 1.0 {
        return [0.0, 1.0];
    }
    [(x * FRAC_PI_2).cos(), (x * FRAC_PI_2).sin()]
}

fn filter_for(sound: SoundType) -> Option<LowpassFilter> {
    match sound {
        SoundType::Rain => Some(LowpassFilter::new(RAIN_CUTOFF_HZ)),
        SoundType::Wind => Some(LowpassFilter::new(WIND_CUTOFF_HZ)),
        _ => None,
    }
}

/// build a fresh, unconnected graph for `sound` at the context's sample rate
pub fn build_graph<R: Rng + ?Sized>(
    sound: SoundType,
    sample_rate: u32,
    binaural: &BinauralConfig,
    rng: &mut R,
) -> SignalGraph {
    let source = match waveform::generate(sound, rng, sample_rate) {
        Some(samples) => GraphSource::Buffer(LoopBuffer { sample_rate, samples }),
        None => GraphSource::Oscillators([
            Oscillator { frequency: binaural.base_freq, pan: PAN_LEFT },
            Oscillator {
                frequency: binaural.base_freq + binaural.beat_freq,
                pan: PAN_RIGHT,
            },
        ]),
    };

    SignalGraph {
        sound,
        source,
        filter: filter_for(sound),
    }
}
