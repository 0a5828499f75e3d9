use rand::Rng;
use tracing::debug;

use crate::config::{
    BROWN_GAIN, DROPLET_THRESHOLD, DROPLET_SCALE, GUST_BASE, GUST_DEPTH, GUST_SECONDS, NOISE_SECONDS,
    PINK_GAIN, WIND_SECONDS,
};
use crate::sound::SoundType;

pub fn buffer_len(sample_rate: u32, seconds: u32) -> usize {
    sample_rate as usize * seconds as usize
}

/// uniform sample in [-1, 1)
#[inline]
fn white<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.r#gen::<f32>() * 2.0 - 1.0
}

/// paul kellet's 6-pole pink filter, state lives for one generation pass
#[derive(Debug, Default, Clone)]
pub struct PinkFilter {
    b: [f32; 7],
}

impl PinkFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, w: f32) -> f32 {
        let b = &mut self.b;
        b[0] = 0.99886 * b[0] + w * 0.0555179;
        b[1] = 0.99332 * b[1] + w * 0.0750759;
        b[2] = 0.96900 * b[2] + w * 0.1538520;
        b[3] = 0.86650 * b[3] + w * 0.3104856;
        b[4] = 0.55000 * b[4] + w * 0.5329522;
        b[5] = -0.7616 * b[5] - w * 0.0168980;
        let out = (b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + w * 0.5362) * PINK_GAIN;
        b[6] = w * 0.115926;
        out
    }
}

pub fn white_noise<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32) -> Vec<f32> {
    let len = buffer_len(sample_rate, NOISE_SECONDS);
    (0..len).map(|_| white(rng)).collect()
}

pub fn pink_noise<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32) -> Vec<f32> {
    let len = buffer_len(sample_rate, NOISE_SECONDS);
    let mut filter = PinkFilter::new();
    (0..len)
        .map(|_| filter.process(white(rng)).clamp(-1.0, 1.0))
        .collect()
}

pub fn brown_noise<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32) -> Vec<f32> {
    leaky_walk(rng, buffer_len(sample_rate, NOISE_SECONDS))
}

/// leaky integrator over white noise, gained back up to a usable level
fn leaky_walk<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f32> {
    let mut last = 0.0f32;
    (0..len)
        .map(|_| {
            last = (last + 0.02 * white(rng)) / 1.02;
            (last * BROWN_GAIN).clamp(-1.0, 1.0)
        })
        .collect()
}

/// pink bed plus sparse droplet impulses; the 3 kHz lowpass is applied in the graph
pub fn rain<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32) -> Vec<f32> {
    let mut out = pink_noise(rng, sample_rate);
    for s in out.iter_mut() {
        if rng.r#gen::<f32>() > DROPLET_THRESHOLD {
            let drop = (rng.r#gen::<f32>() - 0.5) * DROPLET_SCALE;
            *s = (*s + drop).clamp(-1.0, 1.0);
        }
    }
    out
}

/// slow gust envelope applied to sample `i` of the wind buffer
pub fn gust_envelope(i: usize, sample_rate: u32) -> f32 {
    let phase = i as f64 / (sample_rate as f64 * GUST_SECONDS as f64);
    GUST_BASE + GUST_DEPTH * phase.sin() as f32
}

/// 4 s brown walk shaped by the gust envelope; the 800 Hz lowpass is applied in the graph
pub fn wind<R: Rng + ?Sized>(rng: &mut R, sample_rate: u32) -> Vec<f32> {
    let mut out = leaky_walk(rng, buffer_len(sample_rate, WIND_SECONDS));
    for (i, s) in out.iter_mut().enumerate() {
        *s *= gust_envelope(i, sample_rate);
    }
    out
}

/// generate the loop for a buffered sound; `None` for oscillator-based sounds
pub fn generate<R: Rng + ?Sized>(sound: SoundType, rng: &mut R, sample_rate: u32) -> Option<Vec<f32>> {
    if !sound.is_buffered() {
        return None;
    }
    let samples = match sound {
        SoundType::WhiteNoise => white_noise(rng, sample_rate),
        SoundType::PinkNoise => pink_noise(rng, sample_rate),
        SoundType::BrownNoise => brown_noise(rng, sample_rate),
        SoundType::Rain => rain(rng, sample_rate),
        SoundType::Wind => wind(rng, sample_rate),
        SoundType::Binaural => unreachable!("binaural is oscillator based"),
    };
    debug!(sound = sound.as_str(), samples = samples.len(), sample_rate, "generated loop buffer");
    Some(samples)
}
