//sound.rs
pub const VOLUME_MIN: f32 = 0.0;
pub const VOLUME_MAX: f32 = 1.0;
pub const VOLUME_DEFAULT: f32 = 0.5;

//waveform.rs
pub const NOISE_SECONDS: u32 = 2;
pub const WIND_SECONDS: u32 = 4;
pub const BROWN_GAIN: f32 = 3.5;
pub const PINK_GAIN: f32 = 0.11;
pub const DROPLET_THRESHOLD: f32 = 0.9997;
pub const DROPLET_SCALE: f32 = 0.3;
pub const GUST_BASE: f32 = 0.7;
pub const GUST_DEPTH: f32 = 0.3;
pub const GUST_SECONDS: f32 = 3.0;

//graph.rs
pub const RAIN_CUTOFF_HZ: f32 = 3000.0;
pub const WIND_CUTOFF_HZ: f32 = 800.0;
pub const LOWPASS_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;
pub const BINAURAL_BASE_FREQ: f32 = 200.0;
pub const BINAURAL_BEAT_FREQ: f32 = 40.0;
pub const PAN_LEFT: f32 = -1.0;
pub const PAN_RIGHT: f32 = 1.0;

//ui.rs
pub const TICK: u64 = 16;
pub const VOLUME_STEP: f32 = 0.1;
