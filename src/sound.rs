use std::fmt;
use std::str::FromStr;

use crate::config::{VOLUME_MAX, VOLUME_MIN};
use crate::error::EngineError;

/// the fixed set of ambient sounds the engine can synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundType {
    WhiteNoise,
    PinkNoise,
    BrownNoise,
    Rain,
    Wind,
    Binaural,
}

impl SoundType {
    pub const ALL: [SoundType; 6] = [
        SoundType::WhiteNoise,
        SoundType::PinkNoise,
        SoundType::BrownNoise,
        SoundType::Rain,
        SoundType::Wind,
        SoundType::Binaural,
    ];

    pub fn next(self) -> Self {
        match self {
            SoundType::WhiteNoise => SoundType::PinkNoise,
            SoundType::PinkNoise => SoundType::BrownNoise,
            SoundType::BrownNoise => SoundType::Rain,
            SoundType::Rain => SoundType::Wind,
            SoundType::Wind => SoundType::Binaural,
            SoundType::Binaural => SoundType::WhiteNoise,
        }
    }

    /// stable id used by callers that persist or pass the choice around as text
    pub fn as_str(self) -> &'static str {
        match self {
            SoundType::WhiteNoise => "whitenoise",
            SoundType::PinkNoise => "pinknoise",
            SoundType::BrownNoise => "brownnoise",
            SoundType::Rain => "rain",
            SoundType::Wind => "wind",
            SoundType::Binaural => "binaural",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundType::WhiteNoise => "White Noise",
            SoundType::PinkNoise => "Pink Noise",
            SoundType::BrownNoise => "Brown Noise",
            SoundType::Rain => "Rain",
            SoundType::Wind => "Wind",
            SoundType::Binaural => "Binaural Beats",
        }
    }

    /// true for the sounds rendered from a precomputed looping buffer
    pub fn is_buffered(self) -> bool {
        !matches!(self, SoundType::Binaural)
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        SoundType::ALL
            .into_iter()
            .find(|t| t.as_str() == id)
            .ok_or_else(|| EngineError::UnknownSound(s.to_string()))
    }
}

/// what the lifecycle controller is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(SoundType),
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self != PlaybackState::Idle
    }

    pub fn sound(self) -> Option<SoundType> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing(t) => Some(t),
        }
    }
}

/// normalize a requested gain into [0, 1]; NaN is treated as silence
pub fn clamp_volume(v: f32) -> f32 {
    if v.is_nan() {
        return VOLUME_MIN;
    }
    v.clamp(VOLUME_MIN, VOLUME_MAX)
}
