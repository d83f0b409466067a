//! Spectral analysis and height mapping configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::{GeneratorError, Result};

/// Height scale applied to spectral magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum HeightScale {
    /// Height proportional to magnitude
    #[value(name = "off", alias = "linear")]
    Linear,

    /// Height proportional to level in decibels above the noise floor
    #[default]
    #[value(name = "on", alias = "log", alias = "logarithmic")]
    Logarithmic,
}

impl HeightScale {
    /// Lowest pre-multiplier height this scale produces
    pub fn bottom_floor(self) -> f32 {
        match self {
            HeightScale::Linear => 0.0,
            HeightScale::Logarithmic => generator_constants::BOTTOM,
        }
    }
}

impl FromStr for HeightScale {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "on" | "log" | "logarithmic" => Ok(HeightScale::Logarithmic),
            "off" | "linear" => Ok(HeightScale::Linear),
            other => Err(GeneratorError::configuration(
                "logarithmic",
                format!("expected 'on' or 'off', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for HeightScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightScale::Linear => write!(f, "linear"),
            HeightScale::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

/// Terrain generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Length of one analysis window (milliseconds)
    /// Longer windows resolve lower frequencies and give more bins
    pub window_duration_ms: f32,

    /// Spacing between successive windows (milliseconds)
    /// Smaller intervals give more time steps
    pub sample_interval_ms: f32,

    /// Bins averaged on each side along the frequency axis
    pub harmonic_smoothing_radius: i32,

    /// Steps averaged on each side along the time axis
    pub temporal_smoothing_radius: i32,

    /// Scale applied to mapped heights (world units per unit level)
    pub height_multiplier: f32,

    /// Linear or decibel height mapping
    pub scale: HeightScale,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window_duration_ms: 30.0,
            sample_interval_ms: 1.0,
            harmonic_smoothing_radius: 25,
            temporal_smoothing_radius: 2,
            height_multiplier: 0.3,
            scale: HeightScale::Logarithmic,
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration, reporting the first invalid field
    pub fn validate(&self) -> Result<()> {
        require_positive("window_duration_ms", self.window_duration_ms)?;
        require_positive("sample_interval_ms", self.sample_interval_ms)?;
        require_non_negative("harmonic_smoothing_radius", self.harmonic_smoothing_radius)?;
        require_non_negative("temporal_smoothing_radius", self.temporal_smoothing_radius)?;
        require_positive("height_multiplier", self.height_multiplier)?;
        Ok(())
    }

    /// Harmonic radius as a bin count (negative values clamp to 0)
    pub fn harmonic_radius(&self) -> usize {
        self.harmonic_smoothing_radius.max(0) as usize
    }

    /// Temporal radius as a step count (negative values clamp to 0)
    pub fn temporal_radius(&self) -> usize {
        self.temporal_smoothing_radius.max(0) as usize
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GeneratorError::configuration(
            field,
            format!("must be a finite value > 0, got {}", value),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: i32) -> Result<()> {
    if value < 0 {
        return Err(GeneratorError::configuration(
            field,
            format!("must be >= 0, got {}", value),
        ));
    }
    Ok(())
}

/// Generator constants
pub mod generator_constants {
    /// Level added to decibel magnitudes so quiet content sits near zero (dB)
    pub const NOISE_FLOOR_DB: f32 = 90.0;

    /// Lowest logarithmic level before the height multiplier is applied
    pub const BOTTOM: f32 = -50.0;

    /// Magnitude substituted for zero before taking the logarithm
    pub const MAGNITUDE_EPSILON: f32 = 1e-12;

    /// Shortest window whose Hann taper is non-zero somewhere
    pub const MIN_WINDOW_SAMPLES: usize = 3;
}
