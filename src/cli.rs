//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{GeneratorConfig, HeightScale};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Resonance")]
#[command(about = "Spectrogram terrain generator", long_about = None)]
pub struct Args {
    /// Audio file to analyze (WAV)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// DFT window duration (milliseconds); longer windows reach lower frequencies
    #[arg(long, value_name = "MS", default_value = "30")]
    pub window_ms: f32,

    /// Interval between DFTs (milliseconds); smaller intervals add time steps
    #[arg(long, value_name = "MS", default_value = "1")]
    pub interval_ms: f32,

    /// Frequency bins averaged on each side
    #[arg(long, value_name = "BINS", default_value = "25", allow_negative_numbers = true)]
    pub harmonic_smoothing: i32,

    /// Time steps averaged on each side
    #[arg(long, value_name = "STEPS", default_value = "2", allow_negative_numbers = true)]
    pub temporal_smoothing: i32,

    /// Height scale factor
    #[arg(long, value_name = "FACTOR", default_value = "0.3")]
    pub height_multiplier: f32,

    /// Logarithmic (decibel) heights: on or off
    #[arg(long, value_enum, value_name = "MODE", default_value_t = HeightScale::Logarithmic)]
    pub logarithmic: HeightScale,
}

impl Args {
    /// Build the generator configuration (validated by the generator)
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            window_duration_ms: self.window_ms,
            sample_interval_ms: self.interval_ms,
            harmonic_smoothing_radius: self.harmonic_smoothing,
            temporal_smoothing_radius: self.temporal_smoothing,
            height_multiplier: self.height_multiplier,
            scale: self.logarithmic,
        }
    }
}
