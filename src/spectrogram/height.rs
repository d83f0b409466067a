//! Mapping spectral magnitudes to terrain heights.

use rayon::prelude::*;

use super::SpectrogramGrid;
use crate::params::generator_constants::{MAGNITUDE_EPSILON, NOISE_FLOOR_DB};
use crate::params::HeightScale;

/// Terrain elevation per (time step, frequency bin), never below `floor`
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    time_steps: usize,
    frequency_bins: usize,
    heights: Vec<f32>,
    floor: f32,
}

impl HeightField {
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn frequency_bins(&self) -> usize {
        self.frequency_bins
    }

    pub fn get(&self, time_step: usize, bin: usize) -> f32 {
        self.heights[time_step * self.frequency_bins + bin]
    }

    /// Row-major heights
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Lowest height any cell can take (silence maps here)
    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Highest cell, or the floor for an empty field
    pub fn max_height(&self) -> f32 {
        self.heights.iter().copied().fold(self.floor, f32::max)
    }
}

/// Map one magnitude to a height
///
/// Non-decreasing in `magnitude` for any positive multiplier.
pub fn map_magnitude(
    magnitude: f32,
    height_multiplier: f32,
    scale: HeightScale,
    bottom_floor: f32,
) -> f32 {
    let level = match scale {
        HeightScale::Linear => magnitude,
        HeightScale::Logarithmic => {
            20.0 * magnitude.max(MAGNITUDE_EPSILON).log10() + NOISE_FLOOR_DB
        }
    };
    level.max(bottom_floor) * height_multiplier
}

/// Map every cell of a smoothed grid
pub fn map_heights(
    grid: &SpectrogramGrid,
    height_multiplier: f32,
    scale: HeightScale,
    bottom_floor: f32,
) -> HeightField {
    let heights = grid
        .values()
        .par_iter()
        .map(|&magnitude| map_magnitude(magnitude, height_multiplier, scale, bottom_floor))
        .collect();

    HeightField {
        time_steps: grid.time_steps(),
        frequency_bins: grid.frequency_bins(),
        heights,
        floor: bottom_floor * height_multiplier,
    }
}
