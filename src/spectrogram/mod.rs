//! Magnitude grids and the passes that turn them into a height field.

mod height;
mod smoothing;

// Re-export public types
pub use height::{map_heights, map_magnitude, HeightField};
pub use smoothing::{smooth, smooth_harmonic, smooth_temporal};

use crate::error::{GeneratorError, Result};

/// Non-negative spectral magnitudes, `time_steps` rows of `frequency_bins` values
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramGrid {
    time_steps: usize,
    frequency_bins: usize,
    values: Vec<f32>,
}

impl SpectrogramGrid {
    /// All-zero grid of the given dimensions
    pub fn zeros(time_steps: usize, frequency_bins: usize) -> Self {
        Self {
            time_steps,
            frequency_bins,
            values: vec![0.0; time_steps * frequency_bins],
        }
    }

    /// Wrap row-major values, checking they fill the grid exactly
    pub fn from_values(
        time_steps: usize,
        frequency_bins: usize,
        values: Vec<f32>,
    ) -> Result<Self> {
        if values.len() != time_steps * frequency_bins {
            return Err(GeneratorError::consistency(format!(
                "grid of {}x{} cannot hold {} values",
                time_steps,
                frequency_bins,
                values.len()
            )));
        }
        Ok(Self {
            time_steps,
            frequency_bins,
            values,
        })
    }

    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn frequency_bins(&self) -> usize {
        self.frequency_bins
    }

    pub fn get(&self, time_step: usize, bin: usize) -> f32 {
        self.values[time_step * self.frequency_bins + bin]
    }

    /// Magnitudes of one time step
    pub fn row(&self, time_step: usize) -> &[f32] {
        let start = time_step * self.frequency_bins;
        &self.values[start..start + self.frequency_bins]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.frequency_bins.max(1))
    }

    /// Row-major values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Bin with the largest magnitude in a time step (lowest index on ties)
    pub fn peak_bin(&self, time_step: usize) -> usize {
        self.row(time_step)
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (bin, &value)| {
                if value > best.1 {
                    (bin, value)
                } else {
                    best
                }
            })
            .0
    }
}
