//! Windowed FFT analysis producing a magnitude spectrogram.

use rayon::prelude::*;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::{GeneratorError, Result};
use crate::params::{generator_constants::MIN_WINDOW_SAMPLES, GeneratorConfig};
use crate::spectrogram::SpectrogramGrid;

/// Sample counts and grid dimensions derived from a configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpectralLayout {
    pub window_samples: usize,
    pub step_samples: usize,
    pub time_steps: usize,
    pub frequency_bins: usize,
    /// Frequency resolution (Hz per bin)
    pub bin_width_hz: f32,
}

impl SpectralLayout {
    /// Center frequency of a bin (Hz)
    pub fn bin_frequency_hz(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_width_hz
    }
}

/// Short-time spectral analyzer for one configuration and sample rate
///
/// The FFT is planned once and shared read-only by all worker threads;
/// each time step owns its own buffers, so the grid does not depend on
/// how rayon schedules the rows.
pub struct SpectralAnalyzer {
    window_samples: usize,
    step_samples: usize,
    window_duration_ms: f64,
    sample_interval_ms: f64,
    sample_rate: u32,
    taper: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl SpectralAnalyzer {
    pub fn new(config: &GeneratorConfig, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(GeneratorError::input("sample rate must be > 0"));
        }

        let window_duration_ms = config.window_duration_ms as f64;
        let sample_interval_ms = config.sample_interval_ms as f64;
        let rate = sample_rate as f64;

        let window_samples = (window_duration_ms * rate / 1000.0).round() as usize;
        if window_samples < MIN_WINDOW_SAMPLES {
            return Err(GeneratorError::input(format!(
                "a {} ms window holds {} samples at {} Hz, need at least {}",
                config.window_duration_ms, window_samples, sample_rate, MIN_WINDOW_SAMPLES
            )));
        }
        let step_samples = ((sample_interval_ms * rate / 1000.0).round() as usize).max(1);

        let taper = (0..window_samples)
            .map(|i| hann_window(i, window_samples))
            .collect();

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(window_samples);

        Ok(Self {
            window_samples,
            step_samples,
            window_duration_ms,
            sample_interval_ms,
            sample_rate,
            taper,
            fft,
        })
    }

    pub fn window_samples(&self) -> usize {
        self.window_samples
    }

    pub fn step_samples(&self) -> usize {
        self.step_samples
    }

    /// Non-negative frequency bins up to Nyquist
    pub fn frequency_bins(&self) -> usize {
        self.window_samples / 2 + 1
    }

    /// Frequency resolution (Hz per bin)
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate as f32 / self.window_samples as f32
    }

    /// Number of windows that fit in `total_samples`
    pub fn time_steps(&self, total_samples: usize) -> Result<usize> {
        if total_samples == 0 {
            return Err(GeneratorError::input("audio contains no samples"));
        }

        let total_ms = total_samples as f64 * 1000.0 / self.sample_rate as f64;
        if total_ms < self.window_duration_ms {
            return Err(GeneratorError::input(format!(
                "audio is {:.3} ms long, shorter than one {} ms analysis window",
                total_ms, self.window_duration_ms
            )));
        }

        // Small bias absorbs float error when the span is an exact multiple
        let spans = (total_ms - self.window_duration_ms) / self.sample_interval_ms + 1e-9;
        let by_duration = spans.floor() as usize + 1;

        // Rounded steps can outrun the interval; every window must start inside the audio
        let by_samples = (total_samples - 1) / self.step_samples + 1;
        Ok(by_duration.min(by_samples).max(1))
    }

    /// Layout of the grid `analyze` would produce for `total_samples`
    pub fn layout(&self, total_samples: usize) -> Result<SpectralLayout> {
        Ok(SpectralLayout {
            window_samples: self.window_samples,
            step_samples: self.step_samples,
            time_steps: self.time_steps(total_samples)?,
            frequency_bins: self.frequency_bins(),
            bin_width_hz: self.bin_width_hz(),
        })
    }

    /// Magnitude spectrogram of `samples`
    pub fn analyze(&self, samples: &[f32]) -> Result<SpectrogramGrid> {
        let time_steps = self.time_steps(samples.len())?;
        let bins = self.frequency_bins();
        let mut grid = SpectrogramGrid::zeros(time_steps, bins);

        let scratch_len = self.fft.get_inplace_scratch_len();
        grid.values_mut()
            .par_chunks_mut(bins)
            .enumerate()
            .for_each_init(
                || {
                    (
                        vec![Complex::new(0.0, 0.0); self.window_samples],
                        vec![Complex::new(0.0, 0.0); scratch_len],
                    )
                },
                |(buffer, scratch), (step, row)| {
                    self.load_window(samples, step * self.step_samples, buffer);
                    self.fft.process_with_scratch(buffer, scratch);
                    let norm = self.window_samples as f32;
                    for (out, coefficient) in row.iter_mut().zip(buffer.iter()) {
                        *out = coefficient.norm() / norm;
                    }
                },
            );

        Ok(grid)
    }

    /// Forward transform of one window after tapering
    ///
    /// `window` shorter than the analysis window is zero-padded; longer
    /// input is truncated.
    pub fn transform(&self, window: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.window_samples];
        self.load_window(window, 0, &mut buffer);
        self.fft.process(&mut buffer);
        buffer
    }

    /// Copy a tapered slice starting at `start` into `buffer`, zero-padding the tail
    fn load_window(&self, samples: &[f32], start: usize, buffer: &mut [Complex<f32>]) {
        for (i, (slot, weight)) in buffer.iter_mut().zip(&self.taper).enumerate() {
            let sample = samples.get(start + i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * weight, 0.0);
        }
    }
}

/// Analyze `samples` with a one-off analyzer
pub fn analyze(
    samples: &[f32],
    sample_rate: u32,
    config: &GeneratorConfig,
) -> Result<SpectrogramGrid> {
    SpectralAnalyzer::new(config, sample_rate)?.analyze(samples)
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
