//! High-level generator: configuration, the analysis pipeline, and published meshes.

use std::sync::Arc;

use glam::Vec2;
use log::{debug, info, warn};

use super::mesh::{synthesize, Mesh};
use super::FootprintSize;
use crate::audio::{Decoder, SpectralAnalyzer, SpectralLayout, WavDecoder};
use crate::error::{GeneratorError, Result};
use crate::params::{GeneratorConfig, TerrainLayout};
use crate::spectrogram::{map_heights, smooth};

/// Output of one successful generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainSnapshot {
    pub size: FootprintSize,
    /// Maximum terrain height (world units)
    pub height: f32,
    pub terrain: Mesh,
    pub base: Mesh,
    pub layout: SpectralLayout,
    /// Cell spacing the meshes were built with
    pub spacing: Vec2,
}

impl TerrainSnapshot {
    /// World-space (x, z) size of the terrain
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.size.width.saturating_sub(1) as f32 * self.spacing.x,
            self.size.depth.saturating_sub(1) as f32 * self.spacing.y,
        )
    }
}

/// Spectrogram terrain generator
///
/// Holds the active configuration and the most recent snapshot. Both are
/// replaced only when a call succeeds.
pub struct Generator {
    config: GeneratorConfig,
    layout: TerrainLayout,
    decoder: Box<dyn Decoder>,
    snapshot: Arc<TerrainSnapshot>,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator reading WAV files, with default parameters
    pub fn new() -> Self {
        Self::with_decoder(WavDecoder)
    }

    /// Create a generator using a custom decoder
    pub fn with_decoder(decoder: impl Decoder + 'static) -> Self {
        Self {
            config: GeneratorConfig::default(),
            layout: TerrainLayout::default(),
            decoder: Box::new(decoder),
            snapshot: Arc::new(TerrainSnapshot::default()),
        }
    }

    /// Replace the mesh layout used by later generations
    pub fn with_layout(mut self, layout: TerrainLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Validate and store a configuration
    ///
    /// On error the previous configuration stays active.
    pub fn configure(&mut self, config: GeneratorConfig) -> Result<()> {
        config.validate()?;
        debug!("Configured generator: {:?}", config);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Decode `source` and rebuild the terrain from it
    pub fn generate(&mut self, source: &str) -> Result<()> {
        info!("Decoding '{}'", source);
        let audio = self
            .decoder
            .decode(source)
            .map_err(|e| GeneratorError::Decode {
                stage: "decode",
                source_id: source.to_string(),
                source: e,
            })?;

        info!(
            "Decoded {} samples @ {}Hz ({} channel(s), {}-bit, {:.1} ms)",
            audio.samples.len(),
            audio.sample_rate,
            audio.info.channels,
            audio.info.bits_per_sample,
            audio.duration_ms()
        );
        if audio.stats.clipped_samples > 0 {
            warn!(
                "'{}' clipped {} sample(s), peak {:.3}",
                source, audio.stats.clipped_samples, audio.stats.peak
            );
        }

        self.generate_from_samples(&audio.samples, audio.sample_rate)
    }

    /// Rebuild the terrain from already decoded mono samples
    pub fn generate_from_samples(&mut self, samples: &[f32], sample_rate: u32) -> Result<()> {
        let snapshot = build_snapshot(samples, sample_rate, &self.config, &self.layout)?;
        self.snapshot = Arc::new(snapshot);
        Ok(())
    }

    /// Shared handle to the latest snapshot
    ///
    /// The handle stays valid after later generations replace it.
    pub fn snapshot(&self) -> Arc<TerrainSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Grid dimensions of the latest terrain
    pub fn get_size(&self) -> FootprintSize {
        self.snapshot.size
    }

    /// Maximum height of the latest terrain
    pub fn get_height(&self) -> f32 {
        self.snapshot.height
    }

    pub fn get_dft_mesh(&self) -> &Mesh {
        &self.snapshot.terrain
    }

    pub fn get_base_mesh(&self) -> &Mesh {
        &self.snapshot.base
    }
}

/// Run analysis, smoothing, mapping and synthesis for one input
pub fn build_snapshot(
    samples: &[f32],
    sample_rate: u32,
    config: &GeneratorConfig,
    layout: &TerrainLayout,
) -> Result<TerrainSnapshot> {
    let analyzer = SpectralAnalyzer::new(config, sample_rate)?;
    let spectral_layout = analyzer.layout(samples.len())?;
    debug!(
        "Window {} samples, step {} samples, {:.2} Hz per bin",
        spectral_layout.window_samples, spectral_layout.step_samples, spectral_layout.bin_width_hz
    );

    let grid = analyzer.analyze(samples)?;
    info!(
        "Analyzed {} time steps x {} bins",
        grid.time_steps(),
        grid.frequency_bins()
    );

    let smoothed = smooth(&grid, config.harmonic_radius(), config.temporal_radius());
    if smoothed.time_steps() != grid.time_steps()
        || smoothed.frequency_bins() != grid.frequency_bins()
    {
        return Err(GeneratorError::consistency(format!(
            "smoothing changed grid from {}x{} to {}x{}",
            grid.time_steps(),
            grid.frequency_bins(),
            smoothed.time_steps(),
            smoothed.frequency_bins()
        )));
    }

    let field = map_heights(
        &smoothed,
        config.height_multiplier,
        config.scale,
        config.scale.bottom_floor(),
    );

    let spacing = layout.cell_spacing();
    let (terrain, base) = synthesize(&field, spacing, layout.base_thickness)?;
    info!(
        "Built terrain: {} vertices, {} triangles (base {} triangles)",
        terrain.vertices.len(),
        terrain.triangle_count(),
        base.triangle_count()
    );

    Ok(TerrainSnapshot {
        size: FootprintSize {
            width: field.time_steps(),
            depth: field.frequency_bins(),
        },
        height: field.max_height(),
        terrain,
        base,
        layout: spectral_layout,
        spacing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::DecodedAudio;
    use crate::error::DecodeError;
    use crate::params::{generator_constants::BOTTOM, HeightScale};
    use std::f32::consts::PI;

    /// Decoder serving a fixed signal, or failing for any source
    struct FixedDecoder(Option<Vec<f32>>);

    impl Decoder for FixedDecoder {
        fn decode(&self, _source: &str) -> std::result::Result<DecodedAudio, DecodeError> {
            match &self.0 {
                Some(samples) => Ok(DecodedAudio {
                    samples: samples.clone(),
                    sample_rate: 8000,
                    ..DecodedAudio::default()
                }),
                None => Err(DecodeError::NoChannels),
            }
        }
    }

    fn chirp(count: usize) -> Vec<f32> {
        (0..count)
            .map(|n| {
                let t = n as f32 / 8000.0;
                (2.0 * PI * (200.0 + 900.0 * t) * t).sin() * 0.8
            })
            .collect()
    }

    fn small_config(scale: HeightScale) -> GeneratorConfig {
        GeneratorConfig {
            window_duration_ms: 16.0,
            sample_interval_ms: 8.0,
            harmonic_smoothing_radius: 2,
            temporal_smoothing_radius: 1,
            height_multiplier: 0.5,
            scale,
        }
    }

    #[test]
    fn test_invalid_configuration_keeps_previous() {
        let mut generator = Generator::new();
        let good = small_config(HeightScale::Linear);
        generator.configure(good.clone()).unwrap();

        let bad = GeneratorConfig {
            height_multiplier: 0.0,
            ..good.clone()
        };
        assert!(matches!(
            generator.configure(bad),
            Err(GeneratorError::Configuration {
                field: "height_multiplier",
                ..
            })
        ));
        assert_eq!(generator.config(), &good);
    }

    #[test]
    fn test_footprint_matches_meshes() {
        let mut generator = Generator::with_decoder(FixedDecoder(Some(chirp(4000))));
        generator.configure(small_config(HeightScale::Logarithmic)).unwrap();
        generator.generate("chirp").unwrap();

        let size = generator.get_size();
        // 500 ms, 16 ms window, 8 ms interval; 128-sample window
        assert_eq!(size, FootprintSize { width: 61, depth: 65 });

        let terrain = generator.get_dft_mesh();
        let base = generator.get_base_mesh();
        assert_eq!(terrain.vertices.len(), size.width * size.depth);
        assert_eq!(terrain.triangle_count(), (size.width - 1) * (size.depth - 1) * 2);
        assert!(terrain.validate("terrain").is_ok());
        assert!(base.validate("base").is_ok());

        let (t_min, t_max) = terrain.bounds().unwrap();
        let (b_min, b_max) = base.bounds().unwrap();
        assert_eq!((t_min.x, t_min.z, t_max.x, t_max.z), (b_min.x, b_min.z, b_max.x, b_max.z));
        assert_eq!(generator.snapshot().extent(), Vec2::new(t_max.x, t_max.z));

        assert!(generator.get_height() > 0.0);
        assert_eq!(generator.get_height(), t_max.y);
    }

    #[test]
    fn test_custom_layout_scales_footprint() {
        let layout = TerrainLayout {
            time_spacing: 2.0,
            frequency_spacing: 0.5,
            base_thickness: 4.0,
        };
        let mut generator =
            Generator::with_decoder(FixedDecoder(Some(chirp(4000)))).with_layout(layout);
        generator.configure(small_config(HeightScale::Linear)).unwrap();
        generator.generate("chirp").unwrap();

        let snapshot = generator.snapshot();
        assert_eq!(snapshot.spacing, Vec2::new(2.0, 0.5));
        // 61 steps x 65 bins
        assert_eq!(snapshot.extent(), Vec2::new(120.0, 32.0));

        let (t_min, t_max) = snapshot.terrain.bounds().unwrap();
        assert_eq!((t_min.x, t_min.z, t_max.x, t_max.z), (0.0, 0.0, 120.0, 32.0));

        let (b_min, b_max) = snapshot.base.bounds().unwrap();
        assert_eq!((b_max.x, b_max.z), (120.0, 32.0));
        assert_eq!(b_max.y - b_min.y, 4.0);
    }

    #[test]
    fn test_silence_sits_on_floor() {
        for scale in [HeightScale::Linear, HeightScale::Logarithmic] {
            let config = small_config(scale);
            let snapshot =
                build_snapshot(&[0.0; 2000], 8000, &config, &TerrainLayout::default()).unwrap();

            let floor = scale.bottom_floor() * config.height_multiplier;
            assert!(snapshot.terrain.vertices.iter().all(|v| v.position[1] == floor));
            assert_eq!(snapshot.height, floor);
        }
        assert_eq!(HeightScale::Logarithmic.bottom_floor(), BOTTOM);
    }

    #[test]
    fn test_failures_keep_previous_meshes() {
        let mut generator = Generator::with_decoder(FixedDecoder(Some(chirp(4000))));
        generator.configure(small_config(HeightScale::Linear)).unwrap();
        generator.generate("chirp").unwrap();
        let before = generator.snapshot();

        // Shorter than one 16 ms window
        let err = generator.generate_from_samples(&chirp(100), 8000).unwrap_err();
        assert!(matches!(err, GeneratorError::Input { .. }));

        let err = generator.generate_from_samples(&[], 8000).unwrap_err();
        assert!(matches!(err, GeneratorError::Input { .. }));

        assert!(Arc::ptr_eq(&before, &generator.snapshot()));
    }

    #[test]
    fn test_decode_failure_is_wrapped() {
        let mut generator = Generator::with_decoder(FixedDecoder(None));
        let err = generator.generate("missing.wav").unwrap_err();

        match err {
            GeneratorError::Decode {
                stage,
                source_id,
                source: DecodeError::NoChannels,
            } => {
                assert_eq!(stage, "decode");
                assert_eq!(source_id, "missing.wav");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(generator.get_size(), FootprintSize::default());
    }

    #[test]
    fn test_reconfiguration_is_idempotent() {
        let mut generator = Generator::with_decoder(FixedDecoder(Some(chirp(6000))));
        let config = small_config(HeightScale::Logarithmic);

        generator.configure(config.clone()).unwrap();
        generator.generate("chirp").unwrap();
        let first = generator.snapshot();

        generator.configure(config).unwrap();
        generator.generate("chirp").unwrap();
        let second = generator.snapshot();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_readers_keep_old_snapshot() {
        let mut generator = Generator::with_decoder(FixedDecoder(Some(chirp(4000))));
        generator.configure(small_config(HeightScale::Linear)).unwrap();
        generator.generate("chirp").unwrap();
        let held = generator.snapshot();

        generator
            .configure(GeneratorConfig {
                window_duration_ms: 32.0,
                ..small_config(HeightScale::Linear)
            })
            .unwrap();
        generator.generate("chirp").unwrap();

        assert_eq!(held.size.depth, 65);
        assert_eq!(generator.get_size().depth, 129);
    }
}
