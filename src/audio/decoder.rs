//! Decoding audio sources into normalized mono samples.

use std::path::Path;

use crate::error::DecodeError;

/// Properties of the stream as stored in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// Clipping statistics gathered while normalizing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipStats {
    /// Largest absolute sample value before clamping
    pub peak: f32,
    /// Samples that fell outside [-1, 1] and were clamped
    pub clipped_samples: u64,
}

/// Mono samples in [-1, 1] plus the stream they came from
#[derive(Debug, Clone, Default)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub info: StreamInfo,
    pub stats: ClipStats,
}

impl DecodedAudio {
    /// Duration of the mono signal in milliseconds
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64 * 1000.0
    }
}

/// Source of normalized mono audio for the generator
pub trait Decoder: Send + Sync {
    fn decode(&self, source: &str) -> Result<DecodedAudio, DecodeError>;
}

/// WAV file decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, source: &str) -> Result<DecodedAudio, DecodeError> {
        decode_wav(Path::new(source))
    }
}

/// Read a WAV file, downmix to mono and clamp to [-1, 1]
pub fn decode_wav(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(DecodeError::NoChannels);
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(DecodeError::UnsupportedFormat {
                    bits: spec.bits_per_sample,
                    format: "float",
                });
            }
            reader.samples::<f32>().collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(DecodeError::UnsupportedFormat {
                    bits: spec.bits_per_sample,
                    format: "integer",
                });
            }
            let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()?
        }
    };

    let (samples, stats) = downmix_and_clamp(&interleaved, spec.channels as usize);

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        info: StreamInfo {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        },
        stats,
    })
}

/// Average interleaved frames into one channel, clamping the result
fn downmix_and_clamp(interleaved: &[f32], channels: usize) -> (Vec<f32>, ClipStats) {
    let mut stats = ClipStats::default();
    let samples = interleaved
        .chunks_exact(channels)
        .map(|frame| {
            let mixed = frame.iter().sum::<f32>() / channels as f32;
            stats.peak = stats.peak.max(mixed.abs());
            if !(-1.0..=1.0).contains(&mixed) {
                stats.clipped_samples += 1;
            }
            mixed.clamp(-1.0, 1.0)
        })
        .collect();
    (samples, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(
        path: &Path,
        spec: hound::WavSpec,
        write: impl FnOnce(&mut hound::WavWriter<std::io::BufWriter<std::fs::File>>),
    ) {
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        write(&mut writer);
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decodes_stereo_int16_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, |w| {
            for _ in 0..100 {
                w.write_sample(16384i16).unwrap();
                w.write_sample(0i16).unwrap();
            }
        });

        let audio = WavDecoder.decode(path.to_str().unwrap()).unwrap();

        assert_eq!(audio.samples.len(), 100);
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(
            audio.info,
            StreamInfo {
                channels: 2,
                sample_rate: 22050,
                bits_per_sample: 16
            }
        );
        // (0.5 + 0.0) / 2
        assert!(audio.samples.iter().all(|s| (s - 0.25).abs() < 1e-6));
        assert_eq!(audio.stats.clipped_samples, 0);
    }

    #[test]
    fn test_float_samples_are_clamped_and_counted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        write_wav(&path, spec, |w| {
            for s in [0.5f32, 1.5, -2.0, -0.25] {
                w.write_sample(s).unwrap();
            }
        });

        let audio = WavDecoder.decode(path.to_str().unwrap()).unwrap();

        assert_eq!(audio.samples, vec![0.5, 1.0, -1.0, -0.25]);
        assert_eq!(audio.stats.clipped_samples, 2);
        assert_eq!(audio.stats.peak, 2.0);
        assert!((audio.duration_ms() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.wav");
        let err = WavDecoder.decode(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, DecodeError::Wav(_)));
    }
}
