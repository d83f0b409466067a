//! Audio decoding and FFT analysis.
//!
//! Turns a source file into normalized mono samples, then slices them into
//! tapered windows and computes a magnitude spectrum per window.

mod decoder;
mod fft;

// Re-export public types
pub use decoder::{decode_wav, ClipStats, DecodedAudio, Decoder, StreamInfo, WavDecoder};
pub use fft::{analyze, hann_window, SpectralAnalyzer, SpectralLayout};
