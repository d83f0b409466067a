//! Error types for terrain generation.

use thiserror::Error;

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors reported by the decoder collaborator.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The WAV container or its samples could not be read.
    #[error("could not read audio: {0}")]
    Wav(#[from] hound::Error),

    /// Sample encoding the decoder cannot normalize.
    #[error("unsupported sample format: {bits}-bit {format}")]
    UnsupportedFormat {
        /// Bits per sample declared by the stream.
        bits: u16,
        /// "integer" or "float".
        format: &'static str,
    },

    /// Stream declares zero channels.
    #[error("stream has no audio channels")]
    NoChannels,
}

/// Errors that abort a `configure` or `generate` call.
///
/// None of these leave partially built state behind: the previously
/// published configuration and meshes stay in place.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration '{field}': {message}")]
    Configuration {
        /// Name of the first offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Audio is empty or too short to analyze.
    #[error("invalid input: {message}")]
    Input {
        /// Error message.
        message: String,
    },

    /// An internal invariant did not hold (mismatched grid, bad index count).
    #[error("internal consistency failure: {message}")]
    Consistency {
        /// Error message.
        message: String,
    },

    /// The decoder failed; wrapped with the stage and source it came from.
    #[error("{stage} stage failed for '{source_id}': {source}")]
    Decode {
        /// Generation stage that invoked the decoder.
        stage: &'static str,
        /// Source identifier handed to `generate`.
        source_id: String,
        /// Upstream decoder error.
        source: DecodeError,
    },
}

impl GeneratorError {
    /// Creates a configuration error for `field`.
    pub fn configuration(field: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            message: message.into(),
        }
    }

    /// Creates an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Creates a consistency error.
    pub fn consistency(message: impl Into<String>) -> Self {
        Self::Consistency {
            message: message.into(),
        }
    }
}
