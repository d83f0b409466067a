//! Resonance library - spectrogram terrain generation
//!
//! Decodes audio, analyzes it into a time x frequency magnitude grid,
//! smooths and maps it to heights, and triangulates a terrain mesh with a
//! flat plinth underneath.

pub mod audio;
pub mod cli;
pub mod error;
pub mod params;
pub mod spectrogram;
pub mod terrain;

pub use error::{DecodeError, GeneratorError, Result};
pub use params::{GeneratorConfig, HeightScale, TerrainLayout};
pub use terrain::{FootprintSize, Generator, Mesh, TerrainSnapshot, Vertex};
