//! Spectrogram terrain: mesh synthesis and the generator that publishes it.

mod mesh;
mod system;

// Re-export public types
pub use mesh::{synthesize, Mesh, Vertex};
pub use system::{build_snapshot, Generator, TerrainSnapshot};

/// Terrain grid dimensions: time steps along X, frequency bins along Z
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FootprintSize {
    pub width: usize,
    pub depth: usize,
}
