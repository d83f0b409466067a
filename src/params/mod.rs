//! Parameter definitions with physical units and documented semantics.
//!
//! Tunable values live here with:
//! - Units (milliseconds, world units, decibels)
//! - Documented ranges and meanings
//! - Validation where a value can be out of range

mod generator;
mod terrain;

// Re-export all types
pub use generator::{generator_constants, GeneratorConfig, HeightScale};
pub use terrain::TerrainLayout;
