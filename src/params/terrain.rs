//! World-space layout of the generated meshes.

use glam::Vec2;

/// Terrain mesh layout parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainLayout {
    /// Distance between adjacent time steps along X (world units)
    pub time_spacing: f32,

    /// Distance between adjacent frequency bins along Z (world units)
    pub frequency_spacing: f32,

    /// Depth of the plinth below the lowest possible terrain height (world units)
    pub base_thickness: f32,
}

impl Default for TerrainLayout {
    fn default() -> Self {
        Self {
            time_spacing: 1.0,
            frequency_spacing: 1.0,
            base_thickness: 10.0,
        }
    }
}

impl TerrainLayout {
    /// Cell spacing as an (x, z) pair
    pub fn cell_spacing(&self) -> Vec2 {
        Vec2::new(self.time_spacing, self.frequency_spacing)
    }
}
