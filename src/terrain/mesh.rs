//! Triangulated terrain and plinth meshes built from a height field.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::error::{GeneratorError, Result};
use crate::spectrogram::HeightField;

/// Vertex data for terrain meshes (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that indices form whole triangles over existing vertices
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(GeneratorError::consistency(format!(
                "{} mesh has {} indices, not a multiple of 3",
                name,
                self.indices.len()
            )));
        }
        let vertex_count = self.vertices.len();
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeneratorError::consistency(format!(
                "{} mesh index {} out of range for {} vertices",
                name, bad, vertex_count
            )));
        }
        Ok(())
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Raw vertex bytes for GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for GPU upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Build the terrain mesh and its plinth from a height field
///
/// # Arguments
/// * `field` - Mapped heights, one vertex per cell
/// * `spacing` - World distance between adjacent cells along (x = time, z = frequency)
/// * `base_thickness` - Depth of the plinth below the field's floor
///
/// # Returns
/// * Tuple of (terrain, base)
pub fn synthesize(
    field: &HeightField,
    spacing: Vec2,
    base_thickness: f32,
) -> Result<(Mesh, Mesh)> {
    vertex_count(field.time_steps(), field.frequency_bins())?;
    let terrain = terrain_mesh(field, spacing);
    terrain.validate("terrain")?;

    let extent = Vec2::new(
        field.time_steps().saturating_sub(1) as f32 * spacing.x,
        field.frequency_bins().saturating_sub(1) as f32 * spacing.y,
    );
    let base = base_mesh(extent, field.floor(), field.floor() - base_thickness);
    base.validate("base")?;

    Ok((terrain, base))
}

/// Vertex count of a `steps` x `bins` grid, if every vertex fits a `u32` index
fn vertex_count(steps: usize, bins: usize) -> Result<u32> {
    steps
        .checked_mul(bins)
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(|| {
            GeneratorError::consistency(format!(
                "{}x{} grid exceeds the u32 vertex index range",
                steps, bins
            ))
        })
}

/// One vertex per cell, two triangles per 2x2 block of adjacent cells
///
/// Callers check `vertex_count` first so indices cannot wrap.
fn terrain_mesh(field: &HeightField, spacing: Vec2) -> Mesh {
    let steps = field.time_steps();
    let bins = field.frequency_bins();
    let u_span = steps.saturating_sub(1).max(1) as f32;
    let v_span = bins.saturating_sub(1).max(1) as f32;

    let mut vertices = Vec::with_capacity(steps * bins);
    for t in 0..steps {
        for f in 0..bins {
            vertices.push(Vertex {
                position: [t as f32 * spacing.x, field.get(t, f), f as f32 * spacing.y],
                uv: [t as f32 / u_span, f as f32 / v_span],
            });
        }
    }

    // Counter-clockwise seen from +Y so normals face up
    let quads = steps.saturating_sub(1) * bins.saturating_sub(1);
    let mut indices = Vec::with_capacity(quads * 6);
    for t in 0..steps.saturating_sub(1) {
        for f in 0..bins.saturating_sub(1) {
            let here = (t * bins + f) as u32;
            let next_bin = here + 1;
            let next_step = ((t + 1) * bins + f) as u32;
            let diagonal = next_step + 1;

            indices.extend_from_slice(&[
                here, next_bin, next_step, //
                next_step, next_bin, diagonal,
            ]);
        }
    }

    Mesh { vertices, indices }
}

/// Closed box spanning `[0, extent.x] x [0, extent.y]` between `bottom` and `top`
fn base_mesh(extent: Vec2, top: f32, bottom: f32) -> Mesh {
    let (w, d) = (extent.x, extent.y);
    let corners = [
        [0.0, bottom, 0.0],
        [w, bottom, 0.0],
        [w, bottom, d],
        [0.0, bottom, d],
        [0.0, top, 0.0],
        [w, top, 0.0],
        [w, top, d],
        [0.0, top, d],
    ];
    let vertices = corners
        .iter()
        .map(|&position| Vertex {
            position,
            uv: [
                if w > 0.0 { position[0] / w } else { 0.0 },
                if d > 0.0 { position[2] / d } else { 0.0 },
            ],
        })
        .collect();

    #[rustfmt::skip]
    let indices = vec![
        4, 7, 5,  5, 7, 6, // top
        0, 1, 3,  1, 2, 3, // bottom
        0, 4, 1,  1, 4, 5, // z = 0
        3, 2, 7,  2, 6, 7, // z = depth
        0, 3, 4,  3, 7, 4, // x = 0
        1, 5, 2,  2, 5, 6, // x = width
    ];

    Mesh { vertices, indices }
}
