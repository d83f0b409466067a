//! Separable box smoothing along the frequency and time axes.

use rayon::prelude::*;

use super::SpectrogramGrid;

/// Smooth along frequency, then along time
///
/// A radius of 0 leaves that axis untouched.
pub fn smooth(
    grid: &SpectrogramGrid,
    harmonic_radius: usize,
    temporal_radius: usize,
) -> SpectrogramGrid {
    let harmonic = smooth_harmonic(grid, harmonic_radius);
    smooth_temporal(&harmonic, temporal_radius)
}

/// Average each cell with up to `radius` neighbouring bins on each side
///
/// The window shrinks at the ends of the spectrum instead of wrapping.
pub fn smooth_harmonic(grid: &SpectrogramGrid, radius: usize) -> SpectrogramGrid {
    if radius == 0 {
        return grid.clone();
    }

    let bins = grid.frequency_bins();
    let mut out = SpectrogramGrid::zeros(grid.time_steps(), bins);
    out.values_mut()
        .par_chunks_mut(bins)
        .zip(grid.values().par_chunks(bins))
        .for_each(|(out_row, in_row)| {
            for (bin, cell) in out_row.iter_mut().enumerate() {
                let lo = bin.saturating_sub(radius);
                let hi = (bin + radius).min(bins - 1);
                let window = &in_row[lo..=hi];
                *cell = window.iter().sum::<f32>() / window.len() as f32;
            }
        });
    out
}

/// Average each cell with up to `radius` neighbouring time steps on each side
///
/// The window shrinks at the first and last steps instead of wrapping.
pub fn smooth_temporal(grid: &SpectrogramGrid, radius: usize) -> SpectrogramGrid {
    if radius == 0 {
        return grid.clone();
    }

    let steps = grid.time_steps();
    let bins = grid.frequency_bins();
    let mut out = SpectrogramGrid::zeros(steps, bins);
    out.values_mut()
        .par_chunks_mut(bins)
        .enumerate()
        .for_each(|(step, out_row)| {
            let lo = step.saturating_sub(radius);
            let hi = (step + radius).min(steps - 1);
            for neighbour in lo..=hi {
                for (cell, value) in out_row.iter_mut().zip(grid.row(neighbour)) {
                    *cell += value;
                }
            }
            let count = (hi - lo + 1) as f32;
            for cell in out_row.iter_mut() {
                *cell /= count;
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_grid() -> SpectrogramGrid {
        let values = (0..20).map(|v| (v * v % 7) as f32).collect();
        SpectrogramGrid::from_values(4, 5, values).unwrap()
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let grid = ramp_grid();
        assert_eq!(smooth(&grid, 0, 0), grid);
    }

    #[test]
    fn test_harmonic_window_shrinks_at_edges() {
        let grid = SpectrogramGrid::from_values(1, 4, vec![0.0, 3.0, 6.0, 9.0]).unwrap();
        let smoothed = smooth_harmonic(&grid, 1);

        assert_eq!(smoothed.row(0), &[1.5, 3.0, 6.0, 7.5]);
    }

    #[test]
    fn test_temporal_only_touches_time_axis() {
        let values = vec![0.0, 10.0, 3.0, 10.0, 6.0, 10.0];
        let grid = SpectrogramGrid::from_values(3, 2, values).unwrap();
        let smoothed = smooth(&grid, 0, 1);

        assert_eq!(smoothed.row(0), &[1.5, 10.0]);
        assert_eq!(smoothed.row(1), &[3.0, 10.0]);
        assert_eq!(smoothed.row(2), &[4.5, 10.0]);
    }

    #[test]
    fn test_radius_larger_than_grid_averages_everything() {
        let grid = SpectrogramGrid::from_values(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let smoothed = smooth(&grid, 10, 10);

        assert!(smoothed.values().iter().all(|&v| (v - 2.5).abs() < 1e-6));
    }

    #[test]
    fn test_dimensions_are_preserved() {
        let grid = ramp_grid();
        let smoothed = smooth(&grid, 2, 1);
        assert_eq!(smoothed.time_steps(), grid.time_steps());
        assert_eq!(smoothed.frequency_bins(), grid.frequency_bins());
    }
}
