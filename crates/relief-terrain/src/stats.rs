//! Summary statistics for a loaded terrain

use crate::descriptor::TerrainDescriptor;
use crate::elevation::ElevationSamples;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainStats {
    pub grid_width: u32,
    pub grid_height: u32,
    pub vertex_count: usize,
    pub quad_count: usize,
    /// Plane extent in scene units
    pub extent: (f32, f32),
    pub min_elevation: u16,
    pub max_elevation: u16,
    pub mean_elevation: f64,
}

impl TerrainStats {
    pub fn compute(descriptor: &TerrainDescriptor, samples: &ElevationSamples) -> Self {
        let options = descriptor.plane_options();
        let (min_elevation, max_elevation) = samples.range().unwrap_or((0, 0));

        Self {
            grid_width: descriptor.reduced_width,
            grid_height: descriptor.reduced_height,
            vertex_count: options.vertex_count(),
            quad_count: options.quad_count(),
            extent: (options.width, options.height),
            min_elevation,
            max_elevation,
            mean_elevation: samples.mean().unwrap_or(0.0),
        }
    }
}

impl fmt::Display for TerrainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid:      {} x {} vertices", self.grid_width, self.grid_height)?;
        writeln!(f, "Vertices:  {}", self.vertex_count)?;
        writeln!(f, "Quads:     {}", self.quad_count)?;
        writeln!(f, "Extent:    {} x {} scene units", self.extent.0, self.extent.1)?;
        write!(
            f,
            "Elevation: min {} / max {} / mean {:.1}",
            self.min_elevation, self.max_elevation, self.mean_elevation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_for_small_grid() {
        let descriptor = TerrainDescriptor {
            filename: "e.bin".to_string(),
            width: 200.0,
            height: 100.0,
            reduced_width: 3,
            reduced_height: 2,
        };
        let samples = ElevationSamples::from_vec(vec![5, 1, 9, 3, 3, 3]);
        let stats = TerrainStats::compute(&descriptor, &samples);

        assert_eq!(stats.vertex_count, 6);
        assert_eq!(stats.quad_count, 2);
        assert_eq!(stats.extent, (2.0, 1.0));
        assert_eq!((stats.min_elevation, stats.max_elevation), (1, 9));
        assert!((stats.mean_elevation - 4.0).abs() < 1e-9);
        assert!(stats.to_string().contains("3 x 2 vertices"));
    }
}
