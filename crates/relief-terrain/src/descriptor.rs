//! Terrain descriptor (the small JSON document that names the elevation file)

use crate::source::ResourceSource;
use relief_core::{ReliefError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Source length units per scene unit
pub const SOURCE_UNITS_PER_SCENE_UNIT: f64 = 100.0;

/// Dimensions of a terrain asset, parsed from `terrainInfo.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainDescriptor {
    /// Elevation binary, relative to the application root
    pub filename: String,
    /// Full-resolution width in source units
    pub width: f64,
    /// Full-resolution height in source units
    pub height: f64,
    /// Decimated grid vertices along X
    pub reduced_width: u32,
    /// Decimated grid vertices along Y
    pub reduced_height: u32,
}

impl TerrainDescriptor {
    /// Parse and validate a descriptor from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let descriptor: TerrainDescriptor = serde_json::from_slice(bytes)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Reject grids that cannot form at least one quad per axis.
    ///
    /// The extent is taken as given; a zero extent still builds a (collapsed) plane.
    pub fn validate(&self) -> Result<()> {
        if self.reduced_width < 2 || self.reduced_height < 2 {
            return Err(ReliefError::DataShape(format!(
                "reduced grid must be at least 2x2 vertices, got {}x{}",
                self.reduced_width, self.reduced_height
            )));
        }
        Ok(())
    }

    /// Number of elevation samples (and mesh vertices) the descriptor implies
    pub fn vertex_count(&self) -> usize {
        self.reduced_width as usize * self.reduced_height as usize
    }

    /// Expected byte length of the paired elevation binary
    pub fn expected_byte_len(&self) -> usize {
        self.vertex_count() * 2
    }

    /// Derive plane geometry options in scene units
    pub fn plane_options(&self) -> PlaneGeometryOptions {
        PlaneGeometryOptions {
            width: (self.width / SOURCE_UNITS_PER_SCENE_UNIT) as f32,
            height: (self.height / SOURCE_UNITS_PER_SCENE_UNIT) as f32,
            width_segments: self.reduced_width.saturating_sub(1),
            height_segments: self.reduced_height.saturating_sub(1),
        }
    }
}

/// Shape of the flat grid the terrain is draped over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGeometryOptions {
    /// Extent along X in scene units
    pub width: f32,
    /// Extent along Y in scene units
    pub height: f32,
    /// Quads along X
    pub width_segments: u32,
    /// Quads along Y
    pub height_segments: u32,
}

impl PlaneGeometryOptions {
    pub fn vertex_count(&self) -> usize {
        (self.width_segments as usize + 1) * (self.height_segments as usize + 1)
    }

    pub fn quad_count(&self) -> usize {
        self.width_segments as usize * self.height_segments as usize
    }
}

/// Fetch and parse the descriptor at `path`
pub fn load_descriptor<S: ResourceSource + ?Sized>(
    source: &S,
    path: &str,
) -> Result<TerrainDescriptor> {
    let bytes = source.fetch(path)?;
    let descriptor = TerrainDescriptor::from_json(&bytes).map_err(|e| match e {
        ReliefError::Parse(msg) => ReliefError::Parse(format!("{}: {}", path, msg)),
        other => other,
    })?;

    info!(
        filename = %descriptor.filename,
        grid = %format!("{}x{}", descriptor.reduced_width, descriptor.reduced_height),
        "loaded terrain descriptor"
    );
    Ok(descriptor)
}
