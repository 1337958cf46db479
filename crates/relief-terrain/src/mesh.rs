//! Terrain mesh: plane geometry carrying elevations, paired with a displacement material

use crate::descriptor::PlaneGeometryOptions;
use crate::elevation::ElevationSamples;
use crate::plane::{AttributeData, PlaneGeometry, VertexAttribute};
use crate::source::ResourceSource;
use relief_core::{ReliefError, Result};
use tracing::{info, warn};

/// Per-vertex attribute the vertex shader reads elevations from
pub const ELEVATION_ATTRIBUTE: &str = "elevation";
/// Uniform scaling elevation before vertical displacement
pub const VERTICAL_EXAGGERATION_UNIFORM: &str = "vertical_exaggeration";
pub const DEFAULT_VERTICAL_EXAGGERATION: f32 = 25.0;

/// Vertex and fragment stage programs, fetched as opaque text
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn load<S: ResourceSource + ?Sized>(
        source: &S,
        vertex_path: &str,
        fragment_path: &str,
    ) -> Result<Self> {
        let vertex = source.fetch_text(vertex_path)?;
        let fragment = source.fetch_text(fragment_path)?;

        let shaders = Self { vertex, fragment };
        for name in shaders.missing_bindings() {
            warn!(shader = vertex_path, name, "vertex shader does not mention expected binding");
        }
        Ok(shaders)
    }

    /// Names the mesh supplies that the vertex program never mentions
    pub fn missing_bindings(&self) -> Vec<&'static str> {
        [ELEVATION_ATTRIBUTE, VERTICAL_EXAGGERATION_UNIFORM]
            .into_iter()
            .filter(|name| !self.vertex.contains(name))
            .collect()
    }
}

/// Shader material that lifts each vertex along the plane normal by
/// `elevation * vertical_exaggeration`
#[derive(Debug, Clone)]
pub struct TerrainMaterial {
    pub shaders: ShaderSources,
    pub vertical_exaggeration: f32,
    /// Render both faces of the plane
    pub double_sided: bool,
    /// Draw triangle edges only
    pub wireframe: bool,
}

impl TerrainMaterial {
    pub fn new(shaders: ShaderSources, vertical_exaggeration: f32) -> Self {
        Self {
            shaders,
            vertical_exaggeration,
            double_sided: true,
            wireframe: true,
        }
    }
}

/// The renderable terrain: geometry plus material
pub struct TerrainMesh {
    pub geometry: PlaneGeometry,
    pub material: TerrainMaterial,
}

impl TerrainMesh {
    /// Build the grid, bind elevations to it in vertex order, and attach the material.
    ///
    /// Fails with `DataShape` when the sample count differs from the grid's vertex count.
    pub fn build(
        options: PlaneGeometryOptions,
        samples: ElevationSamples,
        material: TerrainMaterial,
    ) -> Result<Self> {
        if !material.vertical_exaggeration.is_finite() {
            return Err(ReliefError::DataShape(format!(
                "vertical exaggeration must be finite, got {}",
                material.vertical_exaggeration
            )));
        }

        let mut geometry = PlaneGeometry::new(options)?;
        samples.expect_len(geometry.vertex_count())?;

        geometry.set_attribute(VertexAttribute::new(
            ELEVATION_ATTRIBUTE,
            1,
            AttributeData::U16(samples.into_vec()),
        ))?;

        info!(
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            exaggeration = material.vertical_exaggeration,
            "built terrain mesh"
        );

        Ok(Self { geometry, material })
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Elevation value bound to each vertex, in vertex order
    pub fn elevations(&self) -> &[u16] {
        match self.geometry.attribute(ELEVATION_ATTRIBUTE).map(|a| &a.data) {
            Some(AttributeData::U16(values)) => values,
            _ => &[],
        }
    }

    /// Elevations widened to `f32` for upload
    pub fn elevation_data(&self) -> Vec<f32> {
        self.geometry
            .attribute(ELEVATION_ATTRIBUTE)
            .map(|a| a.data.to_f32())
            .unwrap_or_default()
    }
}
