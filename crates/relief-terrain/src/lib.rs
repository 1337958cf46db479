//! Relief Terrain - Terrain data ingestion and mesh construction
//!
//! Loads a JSON terrain descriptor and its binary elevation grid through a
//! `ResourceSource` (directory or HTTP), then builds a flat plane mesh with
//! one elevation scalar per vertex. Does not depend on relief-render; the
//! mesh is plain data (positions, indices, named attributes, shader text)
//! for the renderer to consume.

pub mod descriptor;
pub mod elevation;
pub mod mesh;
pub mod pipeline;
pub mod plane;
pub mod source;
pub mod stats;

pub use descriptor::{load_descriptor, PlaneGeometryOptions, TerrainDescriptor};
pub use elevation::{load_elevations, ElevationSamples};
pub use mesh::{
    ShaderSources, TerrainMaterial, TerrainMesh, DEFAULT_VERTICAL_EXAGGERATION,
    ELEVATION_ATTRIBUTE, VERTICAL_EXAGGERATION_UNIFORM,
};
pub use pipeline::{LoadedTerrain, TerrainLoader, TerrainPaths};
pub use plane::{AttributeData, PlaneGeometry, VertexAttribute};
pub use source::{source_for_root, DirectorySource, HttpSource, ResourceSource};
pub use stats::TerrainStats;
