//! Terrain loading pipeline: descriptor -> elevations -> shaders -> mesh
//!
//! Each stage depends on the previous one's output. Any failure aborts the
//! whole load; nothing partial is returned.

use crate::descriptor::{load_descriptor, TerrainDescriptor};
use crate::elevation::{load_elevations, ElevationSamples};
use crate::mesh::{ShaderSources, TerrainMaterial, TerrainMesh, DEFAULT_VERTICAL_EXAGGERATION};
use crate::source::ResourceSource;
use crate::stats::TerrainStats;
use relief_core::Result;
use tracing::{info, info_span};

pub const DEFAULT_DESCRIPTOR_PATH: &str = "terrainInfo.json";
pub const DEFAULT_VERTEX_SHADER_PATH: &str = "shaders/terrain.vert.wgsl";
pub const DEFAULT_FRAGMENT_SHADER_PATH: &str = "shaders/terrain.frag.wgsl";

/// Application-relative locations of the terrain assets
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainPaths {
    pub descriptor: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
}

impl Default for TerrainPaths {
    fn default() -> Self {
        Self {
            descriptor: DEFAULT_DESCRIPTOR_PATH.to_string(),
            vertex_shader: DEFAULT_VERTEX_SHADER_PATH.to_string(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER_PATH.to_string(),
        }
    }
}

/// A terrain ready to hand to the scene host
pub struct LoadedTerrain {
    pub descriptor: TerrainDescriptor,
    pub mesh: TerrainMesh,
    pub stats: TerrainStats,
}

/// Drives the load stages against a resource source
pub struct TerrainLoader<S: ResourceSource> {
    source: S,
    paths: TerrainPaths,
    vertical_exaggeration: f32,
}

impl<S: ResourceSource> TerrainLoader<S> {
    pub fn new(source: S, paths: TerrainPaths) -> Self {
        Self {
            source,
            paths,
            vertical_exaggeration: DEFAULT_VERTICAL_EXAGGERATION,
        }
    }

    pub fn with_vertical_exaggeration(mut self, vertical_exaggeration: f32) -> Self {
        self.vertical_exaggeration = vertical_exaggeration;
        self
    }

    pub fn paths(&self) -> &TerrainPaths {
        &self.paths
    }

    /// Descriptor and elevations only, validated against each other
    pub fn load_data(&self) -> Result<(TerrainDescriptor, ElevationSamples)> {
        let descriptor = load_descriptor(&self.source, &self.paths.descriptor)?;
        let samples = load_elevations(&self.source, &descriptor.filename)?;
        samples.expect_len(descriptor.vertex_count())?;
        Ok((descriptor, samples))
    }

    /// Run every stage and build the mesh
    pub fn load(&self) -> Result<LoadedTerrain> {
        let _span = info_span!(
            "load_terrain",
            descriptor = %self.source.describe(&self.paths.descriptor)
        )
        .entered();

        let (descriptor, samples) = self.load_data()?;
        let stats = TerrainStats::compute(&descriptor, &samples);

        let shaders = ShaderSources::load(
            &self.source,
            &self.paths.vertex_shader,
            &self.paths.fragment_shader,
        )?;

        let material = TerrainMaterial::new(shaders, self.vertical_exaggeration);
        let mesh = TerrainMesh::build(descriptor.plane_options(), samples, material)?;

        info!(
            vertices = stats.vertex_count,
            min = stats.min_elevation,
            max = stats.max_elevation,
            "terrain ready"
        );

        Ok(LoadedTerrain {
            descriptor,
            mesh,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevation::ElevationSamples;
    use crate::source::testing::MemorySource;

    const DESCRIPTOR: &str =
        r#"{"filename":"e.bin","width":200,"height":200,"reducedWidth":3,"reducedHeight":3}"#;

    fn elevation_bytes(values: Vec<u16>) -> Vec<u8> {
        ElevationSamples::from_vec(values).to_le_bytes()
    }

    fn full_source() -> MemorySource {
        MemorySource::new()
            .with("terrainInfo.json", DESCRIPTOR)
            .with(
                "e.bin",
                elevation_bytes(vec![0, 100, 200, 300, 400, 500, 600, 700, 800]),
            )
            .with(
                DEFAULT_VERTEX_SHADER_PATH,
                "elevation vertical_exaggeration",
            )
            .with(DEFAULT_FRAGMENT_SHADER_PATH, "fragment")
    }

    #[test]
    fn loads_scenario_terrain() {
        let source = full_source();
        let loader = TerrainLoader::new(&source, TerrainPaths::default());
        let terrain = loader.load().unwrap();

        let opts = terrain.mesh.geometry.options;
        assert_eq!(opts.width, 2.0);
        assert_eq!(opts.height, 2.0);
        assert_eq!(opts.width_segments, 2);
        assert_eq!(opts.height_segments, 2);

        assert_eq!(terrain.mesh.vertex_count(), 9);
        assert_eq!(
            terrain.mesh.elevations(),
            &[0, 100, 200, 300, 400, 500, 600, 700, 800]
        );
        assert_eq!(terrain.mesh.material.vertical_exaggeration, 25.0);
        assert_eq!(terrain.stats.max_elevation, 800);

        assert_eq!(
            source.requests(),
            vec![
                "terrainInfo.json".to_string(),
                "e.bin".to_string(),
                DEFAULT_VERTEX_SHADER_PATH.to_string(),
                DEFAULT_FRAGMENT_SHADER_PATH.to_string(),
            ]
        );
    }

    #[test]
    fn descriptor_404_aborts_before_binary_fetch() {
        let source = MemorySource::new().with(
            "e.bin",
            elevation_bytes(vec![0; 9]),
        );
        let loader = TerrainLoader::new(&source, TerrainPaths::default());

        let err = loader.load().err().unwrap();
        assert!(err.is_resource_load());
        assert!(!source.was_requested("e.bin"));
        assert_eq!(source.requests(), vec!["terrainInfo.json".to_string()]);
    }

    #[test]
    fn missing_binary_names_the_file() {
        let source = MemorySource::new().with("terrainInfo.json", DESCRIPTOR);
        let loader = TerrainLoader::new(&source, TerrainPaths::default());

        let err = loader.load().err().unwrap();
        assert!(err.is_resource_load());
        assert!(err.to_string().contains("e.bin"));
        assert!(!source.was_requested(DEFAULT_VERTEX_SHADER_PATH));
    }

    #[test]
    fn odd_length_binary_is_data_shape_error() {
        let mut bytes = elevation_bytes(vec![1; 9]);
        bytes.pop();
        let source = MemorySource::new()
            .with("terrainInfo.json", DESCRIPTOR)
            .with("e.bin", bytes);
        let loader = TerrainLoader::new(&source, TerrainPaths::default());

        let err = loader.load().err().unwrap();
        assert!(err.is_data_shape());
    }

    #[test]
    fn sample_count_mismatch_is_data_shape_error() {
        let source = MemorySource::new()
            .with("terrainInfo.json", DESCRIPTOR)
            .with("e.bin", elevation_bytes(vec![1; 8]));
        let loader = TerrainLoader::new(&source, TerrainPaths::default());

        assert!(loader.load_data().unwrap_err().is_data_shape());
    }

    #[test]
    fn shader_failure_aborts_load() {
        let source = MemorySource::new()
            .with("terrainInfo.json", DESCRIPTOR)
            .with("e.bin", elevation_bytes(vec![1; 9]))
            .with(DEFAULT_VERTEX_SHADER_PATH, "elevation");
        let loader = TerrainLoader::new(&source, TerrainPaths::default());

        let err = loader.load().err().unwrap();
        assert!(err.is_resource_load());
        assert!(err.to_string().contains("terrain.frag.wgsl"));
    }

    #[test]
    fn custom_paths_and_exaggeration() {
        let source = MemorySource::new()
            .with("mars/info.json", DESCRIPTOR)
            .with("e.bin", elevation_bytes(vec![7; 9]))
            .with("v.wgsl", "elevation vertical_exaggeration")
            .with("f.wgsl", "fragment");
        let paths = TerrainPaths {
            descriptor: "./mars/info.json".to_string(),
            vertex_shader: "v.wgsl".to_string(),
            fragment_shader: "f.wgsl".to_string(),
        };
        let loader = TerrainLoader::new(&source, paths).with_vertical_exaggeration(3.5);

        let terrain = loader.load().unwrap();
        assert_eq!(terrain.mesh.material.vertical_exaggeration, 3.5);
        assert_eq!(terrain.descriptor.filename, "e.bin");
    }
}
