//! Relief Render - wgpu-based renderer for terrain meshes
//!
//! This crate hosts the scene for a `relief_terrain::TerrainMesh`: window and
//! headless contexts, an orbit camera, and a pipeline that compiles the
//! mesh's fetched WGSL and draws it as a displaced wireframe.

mod camera;
mod context;
mod gpu_terrain;
mod headless;
mod renderer;
pub mod terrain_pipeline;

pub use camera::{Camera, FovPreserver};
pub use context::{RenderContext, RenderError, DEPTH_FORMAT};
pub use gpu_terrain::{GpuTerrain, TerrainBufferSizes};
pub use headless::HeadlessContext;
pub use renderer::TerrainRenderer;
pub use terrain_pipeline::{TerrainPipeline, TerrainUniforms};

#[cfg(test)]
mod tests {
    use relief_terrain::{ShaderSources, ELEVATION_ATTRIBUTE, VERTICAL_EXAGGERATION_UNIFORM};

    const VERTEX_SHADER: &str = include_str!("../../../assets/shaders/terrain.vert.wgsl");
    const FRAGMENT_SHADER: &str = include_str!("../../../assets/shaders/terrain.frag.wgsl");

    #[test]
    fn vertex_shader_wgsl_parses() {
        naga::front::wgsl::parse_str(VERTEX_SHADER).expect("terrain.vert.wgsl failed to parse");
    }

    #[test]
    fn fragment_shader_wgsl_parses() {
        naga::front::wgsl::parse_str(FRAGMENT_SHADER).expect("terrain.frag.wgsl failed to parse");
    }

    #[test]
    fn vertex_shader_declares_expected_bindings() {
        let shaders = ShaderSources {
            vertex: VERTEX_SHADER.to_string(),
            fragment: FRAGMENT_SHADER.to_string(),
        };
        assert!(shaders.missing_bindings().is_empty());
        assert!(VERTEX_SHADER.contains(ELEVATION_ATTRIBUTE));
        assert!(VERTEX_SHADER.contains(VERTICAL_EXAGGERATION_UNIFORM));
    }

    #[test]
    fn vertex_shader_entry_point_reads_elevation_slot() {
        let module = naga::front::wgsl::parse_str(VERTEX_SHADER).unwrap();
        let entry = module
            .entry_points
            .iter()
            .find(|ep| ep.name == "vs_main")
            .expect("vs_main entry point");
        assert_eq!(entry.stage, naga::ShaderStage::Vertex);
    }

    #[test]
    fn fragment_shader_has_fs_main() {
        let module = naga::front::wgsl::parse_str(FRAGMENT_SHADER).unwrap();
        assert!(module
            .entry_points
            .iter()
            .any(|ep| ep.name == "fs_main" && ep.stage == naga::ShaderStage::Fragment));
    }
}
