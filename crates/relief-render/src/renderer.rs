//! Scene renderer: background clear plus the (optional) terrain mesh

use crate::camera::Camera;
use crate::context::RenderError;
use crate::gpu_terrain::GpuTerrain;
use crate::terrain_pipeline::TerrainPipeline;
use relief_core::Color;
use relief_terrain::TerrainMesh;

struct TerrainDraw {
    pipeline: TerrainPipeline,
    gpu: GpuTerrain,
}

/// Draws the scene into a color target with a matching depth target.
///
/// Until a terrain is attached the scene is the background color only.
pub struct TerrainRenderer {
    format: wgpu::TextureFormat,
    background: Color,
    terrain: Option<TerrainDraw>,
}

impl TerrainRenderer {
    pub fn new(format: wgpu::TextureFormat, background: Color) -> Self {
        Self {
            format,
            background,
            terrain: None,
        }
    }

    /// Compile the mesh's material and upload the mesh. Replaces any previous terrain.
    ///
    /// On error the previous terrain (or the blank scene) is kept.
    pub fn set_terrain(
        &mut self,
        device: &wgpu::Device,
        mesh: &TerrainMesh,
    ) -> Result<(), RenderError> {
        let pipeline = TerrainPipeline::new(device, self.format, &mesh.material)?;
        let gpu = GpuTerrain::upload(device, &pipeline, mesh)?;
        self.terrain = Some(TerrainDraw { pipeline, gpu });
        Ok(())
    }

    pub fn has_terrain(&self) -> bool {
        self.terrain.is_some()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Record and submit one frame
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        if let Some(terrain) = &self.terrain {
            terrain
                .gpu
                .update_uniforms(queue, camera.view_projection_matrix());
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Terrain Render Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Terrain Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(self.background)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(terrain) = &self.terrain {
                pass.set_pipeline(&terrain.pipeline.pipeline);
                terrain.gpu.draw(&mut pass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: color.a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_widens_components() {
        let c = clear_color(Color::from_hex(0xffffff));
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn new_renderer_is_blank() {
        let renderer = TerrainRenderer::new(wgpu::TextureFormat::Rgba8UnormSrgb, Color::WHITE);
        assert!(!renderer.has_terrain());
        assert_eq!(renderer.background(), Color::WHITE);
    }
}
