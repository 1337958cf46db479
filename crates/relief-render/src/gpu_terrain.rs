//! GPU-resident terrain mesh

use crate::context::RenderError;
use crate::terrain_pipeline::{TerrainPipeline, TerrainUniforms};
use relief_terrain::TerrainMesh;
use wgpu::util::DeviceExt;

/// Byte sizes of the per-terrain buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainBufferSizes {
    pub positions: u64,
    pub elevations: u64,
    pub indices: u64,
}

impl TerrainBufferSizes {
    pub fn for_counts(vertex_count: usize, index_count: usize) -> Self {
        let vertex_count = vertex_count as u64;
        Self {
            positions: vertex_count * std::mem::size_of::<[f32; 3]>() as u64,
            elevations: vertex_count * std::mem::size_of::<f32>() as u64,
            indices: index_count as u64 * std::mem::size_of::<u32>() as u64,
        }
    }

    /// Fail on the first buffer larger than `max_buffer_size`
    pub fn check(&self, max_buffer_size: u64) -> Result<(), RenderError> {
        let buffers = [
            ("terrain position buffer", self.positions),
            ("terrain elevation buffer", self.elevations),
            ("terrain index buffer", self.indices),
        ];
        for (label, size) in buffers {
            if size > max_buffer_size {
                return Err(RenderError::BufferTooLarge {
                    label: label.to_string(),
                    size,
                    max: max_buffer_size,
                });
            }
        }
        Ok(())
    }
}

/// Buffers and bind group for one uploaded terrain mesh
pub struct GpuTerrain {
    pub position_buffer: wgpu::Buffer,
    pub elevation_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub vertical_exaggeration: f32,
}

impl GpuTerrain {
    /// Upload positions, the elevation attribute, and wireframe indices.
    ///
    /// Buffers over the device's `max_buffer_size` are refused before any GPU
    /// call; anything else the device rejects comes back as `RenderError::Upload`.
    pub fn upload(
        device: &wgpu::Device,
        pipeline: &TerrainPipeline,
        mesh: &TerrainMesh,
    ) -> Result<Self, RenderError> {
        let indices = draw_indices(mesh);
        TerrainBufferSizes::for_counts(mesh.vertex_count(), indices.len())
            .check(device.limits().max_buffer_size)?;

        let elevations = mesh.elevation_data();

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Position Buffer"),
            contents: bytemuck::cast_slice(&mesh.geometry.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let elevation_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Elevation Buffer"),
            contents: bytemuck::cast_slice(&elevations),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let vertical_exaggeration = mesh.material.vertical_exaggeration;
        let uniforms = TerrainUniforms::new(IDENTITY, vertical_exaggeration);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Terrain Uniform Bind Group"),
            layout: &pipeline.uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        if let Some(err) = validation.or(out_of_memory) {
            return Err(RenderError::Upload(err.to_string()));
        }

        Ok(Self {
            position_buffer,
            elevation_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            vertical_exaggeration,
        })
    }

    /// Write this frame's view-projection into the uniform buffer
    pub fn update_uniforms(&self, queue: &wgpu::Queue, view_proj: [[f32; 4]; 4]) {
        let uniforms = TerrainUniforms::new(view_proj, self.vertical_exaggeration);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.position_buffer.slice(..));
        pass.set_vertex_buffer(1, self.elevation_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Line list over the triangle edges for wireframe materials, the triangles otherwise
fn draw_indices(mesh: &TerrainMesh) -> Vec<u32> {
    if mesh.material.wireframe {
        mesh.geometry.wireframe_indices()
    } else {
        mesh.geometry.indices.clone()
    }
}

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;
    use relief_terrain::{
        ElevationSamples, PlaneGeometryOptions, ShaderSources, TerrainMaterial,
        DEFAULT_VERTICAL_EXAGGERATION,
    };

    /// wgpu's default `max_buffer_size` (256 MiB)
    const DEFAULT_MAX_BUFFER_SIZE: u64 = 256 << 20;

    /// Index count of the wireframe over a `ws` x `hs` segment grid:
    /// horizontal, vertical, and diagonal edges, two indices each
    fn wireframe_index_count(ws: usize, hs: usize) -> usize {
        2 * (ws * (hs + 1) + (ws + 1) * hs + ws * hs)
    }

    fn small_mesh(wireframe: bool) -> TerrainMesh {
        let shaders = ShaderSources {
            vertex: String::new(),
            fragment: String::new(),
        };
        let mut material = TerrainMaterial::new(shaders, DEFAULT_VERTICAL_EXAGGERATION);
        material.wireframe = wireframe;
        let options = PlaneGeometryOptions {
            width: 2.0,
            height: 2.0,
            width_segments: 2,
            height_segments: 2,
        };
        TerrainMesh::build(options, ElevationSamples::from_vec(vec![0; 9]), material).unwrap()
    }

    #[test]
    fn draw_indices_follow_material() {
        assert_eq!(draw_indices(&small_mesh(true)).len(), wireframe_index_count(2, 2));
        assert_eq!(draw_indices(&small_mesh(false)).len(), 2 * 2 * 6);
    }

    #[test]
    fn sizes_per_buffer() {
        let sizes = TerrainBufferSizes::for_counts(9, 32);
        assert_eq!(sizes.positions, 9 * 12);
        assert_eq!(sizes.elevations, 9 * 4);
        assert_eq!(sizes.indices, 32 * 4);
        assert!(sizes.check(DEFAULT_MAX_BUFFER_SIZE).is_ok());
    }

    #[test]
    fn oversized_wireframe_is_refused_not_panicking() {
        // 3500 x 3500 vertices: every data check passes, but the index buffer
        // is past the default device limit
        let sizes = TerrainBufferSizes::for_counts(
            3500 * 3500,
            wireframe_index_count(3499, 3499),
        );
        assert_eq!(sizes.indices, 293_888_008);

        let err = sizes.check(DEFAULT_MAX_BUFFER_SIZE).unwrap_err();
        match err {
            RenderError::BufferTooLarge { label, size, max } => {
                assert_eq!(label, "terrain index buffer");
                assert_eq!(size, 293_888_008);
                assert_eq!(max, DEFAULT_MAX_BUFFER_SIZE);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn limit_is_inclusive() {
        let mesh = small_mesh(true);
        let sizes = TerrainBufferSizes::for_counts(mesh.vertex_count(), draw_indices(&mesh).len());
        let largest = sizes.positions.max(sizes.elevations).max(sizes.indices);
        assert!(sizes.check(largest).is_ok());
        assert!(sizes.check(largest - 1).is_err());
    }
}
