//! Terrain rendering pipeline: a wireframe plane displaced by a per-vertex elevation

use crate::context::{RenderError, DEPTH_FORMAT};
use bytemuck::{Pod, Zeroable};
use relief_terrain::TerrainMaterial;

/// Uniform block shared by both shader stages (bind group 0, binding 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TerrainUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub vertical_exaggeration: f32,
    pub _padding: [f32; 3],
}

impl TerrainUniforms {
    pub fn new(view_proj: [[f32; 4]; 4], vertical_exaggeration: f32) -> Self {
        Self {
            view_proj,
            vertical_exaggeration,
            _padding: [0.0; 3],
        }
    }
}

/// Vertex buffer slot 0: plane positions
pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBS,
    }
}

/// Vertex buffer slot 1: the `elevation` scalar
pub fn elevation_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBS,
    }
}

/// The terrain render pipeline
pub struct TerrainPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
}

impl TerrainPipeline {
    /// Compile the material's fetched shader text and build the pipeline.
    ///
    /// Creation runs inside a validation error scope so malformed shader text
    /// comes back as `RenderError::ShaderCompilation`.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        material: &TerrainMaterial,
    ) -> Result<Self, RenderError> {
        let shaders = &material.shaders;
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Terrain Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders.vertex.as_str().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Terrain Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders.fragment.as_str().into()),
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Terrain Uniform Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Terrain Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Terrain Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[position_layout(), elevation_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: primitive_topology(material),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: if material.double_sided { None } else { Some(wgpu::Face::Back) },
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompilation(err.to_string()));
        }

        Ok(Self {
            pipeline,
            uniform_bind_group_layout,
        })
    }
}

/// Wireframe draws a line list over triangle edges, so no optional
/// POLYGON_MODE_LINE feature is required.
pub fn primitive_topology(material: &TerrainMaterial) -> wgpu::PrimitiveTopology {
    if material.wireframe {
        wgpu::PrimitiveTopology::LineList
    } else {
        wgpu::PrimitiveTopology::TriangleList
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_terrain::ShaderSources;

    #[test]
    fn wireframe_material_draws_lines() {
        let shaders = ShaderSources {
            vertex: String::new(),
            fragment: String::new(),
        };
        let mut material = TerrainMaterial::new(shaders, 25.0);
        assert_eq!(primitive_topology(&material), wgpu::PrimitiveTopology::LineList);
        material.wireframe = false;
        assert_eq!(primitive_topology(&material), wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn uniform_block_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<TerrainUniforms>(), 80);
        assert_eq!(std::mem::size_of::<TerrainUniforms>() % 16, 0);
    }

    #[test]
    fn vertex_slots_use_distinct_locations() {
        let positions = position_layout();
        let elevations = elevation_layout();
        assert_eq!(positions.attributes[0].shader_location, 0);
        assert_eq!(elevations.attributes[0].shader_location, 1);
        assert_eq!(elevations.array_stride, 4);
        assert_eq!(elevations.attributes[0].format, wgpu::VertexFormat::Float32);
    }
}
