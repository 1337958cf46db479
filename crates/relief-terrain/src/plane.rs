//! Flat grid geometry with named per-vertex attributes

use crate::descriptor::PlaneGeometryOptions;
use relief_core::{ReliefError, Result};
use std::collections::HashSet;

/// Values bound to a per-vertex attribute slot
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl AttributeData {
    pub fn len(&self) -> usize {
        match self {
            AttributeData::U16(v) => v.len(),
            AttributeData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values widened to `f32`, as the GPU consumes them
    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            AttributeData::U16(v) => v.iter().map(|&x| x as f32).collect(),
            AttributeData::F32(v) => v.clone(),
        }
    }
}

/// An immutable data block bound to a named per-vertex slot
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    pub name: String,
    /// Components per vertex
    pub item_size: usize,
    pub data: AttributeData,
}

impl VertexAttribute {
    pub fn new(name: impl Into<String>, item_size: usize, data: AttributeData) -> Self {
        Self {
            name: name.into(),
            item_size,
            data,
        }
    }
}

/// A rectangular grid of vertices in the local XY plane, centered at the origin.
///
/// Vertices are generated row by row starting at the top edge (`y = +height/2`),
/// left to right within a row. Attributes bound later must follow the same order.
pub struct PlaneGeometry {
    pub options: PlaneGeometryOptions,
    /// Vertex positions (z = 0 before displacement)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, all +Z
    pub normals: Vec<[f32; 3]>,
    /// UV coordinates, v = 1 on the top row
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices (CCW winding seen from +Z)
    pub indices: Vec<u32>,
    attributes: Vec<VertexAttribute>,
}

impl PlaneGeometry {
    pub fn new(options: PlaneGeometryOptions) -> Result<Self> {
        let grid_x = options.width_segments;
        let grid_y = options.height_segments;
        if grid_x == 0 || grid_y == 0 {
            return Err(ReliefError::DataShape(format!(
                "plane needs at least one segment per axis, got {}x{}",
                grid_x, grid_y
            )));
        }

        let verts_x = grid_x + 1;
        let verts_y = grid_y + 1;
        let vert_count = options.vertex_count();

        let half_w = options.width / 2.0;
        let half_h = options.height / 2.0;
        let segment_w = options.width / grid_x as f32;
        let segment_h = options.height / grid_y as f32;

        let mut positions = Vec::with_capacity(vert_count);
        let mut uvs = Vec::with_capacity(vert_count);

        for iy in 0..verts_y {
            let y = half_h - iy as f32 * segment_h;
            for ix in 0..verts_x {
                let x = ix as f32 * segment_w - half_w;
                positions.push([x, y, 0.0]);
                uvs.push([
                    ix as f32 / grid_x as f32,
                    1.0 - iy as f32 / grid_y as f32,
                ]);
            }
        }

        let normals = vec![[0.0, 0.0, 1.0]; vert_count];

        let mut indices = Vec::with_capacity(options.quad_count() * 6);
        for qy in 0..grid_y {
            for qx in 0..grid_x {
                let tl = qy * verts_x + qx;
                let tr = tl + 1;
                let bl = tl + verts_x;
                let br = bl + 1;

                indices.extend_from_slice(&[tl, bl, tr]);
                indices.extend_from_slice(&[bl, br, tr]);
            }
        }

        Ok(Self {
            options,
            positions,
            normals,
            uvs,
            indices,
            attributes: Vec::new(),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bind a per-vertex attribute, replacing any attribute of the same name.
    ///
    /// The data must hold exactly `item_size` values per vertex.
    pub fn set_attribute(&mut self, attribute: VertexAttribute) -> Result<()> {
        let expected = self.vertex_count() * attribute.item_size;
        if attribute.item_size == 0 || attribute.data.len() != expected {
            return Err(ReliefError::DataShape(format!(
                "attribute '{}' has {} values, expected {} ({} vertices x {})",
                attribute.name,
                attribute.data.len(),
                expected,
                self.vertex_count(),
                attribute.item_size
            )));
        }

        self.attributes.retain(|a| a.name != attribute.name);
        self.attributes.push(attribute);
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Line-list indices covering every triangle edge once
    pub fn wireframe_indices(&self) -> Vec<u32> {
        triangles_to_line_indices(&self.indices)
    }
}

/// Convert a triangle list into deduplicated edge pairs
pub fn triangles_to_line_indices(indices: &[u32]) -> Vec<u32> {
    let mut edges: HashSet<(u32, u32)> = HashSet::new();
    let mut line_indices = Vec::new();

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        for &(i, j) in &[(a, b), (b, c), (c, a)] {
            let edge = if i < j { (i, j) } else { (j, i) };
            if edges.insert(edge) {
                line_indices.push(edge.0);
                line_indices.push(edge.1);
            }
        }
    }

    line_indices
}
