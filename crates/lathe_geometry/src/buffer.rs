//! Built geometry handed to the renderer

use crate::bounds::BoundingBox;
use crate::vertex::{Topology, VertexFormat, VertexLayout};

/// Packed vertex data, optional indices and the metadata needed to draw them
///
/// Vertex data is stored as raw bytes so one buffer type covers every vertex
/// format; `layout` and `vertex_stride` describe how to read it back.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryBuffer {
    vertex_data: Vec<u8>,
    layout: VertexLayout,
    indices: Option<Vec<u32>>,
    topology: Topology,
    vertex_count: usize,
    bounding_box: Option<BoundingBox>,
}

impl GeometryBuffer {
    /// Indexed geometry
    pub fn indexed<V: VertexFormat>(vertices: &[V], indices: Vec<u32>, topology: Topology) -> Self {
        Self {
            vertex_data: bytemuck::cast_slice(vertices).to_vec(),
            layout: V::LAYOUT,
            indices: Some(indices),
            topology,
            vertex_count: vertices.len(),
            bounding_box: None,
        }
    }

    /// Non-indexed geometry
    pub fn non_indexed<V: VertexFormat>(vertices: &[V], topology: Topology) -> Self {
        Self {
            vertex_data: bytemuck::cast_slice(vertices).to_vec(),
            layout: V::LAYOUT,
            indices: None,
            topology,
            vertex_count: vertices.len(),
            bounding_box: None,
        }
    }

    /// Placeholder geometry with no vertices and no layout
    pub fn null() -> Self {
        Self {
            vertex_data: Vec::new(),
            layout: VertexLayout::EMPTY,
            indices: None,
            topology: Topology::Undefined,
            vertex_count: 0,
            bounding_box: None,
        }
    }

    /// Attach a bounding box, marking it valid
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = Some(bbox);
        self
    }

    /// Packed vertex bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertex_data
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_stride(&self) -> usize {
        self.layout.stride
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn index_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    /// Triangle count for triangle lists; indexed geometry counts indices
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::TriangleList if self.is_indexed() => self.index_count() / 3,
            Topology::TriangleList => self.vertex_count / 3,
            _ => 0,
        }
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    pub fn has_bounding_box(&self) -> bool {
        self.bounding_box.is_some()
    }

    /// Decode the packed vertices back into `V`
    ///
    /// Returns an empty list when `V` does not match the stored layout.
    pub fn read_vertices<V: VertexFormat>(&self) -> Vec<V> {
        if V::LAYOUT != self.layout || self.layout.stride == 0 {
            return Vec::new();
        }
        self.vertex_data
            .chunks_exact(self.layout.stride)
            .map(bytemuck::pod_read_unaligned)
            .collect()
    }
}
