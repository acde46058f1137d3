//! Vertex formats and layouts
//!
//! Vertices are plain `#[repr(C)]` structs packed into byte buffers. The
//! layout descriptors here are the only thing a renderer needs to bind them;
//! nothing in this module knows about a particular graphics API.

use serde::{Deserialize, Serialize};

/// Meaning of a vertex attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Semantic {
    Position,
    Normal,
    TexCoord,
}

/// Storage format of a vertex attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
}

impl AttributeFormat {
    /// Size in bytes
    pub const fn size(self) -> usize {
        match self {
            AttributeFormat::Float32x2 => 8,
            AttributeFormat::Float32x3 => 12,
        }
    }
}

/// One attribute inside a vertex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    pub semantic: Semantic,
    pub format: AttributeFormat,
    /// Byte offset from the start of the vertex
    pub offset: usize,
}

/// Attribute list plus stride of a packed vertex buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    pub attributes: &'static [VertexAttribute],
    pub stride: usize,
}

impl VertexLayout {
    /// Layout of a geometry without vertex data
    pub const EMPTY: VertexLayout = VertexLayout {
        attributes: &[],
        stride: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Primitive topology of a geometry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// No primitives; used by placeholder geometry
    #[default]
    Undefined,
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

/// A `Pod` vertex type with a static layout
pub trait VertexFormat: bytemuck::Pod {
    const LAYOUT: VertexLayout;
}

/// Position, normal and texture coordinate vertex (stride 32)
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in local space
    pub position: [f32; 3],
    /// Normal vector, or a supplied direction for line strips
    pub normal: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl VertexFormat for Vertex {
    const LAYOUT: VertexLayout = VertexLayout {
        attributes: &[
            VertexAttribute {
                semantic: Semantic::Position,
                format: AttributeFormat::Float32x3,
                offset: 0,
            },
            VertexAttribute {
                semantic: Semantic::Normal,
                format: AttributeFormat::Float32x3,
                offset: 12,
            },
            VertexAttribute {
                semantic: Semantic::TexCoord,
                format: AttributeFormat::Float32x2,
                offset: 24,
            },
        ],
        stride: 32,
    };
}

/// Position and normal vertex (stride 24), produced by outline extrusion
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct PositionNormal {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl PositionNormal {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

impl VertexFormat for PositionNormal {
    const LAYOUT: VertexLayout = VertexLayout {
        attributes: &[
            VertexAttribute {
                semantic: Semantic::Position,
                format: AttributeFormat::Float32x3,
                offset: 0,
            },
            VertexAttribute {
                semantic: Semantic::Normal,
                format: AttributeFormat::Float32x3,
                offset: 12,
            },
        ],
        stride: 24,
    };
}
