//! Geometry descriptors
//!
//! A [`GeometryDescriptor`] is an immutable description of one shape: its
//! kind plus the parameters needed to build it. Descriptors never hold built
//! data; turning one into vertices is the job of the primitive factory.

use lathe_core::{Vec2, Vec3};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::vertex::Topology;

/// One shape request
///
/// Encoded as `{"kind": ..., "params": ...}`. Decoding never fails on an
/// unrecognised kind: it becomes [`GeometryDescriptor::Unknown`] whatever
/// its params hold.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "params")]
pub enum GeometryDescriptor {
    Quad(QuadSettings),
    RoundQuad(RoundQuadSettings),
    Box(BoxSettings),
    Disc(DiscSettings),
    Sphere(SphereSettings),
    Cylinder(CylinderSettings),
    Tube(TubeSettings),
    Polygon(PolygonDescriptor),
    Line(LineDescriptor),
    MeshJoin(MeshJoinDescriptor),
    /// Sprite batches are expanded by the renderer
    Sprites,
    Text(TextDescriptor),
    /// A kind this build does not know; built as a unit quad
    Unknown,
}

#[derive(Deserialize)]
struct TaggedDescriptor {
    kind: String,
    #[serde(default)]
    params: Value,
}

fn params<T: DeserializeOwned, E: serde::de::Error>(params: Value) -> Result<T, E> {
    T::deserialize(params).map_err(E::custom)
}

impl<'de> Deserialize<'de> for GeometryDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let TaggedDescriptor { kind, params: p } = TaggedDescriptor::deserialize(deserializer)?;
        let desc = match kind.as_str() {
            "Quad" => GeometryDescriptor::Quad(params(p)?),
            "RoundQuad" => GeometryDescriptor::RoundQuad(params(p)?),
            "Box" => GeometryDescriptor::Box(params(p)?),
            "Disc" => GeometryDescriptor::Disc(params(p)?),
            "Sphere" => GeometryDescriptor::Sphere(params(p)?),
            "Cylinder" => GeometryDescriptor::Cylinder(params(p)?),
            "Tube" => GeometryDescriptor::Tube(params(p)?),
            "Polygon" => GeometryDescriptor::Polygon(params(p)?),
            "Line" => GeometryDescriptor::Line(params(p)?),
            "MeshJoin" => GeometryDescriptor::MeshJoin(params(p)?),
            "Text" => GeometryDescriptor::Text(params(p)?),
            "Sprites" => GeometryDescriptor::Sprites,
            "Unknown" => GeometryDescriptor::Unknown,
            other => {
                tracing::debug!("Unknown geometry kind {:?}, decoding as Unknown", other);
                GeometryDescriptor::Unknown
            }
        };
        Ok(desc)
    }
}

impl Default for GeometryDescriptor {
    fn default() -> Self {
        GeometryDescriptor::Quad(QuadSettings::default())
    }
}

impl GeometryDescriptor {
    /// Filled polygon from boundary points
    pub fn polygon(positions: Vec<Vec2>) -> Self {
        GeometryDescriptor::Polygon(PolygonDescriptor { positions })
    }

    /// Line strip using `directions` as per-vertex normals
    pub fn line(positions: Vec<Vec3>, directions: Vec<Vec3>, is_closed: bool) -> Self {
        GeometryDescriptor::Line(LineDescriptor {
            positions,
            directions,
            is_closed,
        })
    }

    /// Short name used in logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            GeometryDescriptor::Quad(_) => "quad",
            GeometryDescriptor::RoundQuad(_) => "round_quad",
            GeometryDescriptor::Box(_) => "box",
            GeometryDescriptor::Disc(_) => "disc",
            GeometryDescriptor::Sphere(_) => "sphere",
            GeometryDescriptor::Cylinder(_) => "cylinder",
            GeometryDescriptor::Tube(_) => "tube",
            GeometryDescriptor::Polygon(_) => "polygon",
            GeometryDescriptor::Line(_) => "line",
            GeometryDescriptor::MeshJoin(_) => "mesh_join",
            GeometryDescriptor::Sprites => "sprites",
            GeometryDescriptor::Text(_) => "text",
            GeometryDescriptor::Unknown => "unknown",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Library primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Flat quad in the XY plane
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadSettings {
    pub size: Vec2,
}

impl Default for QuadSettings {
    fn default() -> Self {
        Self { size: Vec2::ONE }
    }
}

/// Rectangle with rounded corners
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundQuadSettings {
    /// Half extents of the inner (unrounded) rectangle
    pub inner_radius: Vec2,
    /// Corner radius added around the inner rectangle
    pub outer_radius: f32,
    /// Segments per corner arc
    pub corner_resolution: u32,
}

impl Default for RoundQuadSettings {
    fn default() -> Self {
        Self {
            inner_radius: Vec2::splat(0.35),
            outer_radius: 0.15,
            corner_resolution: 8,
        }
    }
}

/// Axis-aligned box
///
/// Encode-only: decoding always yields the unit box placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoxSettings {
    pub size: Vec3,
}

impl Default for BoxSettings {
    fn default() -> Self {
        Self { size: Vec3::ONE }
    }
}

impl<'de> Deserialize<'de> for BoxSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self::default())
    }
}

/// Ring segment in the XY plane (a full disc with the defaults)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscSettings {
    /// Start angle in turns
    pub phase: f32,
    /// Swept angle in turns
    pub cycles: f32,
    /// Inner radius; the outer radius is 0.5
    pub inner_radius: f32,
    pub resolution: u32,
}

impl Default for DiscSettings {
    fn default() -> Self {
        Self {
            phase: 0.0,
            cycles: 1.0,
            inner_radius: 0.0,
            resolution: 32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereSettings {
    pub radius: f32,
    pub resolution_x: u32,
    pub resolution_y: u32,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self {
            radius: 0.5,
            resolution_x: 32,
            resolution_y: 16,
        }
    }
}

/// Cylinder or cone along the Y axis
///
/// Encode-only like [`BoxSettings`]: decoding yields the default cylinder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CylinderSettings {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub length: f32,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub caps: bool,
}

impl Default for CylinderSettings {
    fn default() -> Self {
        Self {
            radius_top: 0.5,
            radius_bottom: 0.5,
            length: 1.0,
            resolution_x: 32,
            resolution_y: 1,
            caps: true,
        }
    }
}

impl<'de> Deserialize<'de> for CylinderSettings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self::default())
    }
}

/// Ring segment extruded along Z
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TubeSettings {
    pub phase: f32,
    pub cycles: f32,
    pub inner_radius: f32,
    pub length: f32,
    pub resolution: u32,
}

impl Default for TubeSettings {
    fn default() -> Self {
        Self {
            phase: 0.0,
            cycles: 1.0,
            inner_radius: 0.25,
            length: 1.0,
            resolution: 32,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Synthesized shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Polygon boundary in the XY plane, in order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonDescriptor {
    pub positions: Vec<Vec2>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineDescriptor {
    pub positions: Vec<Vec3>,
    /// Per-vertex direction, stored as the vertex normal
    pub directions: Vec<Vec3>,
    pub is_closed: bool,
}

/// Arbitrary mesh assembled from caller-supplied lists
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshJoinDescriptor {
    pub positions: Vec<Vec3>,
    pub directions: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    /// Used only for triangle lists
    pub indices: Vec<u32>,
    pub topology: Topology,
}

/// Horizontal placement of text relative to the origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextAlignment {
    #[default]
    Leading,
    Trailing,
    Center,
    Justified,
}

/// Vertical placement of text relative to the origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParagraphAlignment {
    /// Top of the text at the origin
    #[default]
    Near,
    /// Bottom of the text at the origin
    Far,
    Center,
}

/// Extruded 3D text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextDescriptor {
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    /// Extrusion depth along +Z
    pub extrude: f32,
    pub alignment: TextAlignment,
    pub paragraph_alignment: ParagraphAlignment,
}

impl Default for TextDescriptor {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_name: "Arial".to_string(),
            font_size: 32.0,
            extrude: 0.1,
            alignment: TextAlignment::default(),
            paragraph_alignment: ParagraphAlignment::default(),
        }
    }
}
