//! Descriptor to geometry
//!
//! [`build`] turns one [`GeometryDescriptor`] into a [`GeometryBuffer`]. Simple
//! shapes are forwarded to the context's [`PrimitiveLibrary`]; polygons,
//! lines, joined meshes and text are synthesized here.
//!
//! Builds never validate: degenerate input gives degenerate output.
//!
//! [`PrimitiveLibrary`]: crate::primitives::PrimitiveLibrary

use lathe_core::{Vec2, Vec3};

use crate::bounds::BoundingBox;
use crate::buffer::GeometryBuffer;
use crate::context::RenderContext;
use crate::descriptor::{
    GeometryDescriptor, LineDescriptor, MeshJoinDescriptor, QuadSettings, TextDescriptor,
};
use crate::text::{Outline, TextRequest};
use crate::vertex::{Topology, Vertex};

const FORWARD: [f32; 3] = [0.0, 0.0, -1.0];

/// Build the geometry for `descriptor` using `context`'s generators
pub fn build(descriptor: &GeometryDescriptor, context: &RenderContext) -> GeometryBuffer {
    tracing::trace!("Building {} geometry", descriptor.kind_name());

    let primitives = context.primitives();
    match descriptor {
        GeometryDescriptor::Quad(settings) => primitives.quad(settings),
        GeometryDescriptor::RoundQuad(settings) => primitives.round_quad(settings),
        GeometryDescriptor::Box(settings) => primitives.cuboid(settings),
        GeometryDescriptor::Disc(settings) => primitives.disc(settings),
        GeometryDescriptor::Sphere(settings) => primitives.sphere(settings),
        GeometryDescriptor::Cylinder(settings) => primitives.cylinder(settings),
        GeometryDescriptor::Tube(settings) => primitives.tube(settings),
        GeometryDescriptor::Polygon(polygon) => polygon_2d(&polygon.positions),
        GeometryDescriptor::Line(line) => line_strip_3d(line),
        GeometryDescriptor::MeshJoin(mesh) => mesh_join(mesh),
        GeometryDescriptor::Sprites => GeometryBuffer::null(),
        GeometryDescriptor::Text(text) => text_3d(text, context),
        GeometryDescriptor::Unknown => primitives.quad(&QuadSettings {
            size: Vec2::splat(context.config().fallback_quad_size),
        }),
    }
}

/// Cyclic lookup; an empty list reads as the default value
fn cycled<T: Copy + Default>(items: &[T], index: usize) -> T {
    if items.is_empty() {
        T::default()
    } else {
        items[index % items.len()]
    }
}

/// Fan-triangulated polygon with a centroid hub
///
/// Vertex 0 is the centroid, vertices 1..=N the boundary points. UVs map the
/// polygon's bounding box onto [0, 1]; an axis with zero extent maps to 0.
pub fn polygon_2d(points: &[Vec2]) -> GeometryBuffer {
    let count = points.len();
    if count == 0 {
        return GeometryBuffer::indexed::<Vertex>(&[], Vec::new(), Topology::TriangleList);
    }

    let bbox = BoundingBox::from_points(points.iter().map(|p| Vec3::new(p.x, p.y, 0.0)));
    let (min, extent) = (bbox.min, bbox.size());
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |sum, p| Vec2::new(sum.x + p.x, sum.y + p.y));
    let centroid = Vec2::new(sum.x / count as f32, sum.y / count as f32);

    let normalize = |value: f32, lo: f32, range: f32| {
        if range == 0.0 {
            0.0
        } else {
            (value - lo) / range
        }
    };
    let vertex = |p: Vec2| {
        Vertex::new(
            [p.x, p.y, 0.0],
            FORWARD,
            [normalize(p.x, min.x, extent.x), normalize(p.y, min.y, extent.y)],
        )
    };

    let vertices: Vec<Vertex> = std::iter::once(centroid)
        .chain(points.iter().copied())
        .map(vertex)
        .collect();

    let n = count as u32;
    let mut indices = Vec::with_capacity(count * 3);
    for j in 0..n.saturating_sub(1) {
        indices.extend_from_slice(&[0, j + 1, j + 2]);
    }
    indices.extend_from_slice(&[0, n, 1]);

    GeometryBuffer::indexed(&vertices, indices, Topology::TriangleList)
}

/// Line strip carrying the supplied directions as normals
///
/// `uv.x` runs along the strip. A closed strip repeats its first vertex at
/// the end with `uv.x` exactly 1.
pub fn line_strip_3d(line: &LineDescriptor) -> GeometryBuffer {
    let point_count = line.positions.len().max(line.directions.len());
    let vertex_count = if line.is_closed && point_count > 0 {
        point_count + 1
    } else {
        point_count
    };
    let increment = if line.is_closed {
        1.0 / vertex_count as f32
    } else {
        1.0 / (vertex_count as f32 + 1.0)
    };

    let mut vertices = Vec::with_capacity(vertex_count);
    let mut u = 0.0f32;
    for i in 0..point_count {
        let position = cycled(&line.positions, i);
        let direction = cycled(&line.directions, i);
        vertices.push(Vertex::new(position.to_array(), direction.to_array(), [u, 0.0]));
        u += increment;
    }

    if vertex_count > point_count {
        let mut closing = vertices[0];
        closing.uv = [1.0, 0.0];
        vertices.push(closing);
    }

    GeometryBuffer::non_indexed(&vertices, Topology::LineStrip)
}

/// Geometry assembled from caller-supplied lists
///
/// Triangle lists (and an undefined topology) use the explicit index list;
/// every other topology draws the vertices in order.
pub fn mesh_join(mesh: &MeshJoinDescriptor) -> GeometryBuffer {
    let vertices: Vec<Vertex> = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            Vertex::new(
                position.to_array(),
                cycled(&mesh.directions, i).to_array(),
                cycled(&mesh.texcoords, i).to_array(),
            )
        })
        .collect();

    match mesh.topology {
        Topology::TriangleList | Topology::Undefined => {
            GeometryBuffer::indexed(&vertices, mesh.indices.clone(), Topology::TriangleList)
        }
        topology => GeometryBuffer::non_indexed(&vertices, topology),
    }
}

/// Shaped, extruded text with a bounding box
pub fn text_3d(text: &TextDescriptor, context: &RenderContext) -> GeometryBuffer {
    let pipeline = context.text();
    let outline = match pipeline.shaper.shape(&TextRequest::from(text)) {
        Ok(outline) => outline,
        Err(err) => {
            tracing::warn!("Text shaping failed for {:?}: {}", text.text, err);
            Outline::new()
        }
    };

    let vertices = pipeline.extruder.extrude(&outline, text.extrude);
    let bbox = BoundingBox::from_points(vertices.iter().map(|v| Vec3::from(v.position)));

    GeometryBuffer::non_indexed(&vertices, Topology::TriangleList).with_bounding_box(bbox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextBuilder, ContextRegistry};
    use crate::descriptor::{BoxSettings, TextAlignment};
    use crate::error::TextError;
    use crate::text::{LyonExtruder, OutlineShaper, TextPipeline};
    use crate::vertex::PositionNormal;
    use lyon::math::point;
    use lyon::path::Path;

    fn with_context<R>(f: impl FnOnce(&RenderContext) -> R) -> R {
        let mut registry = ContextRegistry::new();
        let id = registry.create(ContextBuilder::new());
        f(registry.get(id).unwrap())
    }

    /// Shaper returning a unit square per request, or failing on empty text
    struct SquareShaper;

    impl OutlineShaper for SquareShaper {
        fn shape(&self, request: &TextRequest<'_>) -> Result<Outline, TextError> {
            if request.text.is_empty() {
                return Err(TextError::Shaping(request.font_name.to_string()));
            }
            let offset = match request.alignment {
                TextAlignment::Center => -0.5,
                _ => 0.0,
            };
            let mut builder = Path::builder();
            builder.begin(point(offset, 0.0));
            builder.line_to(point(offset + 1.0, 0.0));
            builder.line_to(point(offset + 1.0, 1.0));
            builder.line_to(point(offset, 1.0));
            builder.close();
            Ok(builder.build())
        }
    }

    fn edge_count(indices: &[u32], a: u32, b: u32) -> usize {
        indices
            .chunks_exact(3)
            .filter(|tri| {
                let has = |v| tri.contains(&v);
                has(a) && has(b)
            })
            .count()
    }

    #[test]
    fn test_polygon_square() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let geom = polygon_2d(&points);

        assert_eq!(geom.vertex_count(), 5);
        assert_eq!(geom.triangle_count(), 4);
        assert!(!geom.has_bounding_box());

        let vertices = geom.read_vertices::<Vertex>();
        assert_eq!(vertices[0].position, [1.0, 0.5, 0.0]);
        assert_eq!(vertices[0].uv, [0.5, 0.5]);
        assert_eq!(vertices[3].uv, [1.0, 1.0]);
        assert!(vertices.iter().all(|v| v.normal == FORWARD));

        let indices = geom.indices().unwrap();
        for j in 1..=4u32 {
            let next = j % 4 + 1;
            assert_eq!(edge_count(indices, j, next), 1, "edge {j}-{next}");
        }
    }

    #[test]
    fn test_polygon_degenerate() {
        let geom = polygon_2d(&[]);
        assert_eq!(geom.vertex_count(), 0);
        assert_eq!(geom.index_count(), 0);

        // Collinear points have no vertical extent, v maps to 0
        let geom = polygon_2d(&[Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0)]);
        assert_eq!(geom.triangle_count(), 3);
        assert!(geom.read_vertices::<Vertex>().iter().all(|v| v.uv[1] == 0.0));
    }

    #[test]
    fn test_closed_line() {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        let directions = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        let geom = line_strip_3d(&LineDescriptor {
            positions,
            directions,
            is_closed: true,
        });

        assert_eq!(geom.topology(), Topology::LineStrip);
        assert!(!geom.is_indexed());

        let vertices = geom.read_vertices::<Vertex>();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].uv[0], 0.0);
        assert_eq!(vertices[3].uv[0], 1.0);
        assert_eq!(vertices[3].position, vertices[0].position);
        assert_eq!(vertices[3].normal, vertices[0].normal);
        // Directions cycle
        assert_eq!(vertices[2].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_open_line() {
        let positions: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let geom = line_strip_3d(&LineDescriptor {
            positions,
            directions: Vec::new(),
            is_closed: false,
        });

        let vertices = geom.read_vertices::<Vertex>();
        assert_eq!(vertices.len(), 5);
        assert!(vertices.windows(2).all(|w| w[0].uv[0] < w[1].uv[0]));
        assert!(vertices.iter().all(|v| v.uv[0] < 1.0));
        assert!(vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn test_mesh_join_topologies() {
        let mesh = MeshJoinDescriptor {
            positions: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
            directions: vec![Vec3::new(0.0, 0.0, -1.0)],
            texcoords: Vec::new(),
            indices: vec![0, 1, 2],
            topology: Topology::Undefined,
        };
        let geom = mesh_join(&mesh);
        assert_eq!(geom.topology(), Topology::TriangleList);
        assert_eq!(geom.indices(), Some(&[0u32, 1, 2][..]));
        let vertices = geom.read_vertices::<Vertex>();
        assert!(vertices.iter().all(|v| v.normal == FORWARD && v.uv == [0.0, 0.0]));

        let points = mesh_join(&MeshJoinDescriptor {
            topology: Topology::PointList,
            ..mesh
        });
        assert_eq!(points.topology(), Topology::PointList);
        assert!(!points.is_indexed());
        assert_eq!(points.vertex_count(), 3);
    }

    #[test]
    fn test_sprites_and_unknown() {
        with_context(|ctx| {
            let sprites = build(&GeometryDescriptor::Sprites, ctx);
            assert_eq!(sprites, GeometryBuffer::null());

            let unknown = build(&GeometryDescriptor::Unknown, ctx);
            let quad = build(&GeometryDescriptor::default(), ctx);
            assert_eq!(unknown, quad);

            let cube = build(&GeometryDescriptor::Box(BoxSettings::default()), ctx);
            assert_eq!(cube.vertex_count(), 24);
        });
    }

    #[test]
    fn test_text_has_bounding_box() {
        let mut registry = ContextRegistry::new();
        let id = registry.create(
            ContextBuilder::new().with_text_pipeline(TextPipeline::new(SquareShaper, LyonExtruder::default())),
        );
        let ctx = registry.get(id).unwrap();

        let text = TextDescriptor {
            text: "A".into(),
            extrude: 0.25,
            alignment: TextAlignment::Center,
            ..Default::default()
        };
        let geom = build(&GeometryDescriptor::Text(text), ctx);

        assert!(!geom.is_indexed());
        assert_eq!(geom.topology(), Topology::TriangleList);
        assert_eq!(geom.vertex_stride(), 24);
        let bbox = geom.bounding_box().unwrap();
        assert_eq!(bbox.min, Vec3::new(-0.5, 0.0, 0.0));
        assert_eq!(bbox.max, Vec3::new(0.5, 1.0, 0.25));
        assert!(!geom.read_vertices::<PositionNormal>().is_empty());
    }

    #[test]
    fn test_text_shaping_failure_is_empty() {
        let mut registry = ContextRegistry::new();
        let id = registry.create(
            ContextBuilder::new().with_text_pipeline(TextPipeline::new(SquareShaper, LyonExtruder::default())),
        );
        let ctx = registry.get(id).unwrap();

        let geom = build(&GeometryDescriptor::Text(TextDescriptor::default()), ctx);
        assert_eq!(geom.vertex_count(), 0);
        assert!(geom.has_bounding_box());
    }
}
