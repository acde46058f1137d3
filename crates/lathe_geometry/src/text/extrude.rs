//! Outline fill and extrusion using lyon

use lathe_core::Vec3;
use lyon::math::Point;
use lyon::path::iterator::PathIterator;
use lyon::path::PathEvent;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use super::{Outline, OutlineExtruder};
use crate::vertex::PositionNormal;

/// Fills the outline with lyon and sweeps its edges along +Z
///
/// The front face lies at z = 0 facing -Z, the back face at z = depth facing
/// +Z, and every flattened edge contributes one side quad.
#[derive(Clone, Copy, Debug)]
pub struct LyonExtruder {
    pub tolerance: f32,
}

impl Default for LyonExtruder {
    fn default() -> Self {
        Self { tolerance: 0.05 }
    }
}

impl LyonExtruder {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    fn fill(&self, outline: &Outline) -> VertexBuffers<[f32; 2], u32> {
        let mut geometry: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
        let mut tessellator = FillTessellator::new();
        let options = FillOptions::default().with_tolerance(self.tolerance);

        let result = tessellator.tessellate_path(
            outline,
            &options,
            &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| vertex.position().to_array()),
        );

        if let Err(err) = result {
            tracing::warn!("Outline fill tessellation failed: {:?}", err);
        }
        geometry
    }

    fn push_wall(vertices: &mut Vec<PositionNormal>, from: Point, to: Point, depth: f32) {
        let edge = Vec3::new(to.x - from.x, to.y - from.y, 0.0);
        if edge.length() <= f32::EPSILON {
            return;
        }
        let normal = edge.cross(Vec3::new(0.0, 0.0, 1.0)).normalize().to_array();

        let p0 = [from.x, from.y, 0.0];
        let q0 = [to.x, to.y, 0.0];
        let p1 = [from.x, from.y, depth];
        let q1 = [to.x, to.y, depth];
        for position in [p0, q0, q1, p0, q1, p1] {
            vertices.push(PositionNormal::new(position, normal));
        }
    }
}

impl OutlineExtruder for LyonExtruder {
    fn extrude(&self, outline: &Outline, depth: f32) -> Vec<PositionNormal> {
        let fill = self.fill(outline);
        let mut vertices = Vec::with_capacity(fill.indices.len() * 2);

        let front = [0.0, 0.0, -1.0];
        let back = [0.0, 0.0, 1.0];
        for tri in fill.indices.chunks_exact(3) {
            for &i in tri {
                let [x, y] = fill.vertices[i as usize];
                vertices.push(PositionNormal::new([x, y, 0.0], front));
            }
        }
        for tri in fill.indices.chunks_exact(3) {
            for &i in tri.iter().rev() {
                let [x, y] = fill.vertices[i as usize];
                vertices.push(PositionNormal::new([x, y, depth], back));
            }
        }

        for event in outline.iter().flattened(self.tolerance) {
            match event {
                PathEvent::Line { from, to } => Self::push_wall(&mut vertices, from, to, depth),
                PathEvent::End { last, first, .. } if last != first => {
                    Self::push_wall(&mut vertices, last, first, depth)
                }
                _ => {}
            }
        }

        vertices
    }
}
