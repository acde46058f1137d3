//! Parametric primitive generators
//!
//! [`PrimitiveLibrary`] is the seam the factory uses for simple shapes.
//! [`BuiltinPrimitives`] is the default implementation: every shape is an
//! indexed triangle list of [`Vertex`] values centred on the origin.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::buffer::GeometryBuffer;
use crate::descriptor::{
    BoxSettings, CylinderSettings, DiscSettings, QuadSettings, RoundQuadSettings, SphereSettings,
    TubeSettings,
};
use crate::vertex::{Topology, Vertex};

/// Source of the simple parametric shapes
pub trait PrimitiveLibrary {
    fn quad(&self, settings: &QuadSettings) -> GeometryBuffer;
    fn round_quad(&self, settings: &RoundQuadSettings) -> GeometryBuffer;
    fn cuboid(&self, settings: &BoxSettings) -> GeometryBuffer;
    fn disc(&self, settings: &DiscSettings) -> GeometryBuffer;
    fn sphere(&self, settings: &SphereSettings) -> GeometryBuffer;
    fn cylinder(&self, settings: &CylinderSettings) -> GeometryBuffer;
    fn tube(&self, settings: &TubeSettings) -> GeometryBuffer;
}

/// Vertex/index accumulator shared by the generators
#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    fn next_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.next_index();
        self.vertices.push(Vertex::new(position, normal, uv));
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    fn into_buffer(self) -> GeometryBuffer {
        GeometryBuffer::indexed(&self.vertices, self.indices, Topology::TriangleList)
    }
}

/// Angles swept by a ring segment, `resolution + 1` samples
fn segment_angles(phase: f32, cycles: f32, resolution: u32) -> impl Iterator<Item = f32> {
    let resolution = resolution.max(1);
    (0..=resolution).map(move |i| (phase + cycles * i as f32 / resolution as f32) * TAU)
}

/// Default generators
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinPrimitives;

impl BuiltinPrimitives {
    /// One face of a box, a `grid_x` by `grid_y` grid on the plane spanned by axes `u` and `v`
    #[allow(clippy::too_many_arguments)]
    fn box_face(
        mesh: &mut MeshBuilder,
        u: usize,
        v: usize,
        w: usize,
        udir: f32,
        vdir: f32,
        width: f32,
        height: f32,
        depth: f32,
    ) {
        let width_half = width / 2.0;
        let height_half = height / 2.0;
        let offset = mesh.next_index();

        for iy in 0..2 {
            let y = iy as f32 * height - height_half;
            for ix in 0..2 {
                let x = ix as f32 * width - width_half;

                let mut position = [0.0f32; 3];
                position[u] = x * udir;
                position[v] = y * vdir;
                position[w] = depth;

                let mut normal = [0.0f32; 3];
                normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

                mesh.push(position, normal, [ix as f32, 1.0 - iy as f32]);
            }
        }

        let (a, b, c, d) = (offset, offset + 2, offset + 3, offset + 1);
        mesh.triangle(a, b, d);
        mesh.triangle(b, c, d);
    }

    /// Flat ring strip at height `z`
    fn ring(
        mesh: &mut MeshBuilder,
        angles: &[f32],
        outer: f32,
        inner: f32,
        z: f32,
        normal: [f32; 3],
    ) {
        let offset = mesh.next_index();
        for &theta in angles {
            let (s, c) = theta.sin_cos();
            mesh.push([outer * c, outer * s, z], normal, [0.5 + outer * c, 0.5 - outer * s]);
            mesh.push([inner * c, inner * s, z], normal, [0.5 + inner * c, 0.5 - inner * s]);
        }
        for i in 0..angles.len().saturating_sub(1) as u32 {
            let o0 = offset + i * 2;
            let i0 = o0 + 1;
            let o1 = o0 + 2;
            let i1 = o0 + 3;
            if normal[2] > 0.0 {
                mesh.triangle(o0, o1, i0);
                mesh.triangle(i0, o1, i1);
            } else {
                mesh.triangle(o0, i0, o1);
                mesh.triangle(i0, i1, o1);
            }
        }
    }

    /// Cylindrical wall along Z; `outward` picks the normal direction
    fn wall(mesh: &mut MeshBuilder, angles: &[f32], radius: f32, half_length: f32, outward: bool) {
        let offset = mesh.next_index();
        let sign = if outward { 1.0 } else { -1.0 };
        let count = angles.len().max(2) - 1;

        for (i, &theta) in angles.iter().enumerate() {
            let (s, c) = theta.sin_cos();
            let normal = [c * sign, s * sign, 0.0];
            let u = i as f32 / count as f32;
            mesh.push([radius * c, radius * s, -half_length], normal, [u, 0.0]);
            mesh.push([radius * c, radius * s, half_length], normal, [u, 1.0]);
        }
        for i in 0..angles.len().saturating_sub(1) as u32 {
            let a = offset + i * 2;
            let b = a + 1;
            let c = a + 2;
            let d = a + 3;
            if outward {
                mesh.triangle(a, c, b);
                mesh.triangle(b, c, d);
            } else {
                mesh.triangle(a, b, c);
                mesh.triangle(b, d, c);
            }
        }
    }
}

impl PrimitiveLibrary for BuiltinPrimitives {
    fn quad(&self, settings: &QuadSettings) -> GeometryBuffer {
        let hw = settings.size.x / 2.0;
        let hh = settings.size.y / 2.0;
        let normal = [0.0, 0.0, -1.0];

        let mut mesh = MeshBuilder::default();
        mesh.push([-hw, -hh, 0.0], normal, [0.0, 1.0]);
        mesh.push([hw, -hh, 0.0], normal, [1.0, 1.0]);
        mesh.push([hw, hh, 0.0], normal, [1.0, 0.0]);
        mesh.push([-hw, hh, 0.0], normal, [0.0, 0.0]);
        mesh.triangle(0, 1, 2);
        mesh.triangle(0, 2, 3);
        mesh.into_buffer()
    }

    fn round_quad(&self, settings: &RoundQuadSettings) -> GeometryBuffer {
        let ix = settings.inner_radius.x.abs();
        let iy = settings.inner_radius.y.abs();
        let r = settings.outer_radius.max(0.0);
        let resolution = settings.corner_resolution.max(1);
        let ex = (ix + r).max(f32::EPSILON);
        let ey = (iy + r).max(f32::EPSILON);
        let normal = [0.0, 0.0, -1.0];
        let uv = |x: f32, y: f32| [0.5 + x / (2.0 * ex), 0.5 - y / (2.0 * ey)];

        let mut mesh = MeshBuilder::default();
        let center = mesh.push([0.0, 0.0, 0.0], normal, [0.5, 0.5]);

        // Corners counter-clockwise starting top right
        let corners = [(ix, iy), (-ix, iy), (-ix, -iy), (ix, -iy)];
        for (k, (cx, cy)) in corners.iter().enumerate() {
            let start = k as f32 * FRAC_PI_2;
            for i in 0..=resolution {
                let theta = start + FRAC_PI_2 * i as f32 / resolution as f32;
                let x = cx + r * theta.cos();
                let y = cy + r * theta.sin();
                mesh.push([x, y, 0.0], normal, uv(x, y));
            }
        }

        let rim = mesh.next_index() - 1;
        for i in 1..rim {
            mesh.triangle(center, i, i + 1);
        }
        mesh.triangle(center, rim, 1);
        mesh.into_buffer()
    }

    fn cuboid(&self, settings: &BoxSettings) -> GeometryBuffer {
        let (width, height, depth) = (settings.size.x, settings.size.y, settings.size.z);
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);

        let mut mesh = MeshBuilder::default();
        // +Z face
        Self::box_face(&mut mesh, 0, 1, 2, 1.0, 1.0, width, height, hd);
        // -Z face
        Self::box_face(&mut mesh, 0, 1, 2, -1.0, 1.0, width, height, -hd);
        // +Y face
        Self::box_face(&mut mesh, 0, 2, 1, 1.0, 1.0, width, depth, hh);
        // -Y face
        Self::box_face(&mut mesh, 0, 2, 1, 1.0, -1.0, width, depth, -hh);
        // +X face
        Self::box_face(&mut mesh, 2, 1, 0, 1.0, 1.0, depth, height, hw);
        // -X face
        Self::box_face(&mut mesh, 2, 1, 0, -1.0, 1.0, depth, height, -hw);
        mesh.into_buffer()
    }

    fn disc(&self, settings: &DiscSettings) -> GeometryBuffer {
        let angles: Vec<f32> =
            segment_angles(settings.phase, settings.cycles, settings.resolution).collect();
        let inner = settings.inner_radius.clamp(0.0, 0.5);

        let mut mesh = MeshBuilder::default();
        Self::ring(&mut mesh, &angles, 0.5, inner, 0.0, [0.0, 0.0, -1.0]);
        mesh.into_buffer()
    }

    fn sphere(&self, settings: &SphereSettings) -> GeometryBuffer {
        let radius = settings.radius;
        let width_segments = settings.resolution_x.max(3);
        let height_segments = settings.resolution_y.max(2);

        let mut mesh = MeshBuilder::default();
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let phi = v * PI;

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let theta = u * TAU;

                let nx = -phi.sin() * theta.cos();
                let ny = phi.cos();
                let nz = phi.sin() * theta.sin();

                mesh.push([radius * nx, radius * ny, radius * nz], [nx, ny, nz], [u, v]);
            }
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * (width_segments + 1) + ix;
                let b = a + width_segments + 1;
                let c = b + 1;
                let d = a + 1;

                if iy != 0 {
                    mesh.triangle(a, b, d);
                }
                if iy != height_segments - 1 {
                    mesh.triangle(b, c, d);
                }
            }
        }
        mesh.into_buffer()
    }

    fn cylinder(&self, settings: &CylinderSettings) -> GeometryBuffer {
        let CylinderSettings {
            radius_top,
            radius_bottom,
            length,
            resolution_x,
            resolution_y,
            caps,
        } = *settings;
        let half_height = length / 2.0;
        let radial_segments = resolution_x.max(3);
        let height_segments = resolution_y.max(1);

        let mut mesh = MeshBuilder::default();

        let slope = if length != 0.0 {
            (radius_bottom - radius_top) / length
        } else {
            0.0
        };
        let ny = slope / (1.0 + slope * slope).sqrt();
        let nxz = 1.0 / (1.0 + slope * slope).sqrt();

        for y in 0..=height_segments {
            let v = y as f32 / height_segments as f32;
            let radius = v * (radius_bottom - radius_top) + radius_top;

            for x in 0..=radial_segments {
                let u = x as f32 / radial_segments as f32;
                let (sin_theta, cos_theta) = (u * TAU).sin_cos();

                mesh.push(
                    [radius * sin_theta, half_height - v * length, radius * cos_theta],
                    [nxz * sin_theta, ny, nxz * cos_theta],
                    [u, v],
                );
            }
        }

        for y in 0..height_segments {
            for x in 0..radial_segments {
                let a = y * (radial_segments + 1) + x;
                let b = a + radial_segments + 1;
                let c = b + 1;
                let d = a + 1;
                mesh.triangle(a, b, d);
                mesh.triangle(b, c, d);
            }
        }

        if caps {
            for (radius, y, sign) in [(radius_top, half_height, 1.0f32), (radius_bottom, -half_height, -1.0)] {
                if radius <= 0.0 {
                    continue;
                }
                let center = mesh.push([0.0, y, 0.0], [0.0, sign, 0.0], [0.5, 0.5]);
                for x in 0..=radial_segments {
                    let (s, c) = (x as f32 / radial_segments as f32 * TAU).sin_cos();
                    mesh.push(
                        [radius * s, y, radius * c],
                        [0.0, sign, 0.0],
                        [0.5 + 0.5 * s, 0.5 + 0.5 * c * sign],
                    );
                }
                for x in 0..radial_segments {
                    if sign > 0.0 {
                        mesh.triangle(center, center + x + 1, center + x + 2);
                    } else {
                        mesh.triangle(center, center + x + 2, center + x + 1);
                    }
                }
            }
        }
        mesh.into_buffer()
    }

    fn tube(&self, settings: &TubeSettings) -> GeometryBuffer {
        let angles: Vec<f32> =
            segment_angles(settings.phase, settings.cycles, settings.resolution).collect();
        let outer = 0.5;
        let inner = settings.inner_radius.clamp(0.0, outer);
        let half_length = settings.length / 2.0;

        let mut mesh = MeshBuilder::default();
        Self::wall(&mut mesh, &angles, outer, half_length, true);
        if inner > 0.0 {
            Self::wall(&mut mesh, &angles, inner, half_length, false);
        }
        Self::ring(&mut mesh, &angles, outer, inner, -half_length, [0.0, 0.0, -1.0]);
        Self::ring(&mut mesh, &angles, outer, inner, half_length, [0.0, 0.0, 1.0]);
        mesh.into_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_core::{Vec2, Vec3};

    fn assert_indices_in_range(geom: &GeometryBuffer) {
        let count = geom.vertex_count() as u32;
        assert!(geom.indices().unwrap().iter().all(|&i| i < count));
    }

    #[test]
    fn test_quad() {
        let geom = BuiltinPrimitives.quad(&QuadSettings { size: Vec2::new(2.0, 1.0) });
        assert_eq!(geom.vertex_count(), 4);
        assert_eq!(geom.triangle_count(), 2);
        let xs: Vec<f32> = geom.read_vertices::<Vertex>().iter().map(|v| v.position[0]).collect();
        assert_eq!(xs, vec![-1.0, 1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_box_geometry() {
        let geom = BuiltinPrimitives.cuboid(&BoxSettings { size: Vec3::ONE });
        assert_eq!(geom.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(geom.triangle_count(), 12); // 6 faces * 2 triangles
        assert_indices_in_range(&geom);
        assert!(!geom.has_bounding_box());
    }

    #[test]
    fn test_sphere_geometry() {
        let geom = BuiltinPrimitives.sphere(&SphereSettings {
            radius: 1.0,
            resolution_x: 8,
            resolution_y: 6,
        });
        assert_eq!(geom.vertex_count(), 9 * 7);
        assert!(geom.triangle_count() > 0);
        assert_indices_in_range(&geom);
    }

    #[test]
    fn test_cylinder_caps() {
        let open = BuiltinPrimitives.cylinder(&CylinderSettings {
            caps: false,
            ..Default::default()
        });
        let closed = BuiltinPrimitives.cylinder(&CylinderSettings::default());
        assert!(closed.vertex_count() > open.vertex_count());
        assert_eq!(closed.triangle_count() - open.triangle_count(), 2 * 32);
        assert_indices_in_range(&closed);
    }

    #[test]
    fn test_round_quad_fan() {
        let settings = RoundQuadSettings {
            corner_resolution: 4,
            ..Default::default()
        };
        let geom = BuiltinPrimitives.round_quad(&settings);
        // center + 4 corners * (resolution + 1)
        assert_eq!(geom.vertex_count(), 1 + 4 * 5);
        assert_eq!(geom.triangle_count(), 4 * 5);
        assert_indices_in_range(&geom);
    }

    #[test]
    fn test_disc_and_tube() {
        let disc = BuiltinPrimitives.disc(&DiscSettings::default());
        assert_eq!(disc.vertex_count(), 2 * 33);
        assert_eq!(disc.triangle_count(), 2 * 32);
        assert_indices_in_range(&disc);

        let tube = BuiltinPrimitives.tube(&TubeSettings::default());
        // two walls and two caps, 33 pairs each
        assert_eq!(tube.vertex_count(), 4 * 2 * 33);
        assert_eq!(tube.triangle_count(), 4 * 2 * 32);
        assert_indices_in_range(&tube);
    }
}
