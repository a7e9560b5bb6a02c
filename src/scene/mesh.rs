//! CPU-side mesh generation for the demo shapes.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

// ==================== VERTEX FORMAT ====================

/// 32-byte mesh vertex shared by every demo pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Texture coordinate, origin top-left.
    pub uv: [f32; 2],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }

    /// Vertex buffer layout matching `@location(0..3)` in the mesh shader.
    #[must_use]
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }
    }
}

// ==================== MESH DATA ====================

/// Indexed triangle list with counter-clockwise front faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex array.
    pub vertices: Vec<Vertex>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Axis-aligned cube of edge `size` centred at the origin, with flat
    /// per-face normals and a full `[0, 1]` UV square on each face.
    #[must_use]
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        // (normal, u axis, v axis) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let corners = [
            (Vec2::new(-1.0, -1.0), Vec2::new(0.0, 1.0)),
            (Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0)),
            (Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)),
            (Vec2::new(-1.0, 1.0), Vec2::new(0.0, 0.0)),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (corner, uv) in corners {
                let position = (normal + u * corner.x + v * corner.y) * h;
                vertices.push(Vertex::new(position, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }

    /// UV sphere of `radius` centred at the origin.
    ///
    /// `u` runs with longitude from -180 at 0 to 180 at 1 and `v` from the
    /// north pole at 0 to the south pole at 1, so an equirectangular map
    /// lines up with [`lat_lon_to_cartesian`](crate::geo::lat_lon_to_cartesian).
    #[must_use]
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices =
            Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let polar = v * PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let azimuth = u * 2.0 * PI;
                let normal = Vec3::new(
                    -azimuth.cos() * polar.sin(),
                    polar.cos(),
                    azimuth.sin() * polar.sin(),
                );
                vertices.push(Vertex::new(normal * radius, normal, Vec2::new(u, v)));
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // Skip the zero-area triangles at the poles.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        Self { vertices, indices }
    }

    /// Number of indices, as the draw call wants it.
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::lat_lon_to_cartesian;

    fn triangles(mesh: &MeshData) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        mesh.indices.chunks_exact(3).map(|tri| {
            [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position))
        })
    }

    #[test]
    fn cube_has_six_quads() {
        let cube = MeshData::cube(1.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        for v in &cube.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.abs().max_element() - 0.5).abs() < 1e-6);
            assert!(p.dot(Vec3::from_array(v.normal)) > 0.0);
        }
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = MeshData::cube(2.0);
        for [a, b, c] in triangles(&cube) {
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let sphere = MeshData::sphere(2.0, 16, 8);
        assert_eq!(sphere.vertices.len(), 17 * 9);
        for v in &sphere.vertices {
            assert!((Vec3::from_array(v.position).length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_faces_wind_outward() {
        let sphere = MeshData::sphere(1.0, 24, 12);
        for [a, b, c] in triangles(&sphere) {
            let n = (b - a).cross(c - a);
            if n.length_squared() < 1e-12 {
                continue;
            }
            assert!(n.dot(a + b + c) > 0.0);
        }
    }

    #[test]
    fn sphere_uv_matches_lat_lon_projection() {
        let sphere = MeshData::sphere(1.0, 36, 18);
        for v in &sphere.vertices {
            let [u, t] = v.uv;
            let lon = u * 360.0 - 180.0;
            let lat = 90.0 - t * 180.0;
            let expected = lat_lon_to_cartesian(lat, lon, 1.0);
            assert!((Vec3::from_array(v.position) - expected).length() < 1e-4);
        }
    }
}
