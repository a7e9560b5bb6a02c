//! Single indexed mesh with one material: the cube or the globe.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::OrbisError;
use crate::gpu::pipeline_helpers::{
    create_pipeline, depth_stencil_state, filtering_sampler, texture_2d,
    uniform_buffer, PipelineSpec,
};
use crate::gpu::shader_composer::{ShaderComposer, MESH_SHADER};
use crate::gpu::texture::{ImageTexture, TextureData};
use crate::scene::mesh::{MeshData, Vertex};

/// Per-mesh uniform.
/// NOTE: Must match the WGSL `MeshUniform` layout exactly (160 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    /// Object to world transform.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model` for normals.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear RGBA base color, multiplied with the texture.
    pub base_color: [f32; 4],
    /// x: texture weight. yzw unused.
    pub params: [f32; 4],
}

impl MeshUniform {
    /// Uniform for `model` with the given surface color.
    #[must_use]
    pub fn new(model: Mat4, base_color: [f32; 4], textured: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            base_color,
            params: [if textured { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for MeshUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, [1.0; 4], false)
    }
}

/// Draws one mesh with the lit mesh shader.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform: MeshUniform,
    uniform_buffer: wgpu::Buffer,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    texture: ImageTexture,
}

impl MeshRenderer {
    /// Build the pipeline and upload `mesh` with `texture`.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Shader`] if the mesh shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        sample_count: u32,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
        shader_composer: &mut ShaderComposer,
        mesh: &MeshData,
        texture: &TextureData,
    ) -> Result<Self, OrbisError> {
        let shader = shader_composer.compose(device, "Mesh Shader", MESH_SHADER)?;

        let material_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Mesh Material Layout"),
                entries: &[
                    uniform_buffer(
                        0,
                        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ),
                    texture_2d(1),
                    filtering_sampler(2),
                ],
            });

        let pipeline = create_pipeline(
            device,
            &PipelineSpec {
                label: "Mesh",
                shader: &shader,
                format,
                blend: None,
                bind_group_layouts: &[camera_layout, lighting_layout, &material_layout],
                buffers: &[Vertex::buffer_layout()],
                cull_mode: Some(wgpu::Face::Back),
                depth_stencil: depth_stencil_state(),
                sample_count,
            },
        );

        let (vertex_buffer, index_buffer) = upload_mesh(device, mesh);
        let uniform = MeshUniform::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let texture = ImageTexture::from_data(device, queue, texture, "Mesh Texture");
        let material_bind_group =
            create_material_bind_group(device, &material_layout, &uniform_buffer, &texture);

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            uniform,
            uniform_buffer,
            material_layout,
            material_bind_group,
            texture,
        })
    }

    /// Replace the geometry.
    pub fn set_mesh(&mut self, device: &wgpu::Device, mesh: &MeshData) {
        let (vertex_buffer, index_buffer) = upload_mesh(device, mesh);
        self.vertex_buffer = vertex_buffer;
        self.index_buffer = index_buffer;
        self.index_count = mesh.index_count();
    }

    /// Replace the texture and rebuild the material bind group.
    pub fn set_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &TextureData,
    ) {
        self.texture = ImageTexture::from_data(device, queue, data, "Mesh Texture");
        self.material_bind_group = create_material_bind_group(
            device,
            &self.material_layout,
            &self.uniform_buffer,
            &self.texture,
        );
    }

    /// Upload the model transform and material for this frame.
    pub fn update(&mut self, queue: &wgpu::Queue, uniform: MeshUniform) {
        if uniform == self.uniform {
            return;
        }
        self.uniform = uniform;
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Record the draw. Camera and light bind groups go in groups 0 and 1.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        lighting_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, lighting_bind_group, &[]);
        render_pass.set_bind_group(2, &self.material_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertex Buffer"),
        contents: bytemuck::cast_slice(&mesh.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Index Buffer"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    (vertex_buffer, index_buffer)
}

fn create_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    texture: &ImageTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Mesh Material Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn uniform_is_160_bytes() {
        assert_eq!(size_of::<MeshUniform>(), 160);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = MeshUniform::new(model, [1.0; 4], true);
        let normal_matrix = Mat4::from_cols_array_2d(&uniform.normal_matrix);
        let n = normal_matrix.transform_vector3(Vec3::X);
        assert!((n - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(uniform.params[0], 1.0);
    }
}
