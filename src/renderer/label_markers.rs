//! Instanced screen-space dots over visible labels (native host).

use wgpu::util::DeviceExt;

use crate::error::OrbisError;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::pipeline_helpers::{
    create_pipeline, overlay_depth_state, uniform_buffer, PipelineSpec,
};
use crate::gpu::shader_composer::{ShaderComposer, LABEL_MARKER_SHADER};
use crate::labels::LabelSet;
use crate::options::LabelOptions;

/// One marker quad (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MarkerInstance {
    /// Center in physical pixels, origin top-left.
    pub center: [f32; 2],
    /// Edge length in pixels.
    pub size: f32,
    _pad: f32,
    /// Linear RGBA fill.
    pub color: [f32; 4],
}

impl MarkerInstance {
    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<MarkerInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 8,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 2,
                },
            ],
        }
    }
}

/// Markers for every shown label. The selected one is drawn last and
/// larger so it sits on top.
#[must_use]
pub fn marker_instances(labels: &LabelSet, options: &LabelOptions) -> Vec<MarkerInstance> {
    let mut instances: Vec<_> = labels
        .labels()
        .iter()
        .filter(|label| label.is_shown() && !label.selected)
        .filter_map(|label| label.screen)
        .map(|p| MarkerInstance {
            center: p.to_array(),
            size: options.marker_size_px,
            _pad: 0.0,
            color: options.color,
        })
        .collect();

    let selected = labels
        .selected()
        .and_then(|i| labels.get(i))
        .filter(|label| label.is_shown())
        .and_then(|label| label.screen);
    if let Some(p) = selected {
        instances.push(MarkerInstance {
            center: p.to_array(),
            size: options.marker_size_px * 1.5,
            _pad: 0.0,
            color: options.selected_color,
        });
    }
    instances
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

/// Draws label markers as an overlay in the scene pass.
pub struct LabelMarkerRenderer {
    pipeline: wgpu::RenderPipeline,
    instances: DynamicBuffer,
    instance_count: u32,
    viewport_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl LabelMarkerRenderer {
    /// Build the marker pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Shader`] if the marker shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, OrbisError> {
        let shader =
            shader_composer.compose(device, "Label Marker Shader", LABEL_MARKER_SHADER)?;

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Label Marker Layout"),
            entries: &[uniform_buffer(0, wgpu::ShaderStages::VERTEX)],
        });
        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Label Viewport Buffer"),
            contents: bytemuck::cast_slice(&[ViewportUniform {
                size: [1.0, 1.0],
                _pad: [0.0; 2],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Label Marker Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let pipeline = create_pipeline(
            device,
            &PipelineSpec {
                label: "Label Marker",
                shader: &shader,
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                bind_group_layouts: &[&layout],
                buffers: &[MarkerInstance::buffer_layout()],
                cull_mode: None,
                depth_stencil: overlay_depth_state(),
                sample_count,
            },
        );

        let instances = DynamicBuffer::new(
            device,
            "Label Marker Instances",
            size_of::<MarkerInstance>() * 64,
            wgpu::BufferUsages::VERTEX,
        );

        Ok(Self {
            pipeline,
            instances,
            instance_count: 0,
            viewport_buffer,
            bind_group,
        })
    }

    /// Upload markers for the current label state.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        labels: &LabelSet,
        options: &LabelOptions,
        viewport: (u32, u32),
    ) {
        let instances = marker_instances(labels, options);
        let _ = self.instances.write(device, queue, &instances);
        self.instance_count = instances.len() as u32;

        let uniform = ViewportUniform {
            size: [viewport.0.max(1) as f32, viewport.1.max(1) as f32],
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.viewport_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Record the draw.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.instances.buffer().slice(..));
        render_pass.draw(0..6, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::camera::Camera;
    use crate::geo::City;
    use crate::labels::occlusion::SphereOccluder;

    fn labels() -> LabelSet {
        let cities = [
            City::new("Front", 0.0, -90.0),
            City::new("Back", 0.0, 90.0),
            City::new("Side", 20.0, -70.0),
        ];
        let mut set = LabelSet::from_cities(&cities, 1.0);
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
        };
        let globe = SphereOccluder { center: Vec3::ZERO, radius: 1.0 };
        set.update(Mat4::IDENTITY, &camera, (600, 600), &globe);
        set
    }

    #[test]
    fn instance_is_32_bytes() {
        assert_eq!(size_of::<MarkerInstance>(), 32);
    }

    #[test]
    fn hidden_labels_get_no_marker() {
        let instances = marker_instances(&labels(), &LabelOptions::default());
        assert_eq!(instances.len(), 2);
    }

    #[test]
    fn selected_marker_is_last_and_highlighted() {
        let mut set = labels();
        let _ = set.select(0);
        let options = LabelOptions::default();
        let instances = marker_instances(&set, &options);
        assert_eq!(instances.len(), 2);
        let last = instances.last().unwrap();
        assert_eq!(last.color, options.selected_color);
        assert_eq!(last.size, options.marker_size_px * 1.5);
        assert_eq!(instances[0].color, options.color);
    }
}
