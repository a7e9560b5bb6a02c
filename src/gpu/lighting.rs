use glam::Vec3;
use wgpu::util::DeviceExt;

use super::pipeline_helpers::uniform_buffer;
use crate::options::LightingOptions;

/// Directional light shared by the mesh shader.
/// NOTE: Must match the WGSL `LightUniform` layout exactly (32 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Unit vector from the surface toward the light.
    pub direction: [f32; 3],
    /// Directional intensity.
    pub intensity: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Ambient floor.
    pub ambient: f32,
}

impl LightUniform {
    /// Uniform for the given options. A zero direction falls back to +Z.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        let direction = Vec3::from_array(options.direction)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        Self {
            direction: direction.to_array(),
            intensity: options.intensity,
            color: options.color,
            ambient: options.ambient,
        }
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::from_options(&LightingOptions::default())
    }
}

/// Light uniform buffer with its bind group.
pub struct Lighting {
    /// CPU copy of the uniform.
    pub uniform: LightUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Layout for group 1 of the mesh pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Create the light from options.
    #[must_use]
    pub fn new(device: &wgpu::Device, options: &LightingOptions) -> Self {
        let uniform = LightUniform::from_options(options);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lighting Bind Group Layout"),
            entries: &[uniform_buffer(0, wgpu::ShaderStages::FRAGMENT)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Lighting Bind Group"),
        });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Replace the light parameters and upload them.
    pub fn set_options(&mut self, queue: &wgpu::Queue, options: &LightingOptions) {
        self.uniform = LightUniform::from_options(options);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(size_of::<LightUniform>(), 32);
    }

    #[test]
    fn default_direction_is_normalized() {
        let uniform = LightUniform::default();
        let dir = Vec3::from_array(uniform.direction);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir - Vec3::new(-1.0, 2.0, 4.0).normalize()).length() < 1e-6);
        assert_eq!(uniform.color, [1.0, 1.0, 1.0]);
        assert_eq!(uniform.intensity, 1.0);
    }

    #[test]
    fn zero_direction_falls_back() {
        let options = LightingOptions {
            direction: [0.0; 3],
            ..LightingOptions::default()
        };
        assert_eq!(LightUniform::from_options(&options).direction, [0.0, 0.0, 1.0]);
    }
}
