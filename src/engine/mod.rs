//! GPU-backed engine driving one demo.
//!
//! [`DemoEngine`] pairs the platform-independent [`Stage`] with the wgpu
//! resources that draw it. Hosts call [`update`](DemoEngine::update) and
//! [`render`](DemoEngine::render) once per frame and forward resize and
//! input events as they arrive.

/// The engine's command vocabulary.
pub mod command;
mod input;
mod options;

use std::path::Path;

use crate::demo::{DemoKind, MeshKind};
use crate::error::OrbisError;
use crate::gpu::camera_binding::CameraBinding;
use crate::gpu::lighting::Lighting;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, TextureData};
use crate::input::InputProcessor;
use crate::options::{DisplayOptions, Options};
use crate::renderer::label_markers::LabelMarkerRenderer;
use crate::renderer::mesh_renderer::{MeshRenderer, MeshUniform};
use crate::scene::mesh::MeshData;
use crate::scene::Stage;
use crate::util::frame_timing::FrameTiming;

/// Frames between FPS debug log lines.
const FPS_LOG_INTERVAL: u64 = 600;

/// Renders one demo into a window or canvas surface.
///
/// # Frame loop
///
/// Each frame, call [`tick`](Self::tick), which advances the scene by the
/// stage clock, and then [`render`](Self::render) to draw and present.
/// [`update`](Self::update) steps by an explicit `dt` instead. Call
/// [`resize`](Self::resize) when the drawable size changes.
///
/// # Input
///
/// Raw events go through [`handle_input`](Self::handle_input) and key
/// presses through [`handle_key_press`](Self::handle_key_press). Both
/// resolve to a [`Command`](command::Command), which can also be issued
/// directly with [`execute`](Self::execute).
pub struct DemoEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    _shader_composer: ShaderComposer,
    depth: RenderTarget,
    /// Multisampled color target, `None` when rendering single-sampled.
    msaa: Option<RenderTarget>,
    camera_binding: CameraBinding,
    /// GPU lighting uniform and bind group.
    pub lighting: Lighting,
    mesh_renderer: MeshRenderer,
    marker_renderer: LabelMarkerRenderer,
    stage: Stage,
    options: Options,
    input: InputProcessor,
    /// Whether label markers are drawn into the frame. Hosts with their
    /// own label overlay turn this off.
    show_label_markers: bool,
    /// Per-frame timing and FPS tracking.
    pub frame_timing: FrameTiming,
}

impl DemoEngine {
    /// Create the engine for `demo` on the given surface target.
    ///
    /// Native builds read the globe texture from
    /// `options.display.texture_path`. Browser builds start with the
    /// fallback texture; the host fetches the image and hands it over with
    /// [`set_texture`](Self::set_texture).
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError`] if GPU initialization, shader composition or
    /// the embedded city catalog fails.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        demo: DemoKind,
        options: Options,
    ) -> Result<Self, OrbisError> {
        let context = RenderContext::new(target, size).await?;
        let (width, height) = size;

        let mut stage = Stage::new(demo, &options, width, height)?;
        let mut shader_composer = ShaderComposer::new()?;

        let camera_binding = CameraBinding::new(&context.device, stage.camera());
        let lighting = Lighting::new(&context.device, &options.lighting);

        let max_dim = context.device.limits().max_texture_dimension_2d;
        let texture = initial_texture(&options.display).fit_within(max_dim);
        let mesh = mesh_for(demo, &options.display);

        let mesh_renderer = MeshRenderer::new(
            &context.device,
            &context.queue,
            context.format(),
            context.sample_count,
            &camera_binding.layout,
            &lighting.layout,
            &mut shader_composer,
            &mesh,
            &texture,
        )?;
        let marker_renderer = LabelMarkerRenderer::new(
            &context.device,
            context.format(),
            context.sample_count,
            &mut shader_composer,
        )?;

        let (depth, msaa) = frame_targets(&context);
        let input = InputProcessor::with_key_bindings(options.keybindings.clone());

        log::info!(
            "{} demo ready ({} labels, {}x{})",
            demo,
            stage.labels().len(),
            width,
            height
        );

        stage.restart_clock();
        Ok(Self {
            context,
            _shader_composer: shader_composer,
            depth,
            msaa,
            camera_binding,
            lighting,
            mesh_renderer,
            marker_renderer,
            stage,
            options,
            input,
            show_label_markers: true,
            frame_timing: FrameTiming::new(),
        })
    }

    /// Advance the scene by the time since the previous tick and upload
    /// per-frame uniforms. Hosts call this once per frame.
    pub fn tick(&mut self) -> f32 {
        let dt = self.stage.tick();
        self.sync_gpu();
        dt
    }

    /// Advance the scene by `dt` seconds and upload per-frame uniforms.
    pub fn update(&mut self, dt: f32) {
        self.stage.update(dt);
        self.sync_gpu();
    }

    fn sync_gpu(&mut self) {
        self.camera_binding
            .update(&self.context.queue, self.stage.camera());

        let demo = self.stage.demo();
        let base_color = match demo.mesh() {
            MeshKind::Cube => {
                let [r, g, b] = self.options.display.cube_color;
                [r, g, b, 1.0]
            }
            MeshKind::Sphere => [1.0; 4],
        };
        self.mesh_renderer.update(
            &self.context.queue,
            MeshUniform::new(self.stage.model_matrix(), base_color, demo.textured()),
        );

        if self.show_label_markers {
            self.marker_renderer.update(
                &self.context.device,
                &self.context.queue,
                self.stage.labels(),
                &self.options.labels,
                self.stage.viewport(),
            );
        }
    }

    /// Draw the current frame and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired. Hosts reconfigure on `Lost` and `Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.encode_frame(&view);
        self.context.submit(encoder);
        frame.present();
        self.frame_timing.end_frame();
        if self.frame_timing.frames() % FPS_LOG_INTERVAL == 0 {
            log::debug!(
                "{} frames, {:.1} fps",
                self.frame_timing.frames(),
                self.frame_timing.fps()
            );
        }
        Ok(())
    }

    fn encode_frame(&self, view: &wgpu::TextureView) -> wgpu::CommandEncoder {
        let mut encoder = self.context.create_encoder();
        let clear = clear_color(
            self.options.display.clear_rgb(),
            self.context.format().is_srgb(),
        );
        // Multisampled frames resolve into the swapchain view.
        let (target, resolve_target, store) = match &self.msaa {
            Some(msaa) => (&msaa.view, Some(view), wgpu::StoreOp::Discard),
            None => (view, None, wgpu::StoreOp::Store),
        };
        {
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Main Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear),
                            store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

            self.mesh_renderer.draw(
                &mut render_pass,
                &self.camera_binding.bind_group,
                &self.lighting.bind_group,
            );
            if self.show_label_markers {
                self.marker_renderer.draw(&mut render_pass);
            }
        }
        encoder
    }

    /// Track a new drawable size.
    ///
    /// The stage always records the size. The surface and frame targets are
    /// only rebuilt for non-zero sizes.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.stage.resize(width, height);
        if self.context.resize(width, height) {
            (self.depth, self.msaa) = frame_targets(&self.context);
        }
        self.sync_gpu();
    }

    /// Replace the globe texture.
    pub fn set_texture(&mut self, data: &TextureData) {
        let max_dim = self.context.device.limits().max_texture_dimension_2d;
        let data = data.clone().fit_within(max_dim);
        log::debug!("uploading texture {}x{}", data.width, data.height);
        self.mesh_renderer
            .set_texture(&self.context.device, &self.context.queue, &data);
    }

    /// Enable or disable the in-frame label markers.
    pub fn set_label_markers(&mut self, enabled: bool) {
        self.show_label_markers = enabled;
        self.sync_gpu();
    }

    /// Scene state for the active demo.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable scene state.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Active demo.
    #[must_use]
    pub fn demo(&self) -> DemoKind {
        self.stage.demo()
    }
}

/// Depth and MSAA color targets for the configured surface.
fn frame_targets(context: &RenderContext) -> (RenderTarget, Option<RenderTarget>) {
    let (width, height) = context.size();
    let depth = RenderTarget::depth(&context.device, width, height, context.sample_count);
    let msaa = RenderTarget::msaa_color(
        &context.device,
        context.format(),
        width,
        height,
        context.sample_count,
    );
    (depth, msaa)
}

/// Geometry for a demo's mesh.
fn mesh_for(demo: DemoKind, display: &DisplayOptions) -> MeshData {
    match demo.mesh() {
        MeshKind::Cube => MeshData::cube(display.cube_size),
        MeshKind::Sphere => MeshData::sphere(
            display.globe_radius,
            display.sphere_width_segments,
            display.sphere_height_segments,
        ),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn initial_texture(display: &DisplayOptions) -> TextureData {
    TextureData::load_or_fallback(Path::new(&display.texture_path))
}

#[cfg(target_arch = "wasm32")]
fn initial_texture(display: &DisplayOptions) -> TextureData {
    log::debug!(
        "texture {} is fetched by the host",
        Path::new(&display.texture_path).display()
    );
    TextureData::fallback()
}

/// Clear color for the surface. sRGB surfaces expect linear values.
fn clear_color(rgb: [f32; 3], srgb_surface: bool) -> wgpu::Color {
    let channel = |c: f32| {
        let c = f64::from(c);
        if srgb_surface {
            srgb_to_linear(c)
        } else {
            c
        }
    };
    wgpu::Color {
        r: channel(rgb[0]),
        g: channel(rgb[1]),
        b: channel(rgb[2]),
        a: 1.0,
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_passes_through_on_linear_surfaces() {
        let c = clear_color([0.5, 0.25, 1.0], false);
        assert_eq!((c.r, c.g, c.b, c.a), (0.5, 0.25, 1.0, 1.0));
    }

    #[test]
    fn clear_color_is_linearized_for_srgb_surfaces() {
        let c = clear_color([0.0, 0.5, 1.0], true);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 0.214).abs() < 1e-3);
        assert!((c.b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn each_demo_gets_its_mesh() {
        let display = DisplayOptions::default();
        let cube = mesh_for(DemoKind::Cube, &display);
        let globe = mesh_for(DemoKind::Globe, &display);
        assert_eq!(cube.vertices.len(), 24);
        assert!(globe.vertices.len() > cube.vertices.len());
        assert_eq!(
            mesh_for(DemoKind::Capitals, &display).index_count(),
            globe.index_count()
        );
    }
}
