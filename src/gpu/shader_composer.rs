use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage, ShaderType,
};

use crate::error::OrbisError;

/// Lit mesh shader (cube and globe).
pub const MESH_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/mesh.wgsl"),
    file_path: "mesh.wgsl",
};

/// Screen-space label marker shader.
pub const LABEL_MARKER_SHADER: ShaderSource = ShaderSource {
    source: include_str!("../../assets/shaders/label_marker.wgsl"),
    file_path: "label_marker.wgsl",
};

/// A WGSL source and the path it is reported under in errors.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    /// WGSL text, possibly containing `#import` directives.
    pub source: &'static str,
    /// Path used for diagnostics.
    pub file_path: &'static str,
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with `#import` support.
///
/// Shared modules are registered at construction. Consuming shaders use
/// `#import orbis::camera` or `#import orbis::lighting`, and composition
/// yields `naga::Module` IR directly so wgpu skips a WGSL re-parse.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared modules in dependency order.
const MODULES: &[ShaderSource] = &[
    ShaderSource {
        source: include_str!("../../assets/shaders/modules/camera.wgsl"),
        file_path: "modules/camera.wgsl",
    },
    ShaderSource {
        source: include_str!("../../assets/shaders/modules/lighting.wgsl"),
        file_path: "modules/lighting.wgsl",
    },
];

impl ShaderComposer {
    /// Composer with the shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, OrbisError> {
        let mut composer = Composer::default();

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    OrbisError::Shader(format!(
                        "failed to register shader module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        shader: ShaderSource,
    ) -> Result<wgpu::ShaderModule, OrbisError> {
        let naga_module = self.compose_naga(shader)?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: ShaderSource,
    ) -> Result<naga::Module, OrbisError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source,
                file_path: shader.file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                OrbisError::Shader(format!(
                    "failed to compose shader '{}': {e}",
                    shader.file_path
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in [MESH_SHADER, LABEL_MARKER_SHADER] {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{e}"));
            assert!(module.entry_points.iter().any(|ep| ep.name == "vs_main"));
            assert!(module.entry_points.iter().any(|ep| ep.name == "fs_main"));
        }
    }

    #[test]
    fn mesh_shader_validates() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(MESH_SHADER).unwrap();
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        );
        assert!(validator.validate(&module).is_ok());
    }

    #[test]
    fn broken_source_reports_path() {
        let mut composer = ShaderComposer::new().unwrap();
        let err = composer
            .compose_naga(ShaderSource {
                source: "fn main( {",
                file_path: "broken.wgsl",
            })
            .unwrap_err();
        assert!(err.to_string().contains("broken.wgsl"));
    }
}
