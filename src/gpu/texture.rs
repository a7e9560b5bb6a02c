//! Depth attachment and sampled image textures.

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::error::OrbisError;

/// Depth attachment format shared by every pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Render attachment sized to the surface.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl RenderTarget {
    /// Create a depth buffer. Zero dimensions are clamped to one pixel.
    #[must_use]
    pub fn depth(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        Self::attachment(device, "Depth Target", DEPTH_FORMAT, width, height, sample_count)
    }

    /// Create the multisampled color target that resolves into the
    /// swapchain. `None` when rendering single-sampled.
    #[must_use]
    pub fn msaa_color(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Option<Self> {
        (sample_count > 1).then(|| {
            Self::attachment(device, "MSAA Color Target", format, width, height, sample_count)
        })
    }

    fn attachment(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Decoded RGBA8 pixels, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Tightly packed RGBA8 rows, top row first.
    pub rgba: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TextureData {
    /// Decode an encoded image (PNG or JPEG).
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Texture`] if the bytes are not a supported
    /// image.
    pub fn decode(bytes: &[u8]) -> Result<Self, OrbisError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| OrbisError::Texture(format!("failed to decode image: {e}")))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            rgba: img.into_raw(),
            width,
            height,
        })
    }

    /// Read and decode an image file.
    ///
    /// # Errors
    ///
    /// Returns [`OrbisError::Io`] if the file cannot be read and
    /// [`OrbisError::Texture`] if it cannot be decoded.
    pub fn load(path: &Path) -> Result<Self, OrbisError> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Like [`load`](Self::load), but logs failures and returns the
    /// fallback texture instead.
    #[must_use]
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(data) => {
                log::debug!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    data.width,
                    data.height
                );
                data
            }
            Err(e) => {
                log::warn!("texture {} unavailable ({e}), using fallback", path.display());
                Self::fallback()
            }
        }
    }

    /// Single opaque white pixel.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            rgba: vec![255; 4],
            width: 1,
            height: 1,
        }
    }

    /// Downscale so neither side exceeds `max_dim`, keeping aspect.
    #[must_use]
    pub fn fit_within(self, max_dim: u32) -> Self {
        if self.width <= max_dim && self.height <= max_dim {
            return self;
        }
        let scale = max_dim as f32 / self.width.max(self.height) as f32;
        let width = ((self.width as f32 * scale) as u32).clamp(1, max_dim);
        let height = ((self.height as f32 * scale) as u32).clamp(1, max_dim);
        let Some(img) = image::RgbaImage::from_raw(self.width, self.height, self.rgba)
        else {
            return Self::fallback();
        };
        log::debug!("downscaling texture to {width}x{height}");
        let resized = image::imageops::resize(
            &img,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
        Self {
            rgba: resized.into_raw(),
            width,
            height,
        }
    }
}

/// A sampled 2D texture with its view and sampler.
pub struct ImageTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Linear clamp-to-edge sampler.
    pub sampler: wgpu::Sampler,
}

impl ImageTexture {
    /// Upload decoded pixels as an sRGB texture.
    #[must_use]
    pub fn from_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &TextureData,
        label: &str,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: data.width,
                    height: data.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data.rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn bundled_graticule_decodes_as_equirectangular() {
        let data =
            TextureData::decode(include_bytes!("../../assets/textures/graticule.png")).unwrap();
        assert_eq!((data.width, data.height), (512, 256));
        // Equator row, away from any meridian line.
        let offset = ((127 * data.width + 10) * 4) as usize;
        assert_eq!(&data.rgba[offset..offset + 4], &[220, 60, 50, 255]);
    }

    #[test]
    fn default_texture_path_ships_with_the_crate() {
        let rel = crate::options::DisplayOptions::default().texture_path;
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(rel);
        let data = TextureData::load(&path).unwrap();
        assert_ne!(data, TextureData::fallback());
        assert_eq!(data.width, 2 * data.height);
    }

    #[test]
    fn decodes_png() {
        let data = TextureData::decode(&encoded_png(4, 2)).unwrap();
        assert_eq!((data.width, data.height), (4, 2));
        assert_eq!(data.rgba.len(), 4 * 2 * 4);
        assert_eq!(&data.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_a_texture_error() {
        let err = TextureData::decode(b"not an image").unwrap_err();
        assert!(matches!(err, OrbisError::Texture(_)));
    }

    #[test]
    fn missing_file_falls_back() {
        let data = TextureData::load_or_fallback(Path::new("does/not/exist.jpg"));
        assert_eq!(data, TextureData::fallback());
    }

    #[test]
    fn fit_within_keeps_aspect() {
        let data = TextureData::decode(&encoded_png(64, 32)).unwrap().fit_within(16);
        assert_eq!((data.width, data.height), (16, 8));
        assert_eq!(data.rgba.len(), 16 * 8 * 4);

        let small = TextureData::fallback().fit_within(16);
        assert_eq!(small, TextureData::fallback());
    }
}
