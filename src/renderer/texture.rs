use std::{num::NonZeroU32, path::Path};

use anyhow::{Context, Result};

/// Decoded RGBA8 pixels for the bullet sprite.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// Placeholder used until the real sprite resolves.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![u8::MAX; 4],
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("Failed to open sprite image {}", path.display()))?
            .to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    /// Brass slug with a bright core and soft edges, nose toward `+x`.
    pub fn procedural(width: u32, height: u32) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let u = (x as f32 + 0.5) / width as f32;
                let v = ((y as f32 + 0.5) / height as f32 - 0.5) * 2.0;
                // Round the nose over the last quarter.
                let nose = ((u - 0.75).max(0.0) / 0.25).powi(2);
                let edge = v.abs() + nose;
                let alpha = (1.0 - edge).clamp(0.0, 1.0).powf(0.6);
                let shine = (1.0 - (v + 0.35).abs() * 2.5).clamp(0.0, 1.0);
                let r = 0.78 + 0.22 * shine;
                let g = 0.58 + 0.35 * shine;
                let b = 0.28 + 0.5 * shine;
                rgba.extend([r, g, b, alpha].map(|c| (c * 255.0) as u8));
            }
        }
        Self { width, height, rgba }
    }
}

pub struct Texture {
    // Owns the storage behind `view`.
    _wgpu_texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

pub trait DeviceTextureExt {
    fn create_sprite_texture(&self, queue: &wgpu::Queue, image: &SpriteImage) -> Texture;
}

impl DeviceTextureExt for wgpu::Device {
    fn create_sprite_texture(&self, queue: &wgpu::Queue, image: &SpriteImage) -> Texture {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let wgpu_texture = self.create_texture(&wgpu::TextureDescriptor {
            label: Some("Sprite Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &wgpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(image.width * 4),
                rows_per_image: NonZeroU32::new(image.height),
            },
            size,
        );
        let view = wgpu_texture.create_view(&wgpu::TextureViewDescriptor::default());

        Texture {
            _wgpu_texture: wgpu_texture,
            view,
            width: image.width,
            height: image.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_sprite_has_a_solid_core_and_clear_edges() {
        let sprite = SpriteImage::procedural(64, 16);
        assert_eq!(sprite.rgba.len(), 64 * 16 * 4);
        let alpha = |x: u32, y: u32| sprite.rgba[((y * 64 + x) * 4 + 3) as usize];
        assert!(alpha(20, 8) > 200);
        assert!(alpha(20, 0) < 100);
        assert!(alpha(63, 8) < alpha(40, 8));
    }
}
