mod camera;
mod points;
mod sprites;
mod texture;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    entity::Scene,
    window::{Size, Window},
};

use points::PointRenderer;
use sprites::SpriteRenderer;

pub use texture::SpriteImage;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.006,
    b: 0.016,
    a: 1.0,
};

pub struct Renderer {
    surface: wgpu::Surface,
    surface_format: wgpu::TextureFormat,
    size: Size,
    device: wgpu::Device,
    queue: wgpu::Queue,
    sprite_image: SpriteImage,
    point_renderer: Option<PointRenderer>,
    sprite_renderer: Option<SpriteRenderer>,
}

impl Renderer {
    pub async fn new(window: &impl Window) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await?;

        let size = window.size();
        if !size.is_empty() {
            Self::configure_surface(&surface, &device, surface_format, size);
        }

        Ok(Self {
            surface,
            surface_format,
            size,
            device,
            queue,
            sprite_image: SpriteImage::white(),
            point_renderer: None,
            sprite_renderer: None,
        })
    }

    fn configure_surface(
        surface: &wgpu::Surface,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size,
    ) {
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        )
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        if size.is_empty() {
            return;
        }
        Self::configure_surface(&self.surface, &self.device, self.surface_format, size);
    }

    /// Swaps in the resolved bullet sprite; later overlays start with it.
    pub fn set_sprite_image(&mut self, image: SpriteImage) {
        if let Some(sprite_renderer) = &mut self.sprite_renderer {
            sprite_renderer.set_texture(&self.device, &self.queue, &image);
        }
        self.sprite_image = image;
    }

    /// Matches GPU resources to the layers present in `scene`, then draws it.
    pub fn render(&mut self, scene: &Scene) -> Result<()> {
        self.sync_layers(scene);

        if self.size.is_empty() {
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.resize(self.size);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out waiting for the next surface texture");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to get next surface texture"),
        };
        let surface_texture_view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: true,
                    },
                }],
                depth_stencil_attachment: None,
            });
            if let Some(point_renderer) = &self.point_renderer {
                point_renderer.draw(&mut rpass);
            }
            if let Some(sprite_renderer) = &self.sprite_renderer {
                sprite_renderer.draw(&mut rpass);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(())
    }

    fn sync_layers(&mut self, scene: &Scene) {
        match &scene.points {
            Some(layer) => {
                let stale = self
                    .point_renderer
                    .as_ref()
                    .map_or(true, |renderer| !renderer.fits(layer));
                if stale {
                    let count = (layer.positions.len() / 3) as u32;
                    let dust = layer.dust.map_or(0, |d| (d.len() / 3) as u32);
                    self.point_renderer = Some(PointRenderer::new(
                        &self.device,
                        self.surface_format,
                        count,
                        dust,
                    ));
                }
                if let Some(point_renderer) = &mut self.point_renderer {
                    point_renderer.update(&self.queue, layer);
                }
            }
            None => {
                if self.point_renderer.take().is_some() {
                    debug!("Point layer released");
                }
            }
        }

        match &scene.sprites {
            Some(layer) => {
                let device = &self.device;
                let queue = &self.queue;
                let format = self.surface_format;
                let image = &self.sprite_image;
                let sprite_renderer = self
                    .sprite_renderer
                    .get_or_insert_with(|| SpriteRenderer::new(device, queue, format, image));
                sprite_renderer.update(queue, layer);
            }
            None => {
                if self.sprite_renderer.take().is_some() {
                    debug!("Sprite layer released");
                }
            }
        }
    }
}
