use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use log::{debug, info, warn};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ModifiersState, MouseScrollDelta, VirtualKeyCode},
    window::Window,
};

use crate::{
    bullet_time::BulletTime,
    config::Config,
    entity::Scene,
    pager::SectionPager,
    renderer::{Renderer, SpriteImage},
    scene::{ParticleScene, SceneInputs},
    shapes::{text::BitmapCanvas, ShapeLibrary},
    window::{HasSize, Size},
};

pub const TITLE: &str = "particle-folio";
const SPRITE_SIZE: (u32, u32) = (128, 32);

pub struct App {
    window: Window,
    renderer: Renderer,
    scene: ParticleScene,
    bullet_time: BulletTime,
    pager: SectionPager,
    bullet_time_active: bool,
    modifiers: ModifiersState,
    sprite_receiver: Option<Receiver<Result<SpriteImage>>>,
    started: Instant,
}

impl App {
    pub async fn new(window: Window, config: Config) -> Result<Self> {
        info!("{:#?}", &config);
        let renderer = Renderer::new(&window).await?;
        let size = window.size();

        let pager = SectionPager::new(config.layout.section_count(), config.section, config.cooldown);
        let inputs = SceneInputs {
            current_section: pager.section(),
            ..Default::default()
        };

        let library = ShapeLibrary::new(config.particles, &config.text);
        let mut scene = ParticleScene::new(config.layout, library, inputs);
        scene.mount(Some(size));
        scene.rasterize_text(&BitmapCanvas::default());

        let bullet_time = BulletTime::new(size).on_complete(|| info!("Bullet time finished"));

        Ok(Self {
            window,
            renderer,
            scene,
            bullet_time,
            pager,
            bullet_time_active: false,
            modifiers: ModifiersState::empty(),
            sprite_receiver: Some(spawn_sprite_loader(config.bullet_texture)),
            started: Instant::now(),
        })
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let size = Size::from(size);
        debug!("Resized to {}x{}", size.width, size.height);
        self.renderer.resize(size);
        if self.scene.is_mounted() {
            self.scene.resize(size);
        } else {
            self.scene.mount(Some(size));
        }
        self.bullet_time.resize(size);
    }

    pub fn on_modifiers_changed(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    pub fn on_key_down(&mut self, keycode: VirtualKeyCode) {
        let now = self.now();
        let mut inputs = self.scene.inputs();

        match keycode {
            VirtualKeyCode::Down | VirtualKeyCode::Right | VirtualKeyCode::PageDown => {
                self.step_section(1, now);
                return;
            }
            VirtualKeyCode::Up | VirtualKeyCode::Left | VirtualKeyCode::PageUp => {
                self.step_section(-1, now);
                return;
            }
            VirtualKeyCode::B => {
                self.bullet_time_active = !self.bullet_time_active;
                self.bullet_time.set_active(self.bullet_time_active, now);
                return;
            }
            VirtualKeyCode::Key0 => {
                inputs.selected_experience = None;
                inputs.selected_social = None;
            }
            _ => {
                let index = match number_key(keycode) {
                    Some(index) => index,
                    None => return,
                };
                if self.modifiers.shift() {
                    inputs.selected_social = Some(index);
                } else {
                    inputs.selected_experience = Some(index);
                }
            }
        }

        debug!("Selection changed: {:?}", inputs);
        self.scene.set_inputs(inputs, now);
    }

    pub fn on_mouse_scroll(&mut self, delta: MouseScrollDelta) {
        let y = match delta {
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32,
            MouseScrollDelta::LineDelta(_, y) => y,
        };
        if y == 0.0 {
            return;
        }
        // Scrolling down moves forward through the page.
        self.step_section(if y < 0.0 { 1 } else { -1 }, self.now());
    }

    fn step_section(&mut self, delta: i32, now: Duration) {
        if let Some(section) = self.pager.step(delta, now) {
            let inputs = SceneInputs {
                current_section: section,
                ..self.scene.inputs()
            };
            self.scene.set_inputs(inputs, now);
            if let Some(section) = self.scene.section() {
                self.window.set_title(&format!("{} - {:?}", TITLE, section));
            }
        }
    }

    fn poll_sprite(&mut self) {
        let receiver = match &self.sprite_receiver {
            Some(receiver) => receiver,
            None => return,
        };
        match receiver.try_recv() {
            Ok(Ok(image)) => {
                info!("Bullet sprite resolved ({}x{})", image.width, image.height);
                self.renderer.set_sprite_image(image);
            }
            Ok(Err(e)) => warn!("Keeping the default bullet sprite: {:#}", e),
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => warn!("Bullet sprite loader went away"),
        }
        self.sprite_receiver = None;
    }

    pub fn render(&mut self) -> Result<()> {
        let now = self.now();
        self.poll_sprite();

        let scene = Scene {
            points: self.scene.frame(now),
            sprites: self.bullet_time.frame(now),
        };
        self.renderer.render(&scene)
    }

    pub fn on_exit(&mut self) {
        self.bullet_time.unmount();
        self.scene.unmount();
    }
}

fn number_key(keycode: VirtualKeyCode) -> Option<i32> {
    match keycode {
        VirtualKeyCode::Key1 => Some(0),
        VirtualKeyCode::Key2 => Some(1),
        VirtualKeyCode::Key3 => Some(2),
        VirtualKeyCode::Key4 => Some(3),
        VirtualKeyCode::Key5 => Some(4),
        _ => None,
    }
}

/// Decodes or generates the bullet sprite off the event loop.
fn spawn_sprite_loader(path: Option<PathBuf>) -> Receiver<Result<SpriteImage>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let image = match path {
            Some(path) => SpriteImage::load(&path),
            None => Ok(SpriteImage::procedural(SPRITE_SIZE.0, SPRITE_SIZE.1)),
        };
        // The app may already be gone.
        let _ = sender.send(image);
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_map_to_selector_indices() {
        assert_eq!(number_key(VirtualKeyCode::Key1), Some(0));
        assert_eq!(number_key(VirtualKeyCode::Key5), Some(4));
        assert_eq!(number_key(VirtualKeyCode::Key6), None);
        assert_eq!(number_key(VirtualKeyCode::B), None);
    }

    #[test]
    fn generated_sprite_arrives_through_the_loader() {
        let receiver = spawn_sprite_loader(None);
        let image = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("loader never answered")
            .expect("procedural sprite failed");
        assert_eq!((image.width, image.height), SPRITE_SIZE);
    }

    #[test]
    fn missing_sprite_file_reports_an_error() {
        let receiver = spawn_sprite_loader(Some(PathBuf::from("/nonexistent/bullet.png")));
        let image = receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("loader never answered");
        assert!(image.is_err());
    }
}
