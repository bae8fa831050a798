//! Bullet-time overlay: projectiles shoot in, hang spinning while active,
//! then fly out and release everything.

mod bullet;

use std::time::Duration;

use glam::{vec2, vec3, Vec2, Vec3};
use log::{debug, info};

use bullet::Bullet;

use crate::{
    entity::{Camera, SpriteLayer},
    window::Size,
};

pub const BULLET_COUNT: usize = 5;
/// Lets an external cue line up with the first shot.
pub const START_DELAY: Duration = Duration::from_millis(350);
pub const SHOOT_DURATION: Duration = Duration::from_millis(1800);
pub const FLY_OUT_DURATION: Duration = Duration::from_millis(700);

const FOV: f32 = 50.0;
const CAMERA_DISTANCE: f32 = 12.0;
const ORIGIN: Vec3 = glam::const_vec3!([-40.0, 0.0, -30.0]);
/// Share of the visible area the end points spread over.
const TARGET_AREA: f32 = 0.7;
/// End points as fractions of the target rectangle's half extents.
const TARGETS: [Vec2; BULLET_COUNT] = [
    glam::const_vec2!([-0.6, 0.45]),
    glam::const_vec2!([0.55, 0.6]),
    glam::const_vec2!([-0.15, -0.35]),
    glam::const_vec2!([0.75, -0.5]),
    glam::const_vec2!([0.1, 0.15]),
];
const DELAYS: [f32; BULLET_COUNT] = [0.0, 0.08, 0.16, 0.24, 0.32];
/// Radians per frame.
const SPIN_RATE: f32 = 0.12;
const FLY_OUT_SPIN: f32 = 4.0;
const FLY_OUT_SPEED: f32 = 0.3;
const FLY_OUT_ACCELERATION: f32 = 9.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// Activated; the scene gets built at `build_at`.
    Pending { build_at: Duration },
    ShootIn { since: Duration },
    Frozen,
    FlyOut { since: Duration },
}

struct BulletScene {
    camera: Camera,
    bullets: Vec<Bullet>,
}

pub struct BulletTime {
    active: bool,
    phase: Phase,
    scene: Option<BulletScene>,
    viewport: Size,
    on_complete: Option<Box<dyn FnMut()>>,
    frames: u64,
}

impl BulletTime {
    pub fn new(viewport: Size) -> Self {
        Self {
            active: false,
            phase: Phase::Idle,
            scene: None,
            viewport,
            on_complete: None,
            frames: 0,
        }
    }

    /// Called once the fly-out has finished and everything is released.
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn set_active(&mut self, active: bool, now: Duration) {
        if active == self.active {
            return;
        }
        self.active = active;

        if active {
            if self.scene.is_some() {
                self.dispose();
            }
            self.phase = Phase::Pending {
                build_at: now + START_DELAY,
            };
            info!("Bullet time armed");
            return;
        }

        match self.phase {
            Phase::Pending { .. } => {
                self.phase = Phase::Idle;
                info!("Bullet time cancelled before it started");
            }
            Phase::ShootIn { .. } | Phase::Frozen => {
                self.phase = Phase::FlyOut { since: now };
                info!("Bullet time flying out");
            }
            Phase::FlyOut { .. } | Phase::Idle => (),
        }
    }

    pub fn resize(&mut self, size: Size) {
        if size.is_empty() {
            return;
        }
        self.viewport = size;
        if let Some(scene) = self.scene.as_mut() {
            scene.camera.aspect_ratio = size.aspect_ratio();
        }
    }

    /// Releases everything regardless of phase; the callback does not fire.
    pub fn unmount(&mut self) {
        self.active = false;
        self.phase = Phase::Idle;
        self.dispose();
    }

    pub fn frame(&mut self, now: Duration) -> Option<SpriteLayer> {
        if let Phase::Pending { build_at } = self.phase {
            if now < build_at {
                return None;
            }
            self.scene = Some(self.build());
            self.phase = Phase::ShootIn { since: build_at };
            info!("Bullet time shooting in");
        }

        let scene = self.scene.as_mut()?;
        self.frames += 1;

        match self.phase {
            Phase::ShootIn { since } => {
                let elapsed = now.saturating_sub(since).as_secs_f32();
                let total = SHOOT_DURATION.as_secs_f32();
                for b in scene.bullets.iter_mut() {
                    b.shoot(elapsed, total);
                    b.rotate(SPIN_RATE);
                }
                if elapsed >= total {
                    scene.bullets.iter_mut().for_each(Bullet::land);
                    self.phase = Phase::Frozen;
                    debug!("Bullet time frozen");
                }
            }
            Phase::Frozen => scene.bullets.iter_mut().for_each(|b| b.rotate(SPIN_RATE)),
            Phase::FlyOut { since } => {
                let t = now.saturating_sub(since).as_secs_f32() / FLY_OUT_DURATION.as_secs_f32();
                if t >= 1.0 {
                    self.finish();
                    return None;
                }
                let speed = FLY_OUT_SPEED + FLY_OUT_ACCELERATION * t * t;
                for b in scene.bullets.iter_mut() {
                    b.push(speed);
                    b.rotate(SPIN_RATE * FLY_OUT_SPIN);
                }
            }
            Phase::Idle | Phase::Pending { .. } => (),
        }

        Some(SpriteLayer {
            camera: scene.camera,
            sprites: scene.bullets.iter().flat_map(Bullet::sprites).collect(),
        })
    }

    fn build(&self) -> BulletScene {
        let camera = Camera::new(
            FOV,
            self.viewport.aspect_ratio(),
            vec3(0.0, 0.0, CAMERA_DISTANCE),
        );
        let half_height = (camera.fov.to_radians() * 0.5).tan() * CAMERA_DISTANCE;
        let half = vec2(half_height * camera.aspect_ratio, half_height) * TARGET_AREA;

        let bullets = TARGETS
            .iter()
            .zip(DELAYS)
            .map(|(f, delay)| Bullet::new(ORIGIN, (*f * half).extend(0.0), delay))
            .collect();
        BulletScene { camera, bullets }
    }

    fn finish(&mut self) {
        self.dispose();
        self.phase = Phase::Idle;
        info!("Bullet time complete after {} frames", self.frames);
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    fn dispose(&mut self) {
        if self.scene.take().is_some() {
            debug!("Bullet time scene released");
        }
    }
}

#[cfg(test)]
impl BulletTime {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn is_disposed(&self) -> bool {
        self.scene.is_none()
    }

    fn frames(&self) -> u64 {
        self.frames
    }

    fn bullets(&self) -> &[Bullet] {
        self.scene.as_ref().map(|s| s.bullets.as_slice()).unwrap_or(&[])
    }
}
