use glam::{vec3, Quat, Vec3};

use crate::entity::{Sprite, Transform};

pub const TRAIL_LENGTH: usize = 6;
const TRAIL_SPACING: f32 = 0.45;
const TRAIL_OPACITY: f32 = 0.55;
const TRAIL_SHRINK: f32 = 0.05;
/// Quad size of a bullet, long side along its direction of travel.
const SIZE: Vec3 = glam::const_vec3!([1.4, 0.4, 1.0]);

/// `1 - (1 - t)^12`: about 93% of the way after the first fifth.
pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(12)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ghost {
    pub position: Vec3,
    pub opacity: f32,
    pub scale: f32,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub position: Vec3,
    pub start: Vec3,
    pub end: Vec3,
    pub direction: Vec3,
    pub orientation: Quat,
    /// Fraction of the shoot-in duration to wait before launching.
    pub delay: f32,
    pub trail: [Ghost; TRAIL_LENGTH],
    pub started: bool,
    pub spin: f32,
}

impl Bullet {
    pub fn new(start: Vec3, end: Vec3, delay: f32) -> Self {
        let direction = (end - start).normalize_or_zero();
        let trail = [Ghost {
            position: start,
            opacity: 0.0,
            scale: 1.0,
            visible: false,
        }; TRAIL_LENGTH];
        let mut bullet = Self {
            position: start,
            start,
            end,
            direction,
            orientation: Quat::from_rotation_arc(Vec3::X, if direction == Vec3::ZERO { Vec3::X } else { direction }),
            delay,
            trail,
            started: false,
            spin: 0.0,
        };
        bullet.place_trail();
        bullet
    }

    /// Own progress in `[0, 1]` once the delay has passed.
    pub fn progress(&self, elapsed: f32, total: f32) -> f32 {
        let wait = self.delay * total;
        let remaining = total - wait;
        if remaining <= 0.0 {
            return if elapsed >= total { 1.0 } else { 0.0 };
        }
        ((elapsed - wait) / remaining).clamp(0.0, 1.0)
    }

    pub fn shoot(&mut self, elapsed: f32, total: f32) {
        self.started = elapsed >= self.delay * total;
        if self.started {
            let t = ease_out(self.progress(elapsed, total));
            self.position = self.start.lerp(self.end, t);
        } else {
            self.position = self.start;
        }
        self.place_trail();
    }

    pub fn land(&mut self) {
        self.started = true;
        self.position = self.end;
        self.place_trail();
    }

    /// Moves outward along the original direction by `speed` this frame.
    pub fn push(&mut self, speed: f32) {
        self.position += self.direction * speed;
        self.place_trail();
    }

    pub fn rotate(&mut self, angle: f32) {
        self.spin = (self.spin + angle) % std::f32::consts::TAU;
    }

    fn place_trail(&mut self) {
        for (k, ghost) in self.trail.iter_mut().enumerate() {
            let n = (k + 1) as f32;
            ghost.position = self.position - self.direction * TRAIL_SPACING * n;
            ghost.opacity = TRAIL_OPACITY * (1.0 - n / (TRAIL_LENGTH + 1) as f32);
            ghost.scale = 1.0 - TRAIL_SHRINK * n;
            ghost.visible = self.started;
        }
    }

    fn rotation(&self) -> Quat {
        self.orientation * Quat::from_rotation_x(self.spin)
    }

    /// The bullet followed by its visible ghosts.
    pub fn sprites(&self) -> impl Iterator<Item = Sprite> + '_ {
        let rotation = self.rotation();
        let head = Sprite {
            transform: Transform {
                position: self.position,
                rotation,
                scale: SIZE,
            },
            opacity: 1.0,
        };
        let ghosts = self.trail.iter().filter(|g| g.visible).map(move |g| Sprite {
            transform: Transform {
                position: g.position,
                rotation,
                scale: SIZE * vec3(g.scale, g.scale, 1.0),
            },
            opacity: g.opacity,
        });
        std::iter::once(head).chain(ghosts)
    }
}
