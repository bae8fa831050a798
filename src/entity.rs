//! Plain per-frame snapshots handed from the controllers to the renderer.

use glam::{Quat, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Perspective camera looking at `target`; `fov` is vertical, in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, aspect_ratio: f32, position: Vec3) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            fov,
            aspect_ratio,
            near: 0.1,
            far: 1000.,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct PointLayer<'a> {
    pub camera: Camera,
    pub transform: Transform,
    pub positions: &'a [f32],
    pub particle_size: f32,
    /// Decorative cloud sharing `transform`, when visible.
    pub dust: Option<&'a [f32]>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub transform: Transform,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct SpriteLayer {
    pub camera: Camera,
    pub sprites: Vec<Sprite>,
}

#[derive(Debug, Clone, Default)]
pub struct Scene<'a> {
    pub points: Option<PointLayer<'a>>,
    pub sprites: Option<SpriteLayer>,
}
