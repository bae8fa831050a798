//! Particle scene: eases a live point cloud toward the target shape of the
//! current section and moves it with the section's motion.

mod cloud;
mod controller;
mod section;

pub use controller::{ParticleScene, SceneInputs};
pub use section::Layout;
