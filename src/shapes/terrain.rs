//! Scrolling mountain range.
//!
//! Heights are periodic along Z with period `2 * HALF_DEPTH`, so the scene can
//! wrap particles from the far edge back to the near edge without a seam.

use std::f32::consts::TAU;

use glam::{vec3, Vec3};

use super::{build, pick_part, random::Seeded, PointCloud, Sampler};

pub const WIDTH: f32 = 44.0;
pub const HALF_DEPTH: f32 = 20.0;
pub const DEPTH: f32 = HALF_DEPTH * 2.0;

const PARTS: [f32; 2] = [0.9, 0.1];

/// Ground height at `(x, z)`.
pub fn height(x: f32, z: f32) -> f32 {
    let phase = z / DEPTH * TAU;
    let ridge = 2.6 * (phase + 1.3 * (x * 0.15).sin()).sin()
        + 1.2 * (phase * 3.0 + x * 0.4).sin()
        + 0.6 * (phase * 2.0 + x * 0.9).cos();
    // Valley down the middle, peaks toward the sides.
    let flank = 0.35 + (x.abs() / (WIDTH * 0.5)).powf(1.5) * 1.6;
    ridge.abs() * flank - 3.0
}

pub fn mountains(count: usize) -> PointCloud {
    let cols = (count as f32).sqrt().ceil().max(1.0) as usize;
    let rows = ((count + cols - 1) / cols).max(1);

    build(count, &mut Seeded, |i, s| {
        let (col, row) = (i % cols, i / cols);
        let x = ((col as f32 + 0.5) / cols as f32 - 0.5) * WIDTH;
        let z = (row as f32 + 0.5) / rows as f32 * DEPTH - HALF_DEPTH;
        let ground = height(x, z);
        let jitter = vec3(s.sample(i, 1) - 0.5, 0.0, s.sample(i, 2) - 0.5) * 0.25;

        let y = match pick_part(&PARTS, s.sample(i, 0)) {
            0 => ground + (s.sample(i, 3) - 0.5) * 0.2,
            _ => ground + 1.0 + s.sample(i, 3) * 2.0,
        };
        Vec3::new(x, y, z) + jitter
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_tiles_along_z() {
        for x in [-20.0, -3.5, 0.0, 7.25, 21.0] {
            for z in [-20.0, -4.0, 0.0, 13.0] {
                assert!((height(x, z) - height(x, z + DEPTH)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn mountains_stay_inside_the_tile() {
        let cloud = mountains(2500);
        for i in 0..cloud.count() {
            let p = cloud.point(i);
            assert!(p.z >= -HALF_DEPTH - 0.2 && p.z <= HALF_DEPTH + 0.2);
            assert!(p.x.abs() <= WIDTH * 0.5 + 0.2);
        }
    }
}
