use std::f32::consts::TAU;

use glam::vec3;

use super::{build, fibonacci_sphere, pick_part, random, random::Seeded, PointCloud, Sampler};

// field, galaxy band, bright clusters
const PARTS: [f32; 3] = [0.6, 0.3, 0.1];

/// Deep star field: a spherical shell, a tilted galactic band and a few clusters.
pub fn stars(count: usize) -> PointCloud {
    build(count, &mut Seeded, |i, s| {
        let (u, v, w) = (s.sample(i, 1), s.sample(i, 2), s.sample(i, 3));
        match pick_part(&PARTS, s.sample(i, 0)) {
            0 => fibonacci_sphere(i, count) * (8.0 + w * 22.0),
            1 => {
                let a = u * TAU;
                let r = 6.0 + v * 14.0;
                let p = vec3(r * a.cos(), (w - 0.5) * 1.5, r * a.sin());
                // Tilt the band.
                vec3(p.x, p.y * 0.9 + p.z * 0.3, p.z * 0.9 - p.y * 0.3)
            }
            _ => {
                let centre = ((u * 4.0) as usize).min(3);
                let c = [vec3(-9., 4., -6.), vec3(7., -3., -10.), vec3(3., 8., 5.), vec3(-6., -7., 4.)];
                let dir = fibonacci_sphere(i % 64, 64);
                c[centre] + dir * v * v * 2.0
            }
        }
    })
}

/// Decorative dust drifting with the star field; layout is free to vary.
pub fn dust(count: usize) -> PointCloud {
    build(count, &mut random::entropy(), |i, s| {
        let a = s.sample(i, 0) * TAU;
        let y = s.sample(i, 1) * 2.0 - 1.0;
        let r = (1.0 - y * y).sqrt();
        vec3(r * a.cos(), y, r * a.sin()) * (4.0 + s.sample(i, 2) * 30.0)
    })
}
