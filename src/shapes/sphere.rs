use super::{build, fibonacci_sphere, pick_part, random::Seeded, torus, PointCloud, Sampler};

pub const RADIUS: f32 = 5.0;

const PARTS: [f32; 2] = [0.82, 0.18];

/// Fibonacci-lattice shell with a thin equatorial ring.
pub fn sphere(count: usize) -> PointCloud {
    build(count, &mut Seeded, |i, s| match pick_part(&PARTS, s.sample(i, 0)) {
        0 => fibonacci_sphere(i, count) * (RADIUS + (s.sample(i, 1) - 0.5) * 0.15),
        _ => torus(RADIUS * 1.45, 0.12, s.sample(i, 1), s.sample(i, 2)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_points_hug_the_radius() {
        let cloud = sphere(3000);
        let on_shell = (0..cloud.count())
            .filter(|&i| (cloud.point(i).length() - RADIUS).abs() < 0.1)
            .count();
        assert!(on_shell > 3000 * 7 / 10);
    }
}
