//! Spacecraft silhouette. Uses true randomness; only the outline is fixed.

use glam::{vec2, vec3, Vec3};

use super::{build, cone, cylinder, outline, pick_part, random, PointCloud, Sampler};

// fuselage, nose, wings, engines, exhaust
const PARTS: [f32; 5] = [0.35, 0.15, 0.3, 0.12, 0.08];

const LENGTH: f32 = 9.0;
const BODY_RADIUS: f32 = 0.9;

pub fn spacecraft(count: usize) -> PointCloud {
    craft_with(count, &mut random::entropy())
}

/// Builds the craft with an explicit sampler; the nose points along `+X`.
pub fn craft_with<S: Sampler>(count: usize, sampler: &mut S) -> PointCloud {
    let wing = [vec2(1.5, 0.0), vec2(-2.5, 4.8), vec2(-3.6, 4.8), vec2(-3.2, 0.0)];

    build(count, sampler, |i, s| {
        let (u, v) = (s.sample(i, 1), s.sample(i, 2));
        let local = match pick_part(&PARTS, s.sample(i, 0)) {
            0 => cylinder(BODY_RADIUS, LENGTH, u, v),
            1 => cone(BODY_RADIUS, 2.4, u, v) + Vec3::Y * (LENGTH * 0.5 + 1.2),
            2 => {
                let side = if s.sample(i, 3) < 0.5 { -1.0 } else { 1.0 };
                let p = outline(&wing, true, u);
                // Fill the wing by pulling outline points toward its root.
                let p = p.lerp(vec2(-1.0, 0.0), v * v * 0.6);
                vec3(side * (BODY_RADIUS + p.y), p.x, (s.sample(i, 4) - 0.5) * 0.1)
            }
            3 => {
                let side = if s.sample(i, 3) < 0.5 { -1.0 } else { 1.0 };
                cylinder(0.45, 2.2, u, v) + vec3(side * 1.5, -LENGTH * 0.5 + 0.6, 0.0)
            }
            _ => {
                // Exhaust plume widening away from the body.
                let mut p = cone(0.7, 2.6, u, v);
                p.y = -p.y - LENGTH * 0.5 - 1.3;
                p
            }
        };
        // Lay the craft on its side, nose forward.
        vec3(local.y, local.z, -local.x)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::random::Seeded;

    #[test]
    fn craft_is_longer_than_it_is_tall() {
        let cloud = craft_with(4000, &mut Seeded);
        let (mut min, mut max) = (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for i in 0..cloud.count() {
            min = min.min(cloud.point(i));
            max = max.max(cloud.point(i));
        }
        let extent = max - min;
        assert!(extent.x > extent.y * 2.0, "{:?}", extent);
    }
}
