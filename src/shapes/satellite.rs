use glam::{vec3, Vec3};

use super::{build, pick_part, random::Seeded, torus, PointCloud, Sampler};

// body, panels, dish, antenna, orbit ring
const PARTS: [f32; 5] = [0.2, 0.4, 0.2, 0.1, 0.1];

/// Boxy bus with two solar wings, a dish, an antenna mast and an orbit ring.
pub fn satellite(count: usize) -> PointCloud {
    build(count, &mut Seeded, |i, s| {
        let (u, v, w) = (s.sample(i, 1), s.sample(i, 2), s.sample(i, 3));
        match pick_part(&PARTS, s.sample(i, 0)) {
            0 => box_surface(vec3(1.6, 1.6, 1.6), u, v, w),
            1 => {
                let side = if w < 0.5 { -1.0 } else { 1.0 };
                // Panels are split into cells by snapping to a grid.
                let cell_u = (u * 6.0).floor() / 6.0 + (u * 6.0).fract() * 0.9 / 6.0;
                vec3(side * (1.4 + cell_u * 4.2), (v - 0.5) * 1.8, 0.0)
            }
            2 => {
                let r = v.sqrt() * 1.3;
                let a = u * std::f32::consts::TAU;
                vec3(r * a.cos(), 1.2 + r * r * 0.35, r * a.sin())
            }
            3 => vec3(0.0, -0.8 - u * 2.6, 0.0) + (Vec3::new(v, 0.0, w) - 0.5) * 0.06,
            _ => torus(6.5, 0.05, u, v),
        }
    })
}

fn box_surface(size: Vec3, u: f32, v: f32, face: f32) -> Vec3 {
    let (a, b) = (u - 0.5, v - 0.5);
    let p = match (face * 6.0) as usize {
        0 => vec3(0.5, a, b),
        1 => vec3(-0.5, a, b),
        2 => vec3(a, 0.5, b),
        3 => vec3(a, -0.5, b),
        4 => vec3(a, b, 0.5),
        _ => vec3(a, b, -0.5),
    };
    p * size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satellite_is_deterministic() {
        let a = satellite(1000);
        let b = satellite(1000);
        assert_eq!(a, b);
    }
}
