//! Thematic icons, one per experience entry.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{vec2, vec3, Quat, Vec2, Vec3};

use super::{
    build, cylinder, fibonacci_sphere, outline, pick_part, random::Seeded, regular_polygon, torus,
    PointCloud, Sampler,
};

pub const ICON_COUNT: usize = 5;

pub fn icon(entity: usize, count: usize) -> PointCloud {
    match entity {
        0 => station(count),
        1 => atom(count),
        2 => gear(count),
        3 => chip(count),
        _ => brackets(count),
    }
}

// spine, rings, spokes, hub, modules
const STATION: [f32; 5] = [0.2, 0.35, 0.1, 0.15, 0.2];

fn station(count: usize) -> PointCloud {
    build(count, &mut Seeded, |i, s| {
        let (u, v, w) = (s.sample(i, 1), s.sample(i, 2), s.sample(i, 3));
        match pick_part(&STATION, s.sample(i, 0)) {
            0 => cylinder(0.25, 9.0, u, v),
            1 => {
                let y = if w < 0.5 { -2.0 } else { 2.0 };
                torus(3.6, 0.3, u, v) + Vec3::Y * y
            }
            2 => {
                let spoke = (w * 8.0).floor();
                let a = spoke / 8.0 * TAU;
                let y = if spoke as usize % 2 == 0 { -2.0 } else { 2.0 };
                vec3(a.cos() * u * 3.6, y, a.sin() * u * 3.6)
            }
            3 => fibonacci_sphere(i, count) * 1.1,
            _ => {
                let end = if w < 0.5 { -4.5 } else { 4.5 };
                cylinder(0.8, 1.4, u, v) + Vec3::Y * end
            }
        }
    })
}

fn atom(count: usize) -> PointCloud {
    let orbits = [
        Quat::from_rotation_x(FRAC_PI_2),
        Quat::from_rotation_x(FRAC_PI_2) * Quat::from_rotation_y(TAU / 3.0),
        Quat::from_rotation_z(TAU / 6.0) * Quat::from_rotation_x(1.1),
    ];
    build(count, &mut Seeded, |i, s| {
        let (u, v) = (s.sample(i, 1), s.sample(i, 2));
        match pick_part(&[0.2, 0.8], s.sample(i, 0)) {
            0 => fibonacci_sphere(i, count) * (0.6 + v * 0.6),
            _ => {
                let orbit = ((s.sample(i, 3) * 3.0) as usize).min(2);
                orbits[orbit] * torus(4.5, 0.08, u, v)
            }
        }
    })
}

// rim, teeth, hub
const GEAR: [f32; 3] = [0.5, 0.3, 0.2];

fn gear(count: usize) -> PointCloud {
    let teeth = 12;
    build(count, &mut Seeded, |i, s| {
        let (u, v, w) = (s.sample(i, 1), s.sample(i, 2), s.sample(i, 3));
        let flat = match pick_part(&GEAR, s.sample(i, 0)) {
            0 => {
                let a = u * TAU;
                vec2(a.cos(), a.sin()) * (2.6 + v * 1.0)
            }
            1 => {
                let tooth = (u * teeth as f32).floor();
                let a = (tooth + 0.5 + (v - 0.5) * 0.45) / teeth as f32 * TAU;
                vec2(a.cos(), a.sin()) * (3.6 + w * 0.9)
            }
            _ => outline(&regular_polygon(Vec2::ZERO, 1.0, 6, 0.0), true, u) * (0.6 + v * 0.4),
        };
        vec3(flat.x, flat.y, (w - 0.5) * 0.6)
    })
}

// plate, pins, core
const CHIP: [f32; 3] = [0.4, 0.4, 0.2];

fn chip(count: usize) -> PointCloud {
    build(count, &mut Seeded, |i, s| {
        let (u, v, w) = (s.sample(i, 1), s.sample(i, 2), s.sample(i, 3));
        match pick_part(&CHIP, s.sample(i, 0)) {
            0 => vec3((u - 0.5) * 6.0, (v - 0.5) * 6.0, 0.0),
            1 => {
                let side = ((w * 4.0) as usize).min(3);
                let pin = ((u * 7.0).floor() + 0.5) / 7.0 - 0.5;
                let along = 3.0 + v * 1.2;
                let p = match side {
                    0 => vec2(pin * 5.6, along),
                    1 => vec2(pin * 5.6, -along),
                    2 => vec2(along, pin * 5.6),
                    _ => vec2(-along, pin * 5.6),
                };
                vec3(p.x, p.y, 0.0)
            }
            _ => vec3((u - 0.5) * 2.4, (v - 0.5) * 2.4, 0.3 + w * 0.2),
        }
    })
}

fn brackets(count: usize) -> PointCloud {
    let left = [vec2(-2.0, 3.0), vec2(-5.0, 0.0), vec2(-2.0, -3.0)];
    let right = [vec2(2.0, 3.0), vec2(5.0, 0.0), vec2(2.0, -3.0)];
    let slash = [vec2(1.2, 3.6), vec2(-1.2, -3.6)];
    build(count, &mut Seeded, |i, s| {
        let (u, v, w) = (s.sample(i, 1), s.sample(i, 2), s.sample(i, 3));
        let p = match pick_part(&[0.37, 0.37, 0.26], s.sample(i, 0)) {
            0 => outline(&left, false, u),
            1 => outline(&right, false, u),
            _ => outline(&slash, false, u),
        };
        vec3(p.x + (v - 0.5) * 0.35, p.y + (w - 0.5) * 0.35, (v - w) * 0.3)
    })
}
