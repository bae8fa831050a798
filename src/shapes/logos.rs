//! Social brand marks and the stacked composite of all of them.

use std::ops::Range;

use glam::{vec2, vec3, Vec2};

use super::{build, outline, pick_part, random::Seeded, regular_polygon, PointCloud, Sampler};

pub const BRAND_COUNT: usize = 5;

/// Vertical placement of each brand in the composite.
const STACK_OFFSETS: [f32; BRAND_COUNT] = [8.0, 4.0, 0.0, -4.0, -8.0];
const STACK_SCALE: f32 = 0.42;

pub fn brand(index: usize, count: usize) -> PointCloud {
    match index {
        0 => github(count),
        1 => linkedin(count),
        2 => x_mark(count),
        3 => mail(count),
        _ => instagram(count),
    }
}

/// Particle ranges owned by each brand in [`all_logos`].
///
/// The first four get `count / 5` each; the last absorbs the remainder.
pub fn stack_blocks(count: usize) -> [Range<usize>; BRAND_COUNT] {
    let block = count / BRAND_COUNT;
    let mut ranges: [Range<usize>; BRAND_COUNT] = Default::default();
    for (k, range) in ranges.iter_mut().enumerate() {
        let start = k * block;
        let end = if k == BRAND_COUNT - 1 { count } else { start + block };
        *range = start..end;
    }
    ranges
}

pub fn all_logos(count: usize) -> PointCloud {
    let mut cloud = PointCloud::zeroed(count);
    for (k, range) in stack_blocks(count).into_iter().enumerate() {
        let mut part = brand(k, range.len());
        for i in 0..part.count() {
            let p = part.point(i) * STACK_SCALE + glam::Vec3::Y * STACK_OFFSETS[k];
            part.set_point(i, p);
        }
        cloud.write_block(range.start, &part);
    }
    cloud
}

/// Scatters `count` particles over weighted outlines in the XY plane.
fn strokes(count: usize, outlines: &[(Vec<Vec2>, bool)], weights: &[f32], thickness: f32) -> PointCloud {
    build(count, &mut Seeded, |i, s| {
        let (path, closed) = &outlines[pick_part(weights, s.sample(i, 0)).min(outlines.len() - 1)];
        let p = outline(path, *closed, s.sample(i, 1));
        let jitter = vec2(s.sample(i, 2) - 0.5, s.sample(i, 3) - 0.5) * thickness;
        vec3(p.x + jitter.x, p.y + jitter.y, (s.sample(i, 4) - 0.5) * 0.2)
    })
}

fn github(count: usize) -> PointCloud {
    let head = vec![
        vec2(-2.2, -1.6),
        vec2(-2.6, 0.6),
        vec2(-2.3, 2.8),
        vec2(-1.1, 1.9),
        vec2(1.1, 1.9),
        vec2(2.3, 2.8),
        vec2(2.6, 0.6),
        vec2(2.2, -1.6),
        vec2(0.8, -2.4),
        vec2(0.8, -4.0),
        vec2(-0.8, -4.0),
        vec2(-0.8, -2.4),
    ];
    strokes(
        count,
        &[(regular_polygon(Vec2::ZERO, 4.6, 48, 0.0), true), (head, true)],
        &[0.5, 0.5],
        0.3,
    )
}

fn linkedin(count: usize) -> PointCloud {
    let frame = rounded_square(4.5, 0.9);
    let i_stem = vec![vec2(-2.2, -2.6), vec2(-2.2, 0.9)];
    let i_dot = regular_polygon(vec2(-2.2, 2.2), 0.35, 10, 0.0);
    let n = vec![vec2(-0.6, -2.6), vec2(-0.6, 0.9), vec2(1.6, 0.9), vec2(2.2, 0.2), vec2(2.2, -2.6)];
    strokes(
        count,
        &[(frame, true), (i_stem, false), (i_dot, true), (n, false)],
        &[0.5, 0.12, 0.06, 0.32],
        0.35,
    )
}

fn x_mark(count: usize) -> PointCloud {
    strokes(
        count,
        &[
            (vec![vec2(-3.5, 4.0), vec2(3.5, -4.0)], false),
            (vec![vec2(-3.5, -4.0), vec2(3.5, 4.0)], false),
        ],
        &[0.55, 0.45],
        0.5,
    )
}

fn mail(count: usize) -> PointCloud {
    let envelope = vec![vec2(-4.5, -3.0), vec2(4.5, -3.0), vec2(4.5, 3.0), vec2(-4.5, 3.0)];
    let flap = vec![vec2(-4.5, 3.0), vec2(0.0, -0.4), vec2(4.5, 3.0)];
    strokes(count, &[(envelope, true), (flap, false)], &[0.65, 0.35], 0.3)
}

fn instagram(count: usize) -> PointCloud {
    strokes(
        count,
        &[
            (rounded_square(4.5, 1.5), true),
            (regular_polygon(Vec2::ZERO, 2.0, 40, 0.0), true),
            (regular_polygon(vec2(2.6, 2.6), 0.3, 8, 0.0), true),
        ],
        &[0.55, 0.38, 0.07],
        0.3,
    )
}

fn rounded_square(half: f32, radius: f32) -> Vec<Vec2> {
    let inner = half - radius;
    let corners = [vec2(inner, inner), vec2(-inner, inner), vec2(-inner, -inner), vec2(inner, -inner)];
    corners
        .iter()
        .enumerate()
        .flat_map(|(k, c)| {
            let start = k as f32 * std::f32::consts::FRAC_PI_2;
            (0..=6).map(move |j| {
                let a = start + j as f32 / 6.0 * std::f32::consts::FRAC_PI_2;
                *c + vec2(a.cos(), a.sin()) * radius
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_blocks_cover_every_particle_once() {
        for count in [0, 1, 4, 5, 9, 1001, 6000] {
            let blocks = stack_blocks(count);
            let mut next = 0;
            for b in &blocks {
                assert_eq!(b.start, next);
                next = b.end;
            }
            assert_eq!(next, count);
            assert_eq!(blocks[4].len(), count - 4 * (count / 5));
        }
    }

    #[test]
    fn composite_blocks_sit_at_their_offsets() {
        let count = 5003;
        let cloud = all_logos(count);
        for (k, range) in stack_blocks(count).into_iter().enumerate() {
            let mean_y: f32 =
                range.clone().map(|i| cloud.point(i).y).sum::<f32>() / range.len() as f32;
            assert!((mean_y - STACK_OFFSETS[k]).abs() < 1.0, "brand {} mean {}", k, mean_y);
        }
    }
}
