//! Target point clouds.
//!
//! Every generator returns a [`PointCloud`] holding exactly `count` points
//! (`3 * count` floats). Generators split their particles into named parts by
//! drawing one fraction per particle and walking a table of cumulative weights;
//! the last part absorbs whatever the weights leave over, so no particle is
//! ever skipped.

use std::{f32::consts::TAU, ops::Deref};

use glam::{vec2, vec3, Vec2, Vec3};

pub mod craft;
pub mod glyphs;
pub mod logos;
pub mod random;
pub mod satellite;
pub mod sphere;
pub mod stars;
pub mod terrain;
pub mod text;

mod library;

pub use library::ShapeLibrary;

/// Flat `x, y, z` triples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud(Vec<f32>);

impl PointCloud {
    pub fn zeroed(count: usize) -> Self {
        Self(vec![0.0; count * 3])
    }

    pub fn count(&self) -> usize {
        self.0.len() / 3
    }

    pub fn point(&self, index: usize) -> Vec3 {
        let i = index * 3;
        vec3(self.0[i], self.0[i + 1], self.0[i + 2])
    }

    pub fn set_point(&mut self, index: usize, p: Vec3) {
        let i = index * 3;
        self.0[i] = p.x;
        self.0[i + 1] = p.y;
        self.0[i + 2] = p.z;
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }

    /// Copies `other` into this cloud starting at point `offset`.
    pub fn write_block(&mut self, offset: usize, other: &PointCloud) {
        let start = offset * 3;
        self.0[start..start + other.0.len()].copy_from_slice(&other.0);
    }

    #[cfg(test)]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl Deref for PointCloud {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for PointCloud {
    fn from(values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len() % 3, 0);
        Self(values)
    }
}

/// Per-particle fraction source.
///
/// `stream` separates independent draws for the same particle.
pub trait Sampler {
    fn sample(&mut self, index: usize, stream: u32) -> f32;
}

/// Picks the part a fraction `r` in `[0, 1)` falls into.
///
/// Weights need not sum to one; anything past the last cumulative threshold
/// belongs to the last part.
pub fn pick_part(weights: &[f32], r: f32) -> usize {
    let mut acc = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        if r < acc {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

/// Builds a cloud by asking `place` for each particle's position.
pub fn build<S, F>(count: usize, sampler: &mut S, mut place: F) -> PointCloud
where
    S: Sampler,
    F: FnMut(usize, &mut S) -> Vec3,
{
    let mut cloud = PointCloud::zeroed(count);
    for i in 0..count {
        let p = place(i, sampler);
        cloud.set_point(i, p);
    }
    cloud
}

/// Point `i` of `n` on a Fibonacci lattice over the unit sphere.
pub fn fibonacci_sphere(i: usize, n: usize) -> Vec3 {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    let n = n.max(1) as f32;
    let y = 1.0 - (i as f32 + 0.5) / n * 2.0;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden * i as f32;
    vec3(theta.cos() * r, y, theta.sin() * r)
}

/// Point on a torus lying in the XZ plane.
pub fn torus(major: f32, minor: f32, u: f32, v: f32) -> Vec3 {
    let (a, b) = (u * TAU, v * TAU);
    let ring = major + minor * b.cos();
    vec3(ring * a.cos(), minor * b.sin(), ring * a.sin())
}

/// Point on the side of a Y-aligned cylinder of the given height centered on the origin.
pub fn cylinder(radius: f32, height: f32, u: f32, v: f32) -> Vec3 {
    let a = u * TAU;
    vec3(radius * a.cos(), (v - 0.5) * height, radius * a.sin())
}

/// Point on a Y-aligned cone surface, apex at `+height / 2`.
pub fn cone(radius: f32, height: f32, u: f32, v: f32) -> Vec3 {
    let a = u * TAU;
    let r = radius * (1.0 - v);
    vec3(r * a.cos(), (v - 0.5) * height, r * a.sin())
}

/// Walks the outline of `points` by arc length, `t` in `[0, 1)`.
pub fn outline(points: &[Vec2], closed: bool, t: f32) -> Vec2 {
    match points {
        [] => Vec2::ZERO,
        [only] => *only,
        _ => {
            let segments = segments(points, closed);
            let total: f32 = segments.iter().map(|(a, b)| a.distance(*b)).sum();
            if total <= f32::EPSILON {
                return points[0];
            }
            let mut remaining = t.clamp(0.0, 1.0) * total;
            for (a, b) in &segments {
                let len = a.distance(*b);
                if remaining <= len {
                    return a.lerp(*b, if len > 0.0 { remaining / len } else { 0.0 });
                }
                remaining -= len;
            }
            segments.last().map(|(_, b)| *b).unwrap_or(points[0])
        }
    }
}

fn segments(points: &[Vec2], closed: bool) -> Vec<(Vec2, Vec2)> {
    let mut out: Vec<_> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            out.push((*last, *first));
        }
    }
    out
}

/// Regular polygon (or circle when `sides` is large) of `radius` around `center`.
pub fn regular_polygon(center: Vec2, radius: f32, sides: usize, phase: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|k| {
            let a = phase + k as f32 / sides as f32 * TAU;
            center + vec2(a.cos(), a.sin()) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_part_absorbs_the_remainder() {
        let weights = [0.2, 0.35, 0.1];
        assert_eq!(pick_part(&weights, 0.0), 0);
        assert_eq!(pick_part(&weights, 0.3), 1);
        assert_eq!(pick_part(&weights, 0.6), 2);
        assert_eq!(pick_part(&weights, 0.99), 2);
    }

    #[test]
    fn outline_hits_the_corners() {
        let square = [vec2(0., 0.), vec2(1., 0.), vec2(1., 1.), vec2(0., 1.)];
        assert!(outline(&square, true, 0.0).distance(vec2(0., 0.)) < 1e-5);
        assert!(outline(&square, true, 0.25).distance(vec2(1., 0.)) < 1e-5);
        assert!(outline(&square, true, 0.5).distance(vec2(1., 1.)) < 1e-5);
        assert!(outline(&square, false, 1.0).distance(vec2(0., 1.)) < 1e-5);
    }

    #[test]
    fn fibonacci_points_are_on_the_unit_sphere() {
        for i in 0..100 {
            let p = fibonacci_sphere(i, 100);
            assert!((p.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn write_block_places_points_at_offset() {
        let mut cloud = PointCloud::zeroed(4);
        let block = PointCloud::from(vec![1., 2., 3., 4., 5., 6.]);
        cloud.write_block(2, &block);
        assert_eq!(cloud.point(1), Vec3::ZERO);
        assert_eq!(cloud.point(2), vec3(1., 2., 3.));
        assert_eq!(cloud.point(3), vec3(4., 5., 6.));
    }
}
