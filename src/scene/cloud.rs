//! Per-frame point-cloud operations.

use glam::vec3;

use crate::shapes::{PointCloud, Sampler};

/// Fraction of the remaining distance covered each frame.
pub const EASING: f32 = 0.02;

pub const FALL_GROUPS: usize = 10;
const FALL_FLOOR: f32 = -12.0;
const RISE_DEPTH: f32 = 14.0;
const GROUP_DEPTH: f32 = 2.5;

/// First-order smoothing of `current` toward `target`.
pub fn ease(current: &mut [f32], target: &[f32], factor: f32) {
    for (c, t) in current.iter_mut().zip(target) {
        *c += (t - *c) * factor;
    }
}

/// Wraps `z` into `[-bound, bound)`.
pub fn wrap(z: f32, bound: f32) -> f32 {
    let w = (z + bound).rem_euclid(bound * 2.0) - bound;
    // rem_euclid can round up to the full period for inputs just below -bound.
    if w >= bound {
        -bound
    } else {
        w
    }
}

/// Advances a treadmill offset, folding it back by `2 * bound` once it passes `bound`.
pub fn advance_scroll(offset: f32, speed: f32, bound: f32) -> f32 {
    let next = offset + speed;
    if next > bound {
        next - bound * 2.0
    } else {
        next
    }
}

/// Overwrites every z in `current` with the scrolled, wrapped z of `base`.
pub fn treadmill(current: &mut [f32], base: &[f32], offset: f32, bound: f32) {
    for (c, b) in current.chunks_exact_mut(3).zip(base.chunks_exact(3)) {
        c[2] = wrap(b[2] + offset, bound);
    }
}

fn group<S: Sampler>(sampler: &mut S, index: usize) -> f32 {
    ((sampler.sample(index, 0) * FALL_GROUPS as f32) as usize).min(FALL_GROUPS - 1) as f32
}

/// Drop targets keeping each particle's x/z; deeper groups fall further.
pub fn fall_targets<S: Sampler>(current: &PointCloud, sampler: &mut S) -> PointCloud {
    let mut out = PointCloud::zeroed(current.count());
    for i in 0..current.count() {
        let p = current.point(i);
        let g = group(sampler, i);
        out.set_point(i, vec3(p.x, FALL_FLOOR - g * GROUP_DEPTH, p.z));
    }
    out
}

/// Starting positions below `target`, staggered by group, for particles to climb from.
pub fn rise_from_below<S: Sampler>(target: &PointCloud, sampler: &mut S) -> PointCloud {
    let mut out = PointCloud::zeroed(target.count());
    for i in 0..target.count() {
        let p = target.point(i);
        let g = group(sampler, i);
        out.set_point(i, vec3(p.x, p.y - RISE_DEPTH - g * GROUP_DEPTH, p.z));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::random::Seeded;

    fn distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
    }

    #[test]
    fn easing_is_a_contraction() {
        let target = vec![1.0, -2.0, 3.5, 100.0, 0.0, -7.0];
        let mut current = vec![0.0, 0.0, 0.0, -50.0, 4.0, 2.0];
        let mut last = distance(&current, &target);
        for _ in 0..200 {
            ease(&mut current, &target, EASING);
            let d = distance(&current, &target);
            assert!(d < last);
            last = d;
        }
    }

    #[test]
    fn easing_moves_a_fixed_fraction() {
        let mut current = vec![0.0, 10.0, -10.0];
        ease(&mut current, &[10.0, 10.0, 0.0], 0.5);
        assert_eq!(current, vec![5.0, 10.0, -5.0]);
    }

    #[test]
    fn scroll_wraps_by_twice_the_bound() {
        let bound = 20.0;
        let before = 19.98;
        let after = advance_scroll(before, 0.05, bound);
        assert!((after - (before + 0.05 - 2.0 * bound)).abs() < 1e-4);
        assert!(after >= -bound && after < bound);
        // Below the bound nothing folds.
        assert!((advance_scroll(3.0, 0.05, bound) - 3.05).abs() < 1e-6);
    }

    #[test]
    fn treadmill_keeps_relative_spacing_across_the_wrap() {
        let bound = 20.0;
        let base = [0.0, 0.0, 10.0, 0.0, 0.0, 10.5];
        let mut current = [0.0; 6];
        let spacing = |c: &[f32]| wrap(c[5] - c[2], bound);

        for offset in [0.0, 9.0, 9.6, 9.9, 10.2, 19.99, -20.0, -5.0] {
            treadmill(&mut current, &base, offset, bound);
            assert!((spacing(&current) - 0.5).abs() < 1e-4, "offset {}", offset);
            assert!(current[2] >= -bound && current[2] < bound);
        }
    }

    #[test]
    fn wrap_stays_half_open_just_below_the_lower_bound() {
        let bound = 20.0f32;
        let just_below = f32::from_bits((-bound).to_bits() + 1);
        for z in [just_below, -bound, bound, -3.0 * bound - 1e-6, 59.999_996, 1e-9] {
            let w = wrap(z, bound);
            assert!(w >= -bound && w < bound, "{} -> {}", z, w);
        }
        assert_eq!(wrap(bound, bound), -bound);
    }

    #[test]
    fn fall_and_rise_are_staggered_by_group() {
        let mut shape = PointCloud::zeroed(500);
        for i in 0..500 {
            shape.set_point(i, vec3(i as f32, 1.0, -(i as f32)));
        }
        let fall = fall_targets(&shape, &mut Seeded);
        let rise = rise_from_below(&shape, &mut Seeded);
        let mut depths: Vec<i32> = Vec::new();
        for i in 0..500 {
            let (f, r, s) = (fall.point(i), rise.point(i), shape.point(i));
            assert_eq!((f.x, f.z), (s.x, s.z));
            assert_eq!((r.x, r.z), (s.x, s.z));
            assert!(f.y <= FALL_FLOOR && r.y < s.y);
            depths.push((f.y * 10.0).round() as i32);
        }
        depths.sort_unstable();
        depths.dedup();
        assert_eq!(depths.len(), FALL_GROUPS);
    }
}
