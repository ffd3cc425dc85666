//! Small geometry helpers shared across the simulation.

use bevy::prelude::*;

/// The frame rate the original tuning constants were authored against.
/// Per-frame easing factors and decay multipliers are converted through this
/// so behavior is independent of the actual frame rate.
pub const REFERENCE_FPS: f32 = 60.0;

/// Axis-aligned overlap test for two centered rects.
pub fn aabb_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    (pos_a.x - pos_b.x).abs() * 2.0 < size_a.x + size_b.x
        && (pos_a.y - pos_b.y).abs() * 2.0 < size_a.y + size_b.y
}

/// Linear interpolation between `start` and `end`.
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start * (1.0 - t) + end * t
}

/// Ease `current` toward `target` by a per-frame factor, frame-rate
/// independent. At exactly 60fps one call advances by `rate`.
pub fn ease_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = 1.0 - (1.0 - rate).powf(dt * REFERENCE_FPS);
    lerp(current, target, t)
}

/// A per-frame decay multiplier (friction, shake falloff) converted to the
/// elapsed time step.
pub fn frame_decay(factor: f32, dt: f32) -> f32 {
    factor.powf(dt * REFERENCE_FPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_rects_collide() {
        assert!(aabb_overlap(
            Vec2::ZERO,
            Vec2::splat(64.0),
            Vec2::new(40.0, 40.0),
            Vec2::splat(48.0),
        ));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        // Exactly adjacent rects share an edge but do not overlap.
        assert!(!aabb_overlap(
            Vec2::ZERO,
            Vec2::splat(64.0),
            Vec2::new(64.0, 0.0),
            Vec2::splat(64.0),
        ));
    }

    #[test]
    fn disjoint_rects_do_not_collide() {
        assert!(!aabb_overlap(
            Vec2::ZERO,
            Vec2::splat(8.0),
            Vec2::new(100.0, 0.0),
            Vec2::splat(8.0),
        ));
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn ease_matches_per_frame_factor_at_reference_rate() {
        let stepped = ease_toward(0.0, 100.0, 0.2, 1.0 / REFERENCE_FPS);
        assert!((stepped - 20.0).abs() < 1e-3);
    }

    #[test]
    fn frame_decay_matches_factor_at_reference_rate() {
        let decayed = frame_decay(0.9, 1.0 / REFERENCE_FPS);
        assert!((decayed - 0.9).abs() < 1e-5);
    }
}
