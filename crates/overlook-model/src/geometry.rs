//! Geometry Types
//!
//! Vector math shared by the engine and the sandbox host. Vectors come from
//! `bevy_math`; this module adds the few helpers the engine needs on top.

use serde::{Deserialize, Serialize};

pub use bevy_math::{Vec2, Vec3};

/// Straight-line distance between two world points.
#[inline]
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Moves `from` by `step` units toward `to`.
///
/// Returns `from` unchanged when the two points coincide.
pub fn offset_toward(from: Vec3, to: Vec3, step: f32) -> Vec3 {
    let dir = (to - from).normalize_or_zero();
    from + dir * step
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered on `center` with the given half extents.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Check if a point lies inside or on the box.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Intersects the segment `from -> to` with the box (slab method).
    ///
    /// Returns the segment parameter `t` in `[0, 1]` of the first contact,
    /// or `None` when the segment misses.
    pub fn segment_hit(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let dir = to - from;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}
