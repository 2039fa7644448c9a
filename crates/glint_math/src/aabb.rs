use crate::{Interval, Ray};
use glam::Vec3;

/// Axis-aligned bounding box used to cull primitives during traversal.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D
/// volume. The empty box fails every ray test, which is how degenerate
/// primitives are kept out of traversal without a separate validity flag.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Bounding box of a sphere: `[center - radius, center + radius]`.
    ///
    /// A sphere with zero, negative, infinite, or NaN radius has no valid
    /// bounds and yields [`Aabb::EMPTY`].
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        if !radius.is_finite() || radius <= 0.0 {
            return Self::EMPTY;
        }
        let rvec = Vec3::splat(radius);
        Self::from_points(center - rvec, center + rvec)
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// True when the box bounds nothing.
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method - efficient ray-box intersection test. The
    /// empty box fails for every ray.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let (slab, origin, dir) = match axis {
                0 => (self.x, r.origin.x, r.direction.x),
                1 => (self.y, r.origin.y, r.direction.y),
                _ => (self.z, r.origin.z, r.direction.z),
            };

            let adinv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// A box that bounds nothing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
