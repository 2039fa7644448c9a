//! Ray-sphere intersection.
//!
//! Pure, stateless routines shared by every traversal and shading path.
//! The math assumes a normalized ray direction; callers guarantee it.

use glam::Vec3;

/// Minimum accepted hit distance, in scene units.
///
/// Roots at or below this value are treated as self-intersections caused by
/// floating-point error at the ray origin and rejected.
pub const SPHERE_EPSILON: f32 = 1e-4;

/// Coarse roots larger than this multiple of the radius get a local re-solve.
const REFINE_THRESHOLD: f32 = 10.0;

/// A successful ray-sphere intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    /// Parametric hit distance along the ray
    pub t: f32,
    /// Distance of the hit from the sphere's silhouette edge, projected
    /// into the plane that has the ray as its normal. Used downstream for
    /// edge anti-aliasing and outlining.
    pub d_edge: f32,
}

/// Intersect a ray with a sphere.
///
/// Solves the quadratic `t^2 - 2 b t + (|v|^2 - r^2) = 0` in closed form
/// and accepts the smallest root strictly greater than [`SPHERE_EPSILON`].
/// The far root covers the case of a ray starting inside the sphere. Returns
/// `None` when the discriminant is negative or both roots sit behind the
/// origin.
///
/// Degenerate spheres (zero or non-finite radius) are the traversal layer's
/// concern: it culls them through [`crate::Aabb::from_sphere`], which is
/// empty for such radii.
pub fn intersect_ray_sphere(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<SphereHit> {
    // vector from ray origin to sphere center
    let v = center - origin;

    let b = v.dot(direction);
    let det = b * b - v.dot(v) + radius * radius;

    // no solution when the discriminant is negative
    if det < 0.0 {
        return None;
    }

    // distance of the hit from the silhouette edge in the viewing plane
    // (assumes a unit direction); meaningful only when a hit is reported
    let d_edge = radius - v.cross(direction).length();

    let sdet = det.sqrt();

    // near root
    let t = b - sdet;
    if t > SPHERE_EPSILON {
        return Some(SphereHit { t, d_edge });
    }

    // far root (origin is inside the sphere)
    let t = b + sdet;
    if t > SPHERE_EPSILON {
        return Some(SphereHit { t, d_edge });
    }

    // both intersections are behind the origin
    None
}

/// Intersect a ray with a sphere, refining numerically ill-conditioned hits.
///
/// When the ray origin is far from the sphere relative to its radius, the
/// quadratic above loses precision: `b*b` and `dot(v, v)` are huge and
/// nearly equal, so their difference carries few significant bits. Once the
/// coarse root exceeds [`REFINE_THRESHOLD`] times the radius, the quadratic
/// is re-derived from an origin translated to the coarse hit point and
/// solved there, where it is well conditioned. The refined root is the
/// coarse root plus the local correction, accepted under the same epsilon
/// rule as the naive solve.
///
/// For well-conditioned input (origin within the threshold) this returns
/// the naive result unchanged.
pub fn intersect_ray_sphere_robust(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<SphereHit> {
    let coarse = intersect_ray_sphere(origin, direction, center, radius)?;
    if coarse.t.abs() <= REFINE_THRESHOLD * radius {
        return Some(coarse);
    }

    // local re-solve from the estimated hit point
    let local_origin = origin + coarse.t * direction;
    let v = center - local_origin;
    let b = v.dot(direction);
    let det = b * b - v.dot(v) + radius * radius;
    if det < 0.0 {
        return None;
    }
    let d_edge = radius - v.cross(direction).length();
    let sdet = det.sqrt();

    // the local correction may be negative or zero; the epsilon guard
    // applies to the summed root, not the correction
    let t = coarse.t + (b - sdet);
    if t > SPHERE_EPSILON {
        return Some(SphereHit { t, d_edge });
    }
    let t = coarse.t + (b + sdet);
    if t > SPHERE_EPSILON {
        return Some(SphereHit { t, d_edge });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Vec3 = Vec3::ZERO;
    const RADIUS: f32 = 1.0;

    #[test]
    fn test_head_on_hit_distance() {
        // Origin outside, pointing straight at the center: the near root is
        // distance(origin, center) - radius
        let origin = Vec3::new(0.0, 0.0, 5.0);
        let hit = intersect_ray_sphere(origin, Vec3::NEG_Z, CENTER, RADIUS)
            .expect("head-on ray must hit");

        assert!((hit.t - 4.0).abs() < 1e-5);
        // dead center: the hit is a full radius away from the silhouette
        assert!((hit.d_edge - RADIUS).abs() < 1e-5);
    }

    #[test]
    fn test_closest_approach_beyond_radius_misses() {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        let center = Vec3::new(3.0, 0.0, 0.0);
        assert!(intersect_ray_sphere(origin, Vec3::NEG_Z, center, RADIUS).is_none());
    }

    #[test]
    fn test_origin_inside_uses_far_root() {
        let origin = Vec3::new(0.25, 0.0, 0.0);
        let hit = intersect_ray_sphere(origin, Vec3::X, CENTER, RADIUS)
            .expect("interior origin must hit");

        // far root: from x=0.25 out through x=1
        assert!((hit.t - 0.75).abs() < 1e-5);
        // the near root would have been negative
        assert!(hit.t > 0.0);
    }

    #[test]
    fn test_sphere_behind_origin_misses() {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        // pointing away from the sphere: both roots negative
        assert!(intersect_ray_sphere(origin, Vec3::Z, CENTER, RADIUS).is_none());
    }

    #[test]
    fn test_roots_below_epsilon_rejected() {
        // Origin on the surface, pointing radially away: the near root is
        // behind the ray and the far root sits at zero, under the epsilon
        let origin = Vec3::new(0.0, 0.0, 1.0);
        let hit = intersect_ray_sphere(origin, Vec3::Z, CENTER, RADIUS);
        assert!(hit.is_none());
    }

    #[test]
    fn test_silhouette_edge_distance() {
        // Graze the sphere at its silhouette: t exists, d_edge ~ 0
        let origin = Vec3::new(1.0, 0.0, 5.0);
        let hit = intersect_ray_sphere(origin, Vec3::NEG_Z, CENTER, RADIUS)
            .expect("tangent ray reports a hit");
        assert!(hit.d_edge.abs() < 1e-3);

        // halfway to the edge: 0 < d_edge < radius
        let origin = Vec3::new(0.5, 0.0, 5.0);
        let hit = intersect_ray_sphere(origin, Vec3::NEG_Z, CENTER, RADIUS).unwrap();
        assert!((hit.d_edge - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_robust_matches_naive_when_well_conditioned() {
        let rays = [
            (Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z),
            (Vec3::new(0.3, -0.2, 4.0), Vec3::NEG_Z),
            (Vec3::new(0.25, 0.0, 0.0), Vec3::X),
            (Vec3::new(0.0, 0.0, 5.0), Vec3::Z),
            (Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z),
        ];

        for (origin, direction) in rays {
            let naive = intersect_ray_sphere(origin, direction, CENTER, RADIUS);
            let robust = intersect_ray_sphere_robust(origin, direction, CENTER, RADIUS);

            match (naive, robust) {
                (Some(n), Some(r)) => assert!(
                    (n.t - r.t).abs() < 1e-3,
                    "t diverged for origin {origin:?}: {} vs {}",
                    n.t,
                    r.t
                ),
                (None, None) => {}
                other => panic!("hit classification diverged for {origin:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_robust_refines_far_origin() {
        // Origin 20000 units out: the coarse root magnitude is far beyond
        // 10x radius, so the local re-solve engages
        let origin = Vec3::new(0.0, 0.0, 2.0e4);
        let hit = intersect_ray_sphere_robust(origin, Vec3::NEG_Z, CENTER, RADIUS)
            .expect("distant head-on ray must still hit");

        assert!((hit.t - (2.0e4 - 1.0)).abs() < 0.5);
        // the refined edge distance is computed in the local frame
        assert!((hit.d_edge - RADIUS).abs() < 1e-3);
    }

    #[test]
    fn test_robust_far_miss_stays_a_miss() {
        let origin = Vec3::new(5.0, 0.0, 2.0e4);
        assert!(intersect_ray_sphere_robust(origin, Vec3::NEG_Z, CENTER, RADIUS).is_none());
    }
}
