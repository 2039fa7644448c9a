// Re-export glam for convenience
pub use glam::*;

// GLINT math types
mod aabb;
mod color;
mod intersect;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use color::{linear_to_srgb, Color, Rgba};
pub use intersect::{
    intersect_ray_sphere, intersect_ray_sphere_robust, SphereHit, SPHERE_EPSILON,
};
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_reexport() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }
}
