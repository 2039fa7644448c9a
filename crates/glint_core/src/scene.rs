//! Scene graph for particle scenes.
//!
//! A scene is a set of sphere geometries bound to a device. Geometry is
//! deliberately flat: positions, radii, and colors per sphere, with an
//! optional silhouette outline per geometry. Traversal is a linear scan
//! behind a per-sphere bounding-box test; acceleration structures live in
//! backend land, not here.

use glam::Vec3;
use glint_math::{intersect_ray_sphere_robust, Aabb, Color, Interval, Ray};
use log::debug;

use crate::device::Device;

/// One sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Color,
}

/// Record of the nearest accepted ray-scene intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Parametric hit distance along the ray
    pub t: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit, flipped to oppose the ray
    pub normal: Vec3,
    /// Shading color of the primitive (outline color inside the outline)
    pub color: Color,
    /// Distance of the hit from the silhouette edge in the view plane
    pub d_edge: f32,
}

/// A list of spheres sharing outline settings.
///
/// Spheres with a zero or non-finite radius get an empty bounding box and
/// are skipped by every ray test.
pub struct SphereGeometry {
    spheres: Vec<Sphere>,
    bounds: Vec<Aabb>,
    outline_width: f32,
    outline_color: Color,
}

impl SphereGeometry {
    /// Create an empty geometry.
    pub fn new() -> Self {
        Self {
            spheres: Vec::new(),
            bounds: Vec::new(),
            outline_width: 0.0,
            outline_color: Color::ZERO,
        }
    }

    /// Add a sphere.
    pub fn push(&mut self, center: Vec3, radius: f32, color: Color) {
        self.bounds.push(Aabb::from_sphere(center, radius));
        self.spheres.push(Sphere {
            center,
            radius,
            color,
        });
    }

    /// Configure the silhouette outline: hits closer than `width` to the
    /// silhouette edge shade with `color` instead of the sphere color.
    pub fn set_outline(&mut self, width: f32, color: Color) {
        self.outline_width = width;
        self.outline_color = color;
    }

    /// Number of spheres, degenerate ones included.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// True when the geometry holds no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Union of the member bounding boxes.
    pub fn bounds(&self) -> Aabb {
        self.bounds
            .iter()
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, b))
    }

    /// Nearest accepted hit within `ray_t`, if any.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut nearest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for (sphere, bbox) in self.spheres.iter().zip(&self.bounds) {
            // degenerate radii have empty boxes and never pass this test
            if !bbox.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                continue;
            }

            let Some(hit) =
                intersect_ray_sphere_robust(ray.origin, ray.direction, sphere.center, sphere.radius)
            else {
                continue;
            };
            if !Interval::new(ray_t.min, closest_so_far).surrounds(hit.t) {
                continue;
            }

            let point = ray.at(hit.t);
            let outward = (point - sphere.center) / sphere.radius;
            let normal = if ray.direction.dot(outward) < 0.0 {
                outward
            } else {
                -outward
            };
            let color = if hit.d_edge < self.outline_width {
                self.outline_color
            } else {
                sphere.color
            };

            closest_so_far = hit.t;
            nearest = Some(HitRecord {
                t: hit.t,
                point,
                normal,
                color,
                d_edge: hit.d_edge,
            });
        }

        nearest
    }
}

impl Default for SphereGeometry {
    fn default() -> Self {
        Self::new()
    }
}

/// A device-bound scene: geometries plus background.
pub struct Scene {
    device: Device,
    geometries: Vec<SphereGeometry>,
    background_color: Color,
    background_alpha: f32,
}

impl Scene {
    /// Create an empty scene bound to `device`.
    pub fn new(device: &Device) -> Self {
        debug!("create scene");
        Self {
            device: device.clone(),
            geometries: Vec::new(),
            background_color: Color::ZERO,
            background_alpha: 0.0,
        }
    }

    /// The device this scene is bound to.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Attach a geometry, returning its index.
    pub fn attach(&mut self, geometry: SphereGeometry) -> usize {
        debug!("attach geometry with {} spheres", geometry.len());
        self.geometries.push(geometry);
        self.geometries.len() - 1
    }

    /// Background color seen by rays that leave the scene. Also acts as the
    /// environment light for path samples.
    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// Coverage alpha written for primary rays that miss everything.
    pub fn set_background_alpha(&mut self, alpha: f32) {
        self.background_alpha = alpha;
    }

    pub fn background_alpha(&self) -> f32 {
        self.background_alpha
    }

    /// Nearest accepted hit across all geometries.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut nearest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for geometry in &self.geometries {
            if let Some(hit) = geometry.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = hit.t;
                nearest = Some(hit);
            }
        }

        nearest
    }

    /// Union of all geometry bounds.
    pub fn bounds(&self) -> Aabb {
        self.geometries
            .iter()
            .fold(Aabb::EMPTY, |acc, g| Aabb::surrounding(&acc, &g.bounds()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z)
    }

    fn full_range() -> Interval {
        Interval::new(1e-3, f32::INFINITY)
    }

    #[test]
    fn test_geometry_nearest_hit() {
        let mut geometry = SphereGeometry::new();
        geometry.push(Vec3::new(0.0, 0.0, -3.0), 1.0, Color::new(0.0, 1.0, 0.0));
        geometry.push(Vec3::ZERO, 1.0, Color::new(1.0, 0.0, 0.0));

        let hit = geometry.hit(&test_ray(), full_range()).expect("must hit");

        // the nearer sphere (at the origin) wins
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert_eq!(hit.color, Color::new(1.0, 0.0, 0.0));
        // normal opposes the ray
        assert!(hit.normal.dot(Vec3::NEG_Z) < 0.0);
    }

    #[test]
    fn test_degenerate_spheres_are_skipped() {
        let mut geometry = SphereGeometry::new();
        geometry.push(Vec3::ZERO, 0.0, Color::ONE);
        geometry.push(Vec3::ZERO, f32::NAN, Color::ONE);
        geometry.push(Vec3::ZERO, -2.0, Color::ONE);

        assert_eq!(geometry.len(), 3);
        assert!(geometry.hit(&test_ray(), full_range()).is_none());
        assert!(geometry.bounds().is_empty());
    }

    #[test]
    fn test_outline_color_near_silhouette() {
        let mut geometry = SphereGeometry::new();
        geometry.push(Vec3::ZERO, 1.0, Color::new(1.0, 0.0, 0.0));
        geometry.set_outline(0.2, Color::new(0.0, 0.0, 0.0));

        // straight through the center: body color
        let hit = geometry.hit(&test_ray(), full_range()).unwrap();
        assert_eq!(hit.color, Color::new(1.0, 0.0, 0.0));

        // close to the silhouette: outline color
        let graze = Ray::new(Vec3::new(0.95, 0.0, 5.0), Vec3::NEG_Z);
        let hit = geometry.hit(&graze, full_range()).unwrap();
        assert!(hit.d_edge < 0.2);
        assert_eq!(hit.color, Color::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_interior_origin_normal_opposes_ray() {
        let mut geometry = SphereGeometry::new();
        geometry.push(Vec3::ZERO, 1.0, Color::ONE);

        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = geometry.hit(&ray, full_range()).expect("interior hit");
        assert!((hit.t - 1.0).abs() < 1e-4);
        assert!(hit.normal.dot(ray.direction) < 0.0);
    }

    #[test]
    fn test_scene_hit_across_geometries() {
        let device = Device::new();
        let mut scene = Scene::new(&device);

        let mut far = SphereGeometry::new();
        far.push(Vec3::new(0.0, 0.0, -5.0), 1.0, Color::new(0.0, 0.0, 1.0));
        let mut near = SphereGeometry::new();
        near.push(Vec3::ZERO, 1.0, Color::new(1.0, 0.0, 0.0));

        scene.attach(far);
        scene.attach(near);

        let hit = scene.hit(&test_ray(), full_range()).expect("must hit");
        assert_eq!(hit.color, Color::new(1.0, 0.0, 0.0));

        assert!(scene.device().is_same(&device));
    }

    #[test]
    fn test_scene_bounds_union() {
        let device = Device::new();
        let mut scene = Scene::new(&device);
        assert!(scene.bounds().is_empty());

        let mut geometry = SphereGeometry::new();
        geometry.push(Vec3::new(-2.0, 0.0, 0.0), 1.0, Color::ONE);
        geometry.push(Vec3::new(3.0, 0.0, 0.0), 1.0, Color::ONE);
        scene.attach(geometry);

        let bounds = scene.bounds();
        assert_eq!(bounds.x.min, -3.0);
        assert_eq!(bounds.x.max, 4.0);
    }
}
