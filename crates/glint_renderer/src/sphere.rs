//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use glint_math::{Interval, Point3, Ray};
use std::sync::Arc;

/// A sphere primitive.
///
/// Materials are shared: many spheres may hold the same `Arc`.
pub struct Sphere {
    center: Point3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Point3, radius: f32, material: Arc<dyn Material>) -> Self {
        if radius < 0.0 {
            log::warn!("Sphere at {} has negative radius {}, clamping to 0", center, radius);
        }

        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Half-b form of the quadratic |O + tD - C|^2 = r^2
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, self.material.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{gen_range_f32, random_unit_vector};
    use crate::Lambertian;
    use glint_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, forward()).expect("ray should hit the sphere");

        assert!((rec.t - 0.5).abs() < 1e-6);
        assert!((rec.p - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);
        assert!((rec.normal - Vec3::Z).length() < 1e-6);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away from sphere: the line still misses (discriminant < 0)
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_sphere_behind_ray() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 1.0), 0.5, grey());

        // Both roots are negative: the line intersects but not the half-line
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_ray_inside_sphere_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, forward()).expect("inside ray must exit");

        assert!((rec.t - 2.0).abs() < 1e-6);
        assert!(!rec.front_face);
        // Outward normal is +X, stored normal faces back toward the ray
        assert!((rec.normal + Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_far_root_rejected_by_interval_max() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(sphere.hit(&ray, Interval::new(0.001, 1.5)).is_none());
    }

    #[test]
    fn test_bounce_origin_on_surface_is_not_rehit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        // Leaving the surface outward from the point where it was hit
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, 1.0, 0.0));

        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_negative_radius_clamped() {
        let sphere = Sphere::new(Vec3::ZERO, -3.0, grey());
        assert_eq!(sphere.radius(), 0.0);
        assert_eq!(sphere.center(), Vec3::ZERO);
    }

    #[test]
    fn test_shared_material() {
        let material = grey();
        let a = Sphere::new(Vec3::new(-1.0, 0.0, -2.0), 0.5, material.clone());
        let b = Sphere::new(Vec3::new(1.0, 0.0, -2.0), 0.5, material.clone());

        assert_eq!(Arc::strong_count(&material), 3);
        drop(a);
        assert_eq!(Arc::strong_count(&material), 2);
        drop(b);
        assert_eq!(Arc::strong_count(&material), 1);
    }

    #[test]
    fn test_hit_normals_are_unit_and_face_the_ray() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 1.0, grey());
        let mut rng = StdRng::seed_from_u64(99);
        let mut hits = 0;

        for _ in 0..2000 {
            let origin = Vec3::new(
                gen_range_f32(&mut rng, -3.0, 3.0),
                gen_range_f32(&mut rng, -3.0, 3.0),
                gen_range_f32(&mut rng, -4.0, 2.0),
            );
            let ray = Ray::new(origin, random_unit_vector(&mut rng));

            if let Some(rec) = sphere.hit(&ray, forward()) {
                hits += 1;
                assert!(forward().surrounds(rec.t));
                assert!((rec.normal.length() - 1.0).abs() < 1e-4);

                // Stored normal always opposes the ray; the outward normal
                // agrees with the ray only on back-face hits
                assert!(rec.normal.dot(ray.direction()) <= 0.0);
                let outward = (rec.p - sphere.center()) / sphere.radius();
                if rec.front_face {
                    assert!(outward.dot(ray.direction()) <= 0.0);
                } else {
                    assert!(outward.dot(ray.direction()) >= 0.0);
                }
            }
        }

        assert!(hits > 0);
    }
}
