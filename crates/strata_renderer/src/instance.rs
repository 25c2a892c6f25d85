//! Rigid transforms of existing geometry.
//!
//! Rays are carried into the object's local space, intersected there, and
//! the hit is carried back. Only rotations and translations are supported,
//! so normals transform like plain vectors and solid angles are preserved.

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use rand::RngCore;
use strata_math::{Aabb, Interval, Mat4, Vec3};

/// A hittable placed in the world by a rigid transform.
pub struct Transformed<H: Hittable> {
    object: H,
    /// Local-to-world
    transform: Mat4,
    /// World-to-local
    inverse: Mat4,
    bbox: Aabb,
}

impl<H: Hittable> Transformed<H> {
    fn with_transform(object: H, transform: Mat4) -> Self {
        let bbox = object.bounding_box().transformed(&transform);
        Self {
            object,
            transform,
            inverse: transform.inverse(),
            bbox,
        }
    }

    /// Move `object` by `offset`.
    pub fn translate(object: H, offset: Vec3) -> Self {
        Self::with_transform(object, Mat4::from_translation(offset))
    }

    /// Rotate `object` about the world Y axis by `degrees`.
    pub fn rotate_y(object: H, degrees: f32) -> Self {
        Self::with_transform(object, Mat4::from_rotation_y(degrees.to_radians()))
    }

    fn to_local(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.inverse.transform_point3(ray.origin()),
            self.inverse.transform_vector3(ray.direction()),
            ray.time(),
        )
    }
}

impl<H: Hittable> Hittable for Transformed<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Rigid transforms keep |direction|, so t is the same in both spaces
        let mut rec = self.object.hit(&self.to_local(ray), ray_t)?;

        rec.p = self.transform.transform_point3(rec.p);
        rec.normal = self.transform.transform_vector3(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn is_light_sampleable(&self) -> bool {
        self.object.is_light_sampleable()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(
            self.inverse.transform_point3(origin),
            self.inverse.transform_vector3(direction),
        )
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self.object.random(self.inverse.transform_point3(origin), rng);
        self.transform.transform_vector3(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{make_box, Color, DiffuseLight, Lambertian, Quad, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_translated_sphere() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5, Lambertian::new(Color::ONE));
        let moved = Transformed::translate(sphere, Vec3::new(0.0, 0.0, -3.0));

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = moved.hit(&ray, Interval::from_min(0.001)).expect("should hit");
        assert!((rec.t - 2.5).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.0, 0.0, -2.5)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);

        let bbox = moved.bounding_box();
        assert!((bbox.z.min - -3.5).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_box_normal() {
        let cube = make_box(Vec3::splat(-1.0), Vec3::splat(1.0), Lambertian::new(Color::ONE));
        let turned = Transformed::rotate_y(cube, 45.0);

        // A ray along -Z meets the rotated box on an edge-on face
        let ray = Ray::new(Vec3::new(0.3, 0.0, 5.0), -Vec3::Z, 0.0);
        let rec = turned.hit(&ray, Interval::from_min(0.001)).expect("should hit");
        assert!(rec.normal.y.abs() < 1e-4);
        assert!((rec.normal.length() - 1.0).abs() < 1e-4);
        assert!(rec.normal.dot(ray.direction()) < 0.0);
        // Corner of the rotated unit box sits at z = sqrt(2)
        assert!(rec.p.z < std::f32::consts::SQRT_2 + 1e-4);
    }

    #[test]
    fn test_transformed_light_sampling_matches_hits() {
        let light = Quad::new(
            Vec3::new(-0.5, 0.0, -0.5),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            DiffuseLight::new(Color::ONE),
        );
        let placed = Transformed::translate(light, Vec3::new(2.0, 3.0, 0.0));

        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let direction = placed.random(Vec3::ZERO, &mut rng);
            assert!(placed.pdf_value(Vec3::ZERO, direction) > 0.0);
            let ray = Ray::new(Vec3::ZERO, direction, 0.0);
            assert!(placed.hit(&ray, Interval::from_min(0.001)).is_some());
        }
    }
}
