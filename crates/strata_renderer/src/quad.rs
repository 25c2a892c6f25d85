//! Planar quadrilateral primitive and the box built from six of them.
//!
//! A quad is a corner `q` plus two edge vectors `u` and `v`. Quads are the
//! usual area lights, so they implement the light-sampling hooks.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::sampling::gen_f32;
use crate::{Material, Ray};
use rand::RngCore;
use strata_math::{Aabb, Interval, Vec3};

/// A parallelogram.
pub struct Quad<M: Material> {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n . n)` for the unnormalized plane normal, used to get (alpha, beta)
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Quad<M> {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: M) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            area: n.length(),
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }
}

impl<M: Material + 'static> Hittable for Quad<M> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Planar coordinates of the hit relative to q
        let planar = ray.at(t) - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, (alpha, beta), &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn is_light_sampleable(&self) -> bool {
        true
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let Some(rec) = self.hit(&Ray::at_time_zero(origin, direction), Interval::from_min(0.001))
        else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        p - origin
    }
}

/// Closed box (six quads) spanning the corners `a` and `b`.
pub fn make_box<M>(a: Vec3, b: Vec3, material: M) -> HittableList
where
    M: Material + Clone + 'static,
{
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = HittableList::new();
    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];
    for (q, u, v) in faces {
        sides.add(Box::new(Quad::new(q, u, v, material.clone())));
    }
    sides
}
