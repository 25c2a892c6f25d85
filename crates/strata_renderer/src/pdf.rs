//! Direction distributions used for importance sampling.
//!
//! Each [`Pdf`] can draw a direction and report the solid-angle density of
//! any direction. The integrator mixes a light-directed distribution with the
//! material's own through [`MixturePdf`].

use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};
use crate::Hittable;
use rand::RngCore;
use std::f32::consts::PI;
use strata_math::{Onb, Vec3};

/// A probability distribution over directions.
pub trait Pdf {
    /// Density at `direction` (need not be normalized).
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Uniform over the whole sphere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f32 {
        1.0 / (4.0 * PI)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Cosine-weighted hemisphere about a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::new(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cos_theta = direction.normalize().dot(self.uvw.w());
        (cos_theta / PI).max(0.0)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.transform(random_cosine_direction(rng))
    }
}

/// Directions from `origin` toward a set of objects (usually the lights).
pub struct HittablePdf<'a> {
    objects: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(objects: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { objects, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.objects.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.objects.random(self.origin, rng)
    }
}

/// Even blend of two distributions.
pub struct MixturePdf<'a> {
    p: [&'a dyn Pdf; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a dyn Pdf, p1: &'a dyn Pdf) -> Self {
        Self { p: [p0, p1] }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.p[0].value(direction) + 0.5 * self.p[1].value(direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.p[0].generate(rng)
        } else {
            self.p[1].generate(rng)
        }
    }
}

/// The distributions a material can hand back from `scatter`.
#[derive(Debug, Clone, Copy)]
pub enum SurfacePdf {
    Cosine(CosinePdf),
    Sphere(SpherePdf),
}

impl Pdf for SurfacePdf {
    fn value(&self, direction: Vec3) -> f32 {
        match self {
            SurfacePdf::Cosine(pdf) => pdf.value(direction),
            SurfacePdf::Sphere(pdf) => pdf.value(direction),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            SurfacePdf::Cosine(pdf) => pdf.generate(rng),
            SurfacePdf::Sphere(pdf) => pdf.generate(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DiffuseLight, Quad, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Monte-Carlo estimate of the integral of `pdf` over the unit sphere.
    fn integrate_over_sphere(pdf: &dyn Pdf, samples: usize, seed: u64) -> f32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let uniform = 1.0 / (4.0 * PI);
        let sum: f64 = (0..samples)
            .map(|_| (pdf.value(random_unit_vector(&mut rng)) / uniform) as f64)
            .sum();
        (sum / samples as f64) as f32
    }

    #[test]
    fn test_sphere_pdf_integrates_to_one() {
        let integral = integrate_over_sphere(&SpherePdf, 10_000, 1);
        assert!((integral - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_cosine_pdf_integrates_to_one() {
        let pdf = CosinePdf::new(Vec3::new(0.2, 1.0, -0.4));
        let integral = integrate_over_sphere(&pdf, 200_000, 2);
        assert!((integral - 1.0).abs() < 0.02, "integral = {}", integral);
    }

    #[test]
    fn test_cosine_pdf_zero_below_surface() {
        let pdf = CosinePdf::new(Vec3::Y);
        assert_eq!(pdf.value(-Vec3::Y), 0.0);
        assert!((pdf.value(Vec3::Y * 10.0) - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_pdf_draws_have_positive_density() {
        let normal = Vec3::new(1.0, 1.0, 0.0);
        let pdf = CosinePdf::new(normal);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let d = pdf.generate(&mut rng);
            let cosine = d.normalize().dot(normal.normalize());
            assert!(cosine >= -1e-5);
            // Tangent draws legitimately score zero
            if cosine > 1e-4 {
                assert!(pdf.value(d) > 0.0, "d = {:?}", d);
            }
        }
    }

    #[test]
    fn test_hittable_pdf_sphere_integrates_to_one() {
        let light = Sphere::new(Vec3::new(0.0, 0.0, -2.0), 1.0, DiffuseLight::new(Color::ONE));
        let pdf = HittablePdf::new(&light, Vec3::ZERO);
        let integral = integrate_over_sphere(&pdf, 400_000, 4);
        assert!((integral - 1.0).abs() < 0.05, "integral = {}", integral);
    }

    #[test]
    fn test_hittable_pdf_quad_integrates_to_one() {
        let light = Quad::new(
            Vec3::new(-1.0, 2.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            DiffuseLight::new(Color::ONE),
        );
        let pdf = HittablePdf::new(&light, Vec3::ZERO);
        let integral = integrate_over_sphere(&pdf, 400_000, 5);
        assert!((integral - 1.0).abs() < 0.05, "integral = {}", integral);
    }

    #[test]
    fn test_hittable_pdf_draws_have_positive_density() {
        let light = Quad::new(
            Vec3::new(-1.0, 2.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            DiffuseLight::new(Color::ONE),
        );
        let pdf = HittablePdf::new(&light, Vec3::new(0.3, 0.0, 0.2));
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..1000 {
            let d = pdf.generate(&mut rng);
            assert!(pdf.value(d) > 0.0);
        }
    }

    #[test]
    fn test_mixture_value_is_exact_mean() {
        let cosine = CosinePdf::new(Vec3::new(0.0, 0.0, 1.0));
        let sphere = SpherePdf;
        let mixture = MixturePdf::new(&cosine, &sphere);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let d = random_unit_vector(&mut rng) * 3.0;
            let expected = 0.5 * cosine.value(d) + 0.5 * sphere.value(d);
            assert_eq!(mixture.value(d), expected);
        }
    }

    #[test]
    fn test_mixture_integrates_to_one() {
        let cosine = CosinePdf::new(Vec3::Y);
        let light = Sphere::new(Vec3::new(0.0, 3.0, 0.0), 1.0, DiffuseLight::new(Color::ONE));
        let towards_light = HittablePdf::new(&light, Vec3::ZERO);
        let mixture = MixturePdf::new(&towards_light, &cosine);

        let integral = integrate_over_sphere(&mixture, 400_000, 8);
        assert!((integral - 1.0).abs() < 0.05, "integral = {}", integral);
    }

    #[test]
    fn test_mixture_draws_from_both() {
        // Light straight up, cosine lobe about +X: draws land in either lobe
        let cosine = CosinePdf::new(Vec3::X);
        let light = Sphere::new(Vec3::new(0.0, 50.0, 0.0), 1.0, DiffuseLight::new(Color::ONE));
        let towards_light = HittablePdf::new(&light, Vec3::ZERO);
        let mixture = MixturePdf::new(&towards_light, &cosine);

        let mut rng = StdRng::seed_from_u64(9);
        let mut toward_light = 0;
        let n = 4000;
        for _ in 0..n {
            let d = mixture.generate(&mut rng).normalize();
            assert!(mixture.value(d) > 0.0);
            if d.y > 0.999 {
                toward_light += 1;
            }
        }
        let fraction = toward_light as f32 / n as f32;
        assert!((0.4..0.6).contains(&fraction), "fraction = {}", fraction);
    }
}
