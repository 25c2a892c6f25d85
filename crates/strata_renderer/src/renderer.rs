//! Radiance estimator and output encoding.
//!
//! `ray_color` is the recursive Monte Carlo estimator. Diffuse bounces draw
//! their next direction from an even mixture of light sampling and the
//! material's own distribution and weight the sample by the ratio of the
//! scattering density to the mixture density. When the light set has
//! nothing to sample the material's distribution is used on its own.

use crate::material::ScatterKind;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::{Color, Hittable, Ray};
use rand::RngCore;
use strata_math::Interval;

/// Encoded 8-bit RGB pixel.
pub type Rgb8 = [u8; 3];

/// Closest hit distance accepted, to avoid re-hitting the surface a ray left.
pub const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Compute the radiance arriving along `ray`.
///
/// `lights` is the subset of the scene that is sampled explicitly; a set
/// that cannot be sampled leaves diffuse bounces to the material alone. The
/// division by the mixture density is left unguarded; a zero density shows
/// up as NaN or infinity and is absorbed by [`encode_color`].
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    lights: &dyn Hittable,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::from_min(SHADOW_ACNE_EPSILON)) else {
        return background;
    };

    let emission = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emission;
    };

    let surface_pdf = match srec.kind {
        ScatterKind::Specular(scattered) => {
            return srec.attenuation
                * ray_color(&scattered, depth - 1, world, lights, background, rng);
        }
        ScatterKind::Diffuse(pdf) => pdf,
    };

    // Without anything to aim at, the material's own lobe is the whole
    // distribution
    let light_pdf = HittablePdf::new(lights, rec.p);
    let mixture = MixturePdf::new(&light_pdf, &surface_pdf);
    let pdf: &dyn Pdf = if lights.is_light_sampleable() {
        &mixture
    } else {
        &surface_pdf
    };

    let scattered = Ray::new(rec.p, pdf.generate(rng), ray.time());
    let pdf_value = pdf.value(scattered.direction());

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

    let sample_color = ray_color(&scattered, depth - 1, world, lights, background, rng);
    let color_from_scatter = srec.attenuation * scattering_pdf * sample_color / pdf_value;

    emission + color_from_scatter
}

/// Apply gamma correction (gamma = 2.0).
///
/// Anything not strictly positive, NaN included, maps to 0.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn encode_color(color: Color) -> Rgb8 {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f32| (255.999 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiffuseLight, HittableList, Lambertian, Metal, Quad, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use strata_math::Vec3;

    fn facing_camera<M: crate::Material + 'static>(z: f32, material: M) -> Quad<M> {
        // 2x2 quad centered on the -Z axis with its normal toward the origin
        Quad::new(
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            material,
        )
    }

    #[test]
    fn test_miss_returns_background() {
        let world = HittableList::new();
        let lights = HittableList::new();
        let background = Color::new(0.2, 0.4, 0.6);
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        for depth in [1, 2, 50] {
            let color = ray_color(&ray, depth, &world, &lights, background, &mut rng);
            assert_eq!(color, background);
        }
    }

    #[test]
    fn test_zero_depth_is_black() {
        let mut world = HittableList::new();
        world.add(Box::new(facing_camera(-1.0, DiffuseLight::new(Color::splat(15.0)))));
        let lights = HittableList::new();
        let mut rng = StdRng::seed_from_u64(2);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let color = ray_color(&ray, 0, &world, &lights, Color::ONE, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_emitter_returns_emission() {
        let mut world = HittableList::new();
        world.add(Box::new(facing_camera(-1.0, DiffuseLight::new(Color::splat(15.0)))));
        let lights = HittableList::new();
        let mut rng = StdRng::seed_from_u64(3);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let color = ray_color(&ray, 1, &world, &lights, Color::ZERO, &mut rng);
        assert_eq!(color, Color::splat(15.0));
    }

    #[test]
    fn test_specular_bounce_skips_pdf() {
        let mut world = HittableList::new();
        world.add(Box::new(facing_camera(-1.0, Metal::new(Color::splat(0.5), 0.0))));
        let lights = HittableList::new();
        let background = Color::new(0.2, 0.4, 0.6);
        let mut rng = StdRng::seed_from_u64(4);

        // Mirror sends the ray straight back out of the scene
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let color = ray_color(&ray, 2, &world, &lights, background, &mut rng);
        assert!((color - 0.5 * background).length() < 1e-6);

        // Out of bounces after the mirror
        let color = ray_color(&ray, 1, &world, &lights, background, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_diffuse_lit_by_light_is_finite_and_positive() {
        let light = || {
            Quad::new(
                Vec3::new(-1.0, 2.0, -1.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
                DiffuseLight::new(Color::splat(15.0)),
            )
        };
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, -100.0, 0.0),
            100.0,
            Lambertian::new(Color::splat(0.5)),
        )));
        world.add(Box::new(light()));
        let mut lights = HittableList::new();
        lights.add(Box::new(light()));

        let mut rng = StdRng::seed_from_u64(5);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, -1.0, -3.0), 0.0);

        let mut sum = Color::ZERO;
        let n = 2000;
        for _ in 0..n {
            let color = ray_color(&ray, 10, &world, &lights, Color::ZERO, &mut rng);
            assert!(!color.is_finite() || color.min_element() >= 0.0);
            if color.is_finite() {
                sum += color;
            }
        }
        let mean = sum / n as f32;
        assert!(mean.min_element() > 0.0, "mean = {:?}", mean);
    }

    #[test]
    fn test_no_lights_samples_material_only() {
        // Wall in the x = 0 plane facing +X, lit only by a white sky
        let mut world = HittableList::new();
        world.add(Box::new(Quad::new(
            Vec3::new(0.0, -50.0, -50.0),
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(0.0, 0.0, 100.0),
            Lambertian::new(Color::splat(0.5)),
        )));
        let lights = HittableList::new();
        let mut rng = StdRng::seed_from_u64(6);

        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), -Vec3::X, 0.0);
        let n = 20_000;
        let mut sum = Color::ZERO;
        for _ in 0..n {
            let color = ray_color(&ray, 2, &world, &lights, Color::ONE, &mut rng);
            assert!(color.is_finite(), "{:?}", color);
            sum += color;
        }
        let mean = sum / n as f32;
        assert!((mean - Color::splat(0.5)).abs().max_element() < 0.01, "mean = {:?}", mean);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-2.0), 0.0);
        assert_eq!(linear_to_gamma(f32::NAN), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_encode_color() {
        assert_eq!(encode_color(Color::ONE), [255, 255, 255]);
        assert_eq!(encode_color(Color::ZERO), [0, 0, 0]);
        assert_eq!(encode_color(Color::splat(15.0)), [255, 255, 255]);
        assert_eq!(encode_color(Color::new(0.25, -1.0, 4.0)), [127, 0, 255]);
    }

    #[test]
    fn test_encode_absorbs_degenerate_values() {
        let color = Color::new(f32::NAN, f32::INFINITY, f32::NEG_INFINITY);
        assert_eq!(encode_color(color), [0, 255, 0]);
    }
}
