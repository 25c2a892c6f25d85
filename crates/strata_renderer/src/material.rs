//! Material trait for surface scattering.
//!
//! A material answers three questions at a hit: how much light it emits,
//! how an incoming ray scatters, and (for diffuse lobes) the density of
//! scattering into a given outgoing direction.

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, SpherePdf, SurfacePdf};
use crate::sampling::{gen_f32, random_unit_vector};
use crate::Ray;
use rand::RngCore;
use std::f32::consts::PI;
use strata_math::Vec3;

/// Color type alias (linear RGB radiance, unbounded above)
pub type Color = Vec3;

/// How a scattered path continues.
pub enum ScatterKind {
    /// Sample a direction from this distribution (mixed with light sampling).
    Diffuse(SurfacePdf),
    /// Follow this exact ray; there is no density to importance-sample.
    Specular(Ray),
}

/// Material response at a hit.
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Light emitted at the hit. Most materials are black.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// `None` means the ray is absorbed.
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }

    /// Density of scattering `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Diffuse(SurfacePdf::Cosine(CosinePdf::new(rec.normal))),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cos_theta = rec.normal.dot(scattered.direction().normalize());
        if cos_theta < 0.0 {
            0.0
        } else {
            cos_theta / PI
        }
    }
}

/// Uniform scattering in every direction.
#[derive(Debug, Clone)]
pub struct Isotropic {
    albedo: Color,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Diffuse(SurfacePdf::Sphere(SpherePdf)),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * PI)
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` is clamped to [0, 1]; 0 is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction(), rec.normal).normalize()
            + self.fuzz * random_unit_vector(rng);

        if reflected.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Specular(Ray::new(rec.p, reflected, ray_in.time())),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction relative to the surrounding medium
    ior: f32,
}

impl Dielectric {
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let ri = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;
        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            kind: ScatterKind::Specular(Ray::new(rec.p, direction, ray_in.time())),
        })
    }
}

/// Diffuse area light. Emits from its front face only.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord, _u: f32, _v: f32, _p: Vec3) -> Color {
        if rec.front_face {
            self.emit
        } else {
            Color::ZERO
        }
    }
}

#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::Pdf;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record_facing_up<'a>(material: &'a dyn Material) -> (Ray, HitRecord<'a>) {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.3);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, (0.5, 0.5), material);
        (ray, rec)
    }

    #[test]
    fn test_lambertian_scatters_with_cosine_pdf() {
        let material = Lambertian::new(Color::new(0.7, 0.2, 0.1));
        let (ray, rec) = record_facing_up(&material);
        let mut rng = StdRng::seed_from_u64(1);

        let srec = material.scatter(&ray, &rec, &mut rng).expect("lambertian scatters");
        assert_eq!(srec.attenuation, Color::new(0.7, 0.2, 0.1));
        let ScatterKind::Diffuse(pdf) = srec.kind else {
            panic!("lambertian should not be specular");
        };
        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-5);

        let straight_up = Ray::new(rec.p, Vec3::Y * 3.0, 0.3);
        assert!((material.scattering_pdf(&ray, &rec, &straight_up) - 1.0 / PI).abs() < 1e-5);
        let below = Ray::new(rec.p, -Vec3::Y, 0.3);
        assert_eq!(material.scattering_pdf(&ray, &rec, &below), 0.0);
    }

    #[test]
    fn test_mirror_reflects_and_keeps_time() {
        let material = Metal::new(Color::splat(0.9), 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.6);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Y, (0.0, 0.0), &material);
        let mut rng = StdRng::seed_from_u64(2);

        let srec = material.scatter(&ray, &rec, &mut rng).expect("mirror reflects");
        let ScatterKind::Specular(out) = srec.kind else {
            panic!("metal is specular");
        };
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((out.direction() - expected).length() < 1e-5);
        assert_eq!(out.time(), 0.6);
        assert_eq!(out.origin(), rec.p);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(1.5);
        // Grazing ray from inside the glass: must reflect
        let ray = Ray::new(Vec3::new(-1.0, 0.05, 0.0), Vec3::new(1.0, -0.05, 0.0), 0.0);
        let mut rec = HitRecord::new(&ray, 1.0, Vec3::Y, (0.0, 0.0), &material);
        rec.front_face = false;
        let mut rng = StdRng::seed_from_u64(4);

        let srec = material.scatter(&ray, &rec, &mut rng).expect("glass scatters");
        assert_eq!(srec.attenuation, Color::ONE);
        let ScatterKind::Specular(out) = srec.kind else {
            panic!("glass is specular");
        };
        assert!(out.direction().y > 0.0);
    }

    #[test]
    fn test_diffuse_light_emits_front_only() {
        let material = DiffuseLight::new(Color::splat(15.0));
        let (ray, mut rec) = record_facing_up(&material);
        let mut rng = StdRng::seed_from_u64(5);

        assert!(material.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(material.emitted(&ray, &rec, rec.u, rec.v, rec.p), Color::splat(15.0));

        rec.front_face = false;
        assert_eq!(material.emitted(&ray, &rec, rec.u, rec.v, rec.p), Color::ZERO);
    }

    #[test]
    fn test_isotropic_pdf_is_uniform() {
        let material = Isotropic::new(Color::ONE);
        let (ray, rec) = record_facing_up(&material);
        let any = Ray::new(rec.p, Vec3::new(0.3, -0.2, 0.9), 0.0);
        assert!((material.scattering_pdf(&ray, &rec, &any) - 1.0 / (4.0 * PI)).abs() < 1e-6);
    }
}
