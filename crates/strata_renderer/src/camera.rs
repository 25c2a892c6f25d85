//! Camera for ray generation.
//!
//! Derives the viewing frame from a [`RenderConfig`] once, then hands out
//! stratified, optionally defocused, time-stamped primary rays.

use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::{Ray, RenderConfig};
use rand::RngCore;
use strata_math::Vec3;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    /// Side of the per-pixel stratification grid
    pub sqrt_spp: u32,

    defocus_angle: f32,
    recip_sqrt_spp: f32,
    pixel_samples_scale: f32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

/// `max(1, trunc(width / aspect_ratio))`.
pub fn image_height_for(image_width: u32, aspect_ratio: f32) -> u32 {
    ((image_width as f32 / aspect_ratio) as u32).max(1)
}

impl Camera {
    pub fn new(config: &RenderConfig) -> Self {
        let image_width = config.image_width;
        let image_height = image_height_for(image_width, config.aspect_ratio);

        // Non-square sample counts round down to the nearest square
        let sqrt_spp = ((config.samples_per_pixel as f64).sqrt() as u32).max(1);
        let recip_sqrt_spp = 1.0 / sqrt_spp as f32;
        let pixel_samples_scale = 1.0 / (sqrt_spp * sqrt_spp) as f32;

        let center = config.look_from;

        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Across the horizontal edge, and down the vertical edge
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Self {
            image_width,
            image_height,
            sqrt_spp,
            defocus_angle: config.defocus_angle,
            recip_sqrt_spp,
            pixel_samples_scale,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        }
    }

    /// Ray through pixel `(i, j)`, jittered inside stratum `(s_i, s_j)`.
    pub fn get_ray(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.sample_square_stratified(s_i, s_j, rng);
        let pixel_sample = self.pixel00_loc
            + (i as f32 + offset.x) * self.pixel_delta_u
            + (j as f32 + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin, gen_f32(rng))
    }

    /// Samples actually taken per pixel: `sqrt_spp²`.
    pub fn samples_per_pixel(&self) -> u32 {
        self.sqrt_spp * self.sqrt_spp
    }

    /// Weight of one sample in the pixel average.
    pub fn pixel_samples_scale(&self) -> f32 {
        self.pixel_samples_scale
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Camera frame `(u, v, w)`: right, up, and backward.
    pub fn frame(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Offset in `[-0.5, 0.5)²` within sub-cell `(s_i, s_j)` of the pixel.
    fn sample_square_stratified(&self, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Vec3 {
        let px = (s_i as f32 + gen_f32(rng)) * self.recip_sqrt_spp - 0.5;
        let py = (s_j as f32 + gen_f32(rng)) * self.recip_sqrt_spp - 0.5;
        Vec3::new(px, py, 0.0)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}
