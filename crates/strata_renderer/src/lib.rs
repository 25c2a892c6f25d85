//! Strata Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer that mixes material scattering with explicit
//! light sampling. Pixels are stratified, scanlines are rendered in
//! parallel, and the finished image is written as a plain-text PPM.

mod bvh;
mod camera;
mod config;
mod error;
mod framebuffer;
mod hittable;
mod instance;
mod material;
mod quad;
mod renderer;
mod sampling;
mod scanline;
mod sphere;

pub mod pdf;
pub mod progress;

pub use bvh::BvhNode;
pub use camera::{image_height_for, Camera};
pub use config::{ConfigError, RenderConfig};
pub use error::RenderError;
pub use framebuffer::Framebuffer;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::Transformed;
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterKind,
    ScatterRecord,
};
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf, SurfacePdf};
pub use quad::{make_box, Quad};
pub use renderer::{encode_color, linear_to_gamma, ray_color, Rgb8, SHADOW_ACNE_EPSILON};
pub use scanline::{Renderer, ROW_CHUNK};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from strata_math
pub use strata_math::{Aabb, Interval, Ray, Vec3};
