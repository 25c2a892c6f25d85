//! Strata math: value types shared by the renderer.
//!
//! Vectors come straight from `glam`; this crate adds the ray-tracing
//! specific pieces on top (rays, intervals, bounding boxes, frames).

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
