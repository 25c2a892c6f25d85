//! Render configuration.
//!
//! Read-only for the duration of a render. Every field has a default so a
//! JSON file only needs to name what it changes.

use crate::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strata_math::Vec3;
use thiserror::Error;

/// Errors from loading or validating a [`RenderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the renderer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Width over height; the height is derived from it
    pub aspect_ratio: f32,
    /// Requested samples per pixel (rounded down to a square)
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces into the scene
    pub max_depth: u32,
    /// Radiance returned by rays that escape the scene
    pub background: Color,

    /// Vertical field of view in degrees
    pub vfov: f32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// Camera-relative "up" direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from the camera to the plane of perfect focus
    pub focus_dist: f32,

    /// Worker threads; 0 uses all available cores
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 100,
            aspect_ratio: 1.0,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            vfov: 90.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            threads: 0,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded render config from {}", path.display());
        Ok(config)
    }

    /// Apply the fields present in a JSON object on top of `self`.
    ///
    /// Fields the JSON leaves out keep their current value rather than
    /// falling back to [`RenderConfig::default`].
    pub fn with_json_overrides(&self, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(ConfigError::Invalid("config must be a JSON object".into()));
        };

        let mut merged = serde_json::to_value(self)?;
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(overrides);
        }

        let config: RenderConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// [`RenderConfig::with_json_overrides`] reading the JSON from `path`.
    pub fn load_overrides(&self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = self.with_json_overrides(&json)?;
        log::debug!("Applied render config overrides from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the camera cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.image_width == 0 {
            return invalid("image_width must be at least 1".into());
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples_per_pixel must be at least 1".into());
        }
        if self.max_depth == 0 {
            return invalid("max_depth must be at least 1".into());
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return invalid(format!("aspect_ratio must be positive, got {}", self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("vfov must be in (0, 180) degrees, got {}", self.vfov));
        }
        if !(self.focus_dist > 0.0) {
            return invalid(format!("focus_dist must be positive, got {}", self.focus_dist));
        }
        if self.defocus_angle < 0.0 {
            return invalid(format!("defocus_angle must not be negative, got {}", self.defocus_angle));
        }
        if (self.look_from - self.look_at).length_squared() == 0.0 {
            return invalid("look_from and look_at must differ".into());
        }
        if self.vup.cross(self.look_from - self.look_at).length_squared() == 0.0 {
            return invalid("vup must not be parallel to the view direction".into());
        }
        Ok(())
    }

    /// Image height derived from width and aspect ratio.
    pub fn image_height(&self) -> u32 {
        crate::camera::image_height_for(self.image_width, self.aspect_ratio)
    }
}
