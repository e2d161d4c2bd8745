//! Render and camera settings.
//!
//! Both structs deserialize from JSON with every field optional, so a
//! settings file only needs to list what differs from the defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Camera;
use glint_math::Vec3;

/// Default bounce budget for `ray_color`.
pub const DEFAULT_MAX_DEPTH: u32 = 50;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Errors that can occur when setting up a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    NoSamples,

    #[error("Bucket size must be at least 1")]
    InvalidBucketSize,

    #[error("Invalid render settings: {0}")]
    Config(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed from which every bucket's random stream is derived
    pub seed: u64,
    /// Edge length of the square buckets the image is split into
    pub bucket_size: u32,
    /// Render buckets on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            samples_per_pixel: 100,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            parallel: true,
        }
    }
}

impl RenderConfig {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that the settings describe a renderable image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidBucketSize);
        }
        Ok(())
    }

    /// Width / height of the output image.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Camera placement and lens, in user-facing units (degrees).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov_degrees: f64,
    /// Lens diameter (0 = pinhole)
    pub aperture: f64,
    /// Distance to the focus plane; `None` focuses on `look_at`
    pub focus_dist: Option<f64>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov_degrees: 90.0,
            aperture: 0.0,
            focus_dist: None,
        }
    }
}

impl CameraSettings {
    /// Parse camera settings from JSON.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov_degrees: f64, aperture: f64, focus_dist: Option<f64>) -> Self {
        self.vfov_degrees = vfov_degrees;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Build the camera for an image with the given aspect ratio.
    pub fn build(&self, aspect: f64) -> Camera {
        let focus_dist = self
            .focus_dist
            .unwrap_or_else(|| (self.look_at - self.look_from).length());
        Camera::new(
            self.look_from,
            self.look_at,
            self.vup,
            self.vfov_degrees.to_radians(),
            aspect,
            self.aperture,
            focus_dist,
        )
    }
}
