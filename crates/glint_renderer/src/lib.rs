//! Glint Renderer - CPU Path Tracing
//!
//! A Monte Carlo ray tracer for scenes made of spheres with diffuse, metal
//! and glass materials, rendered through a thin-lens camera.
//!
//! # Example
//!
//! ```no_run
//! use glint_renderer::{render, Assembly, CameraSettings, Material, RenderConfig, Sphere, Vec3};
//!
//! let mut world = Assembly::new();
//! world.add_object(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::lambertian(Vec3::splat(0.5))));
//! world.add_object(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, Material::lambertian(Vec3::splat(0.5))));
//!
//! let config = RenderConfig::default().with_resolution(200, 100).with_seed(1);
//! let camera = CameraSettings::default().build(config.aspect_ratio());
//! let image = render(&config, &world.into(), &camera)?;
//! assert_eq!(image.pixels.len(), 200 * 100);
//! # Ok::<(), glint_renderer::RenderError>(())
//! ```

mod bucket;
mod camera;
mod config;
mod hittable;
mod material;
mod renderer;
mod sampling;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use camera::Camera;
pub use config::{
    CameraSettings, RenderConfig, RenderError, RenderResult, DEFAULT_BUCKET_SIZE,
    DEFAULT_MAX_DEPTH,
};
pub use hittable::{Assembly, HitRecord, Surface, NORMAL_TOLERANCE};
pub use material::{
    reflect, refract, schlick, Color, Dielectric, Lambertian, Material, Metal, ScatterResult,
};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_image, render_pixel, sky_gradient,
    PixelBuffer, T_MAX, T_MIN,
};
pub use sampling::{gen_f64, random_in_unit_disk, random_in_unit_sphere};
pub use sphere::Sphere;

/// Re-export vector and ray types from glint_math
pub use glint_math::{unit_vector, Interval, Ray, Vec2, Vec3};
