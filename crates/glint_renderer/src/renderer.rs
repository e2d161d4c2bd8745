//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative path tracing with a bounded bounce depth
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction and 8-bit quantization

use std::time::Instant;

use glint_math::{unit_vector, Interval};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::config::{RenderConfig, RenderResult, DEFAULT_MAX_DEPTH};
use crate::sampling::gen_f64;
use crate::{Camera, Color, Ray, Surface};

/// Minimum ray parameter accepted as a hit. Keeps scattered rays from
/// re-hitting the surface they start on (shadow acne).
pub const T_MIN: f64 = 0.001;

/// Maximum ray parameter accepted as a hit.
pub const T_MAX: f64 = 1e6;

/// Compute the color seen by a ray.
///
/// Each scattering hit multiplies the path throughput by its attenuation and
/// spends one bounce of `depth`. Absorption or an exhausted depth budget
/// yields black; a path escaping the scene picks up the sky gradient.
///
/// Bounces run in a loop, so stack use does not grow with `depth`.
pub fn ray_color(ray: &Ray, scene: &Surface, depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = *ray;
    let mut depth = depth;
    let mut throughput = Color::ONE;

    loop {
        let Some(rec) = scene.hit(&ray, Interval::new(T_MIN, T_MAX)) else {
            return throughput * sky_gradient(&ray);
        };

        let result = rec.material.scatter(&ray, &rec, rng);
        match result.scattered {
            Some(scattered) if depth > 0 => {
                throughput *= result.attenuation;
                ray = scattered;
                depth -= 1;
            }
            _ => return Color::ZERO,
        }
    }
}

/// Vertical white to sky-blue gradient used as ambient light.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    linear.sqrt()
}

/// Convert a linear color to 8-bit RGB.
///
/// Channels are clamped to `[0, 1]` before gamma so out of range values
/// saturate instead of wrapping.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (255.0 * linear_to_gamma(Interval::UNIT.clamp(c))).round() as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` are image coordinates with `y = 0` at the top. Sampling runs in
/// window coordinates where row 0 is at the bottom, so `y` is flipped here.
pub fn render_pixel(
    camera: &Camera,
    scene: &Surface,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let j = config.height - 1 - y;
    let width = config.width as f64;
    let height = config.height as f64;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f64 + gen_f64(rng)) / width;
        let t = (j as f64 + gen_f64(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f64
}

/// Quantized output image.
///
/// Row-major, row 0 at the top of the image, one `[r, g, b]` per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    /// Pixels of row `y`, left to right.
    pub fn row(&self, y: u32) -> &[[u8; 3]] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, rgb) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *rgb);
        }
    }

    /// Flatten to packed RGB bytes (for handing to an image encoder).
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Render the scene pixel by pixel from a single random stream.
///
/// This is the reference renderer: every sample of every pixel draws from
/// `rng` in order, bottom row first. Uses [`DEFAULT_MAX_DEPTH`] bounces.
///
/// # Panics
///
/// Panics if any dimension or the sample count is zero.
pub fn render_image(
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    scene: &Surface,
    camera: &Camera,
    rng: &mut dyn RngCore,
) -> PixelBuffer {
    assert!(
        width > 0 && height > 0,
        "image dimensions must be positive, got {width}x{height}"
    );
    assert!(samples_per_pixel > 0, "samples per pixel must be positive");

    let config = RenderConfig::default()
        .with_resolution(width, height)
        .with_quality(samples_per_pixel, DEFAULT_MAX_DEPTH);
    let mut image = PixelBuffer::new(width, height);

    for y in (0..height).rev() {
        for x in 0..width {
            let color = render_pixel(camera, scene, x, y, &config, rng);
            image.set(x, y, color_to_rgb(color));
        }
    }

    image
}

/// Render the scene as configured, bucket by bucket.
///
/// Each bucket seeds its own random stream from `config.seed` and its
/// position, so the result is the same whether buckets run serially or on
/// the rayon pool, and whatever order they finish in.
pub fn render(config: &RenderConfig, scene: &Surface, camera: &Camera) -> RenderResult<PixelBuffer> {
    config.validate()?;

    if (camera.aspect_ratio() - config.aspect_ratio()).abs() > 1e-6 {
        log::warn!(
            "Camera aspect ratio {:.4} does not match image aspect ratio {:.4}; image will be stretched",
            camera.aspect_ratio(),
            config.aspect_ratio()
        );
    }

    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} buckets ({})",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        if config.parallel { "parallel" } else { "serial" }
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = if config.parallel {
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, camera, scene, config))
            .collect()
    } else {
        buckets
            .iter()
            .map(|bucket| render_bucket(bucket, camera, scene, config))
            .collect()
    };

    let mut image = PixelBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderError;
    use crate::{Assembly, Material, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::FRAC_PI_2;

    fn pinhole(aspect: f64) -> Camera {
        Camera::new(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, FRAC_PI_2, aspect, 0.0, 1.0)
    }

    fn single_sphere(material: Material) -> Surface {
        let mut world = Assembly::new();
        world.add_object(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, material));
        world.into()
    }

    #[test]
    fn test_sky_gradient() {
        let up = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-15);

        let down = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::NEG_Y));
        assert!((down - Color::ONE).length() < 1e-15);

        let level = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::X));
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-15);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-15);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_color_to_rgb_clamps_and_rounds() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        // 255 * sqrt(0.25) = 127.5 rounds up
        assert_eq!(color_to_rgb(Color::splat(0.25)), [128, 128, 128]);
        assert_eq!(color_to_rgb(Color::new(2.0, -0.5, 1.0 + 1e-9)), [255, 0, 255]);
    }

    #[test]
    fn test_ray_color_miss_is_sky() {
        let scene = single_sphere(Material::lambertian(Vec3::splat(0.5)));
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ray_color(&ray, &scene, 50, &mut rng), sky_gradient(&ray));
    }

    #[test]
    fn test_ray_color_depth_exhausted_is_black() {
        let scene = single_sphere(Material::lambertian(Vec3::splat(0.5)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(ray_color(&ray, &scene, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_ray_color_single_bounce_off_diffuse() {
        // One bounce off a sphere alone in the sky: the result is albedo * sky,
        // which is never black and never brighter than the albedo.
        let scene = single_sphere(Material::lambertian(Vec3::splat(0.5)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..50 {
            let color = ray_color(&ray, &scene, 1, &mut rng);
            assert!(color.cmpgt(Color::ZERO).all());
            assert!(color.cmple(Color::splat(0.5)).all());
        }
    }

    #[test]
    fn test_ray_color_absorbed_is_black() {
        // Camera inside a mirror sphere: the outward normal points away from
        // the camera, so the mirror direction heads back into the surface.
        let mut world = Assembly::new();
        world.add_object(Sphere::new(Vec3::ZERO, 5.0, Material::metal(Vec3::ONE, 0.0)));
        let scene: Surface = world.into();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(ray_color(&ray, &scene, 50, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_deep_bounce_budget_inside_closed_shell() {
        // Inward-facing diffuse shell around the camera: no path ever escapes,
        // so every sample spends its whole bounce budget.
        let mut world = Assembly::new();
        world.add_object(Sphere::new(Vec3::ZERO, -5.0, Material::lambertian(Vec3::splat(0.5))));
        let scene: Surface = world.into();
        let config = RenderConfig::from_json(
            r#"{ "width": 1, "height": 1, "samples_per_pixel": 1, "max_depth": 1000000, "parallel": false }"#,
        )
        .unwrap();

        let image = render(&config, &scene, &pinhole(1.0)).unwrap();
        assert_eq!(image.pixels, vec![[0, 0, 0]]);
    }

    #[test]
    fn test_render_image_orientation() {
        let mut world = Assembly::new();
        world.add_object(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Material::lambertian(Vec3::splat(0.5)),
        ));
        let scene: Surface = world.into();
        let mut rng = StdRng::seed_from_u64(42);

        let image = render_image(20, 10, 4, &scene, &pinhole(2.0), &mut rng);
        assert_eq!(image.pixels.len(), 200);

        // Top row is open sky: blue channel is 1.0 everywhere in the gradient
        for rgb in image.row(0) {
            assert_eq!(rgb[2], 255);
            assert!(rgb[0] < 255);
        }
        // Bottom row sees the ground: at most albedo * sky
        for rgb in image.row(9) {
            assert!(rgb[2] <= 181, "{rgb:?}");
        }
    }

    #[test]
    fn test_render_image_is_reproducible() {
        let scene = single_sphere(Material::lambertian(Vec3::splat(0.5)));
        let camera = pinhole(2.0);

        let a = render_image(8, 4, 2, &scene, &camera, &mut StdRng::seed_from_u64(5));
        let b = render_image(8, 4, 2, &scene, &camera, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "image dimensions must be positive")]
    fn test_render_image_rejects_empty_image() {
        let scene = single_sphere(Material::lambertian(Vec3::splat(0.5)));
        render_image(0, 4, 1, &scene, &pinhole(1.0), &mut StdRng::seed_from_u64(0));
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let scene = single_sphere(Material::lambertian(Vec3::splat(0.5)));
        let config = RenderConfig::default().with_resolution(10, 0);
        assert!(matches!(
            render(&config, &scene, &pinhole(1.0)),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_pixel_buffer_layout() {
        let mut image = PixelBuffer::new(3, 2);
        image.set(2, 1, [1, 2, 3]);
        assert_eq!(image.get(2, 1), [1, 2, 3]);
        assert_eq!(image.row(1), &[[0, 0, 0], [0, 0, 0], [1, 2, 3]]);

        let bytes = image.to_rgb_bytes();
        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[15..], &[1, 2, 3]);
    }
}
