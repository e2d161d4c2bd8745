//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon. Each bucket carries its own
//! random stream so results do not depend on scheduling.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::{color_to_rgb, render_pixel};
use crate::{Camera, RenderConfig, Surface};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance from the bucket's midpoint to `point`.
    fn distance_to_sq(&self, point: (f64, f64)) -> f64 {
        let mid_x = self.x as f64 + self.width as f64 / 2.0;
        let mid_y = self.y as f64 + self.height as f64 / 2.0;
        (mid_x - point.0).powi(2) + (mid_y - point.1).powi(2)
    }

    /// Seed for this bucket's random stream.
    ///
    /// Depends on the render seed and the bucket's position only, never on
    /// its index, so reordering buckets leaves the image unchanged.
    pub fn seed(&self, render_seed: u64) -> u64 {
        let position = (u64::from(self.x) << 32) | u64::from(self.y);
        splitmix64(render_seed ^ splitmix64(position))
    }
}

/// SplitMix64 finalizer; spreads nearby inputs over the whole seed space.
fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Tile a `width` x `height` image into square buckets of `bucket_size`.
///
/// Edge buckets are clipped to the image. Buckets are ordered center-out
/// (nearest first, ties in row-major order) and `index` records that order.
/// The order only affects scheduling: each bucket's pixels depend on its
/// position alone, see [`Bucket::seed`].
///
/// # Panics
///
/// Panics if `bucket_size` is zero.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(bucket_size as usize)
        .flat_map(|y| {
            (0..width).step_by(bucket_size as usize).map(move |x| {
                let w = bucket_size.min(width - x);
                let h = bucket_size.min(height - y);
                Bucket::new(x, y, w, h, 0)
            })
        })
        .collect();

    let center = (width as f64 / 2.0, height as f64 / 2.0);
    buckets.sort_by(|a, b| a.distance_to_sq(center).total_cmp(&b.distance_to_sq(center)));
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }

    buckets
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Quantized pixels in row-major order within the bucket
    pub pixels: Vec<[u8; 3]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 3]>) -> Self {
        Self { bucket, pixels }
    }
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket, top row first.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Surface,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let global_x = bucket.x + local_x;
            let global_y = bucket.y + local_y;
            let color = render_pixel(camera, scene, global_x, global_y, config, &mut rng);
            pixels.push(color_to_rgb(color));
        }
    }

    log::debug!(
        "Bucket {} at ({}, {}) done: {} pixels",
        bucket.index,
        bucket.x,
        bucket.y,
        pixels.len()
    );

    BucketResult::new(*bucket, pixels)
}
