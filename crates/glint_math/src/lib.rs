// Re-export glam for convenience
pub use glam;
pub use glam::{DVec2, DVec3};

/// Double precision vector used for points, directions and colors.
///
/// Hit-point tolerances are on the order of `1e-13`, so everything runs in `f64`.
pub type Vec3 = DVec3;

/// Double precision 2D vector (lens samples).
pub type Vec2 = DVec2;

// Glint math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Normalize `v`, returning it unchanged when its length is zero.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    let n = v.length();
    if n > 0.0 {
        v / n
    } else {
        v
    }
}

/// Returns true if `v` has unit length within `tolerance`.
#[inline]
pub fn is_unit(v: Vec3, tolerance: f64) -> bool {
    (v.length() - 1.0).abs() < tolerance
}
