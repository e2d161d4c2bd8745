//! Sphere primitive for ray tracing.

use std::sync::Arc;

use crate::{HitRecord, Material, Ray};
use glint_math::{Interval, Vec3};

/// A sphere primitive.
///
/// A negative radius keeps the same geometry but flips the normal inward,
/// which is how hollow glass shells are modeled.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Pass an `Arc<Material>` to share one material between several spheres.
    pub fn new(center: Vec3, radius: f64, material: impl Into<Arc<Material>>) -> Self {
        Self {
            center,
            radius,
            material: material.into(),
        }
    }

    /// Get the sphere center.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Get the (signed) radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the shared material.
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Nearest intersection with parameter in `ray_t`.
    ///
    /// Solves `a t^2 + 2 b t + c = 0`. The first root is taken with the sign
    /// of `b` to avoid cancellation, the second from the product of roots
    /// `c / a`. `b == 0` counts as positive so `t1` is never zero there.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sign = if b < 0.0 { -1.0 } else { 1.0 };
        let t1 = -(b + sign * discriminant.sqrt()) / a;
        let t2 = c / (a * t1);
        let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

        let t = [near, far].into_iter().find(|&t| ray_t.contains(t))?;
        let point = ray.at(t);
        let normal = (point - self.center) / self.radius;
        Some(HitRecord::new(point, normal, t, &self.material))
    }
}
