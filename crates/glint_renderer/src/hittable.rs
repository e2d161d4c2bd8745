//! Surfaces that rays can hit, and the record of where they hit.

use crate::{Material, Ray, Sphere};
use glint_math::{is_unit, Interval, Vec3};

/// Tolerance on `|normal| - 1` accepted by [`HitRecord::new`].
pub const NORMAL_TOLERANCE: f64 = 1e-13;

/// Record of a ray-surface intersection.
///
/// Hit records are transient: they borrow the material of the surface that
/// produced them and live only as long as the scatter call consuming them.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Outward surface normal (inward for negative-radius spheres), unit length
    pub normal: Vec3,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Create a hit record.
    ///
    /// # Panics
    ///
    /// Panics if `normal` is not unit length within [`NORMAL_TOLERANCE`].
    pub fn new(point: Vec3, normal: Vec3, t: f64, material: &'a Material) -> Self {
        assert!(
            is_unit(normal, NORMAL_TOLERANCE),
            "hit record normal must be normalized, got |n| = {}",
            normal.length()
        );
        Self {
            point,
            normal,
            t,
            material,
        }
    }
}

/// Anything a ray can be intersected with.
///
/// The set of surface kinds is closed, so dispatch is a `match` rather than
/// a trait object.
#[derive(Debug, Clone)]
pub enum Surface {
    Sphere(Sphere),
    Assembly(Assembly),
}

impl Surface {
    /// Nearest intersection with parameter in `ray_t` (`[min, max)`), if any.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Surface::Sphere(sphere) => sphere.hit(ray, ray_t),
            Surface::Assembly(assembly) => assembly.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Surface {
    fn from(sphere: Sphere) -> Self {
        Surface::Sphere(sphere)
    }
}

impl From<Assembly> for Surface {
    fn from(assembly: Assembly) -> Self {
        Surface::Assembly(assembly)
    }
}

/// An ordered collection of surfaces, intersected as one.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    objects: Vec<Surface>,
}

impl Assembly {
    /// Create a new empty assembly.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Append a surface. The assembly takes ownership.
    pub fn add_object(&mut self, object: impl Into<Surface>) {
        self.objects.push(object.into());
    }

    /// Get the number of member surfaces.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the assembly is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Member surfaces in insertion order.
    pub fn objects(&self) -> &[Surface] {
        &self.objects
    }

    /// Closest hit over all members.
    ///
    /// Each member is queried with the upper bound tightened to the closest
    /// hit found so far, so whatever hit is recorded last is the nearest.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
