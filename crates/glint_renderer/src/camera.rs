//! Thin-lens camera for ray generation.

use crate::sampling::random_in_unit_disk;
use crate::Ray;
use glint_math::{unit_vector, Vec3};
use rand::RngCore;

/// Camera generating rays through a focus-plane window.
///
/// Immutable once built; share it read-only between render threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    // Orthonormal basis: u right, v up, w backward
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Create a camera.
    ///
    /// - `look_from`: eye position
    /// - `look_at`: point the camera is oriented towards
    /// - `vup`: "up" hint, must not be parallel to the view direction
    /// - `vfov`: vertical field of view, top to bottom, in radians
    /// - `aspect`: width / height of the focus window
    /// - `aperture`: lens diameter, 0 for a pinhole
    /// - `focus_dist`: distance from the eye to the plane of perfect focus
    pub fn new(
        look_from: Vec3,
        look_at: Vec3,
        vup: Vec3,
        vfov: f64,
        aspect: f64,
        aperture: f64,
        focus_dist: f64,
    ) -> Self {
        let half_height = (vfov / 2.0).tan();
        let half_width = aspect * half_height;

        let w = unit_vector(look_from - look_at);
        let u = unit_vector(vup.cross(w));
        let v = w.cross(u);

        let lower_left_corner = look_from
            - half_width * focus_dist * u
            - half_height * focus_dist * v
            - focus_dist * w;

        Self {
            origin: look_from,
            lower_left_corner,
            horizontal: 2.0 * half_width * focus_dist * u,
            vertical: 2.0 * half_height * focus_dist * v,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        }
    }

    /// Generate a ray through relative window coordinates `(s, t)` in `[0, 1]`,
    /// `(0, 0)` being the lower-left corner.
    ///
    /// The origin is jittered over the lens disk for depth of field. The lens
    /// sample is drawn even for a pinhole so the random stream advances the
    /// same way for every aperture.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = rd.x * self.u + rd.y * self.v;
        let ray_origin = self.origin + offset;
        let direction =
            self.lower_left_corner + s * self.horizontal + t * self.vertical - ray_origin;
        Ray::new(ray_origin, direction)
    }

    /// Eye position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal camera basis `(u, v, w)`.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }

    /// Width / height of the focus window.
    pub fn aspect_ratio(&self) -> f64 {
        self.horizontal.length() / self.vertical.length()
    }
}
