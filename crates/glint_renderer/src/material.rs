//! Materials describing how light scatters at a surface.

use glint_math::{is_unit, unit_vector, Vec3};
use rand::RngCore;

use crate::sampling::{gen_f64, random_in_unit_sphere};
use crate::{HitRecord, Ray};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Tolerance on unit-length preconditions of [`reflect`] and [`refract`].
const UNIT_TOLERANCE: f64 = 1e-11;

/// Outcome of a scatter event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Continuing ray, or `None` if the ray was absorbed
    pub scattered: Option<Ray>,
    /// Per-channel color multiplier
    pub attenuation: Color,
}

/// Surface material. The variant set is closed; dispatch is by `match`.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Diffuse material with the given albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(Lambertian::new(albedo))
    }

    /// Metal with the given albedo and fuzz (clamped to `[0, 1]`).
    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    /// Clear dielectric with the given refractive index.
    pub fn dielectric(refractive_index: f64) -> Self {
        Material::Dielectric(Dielectric::new(refractive_index))
    }

    /// Scatter an incoming ray at a hit point.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        match self {
            Material::Lambertian(m) => m.scatter(rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

fn assert_albedo(albedo: Color) {
    assert!(
        albedo.cmpge(Color::ZERO).all() && albedo.cmple(Color::ONE).all(),
        "albedo must lie in [0, 1]^3, got {albedo:?}"
    );
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        assert_albedo(albedo);
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    fn scatter(&self, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let direction = rec.normal + random_in_unit_sphere(rng);
        ScatterResult {
            scattered: Some(Ray::new(rec.point, direction)),
            attenuation: self.albedo,
        }
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        assert_albedo(albedo);
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let reflected = reflect(unit_vector(ray_in.direction()), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Perturbed below the surface: absorbed, but the albedo is still reported
        let scattered = (direction.dot(rec.normal) > 0.0).then(|| Ray::new(rec.point, direction));
        ScatterResult {
            scattered,
            attenuation: self.albedo,
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dielectric {
    refractive_index: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refractive_index: f64) -> Self {
        assert!(
            refractive_index > 0.0,
            "refractive index must be positive, got {refractive_index}"
        );
        Self { refractive_index }
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> ScatterResult {
        let ri = self.refractive_index;
        let unit_direction = unit_vector(ray_in.direction());
        let reflected = reflect(unit_direction, rec.normal);

        // Positive cosine: travelling along the normal, i.e. leaving the medium
        let mut cosine = unit_direction.dot(rec.normal);
        let refracted = if cosine > 0.0 {
            refract(unit_direction, -rec.normal, ri)
        } else {
            cosine = -cosine;
            refract(unit_direction, rec.normal, 1.0 / ri)
        };

        let reflect_prob = match refracted {
            Some(_) => schlick(cosine, ri),
            None => 1.0,
        };

        // Always draw, so the stream advances the same under total internal reflection
        let direction = match refracted {
            Some(refracted) if gen_f64(rng) >= reflect_prob => refracted,
            Some(_) => reflected,
            None => {
                gen_f64(rng);
                reflected
            }
        };

        ScatterResult {
            scattered: Some(Ray::new(rec.point, direction)),
            attenuation: Color::ONE,
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect `v` about the plane with unit normal `n`.
///
/// # Panics
///
/// Panics if `n` is not unit length.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    assert!(is_unit(n, UNIT_TOLERANCE), "surface normal must be normalized");
    v - 2.0 * v.dot(n) * n
}

/// Refract unit direction `v` through the surface with unit normal `n`
/// (Snell's law). Returns `None` on total internal reflection.
///
/// # Panics
///
/// Panics if `v` or `n` is not unit length.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f64) -> Option<Vec3> {
    assert!(is_unit(v, UNIT_TOLERANCE), "input ray direction must be normalized");
    assert!(is_unit(n, UNIT_TOLERANCE), "surface normal must be normalized");

    let dt = v.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (v - n * dt) - discriminant.sqrt() * n)
    } else {
        None
    }
}

/// Schlick's approximation of the Fresnel reflectance.
#[inline]
pub fn schlick(cosine: f64, ref_idx: f64) -> f64 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
