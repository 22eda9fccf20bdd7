//! Materials and the BRDF terms they are built from.
//!
//! Direction conventions: `light_dir` points from the light into the scene,
//! `view_dir` points from the surface toward the camera. Both are unit
//! length. Normals come from the shaded [`Fragment`].

use std::f32::consts::PI;

use super::shader::Fragment;
use crate::math::{ColorRGB, Vec3, EPSILON};

/// Reflectance at normal incidence for dielectrics.
const DIELECTRIC_F0: f32 = 0.04;

/// A closed set of surface materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Constant albedo with no BRDF; the shader still scales it by the
    /// light's intensity and observed area.
    SolidColor(ColorRGB),
    /// Ideal diffuse reflector.
    Lambert { color: ColorRGB, reflectance: f32 },
    /// Lambert diffuse plus a Phong highlight.
    LambertPhong {
        color: ColorRGB,
        reflectance: f32,
        specular: ColorRGB,
        exponent: f32,
    },
    /// Microfacet specular (GGX, Smith, Schlick) over a Lambert base.
    CookTorrance {
        albedo: ColorRGB,
        metalness: f32,
        /// 0 is mirror smooth, 1 is fully rough.
        roughness: f32,
    },
}

impl Material {
    /// Polished copper, the usual Cook-Torrance showcase.
    pub const COPPER: Material = Material::CookTorrance {
        albedo: ColorRGB::new(0.955, 0.637, 0.538),
        metalness: 1.0,
        roughness: 0.1,
    };

    /// Outgoing radiance factor for one light, before light intensity and
    /// the cosine term are applied.
    pub fn shade(&self, fragment: &Fragment, light_dir: Vec3, view_dir: Vec3) -> ColorRGB {
        match *self {
            Material::SolidColor(color) => color,
            Material::Lambert { color, reflectance } => lambert(color, reflectance),
            Material::LambertPhong {
                color,
                reflectance,
                specular,
                exponent,
            } => {
                lambert(color, reflectance)
                    + phong(specular, exponent, light_dir, view_dir, fragment.normal)
            }
            Material::CookTorrance {
                albedo,
                metalness,
                roughness,
            } => cook_torrance(albedo, metalness, roughness, fragment.normal, light_dir, view_dir),
        }
    }
}

fn cook_torrance(
    albedo: ColorRGB,
    metalness: f32,
    roughness: f32,
    normal: Vec3,
    light_dir: Vec3,
    view_dir: Vec3,
) -> ColorRGB {
    let to_light = -light_dir;
    let alpha = roughness * roughness;
    let is_metal = metalness > 0.0;
    let f0 = if is_metal {
        albedo
    } else {
        ColorRGB::grey(DIELECTRIC_F0)
    };

    let half = (view_dir + to_light).normalize();
    let fresnel = fresnel_schlick(half, view_dir, f0);
    let distribution = normal_distribution_ggx(normal, half, alpha);
    let geometry = geometry_smith(normal, view_dir, to_light, alpha);

    let n_dot_v = normal.dot(view_dir).max(0.0);
    let n_dot_l = normal.dot(to_light).max(0.0);
    let denominator = 4.0 * n_dot_v * n_dot_l;
    let specular = if denominator > EPSILON {
        fresnel * (distribution * geometry / denominator)
    } else {
        ColorRGB::BLACK
    };

    let kd = if is_metal {
        ColorRGB::BLACK
    } else {
        ColorRGB::WHITE - fresnel
    };
    specular + lambert_tinted(albedo, kd)
}

/// Lambert diffuse: `cd * kd / π`.
#[inline]
pub fn lambert(color: ColorRGB, kd: f32) -> ColorRGB {
    color * (kd / PI)
}

/// Lambert diffuse with a per-channel reflectance.
#[inline]
pub fn lambert_tinted(color: ColorRGB, kd: ColorRGB) -> ColorRGB {
    color * kd / PI
}

/// Phong specular lobe around the reflected light direction.
#[inline]
pub fn phong(
    ks: ColorRGB,
    exponent: f32,
    light_dir: Vec3,
    view_dir: Vec3,
    normal: Vec3,
) -> ColorRGB {
    let reflected = light_dir.reflect(normal);
    let cos_alpha = reflected.dot(view_dir).max(0.0);
    ks * cos_alpha.powf(exponent)
}

/// Schlick's approximation of the Fresnel term.
#[inline]
pub fn fresnel_schlick(half: Vec3, view_dir: Vec3, f0: ColorRGB) -> ColorRGB {
    let factor = (1.0 - half.dot(view_dir).clamp(0.0, 1.0)).powi(5);
    f0 + (ColorRGB::WHITE - f0) * factor
}

/// Trowbridge-Reitz GGX normal distribution, `alpha` is roughness squared.
#[inline]
pub fn normal_distribution_ggx(normal: Vec3, half: Vec3, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let n_dot_h = normal.dot(half).max(0.0);
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    let denominator = PI * d * d;
    if denominator > EPSILON {
        a2 / denominator
    } else {
        0.0
    }
}

/// Schlick-GGX masking for one direction with remapped `k`.
#[inline]
fn geometry_schlick_ggx(normal: Vec3, dir: Vec3, k: f32) -> f32 {
    let n_dot = normal.dot(dir).max(0.0);
    let denominator = n_dot * (1.0 - k) + k;
    if denominator > EPSILON {
        n_dot / denominator
    } else {
        0.0
    }
}

/// Smith shadowing-masking: product of the view and light terms with
/// `k = (α + 1)² / 8`.
#[inline]
pub fn geometry_smith(normal: Vec3, view_dir: Vec3, to_light: Vec3, alpha: f32) -> f32 {
    let k = (alpha + 1.0) * (alpha + 1.0) / 8.0;
    geometry_schlick_ggx(normal, view_dir, k) * geometry_schlick_ggx(normal, to_light, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fragment_with_normal(normal: Vec3) -> Fragment {
        Fragment {
            normal,
            ..Fragment::default()
        }
    }

    #[test]
    fn lambert_divides_by_pi() {
        let c = lambert(ColorRGB::WHITE, PI);
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn phong_peaks_on_mirror_direction() {
        let n = Vec3::UNIT_Y;
        let l = Vec3::new(1.0, -1.0, 0.0).normalize();
        let mirror = Vec3::new(1.0, 1.0, 0.0).normalize();
        let peak = phong(ColorRGB::WHITE, 25.0, l, mirror, n);
        assert_relative_eq!(peak.g, 1.0, epsilon = 1e-5);

        let off = phong(ColorRGB::WHITE, 25.0, l, Vec3::UNIT_Y, n);
        assert!(off.g < 0.01);
    }

    #[test]
    fn phong_is_zero_behind_reflection() {
        let n = Vec3::UNIT_Y;
        let l = -Vec3::UNIT_Y;
        let c = phong(ColorRGB::WHITE, 2.0, l, -Vec3::UNIT_Y, n);
        assert_eq!(c, ColorRGB::BLACK);
    }

    #[test]
    fn fresnel_at_normal_incidence_is_f0() {
        let f = fresnel_schlick(Vec3::UNIT_Y, Vec3::UNIT_Y, ColorRGB::grey(0.04));
        assert_relative_eq!(f.r, 0.04, epsilon = 1e-6);
        let grazing = fresnel_schlick(Vec3::UNIT_Y, Vec3::UNIT_X, ColorRGB::grey(0.04));
        assert_relative_eq!(grazing.r, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn ggx_is_highest_when_aligned() {
        let aligned = normal_distribution_ggx(Vec3::UNIT_Y, Vec3::UNIT_Y, 0.25);
        let half = Vec3::new(1.0, 1.0, 0.0).normalize();
        let tilted = normal_distribution_ggx(Vec3::UNIT_Y, half, 0.25);
        assert!(aligned > tilted);
        assert_relative_eq!(aligned, 1.0 / (PI * 0.0625), epsilon = 1e-3);
    }

    #[test]
    fn smith_is_one_head_on() {
        let g = geometry_smith(Vec3::UNIT_Y, Vec3::UNIT_Y, Vec3::UNIT_Y, 0.5);
        assert_relative_eq!(g, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn solid_color_ignores_directions() {
        let m = Material::SolidColor(ColorRGB::new(0.2, 0.4, 0.6));
        let c = m.shade(&fragment_with_normal(Vec3::UNIT_Y), Vec3::UNIT_Y, Vec3::UNIT_X);
        assert_eq!(c, ColorRGB::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn metal_has_no_diffuse_when_light_is_behind() {
        let frag = fragment_with_normal(Vec3::UNIT_Y);
        // Light coming from below the surface.
        let c = Material::COPPER.shade(&frag, Vec3::UNIT_Y, Vec3::UNIT_Y);
        assert_eq!(c, ColorRGB::BLACK);
    }

    #[test]
    fn dielectric_cook_torrance_keeps_diffuse() {
        let m = Material::CookTorrance {
            albedo: ColorRGB::WHITE,
            metalness: 0.0,
            roughness: 1.0,
        };
        let frag = fragment_with_normal(Vec3::UNIT_Y);
        let c = m.shade(&frag, -Vec3::UNIT_Y, Vec3::UNIT_Y);
        assert!(c.is_finite());
        assert!(c.r > 0.96 / PI - 1e-3);
    }
}
