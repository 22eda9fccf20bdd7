//! Pixel shaders.
//!
//! The rasterizer handles coverage, depth and attribute interpolation and
//! hands each surviving pixel to a [`PixelShader`] as a [`Fragment`]. The
//! shader only decides the color.
//!
//! [`SurfaceShader`] is the lit path: it resolves the surface maps of one
//! mesh (diffuse, tangent-space normal, gloss, specular) and evaluates either
//! the mesh's [`Material`] or the active [`LightingMode`]. [`DepthShader`]
//! draws the depth buffer as grey instead.

use super::material::{lambert, phong, Material};
use crate::math::{ColorRGB, Vec2, Vec3, Vec4};
use crate::mesh::SurfaceMaps;
use crate::projection::Projection;
use crate::settings::{LightingMode, RenderSettings};

/// Interpolated attributes at one pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    /// Screen x, y in pixels, NDC z and view depth in w.
    pub position: Vec4,
    /// Post-divide depth, as stored in the depth buffer.
    pub depth: f32,
    pub color: ColorRGB,
    pub uv: Vec2,
    /// Unit world-space normal.
    pub normal: Vec3,
    /// Unit world-space tangent.
    pub tangent: Vec3,
    /// Unit vector from the surface toward the camera.
    pub view_direction: Vec3,
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            position: Vec4::ZERO,
            depth: 0.0,
            color: ColorRGB::WHITE,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
            view_direction: Vec3::ZERO,
        }
    }
}

impl Fragment {
    pub fn is_finite(&self) -> bool {
        self.depth.is_finite()
            && self.position.is_finite()
            && self.color.is_finite()
            && self.uv.x.is_finite()
            && self.uv.y.is_finite()
            && self.normal.is_finite()
            && self.tangent.is_finite()
            && self.view_direction.is_finite()
    }
}

/// Trait for per-pixel shading computations.
///
/// Shaders are shared by every rasterizer worker, hence `Sync`.
pub trait PixelShader: Sync {
    fn shade(&self, fragment: &Fragment) -> ColorRGB;
}

/// Lights a mesh's fragments with the scene's directional light.
pub struct SurfaceShader<'a> {
    settings: &'a RenderSettings,
    maps: &'a SurfaceMaps,
    material: Option<&'a Material>,
}

impl<'a> SurfaceShader<'a> {
    pub fn new(
        settings: &'a RenderSettings,
        maps: &'a SurfaceMaps,
        material: Option<&'a Material>,
    ) -> Self {
        Self {
            settings,
            maps,
            material,
        }
    }

    /// World-space normal after applying the normal map, if any.
    fn surface_normal(&self, fragment: &Fragment) -> Vec3 {
        let normal_map = match (&self.maps.normal, self.settings.use_normal_map) {
            (Some(map), true) => map,
            _ => return fragment.normal,
        };

        let texel = normal_map.sample(fragment.uv, self.settings.sample_mode);
        let sampled = Vec3::new(
            2.0 * texel.r - 1.0,
            2.0 * texel.g - 1.0,
            2.0 * texel.b - 1.0,
        );
        let n = fragment.normal;
        let t = fragment.tangent;
        let binormal = n.cross(t);
        let mapped = (t * sampled.x + binormal * sampled.y + n * sampled.z).normalize();
        if mapped == Vec3::ZERO {
            n
        } else {
            mapped
        }
    }
}

impl PixelShader for SurfaceShader<'_> {
    fn shade(&self, fragment: &Fragment) -> ColorRGB {
        let mode = self.settings.sample_mode;
        let uv = fragment.uv;
        let light = &self.settings.light;
        let light_dir = light.direction();

        let normal = self.surface_normal(fragment);
        let observed_area = light.observed_area(normal);

        if let Some(material) = self.material {
            let lit = Fragment {
                normal,
                ..*fragment
            };
            return material.shade(&lit, light_dir, fragment.view_direction)
                * (light.intensity * observed_area);
        }

        let color = self
            .maps
            .diffuse
            .as_ref()
            .map_or(fragment.color, |map| map.sample(uv, mode));
        let gloss = self.maps.gloss.as_ref().map_or(1.0, |map| map.sample(uv, mode).r);
        let ks = self
            .maps
            .specular
            .as_ref()
            .map_or(ColorRGB::WHITE, |map| map.sample(uv, mode));

        let diffuse = || lambert(color, light.intensity) * observed_area;
        let specular = || {
            phong(
                ks,
                gloss * self.settings.shininess,
                light_dir,
                fragment.view_direction,
                normal,
            )
        };

        match self.settings.lighting_mode {
            LightingMode::ObservedArea => ColorRGB::grey(observed_area),
            LightingMode::Diffuse => diffuse(),
            LightingMode::Specular => specular(),
            LightingMode::Combined => diffuse() + specular(),
        }
    }
}

/// Visualizes depth as grey, brighter is farther.
pub struct DepthShader {
    projection: Projection,
}

impl DepthShader {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }
}

impl PixelShader for DepthShader {
    #[inline]
    fn shade(&self, fragment: &Fragment) -> ColorRGB {
        ColorRGB::grey(self.projection.remap_depth(fragment.depth))
    }
}

/// Returns the same color for every pixel.
pub struct FlatShader {
    color: ColorRGB,
}

impl FlatShader {
    pub fn new(color: ColorRGB) -> Self {
        Self { color }
    }
}

impl PixelShader for FlatShader {
    #[inline]
    fn shade(&self, _fragment: &Fragment) -> ColorRGB {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::DirectionalLight;
    use crate::texture::Texture;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;
    use std::sync::Arc;

    fn head_on_settings(mode: LightingMode) -> RenderSettings {
        RenderSettings {
            light: DirectionalLight::new(Vec3::UNIT_Z, 7.0),
            lighting_mode: mode,
            ..RenderSettings::default()
        }
    }

    fn facing_fragment() -> Fragment {
        Fragment {
            color: ColorRGB::new(0.5, 0.25, 1.0),
            normal: -Vec3::UNIT_Z,
            tangent: Vec3::UNIT_X,
            view_direction: -Vec3::UNIT_Z,
            ..Fragment::default()
        }
    }

    #[test]
    fn observed_area_is_grey_cosine() {
        let settings = head_on_settings(LightingMode::ObservedArea);
        let maps = SurfaceMaps::default();
        let c = SurfaceShader::new(&settings, &maps, None).shade(&facing_fragment());
        assert_eq!(c, ColorRGB::grey(1.0));
    }

    #[test]
    fn diffuse_uses_vertex_color_without_map() {
        let settings = head_on_settings(LightingMode::Diffuse);
        let maps = SurfaceMaps::default();
        let c = SurfaceShader::new(&settings, &maps, None).shade(&facing_fragment());
        assert_relative_eq!(c.r, 0.5 * 7.0 / PI, epsilon = 1e-5);
        assert_relative_eq!(c.b, 7.0 / PI, epsilon = 1e-5);
    }

    #[test]
    fn diffuse_map_overrides_vertex_color() {
        let settings = head_on_settings(LightingMode::Diffuse);
        let maps = SurfaceMaps {
            diffuse: Some(Arc::new(Texture::solid(ColorRGB::new(1.0, 0.0, 0.0)))),
            ..SurfaceMaps::default()
        };
        let c = SurfaceShader::new(&settings, &maps, None).shade(&facing_fragment());
        assert_relative_eq!(c.r, 7.0 / PI, epsilon = 1e-5);
        assert_relative_eq!(c.g, 0.0);
    }

    #[test]
    fn combined_is_diffuse_plus_specular() {
        let maps = SurfaceMaps::default();
        let frag = facing_fragment();
        let diffuse = SurfaceShader::new(&head_on_settings(LightingMode::Diffuse), &maps, None)
            .shade(&frag);
        let specular = SurfaceShader::new(&head_on_settings(LightingMode::Specular), &maps, None)
            .shade(&frag);
        let combined = SurfaceShader::new(&head_on_settings(LightingMode::Combined), &maps, None)
            .shade(&frag);
        assert_relative_eq!(combined.g, diffuse.g + specular.g, epsilon = 1e-5);
        // Light straight on, viewer straight on: full highlight.
        assert_relative_eq!(specular.r, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn flat_normal_map_keeps_geometric_normal() {
        let mut settings = head_on_settings(LightingMode::ObservedArea);
        let maps = SurfaceMaps {
            normal: Some(Arc::new(Texture::solid(ColorRGB::new(0.5, 0.5, 1.0)))),
            ..SurfaceMaps::default()
        };
        let frag = facing_fragment();
        let shader = SurfaceShader::new(&settings, &maps, None);
        assert_relative_eq!(shader.surface_normal(&frag).z, -1.0, epsilon = 1e-2);

        settings.use_normal_map = false;
        let shader = SurfaceShader::new(&settings, &maps, None);
        assert_eq!(shader.surface_normal(&frag), frag.normal);
    }

    #[test]
    fn tilted_normal_map_reduces_observed_area() {
        let settings = head_on_settings(LightingMode::ObservedArea);
        let maps = SurfaceMaps {
            normal: Some(Arc::new(Texture::solid(ColorRGB::new(1.0, 0.5, 0.5)))),
            ..SurfaceMaps::default()
        };
        let c = SurfaceShader::new(&settings, &maps, None).shade(&facing_fragment());
        assert!(c.r < 0.1);
    }

    #[test]
    fn material_replaces_lighting_mode() {
        let settings = head_on_settings(LightingMode::ObservedArea);
        let maps = SurfaceMaps::default();
        let material = Material::SolidColor(ColorRGB::new(0.1, 0.2, 0.3));
        let c = SurfaceShader::new(&settings, &maps, Some(&material)).shade(&facing_fragment());
        assert_relative_eq!(c.r, 0.7, epsilon = 1e-5);
        assert_relative_eq!(c.b, 2.1, epsilon = 1e-5);
    }

    #[test]
    fn depth_shader_maps_far_plane_to_white() {
        let shader = DepthShader::new(Projection::from_degrees(90.0, 1.0, 0.1, 100.0));
        let frag = Fragment {
            depth: 1.0,
            ..Fragment::default()
        };
        assert_relative_eq!(shader.shade(&frag).r, 1.0, epsilon = 1e-5);
    }
}
