//! The scene's single directional light.

use crate::math::Vec3;

/// A directional light that illuminates the scene uniformly from a direction.
///
/// Directional lights are ideal for simulating distant light sources like the sun,
/// where all rays are effectively parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light travels (not where it comes from).
    direction: Vec3,
    /// Radiance scale applied to diffuse reflectance.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(0.577, -0.577, 0.577), 7.0)
    }
}

impl DirectionalLight {
    /// Create a new directional light pointing in the given direction.
    /// The direction will be normalized automatically.
    pub fn new(direction: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction.normalize(),
            intensity,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize();
    }

    /// Cosine falloff term: how directly a surface with `normal` faces the light.
    ///
    /// Returns a value in [0.0, 1.0].
    pub fn observed_area(&self, normal: Vec3) -> f32 {
        // Negate direction: light pointing at surface = positive dot product
        normal.dot(-self.direction).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direct_illumination_is_full() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert_relative_eq!(light.observed_area(Vec3::UNIT_Z), 1.0);
    }

    #[test]
    fn surface_facing_away_is_dark() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0), 1.0);
        assert_eq!(light.observed_area(-Vec3::UNIT_Z), 0.0);
    }

    #[test]
    fn angled_illumination_follows_cosine() {
        let light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0), 1.0);
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(light.observed_area(normal), 0.707, epsilon = 1e-3);
    }

    #[test]
    fn default_direction_is_unit_length() {
        let light = DirectionalLight::default();
        assert_relative_eq!(light.direction().magnitude(), 1.0, epsilon = 1e-6);
    }
}
