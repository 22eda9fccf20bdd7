//! Perspective projection parameters.
//!
//! [`Projection`] is the single source of truth for the vertical field of
//! view, aspect ratio and clip distances. The camera rebuilds its matrix from
//! it only when one of those inputs changes.

use crate::math::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Width divided by height.
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Sets the vertical field of view in radians.
    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    /// Updates the aspect ratio (typically called on window resize).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Left-handed perspective matrix mapping depth to [0, 1].
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_fov_lh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }

    /// Maps a post-divide depth value back to a [0, 1] grey level for the
    /// depth visualization: `2n / (f + n - d(f - n))`.
    #[inline]
    pub fn remap_depth(&self, depth: f32) -> f32 {
        let (n, f) = (self.z_near, self.z_far);
        (2.0 * n) / (f + n - depth * (f - n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn from_degrees_converts_correctly() {
        let proj = Projection::from_degrees(90.0, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.fov_y(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn near_and_far_planes_map_to_unit_depth_range() {
        let proj = Projection::from_degrees(90.0, 1.0, 0.1, 100.0);
        let m = proj.matrix();

        let near = m.transform_point(Vec3::new(0.0, 0.0, 0.1));
        let far = m.transform_point(Vec3::new(0.0, 0.0, 100.0));
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn remap_depth_is_monotonic() {
        let proj = Projection::from_degrees(90.0, 1.0, 0.1, 100.0);
        assert_relative_eq!(proj.remap_depth(0.0), 2.0 * 0.1 / 100.1, epsilon = 1e-6);
        assert_relative_eq!(proj.remap_depth(1.0), 1.0, epsilon = 1e-6);
        assert!(proj.remap_depth(0.5) < proj.remap_depth(0.9));
    }

    #[test]
    fn wider_aspect_narrows_x_scale() {
        let square = Projection::from_degrees(90.0, 1.0, 0.1, 100.0).matrix();
        let wide = Projection::from_degrees(90.0, 2.0, 0.1, 100.0).matrix();
        assert_relative_eq!(wide.get(0, 0), square.get(0, 0) / 2.0, epsilon = 1e-6);
        assert_relative_eq!(wide.get(1, 1), square.get(1, 1), epsilon = 1e-6);
    }
}
