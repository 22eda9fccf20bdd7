//! Vertex transformation: model space to screen space.
//!
//! The combined world-view-projection matrix is built once per mesh and each
//! vertex is taken through it, perspective divided and mapped to pixel
//! coordinates. Normals and tangents only see the world matrix.

use crate::math::{ColorRGB, Mat4, Vec2, Vec3, Vec4, EPSILON};
use crate::mesh::Vertex;

/// A vertex after transformation, ready for triangle setup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexOut {
    /// x, y in pixels from the top-left; z is post-divide depth in [0, 1]
    /// for visible points; w is the clip-space w (view-space depth).
    pub position: Vec4,
    pub color: ColorRGB,
    pub uv: Vec2,
    /// World-space normal, not normalized.
    pub normal: Vec3,
    /// World-space tangent, not normalized.
    pub tangent: Vec3,
    /// From the surface toward the camera origin, not normalized.
    pub view_direction: Vec3,
}

/// Per-mesh transformation state.
#[derive(Clone, Copy, Debug)]
pub struct VertexTransformer {
    world: Mat4,
    world_view_projection: Mat4,
    camera_origin: Vec3,
    width: f32,
    height: f32,
}

impl VertexTransformer {
    pub fn new(
        world: Mat4,
        view_projection: Mat4,
        camera_origin: Vec3,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            world,
            world_view_projection: view_projection * world,
            camera_origin,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Transforms one vertex. Every vertex produces an output; vertices at
    /// or behind the camera keep their non-positive `w` and are rejected at
    /// triangle setup.
    #[inline]
    pub fn transform(&self, vertex: &Vertex) -> VertexOut {
        let clip = self.world_view_projection.transform_point(vertex.position);
        let world_position = self.world.transform_point(vertex.position).xyz();

        let inv_w = if clip.w.abs() > EPSILON { 1.0 / clip.w } else { 0.0 };
        let ndc_x = clip.x * inv_w;
        let ndc_y = clip.y * inv_w;
        let ndc_z = clip.z * inv_w;

        let screen_x = (ndc_x + 1.0) * 0.5 * self.width;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.height;

        VertexOut {
            position: Vec4::new(screen_x, screen_y, ndc_z, clip.w),
            color: vertex.color,
            uv: vertex.uv,
            normal: self.world.transform_vector(vertex.normal),
            tangent: self.world.transform_vector(vertex.tangent),
            view_direction: self.camera_origin - world_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn transformer(world: Mat4) -> VertexTransformer {
        let projection = Mat4::perspective_fov_lh(90f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::identity();
        VertexTransformer::new(world, projection * view, Vec3::ZERO, 100, 100)
    }

    fn vertex_at(position: Vec3) -> Vertex {
        Vertex::new(position, Vec2::ZERO, -Vec3::UNIT_Z, Vec3::UNIT_X)
    }

    #[test]
    fn point_on_axis_lands_at_screen_center() {
        let out = transformer(Mat4::identity()).transform(&vertex_at(Vec3::new(0.0, 0.0, 2.0)));
        assert_relative_eq!(out.position.x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(out.position.y, 50.0, epsilon = 1e-4);
        assert_relative_eq!(out.position.w, 2.0, epsilon = 1e-6);
        assert!(out.position.z > 0.0 && out.position.z < 1.0);
    }

    #[test]
    fn screen_y_points_down() {
        let t = transformer(Mat4::identity());
        let top_left = t.transform(&vertex_at(Vec3::new(-0.5, 0.5, 2.0)));
        // tan(45°) = 1, so x/z = -0.25 maps to 37.5 px; y/z = 0.25 to 37.5 px.
        assert_relative_eq!(top_left.position.x, 37.5, epsilon = 1e-3);
        assert_relative_eq!(top_left.position.y, 37.5, epsilon = 1e-3);
    }

    #[test]
    fn normals_ignore_translation() {
        let world = Mat4::translation(3.0, 4.0, 5.0);
        let out = transformer(world).transform(&vertex_at(Vec3::ZERO));
        assert_relative_eq!(out.normal.z, -1.0, epsilon = 1e-6);
        assert_relative_eq!(out.view_direction.x, -3.0, epsilon = 1e-6);
        assert_relative_eq!(out.view_direction.z, -5.0, epsilon = 1e-6);
    }

    #[test]
    fn view_direction_points_at_camera() {
        let out = transformer(Mat4::identity()).transform(&vertex_at(Vec3::new(1.0, 0.0, 2.0)));
        assert_relative_eq!(out.view_direction.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(out.view_direction.z, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn vertex_at_camera_plane_stays_finite() {
        let out = transformer(Mat4::identity()).transform(&vertex_at(Vec3::new(1.0, 1.0, 0.0)));
        assert!(out.position.w.abs() <= EPSILON);
        assert!(out.position.is_finite());
    }
}
