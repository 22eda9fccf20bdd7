//! First-person camera
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! # Lifecycle
//!
//! A [`Camera`] starts uninitialized and must be given a field of view and an
//! origin through [`Camera::initialize`] before it can be updated. Once
//! active, every [`Camera::update`] applies the frame's [`CameraInput`],
//! rebuilds the view matrix and, only if the field of view or aspect ratio
//! changed, the projection matrix.
//!
//! # Orientation
//!
//! Orientation is stored as accumulated yaw/pitch in degrees.
//!
//! - **Yaw**: rotation around Y, positive turns right
//! - **Pitch**: rotation around X, positive looks up, clamped to ±89°

use crate::error::RenderError;
use crate::math::{Mat4, Vec3};
use crate::projection::Projection;
use crate::timer::FrameTime;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
const PITCH_LIMIT_DEGREES: f32 = 89.0;
/// Left-drag dolly speed relative to keyboard movement.
const DRAG_MOVE_FACTOR: f32 = 13.0;

/// Movement intents and mouse state gathered by the window for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Multiplies every movement speed by the boost factor.
    pub boost: bool,
    /// Relative mouse motion in pixels since the last frame.
    pub mouse_delta: (i32, i32),
    pub left_button: bool,
    pub right_button: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraState {
    Uninitialized,
    Active,
}

/// First-person camera producing view and projection matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    state: CameraState,
    origin: Vec3,
    yaw: f32,
    pitch: f32,

    forward: Vec3,
    up: Vec3,
    right: Vec3,

    projection: Projection,
    projection_dirty: bool,
    view_matrix: Mat4,
    projection_matrix: Mat4,

    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Speed multiplier while boosting.
    pub boost_factor: f32,
    /// Degrees per mouse pixel per second.
    pub rotation_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            state: CameraState::Uninitialized,
            origin: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            forward: Vec3::UNIT_Z,
            up: Vec3::UNIT_Y,
            right: Vec3::UNIT_X,
            projection: Projection::from_degrees(90.0, 1.0, NEAR_PLANE, FAR_PLANE),
            projection_dirty: true,
            view_matrix: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            move_speed: 10.0,
            boost_factor: 10.0,
            rotation_speed: 8.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the camera at `origin` with a vertical field of view in
    /// degrees. Matrices are valid immediately afterwards.
    pub fn initialize(&mut self, fov_degrees: f32, origin: Vec3) {
        self.projection.set_fov_y(fov_degrees.to_radians());
        self.projection_dirty = true;
        self.origin = origin;
        self.state = CameraState::Active;
        self.rebuild_matrices();
        log::debug!("camera initialized at {origin:?}, fov {fov_degrees}°");
    }

    pub fn is_initialized(&self) -> bool {
        self.state == CameraState::Active
    }

    /// Applies one frame of input and refreshes the matrices.
    pub fn update(&mut self, time: FrameTime, input: &CameraInput) -> Result<(), RenderError> {
        if self.state != CameraState::Active {
            return Err(RenderError::CameraNotInitialized);
        }

        let dt = time.delta;
        let boost = if input.boost { self.boost_factor } else { 1.0 };
        let step = dt * self.move_speed * boost;
        let rot_step = dt * self.rotation_speed;
        let (mx, my) = (input.mouse_delta.0 as f32, input.mouse_delta.1 as f32);

        match (input.left_button, input.right_button) {
            (true, true) => self.origin += self.up * (my * step * self.boost_factor),
            (false, true) => {
                self.pitch -= my * rot_step;
                self.yaw += mx * rot_step;
            }
            (true, false) => {
                self.origin += self.forward * (my * step * DRAG_MOVE_FACTOR);
                self.yaw -= mx * rot_step;
            }
            (false, false) => {}
        }

        let axis = |pos: bool, neg: bool| (pos as i32 - neg as i32) as f32;
        self.origin += self.forward * (axis(input.forward, input.back) * step);
        self.origin += self.right * (axis(input.right, input.left) * step);
        self.origin += self.up * (axis(input.up, input.down) * step);

        self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
        self.yaw = self.yaw.rem_euclid(360.0);

        self.rebuild_matrices();
        Ok(())
    }

    /// Updates the aspect ratio; the projection is rebuilt on the next update.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if self.projection.aspect_ratio() != aspect_ratio {
            self.projection.set_aspect_ratio(aspect_ratio);
            self.projection_dirty = true;
            if self.is_initialized() {
                self.rebuild_matrices();
            }
        }
    }

    /// Changes the vertical field of view in degrees.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        let fov_y = fov_degrees.to_radians();
        if self.projection.fov_y() != fov_y {
            self.projection.set_fov_y(fov_y);
            self.projection_dirty = true;
            if self.is_initialized() {
                self.rebuild_matrices();
            }
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// The camera-to-world basis; the view matrix is its inverse.
    pub fn onb(&self) -> Mat4 {
        Mat4::from_basis(self.right, self.up, self.forward, self.origin)
    }

    fn rebuild_matrices(&mut self) {
        let rotation =
            Mat4::rotation_y(self.yaw.to_radians()) * Mat4::rotation_x(-self.pitch.to_radians());
        self.forward = rotation.transform_vector(Vec3::UNIT_Z).normalize();
        self.right = Vec3::UNIT_Y.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right).normalize();

        self.view_matrix = Mat4::look_at_lh(self.origin, self.origin + self.forward, Vec3::UNIT_Y);

        if self.projection_dirty {
            self.projection_matrix = self.projection.matrix();
            self.projection_dirty = false;
        }
    }
}
