//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point for the renderer. It owns
//! the [`Renderer`], the [`Camera`], the scene's meshes and the
//! [`RenderSettings`], and exposes the runtime toggles the demo binds to
//! keys.

use std::path::Path;

use crate::camera::{Camera, CameraInput};
use crate::error::RenderError;
use crate::math::Vec3;
use crate::mesh::Mesh;
use crate::render::{FrameStats, Renderer, ThreadPool};
use crate::settings::{CullMode, LightingMode, RenderSettings, SampleMode};
use crate::timer::FrameTime;

/// Vertical field of view the camera starts with, in degrees.
pub const DEFAULT_FOV: f32 = 45.0;
/// Mesh spin speed around Y, in degrees per second.
pub const MESH_ROTATION_SPEED: f32 = 45.0;

pub struct Engine {
    renderer: Renderer,
    camera: Camera,
    meshes: Vec<Mesh>,
    settings: RenderSettings,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self::from_renderer(Renderer::new(width, height)?))
    }

    /// Builds an engine whose renderer uses the given pool.
    pub fn with_pool(width: u32, height: u32, pool: ThreadPool) -> Result<Self, RenderError> {
        Ok(Self::from_renderer(Renderer::with_pool(width, height, pool)?))
    }

    fn from_renderer(renderer: Renderer) -> Self {
        let mut camera = Camera::new();
        camera.set_aspect_ratio(renderer.width() as f32 / renderer.height() as f32);
        camera.initialize(DEFAULT_FOV, Vec3::ZERO);
        Self {
            renderer,
            camera,
            meshes: Vec::new(),
            settings: RenderSettings::default(),
        }
    }

    /// Adds a mesh to the scene and returns its index.
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        log::info!(
            "added mesh '{}' ({} triangles)",
            mesh.name(),
            mesh.triangle_count()
        );
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.renderer.resize(width, height)?;
        self.camera.set_aspect_ratio(width as f32 / height as f32);
        log::debug!("resized to {width}x{height}");
        Ok(())
    }

    /// Advance the scene: camera input, then mesh rotation from the total
    /// elapsed time.
    pub fn update(&mut self, time: FrameTime, input: &CameraInput) -> Result<(), RenderError> {
        self.camera.update(time, input)?;

        if self.settings.rotate_meshes {
            let angle = (time.total * MESH_ROTATION_SPEED).to_radians();
            for mesh in &mut self.meshes {
                mesh.transform_mut().set_rotation_y(angle);
            }
        }
        Ok(())
    }

    /// Render the current frame
    pub fn render(&mut self) -> FrameStats {
        self.renderer.render(&self.meshes, &self.camera, &self.settings)
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Saves the last rendered frame to an image file.
    pub fn save_frame<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        self.renderer.save(path)
    }

    // =========================================================================
    // Runtime toggles
    // =========================================================================

    pub fn cycle_lighting_mode(&mut self) -> LightingMode {
        self.settings.lighting_mode = self.settings.lighting_mode.next();
        log::info!("lighting mode: {}", self.settings.lighting_mode);
        self.settings.lighting_mode
    }

    pub fn cycle_cull_mode(&mut self) -> CullMode {
        self.settings.cull_mode = self.settings.cull_mode.next();
        log::info!("cull mode: {}", self.settings.cull_mode);
        self.settings.cull_mode
    }

    pub fn cycle_sample_mode(&mut self) -> SampleMode {
        self.settings.sample_mode = self.settings.sample_mode.next();
        log::info!("sample mode: {}", self.settings.sample_mode);
        self.settings.sample_mode
    }

    pub fn toggle_normal_map(&mut self) -> bool {
        Self::flip("normal map", &mut self.settings.use_normal_map)
    }

    pub fn toggle_bounding_boxes(&mut self) -> bool {
        Self::flip("bounding boxes", &mut self.settings.show_bounding_boxes)
    }

    pub fn toggle_depth_buffer(&mut self) -> bool {
        Self::flip("depth buffer view", &mut self.settings.show_depth_buffer)
    }

    pub fn toggle_rotation(&mut self) -> bool {
        Self::flip("mesh rotation", &mut self.settings.rotate_meshes)
    }

    pub fn toggle_uniform_clear_color(&mut self) -> bool {
        Self::flip("uniform clear color", &mut self.settings.use_uniform_clear_color)
    }

    fn flip(name: &str, flag: &mut bool) -> bool {
        *flag = !*flag;
        log::info!("{name}: {}", if *flag { "on" } else { "off" });
        *flag
    }
}
