//! Runtime render configuration.
//!
//! Every toggle the user can flip between frames lives in [`RenderSettings`],
//! which is passed by reference into the render call and never mutated while
//! a frame is being drawn.

use std::fmt;

use crate::light::DirectionalLight;
use crate::math::ColorRGB;

/// Which lighting terms the pixel shader evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingMode {
    /// Cosine falloff only, as grey.
    ObservedArea,
    /// Lambert diffuse scaled by the observed area.
    Diffuse,
    /// Phong specular only.
    Specular,
    /// Diffuse + specular.
    #[default]
    Combined,
}

impl LightingMode {
    pub fn next(self) -> Self {
        match self {
            LightingMode::ObservedArea => LightingMode::Diffuse,
            LightingMode::Diffuse => LightingMode::Specular,
            LightingMode::Specular => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        }
    }
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightingMode::ObservedArea => write!(f, "ObservedArea"),
            LightingMode::Diffuse => write!(f, "Diffuse"),
            LightingMode::Specular => write!(f, "Specular"),
            LightingMode::Combined => write!(f, "Combined"),
        }
    }
}

/// Which triangles are discarded before rasterization.
///
/// The facing test uses only the first vertex of each triangle: its normal
/// dotted with its view direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    None,
    /// Discard triangles whose first vertex faces toward the camera.
    Front,
    /// Discard triangles whose first vertex faces away from the camera.
    #[default]
    Back,
}

impl CullMode {
    pub fn next(self) -> Self {
        match self {
            CullMode::None => CullMode::Front,
            CullMode::Front => CullMode::Back,
            CullMode::Back => CullMode::None,
        }
    }

    /// Returns true if a triangle with the given facing term is discarded.
    #[inline]
    pub fn culls(self, normal_dot_view: f32) -> bool {
        match self {
            CullMode::None => false,
            CullMode::Front => normal_dot_view > 0.0,
            CullMode::Back => normal_dot_view < 0.0,
        }
    }
}

impl fmt::Display for CullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CullMode::None => write!(f, "None"),
            CullMode::Front => write!(f, "Front"),
            CullMode::Back => write!(f, "Back"),
        }
    }
}

/// Texture filtering used by the surface maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleMode {
    #[default]
    Point,
    Linear,
    /// No mip chain exists on the CPU path, so this filters like `Linear`.
    Anisotropic,
}

impl SampleMode {
    pub fn next(self) -> Self {
        match self {
            SampleMode::Point => SampleMode::Linear,
            SampleMode::Linear => SampleMode::Anisotropic,
            SampleMode::Anisotropic => SampleMode::Point,
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMode::Point => write!(f, "Point"),
            SampleMode::Linear => write!(f, "Linear"),
            SampleMode::Anisotropic => write!(f, "Anisotropic"),
        }
    }
}

/// Per-frame render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub light: DirectionalLight,
    /// Base Phong exponent; scaled per pixel by the gloss map.
    pub shininess: f32,
    pub lighting_mode: LightingMode,
    pub cull_mode: CullMode,
    pub sample_mode: SampleMode,
    pub use_normal_map: bool,
    pub show_bounding_boxes: bool,
    pub show_depth_buffer: bool,
    pub rotate_meshes: bool,
    pub use_uniform_clear_color: bool,
    pub clear_color: ColorRGB,
    pub uniform_clear_color: ColorRGB,
    pub highlight_color: ColorRGB,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            light: DirectionalLight::default(),
            shininess: 25.0,
            lighting_mode: LightingMode::default(),
            cull_mode: CullMode::default(),
            sample_mode: SampleMode::default(),
            use_normal_map: true,
            show_bounding_boxes: false,
            show_depth_buffer: false,
            rotate_meshes: true,
            use_uniform_clear_color: false,
            clear_color: ColorRGB::grey(0.39),
            uniform_clear_color: ColorRGB::grey(0.1),
            highlight_color: ColorRGB::WHITE,
        }
    }
}

impl RenderSettings {
    /// The color the frame is cleared to, honoring the uniform override.
    pub fn active_clear_color(&self) -> ColorRGB {
        if self.use_uniform_clear_color {
            self.uniform_clear_color
        } else {
            self.clear_color
        }
    }
}
