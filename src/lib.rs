//! A CPU-based software rasterizer.
//!
//! Meshes are transformed, set up, rasterized with edge functions and
//! shaded per pixel entirely on the CPU. SDL2 is used only for window
//! management and display.
//!
//! # Quick Start
//!
//! ```ignore
//! use duorast::prelude::*;
//!
//! let mut engine = Engine::new(640, 480)?;
//! engine.add_mesh(Mesh::from_obj("vehicle.obj")?);
//! engine.update(window.wait_for_next_frame(), &CameraInput::default())?;
//! engine.render();
//! window.present(engine.frame_buffer())?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod settings;
pub mod texture;
pub mod timer;
pub mod transform;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use engine::Engine;
pub use error::{LoadError, RenderError};
pub use mesh::Mesh;
pub use projection::Projection;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use duorast::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, CameraInput};

    // Engine
    pub use crate::engine::Engine;
    pub use crate::error::{LoadError, RenderError};
    pub use crate::settings::{CullMode, LightingMode, RenderSettings, SampleMode};
    pub use crate::timer::{FrameLimiter, FrameTime};

    // Scene
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::{Mesh, SurfaceMaps, Vertex};
    pub use crate::projection::Projection;
    pub use crate::render::{FrameStats, Material, Renderer};
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::{ColorRGB, Mat4, Vec2, Vec3, Vec4};

    // Window & Input
    pub use crate::window::{Window, WindowEvent};
}
