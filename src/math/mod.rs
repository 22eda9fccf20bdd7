//! Math primitives shared by every stage of the pipeline.
//!
//! All types are plain `Copy` value types using `f32`. Vectors are column
//! vectors and [`mat4::Mat4`] multiplies them from the left.

pub mod color;
pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use color::ColorRGB;
pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;

/// Threshold below which lengths, areas and determinants count as zero.
pub const EPSILON: f32 = 1e-6;
