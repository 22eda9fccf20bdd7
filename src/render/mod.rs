//! The software rendering pipeline.
//!
//! Stages, in the order a frame runs through them:
//! - [`transformer`]: model space vertices to screen space [`VertexOut`]
//! - [`rasterizer`]: triangle setup, coverage, depth and interpolation
//! - [`shader`]: per-pixel lighting over the interpolated [`Fragment`]
//! - [`framebuffer`]: color, depth and presentable storage
//!
//! [`Renderer`] drives them, using [`ThreadPool`] for the parallel parts.

pub mod framebuffer;
pub mod material;
pub mod parallel;
pub mod rasterizer;
pub mod renderer;
pub mod shader;
pub mod transformer;

pub use framebuffer::{Band, FrameBuffers};
pub use material::Material;
pub use parallel::ThreadPool;
pub use rasterizer::{rasterize_triangle, setup_triangle, RasterOptions, Rejection, SetupTriangle};
pub use renderer::{FrameStats, Renderer};
pub use shader::{DepthShader, FlatShader, Fragment, PixelShader, SurfaceShader};
pub use transformer::{VertexOut, VertexTransformer};
