//! Error types.
//!
//! Nothing on the per-pixel path returns an error: degenerate geometry is
//! skipped instead. These types cover resource construction and I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or driving the renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid frame buffer size {width}x{height}")]
    InvalidBufferSize { width: u32, height: u32 },
    #[error("camera updated before initialization")]
    CameraNotInitialized,
    #[error("failed to save frame to {path}: {source}")]
    SaveFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors raised while loading meshes and textures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("failed to load texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("OBJ file {0} contains no triangles")]
    EmptyMesh(PathBuf),
}
