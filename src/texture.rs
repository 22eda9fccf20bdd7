//! Texture storage and sampling.
//!
//! Textures are the "opaque sampler" collaborator of the pixel shader: given a
//! UV coordinate in [0, 1]² they return a linear RGB color.

use std::path::Path;

use crate::error::LoadError;
use crate::math::{ColorRGB, Vec2};
use crate::settings::SampleMode;

/// Represents a 2D texture for texture mapping.
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format, row-major, top-left origin.
    width: u32,
    height: u32,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| LoadError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        log::debug!("loaded texture {} ({}x{})", path.display(), width, height);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds a texture from row-major colors.
    ///
    /// # Panics
    /// Panics if `colors.len() != width * height` or either dimension is zero.
    pub fn from_colors(width: u32, height: u32, colors: &[ColorRGB]) -> Self {
        assert!(width > 0 && height > 0, "texture dimensions must be non-zero");
        assert_eq!(
            colors.len(),
            (width * height) as usize,
            "texture data doesn't match dimensions"
        );
        Self {
            data: colors.iter().map(|c| c.to_argb()).collect(),
            width,
            height,
        }
    }

    /// A 1x1 texture of a single color.
    pub fn solid(color: ColorRGB) -> Self {
        Self::from_colors(1, 1, &[color])
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> ColorRGB {
        ColorRGB::from_argb(self.data[(y * self.width + x) as usize])
    }

    /// Sample the texture at `uv` with the given filter.
    ///
    /// UV coordinates are clamped to [0, 1]; (0, 0) is the top-left texel.
    #[inline]
    pub fn sample(&self, uv: Vec2, mode: SampleMode) -> ColorRGB {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        match mode {
            SampleMode::Point => self.sample_point(u, v),
            SampleMode::Linear | SampleMode::Anisotropic => self.sample_linear(u, v),
        }
    }

    fn sample_point(&self, u: f32, v: f32) -> ColorRGB {
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.texel(x, y)
    }

    fn sample_linear(&self, u: f32, v: f32) -> ColorRGB {
        // Texel centers sit at half-integer coordinates.
        let fx = (u * self.width as f32 - 0.5).max(0.0);
        let fy = (v * self.height as f32 - 0.5).max(0.0);
        let x0 = (fx as u32).min(self.width - 1);
        let y0 = (fy as u32).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let top = self.texel(x0, y0) * (1.0 - tx) + self.texel(x1, y0) * tx;
        let bottom = self.texel(x0, y1) * (1.0 - tx) + self.texel(x1, y1) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn checker() -> Texture {
        Texture::from_colors(
            2,
            2,
            &[
                ColorRGB::BLACK,
                ColorRGB::WHITE,
                ColorRGB::WHITE,
                ColorRGB::BLACK,
            ],
        )
    }

    #[test]
    fn point_sampling_picks_nearest_texel() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.1, 0.1), SampleMode::Point), ColorRGB::BLACK);
        assert_eq!(tex.sample(Vec2::new(0.9, 0.1), SampleMode::Point), ColorRGB::WHITE);
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0), SampleMode::Point), ColorRGB::BLACK);
    }

    #[test]
    fn uv_outside_unit_square_is_clamped() {
        let tex = checker();
        assert_eq!(
            tex.sample(Vec2::new(-3.0, 0.1), SampleMode::Point),
            tex.sample(Vec2::new(0.0, 0.1), SampleMode::Point)
        );
    }

    #[test]
    fn linear_sampling_blends_neighbours() {
        let tex = checker();
        let c = tex.sample(Vec2::new(0.5, 0.25), SampleMode::Linear);
        assert_relative_eq!(c.r, 0.5, epsilon = 1e-2);
    }

    #[test]
    fn solid_texture_is_constant() {
        let tex = Texture::solid(ColorRGB::new(1.0, 0.0, 0.0));
        let c = tex.sample(Vec2::new(0.3, 0.8), SampleMode::Anisotropic);
        assert_eq!(c, ColorRGB::new(1.0, 0.0, 0.0));
    }
}
