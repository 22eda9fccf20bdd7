//! Frame buffer storage and row-band views.
//!
//! [`FrameBuffers`] owns the linear float color buffer, the depth buffer and
//! the presentable ARGB8888 buffer. During rasterization the color and depth
//! buffers are split into disjoint horizontal [`Band`]s so each worker can
//! write its own rows without synchronization.
//!
//! # Depth Buffer
//!
//! The depth buffer stores post-divide depth in `[0, 1]`, smaller is closer.
//! It is reset to `+∞` at the start of every frame so the first fragment at
//! each pixel always passes.

use crate::error::RenderError;
use crate::math::ColorRGB;

pub struct FrameBuffers {
    color: Vec<ColorRGB>,
    depth: Vec<f32>,
    present: Vec<u32>,
    width: u32,
    height: u32,
}

impl FrameBuffers {
    /// Allocates all three buffers. Zero-sized dimensions are rejected.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidBufferSize { width, height });
        }
        let size = width as usize * height as usize;
        Ok(Self {
            color: vec![ColorRGB::BLACK; size],
            depth: vec![f32::INFINITY; size],
            present: vec![0xFF00_0000; size],
            width,
            height,
        })
    }

    /// Reallocates the buffers if the size changed.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == self.width && height == self.height {
            return Ok(());
        }
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the color buffer with `color` and reset every depth to `+∞`.
    pub fn clear(&mut self, color: ColorRGB) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    pub fn color(&self) -> &[ColorRGB] {
        &self.color
    }

    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// The presentable ARGB8888 pixels, row-major from the top-left.
    pub fn present(&self) -> &[u32] {
        &self.present
    }

    /// Color at (x, y), or None if out of bounds.
    #[inline]
    pub fn color_at(&self, x: u32, y: u32) -> Option<ColorRGB> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) as usize)
    }

    /// Splits the color and depth buffers into at most `count` bands of
    /// contiguous rows, top to bottom.
    pub fn bands(&mut self, count: usize) -> Vec<Band<'_>> {
        let width = self.width;
        let rows_per_band = (self.height as usize).div_ceil(count.max(1));
        let chunk = rows_per_band * width as usize;

        self.color
            .chunks_mut(chunk)
            .zip(self.depth.chunks_mut(chunk))
            .enumerate()
            .map(|(i, (color, depth))| Band {
                y_start: (i * rows_per_band) as u32,
                width,
                color,
                depth,
            })
            .collect()
    }

    /// Converts the color buffer into the presentable buffer: colors brighter
    /// than 1 are scaled down by their largest channel, then clamped and
    /// packed as ARGB8888.
    pub fn resolve(&mut self) {
        for (out, color) in self.present.iter_mut().zip(&self.color) {
            *out = color.to_argb();
        }
    }

    /// The presentable buffer as native-endian bytes, ready for an ARGB8888
    /// streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and u8 has alignment 1, so the backing
        // storage of `present` is a valid byte slice of 4x its length.
        unsafe {
            std::slice::from_raw_parts(self.present.as_ptr() as *const u8, self.present.len() * 4)
        }
    }
}

/// A mutable view over a contiguous run of rows.
pub struct Band<'a> {
    y_start: u32,
    width: u32,
    color: &'a mut [ColorRGB],
    depth: &'a mut [f32],
}

impl<'a> Band<'a> {
    /// First row covered by this band.
    pub fn y_start(&self) -> u32 {
        self.y_start
    }

    /// One past the last row covered by this band.
    pub fn y_end(&self) -> u32 {
        self.y_start + (self.color.len() / self.width as usize) as u32
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(y >= self.y_start && y < self.y_end() && x < self.width);
        ((y - self.y_start) * self.width + x) as usize
    }

    #[inline]
    pub fn depth(&self, x: u32, y: u32) -> f32 {
        self.depth[self.index(x, y)]
    }

    /// Depth test and write. Returns true if `depth` is no farther than the
    /// stored value; the stored value is then replaced.
    #[inline]
    pub fn test_and_set_depth(&mut self, x: u32, y: u32, depth: f32) -> bool {
        let i = self.index(x, y);
        if depth <= self.depth[i] {
            self.depth[i] = depth;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn set_color(&mut self, x: u32, y: u32, color: ColorRGB) {
        let i = self.index(x, y);
        self.color[i] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            FrameBuffers::new(0, 10),
            Err(RenderError::InvalidBufferSize {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn clear_resets_depth_to_infinity() {
        let mut buffers = FrameBuffers::new(4, 4).unwrap();
        {
            let mut bands = buffers.bands(1);
            assert!(bands[0].test_and_set_depth(1, 1, 0.5));
        }
        assert_eq!(buffers.depth_at(1, 1), Some(0.5));
        buffers.clear(ColorRGB::grey(0.1));
        assert!(buffers.depth().iter().all(|d| d.is_infinite()));
        assert_eq!(buffers.color_at(3, 3), Some(ColorRGB::grey(0.1)));
    }

    #[test]
    fn bands_cover_every_row_once() {
        let mut buffers = FrameBuffers::new(3, 10).unwrap();
        let bands = buffers.bands(4);
        assert_eq!(bands.len(), 4);
        let mut next = 0;
        for band in &bands {
            assert_eq!(band.y_start(), next);
            next = band.y_end();
        }
        assert_eq!(next, 10);
    }

    #[test]
    fn more_bands_than_rows() {
        let mut buffers = FrameBuffers::new(2, 3).unwrap();
        let bands = buffers.bands(8);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[2].y_end(), 3);
    }

    #[test]
    fn depth_test_keeps_equal_depth() {
        let mut buffers = FrameBuffers::new(2, 2).unwrap();
        let mut bands = buffers.bands(1);
        assert!(bands[0].test_and_set_depth(0, 0, 0.4));
        assert!(bands[0].test_and_set_depth(0, 0, 0.4));
        assert!(!bands[0].test_and_set_depth(0, 0, 0.6));
        assert_eq!(bands[0].depth(0, 0), 0.4);
    }

    #[test]
    fn resolve_packs_into_present_buffer() {
        let mut buffers = FrameBuffers::new(1, 1).unwrap();
        buffers.clear(ColorRGB::new(2.0, 1.0, 0.5));
        buffers.resolve();
        assert_eq!(buffers.present()[0], 0xFFFF_7F3F);
        assert_eq!(buffers.as_bytes().len(), 4);
    }
}
