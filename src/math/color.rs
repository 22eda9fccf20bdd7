//! Linear RGB color stored as three `f32` channels.
//!
//! Shading works in unbounded linear space; values are only brought back to
//! [0, 1] when a frame is resolved into the presentable ARGB8888 buffer.

use std::ops::{Add, AddAssign, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorRGB {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorRGB {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// A grey with all three channels set to `v`.
    pub const fn grey(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn max_channel(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Rescales the color so its largest channel is at most 1.
    ///
    /// All channels are divided by the largest one, so the hue survives
    /// instead of each channel saturating on its own.
    pub fn max_to_one(self) -> Self {
        let max = self.max_channel();
        if max > 1.0 {
            self / max
        } else {
            self
        }
    }

    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Packs the color into opaque ARGB8888 after max-to-one and clamping.
    #[inline]
    pub fn to_argb(self) -> u32 {
        let c = self.max_to_one().clamped();
        let r = (c.r * 255.0) as u32;
        let g = (c.g * 255.0) as u32;
        let b = (c.b * 255.0) as u32;
        0xFF00_0000 | (r << 16) | (g << 8) | b
    }

    /// Unpacks an ARGB8888 value, ignoring alpha.
    pub fn from_argb(argb: u32) -> Self {
        Self::new(
            ((argb >> 16) & 0xFF) as f32 / 255.0,
            ((argb >> 8) & 0xFF) as f32 / 255.0,
            (argb & 0xFF) as f32 / 255.0,
        )
    }
}

impl Add for ColorRGB {
    type Output = ColorRGB;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for ColorRGB {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for ColorRGB {
    type Output = ColorRGB;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

/// Component-wise product, used to tint one color by another.
impl Mul for ColorRGB {
    type Output = ColorRGB;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f32> for ColorRGB {
    type Output = ColorRGB;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

impl Div<f32> for ColorRGB {
    type Output = ColorRGB;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.r / rhs, self.g / rhs, self.b / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn max_to_one_rescales_proportionally() {
        let c = ColorRGB::new(2.0, 1.0, 0.5).max_to_one();
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 0.5);
        assert_relative_eq!(c.b, 0.25);
    }

    #[test]
    fn max_to_one_leaves_in_range_colors_alone() {
        let c = ColorRGB::new(0.2, 0.9, 1.0);
        assert_eq!(c.max_to_one(), c);
    }

    #[test]
    fn to_argb_is_opaque_and_saturated() {
        assert_eq!(ColorRGB::WHITE.to_argb(), 0xFFFF_FFFF);
        assert_eq!(ColorRGB::BLACK.to_argb(), 0xFF00_0000);
        assert_eq!(ColorRGB::new(4.0, 0.0, 0.0).to_argb(), 0xFFFF_0000);
        assert_eq!(ColorRGB::new(-1.0, 0.0, 0.0).to_argb(), 0xFF00_0000);
    }

    #[test]
    fn from_argb_reads_channels() {
        let c = ColorRGB::from_argb(0xFF00_FF00);
        assert_eq!(c, ColorRGB::new(0.0, 1.0, 0.0));
    }
}
