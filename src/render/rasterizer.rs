//! Edge-function triangle rasterization.
//!
//! A triangle goes through two stages. [`setup_triangle`] runs once per
//! triangle and decides whether it is drawn at all: it applies the cull
//! mode, rejects degenerate input and computes the pixel bounding box.
//! [`rasterize_triangle`] then walks the bounding box rows that fall inside
//! one [`Band`] of the frame.
//!
//! # Edge Function
//!
//! For a pixel center `p` the three edge values are
//!
//! ```text
//! eA = (v2 - v1) × (p - v1)
//! eB = (v0 - v2) × (p - v2)
//! eC = (v1 - v0) × (p - v0)
//! ```
//!
//! and dividing by the doubled signed area `(v1 - v0) × (v2 - v0)` gives
//! the barycentric weights. A pixel is covered only when all three weights
//! are strictly positive, so pixels exactly on a shared edge belong to
//! neither triangle.
//!
//! # Depth and Interpolation
//!
//! Depth is `1 / Σ(wᵢ / zᵢ)` over the post-divide depths. Every other
//! attribute is interpolated perspective-correctly with the clip-space `w`:
//! `attr = Σ(wᵢ · attrᵢ / Wᵢ) / Σ(wᵢ / Wᵢ)`.

use super::framebuffer::Band;
use super::shader::{Fragment, PixelShader};
use super::transformer::VertexOut;
use crate::math::{ColorRGB, Vec2, EPSILON};
use crate::settings::CullMode;

/// Pixel rectangle `[x0, x1) × [y0, y1)` visited for one triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

/// A triangle that passed setup and will be rasterized.
#[derive(Clone, Copy, Debug)]
pub struct SetupTriangle {
    pub vertices: [VertexOut; 3],
    pub bounds: PixelRect,
    /// Doubled signed screen area.
    area: f32,
    /// Index of the mesh the triangle came from.
    pub mesh: usize,
}

/// Why triangle setup did not produce a drawable triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    Culled,
    /// Zero area, a vertex at or behind the camera, or a zero depth.
    Degenerate,
    /// Some part of the bounding box lies outside the frame.
    OutOfBounds,
}

/// Decides whether a triangle is drawn and prepares it for rasterization.
///
/// Culling looks only at the first vertex: its normal dotted with its view
/// direction. Triangles that are not fully inside the frame are skipped,
/// not clipped.
pub fn setup_triangle(
    vertices: [VertexOut; 3],
    mesh: usize,
    cull_mode: CullMode,
    width: u32,
    height: u32,
) -> Result<SetupTriangle, Rejection> {
    let first = &vertices[0];
    if cull_mode.culls(first.normal.dot(first.view_direction)) {
        return Err(Rejection::Culled);
    }

    if vertices.iter().any(|v| {
        v.position.w <= EPSILON || v.position.z.abs() < EPSILON || !v.position.is_finite()
    }) {
        return Err(Rejection::Degenerate);
    }

    let [p0, p1, p2] = vertices.map(|v| Vec2::new(v.position.x, v.position.y));
    let min_x = p0.x.min(p1.x).min(p2.x);
    let max_x = p0.x.max(p1.x).max(p2.x);
    let min_y = p0.y.min(p1.y).min(p2.y);
    let max_y = p0.y.max(p1.y).max(p2.y);

    if min_x < 0.0 || min_y < 0.0 || max_x > (width - 1) as f32 || max_y > (height - 1) as f32 {
        return Err(Rejection::OutOfBounds);
    }

    let area = (p1 - p0).cross(p2 - p0);
    if area.abs() < EPSILON {
        return Err(Rejection::Degenerate);
    }

    Ok(SetupTriangle {
        vertices,
        bounds: PixelRect {
            x0: min_x.floor() as u32,
            x1: max_x.ceil() as u32,
            y0: min_y.floor() as u32,
            y1: max_y.ceil() as u32,
        },
        area,
        mesh,
    })
}

/// Per-frame switches the rasterizer honors.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterOptions {
    /// When set, every pixel of each triangle's bounding box is overwritten
    /// with this color after shading.
    pub bounding_box_color: Option<ColorRGB>,
}

/// Counts of what happened to the pixels of one triangle in one band.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterCounts {
    pub covered: u32,
    pub written: u32,
}

/// Rasterizes the rows of `triangle` that lie in `band`.
pub fn rasterize_triangle<S: PixelShader + ?Sized>(
    triangle: &SetupTriangle,
    band: &mut Band<'_>,
    shader: &S,
    options: &RasterOptions,
) -> RasterCounts {
    let mut counts = RasterCounts::default();
    let bounds = triangle.bounds;
    let y_start = bounds.y0.max(band.y_start());
    let y_end = bounds.y1.min(band.y_end());
    if y_start >= y_end {
        return counts;
    }

    let [v0, v1, v2] = &triangle.vertices;
    let p0 = Vec2::new(v0.position.x, v0.position.y);
    let p1 = Vec2::new(v1.position.x, v1.position.y);
    let p2 = Vec2::new(v2.position.x, v2.position.y);
    let edge_a = p2 - p1;
    let edge_b = p0 - p2;
    let edge_c = p1 - p0;
    let inv_area = 1.0 / triangle.area;

    for y in y_start..y_end {
        for x in bounds.x0..bounds.x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge_a.cross(p - p1) * inv_area;
            let w1 = edge_b.cross(p - p2) * inv_area;
            let w2 = edge_c.cross(p - p0) * inv_area;

            if w0 > 0.0 && w1 > 0.0 && w2 > 0.0 {
                counts.covered += 1;
                if shade_pixel(&triangle.vertices, [w0, w1, w2], x, y, band, shader) {
                    counts.written += 1;
                }
            }

            if let Some(color) = options.bounding_box_color {
                band.set_color(x, y, color);
            }
        }
    }
    counts
}

/// Depth tests one covered pixel and shades it if it survives. Returns
/// true if the color buffer was written.
#[inline]
fn shade_pixel<S: PixelShader + ?Sized>(
    vertices: &[VertexOut; 3],
    weights: [f32; 3],
    x: u32,
    y: u32,
    band: &mut Band<'_>,
    shader: &S,
) -> bool {
    let [v0, v1, v2] = vertices;
    let [w0, w1, w2] = weights;

    let depth = 1.0 / (w0 / v0.position.z + w1 / v1.position.z + w2 / v2.position.z);
    if !depth.is_finite() || !band.test_and_set_depth(x, y, depth) {
        return false;
    }

    let fragment = interpolate(vertices, weights, depth);
    if !fragment.is_finite() {
        return false;
    }
    let color = shader.shade(&fragment);
    if !color.is_finite() {
        return false;
    }
    band.set_color(x, y, color);
    true
}

/// Perspective-correct interpolation of every vertex attribute.
#[inline]
pub fn interpolate(vertices: &[VertexOut; 3], weights: [f32; 3], depth: f32) -> Fragment {
    let [v0, v1, v2] = vertices;
    // Screen weights divided by clip-space w.
    let k0 = weights[0] / v0.position.w;
    let k1 = weights[1] / v1.position.w;
    let k2 = weights[2] / v2.position.w;
    let interp_w = 1.0 / (k0 + k1 + k2);
    let (k0, k1, k2) = (k0 * interp_w, k1 * interp_w, k2 * interp_w);

    Fragment {
        position: v0.position * k0 + v1.position * k1 + v2.position * k2,
        depth,
        color: v0.color * k0 + v1.color * k1 + v2.color * k2,
        uv: v0.uv * k0 + v1.uv * k1 + v2.uv * k2,
        normal: (v0.normal * k0 + v1.normal * k1 + v2.normal * k2).normalize(),
        tangent: (v0.tangent * k0 + v1.tangent * k1 + v2.tangent * k2).normalize(),
        view_direction: (v0.view_direction * k0 + v1.view_direction * k1 + v2.view_direction * k2)
            .normalize(),
    }
}
