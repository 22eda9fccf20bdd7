//! Per-frame orchestration of the software pipeline.
//!
//! [`Renderer`] owns the frame buffers and the worker pool. One call to
//! [`Renderer::render`] clears the buffers, transforms and sets up every
//! triangle of every mesh in parallel, rasterizes them band by band and
//! resolves the color buffer into the presentable ARGB8888 buffer.

use std::fmt;
use std::path::Path;

use super::framebuffer::FrameBuffers;
use super::parallel::ThreadPool;
use super::rasterizer::{
    rasterize_triangle, setup_triangle, RasterOptions, Rejection, SetupTriangle,
};
use super::shader::{DepthShader, PixelShader, SurfaceShader};
use super::transformer::VertexTransformer;
use crate::camera::Camera;
use crate::error::RenderError;
use crate::mesh::Mesh;
use crate::settings::RenderSettings;

/// What happened to the triangles submitted in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub culled: usize,
    /// Degenerate or not fully inside the frame.
    pub skipped: usize,
    pub rasterized: usize,
    /// Pixels whose color was written by a shader.
    pub pixels_shaded: usize,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} triangles: {} culled, {} skipped, {} rasterized, {} pixels shaded",
            self.triangles, self.culled, self.skipped, self.rasterized, self.pixels_shaded
        )
    }
}

pub struct Renderer {
    buffers: FrameBuffers,
    pool: ThreadPool,
    stats: FrameStats,
}

impl Renderer {
    /// Creates a renderer using one worker per available core.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Self::with_pool(width, height, ThreadPool::default_threads())
    }

    /// Creates a renderer with an explicit worker pool. A pool of one thread
    /// renders everything on the calling thread.
    pub fn with_pool(width: u32, height: u32, pool: ThreadPool) -> Result<Self, RenderError> {
        log::debug!(
            "renderer {}x{} with {} worker(s)",
            width,
            height,
            pool.num_threads()
        );
        Ok(Self {
            buffers: FrameBuffers::new(width, height)?,
            pool,
            stats: FrameStats::default(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.buffers.resize(width, height)
    }

    pub fn width(&self) -> u32 {
        self.buffers.width()
    }

    pub fn height(&self) -> u32 {
        self.buffers.height()
    }

    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Statistics of the last rendered frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Returns the presentable frame as bytes (ARGB8888 format).
    pub fn as_bytes(&self) -> &[u8] {
        self.buffers.as_bytes()
    }

    /// Renders `meshes` as seen by `camera` into the frame buffers.
    pub fn render(
        &mut self,
        meshes: &[Mesh],
        camera: &Camera,
        settings: &RenderSettings,
    ) -> FrameStats {
        let width = self.buffers.width();
        let height = self.buffers.height();
        let pool = self.pool;
        let mut stats = FrameStats::default();

        self.buffers.clear(settings.active_clear_color());

        let view_projection = camera.projection_matrix() * camera.view_matrix();
        let mut triangles: Vec<SetupTriangle> = Vec::new();

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            let transformer = VertexTransformer::new(
                mesh.world_matrix(),
                view_projection,
                camera.origin(),
                width,
                height,
            );
            let vertices = mesh.vertices();
            let transformed =
                pool.map_range(vertices.len(), |i| transformer.transform(&vertices[i]));

            let setups = pool.map_range(mesh.triangle_count(), |t| {
                let [i0, i1, i2] = mesh.triangle(t);
                setup_triangle(
                    [transformed[i0], transformed[i1], transformed[i2]],
                    mesh_index,
                    settings.cull_mode,
                    width,
                    height,
                )
            });

            stats.triangles += setups.len();
            for setup in setups {
                match setup {
                    Ok(triangle) => triangles.push(triangle),
                    Err(Rejection::Culled) => stats.culled += 1,
                    Err(Rejection::Degenerate | Rejection::OutOfBounds) => stats.skipped += 1,
                }
            }
        }
        stats.rasterized = triangles.len();

        let options = RasterOptions {
            bounding_box_color: settings
                .show_bounding_boxes
                .then_some(settings.highlight_color),
        };
        let depth_shader = DepthShader::new(*camera.projection());
        let surface_shaders: Vec<SurfaceShader<'_>> = meshes
            .iter()
            .map(|mesh| SurfaceShader::new(settings, &mesh.maps, mesh.material.as_ref()))
            .collect();

        let shaded = std::sync::atomic::AtomicUsize::new(0);
        let bands = self.buffers.bands(pool.num_threads());
        pool.for_each(bands, |mut band| {
            let mut written = 0;
            for triangle in &triangles {
                let shader: &dyn PixelShader = if settings.show_depth_buffer {
                    &depth_shader
                } else {
                    &surface_shaders[triangle.mesh]
                };
                written += rasterize_triangle(triangle, &mut band, shader, &options).written;
            }
            shaded.fetch_add(written as usize, std::sync::atomic::Ordering::Relaxed);
        });
        stats.pixels_shaded = shaded.into_inner();

        self.buffers.resolve();
        self.stats = stats;
        log::debug!("{stats}");
        stats
    }

    /// Writes the presentable buffer to an image file; the format follows
    /// the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        let width = self.buffers.width();
        let present = self.buffers.present();
        let image = image::RgbImage::from_fn(width, self.buffers.height(), |x, y| {
            let argb = present[(y * width + x) as usize];
            image::Rgb([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])
        });
        image.save(path).map_err(|source| RenderError::SaveFrame {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("saved frame to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{ColorRGB, Vec3};
    use crate::render::Material;
    use crate::settings::CullMode;

    fn camera() -> Camera {
        let mut camera = Camera::new();
        camera.initialize(90.0, Vec3::ZERO);
        camera
    }

    fn quad_at(z: f32) -> Mesh {
        let mut quad = Mesh::quad(0.5);
        quad.transform_mut().set_position(Vec3::new(0.0, 0.0, z));
        quad
    }

    fn covered(renderer: &Renderer) -> usize {
        renderer
            .buffers()
            .depth()
            .iter()
            .filter(|d| d.is_finite())
            .count()
    }

    #[test]
    fn parallel_and_serial_frames_match() {
        let settings = RenderSettings::default();
        let meshes = vec![quad_at(2.0), quad_at(1.5)];

        let mut serial = Renderer::with_pool(64, 48, ThreadPool::new(1)).unwrap();
        let mut parallel = Renderer::with_pool(64, 48, ThreadPool::new(4)).unwrap();
        let a = serial.render(&meshes, &camera(), &settings);
        let b = parallel.render(&meshes, &camera(), &settings);

        assert_eq!(a, b);
        assert_eq!(serial.buffers().present(), parallel.buffers().present());
        assert_eq!(serial.buffers().depth(), parallel.buffers().depth());
    }

    #[test]
    fn back_cull_hides_reversed_quad() {
        let mut quad = quad_at(2.0);
        // Turned around, the quad faces away from the camera.
        quad.transform_mut().set_rotation_y(std::f32::consts::PI);
        let meshes = vec![quad];

        let mut renderer = Renderer::with_pool(32, 32, ThreadPool::new(1)).unwrap();
        let stats = renderer.render(&meshes, &camera(), &RenderSettings::default());
        assert_eq!(stats.culled, 2);
        assert_eq!(covered(&renderer), 0);

        let settings = RenderSettings {
            cull_mode: CullMode::None,
            ..RenderSettings::default()
        };
        let stats = renderer.render(&meshes, &camera(), &settings);
        assert_eq!(stats.rasterized, 2);
        assert!(covered(&renderer) > 0);
    }

    #[test]
    fn clear_color_fills_uncovered_pixels() {
        let mut renderer = Renderer::with_pool(8, 8, ThreadPool::new(2)).unwrap();
        let settings = RenderSettings {
            use_uniform_clear_color: true,
            ..RenderSettings::default()
        };
        renderer.render(&[], &camera(), &settings);
        assert!(renderer
            .buffers()
            .present()
            .iter()
            .all(|&p| p == ColorRGB::grey(0.1).to_argb()));
    }

    #[test]
    fn offscreen_triangles_are_skipped() {
        let mut quad = quad_at(2.0);
        quad.transform_mut().set_position(Vec3::new(3.0, 0.0, 2.0));
        let mut renderer = Renderer::with_pool(32, 32, ThreadPool::new(1)).unwrap();
        let stats = renderer.render(&[quad], &camera(), &RenderSettings::default());
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.rasterized, 0);
    }

    #[test]
    fn material_shades_mesh() {
        let mut quad = quad_at(2.0);
        quad.material = Some(Material::SolidColor(ColorRGB::new(0.0, 0.0, 1.0)));
        let mut renderer = Renderer::with_pool(32, 32, ThreadPool::new(1)).unwrap();
        let mut settings = RenderSettings::default();
        settings.light.set_direction(Vec3::UNIT_Z);
        renderer.render(&[quad], &camera(), &settings);

        let inside = renderer.buffers().color_at(14, 17).unwrap();
        assert_eq!(inside.r, 0.0);
        assert!(inside.b > 1.0);
    }

    #[test]
    fn depth_view_is_grey() {
        let mut renderer = Renderer::with_pool(32, 32, ThreadPool::new(1)).unwrap();
        let settings = RenderSettings {
            show_depth_buffer: true,
            ..RenderSettings::default()
        };
        renderer.render(&[quad_at(2.0)], &camera(), &settings);
        let c = renderer.buffers().color_at(14, 17).unwrap();
        assert_eq!(c.r, c.g);
        assert!(c.r > 0.0 && c.r < 1.0);
    }
}
