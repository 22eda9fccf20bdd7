//! Mesh data: vertices, triangle indices, world transform and surface maps.
//!
//! A [`Mesh`] is pure data. It is validated once at construction so the
//! render loop can index vertices without bounds surprises.

use std::path::Path;
use std::sync::Arc;

use crate::error::LoadError;
use crate::math::{ColorRGB, Mat4, Vec2, Vec3};
use crate::render::Material;
use crate::texture::Texture;
use crate::transform::Transform;

/// A model-space vertex as supplied by the asset loader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: ColorRGB,
    pub uv: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: ColorRGB::WHITE,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
        }
    }
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3, tangent: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
            tangent,
            ..Default::default()
        }
    }
}

/// Texture maps sampled by the pixel shader.
///
/// Textures are shared through `Arc`, so several meshes can reference the
/// same map without owning it. Missing maps fall back to the vertex color,
/// the interpolated normal, a gloss of 1 and a white specular tint.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMaps {
    pub diffuse: Option<Arc<Texture>>,
    pub normal: Option<Arc<Texture>>,
    pub gloss: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
}

impl SurfaceMaps {
    /// Loads `<stem>_diffuse.png`, `<stem>_normal.png`, `<stem>_gloss.png` and
    /// `<stem>_specular.png` next to `mesh_path`. Maps that are missing or fail
    /// to decode are left empty.
    pub fn load_beside<P: AsRef<Path>>(mesh_path: P) -> Self {
        let mesh_path = mesh_path.as_ref();
        let stem = mesh_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = mesh_path.parent().unwrap_or_else(|| Path::new("."));

        let load = |suffix: &str| {
            let path = dir.join(format!("{stem}_{suffix}.png"));
            if !path.exists() {
                log::debug!("no {suffix} map at {}", path.display());
                return None;
            }
            match Texture::from_file(&path) {
                Ok(texture) => Some(Arc::new(texture)),
                Err(err) => {
                    log::warn!("skipping {suffix} map: {err}");
                    None
                }
            }
        };

        Self {
            diffuse: load("diffuse"),
            normal: load("normal"),
            gloss: load("gloss"),
            specular: load("specular"),
        }
    }
}

/// A triangle-list mesh with its world transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    transform: Transform,
    pub maps: SurfaceMaps,
    /// When set, replaces the lighting mode for this mesh.
    pub material: Option<Material>,
}

impl Mesh {
    /// Create a mesh from vertices and triangle-list indices.
    ///
    /// Fails if the index count is not a multiple of three or an index does
    /// not address a vertex.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
    ) -> Result<Self, LoadError> {
        if indices.len() % 3 != 0 {
            return Err(LoadError::IndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(LoadError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            vertices,
            indices,
            transform: Transform::default(),
            maps: SurfaceMaps::default(),
            material: None,
        })
    }

    /// Load every object in an OBJ file into a single mesh.
    ///
    /// OBJ data is right-handed with counter-clockwise front faces; it is
    /// converted to the renderer's left-handed, clockwise convention by
    /// negating Z and reversing the winding. V is flipped so (0, 0) is the
    /// top-left of a texture. Missing normals are rebuilt from face normals
    /// and tangents are always derived from the UV layout.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut has_normals = true;

        for model in &models {
            let mesh = &model.mesh;
            let base = vertices.len() as u32;
            let vertex_count = mesh.positions.len() / 3;
            has_normals &= mesh.normals.len() == mesh.positions.len();

            for i in 0..vertex_count {
                let position = Vec3::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    -mesh.positions[3 * i + 2],
                );
                let normal = if mesh.normals.len() >= 3 * (i + 1) {
                    Vec3::new(
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        -mesh.normals[3 * i + 2],
                    )
                } else {
                    Vec3::ZERO
                };
                let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                    Vec2::new(mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1])
                } else {
                    Vec2::ZERO
                };
                vertices.push(Vertex::new(position, uv, normal, Vec3::ZERO));
            }

            for tri in mesh.indices.chunks_exact(3) {
                indices.extend_from_slice(&[base + tri[0], base + tri[2], base + tri[1]]);
            }
        }

        if indices.is_empty() {
            return Err(LoadError::EmptyMesh(path.to_path_buf()));
        }

        if !has_normals {
            log::debug!("{} has no normals, using face normals", path.display());
            compute_face_normals(&mut vertices, &indices);
        }
        compute_tangents(&mut vertices, &indices);

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "obj".to_string());
        log::info!(
            "loaded {} ({} vertices, {} triangles)",
            name,
            vertices.len(),
            indices.len() / 3
        );
        Self::new(name, vertices, indices)
    }

    /// A square in the XY plane centered on the origin, facing -Z.
    pub fn quad(half_extent: f32) -> Self {
        let h = half_extent;
        let normal = -Vec3::UNIT_Z;
        let tangent = Vec3::UNIT_X;
        let vertices = vec![
            Vertex::new(Vec3::new(-h, h, 0.0), Vec2::new(0.0, 0.0), normal, tangent),
            Vertex::new(Vec3::new(h, h, 0.0), Vec2::new(1.0, 0.0), normal, tangent),
            Vertex::new(Vec3::new(h, -h, 0.0), Vec2::new(1.0, 1.0), normal, tangent),
            Vertex::new(Vec3::new(-h, -h, 0.0), Vec2::new(0.0, 1.0), normal, tangent),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Self {
            name: "quad".to_string(),
            vertices,
            indices,
            transform: Transform::default(),
            maps: SurfaceMaps::default(),
            material: None,
        }
    }

    /// An axis-aligned cube centered on the origin with per-face normals.
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let faces = [
            (-Vec3::UNIT_Z, Vec3::UNIT_Y),
            (Vec3::UNIT_Z, Vec3::UNIT_Y),
            (-Vec3::UNIT_X, Vec3::UNIT_Y),
            (Vec3::UNIT_X, Vec3::UNIT_Y),
            (Vec3::UNIT_Y, Vec3::UNIT_Z),
            (-Vec3::UNIT_Y, -Vec3::UNIT_Z),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, up) in faces {
            // Screen-right when the face is viewed from outside.
            let right = normal.cross(up);
            let base = vertices.len() as u32;
            let corners = [
                (-1.0, 1.0, Vec2::new(0.0, 0.0)),
                (1.0, 1.0, Vec2::new(1.0, 0.0)),
                (1.0, -1.0, Vec2::new(1.0, 1.0)),
                (-1.0, -1.0, Vec2::new(0.0, 1.0)),
            ];
            for (sx, sy, uv) in corners {
                let position = (normal + right * sx + up * sy) * h;
                vertices.push(Vertex::new(position, uv, normal, right));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            name: "cube".to_string(),
            vertices,
            indices,
            transform: Transform::default(),
            maps: SurfaceMaps::default(),
            material: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of triangle `i`.
    #[inline]
    pub fn triangle(&self, i: usize) -> [usize; 3] {
        let base = 3 * i;
        [
            self.indices[base] as usize,
            self.indices[base + 1] as usize,
            self.indices[base + 2] as usize,
        ]
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}

fn compute_face_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for v in vertices.iter_mut() {
        v.normal = Vec3::ZERO;
    }
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let e0 = vertices[i1].position - vertices[i0].position;
        let e1 = vertices[i2].position - vertices[i0].position;
        let face_normal = e0.cross(e1);
        for i in [i0, i1, i2] {
            vertices[i].normal += face_normal;
        }
    }
    for v in vertices.iter_mut() {
        v.normal = v.normal.normalize();
    }
}

/// Derives per-vertex tangents from positions and UVs, orthogonalized
/// against the vertex normal.
fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let edge0 = vertices[i1].position - vertices[i0].position;
        let edge1 = vertices[i2].position - vertices[i0].position;
        let duv0 = vertices[i1].uv - vertices[i0].uv;
        let duv1 = vertices[i2].uv - vertices[i0].uv;

        let det = duv0.cross(duv1);
        if det.abs() < crate::math::EPSILON {
            continue;
        }
        let tangent = (edge0 * duv1.y - edge1 * duv0.y) / det;
        for i in [i0, i1, i2] {
            accumulated[i] += tangent;
        }
    }

    for (vertex, tangent) in vertices.iter_mut().zip(accumulated) {
        let n = vertex.normal;
        vertex.tangent = (tangent - n * tangent.dot(n)).normalize();
    }
}
