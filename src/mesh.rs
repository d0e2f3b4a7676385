use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use obj::{load_obj, Obj, Position};
use tracing::{error, info, warn};

use crate::error::{RenderError, RenderResult};
use crate::linalg::Vec3;

/// Triangle mesh as handed to the pipeline: positions plus 0-based index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[usize; 3]>) -> Mesh {
        return Mesh { vertices, faces };
    }

    /// Parses a triangulated Wavefront OBJ. Normals and texture coordinates are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Mesh, obj::ObjError> {
        let model: Obj<Position, u32> = load_obj(reader)?;
        let vertices = model
            .vertices
            .iter()
            .map(|v| Vec3::new(v.position[0] as f64, v.position[1] as f64, v.position[2] as f64))
            .collect();
        let faces = model
            .indices
            .chunks_exact(3)
            .map(|face| [face[0] as usize, face[1] as usize, face[2] as usize])
            .collect();
        return Ok(Mesh { vertices, faces });
    }

    pub fn load(path: impl AsRef<Path>) -> RenderResult<Mesh> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mesh = Self::from_reader(BufReader::new(file)).map_err(|source| RenderError::MeshLoad {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            "mesh loaded"
        );
        return Ok(mesh);
    }

    /// Like `load`, but a missing or broken file gives an empty mesh, so the
    /// frame still renders (with nothing in it).
    pub fn load_or_empty(path: impl AsRef<Path>) -> Mesh {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(mesh) => mesh,
            Err(err) => {
                error!(path = %path.display(), %err, "could not load mesh, rendering an empty frame");
                Mesh::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        return self.faces.is_empty();
    }

    /// Vertex positions of every face, in file order. Faces pointing past the end
    /// of the vertex list are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        return self.indexed_triangles().map(|(_, positions)| positions);
    }

    /// Same as `triangles`, paired with the index of the face in `faces`.
    pub fn indexed_triangles(&self) -> impl Iterator<Item = (usize, [Vec3; 3])> + '_ {
        return self.faces.iter().enumerate().filter_map(move |(face_index, face)| {
            let lookup = |i: usize| self.vertices.get(face[i]).copied();
            match (lookup(0), lookup(1), lookup(2)) {
                (Some(a), Some(b), Some(c)) => Some((face_index, [a, b, c])),
                _ => {
                    warn!(face_index, ?face, vertices = self.vertices.len(), "face index out of range, skipping");
                    None
                }
            }
        });
    }
}
