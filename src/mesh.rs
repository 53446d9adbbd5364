//! Procedural beam geometry.
//!
//! Beams are meshed as a run of rectangular cross-sections whose vertical
//! offset follows a parabola, giving maximum sag at midspan and none at the
//! supports. The same generator with zero curvature produces the box meshes
//! used for split halves.

use nalgebra::Vector3;

use crate::errors::MeshError;

/// Triangle mesh for a beam: positions, triangle indices and averaged
/// per-vertex normals.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamMesh {
    /// Vertex positions in beam-local coordinates, metres.
    pub vertices: Vec<Vector3<f64>>,
    /// Triangle index buffer, three indices per face.
    pub indices: Vec<u32>,
    /// Unit normals per vertex; zero for vertices with no adjacent face.
    pub normals: Vec<Vector3<f64>>,
}

impl BeamMesh {
    /// Number of vertices in the mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate a parabolically curved beam mesh.
///
/// `segments` cross-sections are sampled at `t = i / segments` along the
/// span (the X axis); each contributes four vertices offset vertically by
/// `y(t) = -curve * (t - 0.5)^2`. Adjacent cross-sections are joined by
/// triangulated top, bottom, left and right faces, and the first and last
/// cross-sections are capped.
///
/// # Errors
///
/// Returns [`MeshError::DegenerateDimensions`] for non-positive or
/// non-finite dimensions, [`MeshError::NonFiniteCurvature`] for a NaN or
/// infinite sag, and [`MeshError::TooFewSegments`] when fewer than two
/// cross-sections are requested.
pub fn curved_beam(
    width: f64,
    height: f64,
    depth: f64,
    curve: f64,
    segments: usize,
) -> Result<BeamMesh, MeshError> {
    let dimensions_valid = [width, height, depth]
        .iter()
        .all(|d| d.is_finite() && *d > 0.0);
    if !dimensions_valid {
        return Err(MeshError::DegenerateDimensions {
            width,
            height,
            depth,
        });
    }
    if !curve.is_finite() {
        return Err(MeshError::NonFiniteCurvature(curve));
    }
    if segments < 2 {
        return Err(MeshError::TooFewSegments(segments));
    }

    // Four vertices per cross-section: top-left, top-right, bottom-left,
    // bottom-right, looking down the span.
    let mut vertices = Vec::with_capacity(segments * 4);
    for i in 0..segments {
        let t = i as f64 / segments as f64;
        let x = t * width - width / 2.0;
        let y = -curve * (t - 0.5) * (t - 0.5);
        let z = depth / 2.0;

        vertices.push(Vector3::new(x, y, -z));
        vertices.push(Vector3::new(x, y, z));
        vertices.push(Vector3::new(x, y - height, -z));
        vertices.push(Vector3::new(x, y - height, z));
    }

    let mut indices: Vec<u32> = Vec::new();
    let mut triangle = |a: u32, b: u32, c: u32| {
        indices.extend_from_slice(&[a, b, c]);
    };
    let last_ring = vertices.len() - 8;
    for i in (0..vertices.len() - 4).step_by(4) {
        let lt = i as u32;
        let rt = lt + 1;
        let lb = lt + 2;
        let rb = lt + 3;
        let lt2 = lt + 4;
        let rt2 = lt + 5;
        let lb2 = lt + 6;
        let rb2 = lt + 7;

        // Top face.
        triangle(lt, rt, rt2);
        triangle(rt2, lt2, lt);

        // Bottom face.
        triangle(lb, rb2, rb);
        triangle(lb, lb2, rb2);

        // Right face.
        triangle(rt, rb, rb2);
        triangle(rb2, rt2, rt);

        // Left face.
        triangle(lb, lt, lb2);
        triangle(lb2, lt, lt2);

        if i == 0 {
            // Back cap.
            triangle(rt, lt, rb);
            triangle(lb, rb, lt);
        }
        if i == last_ring {
            // Forward cap.
            triangle(lb2, lt2, rt2);
            triangle(rt2, rb2, lb2);
        }
    }

    let normals = averaged_normals(&vertices, &indices);
    Ok(BeamMesh {
        vertices,
        indices,
        normals,
    })
}

/// Generate a straight box mesh, used for the halves of a split beam.
///
/// # Errors
///
/// Returns [`MeshError::DegenerateDimensions`] for non-positive or
/// non-finite dimensions.
pub fn box_beam(width: f64, height: f64, depth: f64) -> Result<BeamMesh, MeshError> {
    curved_beam(width, height, depth, 0.0, 2)
}

/// Average the face normals of every triangle sharing a vertex.
///
/// Faces with a degenerate (zero-area) cross product contribute nothing;
/// vertices with no contributing face keep a zero normal.
fn averaged_normals(vertices: &[Vector3<f64>], indices: &[u32]) -> Vec<Vector3<f64>> {
    let mut normals = vec![Vector3::zeros(); vertices.len()];
    let mut face_counts = vec![0usize; vertices.len()];

    for face in indices.chunks_exact(3) {
        let (ai, bi, ci) = (face[0] as usize, face[1] as usize, face[2] as usize);
        let a = vertices[ai];
        let b = vertices[bi];
        let c = vertices[ci];

        let cross = (b - a).cross(&(c - a));
        let norm = cross.norm();
        if norm == 0.0 {
            continue;
        }
        let face_normal = cross / norm;
        for index in [ai, bi, ci] {
            normals[index] += face_normal;
            face_counts[index] += 1;
        }
    }

    for (normal, count) in normals.iter_mut().zip(face_counts) {
        if count > 0 {
            let averaged = *normal / count as f64;
            let norm = averaged.norm();
            if norm > 0.0 {
                *normal = averaged / norm;
            }
        }
    }
    normals
}
