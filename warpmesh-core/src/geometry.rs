/// Indexed mesh storage for warping
use nalgebra::{Matrix4, Point3, Vector3};

/// Storage the selector reads and nudges vertices through.
///
/// Indices are positions in the vertex sequence. Out-of-range indices are
/// reported as `None` rather than panicking, since a selection can outlive
/// a mesh edit made by the host.
pub trait VertexStore {
    fn vertex_count(&self) -> usize;

    /// Model-space position of vertex `index`
    fn vertex(&self, index: usize) -> Option<Point3<f32>>;

    /// Add `delta` to vertex `index` in place, returning the new position
    fn translate_vertex(&mut self, index: usize, delta: &Vector3<f32>) -> Option<Point3<f32>>;

    /// Model matrix applied before projection
    fn transform(&self) -> Matrix4<f32>;

    /// Model-space centroid of all vertices
    fn centroid(&self) -> Point3<f32>;
}

/// A triangle mesh with shared vertices and a model transform
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub faces: Vec<[usize; 3]>,
    pub transform: Matrix4<f32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            transform: Matrix4::identity(),
        }
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
            transform: Matrix4::identity(),
        }
    }

    pub fn from_parts(vertices: Vec<Point3<f32>>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            transform: Matrix4::identity(),
        }
    }

    /// Weld a triangle soup into shared vertices.
    ///
    /// Corners with equal coordinates become one vertex, so nudging it moves
    /// every face that touches it. `-0.0` and `0.0` weld together.
    pub fn from_triangles(triangles: &[[Point3<f32>; 3]]) -> Self {
        let mut mesh = Self::with_capacity(triangles.len() * 3, triangles.len());
        let mut lookup: std::collections::HashMap<[u32; 3], usize> =
            std::collections::HashMap::with_capacity(triangles.len() * 3);

        for triangle in triangles {
            let mut face = [0usize; 3];
            for (slot, corner) in face.iter_mut().zip(triangle.iter()) {
                // Adding +0.0 turns -0.0 into 0.0
                let key = [
                    (corner.x + 0.0).to_bits(),
                    (corner.y + 0.0).to_bits(),
                    (corner.z + 0.0).to_bits(),
                ];
                *slot = *lookup.entry(key).or_insert_with(|| {
                    mesh.vertices.push(*corner);
                    mesh.vertices.len() - 1
                });
            }
            mesh.faces.push(face);
        }

        mesh
    }

    /// Planar warp grid in the XY plane, centred on the origin.
    ///
    /// Vertices are laid out row by row from the bottom-left corner.
    pub fn grid(columns: usize, rows: usize, width: f32, height: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let stride = columns + 1;
        let mut mesh = Self::with_capacity(stride * (rows + 1), columns * rows * 2);

        for row in 0..=rows {
            let y = height * (row as f32 / rows as f32 - 0.5);
            for column in 0..=columns {
                let x = width * (column as f32 / columns as f32 - 0.5);
                mesh.vertices.push(Point3::new(x, y, 0.0));
            }
        }

        for row in 0..rows {
            for column in 0..columns {
                let a = row * stride + column;
                let b = a + 1;
                let c = a + stride + 1;
                let d = a + stride;
                mesh.faces.push([a, b, c]);
                mesh.faces.push([a, c, d]);
            }
        }

        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Face normal from the current vertex positions
    pub fn face_normal(&self, face: &[usize; 3]) -> Option<Vector3<f32>> {
        let v0 = self.vertices.get(face[0])?;
        let v1 = self.vertices.get(face[1])?;
        let v2 = self.vertices.get(face[2])?;
        (v1 - v0).cross(&(v2 - v0)).try_normalize(1e-12)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexStore for Mesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertex(&self, index: usize) -> Option<Point3<f32>> {
        self.vertices.get(index).copied()
    }

    fn translate_vertex(&mut self, index: usize, delta: &Vector3<f32>) -> Option<Point3<f32>> {
        let vertex = self.vertices.get_mut(index)?;
        *vertex += delta;
        Some(*vertex)
    }

    fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    fn centroid(&self) -> Point3<f32> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.coords);
        Point3::from(sum / self.vertices.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let mesh = Mesh::grid(2, 1, 2.0, 1.0);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.faces.len(), 4);
        assert!((mesh.vertices[0] - Point3::new(-1.0, -0.5, 0.0)).norm() < 1e-6);
        assert!((mesh.vertices[5] - Point3::new(1.0, 0.5, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_grid_normals_face_camera() {
        let mesh = Mesh::grid(3, 3, 1.0, 1.0);
        for face in &mesh.faces {
            let normal = mesh.face_normal(face).unwrap();
            assert!((normal.z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_from_triangles_welds_shared_corners() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, 0.0);
        let mesh = Mesh::from_triangles(&[[a, b, c], [a, c, d]]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_from_triangles_welds_signed_zero() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let a_negative = Point3::new(-0.0, 0.0, -0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, -0.0);
        let mesh = Mesh::from_triangles(&[[a, b, c], [a_negative, c, d]]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);

        let mesh = Mesh::from_triangles(&[[a, b, c], [a_negative, c, b]]);
        assert_eq!(mesh.vertices.len(), 3);
    }

    #[test]
    fn test_centroid() {
        let mesh = Mesh::grid(2, 2, 4.0, 2.0);
        assert!(mesh.centroid().coords.norm() < 1e-6);
        assert_eq!(Mesh::new().centroid(), Point3::origin());
    }

    #[test]
    fn test_translate_out_of_range() {
        let mut mesh = Mesh::grid(1, 1, 1.0, 1.0);
        assert!(mesh.translate_vertex(4, &Vector3::x()).is_none());
        let moved = mesh.translate_vertex(0, &Vector3::new(0.5, 0.0, 0.0)).unwrap();
        assert!((moved.x - 0.0).abs() < 1e-6);
    }
}
