/// Nearest-vertex search in screen space
use nalgebra::Point2;

use crate::geometry::VertexStore;
use crate::projection::{ScreenProjector, Viewport};

/// Vertices tied for the smallest screen distance to a query point
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest {
    /// Indices in ascending (scan) order; empty when nothing was reachable
    pub indices: Vec<usize>,
    /// Squared screen distance of the match, `f32::INFINITY` when empty
    pub distance_squared: f32,
}

impl Nearest {
    pub fn distance(&self) -> f32 {
        self.distance_squared.sqrt()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Scan every vertex and keep those nearest to `query`.
///
/// Ties use exact equality of the squared distance. With `equidistant`
/// off only the first vertex reaching the minimum is kept. Vertices that
/// project to non-finite coordinates never match.
pub fn nearest_vertices<M, P>(
    mesh: &M,
    projector: &P,
    viewport: &Viewport,
    query: Point2<f32>,
    equidistant: bool,
) -> Nearest
where
    M: VertexStore + ?Sized,
    P: ScreenProjector + ?Sized,
{
    let transform = mesh.transform();
    let mut nearest = Nearest {
        indices: Vec::new(),
        distance_squared: f32::INFINITY,
    };

    for index in 0..mesh.vertex_count() {
        let Some(vertex) = mesh.vertex(index) else {
            continue;
        };
        let world = transform.transform_point(&vertex);
        let screen = projector.world_to_screen(&world, viewport);
        let distance_squared = (screen - query).norm_squared();

        if distance_squared < nearest.distance_squared {
            nearest.distance_squared = distance_squared;
            nearest.indices.clear();
            nearest.indices.push(index);
        } else if equidistant
            && !nearest.indices.is_empty()
            && distance_squared == nearest.distance_squared
        {
            nearest.indices.push(index);
        }
    }

    nearest
}

/// Squared screen distance from `query` to the mesh centroid
pub fn centroid_distance_squared<M, P>(
    mesh: &M,
    projector: &P,
    viewport: &Viewport,
    query: Point2<f32>,
) -> f32
where
    M: VertexStore + ?Sized,
    P: ScreenProjector + ?Sized,
{
    let world = mesh.transform().transform_point(&mesh.centroid());
    (projector.world_to_screen(&world, viewport) - query).norm_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use nalgebra::{Matrix4, Point3, Vector3};

    /// Drops depth: world XY is already screen space
    struct Flat;

    impl ScreenProjector for Flat {
        fn world_to_screen(&self, world: &Point3<f32>, _viewport: &Viewport) -> Point2<f32> {
            Point2::new(world.x, world.y)
        }
    }

    fn row(xs: &[f32]) -> Mesh {
        let vertices = xs.iter().map(|&x| Point3::new(x, 0.0, 0.0)).collect();
        Mesh::from_parts(vertices, Vec::new())
    }

    #[test]
    fn test_single_nearest() {
        let mesh = row(&[0.0, 10.0, 20.0]);
        let query = Point2::new(12.0, 0.0);
        let nearest = nearest_vertices(&mesh, &Flat, &Viewport::default(), query, true);
        assert_eq!(nearest.indices, vec![1]);
        assert!((nearest.distance() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_follow_policy() {
        let query = Point2::new(4.0, 0.0);
        let mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(6.0, 0.0, 0.0),
                Point3::new(4.0, 9.0, 0.0),
            ],
            Vec::new(),
        );

        let all = nearest_vertices(&mesh, &Flat, &Viewport::default(), query, true);
        assert_eq!(all.indices, vec![1, 2]);
        assert_eq!(all.distance_squared, 4.0);

        let first = nearest_vertices(&mesh, &Flat, &Viewport::default(), query, false);
        assert_eq!(first.indices, vec![1]);
    }

    #[test]
    fn test_empty_mesh_reports_infinity() {
        let query = Point2::origin();
        let nearest = nearest_vertices(&Mesh::new(), &Flat, &Viewport::default(), query, true);
        assert!(nearest.is_empty());
        assert!(nearest.distance().is_infinite());
    }

    #[test]
    fn test_transform_applies_before_projection() {
        let mut mesh = row(&[0.0, 10.0]);
        mesh.transform = Matrix4::new_translation(&Vector3::new(100.0, 0.0, 0.0));
        let query = Point2::new(110.0, 0.0);
        let nearest = nearest_vertices(&mesh, &Flat, &Viewport::default(), query, true);
        assert_eq!(nearest.indices, vec![1]);
        assert_eq!(nearest.distance_squared, 0.0);
    }

    #[test]
    fn test_centroid_distance() {
        let mesh = row(&[0.0, 10.0]);
        let query = Point2::new(5.0, 3.0);
        let d = centroid_distance_squared(&mesh, &Flat, &Viewport::default(), query);
        assert!((d - 9.0).abs() < 1e-6);
    }
}
