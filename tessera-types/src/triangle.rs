use serde::{Deserialize, Serialize};

use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;

/// Triangle geometry: exactly three vertices.
///
/// A triangle is not a [`Polygon`]: it has no rings to edit. Use [`Triangle::to_polygon`] to get a polygon with the
/// same boundary. An empty triangle has three empty vertices.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    vertices: [Point; 3],
}

impl Triangle {
    /// Creates a new triangle.
    pub fn new(p: Point, q: Point, r: Point) -> Self {
        Self {
            vertices: [p, q, r],
        }
    }

    /// Returns vertex `i % 3`.
    pub fn vertex(&self, i: usize) -> &Point {
        &self.vertices[i % 3]
    }

    /// Returns vertex `i % 3` mutably.
    pub fn vertex_mut(&mut self, i: usize) -> &mut Point {
        &mut self.vertices[i % 3]
    }

    /// All three vertices.
    pub fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    /// Swaps the orientation of the triangle.
    pub fn reverse(&mut self) {
        self.vertices.swap(1, 2);
    }

    /// Closed ring `v0, v1, v2, v0`, or an empty line string for empty triangles.
    pub fn to_ring(&self) -> LineString {
        if self.is_empty() {
            return LineString::default();
        }

        LineString::new(vec![
            self.vertices[0],
            self.vertices[1],
            self.vertices[2],
            self.vertices[0],
        ])
    }

    /// Converts the triangle into a polygon with the same boundary.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::from(self.to_ring())
    }
}

impl GeometryType for Triangle {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::Triangle
    }

    fn dimension(&self) -> u8 {
        2
    }

    fn is_empty(&self) -> bool {
        self.vertices[0].is_empty()
    }

    fn is_3d(&self) -> bool {
        self.vertices[0].is_3d()
    }

    fn is_measured(&self) -> bool {
        self.vertices[0].is_measured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_index_wraps() {
        let triangle = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        );
        assert_eq!(triangle.vertex(3), triangle.vertex(0));
        assert_eq!(triangle.vertex(5), triangle.vertex(2));
    }

    #[test]
    fn default_is_empty() {
        let triangle = Triangle::default();
        assert!(triangle.is_empty());
        assert!(triangle.to_polygon().is_empty());
    }

    #[test]
    fn to_polygon_is_closed() {
        let triangle = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        );
        let polygon = triangle.to_polygon();
        assert_eq!(polygon.exterior_ring().num_points(), 4);
        assert!(polygon.exterior_ring().is_closed());
    }
}
