//! Surfaces made of several polygonal patches.
//!
//! Neighbouring patches of a surface are expected to share their edges, but every patch owns its own copy of the
//! shared vertices.

use serde::{Deserialize, Serialize};

use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::polygon::Polygon;
use crate::triangle::Triangle;

/// Surface consisting of polygons.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyhedralSurface {
    polygons: Vec<Polygon>,
}

impl PolyhedralSurface {
    /// Creates a new surface.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Number of polygons.
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    /// Returns `n`-th polygon.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn polygon_n(&self, n: usize) -> &Polygon {
        &self.polygons[n]
    }

    /// Returns `n`-th polygon mutably.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn polygon_n_mut(&mut self, n: usize) -> &mut Polygon {
        &mut self.polygons[n]
    }

    /// Appends a polygon.
    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Appends all polygons of another surface.
    pub fn add_polygons(&mut self, other: PolyhedralSurface) {
        self.polygons.extend(other.polygons);
    }

    /// Polygons of the surface.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Iterates over the polygons mutably.
    pub fn polygons_mut(&mut self) -> impl Iterator<Item = &mut Polygon> {
        self.polygons.iter_mut()
    }
}

impl From<Vec<Polygon>> for PolyhedralSurface {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self::new(polygons)
    }
}

impl From<TriangulatedSurface> for PolyhedralSurface {
    fn from(surface: TriangulatedSurface) -> Self {
        surface.to_polyhedral_surface()
    }
}

impl GeometryType for PolyhedralSurface {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::PolyhedralSurface
    }

    fn dimension(&self) -> u8 {
        2
    }

    fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    fn is_3d(&self) -> bool {
        self.polygons.first().is_some_and(Polygon::is_3d)
    }

    fn is_measured(&self) -> bool {
        self.polygons.first().is_some_and(Polygon::is_measured)
    }
}

/// Surface consisting of triangles (TIN).
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangulatedSurface {
    triangles: Vec<Triangle>,
}

impl TriangulatedSurface {
    /// Creates a new surface.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Returns `n`-th triangle.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn triangle_n(&self, n: usize) -> &Triangle {
        &self.triangles[n]
    }

    /// Returns `n`-th triangle mutably.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn triangle_n_mut(&mut self, n: usize) -> &mut Triangle {
        &mut self.triangles[n]
    }

    /// Appends a triangle.
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Appends all triangles of another surface, keeping their order.
    pub fn add_triangles(&mut self, other: TriangulatedSurface) {
        self.triangles.extend(other.triangles);
    }

    /// Triangles of the surface.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Iterates over the triangles mutably.
    pub fn triangles_mut(&mut self) -> impl Iterator<Item = &mut Triangle> {
        self.triangles.iter_mut()
    }

    /// Converts every triangle into a polygon.
    pub fn to_polyhedral_surface(&self) -> PolyhedralSurface {
        PolyhedralSurface::new(self.triangles.iter().map(Triangle::to_polygon).collect())
    }
}

impl From<Vec<Triangle>> for TriangulatedSurface {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self::new(triangles)
    }
}

impl FromIterator<Triangle> for TriangulatedSurface {
    fn from_iter<T: IntoIterator<Item = Triangle>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl GeometryType for TriangulatedSurface {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::TriangulatedSurface
    }

    fn dimension(&self) -> u8 {
        2
    }

    fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn is_3d(&self) -> bool {
        self.triangles.first().is_some_and(Triangle::is_3d)
    }

    fn is_measured(&self) -> bool {
        self.triangles.first().is_some_and(Triangle::is_measured)
    }
}
