use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryVisitor;
use crate::collection::{
    Collection, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
use crate::envelope::{Envelope, EnvelopeVisitor};
use crate::error::TesseraTypesError;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;
use crate::visitor::{GeometryVisitor, GeometryVisitorMut};
use crate::wkt::WktWriter;

/// Any geometry.
///
/// Algorithms either match on the variants directly or implement [`GeometryVisitor`]/[`GeometryVisitorMut`] and run
/// them with [`Geometry::accept`]/[`Geometry::accept_mut`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Point.
    Point(Point),
    /// Line string.
    LineString(LineString),
    /// Polygon.
    Polygon(Polygon),
    /// Triangle.
    Triangle(Triangle),
    /// Solid.
    Solid(Solid),
    /// Collection of points.
    MultiPoint(MultiPoint),
    /// Collection of line strings.
    MultiLineString(MultiLineString),
    /// Collection of polygons.
    MultiPolygon(MultiPolygon),
    /// Collection of solids.
    MultiSolid(MultiSolid),
    /// Heterogeneous collection.
    GeometryCollection(GeometryCollection),
    /// Surface of polygons.
    PolyhedralSurface(PolyhedralSurface),
    /// Surface of triangles.
    TriangulatedSurface(TriangulatedSurface),
}

macro_rules! dispatch {
    ($value:expr, $g:ident => $body:expr) => {
        match $value {
            Geometry::Point($g) => $body,
            Geometry::LineString($g) => $body,
            Geometry::Polygon($g) => $body,
            Geometry::Triangle($g) => $body,
            Geometry::Solid($g) => $body,
            Geometry::MultiPoint($g) => $body,
            Geometry::MultiLineString($g) => $body,
            Geometry::MultiPolygon($g) => $body,
            Geometry::MultiSolid($g) => $body,
            Geometry::GeometryCollection($g) => $body,
            Geometry::PolyhedralSurface($g) => $body,
            Geometry::TriangulatedSurface($g) => $body,
        }
    };
}

impl Geometry {
    /// Runs the visitor method that matches the variant.
    pub fn accept<V: GeometryVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Geometry::Point(g) => visitor.visit_point(g),
            Geometry::LineString(g) => visitor.visit_line_string(g),
            Geometry::Polygon(g) => visitor.visit_polygon(g),
            Geometry::Triangle(g) => visitor.visit_triangle(g),
            Geometry::Solid(g) => visitor.visit_solid(g),
            Geometry::MultiPoint(g) => visitor.visit_multi_point(g),
            Geometry::MultiLineString(g) => visitor.visit_multi_line_string(g),
            Geometry::MultiPolygon(g) => visitor.visit_multi_polygon(g),
            Geometry::MultiSolid(g) => visitor.visit_multi_solid(g),
            Geometry::GeometryCollection(g) => visitor.visit_geometry_collection(g),
            Geometry::PolyhedralSurface(g) => visitor.visit_polyhedral_surface(g),
            Geometry::TriangulatedSurface(g) => visitor.visit_triangulated_surface(g),
        }
    }

    /// Runs the mutable visitor method that matches the variant.
    pub fn accept_mut<V: GeometryVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output {
        match self {
            Geometry::Point(g) => visitor.visit_point(g),
            Geometry::LineString(g) => visitor.visit_line_string(g),
            Geometry::Polygon(g) => visitor.visit_polygon(g),
            Geometry::Triangle(g) => visitor.visit_triangle(g),
            Geometry::Solid(g) => visitor.visit_solid(g),
            Geometry::MultiPoint(g) => visitor.visit_multi_point(g),
            Geometry::MultiLineString(g) => visitor.visit_multi_line_string(g),
            Geometry::MultiPolygon(g) => visitor.visit_multi_polygon(g),
            Geometry::MultiSolid(g) => visitor.visit_multi_solid(g),
            Geometry::GeometryCollection(g) => visitor.visit_geometry_collection(g),
            Geometry::PolyhedralSurface(g) => visitor.visit_polyhedral_surface(g),
            Geometry::TriangulatedSurface(g) => visitor.visit_triangulated_surface(g),
        }
    }

    /// Returns the collection interface for collection variants.
    pub fn as_collection(&self) -> Option<&dyn Collection> {
        match self {
            Geometry::MultiPoint(g) => Some(g),
            Geometry::MultiLineString(g) => Some(g),
            Geometry::MultiPolygon(g) => Some(g),
            Geometry::MultiSolid(g) => Some(g),
            Geometry::GeometryCollection(g) => Some(g),
            _ => None,
        }
    }

    /// Number of members for collections, 1 for any other geometry.
    pub fn num_geometries(&self) -> usize {
        match self.as_collection() {
            Some(collection) => collection.num_geometries(),
            None => 1,
        }
    }

    /// Returns `n`-th member of a collection. Any other geometry returns itself for `n == 0`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn geometry_n(&self, n: usize) -> &Geometry {
        match self.as_collection() {
            Some(collection) => collection.geometry_n(n),
            None => {
                assert_eq!(n, 0, "geometry index out of range");
                self
            }
        }
    }

    /// Computes the bounding box of the geometry.
    pub fn envelope(&self) -> Envelope {
        let mut visitor = EnvelopeVisitor::default();
        self.accept(&mut visitor);
        visitor.into_envelope()
    }

    /// Computes the boundary of the geometry.
    ///
    /// Fails with [`TesseraTypesError::Unsupported`] for solids and heterogeneous collections.
    pub fn boundary(&self) -> Result<Geometry, TesseraTypesError> {
        self.accept(&mut BoundaryVisitor)
    }

    /// Writes the geometry as WKT with the given number of decimals, or losslessly if `decimals` is `None`.
    pub fn as_text(&self, decimals: Option<usize>) -> String {
        WktWriter::new(decimals).write(self)
    }
}

impl GeometryType for Geometry {
    fn geometry_type_id(&self) -> GeometryTypeId {
        dispatch!(self, g => g.geometry_type_id())
    }

    fn dimension(&self) -> u8 {
        dispatch!(self, g => g.dimension())
    }

    fn is_empty(&self) -> bool {
        dispatch!(self, g => g.is_empty())
    }

    fn is_3d(&self) -> bool {
        dispatch!(self, g => g.is_3d())
    }

    fn is_measured(&self) -> bool {
        dispatch!(self, g => g.is_measured())
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text(None))
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<Geometry> for $variant {
                type Error = Geometry;

                fn try_from(value: Geometry) -> Result<Self, Self::Error> {
                    match value {
                        Geometry::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_from_variant!(
    Point,
    LineString,
    Polygon,
    Triangle,
    Solid,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    MultiSolid,
    GeometryCollection,
    PolyhedralSurface,
    TriangulatedSurface
);
