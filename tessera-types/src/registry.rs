//! Prototypes of all geometry types.

use crate::collection::{
    GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;

/// Holds one empty default instance of every geometry type, in the order of [`GeometryTypeId::ALL`].
///
/// The registry is an ordinary value: create it where it is needed and pass it around.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRegistry {
    prototypes: Vec<Geometry>,
}

impl Default for GeometryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryRegistry {
    /// Creates a registry with all 12 geometry types.
    pub fn new() -> Self {
        let prototypes = GeometryTypeId::ALL
            .into_iter()
            .map(empty_geometry)
            .collect();

        Self { prototypes }
    }

    /// Empty prototypes of all types.
    pub fn prototypes(&self) -> &[Geometry] {
        &self.prototypes
    }

    /// Names of registered types.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.prototypes.iter().map(|g| g.geometry_type())
    }

    /// Returns an empty geometry of the type with the given name. Name lookup is case insensitive.
    pub fn by_name(&self, name: &str) -> Option<Geometry> {
        GeometryTypeId::from_name(name).and_then(|id| self.by_type_id(id))
    }

    /// Returns an empty geometry of the given type.
    pub fn by_type_id(&self, id: GeometryTypeId) -> Option<Geometry> {
        self.prototypes
            .iter()
            .find(|g| g.geometry_type_id() == id)
            .cloned()
    }
}

/// Creates an empty geometry of the given type.
pub(crate) fn empty_geometry(id: GeometryTypeId) -> Geometry {
    match id {
        GeometryTypeId::Point => Point::default().into(),
        GeometryTypeId::LineString => LineString::default().into(),
        GeometryTypeId::Polygon => Polygon::default().into(),
        GeometryTypeId::MultiPoint => MultiPoint::default().into(),
        GeometryTypeId::MultiLineString => MultiLineString::default().into(),
        GeometryTypeId::MultiPolygon => MultiPolygon::default().into(),
        GeometryTypeId::GeometryCollection => GeometryCollection::default().into(),
        GeometryTypeId::PolyhedralSurface => PolyhedralSurface::default().into(),
        GeometryTypeId::TriangulatedSurface => TriangulatedSurface::default().into(),
        GeometryTypeId::Triangle => Triangle::default().into(),
        GeometryTypeId::Solid => Solid::default().into(),
        GeometryTypeId::MultiSolid => MultiSolid::default().into(),
    }
}
