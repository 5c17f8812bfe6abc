//! See documentation for [`GeometryType`] trait.
use serde::{Deserialize, Serialize};

/// Identifier of a concrete geometry type.
///
/// Numeric values follow the OGC type codes, with `Solid` and `MultiSolid` taking the values used by ISO 19107
/// extensions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[repr(u32)]
pub enum GeometryTypeId {
    /// [`Point`](crate::Point)
    Point = 1,
    /// [`LineString`](crate::LineString)
    LineString = 2,
    /// [`Polygon`](crate::Polygon)
    Polygon = 3,
    /// [`MultiPoint`](crate::MultiPoint)
    MultiPoint = 4,
    /// [`MultiLineString`](crate::MultiLineString)
    MultiLineString = 5,
    /// [`MultiPolygon`](crate::MultiPolygon)
    MultiPolygon = 6,
    /// [`GeometryCollection`](crate::GeometryCollection)
    GeometryCollection = 7,
    /// [`PolyhedralSurface`](crate::PolyhedralSurface)
    PolyhedralSurface = 15,
    /// [`TriangulatedSurface`](crate::TriangulatedSurface)
    TriangulatedSurface = 16,
    /// [`Triangle`](crate::Triangle)
    Triangle = 17,
    /// [`Solid`](crate::Solid)
    Solid = 101,
    /// [`MultiSolid`](crate::MultiSolid)
    MultiSolid = 102,
}

impl GeometryTypeId {
    /// All type ids, in the order of their numeric values.
    pub const ALL: [GeometryTypeId; 12] = [
        Self::Point,
        Self::LineString,
        Self::Polygon,
        Self::MultiPoint,
        Self::MultiLineString,
        Self::MultiPolygon,
        Self::GeometryCollection,
        Self::PolyhedralSurface,
        Self::TriangulatedSurface,
        Self::Triangle,
        Self::Solid,
        Self::MultiSolid,
    ];

    /// Upper case type name as used in WKT.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::GeometryCollection => "GEOMETRYCOLLECTION",
            Self::PolyhedralSurface => "POLYHEDRALSURFACE",
            Self::TriangulatedSurface => "TRIANGULATEDSURFACE",
            Self::Triangle => "TRIANGLE",
            Self::Solid => "SOLID",
            Self::MultiSolid => "MULTISOLID",
        }
    }

    /// Finds type id by its name. Case insensitive, `TIN` is accepted as an alias of `TRIANGULATEDSURFACE`.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        if upper == "TIN" {
            return Some(Self::TriangulatedSurface);
        }

        Self::ALL.into_iter().find(|id| id.name() == upper)
    }

    /// Numeric code of the type.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// Properties every geometry exposes regardless of its concrete type.
pub trait GeometryType {
    /// Type id of the geometry.
    fn geometry_type_id(&self) -> GeometryTypeId;

    /// Type name of the geometry, e.g. `"POLYGON"`.
    fn geometry_type(&self) -> &'static str {
        self.geometry_type_id().name()
    }

    /// Topological dimension: 0 for points, 1 for curves, 2 for surfaces and 3 for solids.
    ///
    /// Collections report the maximum dimension of their members, or 0 when empty.
    fn dimension(&self) -> u8;

    /// Returns true if the geometry has no points.
    fn is_empty(&self) -> bool;

    /// Returns true if the geometry has `z` coordinates. Empty geometries are 2d.
    fn is_3d(&self) -> bool;

    /// Returns true if the geometry carries measures. Empty geometries are not measured.
    fn is_measured(&self) -> bool;

    /// Number of values per coordinate: 2, 3 or 4.
    fn coordinate_dimension(&self) -> u8 {
        2 + u8::from(self.is_3d()) + u8::from(self.is_measured())
    }
}
