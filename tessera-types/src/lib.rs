//! Geometry model used by `tessera`.
//!
//! The crate defines twelve concrete geometry types, from [`Point`] to [`Solid`] and [`TriangulatedSurface`], and the
//! closed [`Geometry`] enum that holds any of them. Every geometry reports its properties through the
//! [`GeometryType`] trait, collections additionally implement [`Collection`].
//!
//! Operations over arbitrary geometries are written either as a `match` on [`Geometry`] or as a
//! [`GeometryVisitor`]. The crate itself uses visitors for [`Geometry::envelope`] and [`Geometry::boundary`].
//!
//! Geometries can be written to and read from WKT with [`WktWriter`] and [`read_wkt`]. With the `geo-types` feature
//! (enabled by default) they can also be converted from and to [`geo_types`] geometries.

mod boundary;
mod collection;
mod coordinate;
mod envelope;
pub mod error;
mod geometry;
mod geometry_type;
mod line_string;
mod point;
mod polygon;
mod registry;
mod solid;
mod surface;
mod triangle;
mod visitor;
mod wkt;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use boundary::BoundaryVisitor;
pub use collection::{
    Collection, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
pub use coordinate::{Coordinate, CoordinateKey};
pub use envelope::{Envelope, EnvelopeVisitor, Interval};
pub use error::TesseraTypesError;
pub use geometry::Geometry;
pub use geometry_type::{GeometryType, GeometryTypeId};
pub use line_string::LineString;
pub use point::Point;
pub use polygon::{signed_area_2d, Polygon};
pub use registry::GeometryRegistry;
pub use solid::Solid;
pub use surface::{PolyhedralSurface, TriangulatedSurface};
pub use triangle::Triangle;
pub use visitor::{GeometryVisitor, GeometryVisitorMut, Visitable};
pub use wkt::{read_wkt, WktWriter};
