use geo_types::{Coord, CoordFloat};

use crate::collection::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
use crate::coordinate::Coordinate;
use crate::geometry::Geometry;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::triangle::Triangle;

fn coordinate<T: CoordFloat>(coord: Coord<T>) -> Coordinate {
    Coordinate::xy(
        coord.x.to_f64().unwrap_or(f64::NAN),
        coord.y.to_f64().unwrap_or(f64::NAN),
    )
}

impl<T: CoordFloat> From<Coord<T>> for Coordinate {
    fn from(value: Coord<T>) -> Self {
        coordinate(value)
    }
}

impl<T: CoordFloat> From<geo_types::Point<T>> for Point {
    fn from(value: geo_types::Point<T>) -> Self {
        coordinate(value.0).into()
    }
}

impl<T: CoordFloat> From<geo_types::LineString<T>> for LineString {
    fn from(value: geo_types::LineString<T>) -> Self {
        LineString::from_coordinates(value.0.into_iter().map(coordinate))
    }
}

impl<T: CoordFloat> From<geo_types::Polygon<T>> for Polygon {
    fn from(value: geo_types::Polygon<T>) -> Self {
        let (exterior, interiors) = value.into_inner();
        Polygon::new(
            exterior.into(),
            interiors.into_iter().map(LineString::from).collect(),
        )
    }
}

impl<T: CoordFloat> From<geo_types::Triangle<T>> for Triangle {
    fn from(value: geo_types::Triangle<T>) -> Self {
        let [p, q, r] = value.to_array().map(|c| Point::from(coordinate(c)));
        Triangle::new(p, q, r)
    }
}

impl<T: CoordFloat> From<geo_types::MultiPoint<T>> for MultiPoint {
    fn from(value: geo_types::MultiPoint<T>) -> Self {
        value.0.into_iter().map(Point::from).collect()
    }
}

impl<T: CoordFloat> From<geo_types::MultiLineString<T>> for MultiLineString {
    fn from(value: geo_types::MultiLineString<T>) -> Self {
        value.0.into_iter().map(LineString::from).collect()
    }
}

impl<T: CoordFloat> From<geo_types::MultiPolygon<T>> for MultiPolygon {
    fn from(value: geo_types::MultiPolygon<T>) -> Self {
        value.0.into_iter().map(Polygon::from).collect()
    }
}

impl<T: CoordFloat> From<geo_types::Geometry<T>> for Geometry {
    fn from(value: geo_types::Geometry<T>) -> Self {
        match value {
            geo_types::Geometry::Point(v) => Point::from(v).into(),
            geo_types::Geometry::Line(v) => {
                LineString::from_coordinates([coordinate(v.start), coordinate(v.end)]).into()
            }
            geo_types::Geometry::LineString(v) => LineString::from(v).into(),
            geo_types::Geometry::Polygon(v) => Polygon::from(v).into(),
            geo_types::Geometry::MultiPoint(v) => MultiPoint::from(v).into(),
            geo_types::Geometry::MultiLineString(v) => MultiLineString::from(v).into(),
            geo_types::Geometry::MultiPolygon(v) => MultiPolygon::from(v).into(),
            geo_types::Geometry::GeometryCollection(v) => v
                .0
                .into_iter()
                .map(Geometry::from)
                .collect::<GeometryCollection>()
                .into(),
            geo_types::Geometry::Rect(v) => Polygon::from(v.to_polygon()).into(),
            geo_types::Geometry::Triangle(v) => Triangle::from(v).into(),
        }
    }
}
