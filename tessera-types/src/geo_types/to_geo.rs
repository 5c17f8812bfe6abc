use geo_types::Coord;

use crate::collection::Collection;
use crate::coordinate::Coordinate;
use crate::error::TesseraTypesError;
use crate::geometry::Geometry;
use crate::geometry_type::GeometryType;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::triangle::Triangle;

fn unsupported(geometry: &impl GeometryType) -> TesseraTypesError {
    TesseraTypesError::Unsupported {
        operation: "conversion to geo-types",
        geometry_type: geometry.geometry_type(),
    }
}

fn coord(coordinate: &Coordinate) -> Coord<f64> {
    Coord {
        x: coordinate.x(),
        y: coordinate.y(),
    }
}

fn point(point: &Point) -> Result<geo_types::Point<f64>, TesseraTypesError> {
    if point.is_empty() {
        return Err(unsupported(point));
    }

    Ok(geo_types::Point(coord(point.coordinate())))
}

fn line_string(line_string: &LineString) -> geo_types::LineString<f64> {
    line_string.coordinates().map(coord).collect()
}

fn polygon(polygon: &Polygon) -> geo_types::Polygon<f64> {
    geo_types::Polygon::new(
        line_string(polygon.exterior_ring()),
        polygon.interior_rings().map(line_string).collect(),
    )
}

fn triangle(triangle: &Triangle) -> geo_types::Polygon<f64> {
    polygon(&triangle.to_polygon())
}

impl TryFrom<&Geometry> for geo_types::Geometry<f64> {
    type Error = TesseraTypesError;

    fn try_from(value: &Geometry) -> Result<Self, Self::Error> {
        let geometry = match value {
            Geometry::Point(p) => point(p)?.into(),
            Geometry::LineString(l) => line_string(l).into(),
            Geometry::Polygon(p) => polygon(p).into(),
            Geometry::Triangle(t) => {
                let [a, b, c] = t.vertices();
                geo_types::Triangle::new(
                    coord(a.coordinate()),
                    coord(b.coordinate()),
                    coord(c.coordinate()),
                )
                .into()
            }
            Geometry::MultiPoint(mp) => mp
                .points()
                .map(point)
                .collect::<Result<Vec<_>, _>>()
                .map(geo_types::MultiPoint::new)?
                .into(),
            Geometry::MultiLineString(ml) => {
                geo_types::MultiLineString::new(ml.line_strings().map(line_string).collect())
                    .into()
            }
            Geometry::MultiPolygon(mp) => {
                geo_types::MultiPolygon::new(mp.polygons().map(polygon).collect()).into()
            }
            Geometry::PolyhedralSurface(s) => {
                geo_types::MultiPolygon::new(s.polygons().iter().map(polygon).collect()).into()
            }
            Geometry::TriangulatedSurface(s) => {
                geo_types::MultiPolygon::new(s.triangles().iter().map(triangle).collect()).into()
            }
            Geometry::GeometryCollection(c) => {
                geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection::new_from(
                    c.geometries()
                        .iter()
                        .map(geo_types::Geometry::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                ))
            }
            Geometry::Solid(s) => return Err(unsupported(s)),
            Geometry::MultiSolid(s) => return Err(unsupported(s)),
        };

        Ok(geometry)
    }
}
