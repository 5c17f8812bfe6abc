use crate::collection::{Collection, MultiSolid};
use crate::coordinate::Coordinate;
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::polygon::Polygon;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;

#[derive(Debug, Copy, Clone)]
struct Ordinates {
    z: bool,
    m: bool,
}

impl Ordinates {
    fn of(geometry: &impl GeometryType) -> Self {
        Self {
            z: geometry.is_3d(),
            m: geometry.is_measured(),
        }
    }

    fn tag(self) -> &'static str {
        match (self.z, self.m) {
            (false, false) => "",
            (true, false) => " Z",
            (false, true) => " M",
            (true, true) => " ZM",
        }
    }
}

/// Writes geometries as WKT.
///
/// ```
/// use tessera_types::{Geometry, Point, WktWriter};
///
/// let point = Geometry::from(Point::new(1.0, 2.5));
/// assert_eq!(WktWriter::new(None).write(&point), "POINT (1 2.5)");
/// assert_eq!(WktWriter::new(Some(2)).write(&point), "POINT (1.00 2.50)");
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct WktWriter {
    decimals: Option<usize>,
}

impl WktWriter {
    /// Creates a writer. With `decimals: None` numbers are written with the shortest representation that reads back
    /// to the same value.
    pub fn new(decimals: Option<usize>) -> Self {
        Self { decimals }
    }

    /// Number of decimals the writer uses.
    pub fn decimals(&self) -> Option<usize> {
        self.decimals
    }

    /// Returns WKT of the geometry.
    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        self.write_geometry(&mut out, geometry);
        out
    }

    fn write_geometry(&self, out: &mut String, geometry: &Geometry) {
        let name = match geometry.geometry_type_id() {
            GeometryTypeId::TriangulatedSurface => "TIN",
            id => id.name(),
        };
        let ordinates = Ordinates::of(geometry);

        out.push_str(name);
        out.push_str(ordinates.tag());
        out.push(' ');

        if geometry.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        match geometry {
            Geometry::Point(point) => {
                out.push('(');
                self.write_coordinate(out, point.coordinate(), ordinates);
                out.push(')');
            }
            Geometry::LineString(line_string) => self.write_line_string(out, line_string, ordinates),
            Geometry::Polygon(polygon) => self.write_polygon(out, polygon, ordinates),
            Geometry::Triangle(triangle) => self.write_triangle(out, triangle, ordinates),
            Geometry::Solid(solid) => self.write_solid(out, solid, ordinates),
            Geometry::MultiPoint(multi_point) => {
                self.write_list(out, multi_point.points(), |out, point| {
                    if point.is_empty() {
                        out.push_str("EMPTY");
                    } else {
                        out.push('(');
                        self.write_coordinate(out, point.coordinate(), ordinates);
                        out.push(')');
                    }
                })
            }
            Geometry::MultiLineString(multi_line_string) => {
                self.write_list(out, multi_line_string.line_strings(), |out, line_string| {
                    self.write_line_string(out, line_string, ordinates)
                })
            }
            Geometry::MultiPolygon(multi_polygon) => {
                self.write_list(out, multi_polygon.polygons(), |out, polygon| {
                    self.write_polygon(out, polygon, ordinates)
                })
            }
            Geometry::MultiSolid(multi_solid) => self.write_multi_solid(out, multi_solid, ordinates),
            Geometry::GeometryCollection(collection) => {
                self.write_list(out, collection.geometries().iter(), |out, member| {
                    self.write_geometry(out, member)
                })
            }
            Geometry::PolyhedralSurface(surface) => {
                self.write_polyhedral_surface(out, surface, ordinates)
            }
            Geometry::TriangulatedSurface(surface) => {
                self.write_triangulated_surface(out, surface, ordinates)
            }
        }
    }

    fn write_list<'a, T: 'a>(
        &self,
        out: &mut String,
        items: impl IntoIterator<Item = &'a T>,
        mut write_item: impl FnMut(&mut String, &'a T),
    ) {
        out.push('(');
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            write_item(out, item);
        }
        out.push(')');
    }

    fn write_number(&self, out: &mut String, value: f64) {
        match self.decimals {
            Some(decimals) => out.push_str(&format!("{value:.decimals$}")),
            None => out.push_str(&format!("{value}")),
        }
    }

    fn write_coordinate(&self, out: &mut String, coordinate: &Coordinate, ordinates: Ordinates) {
        self.write_number(out, coordinate.x());
        out.push(' ');
        self.write_number(out, coordinate.y());
        if ordinates.z {
            out.push(' ');
            self.write_number(out, coordinate.z());
        }
        if ordinates.m {
            out.push(' ');
            self.write_number(out, coordinate.m());
        }
    }

    fn write_line_string(&self, out: &mut String, line_string: &LineString, ordinates: Ordinates) {
        if line_string.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        self.write_list(out, line_string.coordinates(), |out, coordinate| {
            self.write_coordinate(out, coordinate, ordinates)
        });
    }

    fn write_polygon(&self, out: &mut String, polygon: &Polygon, ordinates: Ordinates) {
        if polygon.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        self.write_list(out, polygon.rings(), |out, ring| {
            self.write_line_string(out, ring, ordinates)
        });
    }

    fn write_triangle(&self, out: &mut String, triangle: &Triangle, ordinates: Ordinates) {
        if triangle.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        out.push('(');
        self.write_line_string(out, &triangle.to_ring(), ordinates);
        out.push(')');
    }

    fn write_polyhedral_surface(
        &self,
        out: &mut String,
        surface: &PolyhedralSurface,
        ordinates: Ordinates,
    ) {
        if surface.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        self.write_list(out, surface.polygons(), |out, polygon| {
            self.write_polygon(out, polygon, ordinates)
        });
    }

    fn write_triangulated_surface(
        &self,
        out: &mut String,
        surface: &TriangulatedSurface,
        ordinates: Ordinates,
    ) {
        self.write_list(out, surface.triangles(), |out, triangle| {
            self.write_triangle(out, triangle, ordinates)
        });
    }

    fn write_solid(&self, out: &mut String, solid: &Solid, ordinates: Ordinates) {
        if solid.is_empty() {
            out.push_str("EMPTY");
            return;
        }

        self.write_list(out, solid.shells(), |out, shell| {
            self.write_polyhedral_surface(out, shell, ordinates)
        });
    }

    fn write_multi_solid(&self, out: &mut String, multi_solid: &MultiSolid, ordinates: Ordinates) {
        self.write_list(out, multi_solid.solids(), |out, solid| {
            self.write_solid(out, solid, ordinates)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
    use crate::coordinate::Coordinate;
    use crate::point::Point;

    fn ring(points: &[(f64, f64, f64)]) -> LineString {
        points
            .iter()
            .map(|&(x, y, z)| Point::new_3d(x, y, z))
            .collect()
    }

    fn wkt(geometry: impl Into<Geometry>) -> String {
        WktWriter::new(None).write(&geometry.into())
    }

    #[test]
    fn points() {
        insta::assert_snapshot!(wkt(Point::new(1.0, 2.0)), @"POINT (1 2)");
        insta::assert_snapshot!(wkt(Point::new_3d(1.0, 2.0, 3.5)), @"POINT Z (1 2 3.5)");
        insta::assert_snapshot!(wkt(Point::from(Coordinate::xy(1.0, 2.0).with_m(4.0))), @"POINT M (1 2 4)");
        insta::assert_snapshot!(
            wkt(Point::from(Coordinate::xyz(1.0, 2.0, 3.0).with_m(4.0))),
            @"POINT ZM (1 2 3 4)"
        );
        insta::assert_snapshot!(wkt(Point::empty()), @"POINT EMPTY");
    }

    #[test]
    fn decimals() {
        let geometry = Geometry::from(Point::new(1.0 / 3.0, -2.0));
        insta::assert_snapshot!(WktWriter::new(Some(3)).write(&geometry), @"POINT (0.333 -2.000)");
        insta::assert_snapshot!(geometry.as_text(Some(0)), @"POINT (0 -2)");
    }

    #[test]
    fn surfaces() {
        let square = ring(&[
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 0.0),
        ]);
        insta::assert_snapshot!(
            wkt(Polygon::from(square.clone())),
            @"POLYGON Z ((0 0 0,1 0 0,1 1 0,0 1 0,0 0 0))"
        );

        let triangle = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        );
        insta::assert_snapshot!(wkt(triangle), @"TRIANGLE ((0 0,1 0,0 1,0 0))");
        insta::assert_snapshot!(
            wkt(TriangulatedSurface::new(vec![triangle, triangle])),
            @"TIN (((0 0,1 0,0 1,0 0)),((0 0,1 0,0 1,0 0)))"
        );
        insta::assert_snapshot!(
            wkt(Solid::from(PolyhedralSurface::new(vec![Polygon::from(square)]))),
            @"SOLID Z ((((0 0 0,1 0 0,1 1 0,0 1 0,0 0 0))))"
        );
    }

    #[test]
    fn collections() {
        insta::assert_snapshot!(
            wkt(MultiPoint::new(vec![Point::new(0.0, 0.0), Point::empty()])),
            @"MULTIPOINT ((0 0),EMPTY)"
        );
        insta::assert_snapshot!(
            wkt(MultiLineString::new(vec![
                LineString::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]),
                LineString::default(),
            ])),
            @"MULTILINESTRING ((0 0,1 1),EMPTY)"
        );
        insta::assert_snapshot!(wkt(MultiPolygon::default()), @"MULTIPOLYGON EMPTY");

        let mut collection = GeometryCollection::default();
        collection.push(Point::new(0.0, 0.0));
        collection.push(LineString::default());
        insta::assert_snapshot!(wkt(collection), @"GEOMETRYCOLLECTION (POINT (0 0),LINESTRING EMPTY)");
    }
}
