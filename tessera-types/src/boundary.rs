//! Topological boundary of geometries.
//!
//! | Input | Boundary |
//! |---|---|
//! | Point, MultiPoint | empty collection |
//! | LineString | end points as MultiPoint, or empty collection if the line is closed |
//! | Polygon | exterior ring, or MultiLineString of all rings if there are holes |
//! | Triangle | ring `(v0, v1, v2, v0)`, or empty collection for an empty triangle |
//! | MultiLineString | points where exactly one segment ends, as Point or MultiPoint |
//! | MultiPolygon, PolyhedralSurface, TriangulatedSurface | edges used by exactly one patch, merged into LineString or MultiLineString |
//! | Solid, MultiSolid, GeometryCollection | not supported |
//!
//! The ring of a triangle is closed by construction, so every non-empty triangle has its ring as the boundary. Only
//! the empty triangle, which has no ring, falls back to the empty collection.
//!
//! Boundary edges of surfaces are chained into line strings by walking from edge to edge through shared vertices. For
//! a surface whose boundary is a set of simple rings, every chain is one closed ring.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::collection::{
    GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
use crate::coordinate::{Coordinate, CoordinateKey};
use crate::error::TesseraTypesError;
use crate::geometry::Geometry;
use crate::geometry_type::GeometryType;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;
use crate::visitor::GeometryVisitor;

/// Computes the boundary of the visited geometry. See module documentation for details.
#[derive(Debug, Default, Copy, Clone)]
pub struct BoundaryVisitor;

type BoundaryResult = Result<Geometry, TesseraTypesError>;

fn empty() -> BoundaryResult {
    Ok(GeometryCollection::default().into())
}

fn unsupported(geometry: &impl GeometryType) -> BoundaryResult {
    Err(TesseraTypesError::Unsupported {
        operation: "boundary",
        geometry_type: geometry.geometry_type(),
    })
}

/// Graph with vertices identified by coordinates.
///
/// Edges are undirected and not deduplicated: adding the same segment twice yields an edge with multiplicity 2.
#[derive(Debug, Default)]
struct CoordinateGraph {
    vertices: Vec<Coordinate>,
    index: BTreeMap<CoordinateKey, usize>,
    degrees: Vec<usize>,
    edges: Vec<(usize, usize)>,
}

impl CoordinateGraph {
    fn vertex(&mut self, coordinate: &Coordinate) -> usize {
        if let Some(&id) = self.index.get(&coordinate.key()) {
            return id;
        }

        let id = self.vertices.len();
        self.vertices.push(*coordinate);
        self.degrees.push(0);
        self.index.insert(coordinate.key(), id);
        id
    }

    fn add_line_string(&mut self, line_string: &LineString) {
        let ids: Vec<usize> = line_string.coordinates().map(|c| self.vertex(c)).collect();
        for w in ids.windows(2) {
            self.edges.push((w[0], w[1]));
            self.degrees[w[0]] += 1;
            self.degrees[w[1]] += 1;
        }
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        for ring in polygon.rings() {
            self.add_line_string(ring);
        }
    }

    fn boundary_from_points(&self) -> BoundaryResult {
        let mut points: Vec<Point> = self
            .degrees
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 1)
            .map(|(id, _)| Point::from(self.vertices[id]))
            .collect();

        match points.len() {
            0 => empty(),
            1 => Ok(points.remove(0).into()),
            _ => Ok(MultiPoint::new(points).into()),
        }
    }

    fn boundary_from_polygons(&self) -> BoundaryResult {
        let mut multiplicity: AHashMap<(usize, usize), usize> = AHashMap::new();
        for &(a, b) in &self.edges {
            *multiplicity.entry((a.min(b), a.max(b))).or_default() += 1;
        }

        let edges: Vec<(usize, usize)> = self
            .edges
            .iter()
            .copied()
            .filter(|&(a, b)| a != b && multiplicity.get(&(a.min(b), a.max(b))) == Some(&1))
            .collect();

        let mut incident: AHashMap<usize, Vec<usize>> = AHashMap::new();
        for (index, &(a, b)) in edges.iter().enumerate() {
            incident.entry(a).or_default().push(index);
            incident.entry(b).or_default().push(index);
        }

        let mut used = vec![false; edges.len()];
        let mut lines = vec![];
        for (index, &(start, second)) in edges.iter().enumerate() {
            if used[index] {
                continue;
            }
            used[index] = true;

            let mut chain = vec![start, second];
            let mut current = second;
            while current != start {
                let next = incident
                    .get(&current)
                    .and_then(|candidates| candidates.iter().copied().find(|&e| !used[e]));
                let Some(next) = next else {
                    break;
                };

                used[next] = true;
                let (a, b) = edges[next];
                current = if a == current { b } else { a };
                chain.push(current);
            }

            lines.push(LineString::from_coordinates(
                chain.into_iter().map(|id| self.vertices[id]),
            ));
        }

        match lines.len() {
            0 => empty(),
            1 => Ok(lines.remove(0).into()),
            _ => Ok(MultiLineString::new(lines).into()),
        }
    }
}

impl GeometryVisitor for BoundaryVisitor {
    type Output = BoundaryResult;

    fn visit_point(&mut self, _point: &Point) -> BoundaryResult {
        empty()
    }

    fn visit_line_string(&mut self, line_string: &LineString) -> BoundaryResult {
        if line_string.is_empty() || line_string.is_closed() {
            return empty();
        }

        let (Some(start), Some(end)) = (line_string.start_point(), line_string.end_point()) else {
            return empty();
        };

        Ok(MultiPoint::new(vec![*start, *end]).into())
    }

    fn visit_polygon(&mut self, polygon: &Polygon) -> BoundaryResult {
        if polygon.is_empty() {
            return empty();
        }

        if !polygon.has_interior_rings() {
            return Ok(polygon.exterior_ring().clone().into());
        }

        Ok(MultiLineString::new(polygon.rings().cloned().collect()).into())
    }

    fn visit_triangle(&mut self, triangle: &Triangle) -> BoundaryResult {
        if triangle.is_empty() {
            return empty();
        }

        Ok(triangle.to_ring().into())
    }

    fn visit_solid(&mut self, solid: &Solid) -> BoundaryResult {
        unsupported(solid)
    }

    fn visit_multi_point(&mut self, _multi_point: &MultiPoint) -> BoundaryResult {
        empty()
    }

    fn visit_multi_line_string(&mut self, multi_line_string: &MultiLineString) -> BoundaryResult {
        let mut graph = CoordinateGraph::default();
        for line_string in multi_line_string.line_strings() {
            graph.add_line_string(line_string);
        }

        graph.boundary_from_points()
    }

    fn visit_multi_polygon(&mut self, multi_polygon: &MultiPolygon) -> BoundaryResult {
        let mut graph = CoordinateGraph::default();
        for polygon in multi_polygon.polygons() {
            graph.add_polygon(polygon);
        }

        graph.boundary_from_polygons()
    }

    fn visit_multi_solid(&mut self, multi_solid: &MultiSolid) -> BoundaryResult {
        unsupported(multi_solid)
    }

    fn visit_geometry_collection(&mut self, collection: &GeometryCollection) -> BoundaryResult {
        unsupported(collection)
    }

    fn visit_polyhedral_surface(&mut self, surface: &PolyhedralSurface) -> BoundaryResult {
        let mut graph = CoordinateGraph::default();
        for polygon in surface.polygons() {
            graph.add_polygon(polygon);
        }

        graph.boundary_from_polygons()
    }

    fn visit_triangulated_surface(&mut self, surface: &TriangulatedSurface) -> BoundaryResult {
        let mut graph = CoordinateGraph::default();
        for triangle in surface.triangles() {
            graph.add_line_string(&triangle.to_ring());
        }

        graph.boundary_from_polygons()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::collection::Collection;

    fn line(points: &[(f64, f64)]) -> LineString {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn open_line_string() {
        let boundary = Geometry::from(line(&[(0.0, 0.0), (1.0, 1.0)]))
            .boundary()
            .unwrap();
        assert_eq!(
            boundary,
            MultiPoint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).into()
        );
    }

    #[test]
    fn closed_line_string() {
        let boundary = Geometry::from(line(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]))
            .boundary()
            .unwrap();
        assert_eq!(boundary, GeometryCollection::default().into());
    }

    #[test]
    fn polygon() {
        let exterior = line(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]);
        let hole = line(&[(1.0, 0.5), (2.0, 0.5), (2.0, 1.0), (1.0, 0.5)]);

        let boundary = Geometry::from(Polygon::from(exterior.clone()))
            .boundary()
            .unwrap();
        assert_eq!(boundary, exterior.clone().into());

        let boundary = Geometry::from(Polygon::new(exterior.clone(), vec![hole.clone()]))
            .boundary()
            .unwrap();
        assert_eq!(boundary, MultiLineString::new(vec![exterior, hole]).into());
    }

    #[test]
    fn triangle() {
        let triangle = Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        );
        let boundary = Geometry::from(triangle).boundary().unwrap();
        assert_eq!(
            boundary,
            line(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]).into()
        );
        assert_matches!(&boundary, Geometry::LineString(ring) if ring.is_closed());

        let boundary = Geometry::from(Triangle::default()).boundary().unwrap();
        assert_eq!(boundary, GeometryCollection::default().into());
    }

    #[test]
    fn multi_line_string_end_points() {
        let lines = MultiLineString::new(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (2.0, 0.0)]),
        ]);
        let boundary = Geometry::from(lines).boundary().unwrap();
        assert_eq!(
            boundary,
            MultiPoint::new(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]).into()
        );

        let lines = MultiLineString::new(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (1.0, 1.0)]),
            line(&[(1.0, 1.0), (0.0, 0.0)]),
        ]);
        let boundary = Geometry::from(lines).boundary().unwrap();
        assert_eq!(boundary, GeometryCollection::default().into());

        let lines = MultiLineString::new(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, 0.0)]),
        ]);
        let boundary = Geometry::from(lines).boundary().unwrap();
        assert_eq!(boundary, Point::new(0.0, 0.0).into());
    }

    #[test]
    fn surface_boundary_is_merged_into_rings() {
        let surface = TriangulatedSurface::new(vec![
            Triangle::new(
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ),
            Triangle::new(
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
            ),
        ]);
        let boundary = Geometry::from(surface).boundary().unwrap();
        let Geometry::LineString(ring) = boundary else {
            panic!("invalid geometry type");
        };

        assert!(ring.is_closed());
        assert_eq!(ring.num_points(), 5);
    }

    #[test]
    fn disjoint_polygons_have_separate_rings() {
        let square = |offset: f64| {
            Polygon::from(line(&[
                (offset, 0.0),
                (offset + 1.0, 0.0),
                (offset + 1.0, 1.0),
                (offset, 1.0),
                (offset, 0.0),
            ]))
        };
        let polygons = MultiPolygon::new(vec![square(0.0), square(3.0)]);
        let boundary = Geometry::from(polygons).boundary().unwrap();
        let Geometry::MultiLineString(rings) = boundary else {
            panic!("invalid geometry type");
        };

        assert_eq!(rings.num_geometries(), 2);
        assert!(rings.line_strings().all(|r| r.is_closed() && r.num_points() == 5));
    }

    #[test]
    fn closed_surface_has_empty_boundary() {
        let shell = crate::Envelope::new_3d(0.0, 1.0, 0.0, 1.0, 0.0, 1.0).to_shell();
        let boundary = Geometry::from(shell).boundary().unwrap();
        assert_eq!(boundary, GeometryCollection::default().into());
    }

    #[test]
    fn unsupported_types() {
        for geometry in [
            Geometry::from(Solid::default()),
            MultiSolid::default().into(),
            GeometryCollection::default().into(),
        ] {
            let expected = geometry.geometry_type();
            assert_matches!(
                geometry.boundary(),
                Err(TesseraTypesError::Unsupported { operation: "boundary", geometry_type }) if geometry_type == expected
            );
        }
    }
}
