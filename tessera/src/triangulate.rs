//! Conversion of polygonal geometries into triangulated surfaces.

use robust::Coord;
use tessera_types::{
    Collection, Coordinate, Geometry, GeometryCollection, GeometryType, GeometryVisitor,
    LineString, MultiLineString, MultiPoint, MultiPolygon, MultiSolid, Point, Polygon,
    PolyhedralSurface, Solid, Triangle, TriangulatedSurface,
};

use crate::error::TesseraError;
use crate::triangulation::{to_vector, ConstraintDelaunayTriangulation, Plane, VertexHandle};

/// Triangulates every polygon of the geometry and collects the triangles into one surface.
///
/// Polygons are triangulated in their own plane, so 3d polygons of any orientation are supported. Holes and islands
/// inside holes are respected. Triangles and triangulated surfaces are copied as they are, points and lines are
/// skipped. Members of surfaces, solids and collections are processed in order, and their triangles are appended in
/// the same order.
///
/// Vertices of the output triangles are the input coordinates, with their `z` and `m` values.
///
/// # Errors
///
/// * [`TesseraError::NoPlane`] if all points of a polygon exterior ring are collinear.
/// * [`TesseraError::ConstraintIntersection`] if rings of a polygon intersect each other or themselves.
pub fn triangulate_polygon_3d(geometry: &Geometry) -> Result<TriangulatedSurface, TesseraError> {
    let mut surface = TriangulatedSurface::default();
    if geometry.is_empty() {
        return Ok(surface);
    }

    geometry.accept(&mut PolygonTriangulator {
        surface: &mut surface,
    })?;
    Ok(surface)
}

/// Triangulates one polygon, appending the triangles inside it to `surface`.
///
/// Does nothing for an empty polygon. On error `surface` is not changed.
pub fn triangulate_polygon(
    polygon: &Polygon,
    surface: &mut TriangulatedSurface,
) -> Result<(), TesseraError> {
    if polygon.is_empty() {
        return Ok(());
    }

    let plane = find_plane(polygon)?;
    let mut cdt = ConstraintDelaunayTriangulation::new();
    if polygon.is_3d() {
        cdt.set_projection_plane(plane);
    }

    for ring in polygon.rings() {
        add_chain(&mut cdt, ring.coordinates(), true);
    }

    cdt.mark_domains();
    cdt.get_triangles(surface, true)
}

/// Finds the plane of the polygon exterior ring.
///
/// The plane goes through the first point of the ring, the first point different from it and the first point not
/// collinear with these two. Normal of the plane points to the side from which the exterior ring runs
/// counter-clockwise.
pub fn find_plane(polygon: &Polygon) -> Result<Plane, TesseraError> {
    let points: Vec<Coordinate> = polygon
        .exterior_ring()
        .coordinates()
        .filter(|c| !c.is_empty())
        .copied()
        .collect();

    let no_plane = || TesseraError::NoPlane(Geometry::Polygon(polygon.clone()).to_string());

    let Some(first) = points.first() else {
        return Err(no_plane());
    };
    let p = to_vector(first);
    let Some(q) = points.iter().map(to_vector).find(|q| *q != p) else {
        return Err(no_plane());
    };
    let Some(r) = points
        .iter()
        .map(to_vector)
        .find(|r| !is_collinear(&p, &q, r))
    else {
        return Err(no_plane());
    };

    let plane = Plane::from_points(p, q, r).ok_or_else(no_plane)?;
    if newell_normal(&points).dot(&plane.normal()) < 0.0 {
        Ok(plane.flipped())
    } else {
        Ok(plane)
    }
}

type Vector = nalgebra::Vector3<f64>;

/// Exact test: three points are collinear if their projections to all three coordinate planes are collinear.
fn is_collinear(p: &Vector, q: &Vector, r: &Vector) -> bool {
    [(0, 1), (1, 2), (2, 0)].into_iter().all(|(i, j)| {
        let coord = |v: &Vector| Coord { x: v[i], y: v[j] };
        robust::orient2d(coord(p), coord(q), coord(r)) == 0.0
    })
}

/// Normal of a ring computed with Newell's method. Its length is twice the area of the ring.
fn newell_normal(points: &[Coordinate]) -> Vector {
    let mut normal = Vector::zeros();
    for (current, next) in points.iter().zip(points.iter().cycle().skip(1)) {
        let (a, b) = (to_vector(current), to_vector(next));
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }

    normal
}

/// Inserts points as vertices and constrains the segments between consecutive points. A closed chain also gets the
/// segment from the last point to the first one.
fn add_chain<'a>(
    cdt: &mut ConstraintDelaunayTriangulation,
    coordinates: impl Iterator<Item = &'a Coordinate>,
    closed: bool,
) {
    let handles: Vec<VertexHandle> = coordinates
        .filter(|c| !c.is_empty())
        .map(|c| cdt.add_vertex(c))
        .collect();

    for pair in handles.windows(2) {
        cdt.add_constraint(pair[0], pair[1]);
    }

    if closed {
        if let (Some(&first), Some(&last)) = (handles.first(), handles.last()) {
            cdt.add_constraint(last, first);
        }
    }
}

struct PolygonTriangulator<'a> {
    surface: &'a mut TriangulatedSurface,
}

impl PolygonTriangulator<'_> {
    fn skip(&self, geometry: &dyn GeometryType) -> Result<(), TesseraError> {
        log::debug!(
            "Skipping {} in polygon triangulation",
            geometry.geometry_type()
        );
        Ok(())
    }

    fn visit_members(&mut self, collection: &dyn Collection) -> Result<(), TesseraError> {
        for member in collection.geometries() {
            self.visit_geometry(member)?;
        }

        Ok(())
    }
}

impl GeometryVisitor for PolygonTriangulator<'_> {
    type Output = Result<(), TesseraError>;

    fn visit_point(&mut self, point: &Point) -> Self::Output {
        self.skip(point)
    }

    fn visit_line_string(&mut self, line_string: &LineString) -> Self::Output {
        self.skip(line_string)
    }

    fn visit_polygon(&mut self, polygon: &Polygon) -> Self::Output {
        triangulate_polygon(polygon, self.surface)
    }

    fn visit_triangle(&mut self, triangle: &Triangle) -> Self::Output {
        if !triangle.is_empty() {
            self.surface.add_triangle(triangle.clone());
        }
        Ok(())
    }

    fn visit_solid(&mut self, solid: &Solid) -> Self::Output {
        for shell in solid.shells() {
            self.visit_polyhedral_surface(shell)?;
        }
        Ok(())
    }

    fn visit_multi_point(&mut self, multi_point: &MultiPoint) -> Self::Output {
        self.skip(multi_point)
    }

    fn visit_multi_line_string(&mut self, multi_line_string: &MultiLineString) -> Self::Output {
        self.skip(multi_line_string)
    }

    fn visit_multi_polygon(&mut self, multi_polygon: &MultiPolygon) -> Self::Output {
        self.visit_members(multi_polygon)
    }

    fn visit_multi_solid(&mut self, multi_solid: &MultiSolid) -> Self::Output {
        self.visit_members(multi_solid)
    }

    fn visit_geometry_collection(&mut self, collection: &GeometryCollection) -> Self::Output {
        self.visit_members(collection)
    }

    fn visit_polyhedral_surface(&mut self, surface: &PolyhedralSurface) -> Self::Output {
        for polygon in surface.polygons() {
            triangulate_polygon(polygon, self.surface)?;
        }
        Ok(())
    }

    fn visit_triangulated_surface(&mut self, surface: &TriangulatedSurface) -> Self::Output {
        self.surface.add_triangles(surface.clone());
        Ok(())
    }
}

/// Triangulates all points of the geometry in the `xy` plane, keeping their `z` values.
///
/// Every line string, polygon ring and triangle edge becomes a constraint, points become free vertices. All
/// triangles of the convex hull are returned, nothing is filtered by rings.
///
/// # Errors
///
/// Fails with [`TesseraError::ConstraintIntersection`] if constraint lines cross each other.
pub fn triangulate_2dz(geometry: &Geometry) -> Result<TriangulatedSurface, TesseraError> {
    let mut cdt = ConstraintDelaunayTriangulation::new();
    geometry.accept(&mut ConstraintCollector { cdt: &mut cdt });

    let mut surface = TriangulatedSurface::default();
    cdt.get_triangles(&mut surface, false)?;
    Ok(surface)
}

struct ConstraintCollector<'a> {
    cdt: &'a mut ConstraintDelaunayTriangulation,
}

impl ConstraintCollector<'_> {
    fn visit_members(&mut self, collection: &dyn Collection) {
        for member in collection.geometries() {
            self.visit_geometry(member);
        }
    }
}

impl GeometryVisitor for ConstraintCollector<'_> {
    type Output = ();

    fn visit_point(&mut self, point: &Point) {
        if !point.is_empty() {
            self.cdt.add_vertex(point.coordinate());
        }
    }

    fn visit_line_string(&mut self, line_string: &LineString) {
        add_chain(self.cdt, line_string.coordinates(), false);
    }

    fn visit_polygon(&mut self, polygon: &Polygon) {
        for ring in polygon.rings() {
            add_chain(self.cdt, ring.coordinates(), true);
        }
    }

    fn visit_triangle(&mut self, triangle: &Triangle) {
        add_chain(
            self.cdt,
            triangle.vertices().iter().map(Point::coordinate),
            true,
        );
    }

    fn visit_solid(&mut self, solid: &Solid) {
        for shell in solid.shells() {
            self.visit_polyhedral_surface(shell);
        }
    }

    fn visit_multi_point(&mut self, multi_point: &MultiPoint) {
        self.visit_members(multi_point);
    }

    fn visit_multi_line_string(&mut self, multi_line_string: &MultiLineString) {
        self.visit_members(multi_line_string);
    }

    fn visit_multi_polygon(&mut self, multi_polygon: &MultiPolygon) {
        self.visit_members(multi_polygon);
    }

    fn visit_multi_solid(&mut self, multi_solid: &MultiSolid) {
        self.visit_members(multi_solid);
    }

    fn visit_geometry_collection(&mut self, collection: &GeometryCollection) {
        self.visit_members(collection);
    }

    fn visit_polyhedral_surface(&mut self, surface: &PolyhedralSurface) {
        for polygon in surface.polygons() {
            self.visit_polygon(polygon);
        }
    }

    fn visit_triangulated_surface(&mut self, surface: &TriangulatedSurface) {
        for triangle in surface.triangles() {
            self.visit_triangle(triangle);
        }
    }
}
