//! Area of surface geometries.

use tessera_types::{signed_area_2d, Collection, Geometry, Polygon, Triangle};

use crate::error::TesseraError;
use crate::triangulate::triangulate_polygon_3d;
use crate::triangulation::to_vector;

/// Area of the geometry projected to the `xy` plane.
///
/// Polygon area is the area of the exterior ring minus areas of the holes, independent of ring orientation. Areas of
/// surfaces and collection members are summed. Points, lines and solids have zero area.
pub fn area_2d(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Point(_)
        | Geometry::LineString(_)
        | Geometry::MultiPoint(_)
        | Geometry::MultiLineString(_)
        | Geometry::Solid(_)
        | Geometry::MultiSolid(_) => 0.0,
        Geometry::Polygon(polygon) => polygon_area_2d(polygon),
        Geometry::Triangle(triangle) => triangle_area_2d(triangle),
        Geometry::MultiPolygon(multi_polygon) => multi_polygon.polygons().map(polygon_area_2d).sum(),
        Geometry::PolyhedralSurface(surface) => surface.polygons().iter().map(polygon_area_2d).sum(),
        Geometry::TriangulatedSurface(surface) => {
            surface.triangles().iter().map(triangle_area_2d).sum()
        }
        Geometry::GeometryCollection(collection) => {
            collection.geometries().iter().map(area_2d).sum()
        }
    }
}

fn polygon_area_2d(polygon: &Polygon) -> f64 {
    let exterior = signed_area_2d(polygon.exterior_ring()).abs();
    let holes: f64 = polygon
        .interior_rings()
        .map(|ring| signed_area_2d(ring).abs())
        .sum();
    exterior - holes
}

fn triangle_area_2d(triangle: &Triangle) -> f64 {
    signed_area_2d(&triangle.to_ring()).abs()
}

/// Area of the geometry in 3d.
///
/// Polygons are triangulated in their own planes with [`triangulate_polygon_3d`], and the areas of the triangles are
/// summed. Solids return the area of all their shells. 2d geometries are treated as lying at `z = 0`.
///
/// # Errors
///
/// Returns the triangulation error of the first polygon that cannot be triangulated.
pub fn area_3d(geometry: &Geometry) -> Result<f64, TesseraError> {
    let surface = triangulate_polygon_3d(geometry)?;
    Ok(surface.triangles().iter().map(triangle_area_3d).sum())
}

fn triangle_area_3d(triangle: &Triangle) -> f64 {
    let [p, q, r] = triangle.vertices();
    let (p, q, r) = (
        to_vector(p.coordinate()),
        to_vector(q.coordinate()),
        to_vector(r.coordinate()),
    );
    (q - p).cross(&(r - p)).norm() / 2.0
}
