//! Double dispatch over geometry variants.
//!
//! A visitor has one method per concrete geometry type. [`Geometry::accept`] calls the method matching the variant,
//! and every concrete type implements [`Visitable`] so that typed values can be dispatched the same way.
//!
//! Visitors of collections usually recurse with [`GeometryVisitor::visit_geometry`] on the members.

use crate::collection::{
    GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
use crate::geometry::Geometry;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;

/// Visitor over immutable geometries.
pub trait GeometryVisitor {
    /// Value returned by every visit.
    type Output;

    /// Dispatches to the method matching the geometry variant.
    fn visit_geometry(&mut self, geometry: &Geometry) -> Self::Output {
        geometry.accept(self)
    }

    /// Visits a point.
    fn visit_point(&mut self, point: &Point) -> Self::Output;
    /// Visits a line string.
    fn visit_line_string(&mut self, line_string: &LineString) -> Self::Output;
    /// Visits a polygon.
    fn visit_polygon(&mut self, polygon: &Polygon) -> Self::Output;
    /// Visits a triangle.
    fn visit_triangle(&mut self, triangle: &Triangle) -> Self::Output;
    /// Visits a solid.
    fn visit_solid(&mut self, solid: &Solid) -> Self::Output;
    /// Visits a multipoint.
    fn visit_multi_point(&mut self, multi_point: &MultiPoint) -> Self::Output;
    /// Visits a multilinestring.
    fn visit_multi_line_string(&mut self, multi_line_string: &MultiLineString) -> Self::Output;
    /// Visits a multipolygon.
    fn visit_multi_polygon(&mut self, multi_polygon: &MultiPolygon) -> Self::Output;
    /// Visits a multisolid.
    fn visit_multi_solid(&mut self, multi_solid: &MultiSolid) -> Self::Output;
    /// Visits a heterogeneous collection.
    fn visit_geometry_collection(&mut self, collection: &GeometryCollection) -> Self::Output;
    /// Visits a polyhedral surface.
    fn visit_polyhedral_surface(&mut self, surface: &PolyhedralSurface) -> Self::Output;
    /// Visits a triangulated surface.
    fn visit_triangulated_surface(&mut self, surface: &TriangulatedSurface) -> Self::Output;
}

/// Visitor over mutable geometries.
pub trait GeometryVisitorMut {
    /// Value returned by every visit.
    type Output;

    /// Dispatches to the method matching the geometry variant.
    fn visit_geometry(&mut self, geometry: &mut Geometry) -> Self::Output {
        geometry.accept_mut(self)
    }

    /// Visits a point.
    fn visit_point(&mut self, point: &mut Point) -> Self::Output;
    /// Visits a line string.
    fn visit_line_string(&mut self, line_string: &mut LineString) -> Self::Output;
    /// Visits a polygon.
    fn visit_polygon(&mut self, polygon: &mut Polygon) -> Self::Output;
    /// Visits a triangle.
    fn visit_triangle(&mut self, triangle: &mut Triangle) -> Self::Output;
    /// Visits a solid.
    fn visit_solid(&mut self, solid: &mut Solid) -> Self::Output;
    /// Visits a multipoint.
    fn visit_multi_point(&mut self, multi_point: &mut MultiPoint) -> Self::Output;
    /// Visits a multilinestring.
    fn visit_multi_line_string(&mut self, multi_line_string: &mut MultiLineString)
        -> Self::Output;
    /// Visits a multipolygon.
    fn visit_multi_polygon(&mut self, multi_polygon: &mut MultiPolygon) -> Self::Output;
    /// Visits a multisolid.
    fn visit_multi_solid(&mut self, multi_solid: &mut MultiSolid) -> Self::Output;
    /// Visits a heterogeneous collection.
    fn visit_geometry_collection(&mut self, collection: &mut GeometryCollection)
        -> Self::Output;
    /// Visits a polyhedral surface.
    fn visit_polyhedral_surface(&mut self, surface: &mut PolyhedralSurface) -> Self::Output;
    /// Visits a triangulated surface.
    fn visit_triangulated_surface(&mut self, surface: &mut TriangulatedSurface)
        -> Self::Output;
}

/// Geometry that can be dispatched to a visitor.
pub trait Visitable {
    /// Calls the visitor method matching the type.
    fn accept<V: GeometryVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output;
    /// Calls the mutable visitor method matching the type.
    fn accept_mut<V: GeometryVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output;
}

impl Visitable for Geometry {
    fn accept<V: GeometryVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        Geometry::accept(self, visitor)
    }

    fn accept_mut<V: GeometryVisitorMut + ?Sized>(&mut self, visitor: &mut V) -> V::Output {
        Geometry::accept_mut(self, visitor)
    }
}

macro_rules! impl_visitable {
    ($($type:ident => $method:ident),* $(,)?) => {
        $(
            impl Visitable for $type {
                fn accept<V: GeometryVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }

                fn accept_mut<V: GeometryVisitorMut + ?Sized>(
                    &mut self,
                    visitor: &mut V,
                ) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

impl_visitable!(
    Point => visit_point,
    LineString => visit_line_string,
    Polygon => visit_polygon,
    Triangle => visit_triangle,
    Solid => visit_solid,
    MultiPoint => visit_multi_point,
    MultiLineString => visit_multi_line_string,
    MultiPolygon => visit_multi_polygon,
    MultiSolid => visit_multi_solid,
    GeometryCollection => visit_geometry_collection,
    PolyhedralSurface => visit_polyhedral_surface,
    TriangulatedSurface => visit_triangulated_surface,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::geometry_type::GeometryType;

    /// Collects visited type names, recursing into collections.
    #[derive(Default)]
    struct TypeNames(Vec<&'static str>);

    impl GeometryVisitor for TypeNames {
        type Output = ();

        fn visit_point(&mut self, _: &Point) {
            self.0.push("point");
        }
        fn visit_line_string(&mut self, _: &LineString) {
            self.0.push("line_string");
        }
        fn visit_polygon(&mut self, _: &Polygon) {
            self.0.push("polygon");
        }
        fn visit_triangle(&mut self, _: &Triangle) {
            self.0.push("triangle");
        }
        fn visit_solid(&mut self, _: &Solid) {
            self.0.push("solid");
        }
        fn visit_multi_point(&mut self, g: &MultiPoint) {
            self.0.push("multi_point");
            g.geometries().iter().for_each(|m| self.visit_geometry(m));
        }
        fn visit_multi_line_string(&mut self, g: &MultiLineString) {
            self.0.push("multi_line_string");
            g.geometries().iter().for_each(|m| self.visit_geometry(m));
        }
        fn visit_multi_polygon(&mut self, g: &MultiPolygon) {
            self.0.push("multi_polygon");
            g.geometries().iter().for_each(|m| self.visit_geometry(m));
        }
        fn visit_multi_solid(&mut self, g: &MultiSolid) {
            self.0.push("multi_solid");
            g.geometries().iter().for_each(|m| self.visit_geometry(m));
        }
        fn visit_geometry_collection(&mut self, g: &GeometryCollection) {
            self.0.push("geometry_collection");
            g.geometries().iter().for_each(|m| self.visit_geometry(m));
        }
        fn visit_polyhedral_surface(&mut self, _: &PolyhedralSurface) {
            self.0.push("polyhedral_surface");
        }
        fn visit_triangulated_surface(&mut self, _: &TriangulatedSurface) {
            self.0.push("triangulated_surface");
        }
    }

    /// Translates every point by a fixed offset.
    struct Translate(f64, f64);

    impl Translate {
        fn point(&self, p: &mut Point) {
            if !p.is_empty() {
                let c = p.coordinate();
                let moved = match c.z_opt() {
                    Some(z) => crate::Coordinate::xyz(c.x() + self.0, c.y() + self.1, z),
                    None => crate::Coordinate::xy(c.x() + self.0, c.y() + self.1),
                };
                *p.coordinate_mut() = moved;
            }
        }
    }

    impl GeometryVisitorMut for Translate {
        type Output = ();

        fn visit_point(&mut self, point: &mut Point) {
            self.point(point);
        }
        fn visit_line_string(&mut self, g: &mut LineString) {
            g.points_mut().for_each(|p| self.point(p));
        }
        fn visit_polygon(&mut self, g: &mut Polygon) {
            g.rings_mut().for_each(|r| self.visit_line_string(r));
        }
        fn visit_triangle(&mut self, g: &mut Triangle) {
            (0..3).for_each(|i| self.point(g.vertex_mut(i)));
        }
        fn visit_solid(&mut self, g: &mut Solid) {
            g.shells_mut().for_each(|s| self.visit_polyhedral_surface(s));
        }
        fn visit_multi_point(&mut self, g: &mut MultiPoint) {
            g.points_mut().for_each(|p| self.point(p));
        }
        fn visit_multi_line_string(&mut self, g: &mut MultiLineString) {
            g.line_strings_mut().for_each(|l| self.visit_line_string(l));
        }
        fn visit_multi_polygon(&mut self, g: &mut MultiPolygon) {
            g.polygons_mut().for_each(|p| self.visit_polygon(p));
        }
        fn visit_multi_solid(&mut self, g: &mut MultiSolid) {
            g.solids_mut().for_each(|s| self.visit_solid(s));
        }
        fn visit_geometry_collection(&mut self, g: &mut GeometryCollection) {
            g.geometries_mut().for_each(|m| self.visit_geometry(m));
        }
        fn visit_polyhedral_surface(&mut self, g: &mut PolyhedralSurface) {
            g.polygons_mut().for_each(|p| self.visit_polygon(p));
        }
        fn visit_triangulated_surface(&mut self, g: &mut TriangulatedSurface) {
            g.triangles_mut().for_each(|t| self.visit_triangle(t));
        }
    }

    #[test]
    fn dispatches_to_matching_method() {
        let geometry: Geometry = GeometryCollection::new(vec![
            Point::new(0.0, 0.0).into(),
            MultiPolygon::new(vec![Polygon::default()]).into(),
            Triangle::default().into(),
        ])
        .into();

        let mut names = TypeNames::default();
        geometry.accept(&mut names);
        assert_eq!(
            names.0,
            vec![
                "geometry_collection",
                "point",
                "multi_polygon",
                "polygon",
                "triangle"
            ]
        );
    }

    #[test]
    fn typed_values_dispatch_too() {
        let mut names = TypeNames::default();
        Solid::default().accept(&mut names);
        names.visit_geometry(&Geometry::from(LineString::default()));
        assert_eq!(names.0, vec!["solid", "line_string"]);
    }

    #[test]
    fn mutable_visitor() {
        let mut geometry: Geometry = MultiLineString::new(vec![LineString::new(vec![
            Point::new(0.0, 0.0),
            Point::new_3d(1.0, 1.0, 5.0),
        ])])
        .into();

        geometry.accept_mut(&mut Translate(1.0, 2.0));

        let Geometry::MultiLineString(lines) = &geometry else {
            panic!("invalid geometry type");
        };
        let line = lines.line_string_n(0);
        assert_eq!(line.point_n(0), &Point::new(1.0, 2.0));
        assert_eq!(line.point_n(1), &Point::new_3d(2.0, 3.0, 5.0));
    }
}
