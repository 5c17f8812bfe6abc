//! Axis aligned bounding boxes.

use serde::{Deserialize, Serialize};

use crate::collection::{
    Collection, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
use crate::coordinate::Coordinate;
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;
use crate::visitor::GeometryVisitor;

/// Closed interval of values, possibly empty.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    bounds: Option<(f64, f64)>,
}

impl Interval {
    /// Empty interval.
    pub const fn empty() -> Self {
        Self { bounds: None }
    }

    /// Creates an interval between two values in any order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self {
                bounds: Some((a, b)),
            }
        } else {
            Self {
                bounds: Some((b, a)),
            }
        }
    }

    /// True if the interval contains no values.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Lower bound.
    pub fn lower(&self) -> Option<f64> {
        self.bounds.map(|(l, _)| l)
    }

    /// Upper bound.
    pub fn upper(&self) -> Option<f64> {
        self.bounds.map(|(_, u)| u)
    }

    /// Grows the interval to include `value`. `NaN` values are ignored.
    pub fn expand_to_include(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }

        self.bounds = match self.bounds {
            None => Some((value, value)),
            Some((l, u)) => Some((l.min(value), u.max(value))),
        };
    }

    /// Grows the interval to include another one.
    pub fn merge(&mut self, other: &Interval) {
        if let Some((l, u)) = other.bounds {
            self.expand_to_include(l);
            self.expand_to_include(u);
        }
    }

    /// True if `other` lies inside `self`. Empty intervals are contained in any interval.
    pub fn contains(&self, other: &Interval) -> bool {
        match (self.bounds, other.bounds) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some((l, u)), Some((ol, ou))) => l <= ol && ou <= u,
        }
    }

    /// True if the intervals have at least one common value.
    pub fn intersects(&self, other: &Interval) -> bool {
        match (self.bounds, other.bounds) {
            (Some((l, u)), Some((ol, ou))) => l <= ou && ol <= u,
            _ => false,
        }
    }
}

/// Bounding box with one interval per axis.
///
/// The envelope is empty if either `x` or `y` interval is empty. It is 3d if it is not empty and `z` interval is not
/// empty.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    x: Interval,
    y: Interval,
    z: Interval,
}

impl Envelope {
    /// Empty envelope.
    pub const fn empty() -> Self {
        Self {
            x: Interval::empty(),
            y: Interval::empty(),
            z: Interval::empty(),
        }
    }

    /// Creates a 2d envelope.
    pub fn new_2d(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x: Interval::new(x_min, x_max),
            y: Interval::new(y_min, y_max),
            z: Interval::empty(),
        }
    }

    /// Creates a 3d envelope.
    pub fn new_3d(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_min: f64, z_max: f64) -> Self {
        Self {
            x: Interval::new(x_min, x_max),
            y: Interval::new(y_min, y_max),
            z: Interval::new(z_min, z_max),
        }
    }

    /// Envelope of a single coordinate. Empty for an empty coordinate.
    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        let mut envelope = Self::empty();
        envelope.expand_to_include(coordinate);
        envelope
    }

    /// Envelope of a set of coordinates.
    pub fn from_coordinates<'a>(coordinates: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut envelope = Self::empty();
        for c in coordinates {
            envelope.expand_to_include(c);
        }
        envelope
    }

    /// True if the envelope contains no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// True if the envelope has `z` bounds.
    pub fn is_3d(&self) -> bool {
        !self.is_empty() && !self.z.is_empty()
    }

    /// Grows the envelope to include the coordinate. Empty coordinates are ignored.
    pub fn expand_to_include(&mut self, coordinate: &Coordinate) {
        if coordinate.is_empty() {
            return;
        }

        self.x.expand_to_include(coordinate.x());
        self.y.expand_to_include(coordinate.y());
        if let Some(z) = coordinate.z_opt() {
            self.z.expand_to_include(z);
        }
    }

    /// Grows the envelope to include another one.
    pub fn merge(&mut self, other: &Envelope) {
        self.x.merge(&other.x);
        self.y.merge(&other.y);
        self.z.merge(&other.z);
    }

    /// Interval along `x` axis.
    pub fn x_interval(&self) -> Interval {
        self.x
    }

    /// Interval along `y` axis.
    pub fn y_interval(&self) -> Interval {
        self.y
    }

    /// Interval along `z` axis.
    pub fn z_interval(&self) -> Interval {
        self.z
    }

    /// Minimum `x`, `NaN` if empty.
    pub fn x_min(&self) -> f64 {
        self.x.lower().unwrap_or(f64::NAN)
    }

    /// Maximum `x`, `NaN` if empty.
    pub fn x_max(&self) -> f64 {
        self.x.upper().unwrap_or(f64::NAN)
    }

    /// Minimum `y`, `NaN` if empty.
    pub fn y_min(&self) -> f64 {
        self.y.lower().unwrap_or(f64::NAN)
    }

    /// Maximum `y`, `NaN` if empty.
    pub fn y_max(&self) -> f64 {
        self.y.upper().unwrap_or(f64::NAN)
    }

    /// Minimum `z`, `NaN` if not 3d.
    pub fn z_min(&self) -> f64 {
        self.z.lower().unwrap_or(f64::NAN)
    }

    /// Maximum `z`, `NaN` if not 3d.
    pub fn z_max(&self) -> f64 {
        self.z.upper().unwrap_or(f64::NAN)
    }

    /// True if `b` lies inside `a`.
    ///
    /// An empty envelope is contained in any envelope. `z` bounds are compared only when both envelopes are 3d.
    pub fn contains(a: &Envelope, b: &Envelope) -> bool {
        if b.is_empty() {
            return true;
        }
        if a.is_empty() {
            return false;
        }

        let xy = a.x.contains(&b.x) && a.y.contains(&b.y);
        if a.is_3d() && b.is_3d() {
            xy && a.z.contains(&b.z)
        } else {
            xy
        }
    }

    /// True if the envelopes have at least one common point.
    ///
    /// Empty envelopes overlap nothing. `z` bounds are compared only when both envelopes are 3d.
    pub fn overlaps(a: &Envelope, b: &Envelope) -> bool {
        if a.is_empty() || b.is_empty() {
            return false;
        }

        let xy = a.x.intersects(&b.x) && a.y.intersects(&b.y);
        if a.is_3d() && b.is_3d() {
            xy && a.z.intersects(&b.z)
        } else {
            xy
        }
    }

    /// Closed counterclockwise ring around the `xy` extent. Empty line string for an empty envelope.
    pub fn to_ring(&self) -> LineString {
        if self.is_empty() {
            return LineString::default();
        }

        let (x0, x1, y0, y1) = (self.x_min(), self.x_max(), self.y_min(), self.y_max());
        LineString::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            Point::new(x0, y0),
        ])
    }

    /// Closed box surface with outward oriented faces. Empty surface if the envelope is not 3d.
    pub fn to_shell(&self) -> PolyhedralSurface {
        if !self.is_3d() {
            return PolyhedralSurface::default();
        }

        let (x0, x1) = (self.x_min(), self.x_max());
        let (y0, y1) = (self.y_min(), self.y_max());
        let (z0, z1) = (self.z_min(), self.z_max());

        let corners = [
            Point::new_3d(x0, y0, z0),
            Point::new_3d(x1, y0, z0),
            Point::new_3d(x1, y1, z0),
            Point::new_3d(x0, y1, z0),
            Point::new_3d(x0, y0, z1),
            Point::new_3d(x1, y0, z1),
            Point::new_3d(x1, y1, z1),
            Point::new_3d(x0, y1, z1),
        ];
        let face = |ids: [usize; 4]| {
            Polygon::from(LineString::new(vec![
                corners[ids[0]],
                corners[ids[1]],
                corners[ids[2]],
                corners[ids[3]],
                corners[ids[0]],
            ]))
        };

        PolyhedralSurface::new(vec![
            face([0, 3, 2, 1]),
            face([4, 5, 6, 7]),
            face([0, 1, 5, 4]),
            face([1, 2, 6, 5]),
            face([2, 3, 7, 6]),
            face([3, 0, 4, 7]),
        ])
    }
}

/// Accumulates the envelope of every visited coordinate.
#[derive(Debug, Default)]
pub struct EnvelopeVisitor {
    envelope: Envelope,
}

impl EnvelopeVisitor {
    /// Envelope accumulated so far.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Consumes the visitor returning the accumulated envelope.
    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    fn visit_members(&mut self, collection: &impl Collection) {
        for g in collection.geometries() {
            self.visit_geometry(g);
        }
    }
}

impl GeometryVisitor for EnvelopeVisitor {
    type Output = ();

    fn visit_point(&mut self, point: &Point) {
        self.envelope.expand_to_include(point.coordinate());
    }

    fn visit_line_string(&mut self, line_string: &LineString) {
        for c in line_string.coordinates() {
            self.envelope.expand_to_include(c);
        }
    }

    fn visit_polygon(&mut self, polygon: &Polygon) {
        for ring in polygon.rings() {
            self.visit_line_string(ring);
        }
    }

    fn visit_triangle(&mut self, triangle: &Triangle) {
        for v in triangle.vertices() {
            self.visit_point(v);
        }
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
