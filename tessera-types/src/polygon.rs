use serde::{Deserialize, Serialize};

use crate::error::TesseraTypesError;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::triangle::Triangle;

/// Polygon geometry. Polygon consists of one exterior ring and zero or more interior rings.
///
/// Interior rings represent *holes* in a polygon. A polygon always has an exterior ring: an empty polygon has one
/// empty exterior ring, never zero rings.
///
/// Rings are expected to be closed line strings, but this is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRings")]
pub struct Polygon {
    rings: Vec<LineString>,
}

#[derive(Deserialize)]
struct PolygonRings {
    rings: Vec<LineString>,
}

impl TryFrom<PolygonRings> for Polygon {
    type Error = TesseraTypesError;

    fn try_from(value: PolygonRings) -> Result<Self, Self::Error> {
        if value.rings.is_empty() {
            return Err(TesseraTypesError::MissingExterior {
                geometry_type: GeometryTypeId::Polygon.name(),
            });
        }

        Ok(Self { rings: value.rings })
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self {
            rings: vec![LineString::default()],
        }
    }
}

impl Polygon {
    /// Creates a new polygon.
    pub fn new(exterior_ring: LineString, interior_rings: Vec<LineString>) -> Self {
        let mut rings = Vec::with_capacity(interior_rings.len() + 1);
        rings.push(exterior_ring);
        rings.extend(interior_rings);
        Self { rings }
    }

    /// Exterior ring.
    pub fn exterior_ring(&self) -> &LineString {
        &self.rings[0]
    }

    /// Mutable exterior ring.
    pub fn exterior_ring_mut(&mut self) -> &mut LineString {
        &mut self.rings[0]
    }

    /// Number of rings including the exterior one.
    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    /// Returns `n`-th ring, ring 0 being the exterior one.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn ring_n(&self, n: usize) -> &LineString {
        &self.rings[n]
    }

    /// Returns `n`-th ring mutably, ring 0 being the exterior one.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn ring_n_mut(&mut self, n: usize) -> &mut LineString {
        &mut self.rings[n]
    }

    /// Number of holes.
    pub fn num_interior_rings(&self) -> usize {
        self.rings.len() - 1
    }

    /// True if the polygon has holes.
    pub fn has_interior_rings(&self) -> bool {
        self.rings.len() > 1
    }

    /// Returns `n`-th hole.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn interior_ring_n(&self, n: usize) -> &LineString {
        &self.rings[n + 1]
    }

    /// Adds a hole.
    pub fn add_interior_ring(&mut self, ring: LineString) {
        self.rings.push(ring);
    }

    /// Iterates over all the rings starting with the exterior one.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        self.rings.iter()
    }

    /// Iterates over all the rings mutably starting with the exterior one.
    pub fn rings_mut(&mut self) -> impl Iterator<Item = &mut LineString> {
        self.rings.iter_mut()
    }

    /// Iterates over the holes.
    pub fn interior_rings(&self) -> impl Iterator<Item = &LineString> {
        self.rings[1..].iter()
    }

    /// Reverses orientation of every ring.
    pub fn reverse(&mut self) {
        for ring in &mut self.rings {
            ring.reverse();
        }
    }

    /// Returns true if the exterior ring goes counterclockwise in the `xy` plane.
    pub fn is_counter_clockwise_oriented(&self) -> bool {
        signed_area_2d(self.exterior_ring()) > 0.0
    }
}

/// Signed area of a ring projected to the `xy` plane, positive for counterclockwise rings.
///
/// The ring is treated as closed even if its last point differs from the first one.
pub fn signed_area_2d(ring: &LineString) -> f64 {
    let points = ring.points();
    if points.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..points.len() {
        let p = &points[i];
        let q = &points[(i + 1) % points.len()];
        sum += p.x() * q.y() - q.x() * p.y();
    }

    sum / 2.0
}

impl From<LineString> for Polygon {
    fn from(exterior_ring: LineString) -> Self {
        Self {
            rings: vec![exterior_ring],
        }
    }
}

impl From<Triangle> for Polygon {
    fn from(triangle: Triangle) -> Self {
        triangle.to_polygon()
    }
}

impl GeometryType for Polygon {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::Polygon
    }

    fn dimension(&self) -> u8 {
        2
    }

    fn is_empty(&self) -> bool {
        self.exterior_ring().is_empty()
    }

    fn is_3d(&self) -> bool {
        self.exterior_ring().is_3d()
    }

    fn is_measured(&self) -> bool {
        self.exterior_ring().is_measured()
    }
}
