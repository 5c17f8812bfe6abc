use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::point::Point;

/// Ordered sequence of points.
///
/// Unlike [`Polygon`](crate::Polygon) rings, a line string does not have to be closed. It is considered closed when it
/// is not empty and its first and last points have equal coordinates.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    /// Creates a new line string.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a line string with the given coordinates.
    pub fn from_coordinates(coordinates: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            points: coordinates.into_iter().map(Point::from).collect(),
        }
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns `n`-th point.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn point_n(&self, n: usize) -> &Point {
        &self.points[n]
    }

    /// Returns `n`-th point.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn point_n_mut(&mut self, n: usize) -> &mut Point {
        &mut self.points[n]
    }

    /// First point of the line string.
    pub fn start_point(&self) -> Option<&Point> {
        self.points.first()
    }

    /// Last point of the line string.
    pub fn end_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Appends a point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Points of the line string.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates over the points mutably.
    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        self.points.iter_mut()
    }

    /// Iterates over the coordinates of the points.
    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.points.iter().map(Point::coordinate)
    }

    /// Iterates over consecutive pairs of points.
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// True if the line string is not empty and its first and last points are the same.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first.coordinate() == last.coordinate(),
            _ => false,
        }
    }

    /// Reverses the order of points.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Removes all the points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl From<Vec<Point>> for LineString {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for LineString {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl GeometryType for LineString {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::LineString
    }

    fn dimension(&self) -> u8 {
        1
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn is_3d(&self) -> bool {
        self.points.first().is_some_and(Point::is_3d)
    }

    fn is_measured(&self) -> bool {
        self.points.first().is_some_and(Point::is_measured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed() {
        let mut line = LineString::default();
        assert!(!line.is_closed());

        line.add_point(Point::new(0.0, 0.0));
        assert!(line.is_closed());

        line.add_point(Point::new(1.0, 1.0));
        assert!(!line.is_closed());

        line.add_point(Point::new(0.0, 0.0));
        assert!(line.is_closed());
    }

    #[test]
    fn dimension_follows_first_point() {
        let line = LineString::new(vec![Point::new_3d(0.0, 0.0, 1.0), Point::new(1.0, 1.0)]);
        assert!(line.is_3d());
        assert_eq!(line.coordinate_dimension(), 3);
        assert!(!LineString::default().is_3d());
    }
}
