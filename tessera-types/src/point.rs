use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::geometry_type::{GeometryType, GeometryTypeId};

/// Point geometry: a single [`Coordinate`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coordinate: Coordinate,
}

impl Point {
    /// Creates an empty point.
    pub const fn empty() -> Self {
        Self {
            coordinate: Coordinate::empty(),
        }
    }

    /// Creates a 2d point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            coordinate: Coordinate::xy(x, y),
        }
    }

    /// Creates a 3d point.
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            coordinate: Coordinate::xyz(x, y, z),
        }
    }

    /// Coordinate of the point.
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Mutable coordinate of the point.
    pub fn coordinate_mut(&mut self) -> &mut Coordinate {
        &mut self.coordinate
    }

    /// `x` value, `NaN` for empty point.
    pub fn x(&self) -> f64 {
        self.coordinate.x()
    }

    /// `y` value, `NaN` for empty point.
    pub fn y(&self) -> f64 {
        self.coordinate.y()
    }

    /// `z` value, `NaN` if the point is not 3d.
    pub fn z(&self) -> f64 {
        self.coordinate.z()
    }

    /// Measure, `NaN` if the point is not measured.
    pub fn m(&self) -> f64 {
        self.coordinate.m()
    }

    /// Sets the measure of the point.
    pub fn set_m(&mut self, m: f64) {
        self.coordinate.set_m(Some(m));
    }
}

impl From<Coordinate> for Point {
    fn from(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl GeometryType for Point {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::Point
    }

    fn dimension(&self) -> u8 {
        0
    }

    fn is_empty(&self) -> bool {
        self.coordinate.is_empty()
    }

    fn is_3d(&self) -> bool {
        self.coordinate.is_3d()
    }

    fn is_measured(&self) -> bool {
        self.coordinate.is_measured()
    }
}
