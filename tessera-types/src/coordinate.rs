//! Point storage that can be empty, 2d or 3d, with an optional measure.
//!
//! # Equality and ordering
//!
//! [`Coordinate`] implements [`PartialEq`] as *content equality*: two coordinates are equal when they have the same
//! dimensionality, the same coordinate values and the same measure. Two empty coordinates are equal.
//!
//! Content equality is not a total order (`NaN` values never compare equal), so coordinates cannot be used as keys of
//! ordered maps directly. [`CoordinateKey`] wraps a coordinate with a strict total order instead:
//!
//! * empty coordinates go first, then 2d, then 3d ones;
//! * coordinates of the same dimensionality are compared lexicographically by `x`, `y`, `z` and finally `m`
//!   (missing measure goes first), using [`f64::total_cmp`].
//!
//! All empty coordinates are the same key.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
enum Storage {
    #[default]
    Empty,
    Xy([f64; 2]),
    Xyz([f64; 3]),
}

/// Location of a single point.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    storage: Storage,
    m: Option<f64>,
}

impl Coordinate {
    /// Empty coordinate.
    pub const fn empty() -> Self {
        Self {
            storage: Storage::Empty,
            m: None,
        }
    }

    /// Creates a 2d coordinate.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self {
            storage: Storage::Xy([x, y]),
            m: None,
        }
    }

    /// Creates a 3d coordinate.
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            storage: Storage::Xyz([x, y, z]),
            m: None,
        }
    }

    /// Returns the same coordinate with the given measure.
    ///
    /// Measure of an empty coordinate is ignored.
    pub fn with_m(mut self, m: f64) -> Self {
        if !self.is_empty() {
            self.m = Some(m);
        }
        self
    }

    /// True for the coordinate that has no location.
    pub fn is_empty(&self) -> bool {
        matches!(self.storage, Storage::Empty)
    }

    /// True if the coordinate has `z` value.
    pub fn is_3d(&self) -> bool {
        matches!(self.storage, Storage::Xyz(_))
    }

    /// True if the coordinate carries a measure.
    pub fn is_measured(&self) -> bool {
        self.m.is_some()
    }

    /// Number of spatial dimensions: 0 for empty, 2 or 3.
    pub fn spatial_dimension(&self) -> usize {
        match self.storage {
            Storage::Empty => 0,
            Storage::Xy(_) => 2,
            Storage::Xyz(_) => 3,
        }
    }

    /// `x` value, `NaN` for empty coordinate.
    pub fn x(&self) -> f64 {
        match self.storage {
            Storage::Empty => f64::NAN,
            Storage::Xy([x, _]) | Storage::Xyz([x, _, _]) => x,
        }
    }

    /// `y` value, `NaN` for empty coordinate.
    pub fn y(&self) -> f64 {
        match self.storage {
            Storage::Empty => f64::NAN,
            Storage::Xy([_, y]) | Storage::Xyz([_, y, _]) => y,
        }
    }

    /// `z` value.
    ///
    /// Returns `NaN` if the coordinate is not 3d. Check [`Coordinate::is_3d`] before relying on the value, or use
    /// [`Coordinate::z_opt`].
    pub fn z(&self) -> f64 {
        self.z_opt().unwrap_or(f64::NAN)
    }

    /// `z` value if the coordinate is 3d.
    pub fn z_opt(&self) -> Option<f64> {
        match self.storage {
            Storage::Xyz([_, _, z]) => Some(z),
            _ => None,
        }
    }

    /// Measure, `NaN` if the coordinate is not measured.
    pub fn m(&self) -> f64 {
        self.m.unwrap_or(f64::NAN)
    }

    /// Measure if present.
    pub fn m_opt(&self) -> Option<f64> {
        self.m
    }

    /// Sets measure value. Measure of an empty coordinate cannot be set.
    pub fn set_m(&mut self, m: Option<f64>) {
        if !self.is_empty() {
            self.m = m;
        }
    }

    /// Drops `z` value, keeping the measure.
    pub fn to_2d(&self) -> Self {
        match self.storage {
            Storage::Xyz([x, y, _]) => Self {
                storage: Storage::Xy([x, y]),
                m: self.m,
            },
            _ => *self,
        }
    }

    /// Returns the coordinate as `[x, y, z]`, `z` being `0` for 2d coordinates. `None` for empty.
    pub fn to_xyz(&self) -> Option<[f64; 3]> {
        match self.storage {
            Storage::Empty => None,
            Storage::Xy([x, y]) => Some([x, y, 0.0]),
            Storage::Xyz(v) => Some(v),
        }
    }

    /// Returns the total order key for the coordinate.
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey(*self)
    }

    fn rank(&self) -> u8 {
        match self.storage {
            Storage::Empty => 0,
            Storage::Xy(_) => 1,
            Storage::Xyz(_) => 2,
        }
    }

    fn values(&self) -> &[f64] {
        match &self.storage {
            Storage::Empty => &[],
            Storage::Xy(v) => v,
            Storage::Xyz(v) => v,
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::xy(x, y)
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::xyz(x, y, z)
    }
}

/// [`Coordinate`] with a strict total order, usable as a key of ordered maps and sets.
///
/// See module documentation for the order definition.
#[derive(Debug, Copy, Clone)]
pub struct CoordinateKey(pub Coordinate);

impl Ord for CoordinateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (&self.0, &other.0);
        a.rank()
            .cmp(&b.rank())
            .then_with(|| {
                a.values()
                    .iter()
                    .zip(b.values())
                    .map(|(l, r)| l.total_cmp(r))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| match (a.m, b.m) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(l), Some(r)) => l.total_cmp(&r),
            })
    }
}

impl PartialOrd for CoordinateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CoordinateKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CoordinateKey {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn dimensions() {
        let empty = Coordinate::empty();
        assert!(empty.is_empty());
        assert!(!empty.is_3d());
        assert!(empty.x().is_nan());

        let c = Coordinate::xy(1.0, 2.0);
        assert!(!c.is_3d());
        assert!(c.z().is_nan());
        assert_eq!(c.z_opt(), None);

        let c = Coordinate::xyz(1.0, 2.0, 3.0).with_m(4.0);
        assert!(c.is_3d());
        assert!(c.is_measured());
        assert_eq!(c.z(), 3.0);
        assert_eq!(c.m(), 4.0);
    }

    #[test]
    fn measure_of_empty_is_ignored() {
        let c = Coordinate::empty().with_m(1.0);
        assert!(!c.is_measured());
    }

    #[test]
    fn content_equality() {
        assert_eq!(Coordinate::empty(), Coordinate::empty());
        assert_eq!(Coordinate::xy(1.0, 2.0), Coordinate::xy(1.0, 2.0));
        assert_ne!(Coordinate::xy(1.0, 2.0), Coordinate::xyz(1.0, 2.0, 0.0));
        assert_ne!(Coordinate::xy(f64::NAN, 2.0), Coordinate::xy(f64::NAN, 2.0));
    }

    #[test]
    fn key_order() {
        let keys = [
            Coordinate::xyz(0.0, 0.0, 0.0),
            Coordinate::xy(1.0, 0.0),
            Coordinate::empty(),
            Coordinate::xy(0.0, 1.0),
            Coordinate::empty(),
            Coordinate::xy(0.0, 1.0).with_m(2.0),
        ];
        let set: BTreeSet<CoordinateKey> = keys.iter().map(Coordinate::key).collect();
        let ordered: Vec<Coordinate> = set.into_iter().map(|k| k.0).collect();

        assert_eq!(
            ordered,
            vec![
                Coordinate::empty(),
                Coordinate::xy(0.0, 1.0),
                Coordinate::xy(0.0, 1.0).with_m(2.0),
                Coordinate::xy(1.0, 0.0),
                Coordinate::xyz(0.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn nan_key_is_reflexive() {
        let c = Coordinate::xy(f64::NAN, 0.0);
        assert_eq!(c.key(), c.key());
    }
}
