//! Geometry collections.
//!
//! [`GeometryCollection`] accepts geometries of any type. The `Multi*` collections accept only one concrete member
//! type, checked when a geometry is added: a rejected geometry is dropped and
//! [`TesseraTypesError::InvalidMembership`] is returned, so the collection is never changed by a failed insertion.

use serde::{Deserialize, Serialize};

use crate::error::TesseraTypesError;
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::solid::Solid;

/// Common interface of geometry collections.
pub trait Collection: GeometryType {
    /// Members of the collection.
    fn geometries(&self) -> &[Geometry];

    /// Whether `geometry` can be a member of this collection.
    fn is_allowed(&self, geometry: &Geometry) -> bool;

    /// Adds a geometry taking ownership of it.
    ///
    /// Returns [`TesseraTypesError::InvalidMembership`] if [`Collection::is_allowed`] rejects the geometry.
    fn add_geometry(&mut self, geometry: Geometry) -> Result<(), TesseraTypesError>;

    /// Adds a copy of the geometry.
    fn add_geometry_cloned(&mut self, geometry: &Geometry) -> Result<(), TesseraTypesError> {
        self.add_geometry(geometry.clone())
    }

    /// Number of members.
    fn num_geometries(&self) -> usize {
        self.geometries().len()
    }

    /// Returns `n`-th member.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    fn geometry_n(&self, n: usize) -> &Geometry {
        &self.geometries()[n]
    }
}

/// Heterogeneous collection of geometries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
}

impl GeometryCollection {
    /// Creates a new collection.
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self { geometries }
    }

    /// Returns `n`-th member mutably.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn geometry_n_mut(&mut self, n: usize) -> &mut Geometry {
        &mut self.geometries[n]
    }

    /// Iterates over the members mutably.
    pub fn geometries_mut(&mut self) -> impl Iterator<Item = &mut Geometry> {
        self.geometries.iter_mut()
    }

    /// Adds a member. Any geometry is allowed.
    pub fn push(&mut self, geometry: impl Into<Geometry>) {
        self.geometries.push(geometry.into());
    }
}

impl Collection for GeometryCollection {
    fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    fn is_allowed(&self, _geometry: &Geometry) -> bool {
        true
    }

    fn add_geometry(&mut self, geometry: Geometry) -> Result<(), TesseraTypesError> {
        self.geometries.push(geometry);
        Ok(())
    }
}

impl FromIterator<Geometry> for GeometryCollection {
    fn from_iter<T: IntoIterator<Item = Geometry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl GeometryType for GeometryCollection {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::GeometryCollection
    }

    fn dimension(&self) -> u8 {
        self.geometries
            .iter()
            .map(Geometry::dimension)
            .max()
            .unwrap_or(0)
    }

    fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    fn is_3d(&self) -> bool {
        self.geometries.first().is_some_and(Geometry::is_3d)
    }

    fn is_measured(&self) -> bool {
        self.geometries.first().is_some_and(Geometry::is_measured)
    }
}

/// Serialized form of a homogeneous collection. Members are checked with [`Collection::add_geometry`] on the way in.
#[derive(Deserialize)]
struct Members {
    geometries: Vec<Geometry>,
}

macro_rules! homogeneous_collection {
    (
        $(#[$meta:meta])*
        $name:ident, $member:ident, $dimension:literal,
        $iter:ident, $iter_mut:ident, $member_n:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(try_from = "Members")]
        pub struct $name {
            geometries: Vec<Geometry>,
        }

        impl TryFrom<Members> for $name {
            type Error = TesseraTypesError;

            fn try_from(members: Members) -> Result<Self, Self::Error> {
                let mut collection = Self::default();
                for geometry in members.geometries {
                    collection.add_geometry(geometry)?;
                }

                Ok(collection)
            }
        }

        impl $name {
            /// Creates a new collection.
            pub fn new(members: Vec<$member>) -> Self {
                Self {
                    geometries: members.into_iter().map(Geometry::$member).collect(),
                }
            }

            /// Adds a member. Unlike [`Collection::add_geometry`] this cannot fail.
            pub fn push(&mut self, member: $member) {
                self.geometries.push(Geometry::$member(member));
            }

            /// Iterates over the members.
            pub fn $iter(&self) -> impl Iterator<Item = &$member> {
                self.geometries.iter().filter_map(|g| match g {
                    Geometry::$member(m) => Some(m),
                    _ => None,
                })
            }

            /// Iterates over the members mutably.
            pub fn $iter_mut(&mut self) -> impl Iterator<Item = &mut $member> {
                self.geometries.iter_mut().filter_map(|g| match g {
                    Geometry::$member(m) => Some(m),
                    _ => None,
                })
            }

            /// Returns `n`-th member.
            ///
            /// # Panics
            ///
            /// Panics if `n` is out of range.
            pub fn $member_n(&self, n: usize) -> &$member {
                match &self.geometries[n] {
                    Geometry::$member(m) => m,
                    other => unreachable!(
                        "{} contains {}",
                        stringify!($name),
                        other.geometry_type()
                    ),
                }
            }
        }

        impl Collection for $name {
            fn geometries(&self) -> &[Geometry] {
                &self.geometries
            }

            fn is_allowed(&self, geometry: &Geometry) -> bool {
                geometry.geometry_type_id() == GeometryTypeId::$member
            }

            fn add_geometry(&mut self, geometry: Geometry) -> Result<(), TesseraTypesError> {
                if !self.is_allowed(&geometry) {
                    return Err(TesseraTypesError::InvalidMembership {
                        attempted: geometry.geometry_type(),
                        container: self.geometry_type(),
                    });
                }

                self.geometries.push(geometry);
                Ok(())
            }
        }

        impl From<Vec<$member>> for $name {
            fn from(members: Vec<$member>) -> Self {
                Self::new(members)
            }
        }

        impl FromIterator<$member> for $name {
            fn from_iter<T: IntoIterator<Item = $member>>(iter: T) -> Self {
                Self::new(iter.into_iter().collect())
            }
        }

        impl GeometryType for $name {
            fn geometry_type_id(&self) -> GeometryTypeId {
                GeometryTypeId::$name
            }

            fn dimension(&self) -> u8 {
                $dimension
            }

            fn is_empty(&self) -> bool {
                self.geometries.is_empty()
            }

            fn is_3d(&self) -> bool {
                self.geometries.first().is_some_and(Geometry::is_3d)
            }

            fn is_measured(&self) -> bool {
                self.geometries.first().is_some_and(Geometry::is_measured)
            }
        }
    };
}

homogeneous_collection!(
    /// Collection of points.
    MultiPoint, Point, 0, points, points_mut, point_n
);

homogeneous_collection!(
    /// Collection of line strings.
    MultiLineString, LineString, 1, line_strings, line_strings_mut, line_string_n
);

homogeneous_collection!(
    /// Collection of polygons.
    MultiPolygon, Polygon, 2, polygons, polygons_mut, polygon_n
);

homogeneous_collection!(
    /// Collection of solids.
    MultiSolid, Solid, 3, solids, solids_mut, solid_n
);

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn multi_point_rejects_line_string() {
        let mut multi_point = MultiPoint::default();
        let result = multi_point.add_geometry(LineString::default().into());

        assert_matches!(
            result,
            Err(TesseraTypesError::InvalidMembership {
                attempted: "LINESTRING",
                container: "MULTIPOINT",
            })
        );
        assert_eq!(multi_point.num_geometries(), 0);
    }

    #[test]
    fn homogeneous_collections_reject_foreign_types() {
        let candidates: Vec<Geometry> = vec![
            Point::new(0.0, 0.0).into(),
            LineString::default().into(),
            Polygon::default().into(),
            Solid::default().into(),
        ];

        let mut collections: Vec<Box<dyn Collection>> = vec![
            Box::new(MultiPoint::default()),
            Box::new(MultiLineString::default()),
            Box::new(MultiPolygon::default()),
            Box::new(MultiSolid::default()),
        ];

        for (i, collection) in collections.iter_mut().enumerate() {
            for (j, candidate) in candidates.iter().enumerate() {
                let before = collection.num_geometries();
                let result = collection.add_geometry_cloned(candidate);
                if i == j {
                    assert!(result.is_ok());
                    assert_eq!(collection.num_geometries(), before + 1);
                } else {
                    assert_matches!(result, Err(TesseraTypesError::InvalidMembership { .. }));
                    assert_eq!(collection.num_geometries(), before);
                }
            }
        }
    }

    #[test]
    fn geometry_collection_accepts_everything() {
        let mut collection = GeometryCollection::default();
        assert!(collection.add_geometry(Point::new(0.0, 0.0).into()).is_ok());
        assert!(collection.add_geometry(Solid::default().into()).is_ok());
        assert_eq!(collection.num_geometries(), 2);
        assert_eq!(collection.dimension(), 3);
    }

    #[test]
    fn empty_collection_is_2d() {
        let collection = GeometryCollection::default();
        assert_eq!(collection.dimension(), 0);
        assert!(!collection.is_3d());
        assert!(!collection.is_measured());
        assert_eq!(collection.coordinate_dimension(), 2);
    }

    #[test]
    fn deserialization_checks_membership() {
        let line_string = serde_json::to_string(&Geometry::from(LineString::default())).unwrap();
        let json = format!(r#"{{"geometries":[{line_string}]}}"#);

        let error = serde_json::from_str::<MultiPoint>(&json).unwrap_err();
        assert!(error
            .to_string()
            .contains("LINESTRING is not allowed in MULTIPOINT"));
        assert!(serde_json::from_str::<MultiLineString>(&json).is_ok());

        let nested = format!(r#"{{"MultiPoint":{json}}}"#);
        assert!(serde_json::from_str::<Geometry>(&nested).is_err());
    }

    #[test]
    fn deserialized_collection_keeps_members() {
        let multi_point = MultiPoint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        let json = serde_json::to_string(&multi_point).unwrap();
        let restored: MultiPoint = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, multi_point);
        assert_eq!(restored.point_n(1), &Point::new(1.0, 1.0));
    }

    #[test]
    fn typed_accessors() {
        let multi_point = MultiPoint::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(multi_point.points().count(), 2);
        assert_eq!(multi_point.point_n(1), &Point::new(1.0, 1.0));
    }
}
