use serde::{Deserialize, Serialize};

use crate::error::TesseraTypesError;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::surface::PolyhedralSurface;

/// Volume bounded by closed shells.
///
/// Shell 0 is the exterior one, other shells bound voids inside the solid. A solid always has an exterior shell: an
/// empty solid has one empty shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SolidShells")]
pub struct Solid {
    shells: Vec<PolyhedralSurface>,
}

#[derive(Deserialize)]
struct SolidShells {
    shells: Vec<PolyhedralSurface>,
}

impl TryFrom<SolidShells> for Solid {
    type Error = TesseraTypesError;

    fn try_from(value: SolidShells) -> Result<Self, Self::Error> {
        if value.shells.is_empty() {
            return Err(TesseraTypesError::MissingExterior {
                geometry_type: GeometryTypeId::Solid.name(),
            });
        }

        Ok(Self {
            shells: value.shells,
        })
    }
}

impl Default for Solid {
    fn default() -> Self {
        Self {
            shells: vec![PolyhedralSurface::default()],
        }
    }
}

impl Solid {
    /// Creates a new solid.
    pub fn new(exterior_shell: PolyhedralSurface, interior_shells: Vec<PolyhedralSurface>) -> Self {
        let mut shells = Vec::with_capacity(interior_shells.len() + 1);
        shells.push(exterior_shell);
        shells.extend(interior_shells);
        Self { shells }
    }

    /// Exterior shell.
    pub fn exterior_shell(&self) -> &PolyhedralSurface {
        &self.shells[0]
    }

    /// Mutable exterior shell.
    pub fn exterior_shell_mut(&mut self) -> &mut PolyhedralSurface {
        &mut self.shells[0]
    }

    /// Number of shells including the exterior one.
    pub fn num_shells(&self) -> usize {
        self.shells.len()
    }

    /// Returns `n`-th shell, shell 0 being the exterior one.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn shell_n(&self, n: usize) -> &PolyhedralSurface {
        &self.shells[n]
    }

    /// Number of voids.
    pub fn num_interior_shells(&self) -> usize {
        self.shells.len() - 1
    }

    /// Returns `n`-th void shell.
    ///
    /// # Panics
    ///
    /// Panics if `n` is out of range.
    pub fn interior_shell_n(&self, n: usize) -> &PolyhedralSurface {
        &self.shells[n + 1]
    }

    /// Adds a void.
    pub fn add_interior_shell(&mut self, shell: PolyhedralSurface) {
        self.shells.push(shell);
    }

    /// Iterates over all shells starting with the exterior one.
    pub fn shells(&self) -> impl Iterator<Item = &PolyhedralSurface> {
        self.shells.iter()
    }

    /// Iterates over all shells mutably starting with the exterior one.
    pub fn shells_mut(&mut self) -> impl Iterator<Item = &mut PolyhedralSurface> {
        self.shells.iter_mut()
    }
}

impl From<PolyhedralSurface> for Solid {
    fn from(exterior_shell: PolyhedralSurface) -> Self {
        Self {
            shells: vec![exterior_shell],
        }
    }
}

impl GeometryType for Solid {
    fn geometry_type_id(&self) -> GeometryTypeId {
        GeometryTypeId::Solid
    }

    fn dimension(&self) -> u8 {
        3
    }

    fn is_empty(&self) -> bool {
        self.exterior_shell().is_empty()
    }

    fn is_3d(&self) -> bool {
        self.exterior_shell().is_3d()
    }

    fn is_measured(&self) -> bool {
        self.exterior_shell().is_measured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    #[test]
    fn empty_solid_has_exterior_shell() {
        let solid = Solid::default();
        assert_eq!(solid.num_shells(), 1);
        assert_eq!(solid.num_interior_shells(), 0);
        assert!(solid.is_empty());
        assert_eq!(solid.dimension(), 3);
    }

    #[test]
    fn solid_without_shells_is_rejected() {
        assert!(serde_json::from_str::<Solid>(r#"{"shells":[]}"#).is_err());
        assert!(serde_json::from_str::<Geometry>(r#"{"Solid":{"shells":[]}}"#).is_err());

        let solid: Solid = serde_json::from_str(r#"{"shells":[{"polygons":[]}]}"#).unwrap();
        assert_eq!(solid.num_shells(), 1);
        assert!(solid.is_empty());
    }
}
