//! Error type used by the crate.

use tessera_types::TesseraTypesError;
use thiserror::Error;

/// Tessera error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TesseraError {
    /// No three non-collinear points found in the exterior ring of a polygon. Contains WKT of the polygon.
    #[error("can't find plane for polygon {0}")]
    NoPlane(String),
    /// A vertex of an extracted triangle has no source coordinate. This happens when input constraints cross each
    /// other and an intersection vertex had to be created.
    #[error("constraints intersect, triangle vertex has no source coordinate")]
    ConstraintIntersection,
    /// Error from geometry operations.
    #[error(transparent)]
    Types(#[from] TesseraTypesError),
}
