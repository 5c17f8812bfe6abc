//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TesseraTypesError {
    /// A geometry of the wrong type was added to a homogeneous collection.
    ///
    /// The rejected geometry is dropped, the collection is left unchanged.
    #[error("{attempted} is not allowed in {container}")]
    InvalidMembership {
        /// Geometry type name of the rejected geometry.
        attempted: &'static str,
        /// Geometry type name of the collection.
        container: &'static str,
    },
    /// The operation is not defined for the given geometry type.
    #[error("{operation} is not supported for {geometry_type}")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
        /// Geometry type name of the input.
        geometry_type: &'static str,
    },
    /// A polygon without rings or a solid without shells was deserialized.
    #[error("{geometry_type} must have an exterior part")]
    MissingExterior {
        /// Geometry type name of the rejected geometry.
        geometry_type: &'static str,
    },
    /// WKT text cannot be parsed.
    #[error("invalid WKT: {0}")]
    WktParse(String),
}
