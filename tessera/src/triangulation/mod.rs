//! Constrained Delaunay triangulation of 2d points, optionally projected from a 3d plane.

mod cdt;
mod plane;

pub use cdt::{ConstraintDelaunayTriangulation, FaceView, VertexHandle};
pub use plane::Plane;

pub(crate) use plane::to_vector;
