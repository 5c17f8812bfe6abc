//! Triangulation of polygonal geometries.
//!
//! The crate is built around [`ConstraintDelaunayTriangulation`](triangulation::ConstraintDelaunayTriangulation),
//! an incremental constrained Delaunay triangulation that marks every face with the number of constraint rings
//! separating it from the outside. Faces with odd nesting level are inside a polygon, faces with even level are
//! outside or in a hole, so polygons with holes and islands inside holes are handled with the same rule.
//!
//! On top of it the [`triangulate`] module converts polygons, polyhedral surfaces, solids and collections into a
//! [`TriangulatedSurface`](tessera_types::TriangulatedSurface), and the [`area`] module measures surfaces in 2d and
//! 3d.
//!
//! ```
//! use tessera::triangulate::triangulate_polygon_3d;
//! use tessera_types::read_wkt;
//!
//! let polygon = read_wkt("POLYGON((0 0,1 0,1 1,0 1,0 0),(0.2 0.2,0.8 0.2,0.8 0.8,0.2 0.8,0.2 0.2))").unwrap();
//! let tin = triangulate_polygon_3d(&polygon).unwrap();
//! assert_eq!(tin.num_triangles(), 8);
//! ```

pub mod area;
pub mod error;
pub mod triangulate;
pub mod triangulation;

pub use error::TesseraError;
