//! Well-known text representation of geometries.
//!
//! Supports all geometry types including `TRIANGLE`, `TIN`, `POLYHEDRALSURFACE`, `SOLID` and `MULTISOLID`, with
//! `Z`, `M` and `ZM` dimension tags and `EMPTY` at any nesting level.

mod reader;
mod writer;

pub use reader::read_wkt;
pub use writer::WktWriter;
