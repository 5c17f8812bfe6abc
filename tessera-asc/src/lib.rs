//! Reader of ESRI ASCII grid files (`.asc`).
//!
//! A grid file starts with a header of `key value` lines, followed by `nrows * ncols` elevation values in row-major
//! order, top row first:
//!
//! ```text
//! ncols        4
//! nrows        3
//! xllcorner    100.0
//! yllcorner    200.0
//! cellsize     10.0
//! NODATA_value -9999
//! 1 2 3 4
//! 5 6 -9999 8
//! 9 10 11 12
//! ```
//!
//! Every cell is represented by a point at its center. [`AscGrid::to_triangulated_surface`] connects the points of
//! neighbouring cells into a TIN.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::Peekable;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_types::{GeometryType, Point, Triangle, TriangulatedSurface};

use crate::error::TesseraAscError;

pub mod error;

/// Grid header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AscHeader {
    /// Number of columns.
    pub ncols: usize,
    /// Number of rows.
    pub nrows: usize,
    /// `x` of the lower left corner of the grid.
    pub xllcorner: f64,
    /// `y` of the lower left corner of the grid.
    pub yllcorner: f64,
    /// Size of a cell side.
    pub cellsize: f64,
    /// Value marking cells without data.
    pub nodata_value: Option<f64>,
}

impl AscHeader {
    fn parse<'a>(
        tokens: &mut Peekable<impl Iterator<Item = &'a str>>,
    ) -> Result<Self, TesseraAscError> {
        let mut ncols = None;
        let mut nrows = None;
        let mut x = None;
        let mut y = None;
        let mut cellsize = None;
        let mut nodata_value = None;

        while let Some(key) = tokens.next_if(|t| t.starts_with(|c: char| c.is_ascii_alphabetic()))
        {
            let key = key.to_ascii_lowercase();
            let value = tokens
                .next()
                .ok_or_else(|| TesseraAscError::Header(format!("no value for '{key}'")))?;

            match key.as_str() {
                "ncols" => ncols = Some(parse_header_value(&key, value)?),
                "nrows" => nrows = Some(parse_header_value(&key, value)?),
                "xllcorner" => x = Some(Origin::Corner(parse_header_value(&key, value)?)),
                "xllcenter" => x = Some(Origin::Center(parse_header_value(&key, value)?)),
                "yllcorner" => y = Some(Origin::Corner(parse_header_value(&key, value)?)),
                "yllcenter" => y = Some(Origin::Center(parse_header_value(&key, value)?)),
                "cellsize" => cellsize = Some(parse_header_value(&key, value)?),
                "nodata_value" => nodata_value = Some(parse_header_value(&key, value)?),
                _ => return Err(TesseraAscError::Header(format!("unknown key '{key}'"))),
            }
        }

        let missing = |key: &str| TesseraAscError::Header(format!("'{key}' is missing"));
        let cellsize: f64 = cellsize.ok_or_else(|| missing("cellsize"))?;
        if cellsize <= 0.0 {
            return Err(TesseraAscError::Header(format!(
                "cell size must be positive, got {cellsize}"
            )));
        }

        Ok(Self {
            ncols: ncols.ok_or_else(|| missing("ncols"))?,
            nrows: nrows.ok_or_else(|| missing("nrows"))?,
            xllcorner: x.ok_or_else(|| missing("xllcorner"))?.corner(cellsize),
            yllcorner: y.ok_or_else(|| missing("yllcorner"))?.corner(cellsize),
            cellsize,
            nodata_value,
        })
    }
}

/// Grid origin given either by the corner or by the center of the lower left cell.
enum Origin {
    Corner(f64),
    Center(f64),
}

impl Origin {
    fn corner(self, cellsize: f64) -> f64 {
        match self {
            Origin::Corner(v) => v,
            Origin::Center(v) => v - cellsize / 2.0,
        }
    }
}

fn parse_header_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, TesseraAscError> {
    value
        .parse()
        .map_err(|_| TesseraAscError::Header(format!("invalid value '{value}' for '{key}'")))
}

/// Elevation grid read from an ASCII grid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AscGrid {
    header: AscHeader,
    values: Vec<f64>,
}

impl AscGrid {
    /// Reads a grid from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TesseraAscError> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Reads a grid. Header keys are case insensitive, values may be split into lines arbitrarily.
    pub fn read(reader: impl BufRead) -> Result<Self, TesseraAscError> {
        let mut text = String::new();
        for line in reader.lines() {
            text.push_str(&line?);
            text.push('\n');
        }

        let mut tokens = text.split_whitespace().peekable();
        let header = AscHeader::parse(&mut tokens)?;

        let expected = header.ncols.checked_mul(header.nrows).ok_or_else(|| {
            TesseraAscError::Header(format!(
                "grid of {} rows and {} columns is too large",
                header.nrows, header.ncols
            ))
        })?;

        let mut values = vec![];
        for token in tokens {
            if values.len() == expected {
                return Err(TesseraAscError::Data(format!(
                    "more than {expected} values for {} rows and {} columns",
                    header.nrows, header.ncols
                )));
            }

            let value: f64 = token.parse().map_err(|_| {
                TesseraAscError::Data(format!("invalid value '{token}' at index {}", values.len()))
            })?;
            values.push(value);
        }

        if values.len() != expected {
            return Err(TesseraAscError::Data(format!(
                "expected {expected} values for {} rows and {} columns, found {}",
                header.nrows,
                header.ncols,
                values.len()
            )));
        }

        log::debug!(
            "Read {}x{} grid with cell size {}",
            header.ncols,
            header.nrows,
            header.cellsize
        );

        Ok(Self { header, values })
    }

    /// Grid header.
    pub fn header(&self) -> &AscHeader {
        &self.header
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.header.nrows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.header.ncols
    }

    /// Value of a cell, `None` if the cell has no data. Row 0 is the top row.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside of the grid.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        assert!(
            row < self.rows() && col < self.cols(),
            "cell ({row}, {col}) is outside of the grid"
        );

        let value = self.values[row * self.cols() + col];
        match self.header.nodata_value {
            Some(nodata) if value == nodata => None,
            _ => Some(value),
        }
    }

    /// Point at the center of a cell. The point is 3d with the cell value as `z` if the cell has data, and 2d
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside of the grid.
    pub fn point(&self, row: usize, col: usize) -> Point {
        let value = self.value(row, col);
        let x = self.header.xllcorner + (col as f64 + 0.5) * self.header.cellsize;
        let y = self.header.yllcorner + ((self.rows() - row) as f64 - 0.5) * self.header.cellsize;

        match value {
            Some(z) => Point::new_3d(x, y, z),
            None => Point::new(x, y),
        }
    }

    /// Connects the centers of every 2x2 block of cells into two triangles.
    ///
    /// Triangles are counter-clockwise when seen from above. A triangle is created only if all its three cells have
    /// data.
    pub fn to_triangulated_surface(&self) -> TriangulatedSurface {
        let mut surface = TriangulatedSurface::default();
        for row in 1..self.rows() {
            for col in 1..self.cols() {
                let top_left = self.point(row - 1, col - 1);
                let top_right = self.point(row - 1, col);
                let bottom_left = self.point(row, col - 1);
                let bottom_right = self.point(row, col);

                for [p, q, r] in [
                    [bottom_left, bottom_right, top_right],
                    [bottom_left, top_right, top_left],
                ] {
                    if p.is_3d() && q.is_3d() && r.is_3d() {
                        surface.add_triangle(Triangle::new(p, q, r));
                    }
                }
            }
        }

        log::debug!(
            "Grid converted into {} triangles",
            surface.num_triangles()
        );
        surface
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    use super::*;

    fn small() -> AscGrid {
        AscGrid::read(include_bytes!("../test-data/small.asc").as_slice()).unwrap()
    }

    #[test]
    fn read_header() {
        let grid = small();
        assert_eq!(
            grid.header(),
            &AscHeader {
                ncols: 4,
                nrows: 3,
                xllcorner: 100.0,
                yllcorner: 200.0,
                cellsize: 10.0,
                nodata_value: Some(-9999.0),
            }
        );
        assert_eq!(grid.value(0, 0), Some(1.0));
        assert_eq!(grid.value(1, 2), None);
        assert_eq!(grid.value(2, 3), Some(12.0));
    }

    #[test]
    fn cell_centers() {
        let grid = small();
        assert_eq!(grid.point(0, 0), Point::new_3d(105.0, 225.0, 1.0));
        assert_eq!(grid.point(2, 3), Point::new_3d(135.0, 205.0, 12.0));
        assert_eq!(grid.point(1, 2), Point::new(125.0, 215.0));
    }

    #[test]
    #[should_panic]
    fn point_outside_of_grid() {
        small().point(3, 0);
    }

    #[test]
    fn cells_without_data_are_not_triangulated() {
        let surface = small().to_triangulated_surface();
        assert_eq!(surface.num_triangles(), 6);

        for triangle in surface.triangles() {
            assert!(triangle.is_3d());
            let [p, q, r] = triangle.vertices();
            let orientation = (q.x() - p.x()) * (r.y() - p.y()) - (q.y() - p.y()) * (r.x() - p.x());
            assert!(orientation > 0.0);
        }
    }

    #[test]
    fn cell_center_origin() {
        let grid = AscGrid::read(include_bytes!("../test-data/centered.asc").as_slice()).unwrap();

        assert_eq!(grid.header().xllcorner, 0.0);
        assert_eq!(grid.header().nodata_value, None);
        assert_eq!(grid.point(1, 0), Point::new_3d(0.5, 0.5, 4.5));
        assert_eq!(grid.to_triangulated_surface().num_triangles(), 4);
    }

    #[test]
    fn full_grid_area() {
        let grid = AscGrid::read(
            "ncols 3\nnrows 3\nxllcorner 0\nyllcorner 0\ncellsize 2\n0 0 0\n0 0 0\n0 0 0\n".as_bytes(),
        )
        .unwrap();

        let area: f64 = grid
            .to_triangulated_surface()
            .triangles()
            .iter()
            .map(|t| {
                let [p, q, r] = t.vertices();
                ((q.x() - p.x()) * (r.y() - p.y()) - (q.y() - p.y()) * (r.x() - p.x())) / 2.0
            })
            .sum();
        assert_abs_diff_eq!(area, 16.0);
    }

    #[test]
    fn invalid_input() {
        let read = |text: &str| AscGrid::read(text.as_bytes());

        assert_matches!(
            read("ncols 2\nnrows 1\nxllcorner 0\ncellsize 1\n1 2"),
            Err(TesseraAscError::Header(message)) if message == "'yllcorner' is missing"
        );
        assert_matches!(
            read("ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\nbands 3\n1 2"),
            Err(TesseraAscError::Header(_))
        );
        assert_matches!(
            read("ncols two\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2"),
            Err(TesseraAscError::Header(_))
        );
        assert_matches!(
            read("ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 0\n1 2"),
            Err(TesseraAscError::Header(_))
        );
        assert_matches!(
            read("ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2 3"),
            Err(TesseraAscError::Data(_))
        );
        assert_matches!(
            read("ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2,5"),
            Err(TesseraAscError::Data(_))
        );
    }

    #[test]
    fn oversized_header() {
        let read = |text: &str| AscGrid::read(text.as_bytes());

        assert_matches!(
            read("ncols 100000000000\nnrows 100\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2"),
            Err(TesseraAscError::Data(_))
        );
        let huge = format!(
            "ncols {}\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2",
            usize::MAX
        );
        assert_matches!(
            read(&huge),
            Err(TesseraAscError::Header(message)) if message.contains("too large")
        );
    }

    #[test]
    fn header_as_json() {
        let json = serde_json::to_string(small().header()).unwrap();
        assert_eq!(
            json,
            r#"{"ncols":4,"nrows":3,"xllcorner":100.0,"yllcorner":200.0,"cellsize":10.0,"nodata_value":-9999.0}"#
        );
    }

    #[test]
    fn missing_file() {
        assert_matches!(
            AscGrid::open("test-data/no-such-file.asc"),
            Err(TesseraAscError::Io(_))
        );
    }
}
