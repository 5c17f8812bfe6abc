use crate::collection::{
    Collection, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, MultiSolid,
};
use crate::coordinate::Coordinate;
use crate::error::TesseraTypesError;
use crate::geometry::Geometry;
use crate::geometry_type::{GeometryType, GeometryTypeId};
use crate::line_string::LineString;
use crate::point::Point;
use crate::polygon::Polygon;
use crate::registry::empty_geometry;
use crate::solid::Solid;
use crate::surface::{PolyhedralSurface, TriangulatedSurface};
use crate::triangle::Triangle;

/// Parses a geometry from WKT.
///
/// Type names are case insensitive and `TIN` is accepted for `TRIANGULATEDSURFACE`. Without a dimension tag the
/// number of values in the first coordinate decides whether it has `z` (3 values) or `z` and `m` (4 values).
///
/// ```
/// use tessera_types::{read_wkt, GeometryType};
///
/// let geometry = read_wkt("POLYGON Z ((0 0 1,1 0 1,1 1 1,0 0 1))").unwrap();
/// assert_eq!(geometry.geometry_type(), "POLYGON");
/// assert!(geometry.is_3d());
/// ```
pub fn read_wkt(text: &str) -> Result<Geometry, TesseraTypesError> {
    let mut parser = Parser::new(text)?;
    let geometry = parser.geometry()?;
    if let Some(token) = parser.peek() {
        return Err(parse_error(format!("unexpected {token:?} after geometry")));
    }

    Ok(geometry)
}

fn parse_error(message: impl Into<String>) -> TesseraTypesError {
    TesseraTypesError::WktParse(message.into())
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Number(f64),
    Open,
    Close,
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Token>, TesseraTypesError> {
    let mut tokens = vec![];
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            ',' => tokens.push(Token::Comma),
            c if c.is_whitespace() => {}
            _ => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | ',') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }

                let word = &text[start..end];
                let token = match word.parse::<f64>() {
                    Ok(value) => Token::Number(value),
                    Err(_) if word.chars().all(|c| c.is_ascii_alphabetic()) => {
                        Token::Word(word.to_ascii_uppercase())
                    }
                    Err(_) => return Err(parse_error(format!("invalid token '{word}'"))),
                };
                tokens.push(token);
                continue;
            }
        }

        chars.next();
    }

    Ok(tokens)
}

/// Dimension tag of a geometry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Tag {
    None,
    Z,
    M,
    Zm,
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn new(text: &str) -> Result<Self, TesseraTypesError> {
        Ok(Self {
            tokens: tokenize(text)?,
            position: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Result<Token, TesseraTypesError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or_else(|| parse_error("unexpected end of input"))?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), TesseraTypesError> {
        let token = self.next()?;
        if token != expected {
            return Err(parse_error(format!("expected {expected:?}, found {token:?}")));
        }

        Ok(())
    }

    fn consume_empty(&mut self) -> bool {
        if matches!(self.peek(), Some(Token::Word(word)) if word == "EMPTY") {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Parses `( item, item, ... )` or `EMPTY`.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, TesseraTypesError>,
    ) -> Result<Vec<T>, TesseraTypesError> {
        if self.consume_empty() {
            return Ok(vec![]);
        }

        self.expect(Token::Open)?;
        let mut items = vec![item(self)?];
        loop {
            match self.next()? {
                Token::Comma => items.push(item(self)?),
                Token::Close => return Ok(items),
                token => return Err(parse_error(format!("expected ',' or ')', found {token:?}"))),
            }
        }
    }

    fn geometry(&mut self) -> Result<Geometry, TesseraTypesError> {
        let name = match self.next()? {
            Token::Word(word) => word,
            token => return Err(parse_error(format!("expected geometry type, found {token:?}"))),
        };
        let id = GeometryTypeId::from_name(&name)
            .ok_or_else(|| parse_error(format!("unknown geometry type '{name}'")))?;

        let tag = match self.peek() {
            Some(Token::Word(word)) if word == "Z" => Tag::Z,
            Some(Token::Word(word)) if word == "M" => Tag::M,
            Some(Token::Word(word)) if word == "ZM" => Tag::Zm,
            _ => Tag::None,
        };
        if tag != Tag::None {
            self.position += 1;
        }

        if self.consume_empty() {
            return Ok(empty_geometry(id));
        }

        let geometry = match id {
            GeometryTypeId::Point => {
                self.expect(Token::Open)?;
                let coordinate = self.coordinate(tag)?;
                self.expect(Token::Close)?;
                Point::from(coordinate).into()
            }
            GeometryTypeId::LineString => self.line_string(tag)?.into(),
            GeometryTypeId::Polygon => self.polygon(tag)?.into(),
            GeometryTypeId::Triangle => self.triangle(tag)?.into(),
            GeometryTypeId::PolyhedralSurface => self.polyhedral_surface(tag)?.into(),
            GeometryTypeId::TriangulatedSurface => {
                TriangulatedSurface::new(self.list(|p| p.triangle(tag))?).into()
            }
            GeometryTypeId::Solid => self.solid(tag)?.into(),
            GeometryTypeId::MultiPoint => MultiPoint::new(self.list(|p| p.member_point(tag))?).into(),
            GeometryTypeId::MultiLineString => {
                MultiLineString::new(self.list(|p| p.line_string(tag))?).into()
            }
            GeometryTypeId::MultiPolygon => {
                MultiPolygon::new(self.list(|p| p.polygon(tag))?).into()
            }
            GeometryTypeId::MultiSolid => MultiSolid::new(self.list(|p| p.solid(tag))?).into(),
            GeometryTypeId::GeometryCollection => {
                let mut collection = GeometryCollection::default();
                for member in self.list(Self::geometry)? {
                    collection.add_geometry(member)?;
                }
                collection.into()
            }
        };

        Ok(geometry)
    }

    fn coordinate(&mut self, tag: Tag) -> Result<Coordinate, TesseraTypesError> {
        let mut values = vec![];
        while let Some(Token::Number(value)) = self.peek() {
            values.push(*value);
            self.position += 1;
        }

        let coordinate = match (tag, values.as_slice()) {
            (Tag::None, &[x, y]) => Coordinate::xy(x, y),
            (Tag::None | Tag::Z, &[x, y, z]) => Coordinate::xyz(x, y, z),
            (Tag::M, &[x, y, m]) => Coordinate::xy(x, y).with_m(m),
            (Tag::None | Tag::Zm, &[x, y, z, m]) => Coordinate::xyz(x, y, z).with_m(m),
            _ => {
                return Err(parse_error(format!(
                    "{} values do not form a coordinate of dimension {tag:?}",
                    values.len()
                )))
            }
        };

        Ok(coordinate)
    }

    /// Point inside a multipoint, with or without parentheses.
    fn member_point(&mut self, tag: Tag) -> Result<Point, TesseraTypesError> {
        if self.consume_empty() {
            return Ok(Point::empty());
        }

        if self.peek() == Some(&Token::Open) {
            self.position += 1;
            let coordinate = self.coordinate(tag)?;
            self.expect(Token::Close)?;
            return Ok(coordinate.into());
        }

        Ok(self.coordinate(tag)?.into())
    }

    fn line_string(&mut self, tag: Tag) -> Result<LineString, TesseraTypesError> {
        Ok(LineString::from_coordinates(self.list(|p| p.coordinate(tag))?))
    }

    fn polygon(&mut self, tag: Tag) -> Result<Polygon, TesseraTypesError> {
        let mut rings = self.list(|p| p.line_string(tag))?.into_iter();
        let Some(exterior) = rings.next() else {
            return Ok(Polygon::default());
        };

        Ok(Polygon::new(exterior, rings.collect()))
    }

    fn triangle(&mut self, tag: Tag) -> Result<Triangle, TesseraTypesError> {
        let polygon = self.polygon(tag)?;
        if polygon.is_empty() {
            return Ok(Triangle::default());
        }

        let ring = polygon.exterior_ring();
        if polygon.has_interior_rings() || !(3..=4).contains(&ring.num_points()) {
            return Err(parse_error("triangle must have a single ring of 3 or 4 points"));
        }

        Ok(Triangle::new(
            *ring.point_n(0),
            *ring.point_n(1),
            *ring.point_n(2),
        ))
    }

    fn polyhedral_surface(&mut self, tag: Tag) -> Result<PolyhedralSurface, TesseraTypesError> {
        Ok(PolyhedralSurface::new(self.list(|p| p.polygon(tag))?))
    }

    fn solid(&mut self, tag: Tag) -> Result<Solid, TesseraTypesError> {
        let mut shells = self.list(|p| p.polyhedral_surface(tag))?.into_iter();
        let Some(exterior) = shells.next() else {
            return Ok(Solid::default());
        };

        Ok(Solid::new(exterior, shells.collect()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reads_what_writer_writes() {
        let samples = [
            "POINT (1 2)",
            "POINT Z (1 2 3)",
            "POINT M (1 2 4)",
            "POINT ZM (1 2 3 4)",
            "POINT EMPTY",
            "LINESTRING (0 0,1 0.5,2 -1)",
            "POLYGON ((0 0,4 0,4 4,0 0),(1 0.5,2 0.5,2 1,1 0.5))",
            "TRIANGLE Z ((0 0 1,1 0 1,0 1 1,0 0 1))",
            "TIN (((0 0,1 0,0 1,0 0)),((1 0,1 1,0 1,1 0)))",
            "POLYHEDRALSURFACE Z (((0 0 0,1 0 0,1 1 0,0 0 0)),((0 0 0,1 1 0,1 1 1,0 0 0)))",
            "SOLID Z ((((0 0 0,1 0 0,1 1 0,0 0 0)),((0 0 0,1 1 0,1 1 1,0 0 0))))",
            "MULTIPOINT ((0 0),(1 1))",
            "MULTILINESTRING ((0 0,1 1),EMPTY)",
            "MULTIPOLYGON (((0 0,1 0,1 1,0 0)),EMPTY)",
            "MULTISOLID Z (((((0 0 0,1 0 0,1 1 0,0 0 0)))))",
            "GEOMETRYCOLLECTION (POINT (0 0),LINESTRING EMPTY)",
            "GEOMETRYCOLLECTION EMPTY",
        ];

        for sample in samples {
            let geometry = read_wkt(sample).unwrap();
            assert_eq!(geometry.as_text(None), sample);
        }
    }

    #[test]
    fn relaxed_syntax() {
        let geometry = read_wkt("multipoint z (0 0 1, 1 1 1)").unwrap();
        assert_eq!(geometry.as_text(None), "MULTIPOINT Z ((0 0 1),(1 1 1))");

        let geometry = read_wkt("TriangulatedSurface(((0 0,1 0,0 1,0 0)))").unwrap();
        assert_eq!(geometry.geometry_type(), "TRIANGULATEDSURFACE");

        let geometry = read_wkt("LINESTRING(0 0 1 2, 1 1 1 2)").unwrap();
        assert!(geometry.is_3d());
        assert!(geometry.is_measured());
    }

    #[test]
    fn lossless_numbers() {
        let x = 0.1 + 0.2;
        let y = 1.0 / 3.0;
        let geometry: Geometry = Point::new(x, y).into();
        let parsed = read_wkt(&geometry.to_string()).unwrap();
        assert_eq!(parsed, geometry);
    }

    #[test]
    fn errors() {
        assert_matches!(read_wkt(""), Err(TesseraTypesError::WktParse(_)));
        assert_matches!(read_wkt("CIRCLE (1 2)"), Err(TesseraTypesError::WktParse(_)));
        assert_matches!(read_wkt("POINT (1)"), Err(TesseraTypesError::WktParse(_)));
        assert_matches!(read_wkt("POINT Z (1 2)"), Err(TesseraTypesError::WktParse(_)));
        assert_matches!(read_wkt("POINT (1 2) extra"), Err(TesseraTypesError::WktParse(_)));
        assert_matches!(read_wkt("LINESTRING (0 0,1 1"), Err(TesseraTypesError::WktParse(_)));
        assert_matches!(
            read_wkt("TRIANGLE ((0 0,1 0,1 1,0 1,0 0))"),
            Err(TesseraTypesError::WktParse(_))
        );
    }
}
