use std::str::FromStr;

use crate::error::{GeoCodecError, Result};
use crate::geometry::{Coord, Dimension, Geometry, GeometryType, GeometryValue};
use crate::io::DEFAULT_MAX_DEPTH;

/// Parse a WKT or EWKT string into a [`Geometry`].
///
/// Accepts an optional `SRID=<digits>;` prefix, a case-insensitive
/// keyword, and a dimensionality suffix either glued to the keyword or
/// free-standing: `POINT Z (1 2 3)`, `POINTZ(1 2 3)` and `POINT Z(1 2 3)`
/// are the same geometry. Without a suffix the dimensionality is inferred
/// from the ordinate count of the first position.
pub fn parse_wkt(input: &str) -> Result<Geometry> {
    parse_wkt_with_depth(input, DEFAULT_MAX_DEPTH)
}

/// [`parse_wkt`] with an explicit bound on recursive nesting.
pub fn parse_wkt_with_depth(input: &str, max_depth: usize) -> Result<Geometry> {
    let mut scanner = Scanner::new(input, max_depth);
    let srid = scanner.take_srid_prefix()?;
    let geometry = parse_geometry(&mut scanner)?;
    scanner.skip_whitespace();
    if !scanner.at_end() {
        return Err(scanner.malformed("trailing content after geometry"));
    }
    Ok(geometry.with_srid(srid))
}

/// Shape test used by the canonicalizer: an optional `SRID=...;` prefix
/// followed by a recognized geometry keyword.
///
/// A string that opens with the `SRID` prefix counts as matched even when
/// the prefix itself is malformed, so that the subsequent full parse
/// reports the specific error instead of falling through to another
/// encoding.
pub(crate) fn looks_like_wkt(input: &str) -> bool {
    let mut scanner = Scanner::new(input, DEFAULT_MAX_DEPTH);
    match scanner.take_srid_prefix() {
        Err(_) => true,
        Ok(_) => match scanner.take_word() {
            Some(word) => {
                GeometryType::from_keyword_with_dim(&word.to_ascii_uppercase()).is_some()
            }
            None => false,
        },
    }
}

impl FromStr for Geometry {
    type Err = GeoCodecError;

    fn from_str(input: &str) -> Result<Self> {
        parse_wkt(input)
    }
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, max_depth: usize) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes `expected` if it is the next non-whitespace character.
    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.malformed(&format!("expected {expected:?}")))
        }
    }

    fn peek_word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        (end > 0).then(|| &rest[..end])
    }

    fn take_word(&mut self) -> Option<&'a str> {
        let word = self.peek_word()?;
        self.pos += word.len();
        Some(word)
    }

    fn take_number(&mut self) -> Result<f64> {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.malformed("expected a number"));
        }
        let token = &rest[..end];
        let value = token
            .parse::<f64>()
            .map_err(|_| self.malformed(&format!("invalid number {token:?}")))?;
        self.pos += end;
        Ok(value)
    }

    /// Consumes a leading `SRID=<digits>;` prefix if present.
    ///
    /// SRID 0 reads as "unspecified", mirroring the binary decoder.
    fn take_srid_prefix(&mut self) -> Result<Option<u32>> {
        let start = self.pos;
        let Some(word) = self.take_word() else {
            return Ok(None);
        };
        if !word.eq_ignore_ascii_case("SRID") {
            self.pos = start;
            return Ok(None);
        }
        self.expect('=')?;
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.malformed("expected SRID digits"));
        }
        let digits = &rest[..end];
        let srid: u32 = digits
            .parse()
            .map_err(|_| self.malformed(&format!("SRID {digits:?} out of range")))?;
        self.pos += end;
        self.expect(';')?;
        Ok((srid != 0).then_some(srid))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(GeoCodecError::NestingTooDeep(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn malformed(&self, message: &str) -> GeoCodecError {
        let mut snippet: String = self.rest().chars().take(24).collect();
        if self.rest().chars().nth(24).is_some() {
            snippet.push('…');
        }
        GeoCodecError::MalformedWkt(format!(
            "{message} at offset {}: {snippet:?}",
            self.pos
        ))
    }
}

fn parse_geometry(s: &mut Scanner<'_>) -> Result<Geometry> {
    s.enter()?;
    let word = s
        .take_word()
        .ok_or_else(|| s.malformed("expected a geometry keyword"))?;
    let (ty, mut dim) = GeometryType::from_keyword_with_dim(&word.to_ascii_uppercase())
        .ok_or_else(|| GeoCodecError::MalformedWkt(format!("unrecognized geometry keyword {word:?}")))?;

    // Free-standing Z/M/ZM token; the suffix binds to the keyword, never
    // to the coordinates.
    if dim.is_none() {
        if let Some(next) = s.peek_word() {
            if !next.eq_ignore_ascii_case("EMPTY") {
                if let Some(parsed) = Dimension::from_wkt_suffix(&next.to_ascii_uppercase()) {
                    s.take_word();
                    dim = Some(parsed);
                }
            }
        }
    }

    let geometry = if let Some(next) = s.peek_word() {
        if next.eq_ignore_ascii_case("EMPTY") {
            s.take_word();
            empty_geometry(ty, dim.unwrap_or_default())
        } else {
            return Err(s.malformed("expected EMPTY or a coordinate list"));
        }
    } else {
        parse_body(s, ty, dim)?
    };
    s.leave();
    Ok(geometry)
}

fn empty_geometry(ty: GeometryType, dim: Dimension) -> Geometry {
    let value = match ty {
        GeometryType::Point => GeometryValue::Point(None),
        GeometryType::LineString => GeometryValue::LineString(vec![]),
        GeometryType::CircularString => GeometryValue::CircularString(vec![]),
        GeometryType::Polygon => GeometryValue::Polygon(vec![]),
        GeometryType::Triangle => GeometryValue::Triangle(vec![]),
        GeometryType::MultiPoint => GeometryValue::MultiPoint(vec![]),
        GeometryType::MultiLineString => GeometryValue::MultiLineString(vec![]),
        GeometryType::MultiPolygon => GeometryValue::MultiPolygon(vec![]),
        GeometryType::PolyhedralSurface => GeometryValue::PolyhedralSurface(vec![]),
        GeometryType::Tin => GeometryValue::Tin(vec![]),
        GeometryType::GeometryCollection => GeometryValue::GeometryCollection(vec![]),
        GeometryType::CompoundCurve => GeometryValue::CompoundCurve(vec![]),
        GeometryType::CurvePolygon => GeometryValue::CurvePolygon(vec![]),
        GeometryType::MultiCurve => GeometryValue::MultiCurve(vec![]),
        GeometryType::MultiSurface => GeometryValue::MultiSurface(vec![]),
    };
    Geometry::new(value, dim)
}

fn parse_body(s: &mut Scanner<'_>, ty: GeometryType, dim: Option<Dimension>) -> Result<Geometry> {
    let mut tracker = dim;
    let value = match ty {
        GeometryType::Point => {
            s.expect('(')?;
            let coord = parse_position(s, &mut tracker)?;
            s.expect(')')?;
            GeometryValue::Point(Some(coord))
        }
        GeometryType::LineString => GeometryValue::LineString(parse_position_seq(s, &mut tracker)?),
        GeometryType::CircularString => {
            GeometryValue::CircularString(parse_position_seq(s, &mut tracker)?)
        }
        GeometryType::Polygon => GeometryValue::Polygon(parse_ring_seq(s, &mut tracker)?),
        GeometryType::Triangle => GeometryValue::Triangle(parse_ring_seq(s, &mut tracker)?),
        GeometryType::MultiPoint => GeometryValue::MultiPoint(parse_multi_point_body(s, &mut tracker)?),
        GeometryType::MultiLineString => {
            GeometryValue::MultiLineString(parse_ring_seq(s, &mut tracker)?)
        }
        GeometryType::MultiPolygon => GeometryValue::MultiPolygon(parse_polygon_seq(s, &mut tracker)?),
        GeometryType::PolyhedralSurface => {
            GeometryValue::PolyhedralSurface(parse_polygon_seq(s, &mut tracker)?)
        }
        GeometryType::Tin => GeometryValue::Tin(parse_polygon_seq(s, &mut tracker)?),
        GeometryType::GeometryCollection => {
            GeometryValue::GeometryCollection(parse_children(s, None)?)
        }
        GeometryType::CompoundCurve => {
            GeometryValue::CompoundCurve(parse_children(s, Some(GeometryType::LineString))?)
        }
        GeometryType::CurvePolygon => {
            GeometryValue::CurvePolygon(parse_children(s, Some(GeometryType::LineString))?)
        }
        GeometryType::MultiCurve => {
            GeometryValue::MultiCurve(parse_children(s, Some(GeometryType::LineString))?)
        }
        GeometryType::MultiSurface => {
            GeometryValue::MultiSurface(parse_children(s, Some(GeometryType::Polygon))?)
        }
    };
    Ok(Geometry::new(value, tracker.unwrap_or_default()))
}

fn parse_position(s: &mut Scanner<'_>, tracker: &mut Option<Dimension>) -> Result<Coord> {
    let mut ordinates = [0.0f64; 4];
    let mut count = 0;
    loop {
        if count == 4 {
            return Err(s.malformed("too many ordinates in position"));
        }
        ordinates[count] = s.take_number()?;
        count += 1;
        s.skip_whitespace();
        match s.peek() {
            Some(',') | Some(')') | None => break,
            _ => {}
        }
    }
    if count < 2 {
        return Err(s.malformed("a position needs at least two ordinates"));
    }
    let dim = match tracker {
        Some(dim) => {
            if dim.size() != count {
                return Err(s.malformed(&format!(
                    "expected {} ordinates per position, found {count}",
                    dim.size()
                )));
            }
            *dim
        }
        None => {
            // No suffix: 3 ordinates read as Z, never as M.
            let inferred = match count {
                2 => Dimension::Xy,
                3 => Dimension::Xyz,
                _ => Dimension::Xyzm,
            };
            *tracker = Some(inferred);
            inferred
        }
    };
    let z = dim.has_z().then(|| ordinates[2]);
    let m = dim
        .has_m()
        .then(|| ordinates[if dim.has_z() { 3 } else { 2 }]);
    Ok(Coord::new(ordinates[0], ordinates[1], z, m))
}

fn parse_position_seq(s: &mut Scanner<'_>, tracker: &mut Option<Dimension>) -> Result<Vec<Coord>> {
    s.expect('(')?;
    let mut coords = Vec::new();
    loop {
        coords.push(parse_position(s, tracker)?);
        if !s.eat(',') {
            break;
        }
    }
    s.expect(')')?;
    Ok(coords)
}

fn parse_ring_seq(s: &mut Scanner<'_>, tracker: &mut Option<Dimension>) -> Result<Vec<Vec<Coord>>> {
    s.expect('(')?;
    let mut rings = Vec::new();
    loop {
        rings.push(parse_position_seq(s, tracker)?);
        if !s.eat(',') {
            break;
        }
    }
    s.expect(')')?;
    Ok(rings)
}

fn parse_polygon_seq(
    s: &mut Scanner<'_>,
    tracker: &mut Option<Dimension>,
) -> Result<Vec<Vec<Vec<Coord>>>> {
    s.expect('(')?;
    let mut polygons = Vec::new();
    loop {
        polygons.push(parse_ring_seq(s, tracker)?);
        if !s.eat(',') {
            break;
        }
    }
    s.expect(')')?;
    Ok(polygons)
}

/// Positions of a MultiPoint, each either bare (`1 2`) or wrapped in its
/// own parentheses (`(1 2)`); both appear in the wild.
fn parse_multi_point_body(
    s: &mut Scanner<'_>,
    tracker: &mut Option<Dimension>,
) -> Result<Vec<Coord>> {
    s.expect('(')?;
    let mut coords = Vec::new();
    loop {
        s.skip_whitespace();
        if s.peek() == Some('(') {
            s.expect('(')?;
            coords.push(parse_position(s, tracker)?);
            s.expect(')')?;
        } else {
            coords.push(parse_position(s, tracker)?);
        }
        if !s.eat(',') {
            break;
        }
    }
    s.expect(')')?;
    Ok(coords)
}

/// Comma-separated child geometries. `untagged` names the kind a bare
/// parenthesized component reads as (LineString components of a compound
/// curve, Polygon components of a multi-surface); `None` requires every
/// child to be tagged.
fn parse_children(
    s: &mut Scanner<'_>,
    untagged: Option<GeometryType>,
) -> Result<Vec<Geometry>> {
    s.expect('(')?;
    let mut children = Vec::new();
    loop {
        s.skip_whitespace();
        if s.peek() == Some('(') {
            let mut tracker = None;
            match untagged {
                Some(GeometryType::Polygon) => {
                    let rings = parse_ring_seq(s, &mut tracker)?;
                    children.push(Geometry::new(
                        GeometryValue::Polygon(rings),
                        tracker.unwrap_or_default(),
                    ));
                }
                Some(_) => {
                    let coords = parse_position_seq(s, &mut tracker)?;
                    children.push(Geometry::new(
                        GeometryValue::LineString(coords),
                        tracker.unwrap_or_default(),
                    ));
                }
                None => return Err(s.malformed("expected a tagged geometry")),
            }
        } else {
            children.push(parse_geometry(s)?);
        }
        if !s.eat(',') {
            break;
        }
    }
    s.expect(')')?;
    Ok(children)
}
