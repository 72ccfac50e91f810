use std::fmt::{self, Write};

use itertools::Itertools;

use crate::geometry::{Coord, Geometry, GeometryValue};

/// Serialize a [`Geometry`] to EWKT.
///
/// The keyword is upper-case with the dimensionality suffix glued to it,
/// positions are space-joined and parts comma-joined, and an `SRID=<n>;`
/// prefix is emitted iff an SRID is present. The output is semantically
/// round-trippable, not byte-identical to whatever was parsed.
pub fn write_wkt(geometry: &Geometry) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = fmt_geometry(&mut out, geometry, true);
    out
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_geometry(f, self, true)
    }
}

fn fmt_geometry(f: &mut impl Write, geometry: &Geometry, top_level: bool) -> fmt::Result {
    if top_level {
        if let Some(srid) = geometry.srid() {
            write!(f, "SRID={srid};")?;
        }
    }
    write!(
        f,
        "{}{}",
        geometry.geometry_type().wkt_keyword(),
        geometry.dimension().wkt_suffix()
    )?;
    if geometry.is_empty() {
        return f.write_str(" EMPTY");
    }
    match geometry.value() {
        GeometryValue::Point(Some(coord)) => write!(f, "({})", position(coord)),
        GeometryValue::Point(None) => unreachable!("empty point handled above"),
        GeometryValue::LineString(coords)
        | GeometryValue::CircularString(coords)
        | GeometryValue::MultiPoint(coords) => write!(f, "({})", position_seq(coords)),
        GeometryValue::Polygon(rings)
        | GeometryValue::Triangle(rings)
        | GeometryValue::MultiLineString(rings) => write!(f, "({})", ring_seq(rings)),
        GeometryValue::MultiPolygon(polygons)
        | GeometryValue::PolyhedralSurface(polygons)
        | GeometryValue::Tin(polygons) => write!(
            f,
            "({})",
            polygons.iter().map(|rings| format!("({})", ring_seq(rings))).join(",")
        ),
        GeometryValue::GeometryCollection(children)
        | GeometryValue::CompoundCurve(children)
        | GeometryValue::CurvePolygon(children)
        | GeometryValue::MultiCurve(children)
        | GeometryValue::MultiSurface(children) => {
            f.write_char('(')?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                fmt_geometry(&mut *f, child, false)?;
            }
            f.write_char(')')
        }
    }
}

fn position(coord: &Coord) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} {}", coord.x, coord.y);
    if let Some(z) = coord.z {
        let _ = write!(out, " {z}");
    }
    if let Some(m) = coord.m {
        let _ = write!(out, " {m}");
    }
    out
}

fn position_seq(coords: &[Coord]) -> String {
    coords.iter().map(position).join(",")
}

fn ring_seq(rings: &[Vec<Coord>]) -> String {
    rings
        .iter()
        .map(|ring| format!("({})", position_seq(ring)))
        .join(",")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{Dimension, GeometryType};
    use crate::io::wkt::parse_wkt;

    fn round_trip(input: &str) -> String {
        write_wkt(&parse_wkt(input).unwrap())
    }

    #[test]
    fn point_with_srid() {
        assert_eq!(round_trip("SRID=4326;POINT(30 10)"), "SRID=4326;POINT(30 10)");
    }

    #[test]
    fn empty_is_symmetric() {
        assert_eq!(round_trip("MULTIPOLYGON EMPTY"), "MULTIPOLYGON EMPTY");
        assert_eq!(round_trip("POINT EMPTY"), "POINT EMPTY");
        assert_eq!(round_trip("POINT Z EMPTY"), "POINTZ EMPTY");
    }

    #[test]
    fn suffix_is_glued() {
        assert_eq!(round_trip("POINT Z (1 2 3)"), "POINTZ(1 2 3)");
        assert_eq!(round_trip("POINT M (1 2 3)"), "POINTM(1 2 3)");
        assert_eq!(round_trip("POINT ZM (1 2 3 4)"), "POINTZM(1 2 3 4)");
    }

    #[test]
    fn numbers_use_plain_decimal_notation() {
        assert_eq!(round_trip("POINT(30.5 -10.25)"), "POINT(30.5 -10.25)");
        assert_eq!(round_trip("POINT(1e3 2)"), "POINT(1000 2)");
        assert_eq!(round_trip("POINT(0.000000001 2)"), "POINT(0.000000001 2)");
    }

    #[test]
    fn nested_kinds() {
        assert_eq!(
            round_trip("MULTIPOLYGON(((0 0, 4 0, 4 4, 0 0)), ((10 10, 14 10, 14 14, 10 10)))"),
            "MULTIPOLYGON(((0 0,4 0,4 4,0 0)),((10 10,14 10,14 14,10 10)))"
        );
        assert_eq!(
            round_trip("GEOMETRYCOLLECTION(POINT(4 6), LINESTRING(4 6, 7 10))"),
            "GEOMETRYCOLLECTION(POINT(4 6),LINESTRING(4 6,7 10))"
        );
        assert_eq!(
            round_trip("MULTIPOINT((10 40), (40 30))"),
            "MULTIPOINT(10 40,40 30)"
        );
    }

    #[test]
    fn children_never_repeat_the_srid() {
        let geom = parse_wkt("SRID=3857;GEOMETRYCOLLECTION(POINT(1 2))").unwrap();
        assert_eq!(write_wkt(&geom), "SRID=3857;GEOMETRYCOLLECTION(POINT(1 2))");
    }

    #[test]
    fn parse_serialize_parse_is_identity() {
        for input in [
            "POINT(30 10)",
            "SRID=4326;POINTZM(1 2 3 4)",
            "LINESTRING(30 10, 10 30, 40 40)",
            "POLYGON((35 10, 45 45, 15 40, 10 20, 35 10), (20 30, 35 35, 30 20, 20 30))",
            "MULTILINESTRING((10 10, 20 20), (40 40, 30 30))",
            "TIN(((0 0, 0 1, 1 0, 0 0)), ((0 0, 1 0, 0 -1, 0 0)))",
            "COMPOUNDCURVE(CIRCULARSTRING(0 0, 1 1, 1 0), (1 0, 0 1))",
            "GEOMETRYCOLLECTION(POINT(4 6), GEOMETRYCOLLECTION(POINT EMPTY))",
        ] {
            let first = parse_wkt(input).unwrap();
            let second = parse_wkt(&write_wkt(&first)).unwrap();
            assert_eq!(first, second, "round trip changed {input:?}");
        }
    }

    #[test]
    fn display_matches_write_wkt() {
        let geom = parse_wkt("SRID=4326;POINT(30 10)").unwrap();
        assert_eq!(geom.to_string(), write_wkt(&geom));
        assert_eq!(geom.geometry_type(), GeometryType::Point);
        assert_eq!(geom.dimension(), Dimension::Xy);
    }
}
