use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{GeoCodecError, Result};
use crate::geometry::{Coord, Dimension, Geometry, GeometryType, GeometryValue};
use crate::io::wkb::common::{Endianness, TypeCode};
use crate::io::DEFAULT_MAX_DEPTH;

/// Decode a hexadecimal WKB/EWKB string into a [`Geometry`].
pub fn decode_wkb_hex(hex: &str) -> Result<Geometry> {
    decode_wkb_hex_with_depth(hex, DEFAULT_MAX_DEPTH)
}

/// [`decode_wkb_hex`] with an explicit bound on recursive nesting.
pub fn decode_wkb_hex_with_depth(hex: &str, max_depth: usize) -> Result<Geometry> {
    let buf = decode_hex(hex)?;
    decode_wkb(&buf, max_depth)
}

/// Decode a WKB/EWKB buffer into a [`Geometry`].
pub fn decode_wkb(buf: &[u8], max_depth: usize) -> Result<Geometry> {
    let mut reader = WkbReader::new(buf, max_depth);
    let geometry = reader.read_geometry()?;
    if reader.remaining() != 0 {
        return Err(GeoCodecError::MalformedWkb(format!(
            "{} trailing bytes after the geometry",
            reader.remaining()
        )));
    }
    Ok(geometry)
}

/// Hex validation happens in full before any binary interpretation.
pub(crate) fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(GeoCodecError::OddLengthHex(hex.len()));
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    let mut digits = hex.chars();
    while let Some(hi) = digits.next() {
        let hi = hi
            .to_digit(16)
            .ok_or(GeoCodecError::InvalidHexDigit(hi))?;
        // the even-length check guarantees a partner digit
        let lo = digits.next().unwrap_or('0');
        let lo = lo
            .to_digit(16)
            .ok_or(GeoCodecError::InvalidHexDigit(lo))?;
        bytes.push((hi * 16 + lo) as u8);
    }
    Ok(bytes)
}

/// Shape test used by the canonicalizer: nonempty, even length, all hex
/// digits.
pub(crate) fn is_plausible_hex(input: &str) -> bool {
    !input.is_empty() && input.len() % 2 == 0 && input.bytes().all(|b| b.is_ascii_hexdigit())
}

struct WkbReader<'a> {
    cursor: Cursor<&'a [u8]>,
    depth: usize,
    max_depth: usize,
}

impl<'a> WkbReader<'a> {
    fn new(buf: &'a [u8], max_depth: usize) -> Self {
        Self {
            cursor: Cursor::new(buf),
            depth: 0,
            max_depth,
        }
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len() - self.cursor.position() as usize
    }

    fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        self.cursor
            .read_u8()
            .map_err(|_| GeoCodecError::TruncatedWkb(what))
    }

    fn read_u32(&mut self, order: Endianness, what: &'static str) -> Result<u32> {
        match order {
            Endianness::BigEndian => self.cursor.read_u32::<BigEndian>(),
            Endianness::LittleEndian => self.cursor.read_u32::<LittleEndian>(),
        }
        .map_err(|_| GeoCodecError::TruncatedWkb(what))
    }

    fn read_f64(&mut self, order: Endianness) -> Result<f64> {
        match order {
            Endianness::BigEndian => self.cursor.read_f64::<BigEndian>(),
            Endianness::LittleEndian => self.cursor.read_f64::<LittleEndian>(),
        }
        .map_err(|_| GeoCodecError::TruncatedWkb("coordinate"))
    }

    /// Reads an element count, rejecting counts that could not possibly
    /// fit in the remaining bytes.
    fn read_count(
        &mut self,
        order: Endianness,
        min_element_bytes: usize,
        what: &'static str,
    ) -> Result<usize> {
        let count = self.read_u32(order, what)? as usize;
        if count > self.remaining() / min_element_bytes {
            return Err(GeoCodecError::TruncatedWkb(what));
        }
        Ok(count)
    }

    fn read_coord(&mut self, order: Endianness, dim: Dimension) -> Result<Coord> {
        let x = self.read_f64(order)?;
        let y = self.read_f64(order)?;
        let z = if dim.has_z() {
            Some(self.read_f64(order)?)
        } else {
            None
        };
        let m = if dim.has_m() {
            Some(self.read_f64(order)?)
        } else {
            None
        };
        Ok(Coord::new(x, y, z, m))
    }

    fn read_coord_seq(
        &mut self,
        order: Endianness,
        dim: Dimension,
        what: &'static str,
    ) -> Result<Vec<Coord>> {
        let count = self.read_count(order, dim.size() * 8, what)?;
        let mut coords = Vec::with_capacity(count);
        for _ in 0..count {
            coords.push(self.read_coord(order, dim)?);
        }
        Ok(coords)
    }

    fn read_ring_seq(
        &mut self,
        order: Endianness,
        dim: Dimension,
    ) -> Result<Vec<Vec<Coord>>> {
        let count = self.read_count(order, 4, "ring count")?;
        let mut rings = Vec::with_capacity(count);
        for _ in 0..count {
            rings.push(self.read_coord_seq(order, dim, "ring point count")?);
        }
        Ok(rings)
    }

    /// Child records of a multi-geometry or collection; each child opens
    /// with its own byte-order flag and type code and may carry its own
    /// dimensionality and SRID (homogeneity is not enforced).
    fn read_children(&mut self, order: Endianness, what: &'static str) -> Result<Vec<Geometry>> {
        // a child record is at least a flag byte plus a type code
        let count = self.read_count(order, 5, what)?;
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            children.push(self.read_geometry()?);
        }
        Ok(children)
    }

    fn read_geometry(&mut self) -> Result<Geometry> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(GeoCodecError::NestingTooDeep(self.max_depth));
        }

        let order = Endianness::try_from(self.read_u8("byte-order flag")?)?;
        let code = self.read_u32(order, "geometry type code")?;
        let TypeCode {
            base,
            dim,
            has_srid,
        } = TypeCode::parse(code)?;
        let srid = if has_srid {
            let raw = self.read_u32(order, "SRID")?;
            // SRID 0 decodes to "unspecified"
            (raw != 0).then_some(raw)
        } else {
            None
        };

        let value = match base {
            GeometryType::Point => {
                let coord = self.read_coord(order, dim)?;
                if coord.x.is_nan() && coord.y.is_nan() {
                    GeometryValue::Point(None)
                } else {
                    GeometryValue::Point(Some(coord))
                }
            }
            GeometryType::LineString => {
                GeometryValue::LineString(self.read_coord_seq(order, dim, "point count")?)
            }
            GeometryType::CircularString => {
                GeometryValue::CircularString(self.read_coord_seq(order, dim, "point count")?)
            }
            GeometryType::Polygon => GeometryValue::Polygon(self.read_ring_seq(order, dim)?),
            GeometryType::Triangle => GeometryValue::Triangle(self.read_ring_seq(order, dim)?),
            GeometryType::MultiPoint => {
                let mut coords = Vec::new();
                for child in self.read_children(order, "point count")? {
                    match child.into_value() {
                        GeometryValue::Point(Some(coord)) => coords.push(coord),
                        GeometryValue::Point(None) => {
                            return Err(GeoCodecError::MalformedWkb(
                                "EMPTY point inside a MultiPoint".to_string(),
                            ))
                        }
                        other => {
                            return Err(GeoCodecError::MalformedWkb(format!(
                                "unexpected {} child inside a MultiPoint",
                                other.geometry_type()
                            )))
                        }
                    }
                }
                GeometryValue::MultiPoint(coords)
            }
            GeometryType::MultiLineString => {
                let mut lines = Vec::new();
                for child in self.read_children(order, "line count")? {
                    match child.into_value() {
                        GeometryValue::LineString(coords) => lines.push(coords),
                        other => {
                            return Err(GeoCodecError::MalformedWkb(format!(
                                "unexpected {} child inside a MultiLineString",
                                other.geometry_type()
                            )))
                        }
                    }
                }
                GeometryValue::MultiLineString(lines)
            }
            GeometryType::MultiPolygon
            | GeometryType::PolyhedralSurface
            | GeometryType::Tin => {
                let mut polygons = Vec::new();
                for child in self.read_children(order, "polygon count")? {
                    match child.into_value() {
                        GeometryValue::Polygon(rings) | GeometryValue::Triangle(rings) => {
                            polygons.push(rings)
                        }
                        other => {
                            return Err(GeoCodecError::MalformedWkb(format!(
                                "unexpected {} child inside a {}",
                                other.geometry_type(),
                                base
                            )))
                        }
                    }
                }
                match base {
                    GeometryType::MultiPolygon => GeometryValue::MultiPolygon(polygons),
                    GeometryType::PolyhedralSurface => {
                        GeometryValue::PolyhedralSurface(polygons)
                    }
                    _ => GeometryValue::Tin(polygons),
                }
            }
            GeometryType::GeometryCollection => {
                GeometryValue::GeometryCollection(self.read_children(order, "geometry count")?)
            }
            GeometryType::CompoundCurve => {
                GeometryValue::CompoundCurve(self.read_children(order, "curve count")?)
            }
            GeometryType::CurvePolygon => {
                GeometryValue::CurvePolygon(self.read_children(order, "ring count")?)
            }
            GeometryType::MultiCurve => {
                GeometryValue::MultiCurve(self.read_children(order, "curve count")?)
            }
            GeometryType::MultiSurface => {
                GeometryValue::MultiSurface(self.read_children(order, "surface count")?)
            }
        };

        self.depth -= 1;
        Ok(Geometry::new(value, dim).with_srid(srid))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::write_wkt;

    struct WkbBuilder {
        bytes: Vec<u8>,
    }

    impl WkbBuilder {
        fn le() -> Self {
            Self { bytes: vec![0x01] }
        }

        fn be() -> Self {
            Self { bytes: vec![0x00] }
        }

        fn code(mut self, code: u32) -> Self {
            if self.bytes[0] == 0x01 {
                self.bytes.extend_from_slice(&code.to_le_bytes());
            } else {
                self.bytes.extend_from_slice(&code.to_be_bytes());
            }
            self
        }

        fn u32(mut self, value: u32) -> Self {
            if self.bytes[0] == 0x01 {
                self.bytes.extend_from_slice(&value.to_le_bytes());
            } else {
                self.bytes.extend_from_slice(&value.to_be_bytes());
            }
            self
        }

        fn f64(mut self, value: f64) -> Self {
            if self.bytes[0] == 0x01 {
                self.bytes.extend_from_slice(&value.to_le_bytes());
            } else {
                self.bytes.extend_from_slice(&value.to_be_bytes());
            }
            self
        }

        fn raw(mut self, other: WkbBuilder) -> Self {
            self.bytes.extend_from_slice(&other.bytes);
            self
        }

        fn hex(&self) -> String {
            self.bytes.iter().map(|b| format!("{b:02X}")).collect()
        }
    }

    #[test]
    fn little_endian_point_with_srid() {
        // the canonical EWKB for SRID=4326;POINT(30 10)
        let hex = "0101000020E61000000000000000003E400000000000002440";
        let geom = decode_wkb_hex(hex).unwrap();
        assert_eq!(write_wkt(&geom), "SRID=4326;POINT(30 10)");
    }

    #[test]
    fn big_endian_point() {
        let wkb = WkbBuilder::be().code(1).f64(30.0).f64(10.0);
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(write_wkt(&geom), "POINT(30 10)");
    }

    #[test]
    fn srid_zero_is_unspecified() {
        let wkb = WkbBuilder::le()
            .code(0x2000_0001)
            .u32(0)
            .f64(1.0)
            .f64(2.0);
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(geom.srid(), None);
    }

    #[test]
    fn iso_offset_and_flag_bit_z_decode_identically() {
        let offset = WkbBuilder::le().code(1001).f64(1.0).f64(2.0).f64(3.0);
        let flagged = WkbBuilder::le()
            .code(0x8000_0001)
            .f64(1.0)
            .f64(2.0)
            .f64(3.0);
        assert_eq!(
            decode_wkb_hex(&offset.hex()).unwrap(),
            decode_wkb_hex(&flagged.hex()).unwrap()
        );
    }

    #[test]
    fn nan_point_is_empty() {
        let wkb = WkbBuilder::le().code(1).f64(f64::NAN).f64(f64::NAN);
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(geom.value(), &GeometryValue::Point(None));
        assert_eq!(write_wkt(&geom), "POINT EMPTY");
    }

    #[test]
    fn line_string_z() {
        let wkb = WkbBuilder::le()
            .code(1002)
            .u32(2)
            .f64(0.0)
            .f64(0.0)
            .f64(5.0)
            .f64(1.0)
            .f64(1.0)
            .f64(6.0);
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(write_wkt(&geom), "LINESTRINGZ(0 0 5,1 1 6)");
    }

    #[test]
    fn multi_point_children_are_full_records() {
        let wkb = WkbBuilder::le()
            .code(4)
            .u32(2)
            .raw(WkbBuilder::le().code(1).f64(10.0).f64(40.0))
            .raw(WkbBuilder::le().code(1).f64(40.0).f64(30.0));
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(write_wkt(&geom), "MULTIPOINT(10 40,40 30)");
    }

    #[test]
    fn polygon_rings() {
        let wkb = WkbBuilder::le()
            .code(3)
            .u32(1)
            .u32(4)
            .f64(0.0)
            .f64(0.0)
            .f64(4.0)
            .f64(0.0)
            .f64(4.0)
            .f64(4.0)
            .f64(0.0)
            .f64(0.0);
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(write_wkt(&geom), "POLYGON((0 0,4 0,4 4,0 0))");
    }

    #[test]
    fn collection_children_keep_their_own_dimensions() {
        let wkb = WkbBuilder::le()
            .code(7)
            .u32(2)
            .raw(WkbBuilder::le().code(1).f64(1.0).f64(2.0))
            .raw(WkbBuilder::le().code(1001).f64(1.0).f64(2.0).f64(3.0));
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        match geom.value() {
            GeometryValue::GeometryCollection(children) => {
                assert_eq!(children[0].dimension(), Dimension::Xy);
                assert_eq!(children[1].dimension(), Dimension::Xyz);
            }
            other => panic!("expected collection, got {other:?}"),
        }
    }

    #[test]
    fn mixed_endianness_children() {
        let wkb = WkbBuilder::le()
            .code(7)
            .u32(1)
            .raw(WkbBuilder::be().code(1).f64(3.0).f64(4.0));
        let geom = decode_wkb_hex(&wkb.hex()).unwrap();
        assert_eq!(write_wkt(&geom), "GEOMETRYCOLLECTION(POINT(3 4))");
    }

    #[test]
    fn hex_validation_comes_first() {
        assert!(matches!(
            decode_wkb_hex("0G"),
            Err(GeoCodecError::InvalidHexDigit('G'))
        ));
        assert!(matches!(
            decode_wkb_hex("ABC"),
            Err(GeoCodecError::OddLengthHex(3))
        ));
    }

    #[test]
    fn truncated_buffers() {
        let full = WkbBuilder::le().code(1).f64(30.0).f64(10.0).hex();
        for cut in [2, 10, full.len() - 2] {
            assert!(matches!(
                decode_wkb_hex(&full[..cut]),
                Err(GeoCodecError::TruncatedWkb(_))
            ));
        }
        assert!(matches!(
            decode_wkb_hex(""),
            Err(GeoCodecError::TruncatedWkb(_))
        ));
    }

    #[test]
    fn corrupt_counts_do_not_allocate() {
        let wkb = WkbBuilder::le().code(2).u32(u32::MAX);
        assert!(matches!(
            decode_wkb_hex(&wkb.hex()),
            Err(GeoCodecError::TruncatedWkb(_))
        ));
    }

    #[test]
    fn unknown_type_and_byte_order() {
        let wkb = WkbBuilder::le().code(99).f64(0.0).f64(0.0);
        assert!(matches!(
            decode_wkb_hex(&wkb.hex()),
            Err(GeoCodecError::UnknownWkbType(99))
        ));
        assert!(matches!(
            decode_wkb_hex("0201000000"),
            Err(GeoCodecError::InvalidByteOrder(2))
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut wkb = WkbBuilder::le().code(1).f64(30.0).f64(10.0);
        wkb.bytes.push(0xFF);
        assert!(matches!(
            decode_wkb_hex(&wkb.hex()),
            Err(GeoCodecError::MalformedWkb(_))
        ));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut wkb = WkbBuilder::le();
        for _ in 0..8 {
            wkb = wkb.code(7).u32(1).raw(WkbBuilder::le());
        }
        // innermost record left dangling on purpose; the depth check
        // fires before the truncation is reached
        wkb.bytes.truncate(wkb.bytes.len() - 1);
        assert!(matches!(
            decode_wkb_hex_with_depth(&wkb.hex(), 4),
            Err(GeoCodecError::NestingTooDeep(4))
        ));
    }

    #[test]
    fn plausible_hex_shape() {
        assert!(is_plausible_hex("0101000000"));
        assert!(!is_plausible_hex(""));
        assert!(!is_plausible_hex("ABC"));
        assert!(!is_plausible_hex("POINT(1 2)"));
    }
}
