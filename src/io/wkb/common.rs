use crate::error::{GeoCodecError, Result};
use crate::geometry::{Dimension, GeometryType};

/// EWKB "has SRID" marker.
pub(crate) const SRID_FLAG: u32 = 0x2000_0000;
/// PostGIS-style Z flag; the ISO encoding uses a +1000 offset instead.
pub(crate) const Z_FLAG: u32 = 0x8000_0000;
/// PostGIS-style M flag; the ISO encoding uses a +2000 offset instead.
pub(crate) const M_FLAG: u32 = 0x4000_0000;

/// Endianness of a single WKB record.
///
/// Every record, including each nested child, opens with its own
/// byte-order flag; all multi-byte reads inside the record follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    BigEndian,
    LittleEndian,
}

impl TryFrom<u8> for Endianness {
    type Error = GeoCodecError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Endianness::BigEndian),
            1 => Ok(Endianness::LittleEndian),
            other => Err(GeoCodecError::InvalidByteOrder(other)),
        }
    }
}

/// A decomposed 32-bit WKB geometry-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCode {
    pub base: GeometryType,
    pub dim: Dimension,
    pub has_srid: bool,
}

impl TypeCode {
    /// Splits a raw type code into base kind, dimensionality and SRID
    /// marker.
    ///
    /// Both dimensionality encodings are honored: the ISO decimal offsets
    /// (+1000 Z, +2000 M, +3000 ZM) and the PostGIS high flag bits, which
    /// is what an EWKB-emitting database actually sends.
    pub fn parse(code: u32) -> Result<Self> {
        let has_srid = code & SRID_FLAG != 0;
        let flag_z = code & Z_FLAG != 0;
        let flag_m = code & M_FLAG != 0;
        let plain = code & !(SRID_FLAG | Z_FLAG | M_FLAG);

        let (offset_z, offset_m) = match plain / 1000 {
            0 => (false, false),
            1 => (true, false),
            2 => (false, true),
            3 => (true, true),
            _ => return Err(GeoCodecError::UnknownWkbType(code)),
        };
        let base = GeometryType::try_from(plain % 1000)
            .map_err(|_| GeoCodecError::UnknownWkbType(code))?;
        let dim = Dimension::from_flags(flag_z || offset_z, flag_m || offset_m);
        Ok(Self {
            base,
            dim,
            has_srid,
        })
    }
}
