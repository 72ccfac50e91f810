use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::GeoCodecError;
use crate::geometry::Dimension;

/// The catalogue of geometry kinds, tagged with their WKB base codes.
///
/// The curve and surface kinds past `GeometryCollection` are carried as
/// opaque coordinate-bearing variants: the codec checks their syntactic
/// shape but not their internal topology.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(u32)]
pub enum GeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    MultiCurve = 11,
    MultiSurface = 12,
    PolyhedralSurface = 15,
    Tin = 16,
    Triangle = 17,
}

static KEYWORDS: phf::Map<&'static str, GeometryType> = phf_map! {
    "POINT" => GeometryType::Point,
    "LINESTRING" => GeometryType::LineString,
    "POLYGON" => GeometryType::Polygon,
    "MULTIPOINT" => GeometryType::MultiPoint,
    "MULTILINESTRING" => GeometryType::MultiLineString,
    "MULTIPOLYGON" => GeometryType::MultiPolygon,
    "GEOMETRYCOLLECTION" => GeometryType::GeometryCollection,
    "CIRCULARSTRING" => GeometryType::CircularString,
    "COMPOUNDCURVE" => GeometryType::CompoundCurve,
    "CURVEPOLYGON" => GeometryType::CurvePolygon,
    "MULTICURVE" => GeometryType::MultiCurve,
    "MULTISURFACE" => GeometryType::MultiSurface,
    "POLYHEDRALSURFACE" => GeometryType::PolyhedralSurface,
    "TIN" => GeometryType::Tin,
    "TRIANGLE" => GeometryType::Triangle,
};

impl GeometryType {
    /// The upper-case WKT keyword of this kind.
    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
            GeometryType::CircularString => "CIRCULARSTRING",
            GeometryType::CompoundCurve => "COMPOUNDCURVE",
            GeometryType::CurvePolygon => "CURVEPOLYGON",
            GeometryType::MultiCurve => "MULTICURVE",
            GeometryType::MultiSurface => "MULTISURFACE",
            GeometryType::PolyhedralSurface => "POLYHEDRALSURFACE",
            GeometryType::Tin => "TIN",
            GeometryType::Triangle => "TRIANGLE",
        }
    }

    /// The RFC 7946 identifier, or `None` for kinds GeoJSON cannot express.
    pub fn geojson_id(&self) -> Option<&'static str> {
        match self {
            GeometryType::Point => Some("Point"),
            GeometryType::LineString => Some("LineString"),
            GeometryType::Polygon => Some("Polygon"),
            GeometryType::MultiPoint => Some("MultiPoint"),
            GeometryType::MultiLineString => Some("MultiLineString"),
            GeometryType::MultiPolygon => Some("MultiPolygon"),
            GeometryType::GeometryCollection => Some("GeometryCollection"),
            _ => None,
        }
    }

    /// The WKB base code (the type code with dimension offsets and flag
    /// bits cleared).
    pub fn wkb_id(&self) -> u32 {
        (*self).into()
    }

    /// Looks up an upper-case WKT keyword.
    pub fn from_wkt_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS.get(keyword).copied()
    }

    /// Resolves an upper-case WKT keyword that may carry a glued
    /// dimensionality suffix (`POINTZM`, `MULTIPOINTM`, ...).
    ///
    /// Returns the kind and the glued suffix, if one was present. A bare
    /// keyword resolves with `None` so the caller can still accept a
    /// free-standing suffix token.
    pub fn from_keyword_with_dim(keyword: &str) -> Option<(Self, Option<Dimension>)> {
        if let Some(ty) = Self::from_wkt_keyword(keyword) {
            return Some((ty, None));
        }
        for suffix in ["ZM", "Z", "M"] {
            if let Some(base) = keyword.strip_suffix(suffix) {
                if let Some(ty) = Self::from_wkt_keyword(base) {
                    let dim = Dimension::from_wkt_suffix(suffix)?;
                    return Some((ty, Some(dim)));
                }
            }
        }
        None
    }

}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wkt_keyword())
    }
}

impl FromStr for GeometryType {
    type Err = GeoCodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_wkt_keyword(&value.to_ascii_uppercase())
            .ok_or_else(|| GeoCodecError::InvalidSubtype(value.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keyword_round_trip() {
        for code in (1..=12).chain(15..=17) {
            let ty = GeometryType::try_from(code).unwrap();
            assert_eq!(GeometryType::from_wkt_keyword(ty.wkt_keyword()), Some(ty));
            assert_eq!(ty.wkb_id(), code);
        }
    }

    #[test]
    fn glued_suffixes() {
        assert_eq!(
            GeometryType::from_keyword_with_dim("POINTZM"),
            Some((GeometryType::Point, Some(Dimension::Xyzm)))
        );
        assert_eq!(
            GeometryType::from_keyword_with_dim("MULTIPOINTM"),
            Some((GeometryType::MultiPoint, Some(Dimension::Xym)))
        );
        assert_eq!(
            GeometryType::from_keyword_with_dim("TIN"),
            Some((GeometryType::Tin, None))
        );
        assert_eq!(GeometryType::from_keyword_with_dim("POINTER"), None);
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(
            "polygon".parse::<GeometryType>().unwrap(),
            GeometryType::Polygon
        );
        assert!(matches!(
            "BLOB".parse::<GeometryType>(),
            Err(GeoCodecError::InvalidSubtype(s)) if s == "BLOB"
        ));
    }

    #[test]
    fn unknown_wkb_base_codes() {
        assert!(GeometryType::try_from(0u32).is_err());
        assert!(GeometryType::try_from(13u32).is_err());
        assert!(GeometryType::try_from(14u32).is_err());
        assert!(GeometryType::try_from(18u32).is_err());
    }
}
