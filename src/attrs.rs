//! Column-level type attributes: validation and the canonical SQL type
//! descriptor built from them.
//!
//! Attributes describe a column, not a single value, and are validated
//! independently of any particular [`Geometry`].

use serde::{Deserialize, Serialize};

use crate::error::{GeoCodecError, Result};
use crate::geometry::{Dimension, Geometry, GeometryType};

/// SRID assumed when the caller leaves it unspecified (WGS-84).
pub const DEFAULT_SRID: i64 = 4326;

/// Metadata the host supplies alongside each geometry column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAttributes {
    /// Spatial reference identifier; must be positive when present.
    pub srid: Option<i64>,
    /// Dimensionality modifier: "", "Z", "M" or "ZM", case-insensitive.
    pub dim: Option<String>,
    /// Restriction to one concrete geometry kind, case-insensitive.
    pub subtype: Option<String>,
}

impl TypeAttributes {
    /// Check the attributes themselves, independent of any value.
    pub fn validate(&self) -> Result<()> {
        if let Some(srid) = self.srid {
            if srid <= 0 {
                return Err(GeoCodecError::InvalidSrid(srid));
            }
        }
        if let Some(dim) = &self.dim {
            if Dimension::from_wkt_suffix(&dim.to_ascii_uppercase()).is_none() {
                return Err(GeoCodecError::InvalidDimensionModifier(dim.clone()));
            }
        }
        if let Some(subtype) = &self.subtype {
            subtype.parse::<GeometryType>()?;
        }
        Ok(())
    }

    /// Enforce these attributes against an actual value.
    ///
    /// The WKT parser stays permissive about dimensionality suffixes;
    /// this is where a column's declared modifier becomes binding: a
    /// non-empty modifier requires an exact match and an empty or absent
    /// one requires a plain XY value. The value's SRID, when it carries
    /// one, must equal the column's when that is present.
    pub fn validate_value(&self, geometry: &Geometry) -> Result<()> {
        self.validate()?;
        if let Some(subtype) = &self.subtype {
            let expected = subtype.parse::<GeometryType>()?;
            if geometry.geometry_type() != expected {
                return Err(GeoCodecError::AttributeMismatch(format!(
                    "column is restricted to {expected}, value is a {}",
                    geometry.geometry_type()
                )));
            }
        }
        let required = self
            .dim
            .as_deref()
            .map(str::to_ascii_uppercase)
            .as_deref()
            .and_then(Dimension::from_wkt_suffix)
            .unwrap_or_default();
        if geometry.dimension() != required {
            return Err(GeoCodecError::AttributeMismatch(format!(
                "column stores {} values, value is {}",
                describe_dim(required),
                describe_dim(geometry.dimension())
            )));
        }
        if let (Some(column_srid), Some(value_srid)) = (self.srid, geometry.srid()) {
            if column_srid != i64::from(value_srid) {
                return Err(GeoCodecError::AttributeMismatch(format!(
                    "column uses SRID {column_srid}, value carries SRID {value_srid}"
                )));
            }
        }
        Ok(())
    }
}

fn describe_dim(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Xy => "XY",
        Dimension::Xyz => "XYZ",
        Dimension::Xym => "XYM",
        Dimension::Xyzm => "XYZM",
    }
}

/// Compose the canonical SQL type descriptor for a column.
///
/// With an effective subtype (the attribute, falling back to
/// `default_subtype`) the result is `base(SUBTYPE[DIM],SRID)`; with no
/// subtype but an SRID, `base(Geometry,SRID)`; otherwise the bare base.
/// The SRID defaults to WGS-84. Pure and total: malformed attributes are
/// the business of [`TypeAttributes::validate`], not this function.
pub fn build_type_name(base: &str, default_subtype: &str, attrs: &TypeAttributes) -> String {
    let base = base.to_ascii_lowercase();
    let subtype = attrs
        .subtype
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_subtype)
        .to_ascii_uppercase();
    let dim = attrs
        .dim
        .as_deref()
        .map(str::to_ascii_uppercase)
        .unwrap_or_default();
    let srid = attrs.srid.unwrap_or(DEFAULT_SRID);

    if !subtype.is_empty() {
        format!("{base}({subtype}{dim},{srid})")
    } else if attrs.srid.is_some() {
        format!("{base}(Geometry,{srid})")
    } else {
        base
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::parse_wkt;

    fn attrs(srid: Option<i64>, dim: Option<&str>, subtype: Option<&str>) -> TypeAttributes {
        TypeAttributes {
            srid,
            dim: dim.map(str::to_string),
            subtype: subtype.map(str::to_string),
        }
    }

    #[test]
    fn srid_zero_is_invalid() {
        assert!(matches!(
            attrs(Some(0), None, None).validate(),
            Err(GeoCodecError::InvalidSrid(0))
        ));
        assert!(matches!(
            attrs(Some(-4326), None, None).validate(),
            Err(GeoCodecError::InvalidSrid(-4326))
        ));
        assert!(attrs(Some(4326), None, None).validate().is_ok());
    }

    #[test]
    fn dim_is_case_insensitive() {
        assert!(attrs(Some(4326), Some("zm"), None).validate().is_ok());
        assert!(attrs(None, Some(""), None).validate().is_ok());
        assert!(matches!(
            attrs(None, Some("W"), None).validate(),
            Err(GeoCodecError::InvalidDimensionModifier(d)) if d == "W"
        ));
    }

    #[test]
    fn subtype_must_name_a_kind() {
        assert!(attrs(None, None, Some("point")).validate().is_ok());
        assert!(attrs(None, None, Some("CircularString")).validate().is_ok());
        assert!(matches!(
            attrs(None, None, Some("BLOB")).validate(),
            Err(GeoCodecError::InvalidSubtype(s)) if s == "BLOB"
        ));
    }

    #[test]
    fn type_name_is_deterministic() {
        assert_eq!(
            build_type_name("GEOMETRY", "POINT", &attrs(Some(3857), Some("Z"), None)),
            "geometry(POINTZ,3857)"
        );
        assert_eq!(
            build_type_name("geography", "", &attrs(None, None, Some("linestring"))),
            "geography(LINESTRING,4326)"
        );
        assert_eq!(
            build_type_name("geometry", "", &attrs(Some(3857), None, None)),
            "geometry(Geometry,3857)"
        );
        assert_eq!(build_type_name("GEOMETRY", "", &attrs(None, None, None)), "geometry");
    }

    #[test]
    fn value_subtype_enforcement() {
        let line = parse_wkt("LINESTRING(0 0,1 1)").unwrap();
        let column = attrs(None, None, Some("POINT"));
        assert!(matches!(
            column.validate_value(&line),
            Err(GeoCodecError::AttributeMismatch(_))
        ));
        let point = parse_wkt("POINT(1 2)").unwrap();
        assert!(column.validate_value(&point).is_ok());
    }

    #[test]
    fn value_dimensionality_enforcement() {
        let flat = parse_wkt("POINT(1 2)").unwrap();
        let tall = parse_wkt("POINTZ(1 2 3)").unwrap();

        let z_column = attrs(None, Some("Z"), None);
        assert!(z_column.validate_value(&tall).is_ok());
        assert!(matches!(
            z_column.validate_value(&flat),
            Err(GeoCodecError::AttributeMismatch(_))
        ));

        let plain_column = attrs(None, None, None);
        assert!(plain_column.validate_value(&flat).is_ok());
        assert!(plain_column.validate_value(&tall).is_err());
    }

    #[test]
    fn value_srid_enforcement() {
        let column = attrs(Some(4326), None, None);
        let matching = parse_wkt("SRID=4326;POINT(1 2)").unwrap();
        let conflicting = parse_wkt("SRID=3857;POINT(1 2)").unwrap();
        let unspecified = parse_wkt("POINT(1 2)").unwrap();

        assert!(column.validate_value(&matching).is_ok());
        assert!(column.validate_value(&unspecified).is_ok());
        assert!(matches!(
            column.validate_value(&conflicting),
            Err(GeoCodecError::AttributeMismatch(_))
        ));
    }
}
