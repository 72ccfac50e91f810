use serde::{Deserialize, Serialize};

/// Coordinate dimensionality of a geometry.
///
/// Determines whether each position carries 2, 3 (Z or M) or 4 ordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Dimension {
    /// Planar X/Y coordinates.
    #[default]
    Xy,
    /// X/Y plus an elevation ordinate.
    Xyz,
    /// X/Y plus a measure ordinate.
    Xym,
    /// X/Y plus elevation and measure.
    Xyzm,
}

impl Dimension {
    /// The number of ordinates each position carries.
    pub fn size(&self) -> usize {
        match self {
            Dimension::Xy => 2,
            Dimension::Xyz | Dimension::Xym => 3,
            Dimension::Xyzm => 4,
        }
    }

    pub fn has_z(&self) -> bool {
        matches!(self, Dimension::Xyz | Dimension::Xyzm)
    }

    pub fn has_m(&self) -> bool {
        matches!(self, Dimension::Xym | Dimension::Xyzm)
    }

    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Dimension::Xy,
            (true, false) => Dimension::Xyz,
            (false, true) => Dimension::Xym,
            (true, true) => Dimension::Xyzm,
        }
    }

    /// The WKT dimensionality suffix, empty for plain XY.
    pub fn wkt_suffix(&self) -> &'static str {
        match self {
            Dimension::Xy => "",
            Dimension::Xyz => "Z",
            Dimension::Xym => "M",
            Dimension::Xyzm => "ZM",
        }
    }

    /// Parses a WKT dimensionality suffix. The empty string is plain XY.
    pub fn from_wkt_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Dimension::Xy),
            "Z" => Some(Dimension::Xyz),
            "M" => Some(Dimension::Xym),
            "ZM" => Some(Dimension::Xyzm),
            _ => None,
        }
    }

}
