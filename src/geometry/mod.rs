//! The owned geometry value model shared by every codec in this crate.
//!
//! A [`Geometry`] is constructed transiently by a parse or decode
//! operation, consumed by a serialize or convert operation, and dropped;
//! nothing in this module can fail and nothing here holds state.

mod dimension;
mod kind;

pub use dimension::Dimension;
pub use kind::GeometryType;

/// A single position.
///
/// The `z` and `m` ordinates are populated consistently with the owning
/// geometry's [`Dimension`] by every constructor path in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    pub fn new(x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Self {
        Self { x, y, z, m }
    }

    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// The dimensionality implied by the populated ordinates.
    pub fn dimension(&self) -> Dimension {
        Dimension::from_flags(self.z.is_some(), self.m.is_some())
    }
}

/// The kind-specific payload of a [`Geometry`].
///
/// Nesting depth follows the kind: a position for a point, a sequence of
/// positions for linear kinds, a sequence of rings for surface kinds, and
/// full child geometries for collection-shaped kinds. `Point` uses `None`
/// as its explicit EMPTY state; every sequence-shaped kind uses the empty
/// sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryValue {
    Point(Option<Coord>),
    LineString(Vec<Coord>),
    CircularString(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    Triangle(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    PolyhedralSurface(Vec<Vec<Vec<Coord>>>),
    Tin(Vec<Vec<Vec<Coord>>>),
    GeometryCollection(Vec<Geometry>),
    CompoundCurve(Vec<Geometry>),
    CurvePolygon(Vec<Geometry>),
    MultiCurve(Vec<Geometry>),
    MultiSurface(Vec<Geometry>),
}

impl GeometryValue {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            GeometryValue::Point(_) => GeometryType::Point,
            GeometryValue::LineString(_) => GeometryType::LineString,
            GeometryValue::CircularString(_) => GeometryType::CircularString,
            GeometryValue::Polygon(_) => GeometryType::Polygon,
            GeometryValue::Triangle(_) => GeometryType::Triangle,
            GeometryValue::MultiPoint(_) => GeometryType::MultiPoint,
            GeometryValue::MultiLineString(_) => GeometryType::MultiLineString,
            GeometryValue::MultiPolygon(_) => GeometryType::MultiPolygon,
            GeometryValue::PolyhedralSurface(_) => GeometryType::PolyhedralSurface,
            GeometryValue::Tin(_) => GeometryType::Tin,
            GeometryValue::GeometryCollection(_) => GeometryType::GeometryCollection,
            GeometryValue::CompoundCurve(_) => GeometryType::CompoundCurve,
            GeometryValue::CurvePolygon(_) => GeometryType::CurvePolygon,
            GeometryValue::MultiCurve(_) => GeometryType::MultiCurve,
            GeometryValue::MultiSurface(_) => GeometryType::MultiSurface,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GeometryValue::Point(coord) => coord.is_none(),
            GeometryValue::LineString(coords)
            | GeometryValue::CircularString(coords)
            | GeometryValue::MultiPoint(coords) => coords.is_empty(),
            GeometryValue::Polygon(rings)
            | GeometryValue::Triangle(rings)
            | GeometryValue::MultiLineString(rings) => rings.is_empty(),
            GeometryValue::MultiPolygon(polygons)
            | GeometryValue::PolyhedralSurface(polygons)
            | GeometryValue::Tin(polygons) => polygons.is_empty(),
            GeometryValue::GeometryCollection(children)
            | GeometryValue::CompoundCurve(children)
            | GeometryValue::CurvePolygon(children)
            | GeometryValue::MultiCurve(children)
            | GeometryValue::MultiSurface(children) => children.is_empty(),
        }
    }
}

/// An owned geometry: kind-tagged coordinates plus dimensionality and an
/// optional spatial reference identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    srid: Option<u32>,
    dim: Dimension,
    value: GeometryValue,
}

impl Geometry {
    pub fn new(value: GeometryValue, dim: Dimension) -> Self {
        Self {
            srid: None,
            dim,
            value,
        }
    }

    /// Replaces the SRID. `None` means unspecified, never zero.
    pub fn with_srid(mut self, srid: Option<u32>) -> Self {
        self.srid = srid;
        self
    }

    pub fn srid(&self) -> Option<u32> {
        self.srid
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn value(&self) -> &GeometryValue {
        &self.value
    }

    pub fn into_value(self) -> GeometryValue {
        self.value
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.value.geometry_type()
    }

    /// Whether this is the explicit EMPTY state of its kind.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
