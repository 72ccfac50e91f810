//! Defines [`GeoCodecError`], representing all errors returned by this crate.

use thiserror::Error;

/// Enum with all errors in this crate.
///
/// Every decode and validation failure carries the offending fragment or
/// value; the attribute-validation variants are worded for direct display
/// to an end user configuring a column.
#[derive(Error, Debug)]
pub enum GeoCodecError {
    /// Well-known text that does not follow the WKT/EWKT grammar.
    #[error("malformed WKT: {0}")]
    MalformedWkt(String),

    /// A hexadecimal geometry payload with an odd number of digits.
    #[error("hex geometry payload has odd length {0}")]
    OddLengthHex(usize),

    /// A character outside `[0-9A-Fa-f]` in a hexadecimal geometry payload.
    #[error("invalid hex digit {0:?} in geometry payload")]
    InvalidHexDigit(char),

    /// The binary buffer ended before the decoder read a complete value.
    #[error("WKB ended prematurely while reading {0}")]
    TruncatedWkb(&'static str),

    /// A WKB geometry-type code that matches no known geometry kind.
    #[error("unknown WKB geometry type code {0}")]
    UnknownWkbType(u32),

    /// A WKB byte-order flag other than 0 (big-endian) or 1 (little-endian).
    #[error("invalid WKB byte-order flag {0:#04x}")]
    InvalidByteOrder(u8),

    /// Structurally invalid WKB, e.g. a child record of the wrong kind.
    #[error("malformed WKB: {0}")]
    MalformedWkb(String),

    /// A GeoJSON `type` member naming no RFC 7946 geometry, or a geometry
    /// kind that RFC 7946 cannot represent.
    #[error("unsupported GeoJSON geometry type: {0}")]
    UnsupportedGeoJsonType(String),

    /// GeoJSON coordinate nesting that does not match the declared type.
    #[error("malformed GeoJSON coordinates: {0}")]
    MalformedCoordinates(String),

    /// Input that matches none of the encodings the canonicalizer accepts.
    #[error("unrecognized geometry encoding: {0:?}")]
    UnrecognizedGeometryEncoding(String),

    /// Spatial reference identifiers must be positive integers.
    #[error("SRID must be a positive integer, got {0}")]
    InvalidSrid(i64),

    /// The dimensionality modifier of a column, if given, must be one of
    /// "", "Z", "M" or "ZM".
    #[error("invalid dimensionality modifier {0:?}, expected \"\", \"Z\", \"M\" or \"ZM\"")]
    InvalidDimensionModifier(String),

    /// The subtype of a column, if given, must name a geometry kind.
    #[error("invalid geometry subtype {0:?}")]
    InvalidSubtype(String),

    /// A value that contradicts the metadata of the column holding it.
    #[error("value does not match column attributes: {0}")]
    AttributeMismatch(String),

    /// Input nested deeper than the caller-supplied maximum.
    #[error("geometry nesting exceeds the maximum depth of {0}")]
    NestingTooDeep(usize),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoCodecError>;
