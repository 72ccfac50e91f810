//! A pure, synchronous geometry codec and validation engine.
//!
//! `geocodec` moves geometry values between the encodings a spatial
//! database column touches: Well-Known Text and its `SRID=<n>;`-prefixed
//! extension (EWKT), hexadecimal Well-Known Binary (WKB/EWKB, decode
//! only), and RFC 7946 GeoJSON. A canonicalizer reduces whatever shape a
//! data source returns to one canonical EWKT form, and the attribute
//! layer validates column metadata (SRID, dimensionality modifier,
//! subtype) and enforces it against values.
//!
//! Every operation is a pure function of its arguments: no I/O, no
//! shared state, no locking needed for concurrent use.
//!
//! ```
//! use geocodec::{normalize, parse_wkt, write_wkt};
//!
//! // reduce whatever the data source returned to canonical EWKT
//! let hex = "0101000020E61000000000000000003E400000000000002440";
//! let canonical = normalize(Some(hex))?;
//! assert_eq!(canonical.as_deref(), Some("SRID=4326;POINT(30 10)"));
//!
//! // every suffix spelling parses to the same geometry
//! let geom = parse_wkt("POINT Z (1 2 3)")?;
//! assert_eq!(write_wkt(&geom), "POINTZ(1 2 3)");
//! # Ok::<(), geocodec::GeoCodecError>(())
//! ```

pub mod attrs;
pub mod error;
pub mod geometry;
pub mod io;
pub mod normalize;
#[cfg(test)]
pub(crate) mod test;

pub use attrs::{build_type_name, TypeAttributes, DEFAULT_SRID};
pub use error::{GeoCodecError, Result};
pub use geometry::{Coord, Dimension, Geometry, GeometryType, GeometryValue};
pub use io::geojson::{from_geojson, from_geojson_str, to_geojson};
pub use io::wkb::{decode_wkb, decode_wkb_hex};
pub use io::wkt::{parse_wkt, write_wkt};
pub use io::DEFAULT_MAX_DEPTH;
pub use normalize::{decode_value, normalize, point_lon_lat};
