//! Convert between the geometry value model and RFC 7946 GeoJSON
//! geometry objects.
//!
//! SRID and M ordinates are not representable in plain GeoJSON and are
//! dropped on the way out; a third positional ordinate is passed through
//! as Z, never inferred as M.

mod reader;
mod writer;

pub use reader::{from_geojson, from_geojson_str, from_geojson_with_depth};
pub use writer::to_geojson;
