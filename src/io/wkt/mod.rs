//! Read and write Well-Known Text and its `SRID=<n>;`-prefixed
//! extension (EWKT).

mod reader;
mod writer;

pub use reader::{parse_wkt, parse_wkt_with_depth};
pub use writer::write_wkt;

pub(crate) use reader::looks_like_wkt;
