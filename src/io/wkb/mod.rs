//! Decode hexadecimal Well-Known Binary and its SRID-carrying EWKB
//! extension.
//!
//! This direction is read-only: the codec only ever receives binary from
//! a data source and answers in text, so there is no WKB writer.

mod common;
mod reader;

pub use common::{Endianness, TypeCode};
pub use reader::{decode_wkb, decode_wkb_hex, decode_wkb_hex_with_depth};

pub(crate) use reader::is_plausible_hex;
