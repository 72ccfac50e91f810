//! Reduce whatever a data source hands back to one canonical form.
//!
//! The dispatch is by shape, first match wins, and a matched-but-malformed
//! input fails with its specific error instead of falling through to the
//! next rule. Absent input (`None`, empty, all-whitespace) is not an
//! error anywhere: it propagates as "no value".

use crate::error::{GeoCodecError, Result};
use crate::geometry::{Geometry, GeometryValue};
use crate::io::wkb::{decode_wkb_hex_with_depth, is_plausible_hex};
use crate::io::wkt::{looks_like_wkt, parse_wkt_with_depth, write_wkt};
use crate::io::DEFAULT_MAX_DEPTH;

/// Normalize a raw value to canonical EWKT.
///
/// Recognized shapes, in order: a helper-expression wrapper carrying a
/// quoted hex payload, WKT/EWKT (validated, then passed through
/// unchanged), and bare hex WKB/EWKB. Anything else fails with
/// [`GeoCodecError::UnrecognizedGeometryEncoding`].
pub fn normalize(raw: Option<&str>) -> Result<Option<String>> {
    normalize_with_depth(raw, DEFAULT_MAX_DEPTH)
}

/// [`normalize`] with an explicit bound on recursive nesting.
pub fn normalize_with_depth(raw: Option<&str>, max_depth: usize) -> Result<Option<String>> {
    let Some(input) = present(raw) else {
        return Ok(None);
    };
    let text = match classify(input) {
        Encoding::Wrapper(payload) => write_wkt(&decode_wkb_hex_with_depth(payload, max_depth)?),
        Encoding::Wkt => {
            parse_wkt_with_depth(input, max_depth)?;
            input.to_string()
        }
        Encoding::Hex => write_wkt(&decode_wkb_hex_with_depth(input, max_depth)?),
        Encoding::Unknown => {
            return Err(GeoCodecError::UnrecognizedGeometryEncoding(snippet(input)))
        }
    };
    Ok(Some(text))
}

/// Like [`normalize`], but returns the decoded [`Geometry`] for callers
/// that want the value rather than its text.
pub fn decode_value(raw: Option<&str>) -> Result<Option<Geometry>> {
    decode_value_with_depth(raw, DEFAULT_MAX_DEPTH)
}

/// [`decode_value`] with an explicit bound on recursive nesting.
pub fn decode_value_with_depth(raw: Option<&str>, max_depth: usize) -> Result<Option<Geometry>> {
    let Some(input) = present(raw) else {
        return Ok(None);
    };
    let geometry = match classify(input) {
        Encoding::Wrapper(payload) => decode_wkb_hex_with_depth(payload, max_depth)?,
        Encoding::Wkt => parse_wkt_with_depth(input, max_depth)?,
        Encoding::Hex => decode_wkb_hex_with_depth(input, max_depth)?,
        Encoding::Unknown => {
            return Err(GeoCodecError::UnrecognizedGeometryEncoding(snippet(input)))
        }
    };
    Ok(Some(geometry))
}

/// Derived coordinate fields of a decoded point, for host layers that
/// expose longitude/latitude columns next to the geometry.
///
/// Returns `(x, y)`; `None` for EMPTY points and non-points.
pub fn point_lon_lat(geometry: &Geometry) -> Option<(f64, f64)> {
    match geometry.value() {
        GeometryValue::Point(Some(coord)) => Some((coord.x, coord.y)),
        _ => None,
    }
}

enum Encoding<'a> {
    Wrapper(&'a str),
    Wkt,
    Hex,
    Unknown,
}

fn classify(input: &str) -> Encoding<'_> {
    if let Some(payload) = helper_payload(input) {
        Encoding::Wrapper(payload)
    } else if looks_like_wkt(input) {
        Encoding::Wkt
    } else if is_plausible_hex(input) {
        Encoding::Hex
    } else {
        Encoding::Unknown
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Extract the hex payload of a helper-expression wrapper: an identifier,
/// parentheses, and a quoted payload somewhere inside, optionally with a
/// `\x` or `0x` prefix. The payload's validity is checked by the decoder
/// afterwards; a matched wrapper with a bad payload is a hard error.
fn helper_payload(input: &str) -> Option<&str> {
    let open = input.find('(')?;
    let ident = input[..open].trim_end();
    let mut chars = ident.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        return None;
    }
    let inner = input[open + 1..].trim_end().strip_suffix(')')?;
    let quote_start = inner.find('\'')?;
    let after = &inner[quote_start + 1..];
    let payload = &after[..after.find('\'')?];
    Some(
        payload
            .strip_prefix("\\x")
            .or_else(|| payload.strip_prefix("0x"))
            .unwrap_or(payload),
    )
}

fn snippet(input: &str) -> String {
    let mut out: String = input.chars().take(40).collect();
    if input.chars().nth(40).is_some() {
        out.push('…');
    }
    out
}
