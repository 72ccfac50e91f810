use serde_json::{Map, Value};

use crate::error::{GeoCodecError, Result};
use crate::geometry::{Coord, Dimension, Geometry, GeometryValue};
use crate::io::DEFAULT_MAX_DEPTH;

/// Convert a GeoJSON geometry object (not a Feature) to a [`Geometry`].
///
/// A third positional ordinate reads as Z; SRID and M cannot appear in
/// GeoJSON, so the result never carries either.
pub fn from_geojson(value: &Value) -> Result<Geometry> {
    from_geojson_with_depth(value, DEFAULT_MAX_DEPTH)
}

/// [`from_geojson`] with an explicit bound on recursive nesting.
pub fn from_geojson_with_depth(value: &Value, max_depth: usize) -> Result<Geometry> {
    convert(value, 1, max_depth)
}

/// Parse raw text as JSON, then convert per [`from_geojson`].
pub fn from_geojson_str(input: &str) -> Result<Geometry> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| GeoCodecError::MalformedCoordinates(format!("not valid JSON: {e}")))?;
    from_geojson(&value)
}

fn convert(value: &Value, depth: usize, max_depth: usize) -> Result<Geometry> {
    if depth > max_depth {
        return Err(GeoCodecError::NestingTooDeep(max_depth));
    }
    let object = value.as_object().ok_or_else(|| {
        GeoCodecError::MalformedCoordinates("a geometry must be a JSON object".to_string())
    })?;
    let type_id = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            GeoCodecError::UnsupportedGeoJsonType("missing \"type\" member".to_string())
        })?;

    let mut tracker: Option<Dimension> = None;
    let value = match type_id {
        "Point" => {
            let coords = coordinates(object)?;
            if coords.is_empty() {
                GeometryValue::Point(None)
            } else {
                GeometryValue::Point(Some(position_from_parts(coords, &mut tracker)?))
            }
        }
        "LineString" => GeometryValue::LineString(position_seq(coordinates(object)?, &mut tracker)?),
        "MultiPoint" => GeometryValue::MultiPoint(position_seq(coordinates(object)?, &mut tracker)?),
        "Polygon" => GeometryValue::Polygon(ring_seq(coordinates(object)?, &mut tracker)?),
        "MultiLineString" => {
            GeometryValue::MultiLineString(ring_seq(coordinates(object)?, &mut tracker)?)
        }
        "MultiPolygon" => {
            let polygons = coordinates(object)?
                .iter()
                .map(|rings| {
                    let rings = rings.as_array().ok_or_else(|| {
                        GeoCodecError::MalformedCoordinates(
                            "a MultiPolygon member must be an array of rings".to_string(),
                        )
                    })?;
                    ring_seq(rings, &mut tracker)
                })
                .collect::<Result<Vec<_>>>()?;
            GeometryValue::MultiPolygon(polygons)
        }
        "GeometryCollection" => {
            let members = object
                .get("geometries")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    GeoCodecError::MalformedCoordinates(
                        "\"geometries\" must be an array".to_string(),
                    )
                })?;
            let children = members
                .iter()
                .map(|member| convert(member, depth + 1, max_depth))
                .collect::<Result<Vec<_>>>()?;
            // children keep their own dimensionality
            tracker = children.first().map(|child| child.dimension());
            GeometryValue::GeometryCollection(children)
        }
        other => return Err(GeoCodecError::UnsupportedGeoJsonType(other.to_string())),
    };
    Ok(Geometry::new(value, tracker.unwrap_or_default()))
}

fn coordinates(object: &Map<String, Value>) -> Result<&Vec<Value>> {
    object
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GeoCodecError::MalformedCoordinates("\"coordinates\" must be an array".to_string())
        })
}

fn position(value: &Value, tracker: &mut Option<Dimension>) -> Result<Coord> {
    let parts = value.as_array().ok_or_else(|| {
        GeoCodecError::MalformedCoordinates(format!("expected a position, got {value}"))
    })?;
    position_from_parts(parts, tracker)
}

fn position_from_parts(parts: &[Value], tracker: &mut Option<Dimension>) -> Result<Coord> {
    if parts.len() < 2 {
        return Err(GeoCodecError::MalformedCoordinates(format!(
            "a position needs at least two ordinates, got {}",
            Value::Array(parts.to_vec())
        )));
    }
    let ordinates = parts
        .iter()
        .take(3)
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                GeoCodecError::MalformedCoordinates(format!("non-numeric ordinate {v}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let dim = if ordinates.len() == 3 {
        Dimension::Xyz
    } else {
        Dimension::Xy
    };
    match tracker {
        Some(expected) if *expected != dim => {
            return Err(GeoCodecError::MalformedCoordinates(
                "mixed 2D and 3D positions in one geometry".to_string(),
            ))
        }
        Some(_) => {}
        None => *tracker = Some(dim),
    }
    let z = (dim == Dimension::Xyz).then(|| ordinates[2]);
    Ok(Coord::new(ordinates[0], ordinates[1], z, None))
}

fn position_seq(values: &[Value], tracker: &mut Option<Dimension>) -> Result<Vec<Coord>> {
    values.iter().map(|v| position(v, tracker)).collect()
}

fn ring_seq(values: &[Value], tracker: &mut Option<Dimension>) -> Result<Vec<Vec<Coord>>> {
    values
        .iter()
        .map(|ring| {
            let ring = ring.as_array().ok_or_else(|| {
                GeoCodecError::MalformedCoordinates(format!(
                    "expected an array of positions, got {ring}"
                ))
            })?;
            position_seq(ring, tracker)
        })
        .collect()
}
