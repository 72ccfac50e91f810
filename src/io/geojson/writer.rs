use serde_json::{json, Value};

use crate::error::{GeoCodecError, Result};
use crate::geometry::{Coord, Geometry, GeometryValue};

/// Convert a [`Geometry`] to a GeoJSON geometry object.
///
/// `planar` strips every position to its first two ordinates for
/// contexts that require strictly planar output; it is caller-selected,
/// never automatic. In the default mode a Z ordinate is emitted
/// positionally and an M ordinate is always dropped.
///
/// The curve and surface kinds have no RFC 7946 representation and fail
/// with [`GeoCodecError::UnsupportedGeoJsonType`].
pub fn to_geojson(geometry: &Geometry, planar: bool) -> Result<Value> {
    let type_id = geometry
        .geometry_type()
        .geojson_id()
        .ok_or_else(|| {
            GeoCodecError::UnsupportedGeoJsonType(geometry.geometry_type().to_string())
        })?;

    let value = match geometry.value() {
        GeometryValue::Point(None) => json!({ "type": type_id, "coordinates": [] }),
        GeometryValue::Point(Some(coord)) => {
            json!({ "type": type_id, "coordinates": position(coord, planar) })
        }
        GeometryValue::LineString(coords) | GeometryValue::MultiPoint(coords) => {
            json!({ "type": type_id, "coordinates": position_seq(coords, planar) })
        }
        GeometryValue::Polygon(rings) | GeometryValue::MultiLineString(rings) => {
            json!({ "type": type_id, "coordinates": ring_seq(rings, planar) })
        }
        GeometryValue::MultiPolygon(polygons) => {
            let polygons: Vec<Value> = polygons
                .iter()
                .map(|rings| Value::Array(ring_seq(rings, planar)))
                .collect();
            json!({ "type": type_id, "coordinates": polygons })
        }
        GeometryValue::GeometryCollection(children) => {
            let children: Vec<Value> = children
                .iter()
                .map(|child| to_geojson(child, planar))
                .collect::<Result<_>>()?;
            json!({ "type": type_id, "geometries": children })
        }
        // geojson_id() returned None for every other kind
        _ => unreachable!("kind checked above"),
    };
    Ok(value)
}

fn position(coord: &Coord, planar: bool) -> Value {
    match coord.z {
        Some(z) if !planar => json!([coord.x, coord.y, z]),
        _ => json!([coord.x, coord.y]),
    }
}

fn position_seq(coords: &[Coord], planar: bool) -> Vec<Value> {
    coords.iter().map(|c| position(c, planar)).collect()
}

fn ring_seq(rings: &[Vec<Coord>], planar: bool) -> Vec<Value> {
    rings
        .iter()
        .map(|ring| Value::Array(position_seq(ring, planar)))
        .collect()
}
