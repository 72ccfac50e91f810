//! Lossy conversions between the value model and [`geo`] types.
//!
//! Only the first two dimensions are kept: `geo` is strictly planar, so
//! Z and M ordinates are dropped on the way out and never appear on the
//! way back. SRID is likewise not representable and must be carried by
//! the caller.

use crate::geometry::{Coord, Dimension, Geometry, GeometryValue};

/// Convert to a [`geo::Geometry`], keeping only X and Y.
///
/// Returns `None` for the EMPTY point and for the curve/surface kinds
/// `geo` has no counterpart for.
pub fn to_geo(geometry: &Geometry) -> Option<geo::Geometry> {
    match geometry.value() {
        GeometryValue::Point(Some(coord)) => Some(geo::Geometry::Point(point_to_geo(coord))),
        GeometryValue::Point(None) => None,
        GeometryValue::LineString(coords) => {
            Some(geo::Geometry::LineString(line_string_to_geo(coords)))
        }
        GeometryValue::Polygon(rings) => Some(geo::Geometry::Polygon(polygon_to_geo(rings))),
        GeometryValue::MultiPoint(coords) => Some(geo::Geometry::MultiPoint(geo::MultiPoint(
            coords.iter().map(point_to_geo).collect(),
        ))),
        GeometryValue::MultiLineString(lines) => {
            Some(geo::Geometry::MultiLineString(geo::MultiLineString(
                lines.iter().map(|coords| line_string_to_geo(coords)).collect(),
            )))
        }
        GeometryValue::MultiPolygon(polygons) => {
            Some(geo::Geometry::MultiPolygon(geo::MultiPolygon(
                polygons.iter().map(|rings| polygon_to_geo(rings)).collect(),
            )))
        }
        GeometryValue::GeometryCollection(children) => {
            let children: Option<Vec<_>> = children.iter().map(to_geo).collect();
            Some(geo::Geometry::GeometryCollection(geo::GeometryCollection(
                children?,
            )))
        }
        _ => None,
    }
}

/// Convert from a [`geo::Geometry`]; the result is always plain XY with
/// no SRID.
pub fn from_geo(geometry: &geo::Geometry) -> Geometry {
    let value = match geometry {
        geo::Geometry::Point(point) => GeometryValue::Point(Some(coord_from_geo(&point.0))),
        geo::Geometry::Line(line) => GeometryValue::LineString(vec![
            coord_from_geo(&line.start),
            coord_from_geo(&line.end),
        ]),
        geo::Geometry::LineString(line) => GeometryValue::LineString(line_string_from_geo(line)),
        geo::Geometry::Polygon(polygon) => GeometryValue::Polygon(polygon_from_geo(polygon)),
        geo::Geometry::MultiPoint(points) => {
            GeometryValue::MultiPoint(points.0.iter().map(|p| coord_from_geo(&p.0)).collect())
        }
        geo::Geometry::MultiLineString(lines) => {
            GeometryValue::MultiLineString(lines.0.iter().map(line_string_from_geo).collect())
        }
        geo::Geometry::MultiPolygon(polygons) => {
            GeometryValue::MultiPolygon(polygons.0.iter().map(polygon_from_geo).collect())
        }
        geo::Geometry::GeometryCollection(children) => {
            GeometryValue::GeometryCollection(children.0.iter().map(from_geo).collect())
        }
        geo::Geometry::Rect(rect) => GeometryValue::Polygon(polygon_from_geo(&rect.to_polygon())),
        geo::Geometry::Triangle(triangle) => {
            GeometryValue::Polygon(polygon_from_geo(&triangle.to_polygon()))
        }
    };
    Geometry::new(value, Dimension::Xy)
}

fn point_to_geo(coord: &Coord) -> geo::Point {
    geo::Point::new(coord.x, coord.y)
}

fn line_string_to_geo(coords: &[Coord]) -> geo::LineString {
    geo::LineString::new(
        coords
            .iter()
            .map(|c| geo::Coord { x: c.x, y: c.y })
            .collect(),
    )
}

fn polygon_to_geo(rings: &[Vec<Coord>]) -> geo::Polygon {
    let mut rings = rings.iter();
    let exterior = rings
        .next()
        .map(|ring| line_string_to_geo(ring))
        .unwrap_or_else(|| geo::LineString::new(vec![]));
    geo::Polygon::new(exterior, rings.map(|ring| line_string_to_geo(ring)).collect())
}

fn coord_from_geo(coord: &geo::Coord) -> Coord {
    Coord::xy(coord.x, coord.y)
}

fn line_string_from_geo(line: &geo::LineString) -> Vec<Coord> {
    line.0.iter().map(coord_from_geo).collect()
}

fn polygon_from_geo(polygon: &geo::Polygon) -> Vec<Vec<Coord>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors().iter())
        .map(line_string_from_geo)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::wkt::{parse_wkt, write_wkt};

    #[test]
    fn round_trip_through_geo() {
        for wkt in [
            "POINT(30 10)",
            "LINESTRING(30 10,10 30,40 40)",
            "POLYGON((35 10,45 45,15 40,10 20,35 10),(20 30,35 35,30 20,20 30))",
            "MULTIPOINT(10 40,40 30)",
            "MULTIPOLYGON(((0 0,4 0,4 4,0 0)))",
            "GEOMETRYCOLLECTION(POINT(4 6),LINESTRING(4 6,7 10))",
        ] {
            let geom = parse_wkt(wkt).unwrap();
            let back = from_geo(&to_geo(&geom).unwrap());
            assert_eq!(back, geom, "geo round trip changed {wkt:?}");
        }
    }

    #[test]
    fn z_is_dropped() {
        let geom = parse_wkt("POINTZ(1 2 3)").unwrap();
        let back = from_geo(&to_geo(&geom).unwrap());
        assert_eq!(write_wkt(&back), "POINT(1 2)");
    }

    #[test]
    fn unrepresentable_kinds() {
        assert!(to_geo(&parse_wkt("POINT EMPTY").unwrap()).is_none());
        assert!(to_geo(&parse_wkt("CIRCULARSTRING(0 0,1 1,1 0)").unwrap()).is_none());
    }

    #[test]
    fn geo_rect_and_triangle_become_polygons() {
        let rect = geo::Geometry::Rect(geo::Rect::new(
            geo::Coord { x: 0.0, y: 0.0 },
            geo::Coord { x: 2.0, y: 1.0 },
        ));
        let geom = from_geo(&rect);
        assert!(matches!(geom.value(), GeometryValue::Polygon(_)));
    }
}
