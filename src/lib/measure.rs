use super::error::MeasureError;
use super::format::{format_area, readable_distance};
use super::i18n::Locale;
use geo::orient::{Direction, Orient};
use geo::{GeodesicArea, GeodesicDistance};
use geo_types::{Coord, LineString, Point, Polygon};
use geojson::{Feature, Value};
use itertools::Itertools;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AreaMode {
    /// Area of the exterior ring only; holes are not subtracted.
    #[default]
    OuterRing,
    SubtractHoles,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DisplayConfig {
    pub locale: Locale,
    pub area_mode: AreaMode,
}

fn to_point(position: &[f64]) -> Option<Point<f64>> {
    match position {
        [lon, lat, ..] => Some(Point::new(*lon, *lat)),
        _ => None,
    }
}

pub(crate) fn geometry_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Length in metres along consecutive `[lon, lat]` positions on the WGS84
/// ellipsoid.
pub fn line_length(positions: &[Vec<f64>]) -> f64 {
    positions
        .iter()
        .filter_map(|position| to_point(position))
        .tuple_windows()
        .map(|(a, b)| a.geodesic_distance(&b))
        .sum()
}

/// Unsigned geodesic area of a single ring in square metres.
pub fn ring_area(ring: &[Vec<f64>]) -> f64 {
    let coords: Vec<Coord<f64>> = ring
        .iter()
        .filter_map(|position| to_point(position))
        .map(Coord::from)
        .collect();
    let open = match coords.split_last() {
        Some((last, rest)) if coords.len() > 1 && coords[0] == *last => rest,
        _ => &coords[..],
    };
    if open.iter().dedup().count() < 3 {
        return 0.;
    }
    // the unsigned geodesic area of a clockwise ring is its complement on the globe
    let polygon = Polygon::new(LineString::from(coords), vec![]).orient(Direction::Default);
    polygon.geodesic_area_unsigned()
}

pub fn polygon_area(rings: &[Vec<Vec<f64>>], mode: AreaMode) -> f64 {
    let (outer, holes) = match rings.split_first() {
        Some(split) => split,
        None => return 0.,
    };
    let area = ring_area(outer);
    match mode {
        AreaMode::OuterRing => area,
        AreaMode::SubtractHoles => {
            let holes: f64 = holes.iter().map(|hole| ring_area(hole)).sum();
            (area - holes).max(0.)
        }
    }
}

fn geometry_value(feature: &Feature) -> Result<&Value, MeasureError> {
    feature
        .geometry
        .as_ref()
        .map(|geometry| &geometry.value)
        .ok_or(MeasureError::MissingGeometry)
}

pub fn distance_of(feature: &Feature, config: &DisplayConfig) -> Result<String, MeasureError> {
    match geometry_value(feature)? {
        Value::LineString(positions) => Ok(readable_distance(
            line_length(positions),
            config.locale,
        )),
        other => Err(MeasureError::WrongGeometry {
            expected: "LineString",
            found: geometry_name(other),
        }),
    }
}

pub fn area_of(feature: &Feature, config: &DisplayConfig) -> Result<String, MeasureError> {
    match geometry_value(feature)? {
        Value::Polygon(rings) => Ok(format_area(
            polygon_area(rings, config.area_mode),
            config.locale,
        )),
        other => Err(MeasureError::WrongGeometry {
            expected: "Polygon",
            found: geometry_name(other),
        }),
    }
}
