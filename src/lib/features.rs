use super::error::MeasureError;
use super::items::{DrawLayer, GeometryKind};
use super::measure::{area_of, distance_of, geometry_name, DisplayConfig};
use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};
use tracing::warn;

pub const TYPE_PROPERTY: &str = "type";
pub const DISTANCE_PROPERTY: &str = "distance";
pub const AREA_PROPERTY: &str = "area";

pub fn classify(value: &Value) -> Option<GeometryKind> {
    match value {
        Value::Point(_) => Some(GeometryKind::Marker),
        Value::LineString(_) => Some(GeometryKind::Polyline),
        Value::Polygon(_) => Some(GeometryKind::Polygon),
        _ => None,
    }
}

fn with_geometry(feature: &Feature, value: Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: feature.id.clone(),
        properties: feature.properties.clone(),
        foreign_members: feature.foreign_members.clone(),
    }
}

/// Split multi-part geometries into one feature per part. Every part keeps a
/// copy of the original properties.
pub fn explode(feature: Feature) -> Vec<Feature> {
    let value = match &feature.geometry {
        Some(geometry) => &geometry.value,
        None => {
            warn!("dropping feature without geometry");
            return vec![];
        }
    };
    if classify(value).is_some() {
        return vec![feature];
    }
    match value {
        Value::MultiPoint(points) => points
            .iter()
            .map(|point| with_geometry(&feature, Value::Point(point.clone())))
            .collect(),
        Value::MultiLineString(lines) => lines
            .iter()
            .map(|line| with_geometry(&feature, Value::LineString(line.clone())))
            .collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|polygon| with_geometry(&feature, Value::Polygon(polygon.clone())))
            .collect(),
        other => {
            warn!("dropping feature with unsupported {}", geometry_name(other));
            vec![]
        }
    }
}

/// Tag a single-part feature with its layer type and its display measure.
/// The geometry is left as it is.
pub fn enrich(mut feature: Feature, config: &DisplayConfig) -> Result<DrawLayer, MeasureError> {
    let value = feature
        .geometry
        .as_ref()
        .map(|geometry| &geometry.value)
        .ok_or(MeasureError::MissingGeometry)?;
    let kind = classify(value).ok_or_else(|| MeasureError::WrongGeometry {
        expected: "Point, LineString or Polygon",
        found: geometry_name(value),
    })?;

    let measure = match kind {
        GeometryKind::Marker => None,
        GeometryKind::Polyline => Some((DISTANCE_PROPERTY, distance_of(&feature, config)?)),
        GeometryKind::Polygon => Some((AREA_PROPERTY, area_of(&feature, config)?)),
    };

    let properties = feature.properties.get_or_insert_with(JsonObject::new);
    properties.insert(TYPE_PROPERTY.into(), JsonValue::from(kind.as_str()));
    if let Some((key, text)) = measure {
        properties.insert(key.into(), JsonValue::from(text));
    }

    Ok(DrawLayer {
        feature,
        layer_type: kind,
    })
}
