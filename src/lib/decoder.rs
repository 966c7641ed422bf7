use super::archive::is_shapefile_entry;
use super::error::DecodeError;
use super::items::NamedCollection;
use geo::Winding;
use geo_types::{Coord, LineString};
use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};
use shapefile::dbase::{self, FieldValue};
use shapefile::{Point, PointM, PointZ, Shape, ShapeReader};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Turns an in-memory zip archive into one feature collection per shapefile.
pub trait ShapeDecoder {
    fn decode(&self, archive: &[u8]) -> Result<Vec<NamedCollection>, DecodeError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ShpDecoder;

trait Position {
    fn position(&self) -> Vec<f64>;
}

impl Position for Point {
    fn position(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }
}

impl Position for PointM {
    fn position(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }
}

impl Position for PointZ {
    fn position(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z]
    }
}

fn positions<P: Position>(points: &[P]) -> Vec<Vec<f64>> {
    points.iter().map(Position::position).collect()
}

fn multi_point_value(points: Vec<Vec<f64>>) -> Value {
    match points.len() {
        1 => Value::Point(points.into_iter().flatten().collect()),
        _ => Value::MultiPoint(points),
    }
}

fn line_value(mut parts: Vec<Vec<Vec<f64>>>) -> Value {
    match parts.len() {
        1 => Value::LineString(parts.remove(0)),
        _ => Value::MultiLineString(parts),
    }
}

/// Shapefile outer rings run clockwise, holes counter-clockwise.
fn is_clockwise(ring: &[Vec<f64>]) -> bool {
    let line: LineString<f64> = ring
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coord {
            x: position[0],
            y: position[1],
        })
        .collect();
    line.is_cw()
}

fn polygon_value(rings: Vec<Vec<Vec<f64>>>) -> Value {
    let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = vec![];
    for ring in rings {
        match polygons.last_mut() {
            Some(polygon) if !is_clockwise(&ring) => polygon.push(ring),
            _ => polygons.push(vec![ring]),
        }
    }
    match polygons.len() {
        1 => Value::Polygon(polygons.remove(0)),
        _ => Value::MultiPolygon(polygons),
    }
}

fn shape_value(shape: Shape, name: &str) -> Result<Option<Value>, DecodeError> {
    let value = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(point) => Value::Point(point.position()),
        Shape::PointM(point) => Value::Point(point.position()),
        Shape::PointZ(point) => Value::Point(point.position()),
        Shape::Multipoint(multi) => multi_point_value(positions(multi.points())),
        Shape::MultipointM(multi) => multi_point_value(positions(multi.points())),
        Shape::MultipointZ(multi) => multi_point_value(positions(multi.points())),
        Shape::Polyline(line) => line_value(line.parts().iter().map(|p| positions(p)).collect()),
        Shape::PolylineM(line) => line_value(line.parts().iter().map(|p| positions(p)).collect()),
        Shape::PolylineZ(line) => line_value(line.parts().iter().map(|p| positions(p)).collect()),
        Shape::Polygon(polygon) => polygon_value(
            polygon
                .rings()
                .iter()
                .map(|ring| positions(ring.points()))
                .collect(),
        ),
        Shape::PolygonM(polygon) => polygon_value(
            polygon
                .rings()
                .iter()
                .map(|ring| positions(ring.points()))
                .collect(),
        ),
        Shape::PolygonZ(polygon) => polygon_value(
            polygon
                .rings()
                .iter()
                .map(|ring| positions(ring.points()))
                .collect(),
        ),
        Shape::Multipatch(_) => {
            return Err(DecodeError::Unsupported {
                name: name.into(),
                shape: "Multipatch".into(),
            })
        }
    };
    Ok(Some(value))
}

fn field_value(value: FieldValue) -> JsonValue {
    match value {
        FieldValue::Character(Some(text)) => JsonValue::from(text.trim()),
        FieldValue::Numeric(Some(number)) => JsonValue::from(number),
        FieldValue::Float(Some(number)) => JsonValue::from(f64::from(number)),
        FieldValue::Logical(Some(flag)) => JsonValue::from(flag),
        FieldValue::Integer(number) => JsonValue::from(number),
        FieldValue::Double(number) => JsonValue::from(number),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None) => JsonValue::Null,
        other => JsonValue::from(format!("{:?}", other)),
    }
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, DecodeError> {
    let mut entry = archive.by_name(name)?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn read_records(bytes: Vec<u8>, name: &str) -> Result<Vec<JsonObject>, DecodeError> {
    let to_error = |source| DecodeError::Dbase {
        name: name.into(),
        source,
    };
    let mut reader = dbase::Reader::new(Cursor::new(bytes)).map_err(to_error)?;
    let records = reader.read().map_err(to_error)?;
    let properties = records
        .into_iter()
        .map(|record| {
            let fields: HashMap<String, FieldValue> = record.into();
            fields
                .into_iter()
                .map(|(key, value)| (key, field_value(value)))
                .collect()
        })
        .collect();
    Ok(properties)
}

fn read_shapes(bytes: Vec<u8>, name: &str) -> Result<Vec<Shape>, DecodeError> {
    let to_error = |source| DecodeError::Shapefile {
        name: name.into(),
        source,
    };
    let reader = ShapeReader::new(Cursor::new(bytes)).map_err(to_error)?;
    reader.read().map_err(to_error)
}

fn is_projected(prj: &[u8]) -> bool {
    String::from_utf8_lossy(prj)
        .trim_start()
        .to_ascii_uppercase()
        .starts_with("PROJCS")
}

/// Entry name of the file that accompanies `shp_name`, e.g. the `.dbf` next
/// to a `.shp`, matched case-insensitively.
fn sibling<'a>(entries: &'a HashMap<String, String>, shp_name: &str, extension: &str) -> Option<&'a str> {
    let stem = &shp_name[..shp_name.len() - ".shp".len()];
    let key = format!("{}.{}", stem, extension).to_lowercase();
    entries.get(&key).map(String::as_str)
}

fn collection_name(shp_name: &str) -> String {
    Path::new(shp_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| shp_name.into())
}

impl ShpDecoder {
    fn decode_entry<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        entries: &HashMap<String, String>,
        shp_name: &str,
    ) -> Result<NamedCollection, DecodeError> {
        let name = collection_name(shp_name);
        let shapes = read_shapes(read_entry(archive, shp_name)?, &name)?;

        let mut records = match sibling(entries, shp_name, "dbf") {
            Some(dbf_name) => read_records(read_entry(archive, dbf_name)?, &name)?,
            None => {
                debug!("{} has no attribute table", name);
                vec![]
            }
        };
        if !records.is_empty() && records.len() != shapes.len() {
            warn!(
                "{}: {} shapes but {} attribute records",
                name,
                shapes.len(),
                records.len()
            );
        }

        if let Some(prj_name) = sibling(entries, shp_name, "prj") {
            if is_projected(&read_entry(archive, prj_name)?) {
                warn!("{} uses a projected CRS, coordinates are passed through as is", name);
            }
        }

        records.resize_with(shapes.len(), JsonObject::new);
        let features = shapes
            .into_iter()
            .zip(records)
            .map(|(shape, properties)| {
                let geometry = shape_value(shape, &name)?.map(Geometry::new);
                Ok(Feature {
                    bbox: None,
                    geometry,
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;

        debug!("decoded {} features from {}", features.len(), shp_name);
        Ok(NamedCollection::new(&name, features))
    }
}

impl ShapeDecoder for ShpDecoder {
    fn decode(&self, archive: &[u8]) -> Result<Vec<NamedCollection>, DecodeError> {
        let mut archive = ZipArchive::new(Cursor::new(archive))?;
        let entries: HashMap<String, String> = archive
            .file_names()
            .map(|name| (name.to_lowercase(), name.to_string()))
            .collect();
        let mut shp_names: Vec<String> = entries
            .values()
            .filter(|name| is_shapefile_entry(name))
            .cloned()
            .collect();
        shp_names.sort();

        shp_names
            .iter()
            .map(|shp_name| self.decode_entry(&mut archive, &entries, shp_name))
            .collect()
    }
}
