use super::decoder::ShapeDecoder;
use super::error::DecodeError;
use super::host::{Notifier, ToastOptions};
use super::items::NamedCollection;
use geojson::{Feature, Geometry, Value};
use serde_json::Value as JsonValue;
use std::cell::Cell;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

pub fn create_feature(value: Value, properties: JsonValue) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: properties.as_object().cloned(),
        foreign_members: None,
    }
}

pub fn create_points(count: usize) -> Vec<Feature> {
    (0..count)
        .map(|idx| {
            let lon = 10. + idx as f64 * 0.001;
            create_feature(Value::Point(vec![lon, 55.]), serde_json::json!({ "idx": idx }))
        })
        .collect()
}

/// Zip archive holding the given entries, stored uncompressed.
pub fn create_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Decoder stand-in that returns canned collections and counts its calls.
pub struct FakeDecoder {
    collections: Vec<NamedCollection>,
    pub calls: Cell<usize>,
}

impl FakeDecoder {
    pub fn new(collections: Vec<NamedCollection>) -> Self {
        FakeDecoder {
            collections,
            calls: Cell::new(0),
        }
    }
}

impl ShapeDecoder for FakeDecoder {
    fn decode(&self, _archive: &[u8]) -> Result<Vec<NamedCollection>, DecodeError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.collections.clone())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub toasts: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn show_info_toast(&mut self, html: &str, _options: &ToastOptions) {
        self.toasts.push(html.into());
    }
}
