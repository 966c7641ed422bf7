extern crate vidi_shp_import;

use std::io::{Cursor, Write};
use vidi_shp_import::decoder::{ShapeDecoder, ShpDecoder};
use vidi_shp_import::host::{CollectingHost, Notifier, ToastOptions};
use vidi_shp_import::format::format_area;
use vidi_shp_import::i18n::Locale;
use vidi_shp_import::items::GeometryKind;
use vidi_shp_import::measure::{polygon_area, AreaMode};
use vidi_shp_import::{import, ImportConfig, ImportError, Importer};
use zip::write::FileOptions;
use zip::ZipWriter;

const POINT: i32 = 1;
const POLYLINE: i32 = 3;
const POLYGON: i32 = 5;

#[derive(Default)]
struct Toasts(Vec<String>);

impl Notifier for Toasts {
    fn show_info_toast(&mut self, html: &str, _options: &ToastOptions) {
        self.0.push(html.to_string());
    }
}

/// Encode shape records (already serialized without the shape type) into a
/// `.shp` file of the given type.
fn create_shp(shape_type: i32, records: &[Vec<u8>]) -> Vec<u8> {
    let body_len: usize = records.iter().map(|content| 8 + 4 + content.len()).sum();
    let file_len = 100 + body_len;

    let mut out = Vec::with_capacity(file_len);
    out.extend_from_slice(&9994i32.to_be_bytes());
    for _ in 0..5 {
        out.extend_from_slice(&0i32.to_be_bytes());
    }
    out.extend_from_slice(&((file_len / 2) as i32).to_be_bytes());
    out.extend_from_slice(&1000i32.to_le_bytes());
    out.extend_from_slice(&shape_type.to_le_bytes());
    for _ in 0..8 {
        out.extend_from_slice(&0f64.to_le_bytes());
    }

    for (idx, content) in records.iter().enumerate() {
        out.extend_from_slice(&(idx as i32 + 1).to_be_bytes());
        out.extend_from_slice(&(((4 + content.len()) / 2) as i32).to_be_bytes());
        out.extend_from_slice(&shape_type.to_le_bytes());
        out.extend_from_slice(content);
    }
    out
}

fn point_record(x: f64, y: f64) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&x.to_le_bytes());
    out.extend_from_slice(&y.to_le_bytes());
    out
}

/// Polyline and polygon records share one layout.
fn parts_record(parts: &[Vec<(f64, f64)>]) -> Vec<u8> {
    let points: Vec<&(f64, f64)> = parts.iter().flatten().collect();
    let xs = points.iter().map(|p| p.0);
    let ys = points.iter().map(|p| p.1);
    let bbox = [
        xs.clone().fold(f64::INFINITY, f64::min),
        ys.clone().fold(f64::INFINITY, f64::min),
        xs.fold(f64::NEG_INFINITY, f64::max),
        ys.fold(f64::NEG_INFINITY, f64::max),
    ];

    let mut out = Vec::new();
    for value in bbox.iter() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&(parts.len() as i32).to_le_bytes());
    out.extend_from_slice(&(points.len() as i32).to_le_bytes());
    let mut offset = 0i32;
    for part in parts {
        out.extend_from_slice(&offset.to_le_bytes());
        offset += part.len() as i32;
    }
    for (x, y) in points {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
    }
    out
}

/// dBase III table with one character and one numeric column.
fn create_dbf(rows: &[(&str, f64)]) -> Vec<u8> {
    let fields: [(&str, u8, u8, u8); 2] = [("NAME", b'C', 10, 0), ("DEPTH", b'N', 8, 2)];
    let record_len: u16 = 1 + fields.iter().map(|f| u16::from(f.2)).sum::<u16>();
    let header_len: u16 = 32 + 32 * fields.len() as u16 + 1;

    let mut out = vec![0x03, 121, 1, 1];
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    out.extend_from_slice(&header_len.to_le_bytes());
    out.extend_from_slice(&record_len.to_le_bytes());
    out.extend_from_slice(&[0u8; 20]);
    for (name, kind, len, decimals) in fields.iter() {
        let mut field_name = [0u8; 11];
        field_name[..name.len()].copy_from_slice(name.as_bytes());
        out.extend_from_slice(&field_name);
        out.push(*kind);
        out.extend_from_slice(&[0u8; 4]);
        out.push(*len);
        out.push(*decimals);
        out.extend_from_slice(&[0u8; 14]);
    }
    out.push(0x0D);
    for (name, depth) in rows {
        out.push(b' ');
        out.extend_from_slice(format!("{:<10}", name).as_bytes());
        out.extend_from_slice(format!("{:>8.2}", depth).as_bytes());
    }
    out.push(0x1A);
    out
}

fn create_zip(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn run(zip: Vec<u8>) -> (Result<usize, ImportError>, CollectingHost, Toasts) {
    let importer = Importer::new(ShpDecoder, ImportConfig::default());
    let mut host = CollectingHost::default();
    let mut toasts = Toasts::default();
    let result = importer
        .run("upload.zip", Cursor::new(zip), &mut host, &mut toasts)
        .map(|summary| summary.features_committed);
    (result, host, toasts)
}

#[test]
fn points_with_attributes() {
    let shp = create_shp(
        POINT,
        &[point_record(12.57, 55.68), point_record(10.2, 56.15)],
    );
    let dbf = create_dbf(&[("Well A", 12.5), ("Well B", 3.0)]);
    let zip = create_zip(&[("wells.shp", shp), ("wells.dbf", dbf)]);

    let (result, host, toasts) = run(zip);
    assert_eq!(result.unwrap(), 2);
    assert!(toasts.0.is_empty());
    assert_eq!(host.updates, 1);

    let layer = &host.layers[0];
    assert_eq!(layer.layer_type, GeometryKind::Marker);
    let properties = layer.feature.properties.as_ref().unwrap();
    assert_eq!(properties["type"], "marker");
    assert_eq!(properties["NAME"], "Well A");
    assert_eq!(properties["DEPTH"].as_f64(), Some(12.5));
}

#[test]
fn polylines_are_split_into_parts() {
    let parts = vec![
        vec![(12.50, 55.60), (12.60, 55.70)],
        vec![(12.70, 55.70), (12.80, 55.75), (12.90, 55.80)],
    ];
    let shp = create_shp(POLYLINE, &[parts_record(&parts)]);
    let zip = create_zip(&[("paths/paths.shp", shp)]);

    let (result, host, _) = run(zip);
    assert_eq!(result.unwrap(), 2);
    for layer in host.layers.iter() {
        assert_eq!(layer.layer_type, GeometryKind::Polyline);
        let properties = layer.feature.properties.as_ref().unwrap();
        assert!(properties["distance"].as_str().unwrap().ends_with(" km"));
    }
}

#[test]
fn polygon_gets_area() {
    // clockwise, as shapefiles store outer rings
    let ring = vec![
        (12.0, 55.0),
        (12.0, 55.01),
        (12.01, 55.01),
        (12.01, 55.0),
        (12.0, 55.0),
    ];
    let shp = create_shp(POLYGON, &[parts_record(&[ring])]);
    let zip = create_zip(&[("Parcels.SHP", shp)]);

    let (result, host, _) = run(zip);
    assert_eq!(result.unwrap(), 1);
    let layer = &host.layers[0];
    assert_eq!(layer.layer_type, GeometryKind::Polygon);
    let properties = layer.feature.properties.as_ref().unwrap();
    assert!(properties["area"].as_str().unwrap().ends_with(" ha"));
}

#[test]
fn polygon_hole_is_subtracted() {
    let outer = vec![
        (12.0, 55.0),
        (12.0, 55.02),
        (12.02, 55.02),
        (12.02, 55.0),
        (12.0, 55.0),
    ];
    // counter-clockwise, so it belongs to the ring before it
    let hole = vec![
        (12.005, 55.005),
        (12.015, 55.005),
        (12.015, 55.015),
        (12.005, 55.015),
        (12.005, 55.005),
    ];
    let rings: Vec<Vec<Vec<f64>>> = [&outer, &hole]
        .iter()
        .map(|ring| ring.iter().map(|(x, y)| vec![*x, *y]).collect())
        .collect();
    let shp = create_shp(POLYGON, &[parts_record(&[outer, hole])]);
    let zip = create_zip(&[("lake.shp", shp)]);

    let mut config = ImportConfig::default();
    config.display.area_mode = AreaMode::SubtractHoles;
    let importer = Importer::new(ShpDecoder, config);
    let mut host = CollectingHost::default();
    let result = importer.run("lake.zip", Cursor::new(zip), &mut host, &mut Toasts::default());
    assert_eq!(result.unwrap().features_committed, 1);

    let properties = host.layers[0].feature.properties.as_ref().unwrap();
    let net = polygon_area(&rings, AreaMode::SubtractHoles);
    assert!(net > 2_000_000. && net < 2_200_000., "net area was {}", net);
    assert_eq!(properties["area"], format_area(net, Locale::EnUs));
}

#[test]
fn one_collection_per_shapefile() {
    let wells = create_shp(POINT, &[point_record(12.57, 55.68)]);
    let more = create_shp(POINT, &[point_record(9.9, 57.0), point_record(9.8, 57.1)]);
    let zip = create_zip(&[("a.shp", wells), ("b.shp", more)]);

    let bytes = zip.clone();
    let collections = ShpDecoder.decode(&bytes).unwrap();
    let names: Vec<&str> = collections.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let (result, _, _) = run(zip);
    assert_eq!(result.unwrap(), 3);
}

#[test]
fn too_many_points() {
    let records: Vec<Vec<u8>> = (0..201)
        .map(|idx| point_record(12. + idx as f64 * 0.001, 55.))
        .collect();
    let zip = create_zip(&[("trees.shp", create_shp(POINT, &records))]);

    let (result, host, toasts) = run(zip);
    assert!(matches!(
        result,
        Err(ImportError::TooManyFeatures {
            count: 201,
            limit: 200
        })
    ));
    assert!(host.layers.is_empty());
    assert_eq!(toasts.0, vec!["Too many features (201). Max is 200"]);
}

#[test]
fn corrupt_shapefile() {
    let zip = create_zip(&[("broken.shp", b"not a shapefile".to_vec())]);
    let (result, host, toasts) = run(zip);
    assert!(matches!(result, Err(ImportError::Decode(_))));
    assert!(host.layers.is_empty());
    assert_eq!(toasts.0, vec!["Could not parse the shapefile"]);
}

#[test]
fn import_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wells.zip");
    let shp = create_shp(POINT, &[point_record(12.57, 55.68)]);
    std::fs::write(&path, create_zip(&[("wells.shp", shp)])).unwrap();

    let layers = import(&path, ImportConfig::default()).unwrap();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].layer_type, GeometryKind::Marker);

    let missing = dir.path().join("missing.zip");
    assert!(matches!(
        import(&missing, ImportConfig::default()),
        Err(ImportError::Open { .. })
    ));
    let wrong = dir.path().join("wells.shp");
    assert!(matches!(
        import(&wrong, ImportConfig::default()),
        Err(ImportError::NotZip { .. })
    ));
}
