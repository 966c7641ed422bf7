use geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Marker,
    Polyline,
    Polygon,
}

impl GeometryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Marker => "marker",
            GeometryKind::Polyline => "polyline",
            GeometryKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shapefile decoded from an uploaded archive.
#[derive(Clone, Debug)]
pub struct NamedCollection {
    pub name: String,
    pub collection: FeatureCollection,
}

impl NamedCollection {
    pub fn new(name: &str, features: Vec<Feature>) -> Self {
        NamedCollection {
            name: name.into(),
            collection: FeatureCollection {
                bbox: None,
                features,
                foreign_members: None,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawLayer {
    pub feature: Feature,
    pub layer_type: GeometryKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawEvent {
    Created(DrawLayer),
    Updated,
}

impl DrawEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DrawEvent::Created(_) => "draw:created",
            DrawEvent::Updated => "draw:update",
        }
    }
}
