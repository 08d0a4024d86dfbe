use std::path::{Path, PathBuf};

use anyhow::Result;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use kml::Placemark;

use crate::overlays::OverlayRecord;

pub const CONSOLIDATED_FILENAME: &str = "consolidated_data.geojson";

/// Placemarks become points and overlays become the rectangle they cover.
pub fn to_features(records: &[OverlayRecord], placemarks: &[Placemark]) -> Vec<Feature> {
    let mut features = Vec::new();
    for placemark in placemarks {
        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), json!(placemark.name));
        features.push(feature(
            Value::Point(vec![placemark.pt.longitude, placemark.pt.latitude]),
            properties,
        ));
    }
    for record in records {
        let (s, w, n, e) = (record.south(), record.west(), record.north(), record.east());
        let ring = vec![
            vec![w, s],
            vec![e, s],
            vec![e, n],
            vec![w, n],
            vec![w, s],
        ];
        let mut properties = JsonObject::new();
        properties.insert("key".to_string(), json!(record.key));
        properties.insert("imageUrl".to_string(), json!(record.image_url));
        features.push(feature(Value::Polygon(vec![ring]), properties));
    }
    features
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Overwrites `extract_to/consolidated_data.geojson` with the features of every folder in this
/// run. Nothing from earlier runs is kept.
pub fn write(extract_to: &Path, features: Vec<Feature>) -> Result<PathBuf> {
    let path = extract_to.join(CONSOLIDATED_FILENAME);
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    kmzutil::write_json(&path, &collection)?;
    Ok(path)
}
