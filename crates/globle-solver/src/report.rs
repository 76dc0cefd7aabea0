//! JSON and GeoJSON output for a selection

use crate::dataset::CountryDataset;
use crate::geometry::centroid_of;
use crate::selector::{GuessQuery, GuessResult};
use crate::{display_name, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub query: GuessQuery,
    pub result: GuessResult,
    /// Display form of every name in `result`
    pub display_names: Vec<String>,
    pub generated_at: String,
}

impl SelectionReport {
    pub fn new(query: GuessQuery, result: GuessResult) -> Self {
        let display_names = result.names().into_iter().map(display_name).collect();
        Self {
            query,
            result,
            display_names,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Candidate centroids as a FeatureCollection of Points
pub fn to_geojson<D>(result: &GuessResult, dataset: &D) -> Result<FeatureCollection>
where
    D: CountryDataset + ?Sized,
{
    let mut features = Vec::new();
    for name in result.names() {
        let centroid = centroid_of(dataset.lookup(name)?);

        let mut properties = JsonObject::new();
        properties.insert("name".to_string(), JsonValue::from(name));
        properties.insert("display_name".to_string(), JsonValue::from(display_name(name)));

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![
                centroid.longitude,
                centroid.latitude,
            ]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
