//! Dataset loading from GeoJSON country files

use crate::dataset::{CountryEntry, Dataset};
use crate::geometry::Shape;
use crate::{Result, SolverError};
use geo::{CoordsIter, Geometry, MultiPolygon};
use geojson::{Feature, GeoJson};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Feature properties holding the country name, tried in order
    pub name_properties: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            name_properties: vec!["name".to_string(), "NAME".to_string()],
        }
    }
}

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

fn feature_name<'a>(feature: &'a Feature, config: &LoaderConfig) -> Option<&'a str> {
    config
        .name_properties
        .iter()
        .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
}

/// Keep only the areal parts of a geometry
fn to_multi_polygon(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        Geometry::MultiPolygon(mp) => Some(mp),
        Geometry::GeometryCollection(gc) => {
            let polys: Vec<_> = gc
                .into_iter()
                .filter_map(to_multi_polygon)
                .flat_map(|mp| mp.0)
                .collect();
            (!polys.is_empty()).then(|| MultiPolygon(polys))
        }
        _ => None,
    }
}

fn feature_shape(feature: Feature, name: &str) -> Result<Shape> {
    let geometry = feature
        .geometry
        .ok_or_else(|| SolverError::EmptyGeometry(name.to_string()))?;
    let geometry = Geometry::<f64>::try_from(geometry)?;
    let polygons = to_multi_polygon(geometry).ok_or_else(|| {
        SolverError::InvalidGeometry(name.to_string(), "not a polygon".to_string())
    })?;

    if !polygons
        .coords_iter()
        .all(|c| is_valid_longitude(c.x) && is_valid_latitude(c.y))
    {
        return Err(SolverError::InvalidGeometry(
            name.to_string(),
            "coordinates out of range".to_string(),
        ));
    }

    Shape::new(polygons, name)
}

/// Parse a GeoJSON FeatureCollection into a dataset.
///
/// Feature names go through `normalize`; features it rejects, and features
/// without usable polygon geometry, are skipped. A repeated name keeps its
/// first feature.
pub fn parse_dataset<F>(text: &str, config: &LoaderConfig, normalize: F) -> Result<Dataset>
where
    F: Fn(&str) -> Option<String>,
{
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => return Err(SolverError::NoCountries),
    };

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = 0;

    for feature in features {
        let Some(raw_name) = feature_name(&feature, config) else {
            skipped += 1;
            continue;
        };
        let Some(name) = normalize(raw_name) else {
            debug!("Skipping unrecognised country {:?}", raw_name);
            skipped += 1;
            continue;
        };
        if seen.contains(&name) {
            warn!("Duplicate country {:?} (from {:?}), keeping first", name, raw_name);
            skipped += 1;
            continue;
        }

        match feature_shape(feature, &name) {
            Ok(shape) => {
                seen.insert(name.clone());
                entries.push(CountryEntry::new(name, shape));
            }
            Err(e) => {
                debug!("Skipping {}: {}", name, e);
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} countries ({} features skipped)",
        entries.len(),
        skipped
    );

    if entries.is_empty() {
        return Err(SolverError::NoCountries);
    }
    Dataset::new(entries)
}

/// Load a dataset from a GeoJSON file
pub fn load_dataset<F>(path: impl AsRef<Path>, config: &LoaderConfig, normalize: F) -> Result<Dataset>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();
    info!("Loading countries from {:?}", path);

    let text = fs::read_to_string(path)?;
    parse_dataset(&text, config, normalize)
}
