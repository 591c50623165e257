use std::fs;
use std::path::{Path, PathBuf};

use geojson::GeoJson;
use thiserror::Error;
use tracing::info;

use super::{DataPoint, Feature, FeatureCollection};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON")]
    Json(#[from] simd_json::Error),
    #[error("expected a FeatureCollection or Feature, found a bare geometry")]
    NotFeatureCollection,
}

fn read(path: &Path) -> Result<Vec<u8>, DataError> {
    fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse GeoJSON bytes into features; a lone Feature becomes a one-element collection
pub fn parse_features(
    bytes: &mut [u8],
    name_property: &str,
) -> Result<FeatureCollection, DataError> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .map(|f| Feature::from_geojson(f, name_property))
            .collect(),
        GeoJson::Feature(f) => vec![Feature::from_geojson(f, name_property)],
        GeoJson::Geometry(_) => return Err(DataError::NotFeatureCollection),
    };

    Ok(FeatureCollection::new(features))
}

/// Parse a JSON array of per-country metrics
pub fn parse_dataset(bytes: &mut [u8]) -> Result<Vec<DataPoint>, DataError> {
    Ok(simd_json::serde::from_slice(bytes)?)
}

/// Load country features from a GeoJSON file
pub fn load_features(path: &Path, name_property: &str) -> Result<FeatureCollection, DataError> {
    let mut bytes = read(path)?;
    let collection = parse_features(&mut bytes, name_property)?;
    let named = collection
        .features
        .iter()
        .filter(|f| f.name.is_some())
        .count();
    info!(path = %path.display(), features = collection.len(), named, "loaded features");
    Ok(collection)
}

/// Load the metrics dataset from a JSON file
pub fn load_dataset(path: &Path) -> Result<Vec<DataPoint>, DataError> {
    let mut bytes = read(path)?;
    let data = parse_dataset(&mut bytes)?;
    info!(path = %path.display(), rows = data.len(), "loaded dataset");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 7,
                "properties": { "NAME": "Chad", "ISO_3_CODE": "TCD" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[14,8],[24,8],[24,23],[14,23],[14,8]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ISO_3_CODE": "XXX" },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_collection() {
        let mut bytes = COUNTRIES.as_bytes().to_vec();
        let fc = parse_features(&mut bytes, "NAME").unwrap();
        assert_eq!(fc.kind, "FeatureCollection");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].name.as_deref(), Some("Chad"));
        assert!(fc.features[0].geometry.is_some());
        assert_eq!(fc.features[1].name, None);
        assert!(fc.features[1].geometry.is_none());
    }

    #[test]
    fn test_single_feature_is_wrapped() {
        let mut bytes =
            br#"{"type":"Feature","properties":{"NAME":"Peru"},"geometry":null}"#.to_vec();
        let fc = parse_features(&mut bytes, "NAME").unwrap();
        assert_eq!(fc.len(), 1);
    }

    #[test]
    fn test_bare_geometry_rejected() {
        let mut bytes = br#"{"type":"Point","coordinates":[1,2]}"#.to_vec();
        assert!(matches!(
            parse_features(&mut bytes, "NAME"),
            Err(DataError::NotFeatureCollection)
        ));
    }

    #[test]
    fn test_invalid_json() {
        let mut bytes = b"{not json".to_vec();
        assert!(matches!(parse_dataset(&mut bytes), Err(DataError::Json(_))));
    }

    #[test]
    fn test_parse_dataset_nulls_and_missing() {
        let mut bytes = br#"[
            {"country": "A", "population": 10},
            {"country": "B", "population": 90, "density": null, "temperature": 21.5, "extra": "x"}
        ]"#
        .to_vec();
        let data = parse_dataset(&mut bytes).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].population, Some(10.0));
        assert_eq!(data[0].density, None);
        assert_eq!(data[1].density, None);
        assert_eq!(data[1].temperature, Some(21.5));
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
