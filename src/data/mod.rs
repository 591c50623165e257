//! Input model: country features, per-country metrics, and their loaders.

mod load;
mod sample;

use std::fmt;
use std::str::FromStr;

use geojson::feature::Id;
use geojson::{Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use load::{load_dataset, load_features, parse_dataset, parse_features, DataError};
pub use sample::sample_world;

/// Property holding a feature's country name in Natural Earth style data
pub const DEFAULT_NAME_PROPERTY: &str = "NAME";

/// Which dataset column colours the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Density,
    Population,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Density, Metric::Population];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Density => "density",
            Metric::Population => "population",
        }
    }

    /// Next metric in display order, wrapping around
    pub fn next(self) -> Self {
        match self {
            Metric::Temperature => Metric::Density,
            Metric::Density => Metric::Population,
            Metric::Population => Metric::Temperature,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown metric {0:?} (expected temperature, density or population)")]
pub struct ParseMetricError(pub String);

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| ParseMetricError(s.to_string()))
    }
}

/// One row of the metrics dataset, joined to features by exact country name
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DataPoint {
    pub country: String,
    #[serde(default)]
    pub population: Option<f64>,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl DataPoint {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Density => self.density,
            Metric::Population => self.population,
        }
    }
}

/// A single country: identifier, name, geometry and the raw property bag
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub id: Option<Id>,
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
    pub properties: JsonObject,
}

impl Feature {
    /// Build from a GeoJSON feature, reading the name from `name_property`
    pub fn from_geojson(feature: geojson::Feature, name_property: &str) -> Self {
        let properties = feature.properties.unwrap_or_default();
        let name = properties
            .get(name_property)
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Self {
            id: feature.id,
            name,
            geometry: feature.geometry,
            properties,
        }
    }
}

/// Ordered, read-only set of features
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureCollection {
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metric_parse() {
        assert_eq!("density".parse(), Ok(Metric::Density));
        assert_eq!(
            "Density".parse::<Metric>(),
            Err(ParseMetricError("Density".into()))
        );
    }

    #[test]
    fn test_metric_cycle_visits_all() {
        let mut m = Metric::Population;
        let mut seen = Vec::new();
        for _ in 0..3 {
            m = m.next();
            seen.push(m);
        }
        assert_eq!(seen, vec![Metric::Temperature, Metric::Density, Metric::Population]);
    }

    #[test]
    fn test_feature_name_from_property() {
        let mut properties = JsonObject::new();
        properties.insert("NAME".into(), json!("France"));
        properties.insert("AREA".into(), json!("551695"));
        let feature = geojson::Feature {
            properties: Some(properties),
            ..Default::default()
        };

        let f = Feature::from_geojson(feature.clone(), "NAME");
        assert_eq!(f.name.as_deref(), Some("France"));
        assert_eq!(f.properties.len(), 2);

        let other = Feature::from_geojson(feature, "ADMIN");
        assert_eq!(other.name, None);
    }

    #[test]
    fn test_non_string_name_is_ignored() {
        let mut properties = JsonObject::new();
        properties.insert("NAME".into(), json!(42));
        let feature = geojson::Feature {
            properties: Some(properties),
            ..Default::default()
        };
        assert_eq!(Feature::from_geojson(feature, "NAME").name, None);
    }
}
