use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::{Metric, DEFAULT_NAME_PROPERTY};
use crate::layer::LayerSettings;
use crate::scale::DEFAULT_PERCENTILE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML configuration")]
    Parse(#[from] toml::de::Error),
    #[error("percentile must be within [0, 1], got {0}")]
    Percentile(f64),
    #[error("zoom must be positive, got {0}")]
    Zoom(f64),
}

/// On-disk configuration; every section and key is optional
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub layer: LayerConfig,
    pub data: DataConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayerConfig {
    pub metric: Option<Metric>,
    pub percentile: Option<f64>,
    pub name_property: Option<String>,
    pub outlines: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub geojson: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub center_lon: Option<f64>,
    pub center_lat: Option<f64>,
    pub zoom: Option<f64>,
}

impl FileConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub geojson: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub metric: Option<Metric>,
    pub percentile: Option<f64>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub metric: Metric,
    pub layer: LayerSettings,
    pub name_property: String,
    pub outlines: bool,
    pub geojson: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metric: Metric::Population,
            layer: LayerSettings::default(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            outlines: false,
            geojson: None,
            dataset: None,
            center_lon: 0.0,
            center_lat: 20.0,
            zoom: 1.0,
        }
    }
}

impl Settings {
    /// Merge defaults, file and command line, then validate
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let percentile = overrides
            .percentile
            .or(file.layer.percentile)
            .unwrap_or(DEFAULT_PERCENTILE);
        if !(0.0..=1.0).contains(&percentile) {
            return Err(ConfigError::Percentile(percentile));
        }

        let zoom = file.view.zoom.unwrap_or(defaults.zoom);
        if !(zoom > 0.0 && zoom.is_finite()) {
            return Err(ConfigError::Zoom(zoom));
        }

        Ok(Self {
            metric: overrides.metric.or(file.layer.metric).unwrap_or(defaults.metric),
            layer: LayerSettings { percentile },
            name_property: file.layer.name_property.unwrap_or(defaults.name_property),
            outlines: file.layer.outlines.unwrap_or(defaults.outlines),
            geojson: overrides.geojson.or(file.data.geojson),
            dataset: overrides.dataset.or(file.data.dataset),
            center_lon: file.view.center_lon.unwrap_or(defaults.center_lon),
            center_lat: file.view.center_lat.unwrap_or(defaults.center_lat),
            zoom,
        })
    }
}
