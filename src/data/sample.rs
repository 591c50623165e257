use geojson::{Geometry, JsonObject, Value};
use serde_json::json;

use super::{DataPoint, Feature, FeatureCollection, DEFAULT_NAME_PROPERTY};

fn region(id: u64, name: &str, outline: &[(f64, f64)]) -> Feature {
    let mut ring: Vec<Vec<f64>> = outline.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }

    let mut properties = JsonObject::new();
    properties.insert(DEFAULT_NAME_PROPERTY.to_string(), json!(name));

    Feature {
        id: Some(geojson::feature::Id::Number(id.into())),
        name: Some(name.to_string()),
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        properties,
    }
}

fn row(
    country: &str,
    population: f64,
    density: Option<f64>,
    temperature: Option<f64>,
) -> DataPoint {
    DataPoint {
        country: country.to_string(),
        population: Some(population),
        density,
        temperature,
    }
}

/// Simplified continent outlines with rough figures, for when no data files are given
#[rustfmt::skip]
pub fn sample_world() -> (FeatureCollection, Vec<DataPoint>) {
    let features = vec![
        region(
            1,
            "North America",
            &[
                (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
                (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
                (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
                (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
                (-65.0, 47.0), (-55.0, 47.0), (-52.0, 47.0), (-55.0, 52.0),
                (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
                (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
            ],
        ),
        region(
            2,
            "South America",
            &[
                (-80.0, 10.0), (-75.0, 5.0), (-70.0, 5.0), (-60.0, 5.0),
                (-50.0, 0.0), (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0),
                (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
                (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0),
                (-72.0, -40.0), (-72.0, -30.0), (-70.0, -20.0), (-70.0, -15.0),
                (-80.0, -5.0), (-80.0, 0.0),
            ],
        ),
        region(
            3,
            "Europe",
            &[
                (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0),
                (10.0, 44.0), (15.0, 45.0), (20.0, 40.0), (25.0, 37.0),
                (30.0, 40.0), (35.0, 42.0), (40.0, 43.0), (40.0, 55.0),
                (30.0, 60.0), (25.0, 65.0), (20.0, 70.0), (10.0, 71.0),
                (5.0, 62.0), (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0),
                (-5.0, 48.0), (-5.0, 43.0),
            ],
        ),
        region(
            4,
            "Africa",
            &[
                (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0),
                (10.0, 37.0), (20.0, 33.0), (25.0, 32.0), (35.0, 30.0),
                (35.0, 20.0), (42.0, 12.0), (50.0, 12.0), (45.0, 5.0),
                (40.0, -5.0), (40.0, -15.0), (35.0, -25.0), (30.0, -30.0),
                (20.0, -35.0), (18.0, -35.0), (15.0, -30.0), (12.0, -15.0),
                (10.0, 0.0), (5.0, 5.0), (-5.0, 5.0), (-10.0, 10.0),
            ],
        ),
        region(
            5,
            "Asia",
            &[
                (40.0, 43.0), (50.0, 40.0), (55.0, 37.0), (60.0, 25.0),
                (65.0, 25.0), (70.0, 20.0), (75.0, 15.0), (80.0, 8.0),
                (80.0, 15.0), (88.0, 22.0), (92.0, 22.0), (95.0, 16.0),
                (100.0, 14.0), (105.0, 10.0), (110.0, 20.0), (115.0, 22.0),
                (120.0, 22.0), (122.0, 25.0), (125.0, 30.0), (130.0, 35.0),
                (135.0, 35.0), (140.0, 40.0), (145.0, 45.0), (145.0, 50.0),
                (140.0, 55.0), (135.0, 55.0), (130.0, 52.0), (130.0, 43.0),
                (120.0, 40.0), (110.0, 45.0), (90.0, 50.0), (70.0, 55.0),
                (60.0, 55.0), (50.0, 50.0),
            ],
        ),
        region(
            6,
            "Oceania",
            &[
                (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0),
                (145.0, -15.0), (150.0, -25.0), (153.0, -30.0), (150.0, -35.0),
                (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
                (125.0, -32.0), (115.0, -35.0), (115.0, -25.0),
            ],
        ),
    ];

    let data = vec![
        row("North America", 604_000_000.0, Some(25.0), Some(7.6)),
        row("South America", 434_000_000.0, Some(24.0), Some(21.9)),
        row("Europe", 745_000_000.0, Some(73.0), Some(9.7)),
        row("Africa", 1_460_000_000.0, Some(48.0), Some(24.6)),
        row("Asia", 4_750_000_000.0, Some(150.0), None),
        // No Oceania row: it resolves to 0
    ];

    (FeatureCollection::new(features), data)
}
