//! Terminal choropleth map: country polygons coloured by a per-country metric,
//! re-projected whenever the map view settles after a pan or zoom.

pub mod braille;
pub mod config;
pub mod data;
pub mod geo;
pub mod layer;
pub mod map;
pub mod scale;
