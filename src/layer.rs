//! Choropleth overlay: one filled shape per feature, kept aligned with the map viewport.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::data::{DataPoint, Feature, FeatureCollection, Metric};
use crate::map::{MapState, MapView, Path, PathGenerator, Subscription, Viewport};
use crate::scale::{ColorScale, Domain, Rgb, DEFAULT_PERCENTILE};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerSettings {
    /// Quantile of the metric that maps to the top colour
    pub percentile: f64,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            percentile: DEFAULT_PERCENTILE,
        }
    }
}

/// A feature as drawn: fill fixed at mount, path refreshed on every move end
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub name: Option<String>,
    pub value: f64,
    pub color: Rgb,
    pub path: Path,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerState {
    Listening,
    Detached,
}

struct Surface {
    /// Shared with snapshots handed out by `shapes()`; copied on write while one is alive
    shapes: Rc<Vec<Shape>>,
    redraws: u64,
}

impl Surface {
    fn apply(&mut self, paths: Vec<Path>) {
        let shapes = Rc::make_mut(&mut self.shapes);
        for (shape, path) in shapes.iter_mut().zip(paths) {
            shape.path = path;
        }
        self.redraws += 1;
    }
}

/// Metric value per feature, joined by exact name against the first matching row.
/// Unmatched features and missing, zero or NaN values resolve to 0.
pub fn resolve_values(features: &[Feature], data: &[DataPoint], metric: Metric) -> Vec<f64> {
    let mut by_country: HashMap<&str, &DataPoint> = HashMap::with_capacity(data.len());
    for point in data {
        by_country.entry(point.country.as_str()).or_insert(point);
    }

    features
        .iter()
        .map(|f| {
            f.name
                .as_deref()
                .and_then(|name| by_country.get(name))
                .and_then(|point| point.get(metric))
                .filter(|v| *v != 0.0 && !v.is_nan())
                .unwrap_or(0.0)
        })
        .collect()
}

fn project_paths(features: &[Feature], viewport: Viewport) -> Vec<Path> {
    let generator = PathGenerator::new(move |lon, lat| viewport.project_f(lon, lat));
    features
        .par_iter()
        .map(|f| generator.path(f.geometry.as_ref()))
        .collect()
}

/// Renders a feature collection coloured by one metric and re-projects it
/// whenever the map finishes moving. Dropping the layer detaches it from the map.
pub struct ChoroplethLayer {
    metric: Metric,
    scale: ColorScale,
    features: Rc<FeatureCollection>,
    surface: Rc<RefCell<Surface>>,
    map: Weak<MapState>,
    subscription: Option<Subscription>,
}

impl ChoroplethLayer {
    pub fn mount(
        map: &MapView,
        features: Rc<FeatureCollection>,
        data: &[DataPoint],
        metric: Metric,
        settings: &LayerSettings,
    ) -> Self {
        let domain = Domain::from_metric(data, metric, settings.percentile);
        let scale = ColorScale::sequential(domain);

        let values = resolve_values(&features.features, data, metric);
        let paths = project_paths(&features.features, map.viewport());
        let shapes = features
            .features
            .iter()
            .zip(values)
            .zip(paths)
            .map(|((feature, value), path)| Shape {
                name: feature.name.clone(),
                value,
                color: scale.color(value),
                path,
            })
            .collect();

        let surface = Rc::new(RefCell::new(Surface {
            shapes: Rc::new(shapes),
            redraws: 1,
        }));

        let subscription = {
            let features = Rc::clone(&features);
            let surface = Rc::clone(&surface);
            map.on_move_end(move |viewport| {
                let paths = project_paths(&features.features, *viewport);
                surface.borrow_mut().apply(paths);
                trace!(zoom = viewport.zoom, "layer redrawn on move end");
            })
        };

        debug!(
            metric = %metric,
            features = features.len(),
            rows = data.len(),
            domain_max = domain.max,
            "layer mounted"
        );

        Self {
            metric,
            scale,
            features,
            surface,
            map: map.state(),
            subscription: Some(subscription),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn domain(&self) -> Domain {
        self.scale.domain()
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn state(&self) -> LayerState {
        if self.subscription.is_some() {
            LayerState::Listening
        } else {
            LayerState::Detached
        }
    }

    /// Whether the move-end listener is registered with a live map
    pub fn is_listening(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Number of times paths were projected, including the one at mount
    pub fn redraw_count(&self) -> u64 {
        self.surface.borrow().redraws
    }

    /// Snapshot of the current shapes in feature order; later redraws leave it untouched
    pub fn shapes(&self) -> Rc<Vec<Shape>> {
        Rc::clone(&self.surface.borrow().shapes)
    }

    /// Re-project every path with the map's current viewport.
    /// Returns false, drawing nothing, once the layer is detached or the map is gone.
    pub fn redraw(&self) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        let Some(map) = self.map.upgrade() else {
            return false;
        };
        let paths = project_paths(&self.features.features, map.viewport());
        self.surface.borrow_mut().apply(paths);
        true
    }

    /// Index of the topmost shape containing the layer point (x, y)
    pub fn shape_at(&self, x: f64, y: f64) -> Option<usize> {
        let surface = self.surface.borrow();
        surface.shapes.iter().rposition(|s| s.path.contains(x, y))
    }

    /// Stop listening for viewport changes; shapes stay as last drawn
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            debug!(metric = %self.metric, "layer detached");
        }
    }
}

impl Drop for ChoroplethLayer {
    fn drop(&mut self) {
        self.detach();
    }
}
