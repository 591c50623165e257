use std::rc::Rc;

use choropleth_tui::config::Settings;
use choropleth_tui::data::{DataPoint, FeatureCollection, Metric};
use choropleth_tui::layer::ChoroplethLayer;
use choropleth_tui::map::{MapView, Viewport};
use tracing::info;

/// Feature under the mouse cursor
#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    pub name: String,
    pub value: f64,
}

/// Application state
pub struct App {
    pub map: MapView,
    pub layer: ChoroplethLayer,
    pub features: Rc<FeatureCollection>,
    pub data: Vec<DataPoint>,
    pub settings: Settings,
    pub show_outlines: bool,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the hover readout
    pub mouse_pos: Option<(u16, u16)>,
}

/// Braille pixel size of the map area for a terminal of `width` x `height` cells
fn pixel_size(width: usize, height: usize) -> (usize, usize) {
    // Border takes 2 chars each way, status bar one more row
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}

/// Convert terminal coords to braille pixel coords, accounting for the border
fn cell_to_pixel(col: u16, row: u16) -> (f64, f64) {
    let px = (col.saturating_sub(1)) as f64 * 2.0;
    let py = (row.saturating_sub(1)) as f64 * 4.0;
    (px, py)
}

impl App {
    pub fn new(
        width: usize,
        height: usize,
        features: FeatureCollection,
        data: Vec<DataPoint>,
        settings: Settings,
    ) -> Self {
        let map = MapView::new(Self::home_viewport(&settings, width, height));
        let features = Rc::new(features);
        let layer = ChoroplethLayer::mount(
            &map,
            Rc::clone(&features),
            &data,
            settings.metric,
            &settings.layer,
        );

        Self {
            map,
            layer,
            features,
            data,
            show_outlines: settings.outlines,
            settings,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
        }
    }

    fn home_viewport(settings: &Settings, width: usize, height: usize) -> Viewport {
        let (pw, ph) = pixel_size(width, height);
        Viewport::new(settings.center_lon, settings.center_lat, settings.zoom, pw, ph)
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pw, ph) = pixel_size(width, height);
        self.map.resize(pw, ph);
    }

    /// Restore the configured centre and zoom
    pub fn reset_view(&mut self) {
        let vp = self.map.viewport();
        let home = Viewport::new(
            self.settings.center_lon,
            self.settings.center_lat,
            self.settings.zoom,
            vp.width,
            vp.height,
        );
        self.map.reset(home);
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.map.pan(dx as f64, dy as f64);
    }

    pub fn zoom_in(&mut self) {
        self.map.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.map.zoom_out();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.map.zoom_in_at(px, py);
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = cell_to_pixel(col, row);
        self.map.zoom_out_at(px, py);
    }

    /// Switch to the next metric; the layer is torn down and mounted again
    pub fn cycle_metric(&mut self) {
        let metric = self.layer.metric().next();
        self.set_metric(metric);
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.layer.detach();
        self.layer = ChoroplethLayer::mount(
            &self.map,
            Rc::clone(&self.features),
            &self.data,
            metric,
            &self.settings.layer,
        );
        info!(metric = %metric, domain_max = self.layer.domain().max, "metric switched");
    }

    pub fn toggle_outlines(&mut self) {
        self.show_outlines = !self.show_outlines;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.map.viewport().zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        let vp = self.map.viewport();
        format!(
            "{:.1}°{}, {:.1}°{}",
            vp.center_lat.abs(),
            if vp.center_lat >= 0.0 { "N" } else { "S" },
            vp.center_lon.abs(),
            if vp.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn begin_drag(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.map.begin_drag();
    }

    /// Handle mouse drag: content follows the pointer, redraw waits for release
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (col as f64 - last_col as f64) * 2.0;
            let dy = (row as f64 - last_row as f64) * 4.0;
            self.map.drag_by(dx, dy);
        }
        self.last_mouse = Some((col, row));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
        self.map.end_drag();
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Feature under the mouse cursor, if any
    pub fn hovered(&self) -> Option<Hover> {
        let (col, row) = self.mouse_pos?;
        let (px, py) = cell_to_pixel(col, row);
        // Sample the centre of the character cell, in the layer's (pre-drag) pixel space
        let (ox, oy) = self.map.pane_offset();
        let idx = self.layer.shape_at(px + 1.0 - ox, py + 2.0 - oy)?;

        let shapes = self.layer.shapes();
        let shape = &shapes[idx];
        Some(Hover {
            name: shape.name.clone().unwrap_or_else(|| "Unnamed".to_string()),
            value: shape.value,
        })
    }
}
