use crate::geo::{clamp_lat, inverse_mercator, mercator, wrap_lon};

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 100.0;
const ZOOM_STEP: f64 = 1.5;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (higher = more zoomed in); world width is `zoom * width` pixels
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Create a world view (shows entire world)
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    /// Pixels per normalized world unit
    #[inline(always)]
    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Project a geographic coordinate (lon, lat) to fractional pixel coordinates
    #[inline(always)]
    pub fn project_f(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = mercator(lon, lat);
        let (cx, cy) = mercator(self.center_lon, self.center_lat);
        let scale = self.scale();

        (
            (x - cx) * scale + self.width as f64 / 2.0,
            (y - cy) * scale + self.height as f64 / 2.0,
        )
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (px, py) = self.project_f(lon, lat);
        (px.round() as i32, py.round() as i32)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        let scale = self.scale().max(f64::EPSILON);
        let (cx, cy) = mercator(self.center_lon, self.center_lat);

        let x = (px - self.width as f64 / 2.0) / scale + cx;
        let y = (py - self.height as f64 / 2.0) / scale + cy;

        inverse_mercator(x, y)
    }

    /// Pan the viewport by a pixel delta (positive dx moves the view east)
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let scale = self.scale();
        if scale <= 0.0 {
            return;
        }

        let (cx, cy) = mercator(self.center_lon, self.center_lat);
        let (lon, lat) = inverse_mercator(cx + dx / scale, cy + dy / scale);

        self.center_lon = wrap_lon(lon);
        self.center_lat = clamp_lat(lat);
    }

    /// Zoom in by a factor
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    /// Zoom out by a factor
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: f64, py: f64) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: f64, py: f64) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom by factor keeping the geographic point under (px, py) in place
    fn zoom_at(&mut self, px: f64, py: f64, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project_f(lon, lat);
        self.pan(new_px - px, new_py - py);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        let (x, y) = vp.project(0.0, 0.0);
        assert_eq!(x, 50);
        assert_eq!(y, 50);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10.0, 0.0);
        assert!(vp.center_lon > 0.0);
    }

    #[test]
    fn test_pan_moves_content_exactly() {
        let mut vp = Viewport::new(10.0, 30.0, 2.0, 200, 100);
        let (x0, y0) = vp.project_f(20.0, 40.0);
        vp.pan(12.0, -7.0);
        let (x1, y1) = vp.project_f(20.0, 40.0);
        assert!((x0 - x1 - 12.0).abs() < 1e-6);
        assert!((y0 - y1 + 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_pan_wraps_longitude() {
        let mut vp = Viewport::new(179.0, 0.0, 1.0, 360, 180);
        vp.pan(5.0, 0.0);
        assert!(vp.center_lon < -170.0);
    }

    #[test]
    fn test_pan_exact_near_pole() {
        let mut vp = Viewport::new(0.0, 84.95, 1.0, 200, 100);
        let (_, y0) = vp.project_f(10.0, 80.0);
        vp.pan(0.0, -0.5);
        let (_, y1) = vp.project_f(10.0, 80.0);
        assert!(vp.center_lat > 85.0);
        assert!((y1 - y0 - 0.5).abs() < 1e-6);

        vp.pan(0.0, -1000.0);
        assert!((vp.center_lat - crate::geo::MAX_MERCATOR_LAT).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut vp = Viewport::new(0.0, 20.0, 1.0, 200, 100);
        let anchor = vp.unproject(40.0, 30.0);
        vp.zoom_in_at(40.0, 30.0);
        let (px, py) = vp.project_f(anchor.0, anchor.1);
        assert!((px - 40.0).abs() < 1e-6);
        assert!((py - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut vp = Viewport::world(100, 100);
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_polar_rings_are_finite() {
        let vp = Viewport::world(100, 100);
        let (x, y) = vp.project_f(-60.0, -90.0);
        assert!(x.is_finite() && y.is_finite());
    }
}
