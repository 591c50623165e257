//! Quantile-based colour domains and the sequential Turbo colour scale.

use std::fmt;

use crate::data::{DataPoint, Metric};

/// Percentile of the selected metric used as the top of the colour domain
pub const DEFAULT_PERCENTILE: f64 = 0.85;

/// 8-bit RGB colour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.0, c.1, c.2)
    }
}

/// Quantile of an ascending slice, interpolating linearly between closest ranks.
/// Returns `None` for an empty slice.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || p.is_nan() {
        return None;
    }
    if p <= 0.0 || n < 2 {
        return Some(sorted[0]);
    }
    if p >= 1.0 {
        return Some(sorted[n - 1]);
    }

    let i = (n - 1) as f64 * p;
    let i0 = i.floor() as usize;
    let v0 = sorted[i0];
    let v1 = sorted[i0 + 1];
    Some(v0 + (v1 - v0) * (i - i0 as f64))
}

/// Numeric range mapped onto the colour ramp
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[0, q]` where `q` is the `percentile` quantile of the metric's present values.
    /// Empty or all-null data gives `[0, 0]`.
    pub fn from_metric(data: &[DataPoint], metric: Metric, percentile: f64) -> Self {
        let mut values: Vec<f64> = data
            .iter()
            .filter_map(|d| d.get(metric))
            .filter(|v| !v.is_nan())
            .collect();
        values.sort_by(f64::total_cmp);

        let max = quantile(&values, percentile)
            .filter(|q| q.is_finite())
            .unwrap_or(0.0);
        Self::new(0.0, max)
    }

    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Turbo colormap (polynomial approximation), `t` clamped to [0, 1]
pub fn turbo(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let r = 34.61 + t * (1172.33 - t * (10793.56 - t * (33300.12 - t * (38394.49 - t * 14825.05))));
    let g = 23.31 + t * (557.33 + t * (1225.33 - t * (3574.96 - t * (1073.77 + t * 707.56))));
    let b = 27.2 + t * (3211.1 - t * (15327.97 - t * (27814.0 - t * (22569.18 - t * 6838.66))));
    Rgb(channel(r), channel(g), channel(b))
}

#[inline(always)]
fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Continuous mapping from a domain onto a colour interpolator
#[derive(Clone, Copy)]
pub struct ColorScale {
    domain: Domain,
    interpolator: fn(f64) -> Rgb,
}

impl ColorScale {
    /// Sequential Turbo scale over `domain`
    pub fn sequential(domain: Domain) -> Self {
        Self {
            domain,
            interpolator: turbo,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Colour for `value`; a zero-width domain maps everything to the ramp midpoint
    pub fn color(&self, value: f64) -> Rgb {
        if self.domain.is_degenerate() {
            return (self.interpolator)(0.5);
        }
        let t = (value - self.domain.min) / (self.domain.max - self.domain.min);
        (self.interpolator)(t)
    }

    /// `n` evenly spaced colours from the bottom to the top of the ramp, for legends
    pub fn ramp(&self, n: usize) -> Vec<Rgb> {
        match n {
            0 => Vec::new(),
            1 => vec![(self.interpolator)(0.0)],
            _ => (0..n)
                .map(|i| (self.interpolator)(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

impl fmt::Debug for ColorScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorScale")
            .field("domain", &self.domain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(country: &str, population: Option<f64>) -> DataPoint {
        DataPoint {
            country: country.to_string(),
            population,
            ..DataPoint::default()
        }
    }

    #[test]
    fn test_quantile_interpolates() {
        assert_eq!(quantile(&[10.0, 90.0], 0.85), Some(78.0));
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.5), Some(3.0));
        let q = quantile(&[0.0, 10.0, 20.0, 30.0], 0.85).unwrap();
        assert!((q - 25.5).abs() < 1e-9);
    }

    #[test]
    fn test_quantile_edges() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[7.0], 0.85), Some(7.0));
        assert_eq!(quantile(&[1.0, 2.0], 0.0), Some(1.0));
        assert_eq!(quantile(&[1.0, 2.0], 1.0), Some(2.0));
    }

    #[test]
    fn test_domain_sorts_and_skips_missing() {
        let data = vec![
            point("B", Some(90.0)),
            point("X", None),
            point("A", Some(10.0)),
            point("Y", Some(f64::NAN)),
        ];
        let domain = Domain::from_metric(&data, Metric::Population, DEFAULT_PERCENTILE);
        assert_eq!(domain, Domain::new(0.0, 78.0));
    }

    #[test]
    fn test_domain_degenerate() {
        let empty = Domain::from_metric(&[], Metric::Population, DEFAULT_PERCENTILE);
        assert_eq!(empty, Domain::new(0.0, 0.0));

        let nulls = vec![point("A", None), point("B", None)];
        let domain = Domain::from_metric(&nulls, Metric::Population, DEFAULT_PERCENTILE);
        assert!(domain.is_degenerate());
    }

    #[test]
    fn test_domain_uses_selected_metric() {
        let data = vec![DataPoint {
            country: "A".into(),
            population: Some(1000.0),
            density: Some(4.0),
            temperature: None,
        }];
        assert_eq!(Domain::from_metric(&data, Metric::Density, 0.85).max, 4.0);
        assert_eq!(Domain::from_metric(&data, Metric::Temperature, 0.85).max, 0.0);
    }

    #[test]
    fn test_turbo_endpoints() {
        assert_eq!(turbo(0.0).to_string(), "#23171b");
        assert_eq!(turbo(1.0).to_string(), "#900c00");
        assert_eq!(turbo(-3.0), turbo(0.0));
        assert_eq!(turbo(7.0), turbo(1.0));
    }

    #[test]
    fn test_scale_bounds() {
        let scale = ColorScale::sequential(Domain::new(0.0, 78.0));
        assert_eq!(scale.color(0.0), turbo(0.0));
        assert_eq!(scale.color(78.0), turbo(1.0));
        assert_eq!(scale.color(500.0), turbo(1.0));
        assert_eq!(scale.color(39.0), turbo(0.5));
    }

    #[test]
    fn test_degenerate_scale_uses_midpoint() {
        let scale = ColorScale::sequential(Domain::new(0.0, 0.0));
        assert_eq!(scale.color(0.0), turbo(0.5));
        assert_eq!(scale.color(12.0), turbo(0.5));
    }

    #[test]
    fn test_ramp() {
        let scale = ColorScale::sequential(Domain::new(0.0, 1.0));
        let ramp = scale.ramp(5);
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp[0], turbo(0.0));
        assert_eq!(ramp[4], turbo(1.0));
    }
}
