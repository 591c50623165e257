use std::fmt::Write as _;

use geojson::{Geometry, PolygonType, Position, Value};

/// One projected ring or line in pixel space
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ring {
    pub points: Vec<(f64, f64)>,
    /// Closed rings take part in fills; open ones only stroke
    pub closed: bool,
}

/// A drawable path: every ring of a geometry, projected to pixels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub rings: Vec<Ring>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Closed rings, the ones a fill covers
    pub fn closed_rings(&self) -> impl Iterator<Item = &[(f64, f64)]> {
        self.rings
            .iter()
            .filter(|r| r.closed)
            .map(|r| r.points.as_slice())
    }

    /// Pixel bounding box as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points = self.rings.iter().flat_map(|r| r.points.iter());
        let &(x, y) = points.next()?;
        Some(points.fold((x, y, x, y), |(x0, y0, x1, y1), &(x, y)| {
            (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
        }))
    }

    /// Point-in-path test using the nonzero winding rule over closed rings
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.closed_rings().map(|ring| winding_number(ring, x, y)).sum::<i32>() != 0
    }

    /// SVG path data, e.g. `M0,0L10,0L10,10Z`
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for ring in &self.rings {
            for (i, &(x, y)) in ring.points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(out, "{cmd}{},{}", svg_number(x), svg_number(y));
            }
            if ring.closed {
                out.push('Z');
            }
        }
        out
    }
}

fn svg_number(v: f64) -> f64 {
    let r = (v * 1000.0).round() / 1000.0;
    // Avoid printing "-0"
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

fn winding_number(ring: &[(f64, f64)], x: f64, y: f64) -> i32 {
    let n = ring.len();
    let mut winding = 0;
    for i in 0..n {
        let (ax, ay) = ring[i];
        let (bx, by) = ring[(i + 1) % n];
        let side = (bx - ax) * (y - ay) - (x - ax) * (by - ay);
        if ay <= y {
            if by > y && side > 0.0 {
                winding += 1;
            }
        } else if by <= y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Turns GeoJSON geometries into pixel-space paths through a projection function.
///
/// Malformed input never fails: positions that are short or non-finite are skipped,
/// and rings left without enough points are dropped.
pub struct PathGenerator<P> {
    projection: P,
}

impl<P> PathGenerator<P>
where
    P: Fn(f64, f64) -> (f64, f64),
{
    pub fn new(projection: P) -> Self {
        Self { projection }
    }

    /// Project a feature's geometry; a missing geometry yields an empty path
    pub fn path(&self, geometry: Option<&Geometry>) -> Path {
        let mut path = Path::default();
        if let Some(geometry) = geometry {
            self.add_value(&geometry.value, &mut path);
        }
        path
    }

    fn add_value(&self, value: &Value, path: &mut Path) {
        match value {
            Value::Polygon(rings) => self.add_polygon(rings, path),
            Value::MultiPolygon(polygons) => {
                for rings in polygons {
                    self.add_polygon(rings, path);
                }
            }
            Value::LineString(coords) => self.add_ring(coords, false, path),
            Value::MultiLineString(lines) => {
                for coords in lines {
                    self.add_ring(coords, false, path);
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.add_value(&g.value, path);
                }
            }
            // Points carry no area
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
    }

    fn add_polygon(&self, rings: &PolygonType, path: &mut Path) {
        for ring in rings {
            self.add_ring(ring, true, path);
        }
    }

    fn add_ring(&self, coords: &[Position], closed: bool, path: &mut Path) {
        let mut positions: Vec<(f64, f64)> = coords
            .iter()
            .filter(|c| c.len() >= 2 && c[0].is_finite() && c[1].is_finite())
            .map(|c| (c[0], c[1]))
            .collect();

        // GeoJSON repeats the first position to close a ring; the Z command does that for us
        if closed && positions.len() > 1 && positions.first() == positions.last() {
            positions.pop();
        }

        let min_points = if closed { 3 } else { 2 };
        if positions.len() < min_points {
            return;
        }

        let points = positions
            .into_iter()
            .map(|(lon, lat)| (self.projection)(lon, lat))
            .collect();

        path.rings.push(Ring { points, closed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> PathGenerator<impl Fn(f64, f64) -> (f64, f64)> {
        PathGenerator::new(|x, y| (x, y))
    }

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Position> {
        vec![
            vec![x0, y0],
            vec![x0 + size, y0],
            vec![x0 + size, y0 + size],
            vec![x0, y0 + size],
            vec![x0, y0],
        ]
    }

    #[test]
    fn test_polygon_svg() {
        let geometry = Geometry::new(Value::Polygon(vec![square(0.0, 0.0, 10.0)]));
        let path = identity().path(Some(&geometry));
        assert_eq!(path.to_svg(), "M0,0L10,0L10,10L0,10Z");
    }

    #[test]
    fn test_projection_applied() {
        let generator = PathGenerator::new(|x, y| (x * 2.0 + 1.0, -y));
        let geometry = Geometry::new(Value::LineString(vec![vec![1.0, 1.0], vec![2.5, 3.0]]));
        assert_eq!(generator.path(Some(&geometry)).to_svg(), "M3,-1L6,-3");
    }

    #[test]
    fn test_svg_rounds_to_three_places() {
        let generator = PathGenerator::new(|x, y| (x / 3.0, y));
        let geometry = Geometry::new(Value::LineString(vec![vec![1.0, 0.0], vec![2.0, 0.0]]));
        assert_eq!(generator.path(Some(&geometry)).to_svg(), "M0.333,0L0.667,0");
    }

    #[test]
    fn test_multipolygon_keeps_every_ring() {
        let geometry = Geometry::new(Value::MultiPolygon(vec![
            vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 2.0)],
            vec![square(20.0, 0.0, 5.0)],
        ]));
        let path = identity().path(Some(&geometry));
        assert_eq!(path.rings.len(), 3);
        assert!(path.rings.iter().all(|r| r.closed && r.points.len() == 4));
    }

    #[test]
    fn test_malformed_positions_skipped() {
        let geometry = Geometry::new(Value::Polygon(vec![
            vec![vec![0.0], vec![f64::NAN, 1.0], vec![0.0, 0.0], vec![1.0, 0.0]],
            square(0.0, 0.0, 1.0),
        ]));
        let path = identity().path(Some(&geometry));
        // First ring collapses below three points and is dropped
        assert_eq!(path.rings.len(), 1);
    }

    #[test]
    fn test_missing_geometry_is_empty() {
        let path = identity().path(None);
        assert!(path.is_empty());
        assert_eq!(path.to_svg(), "");
        assert_eq!(path.bounds(), None);
    }

    #[test]
    fn test_points_are_ignored() {
        let geometry = Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(Value::Point(vec![1.0, 2.0])),
            Geometry::new(Value::Polygon(vec![square(0.0, 0.0, 1.0)])),
        ]));
        assert_eq!(identity().path(Some(&geometry)).rings.len(), 1);
    }

    #[test]
    fn test_contains_respects_holes() {
        let geometry = Geometry::new(Value::Polygon(vec![
            square(0.0, 0.0, 10.0),
            // Hole wound the other way
            vec![
                vec![4.0, 4.0],
                vec![4.0, 6.0],
                vec![6.0, 6.0],
                vec![6.0, 4.0],
                vec![4.0, 4.0],
            ],
        ]));
        let path = identity().path(Some(&geometry));
        assert!(path.contains(1.0, 1.0));
        assert!(!path.contains(5.0, 5.0));
        assert!(!path.contains(11.0, 5.0));
    }

    #[test]
    fn test_bounds() {
        let geometry = Geometry::new(Value::Polygon(vec![square(-2.0, 3.0, 4.0)]));
        let path = identity().path(Some(&geometry));
        assert_eq!(path.bounds(), Some((-2.0, 3.0, 2.0, 7.0)));
    }
}
