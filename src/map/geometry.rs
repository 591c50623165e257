use crate::braille::BrailleCanvas;
use crate::map::path::Path;
use crate::scale::Rgb;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Whether any part of the path's bounding box lands on the canvas
fn overlaps_canvas(path: &Path, canvas: &BrailleCanvas, (ox, oy): (f64, f64)) -> bool {
    let Some((x0, y0, x1, y1)) = path.bounds() else {
        return false;
    };
    x1 + ox >= 0.0
        && y1 + oy >= 0.0
        && x0 + ox < canvas.pixel_width() as f64
        && y0 + oy < canvas.pixel_height() as f64
}

/// Outline every ring of a path, shifted by `offset` pixels
pub fn stroke_path(canvas: &mut BrailleCanvas, path: &Path, color: Rgb, offset: (f64, f64)) {
    if !overlaps_canvas(path, canvas, offset) {
        return;
    }
    let (ox, oy) = offset;
    let limit = (canvas.pixel_width() + canvas.pixel_height()) as i32 * 4;

    for ring in &path.rings {
        let segments = ring.points.windows(2).map(|w| (w[0], w[1]));
        let closing = (ring.closed && ring.points.len() > 2)
            .then(|| (ring.points[ring.points.len() - 1], ring.points[0]));

        for ((ax, ay), (bx, by)) in segments.chain(closing) {
            let p0 = ((ax + ox).round() as i32, (ay + oy).round() as i32);
            let p1 = ((bx + ox).round() as i32, (by + oy).round() as i32);
            // Segments spanning far off-canvas (antimeridian jumps at high zoom) are skipped
            if (p1.0 - p0.0).abs() + (p1.1 - p0.1).abs() > limit {
                continue;
            }
            draw_line(canvas, p0.0, p0.1, p1.0, p1.1, color);
        }
    }
}

struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    /// +1 when the edge runs downwards, -1 upwards
    dir: i32,
}

impl Edge {
    /// Edge from a to b, stored top to bottom
    fn new((ax, ay): (f64, f64), (bx, by): (f64, f64)) -> Self {
        if ay < by {
            Self {
                x0: ax,
                y0: ay,
                x1: bx,
                y1: by,
                dir: 1,
            }
        } else {
            Self {
                x0: bx,
                y0: by,
                x1: ax,
                y1: ay,
                dir: -1,
            }
        }
    }
}

/// Fill a path with the nonzero winding rule, sampling each pixel at its centre
pub fn fill_path(canvas: &mut BrailleCanvas, path: &Path, color: Rgb, offset: (f64, f64)) {
    if !overlaps_canvas(path, canvas, offset) {
        return;
    }
    let (ox, oy) = offset;

    let mut edges = Vec::new();
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for ring in path.closed_rings() {
        let n = ring.len();
        for i in 0..n {
            let (ax, ay) = ring[i];
            let (bx, by) = ring[(i + 1) % n];
            if ay == by {
                continue;
            }
            let (ax, ay, bx, by) = (ax + ox, ay + oy, bx + ox, by + oy);
            min_y = min_y.min(ay.min(by));
            max_y = max_y.max(ay.max(by));
            edges.push(Edge::new((ax, ay), (bx, by)));
        }
    }
    if edges.is_empty() {
        return;
    }

    let width = canvas.pixel_width() as i64;
    let height = canvas.pixel_height() as i64;
    let row_start = ((min_y - 0.5).ceil() as i64).max(0);
    let row_end = ((max_y - 0.5).floor() as i64).min(height - 1);

    let mut crossings: Vec<(f64, i32)> = Vec::new();
    for py in row_start..=row_end {
        let sample_y = py as f64 + 0.5;

        crossings.clear();
        for e in &edges {
            // Half-open in y so shared vertices count once
            if e.y0 <= sample_y && sample_y < e.y1 {
                let t = (sample_y - e.y0) / (e.y1 - e.y0);
                crossings.push((e.x0 + t * (e.x1 - e.x0), e.dir));
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        let mut span_start = 0.0;
        for &(x, dir) in &crossings {
            let was_inside = winding != 0;
            winding += dir;
            let inside = winding != 0;

            if !was_inside && inside {
                span_start = x;
            } else if was_inside && !inside {
                let first = ((span_start - 0.5).ceil() as i64).max(0);
                let last = ((x - 0.5).ceil() as i64 - 1).min(width - 1);
                for px in first..=last {
                    canvas.set_pixel(px as usize, py as usize, color);
                }
            }
        }
    }
}
