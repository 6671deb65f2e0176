//! Closed-polygon simplification and convexity tests for contour
//! validation.

use nalgebra::Point2;

#[inline]
fn perp_distance(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len = (ab.x * ab.x + ab.y * ab.y).sqrt();
    if len <= f64::EPSILON {
        let ap = p - a;
        return (ap.x * ap.x + ap.y * ap.y).sqrt();
    }
    (ab.x * (p.y - a.y) - ab.y * (p.x - a.x)).abs() / len
}

fn rdp_open(points: &[Point2<f64>], epsilon: f64, out: &mut Vec<Point2<f64>>) {
    if points.len() < 3 {
        // Keep the first point; the endpoint belongs to the next segment.
        if let Some(&first) = points.first() {
            out.push(first);
        }
        return;
    }
    let a = points[0];
    let b = points[points.len() - 1];
    let (mut max_d, mut max_i) = (0.0, 0);
    for (i, &p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let d = perp_distance(p, a, b);
        if d > max_d {
            max_d = d;
            max_i = i;
        }
    }
    if max_d > epsilon {
        rdp_open(&points[..=max_i], epsilon, out);
        rdp_open(&points[max_i..], epsilon, out);
    } else {
        out.push(a);
    }
}

/// Simplify a closed contour with the Douglas-Peucker scheme.
///
/// The contour is split at its two mutually farthest anchor points and both
/// halves are simplified independently, so the result does not depend on an
/// arbitrary segment through the starting index.
pub fn approx_polygon(points: &[Point2<i32>], epsilon: f64) -> Vec<Point2<f64>> {
    if points.len() <= 3 {
        return points
            .iter()
            .map(|p| Point2::new(p.x as f64, p.y as f64))
            .collect();
    }
    let pts: Vec<Point2<f64>> = points
        .iter()
        .map(|p| Point2::new(p.x as f64, p.y as f64))
        .collect();

    // Anchor the split at the point farthest from point 0.
    let mut far = 1;
    let mut far_d = 0.0;
    for (i, p) in pts.iter().enumerate().skip(1) {
        let d = (p - pts[0]).norm_squared();
        if d > far_d {
            far_d = d;
            far = i;
        }
    }

    let mut out = Vec::new();
    rdp_open(&pts[..=far], epsilon, &mut out);
    let mut tail: Vec<Point2<f64>> = pts[far..].to_vec();
    tail.push(pts[0]);
    rdp_open(&tail, epsilon, &mut out);
    out
}

/// Convexity test for a closed polygon: all nonzero cross products of
/// consecutive edges must share a sign. Collinear runs are tolerated.
pub fn is_convex(poly: &[Point2<f64>]) -> bool {
    let n = poly.len();
    if n < 4 {
        return true;
    }
    let mut sign = 0i8;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let c = poly[(i + 2) % n];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross.abs() <= f64::EPSILON {
            continue;
        }
        let s = if cross > 0.0 { 1 } else { -1 };
        if sign == 0 {
            sign = s;
        } else if s != sign {
            return false;
        }
    }
    true
}
