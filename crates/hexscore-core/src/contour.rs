//! External contour extraction from binary masks.
//!
//! Only the outer boundary of each 8-connected foreground component is
//! traced; holes are ignored. Board detection and piece counting both work
//! on outer boundaries exclusively.

use nalgebra::Point2;

use crate::image::GrayImageView;
use crate::rect::Rect;

/// Ordered closed boundary of one foreground component, in pixel
/// coordinates. Lifetime is one detection pass.
#[derive(Clone, Debug)]
pub struct Contour {
    pub points: Vec<Point2<i32>>,
}

impl Contour {
    /// Signed shoelace area, absolute value. Matches the convention of
    /// polygon area over the traced boundary rather than a pixel count.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0i64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            acc += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
        }
        (acc.abs() as f64) * 0.5
    }

    /// Closed arc length.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let dx = (q.x - p.x) as f64;
            let dy = (q.y - p.y) as f64;
            acc += (dx * dx + dy * dy).sqrt();
        }
        acc
    }

    pub fn bounding_rect(&self) -> Rect {
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        if self.points.is_empty() {
            return Rect { x: 0, y: 0, width: 0, height: 0 };
        }
        Rect {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }
}

// Moore neighborhood in circular order: W, NW, N, NE, E, SE, S, SW.
const DIRS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

#[inline]
fn foreground(mask: &GrayImageView<'_>, x: i32, y: i32) -> bool {
    x >= 0
        && y >= 0
        && x < mask.width as i32
        && y < mask.height as i32
        && mask.data[y as usize * mask.width + x as usize] != 0
}

/// Moore-neighbor boundary tracing.
///
/// `start` must be the first foreground pixel of its component in row-major
/// scan order, so its north and west neighbors are background. Termination
/// uses a visited (pixel, backtrack) state set: thin one-pixel structures
/// legitimately pass through the same pixel twice with different entry
/// states, but no valid traversal repeats a state.
fn trace_boundary(
    mask: &GrayImageView<'_>,
    start: Point2<i32>,
    seen: &mut [u8],
) -> Vec<Point2<i32>> {
    let w = mask.width;
    let mut points = vec![start];
    let mut p = start;
    // Backtrack direction points at the background neighbor we entered
    // from; the west neighbor of the scan-order start is background.
    let mut back = 0usize;
    seen[start.y as usize * w + start.x as usize] |= 1 << back;

    loop {
        let mut advanced = false;
        for i in 1..=8 {
            let d = (back + i) % 8;
            let q = Point2::new(p.x + DIRS[d].0, p.y + DIRS[d].1);
            if !foreground(mask, q.x, q.y) {
                continue;
            }
            // All neighbors scanned before `d` were background; the last
            // of them becomes the new backtrack pixel.
            let last_bg = (back + i - 1) % 8;
            let bg = Point2::new(p.x + DIRS[last_bg].0, p.y + DIRS[last_bg].1);
            let new_back = DIRS
                .iter()
                .position(|&(dx, dy)| q.x + dx == bg.x && q.y + dy == bg.y)
                .unwrap_or(0);
            let qi = q.y as usize * w + q.x as usize;
            let bit = 1u8 << new_back;
            if seen[qi] & bit != 0 {
                // Boundary closed.
                return points;
            }
            seen[qi] |= bit;
            points.push(q);
            p = q;
            back = new_back;
            advanced = true;
            break;
        }
        if !advanced {
            // Isolated pixel.
            return points;
        }
    }
}

/// Extract the outer boundary of every 8-connected foreground component,
/// in row-major discovery order.
pub fn find_external_contours(mask: &GrayImageView<'_>) -> Vec<Contour> {
    let (w, h) = (mask.width, mask.height);
    let mut labeled = vec![false; w * h];
    // Trace-state scratch, shared across components (they never overlap).
    let mut seen = vec![0u8; w * h];
    let mut contours = Vec::new();
    let mut stack = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            if mask.data[idx] == 0 || labeled[idx] {
                continue;
            }

            let start = Point2::new(x as i32, y as i32);
            contours.push(Contour {
                points: trace_boundary(mask, start, &mut seen),
            });

            // Flood-fill the component so later scan rows skip it.
            stack.push((x, y));
            labeled[idx] = true;
            while let Some((cx, cy)) = stack.pop() {
                for &(dx, dy) in &DIRS {
                    let nx = cx as i32 + dx;
                    let ny = cy as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                        continue;
                    }
                    let ni = ny as usize * w + nx as usize;
                    if mask.data[ni] != 0 && !labeled[ni] {
                        labeled[ni] = true;
                        stack.push((nx as usize, ny as usize));
                    }
                }
            }
        }
    }
    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImage;

    fn mask_with_rect(w: usize, h: usize, r: Rect) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in r.y..r.y + r.height as i32 {
            for x in r.x..r.x + r.width as i32 {
                img.data[y as usize * w + x as usize] = 255;
            }
        }
        img
    }

    #[test]
    fn single_rect_yields_one_contour_with_matching_bbox() {
        let r = Rect { x: 3, y: 4, width: 10, height: 6 };
        let img = mask_with_rect(32, 32, r);
        let contours = find_external_contours(&img.view());
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].bounding_rect(), r);
        // Boundary-polygon area of a w x h pixel block is (w-1)*(h-1).
        assert_eq!(contours[0].area(), 45.0);
        approx::assert_relative_eq!(contours[0].perimeter(), 28.0, max_relative = 1e-9);
    }

    #[test]
    fn disjoint_blobs_produce_separate_contours() {
        let mut img = mask_with_rect(40, 40, Rect { x: 2, y: 2, width: 5, height: 5 });
        for y in 20..28 {
            for x in 20..30 {
                img.data[y * 40 + x] = 255;
            }
        }
        let contours = find_external_contours(&img.view());
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn hole_boundary_is_not_reported() {
        // 12x12 block with a 4x4 hole: only the outer border comes back.
        let mut img = mask_with_rect(24, 24, Rect { x: 4, y: 4, width: 12, height: 12 });
        for y in 8..12 {
            for x in 8..12 {
                img.data[y * 24 + x] = 0;
            }
        }
        let contours = find_external_contours(&img.view());
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0].bounding_rect(),
            Rect { x: 4, y: 4, width: 12, height: 12 }
        );
    }

    #[test]
    fn isolated_pixel_traces_degenerate_contour() {
        let mut img = GrayImage::new(8, 8);
        img.data[3 * 8 + 3] = 255;
        let contours = find_external_contours(&img.view());
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 1);
        assert_eq!(contours[0].area(), 0.0);
    }
}
