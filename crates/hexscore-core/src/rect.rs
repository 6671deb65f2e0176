use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Ratio of the longer bounding side to the shorter one. Degenerate
    /// rects report an infinite ratio so callers reject them.
    pub fn aspect_ratio(&self) -> f64 {
        let long = self.width.max(self.height) as f64;
        let short = self.width.min(self.height) as f64;
        if short <= 0.0 {
            f64::INFINITY
        } else {
            long / short
        }
    }

    /// Rescale from one coordinate space to another (e.g. detection frame
    /// to native camera frame).
    pub fn scaled(&self, sx: f64, sy: f64) -> Rect {
        Rect {
            x: (self.x as f64 * sx).round() as i32,
            y: (self.y as f64 * sy).round() as i32,
            width: (self.width as f64 * sx).round() as u32,
            height: (self.height as f64 * sy).round() as u32,
        }
    }

    /// Clamp to an image of the given size. The result always lies fully
    /// inside the image; it may be empty.
    pub fn clamped_to(&self, width: usize, height: usize) -> Rect {
        let x0 = self.x.clamp(0, width as i32);
        let y0 = self.y.clamp(0, height as i32);
        let x1 = (self.x + self.width as i32).clamp(x0, width as i32);
        let y1 = (self.y + self.height as i32).clamp(y0, height as i32);
        Rect {
            x: x0,
            y: y0,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_interior_rect_unchanged() {
        let r = Rect {
            x: 2,
            y: 3,
            width: 5,
            height: 4,
        };
        assert_eq!(r.clamped_to(20, 20), r);
    }

    #[test]
    fn clamp_trims_overhang_and_negative_origin() {
        let r = Rect {
            x: -3,
            y: 18,
            width: 10,
            height: 10,
        };
        let c = r.clamped_to(20, 20);
        assert_eq!(c, Rect { x: 0, y: 18, width: 7, height: 2 });
    }

    #[test]
    fn aspect_ratio_is_orientation_free() {
        let wide = Rect { x: 0, y: 0, width: 30, height: 20 };
        let tall = Rect { x: 0, y: 0, width: 20, height: 30 };
        assert_eq!(wide.aspect_ratio(), tall.aspect_ratio());
    }
}
