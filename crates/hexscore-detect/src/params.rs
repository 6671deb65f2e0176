use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the per-frame board detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Fixed working width of the detection frame, independent of the
    /// camera resolution.
    pub scan_width: usize,
    /// Fixed working height of the detection frame.
    pub scan_height: usize,
    /// Gaussian blur kernel size applied before binarization.
    pub blur_ksize: usize,
    /// Neighborhood size of the adaptive threshold.
    pub threshold_block: usize,
    /// Constant subtracted from the local mean by the adaptive threshold.
    pub threshold_c: f32,
    /// Kernel size of the morphological closing that merges edge gaps.
    pub close_ksize: usize,
    /// Minimum contour area as a fraction of the detection-frame area.
    /// Smaller contours are noise specks.
    pub min_area_frac: f64,
    /// Maximum contour area fraction; larger contours are near-full-frame
    /// false positives.
    pub max_area_frac: f64,
    /// Polygon approximation tolerance relative to the contour perimeter.
    pub approx_epsilon_rel: f64,
    /// Accepted vertex-count window around the ideal hexagon. The window
    /// absorbs perspective skew and approximation noise.
    pub min_vertices: usize,
    pub max_vertices: usize,
    /// Maximum bounding-box side ratio; the board is roughly isotropic.
    pub max_aspect_ratio: f64,
    /// Minimum contour-area / bounding-rect-area ratio.
    pub min_compactness: f64,
    /// Minimum `4*pi*area / perimeter^2`.
    pub min_circularity: f64,
    /// Candidates scoring below this template similarity are rejected when
    /// a reference template is present.
    pub min_template_score: f32,
    /// Similarity reported when no template is loaded or matching fails.
    pub neutral_template_score: f32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            scan_width: 320,
            scan_height: 240,
            blur_ksize: 7,
            threshold_block: 11,
            threshold_c: 2.0,
            close_ksize: 3,
            min_area_frac: 0.08,
            max_area_frac: 0.85,
            approx_epsilon_rel: 0.02,
            min_vertices: 5,
            max_vertices: 8,
            max_aspect_ratio: 1.4,
            min_compactness: 0.55,
            min_circularity: 0.4,
            min_template_score: 0.4,
            neutral_template_score: 0.8,
        }
    }
}

/// Configuration of the detection stabilizer and scan session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StabilityParams {
    /// Consecutive qualifying ticks required before the lock triggers.
    pub required_stability: u32,
    /// Counter decay on a tick without a surviving candidate. Faster decay
    /// than growth keeps the session responsive to the board being moved.
    pub decay_per_miss: u32,
    /// Delay between the lock trigger and the one-shot analysis, so the
    /// confirmation can render. Cancelable by a session reset.
    pub lock_delay: Duration,
    /// Consecutive per-tick processing failures before a degraded-session
    /// warning is surfaced.
    pub max_consecutive_failures: u32,
}

impl Default for StabilityParams {
    fn default() -> Self {
        Self {
            required_stability: 6,
            decay_per_miss: 2,
            lock_delay: Duration::from_millis(600),
            max_consecutive_failures: 3,
        }
    }
}
