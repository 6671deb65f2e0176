//! Optional template-similarity refinement.
//!
//! A stored grayscale reference image of the board provides a secondary
//! confidence signal. The signal is advisory: every failure mode degrades
//! to a fixed neutral score instead of propagating.

use hexscore_core::{crop_gray, resize_gray, GrayImage, GrayImageView, Rect};

/// Matcher over an optional reference template. Without a template every
/// candidate receives the neutral score and is never rejected on
/// similarity grounds.
#[derive(Clone, Debug)]
pub struct TemplateMatcher {
    template: Option<GrayImage>,
    neutral: f32,
}

impl TemplateMatcher {
    pub fn new(template: Option<GrayImage>, neutral: f32) -> Self {
        let template = template.filter(|t| t.width > 1 && t.height > 1);
        Self { template, neutral }
    }

    /// Whether a reference template was loaded. Only an active matcher may
    /// reject candidates.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.template.is_some()
    }

    /// Similarity in [-1, 1] between the candidate region of the detection
    /// frame and the reference, or the neutral score when no template is
    /// loaded or the computation degenerates.
    pub fn score_region(&self, frame: &GrayImageView<'_>, region: Rect) -> f32 {
        let Some(template) = &self.template else {
            return self.neutral;
        };
        let roi = crop_gray(frame, region);
        if roi.width < 2 || roi.height < 2 {
            return self.neutral;
        }
        let resized = resize_gray(&roi.view(), template.width, template.height);
        normalized_correlation(&resized.view(), &template.view()).unwrap_or(self.neutral)
    }
}

/// Zero-mean normalized cross-correlation of two equally sized images.
/// `None` when either image has no variance.
fn normalized_correlation(a: &GrayImageView<'_>, b: &GrayImageView<'_>) -> Option<f32> {
    if a.width != b.width || a.height != b.height || a.data.is_empty() {
        return None;
    }
    let n = a.data.len() as f64;
    let mean_a = a.data.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_b = b.data.iter().map(|&v| v as f64).sum::<f64>() / n;

    let mut num = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&pa, &pb) in a.data.iter().zip(b.data.iter()) {
        let da = pa as f64 - mean_a;
        let db = pb as f64 - mean_b;
        num += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = (var_a * var_b).sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((num / denom) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(w: usize, h: usize) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.data[y * w + x] = ((x * 8 + y * 3) % 256) as u8;
            }
        }
        img
    }

    #[test]
    fn absent_template_always_returns_neutral() {
        let matcher = TemplateMatcher::new(None, 0.8);
        let frame = gradient_image(64, 64);
        let score = matcher.score_region(
            &frame.view(),
            Rect { x: 4, y: 4, width: 40, height: 40 },
        );
        assert_eq!(score, 0.8);
        assert!(!matcher.is_active());
    }

    #[test]
    fn identical_region_scores_near_one() {
        let frame = gradient_image(64, 64);
        let region = Rect { x: 8, y: 8, width: 32, height: 32 };
        let template = crop_gray(&frame.view(), region);
        let matcher = TemplateMatcher::new(Some(template), 0.8);
        let score = matcher.score_region(&frame.view(), region);
        assert!(score > 0.98, "got {score}");
    }

    #[test]
    fn inverted_region_scores_near_minus_one() {
        let frame = gradient_image(64, 64);
        let region = Rect { x: 8, y: 8, width: 32, height: 32 };
        let mut template = crop_gray(&frame.view(), region);
        for v in &mut template.data {
            *v = 255 - *v;
        }
        let matcher = TemplateMatcher::new(Some(template), 0.8);
        let score = matcher.score_region(&frame.view(), region);
        assert!(score < -0.9, "got {score}");
    }

    #[test]
    fn flat_region_degrades_to_neutral() {
        let template = gradient_image(16, 16);
        let matcher = TemplateMatcher::new(Some(template), 0.8);
        let flat = GrayImage {
            width: 32,
            height: 32,
            data: vec![128; 1024],
        };
        let score = matcher.score_region(
            &flat.view(),
            Rect { x: 0, y: 0, width: 32, height: 32 },
        );
        assert_eq!(score, 0.8);
    }

    #[test]
    fn degenerate_region_degrades_to_neutral() {
        let template = gradient_image(16, 16);
        let matcher = TemplateMatcher::new(Some(template), 0.8);
        let frame = gradient_image(64, 64);
        let score = matcher.score_region(
            &frame.view(),
            Rect { x: 63, y: 63, width: 10, height: 10 },
        );
        assert_eq!(score, 0.8);
    }
}
