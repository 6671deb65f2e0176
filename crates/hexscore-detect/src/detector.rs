//! Per-frame board detection: preprocess, validate shapes, apply the
//! template signal, select the best candidate.

use hexscore_core::{GrayImage, Rect, RgbFrameView};

use crate::error::ProcessError;
use crate::params::DetectorParams;
use crate::preprocess::preprocess_frame;
use crate::shape::{validate_board_shape, ShapeScore};
use crate::template::TemplateMatcher;

/// A contour that survived shape validation (and the template signal, when
/// active) in one tick.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Bounding rect in detection-frame coordinates.
    pub bounding: Rect,
    pub shape: ShapeScore,
    pub template_score: f32,
}

impl Candidate {
    /// Combined quality used for best-candidate selection.
    #[inline]
    pub fn quality(&self) -> f64 {
        self.shape.area * self.template_score as f64
    }
}

/// Stateless per-frame detector. Session state (stability counter, found
/// region) lives in the scan session, so a detector can serve consecutive
/// sessions.
#[derive(Debug)]
pub struct BoardDetector {
    params: DetectorParams,
    matcher: TemplateMatcher,
}

impl BoardDetector {
    pub fn new(params: DetectorParams, template: Option<GrayImage>) -> Self {
        let matcher = TemplateMatcher::new(template, params.neutral_template_score);
        if matcher.is_active() {
            log::info!("reference template loaded, similarity gating enabled");
        } else {
            log::info!("no reference template, shape detection only");
        }
        Self { params, matcher }
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Run one detection pass. `Ok(None)` means the frame processed cleanly
    /// but no contour survived validation.
    ///
    /// Ties in quality keep the first-seen candidate; consecutive frames
    /// converge the stabilizer regardless.
    pub fn detect(&self, frame: &RgbFrameView<'_>) -> Result<Option<Candidate>, ProcessError> {
        let pre = preprocess_frame(frame, &self.params)?;
        let frame_area = (self.params.scan_width * self.params.scan_height) as f64;

        let mut best: Option<Candidate> = None;
        for contour in &pre.contours {
            let shape = match validate_board_shape(contour, frame_area, &self.params) {
                Ok(shape) => shape,
                Err(reject) => {
                    log::trace!("contour rejected: {reject:?}");
                    continue;
                }
            };

            let bounding = contour.bounding_rect();
            let template_score = self.matcher.score_region(&pre.gray.view(), bounding);
            if self.matcher.is_active() && template_score < self.params.min_template_score {
                log::trace!("candidate rejected by template similarity {template_score:.2}");
                continue;
            }

            let candidate = Candidate {
                bounding,
                shape,
                template_score,
            };
            let better = best
                .as_ref()
                .map_or(true, |b| candidate.quality() > b.quality());
            if better {
                best = Some(candidate);
            }
        }

        if let Some(c) = &best {
            log::debug!(
                "best candidate: area={:.0} template={:.2} rect={:?}",
                c.shape.area,
                c.template_score,
                c.bounding
            );
        }
        Ok(best)
    }
}
