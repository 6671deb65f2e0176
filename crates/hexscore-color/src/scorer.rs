//! Color-segmentation scoring of a locked frame.
//!
//! Each player's mask is built, cleaned and counted independently; players
//! never share mutable state, so scoring order cannot change any count and
//! a failure for one player leaves the others intact.

use hexscore_core::{crop_rgb, dilate, find_external_contours, morph_open, Rect, RgbFrameView};
use serde::{Deserialize, Serialize};

use crate::hsv::{in_range_mask, rgb_to_hsv, HsvImage};
use crate::profile::{ColorRange, PlayerProfile};
use crate::result::{PlayerScore, ScoreResult};

/// Configuration of the piece-counting pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScorerParams {
    /// Kernel size of the opening that removes speckle noise, and of the
    /// following dilation that reconnects fragmented piece blobs.
    pub open_ksize: usize,
    /// Minimum blob area counted as a piece. Filters sensor noise and thin
    /// color bleed from neighboring regions.
    pub min_piece_area: f64,
}

impl Default for ScorerParams {
    fn default() -> Self {
        Self {
            open_ksize: 5,
            min_piece_area: 250.0,
        }
    }
}

/// Per-player scoring failures.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("analysis region is empty")]
    EmptyRegion,
    #[error("frame buffer length mismatch (expected {expected} bytes, got {got})")]
    BufferMismatch { expected: usize, got: usize },
}

/// Full analysis output: the result plus any per-player failures that were
/// recovered by scoring that player 0.
#[derive(Debug)]
pub struct ScoreReport {
    pub result: ScoreResult,
    pub failures: Vec<(String, ScoreError)>,
}

/// Count the pieces of one color range in an HSV image.
pub fn count_pieces(
    hsv: &HsvImage,
    range: &ColorRange,
    params: &ScorerParams,
) -> Result<u32, ScoreError> {
    if hsv.width == 0 || hsv.height == 0 {
        return Err(ScoreError::EmptyRegion);
    }
    let mask = in_range_mask(hsv, range);
    let opened = morph_open(&mask.view(), params.open_ksize);
    let rejoined = dilate(&opened.view(), params.open_ksize);

    let mut count = 0u32;
    for contour in find_external_contours(&rejoined.view()) {
        if contour.area() > params.min_piece_area {
            count += 1;
        }
    }
    Ok(count)
}

/// Score a frozen frame, optionally cropped to the locked board region.
///
/// Scores are fully independent per player; overlapping color ranges may
/// double-count the same physical area, which is accepted. A failure for
/// one player scores that player 0 and is reported in the failure list.
pub fn score_frame(
    frame: &RgbFrameView<'_>,
    region: Option<Rect>,
    players: &[PlayerProfile],
    params: &ScorerParams,
) -> ScoreReport {
    let expected = frame.width * frame.height * 3;
    if frame.data.len() != expected {
        let got = frame.data.len();
        return ScoreReport {
            result: ScoreResult::new(
                players
                    .iter()
                    .map(|p| PlayerScore {
                        name: p.name.clone(),
                        color: p.color,
                        pieces: 0,
                    })
                    .collect(),
            ),
            failures: players
                .iter()
                .map(|p| (p.name.clone(), ScoreError::BufferMismatch { expected, got }))
                .collect(),
        };
    }

    let cropped;
    let view = match region {
        Some(rect) => {
            cropped = crop_rgb(frame, rect);
            cropped.view()
        }
        None => *frame,
    };
    let hsv = rgb_to_hsv(&view);

    let mut entries = Vec::with_capacity(players.len());
    let mut failures = Vec::new();
    for player in players {
        let pieces = match count_pieces(&hsv, &player.color.range(), params) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("scoring failed for {}: {e}", player.name);
                failures.push((player.name.clone(), e));
                0
            }
        };
        log::debug!("{} ({:?}): {} piece(s)", player.name, player.color, pieces);
        entries.push(PlayerScore {
            name: player.name.clone(),
            color: player.color,
            pieces,
        });
    }

    ScoreReport {
        result: ScoreResult::new(entries),
        failures,
    }
}
