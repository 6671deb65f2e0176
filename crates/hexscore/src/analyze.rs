//! Bridges from the `image` crate to the internal frame types, plus
//! end-to-end helpers over decoded images.

use std::path::Path;

use hexscore_color::{score_frame, PlayerProfile, ScoreReport, ScorerParams};
use hexscore_core::{GrayImage, Rect, RgbFrame, RgbFrameView};
use hexscore_detect::{BoardDetector, Candidate, DetectorParams, ProcessError};

/// Errors produced by the high-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode image: {0}")]
    Decode(#[from] ::image::ImageError),
}

/// Borrow an `image::RgbImage` as the lightweight internal view type.
pub fn frame_view(img: &::image::RgbImage) -> RgbFrameView<'_> {
    RgbFrameView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy an `image::RgbImage` into an owned frame.
pub fn frame_from_image(img: &::image::RgbImage) -> RgbFrame {
    RgbFrame {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

/// Convert an `image::GrayImage` into the internal grayscale buffer.
pub fn gray_from_image(img: &::image::GrayImage) -> GrayImage {
    GrayImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw().clone(),
    }
}

/// Load the optional reference template. A missing file is not an error:
/// the matcher then runs in neutral pass-through mode, exactly as when no
/// template was configured.
pub fn load_reference_template(path: &Path) -> Result<Option<GrayImage>, AnalyzeError> {
    if !path.exists() {
        log::info!("reference template {} not found", path.display());
        return Ok(None);
    }
    let img = ::image::ImageReader::open(path)?.decode()?.to_luma8();
    Ok(Some(gray_from_image(&img)))
}

/// Run one detection pass over a decoded image.
pub fn detect_board(
    img: &::image::RgbImage,
    params: &DetectorParams,
    template: Option<GrayImage>,
) -> Result<Option<Candidate>, ProcessError> {
    let detector = BoardDetector::new(params.clone(), template);
    detector.detect(&frame_view(img))
}

/// Score a still image as if it were the frozen frame of a locked session.
pub fn score_image(
    img: &::image::RgbImage,
    region: Option<Rect>,
    players: &[PlayerProfile],
) -> ScoreReport {
    score_frame(&frame_view(img), region, players, &ScorerParams::default())
}

/// Detect the board in a still image and score only the found region;
/// falls back to scoring the full image when no board is detected.
pub fn detect_and_score(
    img: &::image::RgbImage,
    params: &DetectorParams,
    template: Option<GrayImage>,
    players: &[PlayerProfile],
) -> Result<ScoreReport, ProcessError> {
    let view = frame_view(img);
    let detector = BoardDetector::new(params.clone(), template);
    let region = detector.detect(&view)?.map(|c| {
        let sx = view.width as f64 / params.scan_width as f64;
        let sy = view.height as f64 / params.scan_height as f64;
        c.bounding
            .scaled(sx, sy)
            .clamped_to(view.width, view.height)
    });
    if region.is_none() {
        log::warn!("no board detected, scoring the full frame");
    }
    Ok(score_frame(
        &view,
        region,
        players,
        &ScorerParams::default(),
    ))
}
