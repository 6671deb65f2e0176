//! Frame preprocessing: normalize a raw camera frame into a binary mask
//! and its external contours.

use hexscore_core::{
    adaptive_threshold, find_external_contours, gaussian_blur, morph_close, resize_gray,
    rgb_to_gray, Contour, GrayImage, RgbFrameView,
};

use crate::error::ProcessError;
use crate::params::DetectorParams;

/// Output of one preprocessing pass. All buffers are freshly owned and
/// dropped when the pass ends; nothing refers back to the input frame.
#[derive(Debug)]
pub struct PreprocessedFrame {
    /// Detection-resolution grayscale frame (template matching crops from
    /// this).
    pub gray: GrayImage,
    /// Binary edge/region mask after adaptive threshold and closing.
    pub mask: GrayImage,
    /// Outer boundaries of the foreground components, plus the outer
    /// boundaries of the dark separator bands between them. Holes inside a
    /// component are not reported.
    pub contours: Vec<Contour>,
}

/// Downscale, grayscale, denoise, binarize and extract contours.
pub fn preprocess_frame(
    frame: &RgbFrameView<'_>,
    params: &DetectorParams,
) -> Result<PreprocessedFrame, ProcessError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(ProcessError::DegenerateFrame {
            width: frame.width,
            height: frame.height,
        });
    }
    let expected = frame.width * frame.height * 3;
    if frame.data.len() != expected {
        return Err(ProcessError::BufferMismatch {
            expected,
            got: frame.data.len(),
        });
    }

    let native_gray = rgb_to_gray(frame);
    let gray = resize_gray(&native_gray.view(), params.scan_width, params.scan_height);
    let blurred = gaussian_blur(&gray.view(), params.blur_ksize);
    let binary = adaptive_threshold(&blurred.view(), params.threshold_block, params.threshold_c);
    let mask = morph_close(&binary.view(), params.close_ksize);
    let mut contours = find_external_contours(&mask.view());

    // The adaptive threshold renders uniform regions as foreground and the
    // contrast bands between them as background, so the band around the
    // board edge is its own dark loop. Its outer rim follows the board
    // outline even when bright pieces punch halos into the thresholded
    // interior, so trace the bands too via the inverted mask.
    let mut inverted = GrayImage::new(mask.width, mask.height);
    for (dst, &v) in inverted.data.iter_mut().zip(mask.data.iter()) {
        *dst = 255 - v;
    }
    contours.extend(find_external_contours(&inverted.view()));

    log::trace!(
        "preprocess: {}x{} -> {}x{}, {} contour(s)",
        frame.width,
        frame.height,
        params.scan_width,
        params.scan_height,
        contours.len()
    );

    Ok(PreprocessedFrame {
        gray,
        mask,
        contours,
    })
}
