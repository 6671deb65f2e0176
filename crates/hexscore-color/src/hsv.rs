//! RGB to HSV conversion and in-range masking, using the 8-bit convention
//! with hue in `0..180` so the profile constants apply directly.

use hexscore_core::{GrayImage, RgbFrameView};

use crate::profile::ColorRange;

/// Interleaved 8-bit HSV image, hue scaled to `0..180`.
#[derive(Clone, Debug)]
pub struct HsvImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>, // h, s, v per pixel
}

#[inline]
pub fn rgb_to_hsv_pixel(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };
    let h = if delta <= 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    [
        (h / 2.0).round().clamp(0.0, 179.0) as u8,
        s.round().clamp(0.0, 255.0) as u8,
        v.round().clamp(0.0, 255.0) as u8,
    ]
}

pub fn rgb_to_hsv(frame: &RgbFrameView<'_>) -> HsvImage {
    let mut data = vec![0u8; frame.width * frame.height * 3];
    for (dst, px) in data.chunks_exact_mut(3).zip(frame.data.chunks_exact(3)) {
        dst.copy_from_slice(&rgb_to_hsv_pixel(px[0], px[1], px[2]));
    }
    HsvImage {
        width: frame.width,
        height: frame.height,
        data,
    }
}

/// Binary mask of pixels whose HSV channels fall inside the range,
/// component-wise inclusive. The fourth range channel has no frame
/// counterpart and is ignored.
pub fn in_range_mask(hsv: &HsvImage, range: &ColorRange) -> GrayImage {
    let mut mask = GrayImage::new(hsv.width, hsv.height);
    for (dst, px) in mask.data.iter_mut().zip(hsv.data.chunks_exact(3)) {
        let inside = (0..3).all(|c| px[c] >= range.low[c] && px[c] <= range.high[c]);
        *dst = if inside { 255 } else { 0 };
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PlayerColor;

    #[test]
    fn primaries_map_to_expected_hues() {
        assert_eq!(rgb_to_hsv_pixel(255, 0, 0), [0, 255, 255]);
        assert_eq!(rgb_to_hsv_pixel(0, 255, 0), [60, 255, 255]);
        assert_eq!(rgb_to_hsv_pixel(0, 0, 255), [120, 255, 255]);
        assert_eq!(rgb_to_hsv_pixel(0, 0, 0), [0, 0, 0]);
        assert_eq!(rgb_to_hsv_pixel(255, 255, 255), [0, 0, 255]);
    }

    #[test]
    fn player_colors_fall_inside_their_own_range() {
        // Representative sRGB values for each piece color.
        let samples = [
            (PlayerColor::Magenta, [233u8, 30u8, 99u8]),
            (PlayerColor::Yellow, [255, 214, 0]),
            (PlayerColor::Blue, [41, 98, 255]),
            (PlayerColor::Green, [0, 200, 83]),
        ];
        for (color, [r, g, b]) in samples {
            let hsv = rgb_to_hsv_pixel(r, g, b);
            let range = color.range();
            for c in 0..3 {
                assert!(
                    hsv[c] >= range.low[c] && hsv[c] <= range.high[c],
                    "{color:?} channel {c}: {} not in [{}, {}]",
                    hsv[c],
                    range.low[c],
                    range.high[c]
                );
            }
        }
    }

    #[test]
    fn mask_marks_only_in_range_pixels() {
        let frame = hexscore_core::RgbFrame {
            width: 2,
            height: 1,
            data: vec![233, 30, 99, 0, 200, 83],
        };
        let hsv = rgb_to_hsv(&frame.view());
        let mask = in_range_mask(&hsv, &PlayerColor::Magenta.range());
        assert_eq!(mask.data, vec![255, 0]);
    }
}
