//! Scalar pixel filters used by the detection pipeline: Gaussian smoothing,
//! locally-adaptive binarization and square-kernel binary morphology.

use crate::image::{GrayImage, GrayImageView};

/// Symmetric 1D Gaussian kernel of odd size, normalized to sum 1.
///
/// Sigma follows the usual `0.3*((k-1)*0.5 - 1) + 0.8` rule so that a 7x7
/// blur behaves like the common library default.
fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    debug_assert!(ksize % 2 == 1);
    let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (ksize / 2) as i32;
    let mut k: Vec<f32> = (-half..=half)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = k.iter().sum();
    for v in &mut k {
        *v /= sum;
    }
    k
}

#[inline]
fn clamp_idx(i: i32, len: usize) -> usize {
    i.clamp(0, len as i32 - 1) as usize
}

/// Separable Gaussian blur with replicated borders.
pub fn gaussian_blur(src: &GrayImageView<'_>, ksize: usize) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let kernel = gaussian_kernel(ksize);
    let half = (ksize / 2) as i32;

    // Horizontal pass into a float scratch row buffer, then vertical.
    let mut tmp = vec![0f32; w * h];
    for y in 0..h {
        let row = &src.data[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = clamp_idx(x as i32 + ki as i32 - half, w);
                acc += kv * row[sx] as f32;
            }
            tmp[y * w + x] = acc;
        }
    }

    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = clamp_idx(y as i32 + ki as i32 - half, h);
                acc += kv * tmp[sy * w + x];
            }
            out.data[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Adaptive binarization: a pixel is foreground when it exceeds the
/// Gaussian-weighted mean of its `block`-sized neighborhood minus `c`.
///
/// This keeps board edges detectable under uneven lighting where a single
/// global threshold would wash out half the frame.
pub fn adaptive_threshold(src: &GrayImageView<'_>, block: usize, c: f32) -> GrayImage {
    let local_mean = gaussian_blur(src, block);
    let mut out = GrayImage::new(src.width, src.height);
    for ((dst, &px), &mean) in out
        .data
        .iter_mut()
        .zip(src.data.iter())
        .zip(local_mean.data.iter())
    {
        *dst = if px as f32 > mean as f32 - c { 255 } else { 0 };
    }
    out
}

fn morph_separable(src: &GrayImageView<'_>, ksize: usize, maximum: bool) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let half = (ksize / 2) as i32;

    // A square structuring element decomposes into a row pass and a
    // column pass of the same extremum.
    let mut tmp = vec![0u8; w * h];
    for y in 0..h {
        let row = &src.data[y * w..(y + 1) * w];
        for x in 0..w {
            let mut ext = if maximum { 0u8 } else { 255u8 };
            for dx in -half..=half {
                let v = row[clamp_idx(x as i32 + dx, w)];
                ext = if maximum { ext.max(v) } else { ext.min(v) };
            }
            tmp[y * w + x] = ext;
        }
    }

    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut ext = if maximum { 0u8 } else { 255u8 };
            for dy in -half..=half {
                let v = tmp[clamp_idx(y as i32 + dy, h) * w + x];
                ext = if maximum { ext.max(v) } else { ext.min(v) };
            }
            out.data[y * w + x] = ext;
        }
    }
    out
}

pub fn dilate(src: &GrayImageView<'_>, ksize: usize) -> GrayImage {
    morph_separable(src, ksize, true)
}

pub fn erode(src: &GrayImageView<'_>, ksize: usize) -> GrayImage {
    morph_separable(src, ksize, false)
}

/// Dilate then erode: fills small gaps so a board outline becomes one
/// closed boundary.
pub fn morph_close(src: &GrayImageView<'_>, ksize: usize) -> GrayImage {
    let dilated = dilate(src, ksize);
    erode(&dilated.view(), ksize)
}

/// Erode then dilate: removes speckle noise smaller than the kernel.
pub fn morph_open(src: &GrayImageView<'_>, ksize: usize) -> GrayImage {
    let eroded = erode(src, ksize);
    dilate(&eroded.view(), ksize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: usize, height: usize, data: Vec<u8>) -> GrayImage {
        assert_eq!(data.len(), width * height);
        GrayImage {
            width,
            height,
            data,
        }
    }

    #[test]
    fn blur_preserves_uniform_regions() {
        let img = image(9, 9, vec![50; 81]);
        let blurred = gaussian_blur(&img.view(), 7);
        assert!(blurred.data.iter().all(|&v| v == 50));
    }

    #[test]
    fn adaptive_threshold_tracks_local_contrast() {
        // A bright dot on a dark background stays foreground even though it
        // is far below the bright region elsewhere; a dark pixel bordering
        // that bright region falls below its local mean and drops out.
        let mut img = image(32, 32, vec![10; 1024]);
        img.data[5 * 32 + 5] = 90;
        for y in 0..32 {
            for x in 20..32 {
                img.data[y * 32 + x] = 240;
            }
        }
        let bin = adaptive_threshold(&img.view(), 11, 2.0);
        assert_eq!(bin.data[5 * 32 + 5], 255);
        assert_eq!(bin.data[5 * 32 + 19], 0);
        assert_eq!(bin.data[5 * 32 + 25], 255);
    }

    #[test]
    fn open_removes_single_pixel_speckle() {
        let mut img = image(16, 16, vec![0; 256]);
        img.data[8 * 16 + 8] = 255;
        let opened = morph_open(&img.view(), 3);
        assert!(opened.data.iter().all(|&v| v == 0));
    }

    #[test]
    fn close_bridges_one_pixel_gap() {
        let mut img = image(16, 16, vec![0; 256]);
        for x in 2..7 {
            img.data[8 * 16 + x] = 255;
        }
        for x in 8..13 {
            img.data[8 * 16 + x] = 255;
        }
        let closed = morph_close(&img.view(), 3);
        assert_eq!(closed.data[8 * 16 + 7], 255);
    }
}
