use crate::rect::Rect;

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

/// Interleaved 8-bit RGB frame, row-major, len = w*h*3.
#[derive(Clone, Copy, Debug)]
pub struct RgbFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

#[derive(Clone, Debug)]
pub struct RgbFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    #[inline]
    pub fn view(&self) -> RgbFrameView<'_> {
        RgbFrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl<'a> RgbFrameView<'a> {
    #[inline]
    pub fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

#[inline]
fn get_gray(src: &GrayImageView<'_>, x: i32, y: i32) -> u8 {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return 0;
    }
    src.data[y as usize * src.width + x as usize]
}

#[inline]
pub fn sample_bilinear(src: &GrayImageView<'_>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = get_gray(src, x0, y0) as f32;
    let p10 = get_gray(src, x0 + 1, y0) as f32;
    let p01 = get_gray(src, x0, y0 + 1) as f32;
    let p11 = get_gray(src, x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[inline]
pub fn sample_bilinear_u8(src: &GrayImageView<'_>, x: f32, y: f32) -> u8 {
    sample_bilinear(src, x, y).clamp(0.0, 255.0) as u8
}

/// Rec.601 luma conversion of an interleaved RGB frame.
pub fn rgb_to_gray(src: &RgbFrameView<'_>) -> GrayImage {
    let mut out = GrayImage::new(src.width, src.height);
    for (dst, px) in out.data.iter_mut().zip(src.data.chunks_exact(3)) {
        let y = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
        *dst = y.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Bilinear resize to an arbitrary target size. Works for both down- and
/// upscaling; the detection pass uses it to shrink native frames to the
/// fixed working resolution.
pub fn resize_gray(src: &GrayImageView<'_>, dst_w: usize, dst_h: usize) -> GrayImage {
    let mut out = GrayImage::new(dst_w, dst_h);
    if dst_w == 0 || dst_h == 0 || src.width == 0 || src.height == 0 {
        return out;
    }
    let sx = src.width as f32 / dst_w as f32;
    let sy = src.height as f32 / dst_h as f32;
    for y in 0..dst_h {
        let fy = (y as f32 + 0.5) * sy - 0.5;
        for x in 0..dst_w {
            let fx = (x as f32 + 0.5) * sx - 0.5;
            out.data[y * dst_w + x] = sample_bilinear_u8(src, fx, fy);
        }
    }
    out
}

/// Copy a rectangular region out of a grayscale image. The rect is clamped
/// to the image bounds first.
pub fn crop_gray(src: &GrayImageView<'_>, rect: Rect) -> GrayImage {
    let rect = rect.clamped_to(src.width, src.height);
    let (x0, y0) = (rect.x as usize, rect.y as usize);
    let (w, h) = (rect.width as usize, rect.height as usize);
    let mut out = GrayImage::new(w, h);
    for row in 0..h {
        let s = (y0 + row) * src.width + x0;
        out.data[row * w..(row + 1) * w].copy_from_slice(&src.data[s..s + w]);
    }
    out
}

/// Copy a rectangular region out of an RGB frame. The rect is clamped to
/// the frame bounds first.
pub fn crop_rgb(src: &RgbFrameView<'_>, rect: Rect) -> RgbFrame {
    let rect = rect.clamped_to(src.width, src.height);
    let (x0, y0) = (rect.x as usize, rect.y as usize);
    let (w, h) = (rect.width as usize, rect.height as usize);
    let mut out = RgbFrame::new(w, h);
    for row in 0..h {
        let s = ((y0 + row) * src.width + x0) * 3;
        out.data[row * w * 3..(row + 1) * w * 3].copy_from_slice(&src.data[s..s + w * 3]);
    }
    out
}
