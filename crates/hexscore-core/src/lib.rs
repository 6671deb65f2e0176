//! Core image types and pixel utilities for hexagonal-board scoring.
//!
//! This crate is intentionally small and purely pixel-level. It does *not*
//! know anything about boards, players or scan sessions; it provides the
//! buffers, filters and contour geometry the detector crates build on.

mod contour;
mod filter;
mod image;
mod logger;
mod polygon;
mod rect;

pub use contour::{find_external_contours, Contour};
pub use filter::{adaptive_threshold, dilate, erode, gaussian_blur, morph_close, morph_open};
pub use image::{
    crop_gray, crop_rgb, resize_gray, rgb_to_gray, sample_bilinear, sample_bilinear_u8, GrayImage,
    GrayImageView, RgbFrame, RgbFrameView,
};
pub use polygon::{approx_polygon, is_convex};
pub use rect::Rect;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
