//! High-level facade crate for the `hexscore-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying crates
//! - (feature-gated) helpers that bridge the `image` crate to the internal
//!   frame types and run detection or scoring on decoded images
//! - a small CLI (`hexscore`) for scoring still photos and simulating a
//!   scan session over a directory of frames.
//!
//! ## Quickstart
//!
//! ```no_run
//! use hexscore::analyze;
//! use hexscore::color::{PlayerColor, PlayerProfile};
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = ImageReader::open("board.jpg")?.decode()?.to_rgb8();
//! let players = vec![
//!     PlayerProfile::new("Ada", PlayerColor::Magenta),
//!     PlayerProfile::new("Ben", PlayerColor::Yellow),
//! ];
//! let report = analyze::score_image(&img, None, &players);
//! for entry in report.result.ranked() {
//!     println!("{}: {}", entry.name, entry.pieces);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `hexscore::core`: image buffers, filters, contours.
//! - `hexscore::detect`: board detection, stability lock, scan session.
//! - `hexscore::color`: player profiles, HSV scoring, results.
//! - `hexscore::analyze` (feature `image`): helpers from `image::RgbImage`.

pub use hexscore_color as color;
pub use hexscore_core as core;
pub use hexscore_detect as detect;

pub use hexscore_color::{PlayerColor, PlayerProfile, PlayerRoster, ScoreResult};
pub use hexscore_detect::{
    BoardDetector, DetectorParams, ScanObserver, ScanSession, StabilityParams,
};

#[cfg(feature = "image")]
pub mod analyze;
