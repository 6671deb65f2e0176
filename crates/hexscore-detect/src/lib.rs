//! Hexagonal board detection from live camera frames.
//!
//! The pipeline turns one raw frame into at most one board candidate per
//! tick and debounces those signals over time:
//!
//! 1. Preprocess: downscale, grayscale, blur, adaptive threshold, close,
//!    external contours.
//! 2. Validate each contour against the hexagonal board geometry.
//! 3. Optionally refine with template similarity against a reference
//!    image.
//! 4. Select the best candidate by `area x template score`.
//! 5. Advance the stability state machine; on sustained detection the
//!    session locks, freezes the frame and hands it to the color scorer.
//!
//! ## Quickstart
//!
//! ```
//! use hexscore_detect::{BoardDetector, DetectorParams};
//! use hexscore_core::RgbFrame;
//!
//! let detector = BoardDetector::new(DetectorParams::default(), None);
//! let frame = RgbFrame::new(640, 480);
//! let candidate = detector.detect(&frame.view()).unwrap();
//! println!("detected: {}", candidate.is_some());
//! ```

mod detector;
mod error;
mod params;
mod preprocess;
mod session;
mod shape;
mod stability;
mod template;

pub use detector::{BoardDetector, Candidate};
pub use error::{CaptureError, ProcessError, SessionError};
pub use params::{DetectorParams, StabilityParams};
pub use preprocess::{preprocess_frame, PreprocessedFrame};
pub use session::{FrameSource, ProgressUpdate, ScanObserver, ScanSession};
pub use shape::{validate_board_shape, ShapeReject, ShapeScore};
pub use stability::{LockPhase, StabilityTracker};
pub use template::TemplateMatcher;
