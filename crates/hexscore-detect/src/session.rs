//! Scan session: the tick-driven orchestration of preprocessing, shape
//! validation, stabilization, lock and one-shot scoring.
//!
//! The session is cooperatively scheduled: an external timer re-enters
//! `tick` once per period and each tick runs to completion, so no two
//! ticks overlap and the shared detection state needs no locking. The one
//! deferred action (lock confirmation to analysis hand-off) is modeled as
//! a deadline checked by subsequent ticks, which makes it trivially
//! cancelable and testable with injected time.

use std::time::Instant;

use hexscore_core::{Rect, RgbFrame};
use hexscore_color::{score_frame, PlayerProfile, ScoreResult, ScorerParams};

use crate::detector::BoardDetector;
use crate::error::{CaptureError, SessionError};
use crate::params::StabilityParams;
use crate::stability::{LockPhase, StabilityTracker};

/// Pulls the next available camera frame on demand. The session never
/// blocks waiting for a frame; it is ticked once one is ready.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RgbFrame, CaptureError>;
}

/// Per-tick UI feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub locked: bool,
    pub progress_percent: u32,
}

/// Consumer of session signals. All methods default to no-ops so tests and
/// simple callers implement only what they need.
pub trait ScanObserver {
    fn on_progress(&mut self, _update: ProgressUpdate) {}
    /// The lock triggered; `frame` is the frozen frame that will be
    /// analyzed after the confirmation delay.
    fn on_locked(&mut self, _frame: &RgbFrame) {}
    fn on_result(&mut self, _result: &ScoreResult) {}
    fn on_error(&mut self, _error: &SessionError) {}
}

struct PendingAnalysis {
    frame: RgbFrame,
    region: Option<Rect>,
    fire_at: Instant,
}

/// One scan session: explicit, resettable state for a single attempt at
/// locking and scoring a board.
pub struct ScanSession {
    detector: BoardDetector,
    stability_params: StabilityParams,
    scorer_params: ScorerParams,
    players: Vec<PlayerProfile>,
    stability: StabilityTracker,
    pending: Option<PendingAnalysis>,
    consecutive_failures: u32,
    active: bool,
}

impl ScanSession {
    pub fn new(
        detector: BoardDetector,
        stability_params: StabilityParams,
        scorer_params: ScorerParams,
        players: Vec<PlayerProfile>,
    ) -> Self {
        let stability = StabilityTracker::new(&stability_params);
        Self {
            detector,
            stability_params,
            scorer_params,
            players,
            stability,
            pending: None,
            consecutive_failures: 0,
            active: false,
        }
    }

    /// Begin scanning. Returns `false` (and changes nothing) if a scan is
    /// already active, so the loop cannot be started twice concurrently.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.reset();
        self.active = true;
        log::info!("scan session started");
        true
    }

    /// Stop scanning and cancel any pending analysis. Idempotent.
    pub fn stop(&mut self) {
        if self.active {
            log::info!("scan session stopped");
        }
        self.active = false;
        self.pending = None;
    }

    /// Restore the searching state and cancel the deferred analysis.
    pub fn reset(&mut self) {
        self.stability.reset();
        self.pending = None;
        self.consecutive_failures = 0;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn phase(&self) -> LockPhase {
        self.stability.phase()
    }

    /// Board region in native-frame coordinates, if one is currently held.
    #[inline]
    pub fn board_region(&self) -> Option<Rect> {
        self.stability.region()
    }

    /// Run one scan tick: pull a frame, detect, advance the stabilizer,
    /// and fire the deferred analysis once its deadline passes.
    ///
    /// Safe to call at any rate; does nothing when the session is not
    /// active. A capture failure is fatal to the session, a processing
    /// failure is not.
    pub fn tick<S: FrameSource + ?Sized, O: ScanObserver + ?Sized>(
        &mut self,
        source: &mut S,
        now: Instant,
        observer: &mut O,
    ) {
        if !self.active {
            return;
        }

        if self.pending.is_some() {
            self.poll_pending(now, observer);
            return;
        }

        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("frame capture failed: {e}");
                let err = SessionError::Capture(e);
                observer.on_error(&err);
                self.active = false;
                return;
            }
        };

        match self.detector.detect(&frame.view()) {
            Ok(Some(candidate)) => {
                self.consecutive_failures = 0;
                let sx = frame.width as f64 / self.detector.params().scan_width as f64;
                let sy = frame.height as f64 / self.detector.params().scan_height as f64;
                let region = candidate
                    .bounding
                    .scaled(sx, sy)
                    .clamped_to(frame.width, frame.height);

                let locked_now = self.stability.observe_hit(region);
                observer.on_progress(ProgressUpdate {
                    locked: self.stability.is_locked(),
                    progress_percent: self.stability.progress_percent(),
                });

                if locked_now {
                    observer.on_locked(&frame);
                    self.pending = Some(PendingAnalysis {
                        frame,
                        region: self.stability.region(),
                        fire_at: now + self.stability_params.lock_delay,
                    });
                }
            }
            Ok(None) => {
                self.consecutive_failures = 0;
                self.miss(observer);
            }
            Err(e) => {
                log::warn!("tick processing failed, treating as no candidate: {e}");
                self.consecutive_failures += 1;
                if self.consecutive_failures == self.stability_params.max_consecutive_failures {
                    observer.on_error(&SessionError::Degraded {
                        consecutive: self.consecutive_failures,
                        last: e,
                    });
                }
                self.miss(observer);
            }
        }
    }

    fn miss<O: ScanObserver + ?Sized>(&mut self, observer: &mut O) {
        self.stability.observe_miss();
        observer.on_progress(ProgressUpdate {
            locked: false,
            progress_percent: self.stability.progress_percent(),
        });
    }

    fn poll_pending<O: ScanObserver + ?Sized>(&mut self, now: Instant, observer: &mut O) {
        let Some(pending) = self.pending.take_if(|p| now >= p.fire_at) else {
            return;
        };
        log::info!("running full analysis on the frozen frame");
        let report = score_frame(
            &pending.frame.view(),
            pending.region,
            &self.players,
            &self.scorer_params,
        );
        observer.on_result(&report.result);
        // Advisory per-player failures are surfaced after the result so
        // the consumer always receives the (partial) scores first.
        for (player, source) in report.failures {
            observer.on_error(&SessionError::Scoring { player, source });
        }
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DetectorParams;
    use hexscore_color::PlayerColor;
    use std::time::Duration;

    /// Serves frames from a fixed cyclic script.
    struct ScriptedSource {
        frames: Vec<RgbFrame>,
        next: usize,
    }

    impl FrameSource for ScriptedSource {
        fn next_frame(&mut self) -> Result<RgbFrame, CaptureError> {
            if self.frames.is_empty() {
                return Err(CaptureError::Unavailable);
            }
            let frame = self.frames[self.next % self.frames.len()].clone();
            self.next += 1;
            Ok(frame)
        }
    }

    #[derive(Default)]
    struct Recorder {
        progress: Vec<ProgressUpdate>,
        locked_frames: usize,
        results: Vec<ScoreResult>,
        errors: Vec<String>,
    }

    impl ScanObserver for Recorder {
        fn on_progress(&mut self, update: ProgressUpdate) {
            self.progress.push(update);
        }
        fn on_locked(&mut self, _frame: &RgbFrame) {
            self.locked_frames += 1;
        }
        fn on_result(&mut self, result: &ScoreResult) {
            self.results.push(result.clone());
        }
        fn on_error(&mut self, error: &SessionError) {
            self.errors.push(error.to_string());
        }
    }

    fn hexagon_frame() -> RgbFrame {
        let mut frame = RgbFrame::new(320, 240);
        frame.data.fill(200);
        for y in 0..240usize {
            for x in 0..320usize {
                let dx = x as f64 - 160.0;
                let dy = y as f64 - 120.0;
                let inside = (0..6).all(|s| {
                    let a = (s as f64 + 0.5) / 6.0 * std::f64::consts::TAU;
                    dx * a.cos() + dy * a.sin() <= 90.0 * (std::f64::consts::PI / 6.0).cos()
                });
                if inside {
                    let i = (y * 320 + x) * 3;
                    frame.data[i] = 30;
                    frame.data[i + 1] = 30;
                    frame.data[i + 2] = 30;
                }
            }
        }
        frame
    }

    fn blank_frame() -> RgbFrame {
        let mut frame = RgbFrame::new(320, 240);
        frame.data.fill(200);
        frame
    }

    fn session() -> ScanSession {
        ScanSession::new(
            BoardDetector::new(DetectorParams::default(), None),
            StabilityParams::default(),
            ScorerParams::default(),
            vec![
                PlayerProfile::new("Ada", PlayerColor::Magenta),
                PlayerProfile::new("Ben", PlayerColor::Yellow),
            ],
        )
    }

    #[test]
    fn start_is_guarded_and_stop_is_idempotent() {
        let mut s = session();
        assert!(s.start());
        assert!(!s.start());
        s.stop();
        s.stop();
        assert!(!s.is_active());
        assert!(s.start());
    }

    #[test]
    fn six_board_frames_lock_and_deliver_a_result() {
        let mut s = session();
        let mut source = ScriptedSource {
            frames: vec![hexagon_frame()],
            next: 0,
        };
        let mut rec = Recorder::default();
        let t0 = Instant::now();
        s.start();

        for i in 0..6 {
            s.tick(&mut source, t0 + Duration::from_millis(150 * i), &mut rec);
        }
        assert_eq!(rec.locked_frames, 1);
        assert_eq!(s.phase(), LockPhase::Locked);
        assert!(rec.results.is_empty(), "analysis waits for the delay");

        // Before the 600 ms delay nothing fires; after it, the result
        // arrives and the session ends.
        s.tick(&mut source, t0 + Duration::from_millis(1000), &mut rec);
        assert!(rec.results.is_empty());
        s.tick(&mut source, t0 + Duration::from_millis(1600), &mut rec);
        assert_eq!(rec.results.len(), 1);
        assert!(!s.is_active());
        // Board has no pieces painted on it.
        assert!(rec.results[0].is_empty_board());
        assert_eq!(rec.progress.last().unwrap().progress_percent, 100);
    }

    #[test]
    fn blank_frames_never_lock() {
        let mut s = session();
        let mut source = ScriptedSource {
            frames: vec![blank_frame()],
            next: 0,
        };
        let mut rec = Recorder::default();
        s.start();
        let t0 = Instant::now();
        for i in 0..10 {
            s.tick(&mut source, t0 + Duration::from_millis(150 * i), &mut rec);
        }
        assert_eq!(rec.locked_frames, 0);
        assert_eq!(s.phase(), LockPhase::Searching);
        assert!(s.is_active());
    }

    #[test]
    fn reset_before_the_delay_cancels_the_analysis() {
        let mut s = session();
        let mut source = ScriptedSource {
            frames: vec![hexagon_frame()],
            next: 0,
        };
        let mut rec = Recorder::default();
        let t0 = Instant::now();
        s.start();
        for i in 0..6 {
            s.tick(&mut source, t0 + Duration::from_millis(150 * i), &mut rec);
        }
        assert_eq!(s.phase(), LockPhase::Locked);

        s.reset();
        s.tick(&mut source, t0 + Duration::from_secs(10), &mut rec);
        assert!(rec.results.is_empty());
        assert!(s.is_active(), "session keeps scanning after a reset");
    }

    #[test]
    fn capture_failure_ends_the_session() {
        let mut s = session();
        let mut source = ScriptedSource {
            frames: Vec::new(),
            next: 0,
        };
        let mut rec = Recorder::default();
        s.start();
        s.tick(&mut source, Instant::now(), &mut rec);
        assert!(!s.is_active());
        assert_eq!(rec.errors.len(), 1);
        assert!(rec.errors[0].contains("no frame source"));
    }

    #[test]
    fn consecutive_processing_failures_surface_one_degraded_warning() {
        struct BadFrames;
        impl FrameSource for BadFrames {
            fn next_frame(&mut self) -> Result<RgbFrame, CaptureError> {
                // Wrong buffer length: processing fails every tick.
                Ok(RgbFrame {
                    width: 320,
                    height: 240,
                    data: vec![0; 16],
                })
            }
        }
        let mut s = session();
        let mut rec = Recorder::default();
        s.start();
        let t0 = Instant::now();
        for i in 0..5 {
            s.tick(&mut BadFrames, t0 + Duration::from_millis(150 * i), &mut rec);
        }
        assert!(s.is_active(), "processing failures are not fatal");
        let degraded: Vec<_> = rec
            .errors
            .iter()
            .filter(|e| e.contains("consecutive"))
            .collect();
        assert_eq!(degraded.len(), 1, "warning fires once at the threshold");
    }
}
