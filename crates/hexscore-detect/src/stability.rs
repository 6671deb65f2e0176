//! Temporal debouncing of per-frame detection signals.
//!
//! Raw contour detection is noisy (lighting flicker, motion blur, a hand
//! over the board). A candidate must be seen on several consecutive ticks
//! before the lock triggers; missed ticks decay the counter faster than
//! hits grow it, so a removed board resets promptly.

use hexscore_core::Rect;

use crate::params::StabilityParams;

/// Lock phases of one scan session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockPhase {
    /// No sustained detection yet.
    Searching,
    /// Candidate seen, counter rising.
    Accumulating,
    /// Terminal for the session; reset on the next session start.
    Locked,
}

/// Session-scoped stability state, evolved once per scan tick. Explicitly
/// owned and resettable so consecutive sessions (e.g. retry) start clean.
#[derive(Clone, Debug)]
pub struct StabilityTracker {
    required: u32,
    decay: u32,
    counter: u32,
    locked: bool,
    region: Option<Rect>,
}

impl StabilityTracker {
    pub fn new(params: &StabilityParams) -> Self {
        Self {
            required: params.required_stability.max(1),
            decay: params.decay_per_miss,
            counter: 0,
            locked: false,
            region: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> LockPhase {
        if self.locked {
            LockPhase::Locked
        } else if self.counter > 0 {
            LockPhase::Accumulating
        } else {
            LockPhase::Searching
        }
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Board region in native-frame coordinates from the most recent
    /// qualifying tick; frozen once locked, cleared on full reset.
    #[inline]
    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    /// UI progress toward the lock.
    pub fn progress_percent(&self) -> u32 {
        let pct = (self.counter as f64 / self.required as f64 * 100.0).round() as u32;
        pct.min(100)
    }

    /// A qualifying tick: the counter rises and the region follows the
    /// candidate. Returns `true` exactly once, on the tick that reaches
    /// the lock threshold.
    pub fn observe_hit(&mut self, region: Rect) -> bool {
        if self.locked {
            return false;
        }
        self.counter += 1;
        self.region = Some(region);
        if self.counter >= self.required {
            self.locked = true;
            log::info!("board locked after {} consecutive ticks", self.counter);
            return true;
        }
        false
    }

    /// A tick without a surviving candidate: decay the counter; at zero
    /// the session reverts fully to searching.
    pub fn observe_miss(&mut self) {
        if self.locked {
            return;
        }
        self.counter = self.counter.saturating_sub(self.decay);
        if self.counter == 0 && self.region.take().is_some() {
            log::debug!("detection lost, back to searching");
        }
    }

    /// Restore the initial searching state.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.locked = false;
        self.region = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: Rect = Rect { x: 10, y: 20, width: 100, height: 90 };

    fn tracker() -> StabilityTracker {
        StabilityTracker::new(&StabilityParams::default())
    }

    #[test]
    fn six_consecutive_hits_lock_exactly_once() {
        let mut t = tracker();
        for i in 1..=5 {
            assert!(!t.observe_hit(REGION), "tick {i} must not lock");
            assert_eq!(t.phase(), LockPhase::Accumulating);
        }
        assert!(t.observe_hit(REGION), "sixth tick locks");
        assert_eq!(t.phase(), LockPhase::Locked);
        // Further ticks never re-trigger.
        assert!(!t.observe_hit(REGION));
        assert!(t.is_locked());
    }

    #[test]
    fn five_hits_and_a_miss_do_not_lock() {
        let mut t = tracker();
        for _ in 0..5 {
            t.observe_hit(REGION);
        }
        t.observe_miss();
        assert_eq!(t.counter(), 3);
        assert!(!t.is_locked());
        // Needs three more hits now.
        assert!(!t.observe_hit(REGION));
        assert!(!t.observe_hit(REGION));
        assert!(t.observe_hit(REGION));
    }

    #[test]
    fn misses_decay_by_two_floored_at_zero() {
        let mut t = tracker();
        for _ in 0..3 {
            t.observe_hit(REGION);
        }
        t.observe_miss();
        assert_eq!(t.counter(), 1);
        t.observe_miss();
        assert_eq!(t.counter(), 0);
        t.observe_miss();
        assert_eq!(t.counter(), 0);
        assert_eq!(t.phase(), LockPhase::Searching);
        assert_eq!(t.region(), None);
    }

    #[test]
    fn region_clears_only_at_zero() {
        let mut t = tracker();
        for _ in 0..4 {
            t.observe_hit(REGION);
        }
        t.observe_miss();
        assert_eq!(t.region(), Some(REGION));
        t.observe_miss();
        assert_eq!(t.counter(), 0);
        assert_eq!(t.region(), None);
    }

    #[test]
    fn progress_follows_the_rounded_ratio() {
        let mut t = tracker();
        let expected = [0u32, 17, 33, 50, 67, 83, 100];
        assert_eq!(t.progress_percent(), expected[0]);
        for (i, &want) in expected.iter().enumerate().skip(1) {
            t.observe_hit(REGION);
            assert_eq!(t.progress_percent(), want, "counter {i}");
        }
    }

    #[test]
    fn reset_restores_searching() {
        let mut t = tracker();
        for _ in 0..6 {
            t.observe_hit(REGION);
        }
        assert!(t.is_locked());
        t.reset();
        assert_eq!(t.phase(), LockPhase::Searching);
        assert_eq!(t.counter(), 0);
        assert_eq!(t.region(), None);
    }
}
