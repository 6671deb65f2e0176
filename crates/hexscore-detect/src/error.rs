use hexscore_color::ScoreError;

/// Errors raised when acquiring frames from the capture source.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("no frame source available")]
    Unavailable,
    #[error("frame source denied: {0}")]
    Denied(String),
    #[error("frame stream ended")]
    EndOfStream,
}

/// Per-tick processing failures. These are recovered locally: the tick is
/// treated as "no candidate" and scanning continues.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("degenerate frame ({width}x{height})")]
    DegenerateFrame { width: usize, height: usize },
    #[error("frame buffer length mismatch (expected {expected} bytes, got {got})")]
    BufferMismatch { expected: usize, got: usize },
}

/// Session-level failures delivered through `ScanObserver::on_error`.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// Fatal: the session cannot obtain frames and stops.
    #[error(transparent)]
    Capture(#[from] CaptureError),
    /// Advisory: several consecutive ticks failed to process; scanning
    /// keeps going but the session is degraded.
    #[error("processing failed on {consecutive} consecutive ticks: {last}")]
    Degraded {
        consecutive: u32,
        #[source]
        last: ProcessError,
    },
    /// Advisory: one player's color segmentation failed; that player scored
    /// 0 and the rest of the result is valid.
    #[error("scoring failed for player {player}: {source}")]
    Scoring {
        player: String,
        #[source]
        source: ScoreError,
    },
}
