//! Player color profiles and HSV piece-count scoring.
//!
//! Given a frozen camera frame and the player roster, this crate segments
//! each player's configured color range and counts discrete piece blobs,
//! producing the ranked score of one game.

mod hsv;
mod profile;
mod result;
mod scorer;

pub use hsv::{in_range_mask, rgb_to_hsv, rgb_to_hsv_pixel, HsvImage};
pub use profile::{
    ColorRange, PlayerColor, PlayerProfile, PlayerRoster, MAX_PLAYERS, MIN_PLAYERS,
};
pub use result::{PlayerScore, ScoreResult};
pub use scorer::{count_pieces, score_frame, ScoreError, ScoreReport, ScorerParams};
