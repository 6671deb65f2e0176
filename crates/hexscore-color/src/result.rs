use serde::{Deserialize, Serialize};

use crate::profile::PlayerColor;

/// One player's final piece count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub name: String,
    pub color: PlayerColor,
    pub pieces: u32,
}

/// Scores of one full analysis, in roster order. Produced once per locked
/// frame and handed to the result consumer; nothing mutates it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    entries: Vec<PlayerScore>,
}

impl ScoreResult {
    pub fn new(entries: Vec<PlayerScore>) -> Self {
        Self { entries }
    }

    /// Entries in the order the players were supplied.
    pub fn entries(&self) -> &[PlayerScore] {
        &self.entries
    }

    /// Entries sorted by descending piece count. The sort is stable, so
    /// equal scores keep roster order.
    pub fn ranked(&self) -> Vec<&PlayerScore> {
        let mut ranked: Vec<&PlayerScore> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.pieces.cmp(&a.pieces));
        ranked
    }

    pub fn winner(&self) -> Option<&PlayerScore> {
        self.ranked().first().copied()
    }

    /// True when no player scored anything, i.e. the analysis found no
    /// pieces at all.
    pub fn is_empty_board(&self) -> bool {
        self.entries.iter().all(|e| e.pieces == 0)
    }
}
