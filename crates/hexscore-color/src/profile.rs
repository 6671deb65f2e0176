//! Player color identities and their HSV segmentation ranges.
//!
//! Colors form a closed enumeration with a static range table, so a typo
//! in a color name cannot surface at runtime and match arms are checked
//! for exhaustiveness.

use serde::{Deserialize, Serialize};

/// Inclusive per-channel bounds in HSV space. Channels are
/// `[hue, saturation, value, alpha]` with hue in `0..180`; the fourth
/// channel is carried for profile-format fidelity but frames have no alpha,
/// so it never constrains the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub low: [u8; 4],
    pub high: [u8; 4],
}

/// The piece colors the game ships with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Magenta,
    Yellow,
    Blue,
    Green,
}

impl PlayerColor {
    pub const ALL: [PlayerColor; 4] = [
        PlayerColor::Magenta,
        PlayerColor::Yellow,
        PlayerColor::Blue,
        PlayerColor::Green,
    ];

    /// HSV segmentation range for this color.
    pub fn range(self) -> ColorRange {
        match self {
            PlayerColor::Magenta => ColorRange {
                low: [140, 60, 60, 0],
                high: [175, 255, 255, 255],
            },
            PlayerColor::Yellow => ColorRange {
                low: [15, 80, 80, 0],
                high: [35, 255, 255, 255],
            },
            PlayerColor::Blue => ColorRange {
                low: [95, 80, 60, 0],
                high: [135, 255, 255, 255],
            },
            PlayerColor::Green => ColorRange {
                low: [35, 60, 60, 0],
                high: [85, 255, 255, 255],
            },
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PlayerColor::Magenta => "Magenta",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Blue => "Blue",
            PlayerColor::Green => "Green",
        }
    }
}

impl std::str::FromStr for PlayerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "magenta" => Ok(PlayerColor::Magenta),
            "yellow" => Ok(PlayerColor::Yellow),
            "blue" => Ok(PlayerColor::Blue),
            "green" => Ok(PlayerColor::Green),
            other => Err(format!("unknown player color '{other}'")),
        }
    }
}

/// Static per-player configuration, externally supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub color: PlayerColor,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Editable roster of 2-4 players with unique colors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRoster {
    players: Vec<PlayerProfile>,
}

impl Default for PlayerRoster {
    fn default() -> Self {
        Self {
            players: vec![
                PlayerProfile::new("Player 1", PlayerColor::Magenta),
                PlayerProfile::new("Player 2", PlayerColor::Yellow),
            ],
        }
    }
}

impl PlayerRoster {
    pub fn players(&self) -> &[PlayerProfile] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Append a player on the first free color. No-op at the roster cap.
    pub fn add_player(&mut self) -> Option<&PlayerProfile> {
        if self.players.len() >= MAX_PLAYERS {
            return None;
        }
        let free = PlayerColor::ALL
            .into_iter()
            .find(|c| self.players.iter().all(|p| p.color != *c))
            .unwrap_or(PlayerColor::Magenta);
        let name = format!("Player {}", self.players.len() + 1);
        self.players.push(PlayerProfile::new(name, free));
        self.players.last()
    }

    /// Drop the last player. No-op at the roster floor.
    pub fn remove_player(&mut self) -> bool {
        if self.players.len() <= MIN_PLAYERS {
            return false;
        }
        self.players.pop();
        true
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) {
        if let Some(p) = self.players.get_mut(index) {
            p.name = name.into();
        }
    }

    /// Assign a color to a player. If another player already holds it, the
    /// two swap colors so the roster stays duplicate-free.
    pub fn set_color(&mut self, index: usize, color: PlayerColor) {
        if index >= self.players.len() {
            return;
        }
        let old = self.players[index].color;
        if let Some(other) = self.players.iter().position(|p| p.color == color) {
            if other != index {
                self.players[other].color = old;
            }
        }
        self.players[index].color = color;
    }
}
