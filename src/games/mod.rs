//! The three duels, each a [`Game`](crate::sim::Game) implementation

pub mod boxing;
pub mod pong;
pub mod soccer;

pub use boxing::{Boxing, BoxingCommand};
pub use pong::{Pong, PongCommand};
pub use soccer::{Soccer, SoccerCommand};

use serde::{Deserialize, Serialize};

/// Which duel to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Boxing,
    Soccer,
    Pong,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Boxing, GameKind::Soccer, GameKind::Pong];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Boxing => "boxing",
            GameKind::Soccer => "soccer",
            GameKind::Pong => "pong",
        }
    }

    /// Accepts the page names used by the browser front end too
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "boxing" | "box" => Some(GameKind::Boxing),
            "soccer" | "head-soccer" | "headsoccer" => Some(GameKind::Soccer),
            "pong" => Some(GameKind::Pong),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_names() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(GameKind::from_str(" Head-Soccer "), Some(GameKind::Soccer));
        assert_eq!(GameKind::from_str("dance"), None);
    }
}
