//! Duel Arcade - two-player arcade duels with keyboard and voice control
//!
//! Core modules:
//! - `sim`: Deterministic match engine (phase machine, scoring, collisions)
//! - `games`: Boxing, head soccer and pong rules plugged into the engine
//! - `input`: Key state, edge latches, voice command dispatch
//! - `session`: Frame-driver facade tying one match to one dispatcher
//! - `bot`: Computer players that press the same keys a human would
//! - `tuning`: Data-driven game balance
//! - `settings`: Control and voice preferences
//! - `platform`: Browser bindings (wasm32 only)

pub mod bot;
pub mod games;
pub mod input;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use games::GameKind;
pub use session::{Arcade, Session};
pub use settings::{ControlPreset, Settings};
pub use sim::collision::Rect;
pub use sim::{MatchResult, MatchState, Phase};

use serde::{Deserialize, Serialize};

/// Frame timing constants
pub mod consts {
    /// Reference frame length (60 Hz) for tunables expressed per frame
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Longest frame the simulation will integrate in one step (tab stalls, debugger pauses)
    pub const MAX_FRAME_MS: f32 = 100.0;
    /// How far past zero the countdown runs so the "GO" cue stays on screen
    pub const COUNTDOWN_GRACE_SECS: f32 = 0.5;
}

/// One of the two match slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    /// Map a wire player number (1 or 2) to a side
    pub fn from_player(player: u8) -> Option<Self> {
        match player {
            1 => Some(Side::P1),
            2 => Some(Side::P2),
            _ => None,
        }
    }

    pub fn player_number(self) -> u8 {
        match self {
            Side::P1 => 1,
            Side::P2 => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    /// Array slot for per-side tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::P1 => "Player 1",
            Side::P2 => "Player 2",
        }
    }
}

/// Horizontal facing of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Face toward `target_x` from `x` (ties face left)
    pub fn toward(x: f32, target_x: f32) -> Self {
        if target_x > x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// Convert elapsed milliseconds to seconds
#[inline]
pub fn ms_to_secs(ms: f32) -> f32 {
    ms / 1000.0
}

/// Convert elapsed milliseconds to 60 Hz reference frames
#[inline]
pub fn ms_to_frames(ms: f32) -> f32 {
    ms / consts::REFERENCE_FRAME_MS
}

/// Apply a per-reference-frame decay factor over an arbitrary elapsed time
#[inline]
pub fn decay(factor: f32, frames: f32) -> f32 {
    factor.powf(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_mapping() {
        assert_eq!(Side::from_player(1), Some(Side::P1));
        assert_eq!(Side::from_player(2), Some(Side::P2));
        assert_eq!(Side::from_player(3), None);
        assert_eq!(Side::P1.opponent(), Side::P2);
        assert_eq!(Side::P2.player_number(), 2);
    }

    #[test]
    fn test_decay_matches_per_frame_factor() {
        // One reference frame of decay equals the raw factor
        assert!((decay(0.8, ms_to_frames(consts::REFERENCE_FRAME_MS)) - 0.8).abs() < 1e-5);
        // Two frames compound
        assert!((decay(0.8, 2.0) - 0.64).abs() < 1e-5);
    }
}
