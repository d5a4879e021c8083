//! Rules policy shared by every duel
//!
//! A game plugs into the generic match engine by implementing [`Game`]:
//! it owns its actors, advances them, resolves collisions, and reports
//! when a round/point is over. The engine owns phases, timers and score.

use std::fmt;
use std::hash::Hash;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, RoundOutcome};
use crate::Side;

/// How the match winner is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFormat {
    /// Win ⌈rounds/2⌉ rounds, or lead after all rounds are played
    BestOf { rounds: u32 },
    /// First side to reach `target` round wins (goals, points)
    FirstTo { target: u32 },
}

impl MatchFormat {
    /// Round wins that settle the match outright
    pub fn wins_needed(&self) -> u32 {
        match *self {
            MatchFormat::BestOf { rounds } => rounds.div_ceil(2),
            MatchFormat::FirstTo { target } => target,
        }
    }

    /// Whether the match is over after `played` rounds with `score`
    pub fn is_decided(&self, score: [u32; 2], played: usize) -> bool {
        let needed = self.wins_needed();
        if score.iter().any(|&s| s >= needed) {
            return true;
        }
        match *self {
            MatchFormat::BestOf { rounds } => played >= rounds as usize,
            MatchFormat::FirstTo { .. } => false,
        }
    }
}

/// Clock running during play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClockMode {
    None,
    /// Restarted at every countdown; expiry ends the round on the game's tiebreak
    PerRound { secs: f32 },
    /// Runs across rounds; expiry ends the match on score
    PerMatch { secs: f32 },
}

/// What follows the intermission when the match goes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resume {
    Countdown,
    Immediate,
}

/// Phase timings and win policy for one game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
    pub format: MatchFormat,
    pub clock: ClockMode,
    pub countdown_secs: f32,
    /// Round-end / goal celebration length
    pub intermission_secs: f32,
    pub resume: Resume,
}

/// Argument carried alongside a command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandArg {
    /// One-shot trigger (key edge, voice word)
    Press,
    /// Level signal for held actions; `false` releases
    Hold(bool),
    /// Voice loudness in [0, 1]
    Volume(f32),
}

/// Per-side statistics that sum across rounds
pub trait Tally {
    fn absorb(&mut self, round: &Self);
}

/// A two-player game the match engine can drive
pub trait Game {
    /// Actor-level command vocabulary
    type Command: Copy + Eq + Hash + fmt::Debug + 'static;
    /// Statistics collected per side per round
    type Stats: Tally + Default + Clone + fmt::Debug + Serialize;

    /// Display name
    const NAME: &'static str;

    fn rules(&self) -> MatchRules;

    /// Fresh match: everything back to its initial state
    fn reset_match(&mut self, rng: &mut Pcg32) {
        self.reset_round(rng);
    }

    /// Start of a round/point: actors and ball back to their start positions
    fn reset_round(&mut self, rng: &mut Pcg32);

    /// Advance one frame of active play.
    ///
    /// Returns the outcome when this frame ended the round.
    fn step(
        &mut self,
        dt_ms: f32,
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Option<RoundOutcome>;

    /// Round winner when a per-round clock runs out (`None` = draw)
    fn decide_on_time(&self) -> Option<Side> {
        None
    }

    /// Route a command to `side`'s actor. Invalid commands are no-ops returning false.
    fn apply(&mut self, side: Side, command: Self::Command, arg: CommandArg) -> bool;

    /// Statistics for the round in progress
    fn stats(&self, side: Side) -> Self::Stats;
}
