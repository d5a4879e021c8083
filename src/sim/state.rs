//! Match state and core simulation types
//!
//! The engine-level view of a match: phase, timers, score, round history
//! and accumulated statistics. The game itself is owned here and only
//! mutated through the transitions in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rules::{ClockMode, Game, MatchRules};
use crate::Side;

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, nothing running
    Waiting,
    /// Pre-round count ("3, 2, 1, FIGHT!")
    Countdown,
    /// Actors and physics advance
    Playing,
    /// Round-end or goal celebration
    Intermission,
    /// Frozen mid-play
    Paused,
    /// Result screen
    MatchEnd,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Countdown => "countdown",
            Phase::Playing => "playing",
            Phase::Intermission => "intermission",
            Phase::Paused => "paused",
            Phase::MatchEnd => "matchEnd",
        }
    }

    /// A fresh match can only begin from here
    pub fn can_start_match(&self) -> bool {
        matches!(self, Phase::Waiting | Phase::MatchEnd)
    }
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Knockout,
    TechnicalKnockout,
    Time,
    Goal,
    Point,
}

impl EndReason {
    /// Banner text shown during the intermission
    pub fn banner(&self) -> &'static str {
        match self {
            EndReason::Knockout => "KO!",
            EndReason::TechnicalKnockout => "TKO!",
            EndReason::Time => "TIME!",
            EndReason::Goal => "GOAL!",
            EndReason::Point => "POINT!",
        }
    }
}

/// Result of one round/point; `winner == None` is a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: Option<Side>,
    pub reason: EndReason,
}

impl RoundOutcome {
    pub fn win(side: Side, reason: EndReason) -> Self {
        Self {
            winner: Some(side),
            reason,
        }
    }

    pub fn draw(reason: EndReason) -> Self {
        Self {
            winner: None,
            reason,
        }
    }
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner(Side),
    Draw,
}

impl MatchResult {
    /// Higher score wins, equal scores draw
    pub fn from_score(score: Score) -> Self {
        if score.p1 > score.p2 {
            MatchResult::Winner(Side::P1)
        } else if score.p2 > score.p1 {
            MatchResult::Winner(Side::P2)
        } else {
            MatchResult::Draw
        }
    }

    /// "Player 1", "Player 2" or "Draw"
    pub fn label(&self) -> &'static str {
        match self {
            MatchResult::Winner(side) => side.label(),
            MatchResult::Draw => "Draw",
        }
    }
}

/// What the countdown overlay should show this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CountdownCue {
    /// Countdown not started (or not counting down at all)
    Pending,
    Count(u32),
    /// "FIGHT!" / "PLAY!"
    Go,
}

/// Per-side score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub p1: u32,
    pub p2: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::P1 => self.p1,
            Side::P2 => self.p2,
        }
    }

    pub fn add(&mut self, side: Side) {
        match side {
            Side::P1 => self.p1 += 1,
            Side::P2 => self.p2 += 1,
        }
    }

    pub fn as_array(&self) -> [u32; 2] {
        [self.p1, self.p2]
    }
}

/// Events emitted during a frame, for audio/visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// Camera shake request
    Shake { intensity: f32, duration_ms: f32 },
    /// A punch connected; `damage` is after block reduction
    Hit {
        attacker: Side,
        damage: f32,
        blocked: bool,
    },
    Knockdown { side: Side, count: u32 },
    Kick { side: Side },
    Header { side: Side },
    PowerUsed { side: Side },
    /// A flame shot was stopped by a head or a cage
    FlameBlocked { by: Side },
    /// A cage kept the ball out of `goal`'s net
    CageSave { goal: Side },
    Goal { scorer: Side },
    PaddleReturn { side: Side },
    WallBounce,
    Point { scorer: Side },
    RoundOver(RoundOutcome),
    MatchOver(MatchResult),
}

/// Complete state of one match of `G`
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "G: Serialize"))]
pub struct MatchState<G: Game> {
    pub game: G,
    pub phase: Phase,
    /// Countdown / intermission timer (seconds, counts down)
    pub phase_timer: f32,
    /// Remaining play clock in seconds, if the game has one
    pub clock: Option<f32>,
    /// 1-based number of the round in progress
    pub round: u32,
    pub score: Score,
    /// Every finished round/point, in order
    pub history: Vec<RoundOutcome>,
    /// Statistics summed over finished rounds, indexed by `Side::index`
    pub stats: [G::Stats; 2],
    pub winner: Option<MatchResult>,
    pub last_outcome: Option<RoundOutcome>,
    pub rules: MatchRules,
    /// Events since the last drain
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
}

impl<G: Game> MatchState<G> {
    /// Create a match in `Waiting` with a seeded RNG
    pub fn new(game: G, seed: u64) -> Self {
        let rules = game.rules();
        Self {
            game,
            phase: Phase::Waiting,
            phase_timer: 0.0,
            clock: Self::initial_clock(&rules),
            round: 1,
            score: Score::default(),
            history: Vec::new(),
            stats: Default::default(),
            winner: None,
            last_outcome: None,
            rules,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub(crate) fn initial_clock(rules: &MatchRules) -> Option<f32> {
        match rules.clock {
            ClockMode::None => None,
            ClockMode::PerRound { secs } | ClockMode::PerMatch { secs } => Some(secs),
        }
    }

    /// Take the events emitted since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Peek at pending events
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// What the countdown overlay shows this frame
    pub fn countdown_cue(&self) -> CountdownCue {
        if self.phase != Phase::Countdown {
            return CountdownCue::Pending;
        }
        let count = self.phase_timer.ceil();
        if count > self.rules.countdown_secs.ceil() {
            CountdownCue::Pending
        } else if count > 0.0 {
            CountdownCue::Count(count as u32)
        } else {
            CountdownCue::Go
        }
    }

    /// Whether actors accept commands right now
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }
}
