//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied elapsed time only
//! - Seeded RNG only
//! - Fixed actor order (P1 before P2)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rules;
pub mod state;
pub mod tick;

pub use collision::{Contact, Rect, circle_contact, enforce_separation, reflect_velocity};
pub use rules::{ClockMode, CommandArg, Game, MatchFormat, MatchRules, Resume, Tally};
pub use state::{
    CountdownCue, EndReason, GameEvent, MatchResult, MatchState, Phase, RoundOutcome, Score,
};
pub use tick::tick;
