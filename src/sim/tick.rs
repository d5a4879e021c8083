//! Per-frame match advance
//!
//! Drives the phase machine: countdown → playing → intermission → (next
//! round | match end), with pause and cancel. All timers move by the
//! caller-supplied elapsed time; nothing here reads a wall clock.

use super::rules::{ClockMode, CommandArg, Game, Resume, Tally};
use super::state::{EndReason, GameEvent, MatchResult, MatchState, Phase, RoundOutcome, Score};
use crate::consts::*;
use crate::{ms_to_secs, Side};

/// Advance a match by `dt_ms` milliseconds.
///
/// Frames longer than `MAX_FRAME_MS` are cut to that length, so after a
/// stall (a backgrounded tab, a debugger break) match clocks lag wall time.
pub fn tick<G: Game>(state: &mut MatchState<G>, dt_ms: f32) {
    let dt_ms = if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    };
    let dt = ms_to_secs(dt_ms);

    match state.phase {
        Phase::Waiting | Phase::Paused | Phase::MatchEnd => {}
        Phase::Countdown => {
            state.phase_timer -= dt;
            if state.phase_timer <= -COUNTDOWN_GRACE_SECS {
                state.begin_play();
            }
        }
        Phase::Intermission => {
            state.phase_timer -= dt;
            if state.phase_timer <= 0.0 {
                state.advance_after_round();
            }
        }
        Phase::Playing => {
            if let Some(outcome) = state.game.step(dt_ms, &mut state.rng, &mut state.events) {
                state.end_round(outcome);
                return;
            }
            state.run_clock(dt);
        }
    }
}

impl<G: Game> MatchState<G> {
    /// Advance by `dt_ms` milliseconds (see [`tick`])
    pub fn update(&mut self, dt_ms: f32) {
        tick(self, dt_ms);
    }

    // --- Transitions ---

    /// Reset score, history and actors and begin the countdown.
    ///
    /// Only allowed from `Waiting` or `MatchEnd`; returns false otherwise.
    pub fn start_match(&mut self) -> bool {
        if !self.phase.can_start_match() {
            return false;
        }
        self.rules = self.game.rules();
        self.round = 1;
        self.score = Score::default();
        self.history.clear();
        self.stats = Default::default();
        self.winner = None;
        self.last_outcome = None;
        self.clock = Self::initial_clock(&self.rules);
        self.game.reset_match(&mut self.rng);
        log::info!("{}: match started", G::NAME);
        self.begin_countdown();
        true
    }

    fn begin_countdown(&mut self) {
        self.phase = Phase::Countdown;
        // One extra second for the "GO" frame
        self.phase_timer = self.rules.countdown_secs + 1.0;
        if let ClockMode::PerRound { secs } = self.rules.clock {
            self.clock = Some(secs);
        }
    }

    fn begin_play(&mut self) {
        self.phase = Phase::Playing;
        self.phase_timer = 0.0;
        log::info!("{}: round {} under way", G::NAME, self.round);
    }

    /// Pause active play, or resume a paused match
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                true
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                true
            }
            _ => false,
        }
    }

    /// Abandon a paused match
    pub fn cancel(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Waiting;
        log::info!("{}: match abandoned", G::NAME);
        true
    }

    /// Route a command to an actor; ignored outside active play
    pub fn handle_command(&mut self, side: Side, command: G::Command, arg: CommandArg) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.game.apply(side, command, arg)
    }

    fn run_clock(&mut self, dt: f32) {
        let Some(clock) = self.clock.as_mut() else {
            return;
        };
        *clock -= dt;
        if *clock > 0.0 {
            return;
        }
        *clock = 0.0;

        match self.rules.clock {
            ClockMode::PerRound { .. } => {
                let winner = self.game.decide_on_time();
                self.end_round(RoundOutcome {
                    winner,
                    reason: EndReason::Time,
                });
            }
            ClockMode::PerMatch { .. } => {
                // The unfinished point still counts toward the totals
                self.absorb_stats();
                self.end_match();
            }
            ClockMode::None => {}
        }
    }

    /// Record a finished round and start the intermission.
    ///
    /// Only valid during active play; later calls in the same frame are ignored.
    pub fn end_round(&mut self, outcome: RoundOutcome) {
        if self.phase != Phase::Playing {
            return;
        }

        self.history.push(outcome);
        if let Some(side) = outcome.winner {
            self.score.add(side);
        }
        self.absorb_stats();

        self.last_outcome = Some(outcome);
        self.events.push(GameEvent::RoundOver(outcome));
        match outcome.winner {
            Some(side) => log::info!(
                "{}: {} {} takes round {} ({}-{})",
                G::NAME,
                outcome.reason.banner(),
                side.label(),
                self.history.len(),
                self.score.p1,
                self.score.p2
            ),
            None => log::info!("{}: round {} drawn", G::NAME, self.history.len()),
        }

        self.phase = Phase::Intermission;
        self.phase_timer = self.rules.intermission_secs;
    }

    fn absorb_stats(&mut self) {
        for side in Side::BOTH {
            let round_stats = self.game.stats(side);
            self.stats[side.index()].absorb(&round_stats);
        }
    }

    /// Decide the match or set up the next round once the intermission is over
    pub fn advance_after_round(&mut self) {
        if self.phase != Phase::Intermission {
            return;
        }

        if self
            .rules
            .format
            .is_decided(self.score.as_array(), self.history.len())
        {
            self.end_match();
            return;
        }

        self.round += 1;
        self.game.reset_round(&mut self.rng);
        match self.rules.resume {
            Resume::Countdown => self.begin_countdown(),
            Resume::Immediate => self.begin_play(),
        }
    }

    fn end_match(&mut self) {
        let result = MatchResult::from_score(self.score);
        self.phase = Phase::MatchEnd;
        self.phase_timer = 0.0;
        self.winner = Some(result);
        self.events.push(GameEvent::MatchOver(result));
        log::info!(
            "{}: match over, {} ({}-{})",
            G::NAME,
            result.label(),
            self.score.p1,
            self.score.p2
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rules::{MatchFormat, MatchRules};
    use rand_pcg::Pcg32;
    use serde::Serialize;

    /// Scripted game: ends a round whenever `pending` holds an outcome
    #[derive(Debug, Clone, Serialize)]
    struct Scripted {
        #[serde(skip)]
        rules: MatchRules,
        #[serde(skip)]
        pending: Option<RoundOutcome>,
        time_leader: Option<Side>,
        steps: u32,
        resets: u32,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    struct Steps(u32);

    impl Tally for Steps {
        fn absorb(&mut self, round: &Self) {
            self.0 += round.0;
        }
    }

    impl Game for Scripted {
        type Command = ();
        type Stats = Steps;
        const NAME: &'static str = "scripted";

        fn rules(&self) -> MatchRules {
            self.rules
        }

        fn reset_round(&mut self, _rng: &mut Pcg32) {
            self.steps = 0;
            self.resets += 1;
        }

        fn step(
            &mut self,
            _dt_ms: f32,
            _rng: &mut Pcg32,
            _events: &mut Vec<GameEvent>,
        ) -> Option<RoundOutcome> {
            self.steps += 1;
            self.pending.take()
        }

        fn decide_on_time(&self) -> Option<Side> {
            self.time_leader
        }

        fn apply(&mut self, _side: Side, _command: (), _arg: CommandArg) -> bool {
            true
        }

        fn stats(&self, _side: Side) -> Steps {
            Steps(self.steps)
        }
    }

    fn best_of_three() -> MatchRules {
        MatchRules {
            format: MatchFormat::BestOf { rounds: 3 },
            clock: ClockMode::PerRound { secs: 90.0 },
            countdown_secs: 3.0,
            intermission_secs: 3.0,
            resume: Resume::Countdown,
        }
    }

    fn scripted(rules: MatchRules) -> MatchState<Scripted> {
        MatchState::new(
            Scripted {
                rules,
                pending: None,
                time_leader: None,
                steps: 0,
                resets: 0,
            },
            7,
        )
    }

    /// Run frames of `ms` until `phase` is reached (bounded)
    fn run_until(state: &mut MatchState<Scripted>, phase: Phase, ms: f32) {
        for _ in 0..10_000 {
            if state.phase == phase {
                return;
            }
            tick(state, ms);
        }
        panic!("never reached {:?}, stuck in {:?}", phase, state.phase);
    }

    fn win_round(state: &mut MatchState<Scripted>, side: Side) {
        run_until(state, Phase::Playing, 100.0);
        state.game.pending = Some(RoundOutcome::win(side, EndReason::Knockout));
        tick(state, 16.0);
        assert_eq!(state.phase, Phase::Intermission);
    }

    #[test]
    fn test_start_only_from_waiting_or_match_end() {
        let mut state = scripted(best_of_three());
        assert!(state.start_match());
        assert_eq!(state.phase, Phase::Countdown);
        assert_eq!(state.phase_timer, 4.0);
        // Already running
        assert!(!state.start_match());
    }

    #[test]
    fn test_countdown_grace_before_play() {
        let mut state = scripted(best_of_three());
        state.start_match();
        assert_eq!(state.countdown_cue(), crate::sim::CountdownCue::Pending);

        // Just past zero: "GO" but not playing yet
        for _ in 0..41 {
            tick(&mut state, 100.0);
        }
        assert_eq!(state.phase, Phase::Countdown);
        assert_eq!(state.countdown_cue(), crate::sim::CountdownCue::Go);

        for _ in 0..5 {
            tick(&mut state, 100.0);
        }
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_two_nil_best_of_three_ends_after_round_two() {
        let mut state = scripted(best_of_three());
        state.start_match();

        win_round(&mut state, Side::P1);
        run_until(&mut state, Phase::Countdown, 100.0);
        assert_eq!(state.round, 2);

        win_round(&mut state, Side::P1);
        run_until(&mut state, Phase::MatchEnd, 100.0);

        assert_eq!(state.history.len(), 2);
        assert_eq!(state.score.as_array(), [2, 0]);
        assert_eq!(state.winner, Some(MatchResult::Winner(Side::P1)));
        assert_eq!(state.round, 2);
    }

    #[test]
    fn test_split_rounds_go_the_distance() {
        let mut state = scripted(best_of_three());
        state.start_match();
        win_round(&mut state, Side::P1);
        win_round(&mut state, Side::P2);
        win_round(&mut state, Side::P2);
        run_until(&mut state, Phase::MatchEnd, 100.0);
        assert_eq!(state.winner, Some(MatchResult::Winner(Side::P2)));
        assert_eq!(state.history.len(), 3);
    }

    #[test]
    fn test_round_clock_expiry_uses_tiebreak() {
        let mut state = scripted(best_of_three());
        state.game.time_leader = Some(Side::P2);
        state.start_match();
        run_until(&mut state, Phase::Playing, 100.0);

        run_until(&mut state, Phase::Intermission, 100.0);
        assert_eq!(state.clock, Some(0.0));
        assert_eq!(
            state.last_outcome,
            Some(RoundOutcome::win(Side::P2, EndReason::Time))
        );

        // Next countdown restores the round clock
        run_until(&mut state, Phase::Countdown, 100.0);
        assert_eq!(state.clock, Some(90.0));
    }

    #[test]
    fn test_drawn_rounds_do_not_score() {
        let mut state = scripted(best_of_three());
        state.start_match();
        for _ in 0..3 {
            run_until(&mut state, Phase::Playing, 100.0);
            state.game.pending = Some(RoundOutcome::draw(EndReason::Time));
            tick(&mut state, 16.0);
        }
        run_until(&mut state, Phase::MatchEnd, 100.0);
        assert_eq!(state.score.as_array(), [0, 0]);
        assert_eq!(state.winner, Some(MatchResult::Draw));
    }

    #[test]
    fn test_match_clock_ends_match_on_score() {
        let mut state = scripted(MatchRules {
            format: MatchFormat::FirstTo { target: 5 },
            clock: ClockMode::PerMatch { secs: 2.0 },
            countdown_secs: 0.0,
            intermission_secs: 0.5,
            resume: Resume::Immediate,
        });
        state.start_match();
        win_round(&mut state, Side::P2);
        // Clock frozen during the celebration, then play resumes directly
        assert!((state.clock.unwrap_or_default() - 2.0).abs() < 0.05);
        run_until(&mut state, Phase::Playing, 100.0);
        run_until(&mut state, Phase::MatchEnd, 100.0);
        assert_eq!(state.winner, Some(MatchResult::Winner(Side::P2)));
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_first_to_target_on_advance() {
        let mut state = scripted(MatchRules {
            format: MatchFormat::FirstTo { target: 2 },
            clock: ClockMode::None,
            countdown_secs: 3.0,
            intermission_secs: 2.0,
            resume: Resume::Immediate,
        });
        state.start_match();
        win_round(&mut state, Side::P1);
        run_until(&mut state, Phase::Playing, 100.0);
        assert_eq!(state.game.resets, 2);

        win_round(&mut state, Side::P1);
        // Still celebrating; the decision happens on advance
        assert_eq!(state.phase, Phase::Intermission);
        state.advance_after_round();
        assert_eq!(state.phase, Phase::MatchEnd);
        assert_eq!(state.winner.map(|w| w.label()), Some("Player 1"));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = scripted(best_of_three());
        state.start_match();
        run_until(&mut state, Phase::Playing, 100.0);

        assert!(state.toggle_pause());
        assert_eq!(state.phase, Phase::Paused);
        let clock = state.clock;
        let steps = state.game.steps;
        for _ in 0..10 {
            tick(&mut state, 100.0);
        }
        // Nothing advances while paused
        assert_eq!(state.clock, clock);
        assert_eq!(state.game.steps, steps);
        assert!(!state.handle_command(Side::P1, (), CommandArg::Press));

        assert!(state.toggle_pause());
        assert_eq!(state.phase, Phase::Playing);
        assert!(state.handle_command(Side::P1, (), CommandArg::Press));
    }

    #[test]
    fn test_cancel_only_from_pause() {
        let mut state = scripted(best_of_three());
        state.start_match();
        assert!(!state.cancel());
        run_until(&mut state, Phase::Playing, 100.0);
        state.toggle_pause();
        assert!(state.cancel());
        assert_eq!(state.phase, Phase::Waiting);
        assert!(state.start_match());
    }

    #[test]
    fn test_stats_accumulate_per_round() {
        let mut state = scripted(best_of_three());
        state.start_match();
        win_round(&mut state, Side::P1);
        let first = state.stats[0].0;
        assert!(first > 0);
        win_round(&mut state, Side::P2);
        assert!(state.stats[0].0 > first);
        assert_eq!(state.stats[0].0, state.stats[1].0);
    }

    #[test]
    fn test_restart_clears_score_and_history() {
        let mut state = scripted(best_of_three());
        state.start_match();
        win_round(&mut state, Side::P1);
        win_round(&mut state, Side::P1);
        run_until(&mut state, Phase::MatchEnd, 100.0);

        assert!(state.start_match());
        assert_eq!(state.score.as_array(), [0, 0]);
        assert!(state.history.is_empty());
        assert!(state.winner.is_none());
        assert_eq!(state.round, 1);
        assert_eq!(state.stats[0].0, 0);
    }

    #[test]
    fn test_bad_frame_times_are_clamped() {
        let mut state = scripted(best_of_three());
        state.start_match();
        tick(&mut state, -500.0);
        assert_eq!(state.phase_timer, 4.0);
        tick(&mut state, f32::NAN);
        assert_eq!(state.phase_timer, 4.0);
        // A tab stall counts as one maximal frame
        tick(&mut state, 10_000.0);
        assert!((state.phase_timer - 3.9).abs() < 1e-5);
    }

    #[test]
    fn test_determinism() {
        let mut a = scripted(best_of_three());
        let mut b = scripted(best_of_three());
        for state in [&mut a, &mut b] {
            state.start_match();
            win_round(state, Side::P2);
            run_until(state, Phase::Playing, 33.0);
            tick(state, 17.0);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.clock, b.clock);
        assert_eq!(a.history, b.history);
        assert_eq!(a.game.steps, b.game.steps);
    }
}
