//! One match plus its input plumbing, driven one frame at a time

use serde::Serialize;

use crate::bot::Bot;
use crate::games::{Boxing, GameKind, Pong, Soccer};
use crate::input::{Controls, Dispatcher, InputState, VoiceAction, VoiceRejection};
use crate::settings::Settings;
use crate::tuning;
use crate::sim::{CountdownCue, GameEvent, MatchResult, MatchState, Phase, Score};

/// Frame-driver facade: keyboard and voice in, state and feedback events out
#[derive(Debug, Clone)]
pub struct Session<G: Controls> {
    pub state: MatchState<G>,
    pub dispatcher: Dispatcher<G>,
    last_phase: Phase,
}

/// What a renderer needs for one frame
#[derive(Serialize)]
#[serde(bound(serialize = "G: serde::Serialize"))]
struct Snapshot<'a, G: Controls> {
    game: &'static str,
    phase: &'static str,
    countdown: CountdownCue,
    banner: Option<&'static str>,
    winner: Option<&'static str>,
    #[serde(rename = "match")]
    state: &'a MatchState<G>,
}

impl<G: Controls> Session<G> {
    pub fn new(game: G, seed: u64, settings: Settings) -> Self {
        let state = MatchState::new(game, seed);
        let last_phase = state.phase;
        Self {
            state,
            dispatcher: Dispatcher::new(settings),
            last_phase,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.dispatcher.settings()
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.dispatcher.set_settings(settings);
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Run one frame: keyboard commands, then the simulation.
    ///
    /// Returns the feedback events raised this frame. Camera shake is
    /// dropped when screen shake is turned off.
    pub fn update(&mut self, input: &InputState, dt_ms: f32) -> Vec<GameEvent> {
        self.dispatcher.frame(input, &mut self.state, dt_ms);
        self.state.update(dt_ms);
        self.track_phase();

        let mut events = self.state.drain_events();
        if !self.settings().screen_shake {
            events.retain(|e| !matches!(e, GameEvent::Shake { .. }));
        }
        events
    }

    /// Route one raw message from the speech backend
    pub fn voice_message(&mut self, json: &str) -> Result<VoiceAction<G::Command>, VoiceRejection> {
        let result = self.dispatcher.voice(json, &mut self.state);
        match &result {
            Ok(action) => log::debug!("{}: voice accepted: {:?}", G::NAME, action),
            Err(rejection) if rejection.is_routine() => {
                log::debug!("{}: voice dropped: {}", G::NAME, rejection)
            }
            Err(rejection) => log::warn!("{}: voice dropped: {}", G::NAME, rejection),
        }
        self.track_phase();
        result
    }

    pub fn start_match(&mut self) -> bool {
        let started = self.state.start_match();
        self.track_phase();
        started
    }

    pub fn toggle_pause(&mut self) -> bool {
        let toggled = self.state.toggle_pause();
        self.track_phase();
        toggled
    }

    /// Abandon a paused match
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.state.cancel();
        self.track_phase();
        cancelled
    }

    /// Pending holds and presses never outlive a match
    fn track_phase(&mut self) {
        let phase = self.state.phase;
        if phase == self.last_phase {
            return;
        }
        log::debug!(
            "{}: {} -> {}",
            G::NAME,
            self.last_phase.as_str(),
            phase.as_str()
        );
        if matches!(phase, Phase::Waiting | Phase::MatchEnd) {
            self.dispatcher.clear();
        }
        self.last_phase = phase;
    }

    /// Full state as JSON for a renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error>
    where
        G: Serialize,
    {
        let banner = match self.state.phase {
            Phase::Intermission | Phase::MatchEnd => {
                self.state.last_outcome.map(|o| o.reason.banner())
            }
            _ => None,
        };
        serde_json::to_string(&Snapshot {
            game: G::NAME,
            phase: self.state.phase.as_str(),
            countdown: self.state.countdown_cue(),
            banner,
            winner: self.state.winner.map(|w| w.label()),
            state: &self.state,
        })
    }
}

/// A session of whichever game was picked at runtime
#[derive(Debug, Clone)]
pub enum Arcade {
    Boxing(Session<Boxing>),
    Soccer(Session<Soccer>),
    Pong(Session<Pong>),
}

macro_rules! each {
    ($arcade:expr, $s:ident => $body:expr) => {
        match $arcade {
            Arcade::Boxing($s) => $body,
            Arcade::Soccer($s) => $body,
            Arcade::Pong($s) => $body,
        }
    };
}

impl Arcade {
    /// New session with default tuning
    pub fn new(kind: GameKind, seed: u64, settings: Settings) -> Self {
        match kind {
            GameKind::Boxing => Arcade::Boxing(Session::new(Boxing::default(), seed, settings)),
            GameKind::Soccer => Arcade::Soccer(Session::new(Soccer::default(), seed, settings)),
            GameKind::Pong => Arcade::Pong(Session::new(Pong::default(), seed, settings)),
        }
    }

    /// New session whose tuning is overridden by `tuning_json`; fields the
    /// JSON leaves out keep their defaults
    pub fn with_tuning(
        kind: GameKind,
        tuning_json: &str,
        seed: u64,
        settings: Settings,
    ) -> Result<Self, serde_json::Error> {
        let arcade = match kind {
            GameKind::Boxing => {
                let game = Boxing::new(tuning::from_json(tuning_json)?);
                Arcade::Boxing(Session::new(game, seed, settings))
            }
            GameKind::Soccer => {
                let game = Soccer::new(tuning::from_json(tuning_json)?);
                Arcade::Soccer(Session::new(game, seed, settings))
            }
            GameKind::Pong => {
                let game = Pong::new(tuning::from_json(tuning_json)?);
                Arcade::Pong(Session::new(game, seed, settings))
            }
        };
        log::info!("{}: tuning overrides applied", kind.as_str());
        Ok(arcade)
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Arcade::Boxing(_) => GameKind::Boxing,
            Arcade::Soccer(_) => GameKind::Soccer,
            Arcade::Pong(_) => GameKind::Pong,
        }
    }

    pub fn phase(&self) -> Phase {
        each!(self, s => s.phase())
    }

    pub fn score(&self) -> Score {
        each!(self, s => s.state.score)
    }

    pub fn winner(&self) -> Option<MatchResult> {
        each!(self, s => s.state.winner)
    }

    pub fn set_settings(&mut self, settings: Settings) {
        each!(self, s => s.set_settings(settings))
    }

    /// Let `bot` set its keys for this frame
    pub fn drive(&self, bot: &mut Bot, input: &mut InputState) {
        each!(self, s => bot.drive(&s.state, input))
    }

    pub fn update(&mut self, input: &InputState, dt_ms: f32) -> Vec<GameEvent> {
        each!(self, s => s.update(input, dt_ms))
    }

    /// Route a voice message; the accepted action itself is only logged
    pub fn voice_message(&mut self, json: &str) -> Result<(), VoiceRejection> {
        each!(self, s => s.voice_message(json).map(|_| ()))
    }

    pub fn start_match(&mut self) -> bool {
        each!(self, s => s.start_match())
    }

    pub fn toggle_pause(&mut self) -> bool {
        each!(self, s => s.toggle_pause())
    }

    pub fn cancel(&mut self) -> bool {
        each!(self, s => s.cancel())
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        each!(self, s => s.snapshot_json())
    }
}
