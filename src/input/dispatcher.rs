//! Command dispatcher: keyboard and voice in, game commands out
//!
//! Keeps its own clock, advanced by the frame driver, so voice holds and
//! synthetic key presses expire deterministically instead of on wall-clock
//! timers.

use std::collections::HashMap;

use super::controls::{ControlWord, Controls, Delivery, Trigger, VoiceWord};
use super::keys::{CANCEL_KEY, InputState, KeyLatch, START_KEYS};
use super::voice::{self, VoiceMessage, VoiceRejection};
use crate::Side;
use crate::settings::Settings;
use crate::sim::{CommandArg, MatchState, Phase};

/// Latched inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Latch {
    Start,
    Cancel,
    Key(&'static str),
}

/// A voice-emulated hold (block/dodge)
#[derive(Debug, Clone, Copy, PartialEq)]
struct VoiceHold<C> {
    side: Side,
    command: C,
    until_ms: f64,
    next_assert_ms: f64,
}

/// What an accepted voice message did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceAction<C> {
    Started,
    Paused,
    Resumed,
    /// Routed to the actor; `applied` is the actor's own answer
    Command { side: Side, command: C, applied: bool },
    /// Hold started or refreshed
    Hold { side: Side, command: C },
    /// Bound key held down for `duration_ms`
    KeyPress {
        side: Side,
        key: &'static str,
        duration_ms: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Dispatcher<G: Controls> {
    settings: Settings,
    now_ms: f64,
    latch: KeyLatch<Latch>,
    /// Last accepted voice action per side, for debouncing
    last_voice: [Option<(VoiceWord<G::Command>, f64)>; 2],
    holds: Vec<VoiceHold<G::Command>>,
    /// Synthetic key presses: key → release time
    presses: HashMap<&'static str, f64>,
    /// Last spoken direction per side, repeated by loud `volume` messages
    last_direction: [Option<G::Command>; 2],
}

impl<G: Controls> Dispatcher<G> {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            now_ms: 0.0,
            latch: KeyLatch::default(),
            last_voice: [None, None],
            holds: Vec::new(),
            presses: HashMap::new(),
            last_direction: [None, None],
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Dispatcher clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Drop every pending hold, press and remembered direction
    pub fn clear(&mut self) {
        self.last_voice = [None, None];
        self.holds.clear();
        self.presses.clear();
        self.last_direction = [None, None];
    }

    pub fn is_voice_hold_active(&self, side: Side, command: G::Command) -> bool {
        self.holds
            .iter()
            .any(|h| h.side == side && h.command == command)
    }

    /// Held by the player or by a pending synthetic press
    pub fn is_key_down(&self, input: &InputState, key: &'static str) -> bool {
        input.is_down(key) || self.presses.contains_key(key)
    }

    /// Process one frame of keyboard state. Call before the match update.
    ///
    /// The dispatcher clock does not run while the match is paused.
    pub fn frame(&mut self, input: &InputState, state: &mut MatchState<G>, dt_ms: f32) {
        // Holds and synthetic presses stand still with a paused match
        if state.phase != Phase::Paused {
            if dt_ms.is_finite() && dt_ms > 0.0 {
                self.now_ms += f64::from(dt_ms);
            }
            let now = self.now_ms;
            self.presses.retain(|_, until| *until > now);
        }

        self.shared_keys(input, state);
        if state.phase != Phase::Paused {
            self.run_holds(state);
        }

        if state.phase != Phase::Playing {
            return;
        }

        for binding in G::key_bindings() {
            let down = self.is_key_down(input, binding.key);
            let (side, command) = (binding.side, binding.command);
            match G::trigger(command) {
                Trigger::Edge => {
                    if self.latch.edge(Latch::Key(binding.key), down) {
                        state.handle_command(side, command, CommandArg::Press);
                    }
                }
                Trigger::Level => {
                    if down {
                        state.handle_command(side, command, CommandArg::Press);
                    }
                }
                Trigger::Hold => {
                    if !self.is_voice_hold_active(side, command) {
                        state.handle_command(side, command, CommandArg::Hold(down));
                    }
                }
            }
        }
    }

    /// Space/Enter start or pause; Escape abandons a paused match
    fn shared_keys(&mut self, input: &InputState, state: &mut MatchState<G>) {
        if self.latch.edge(Latch::Start, input.any_down(&START_KEYS)) {
            if state.phase.can_start_match() {
                state.start_match();
            } else {
                state.toggle_pause();
            }
        }
        if self.latch.edge(Latch::Cancel, input.is_down(CANCEL_KEY)) {
            state.cancel();
        }
    }

    /// Re-assert live voice holds and release expired ones
    fn run_holds(&mut self, state: &mut MatchState<G>) {
        let now = self.now_ms;
        let interval = f64::from(self.settings.hold_interval_ms.max(1.0));
        self.holds.retain_mut(|hold| {
            if now >= hold.until_ms {
                state.handle_command(hold.side, hold.command, CommandArg::Hold(false));
                return false;
            }
            if now >= hold.next_assert_ms {
                state.handle_command(hold.side, hold.command, CommandArg::Hold(true));
                while hold.next_assert_ms <= now {
                    hold.next_assert_ms += interval;
                }
            }
            true
        });
    }

    /// Decode and route one voice message
    pub fn voice(
        &mut self,
        json: &str,
        state: &mut MatchState<G>,
    ) -> Result<VoiceAction<G::Command>, VoiceRejection> {
        if !self.settings.voice_enabled {
            return Err(VoiceRejection::Disabled);
        }
        match VoiceMessage::parse(json)? {
            VoiceMessage::Command {
                player,
                command,
                command_confidence,
                volume,
            } => {
                let side = voice::resolve_player(player)?;
                let word = command
                    .filter(|w| !w.trim().is_empty())
                    .ok_or(VoiceRejection::MissingCommand)?;
                let (action, ceiling) =
                    voice::lookup(&word, G::voice_word).ok_or(VoiceRejection::UnknownWord(word))?;

                let confidence = voice::confidence(command_confidence, ceiling);
                let threshold = self
                    .settings
                    .effective_min_confidence(G::VOICE_MIN_CONFIDENCE);
                if confidence < threshold {
                    return Err(VoiceRejection::LowConfidence {
                        confidence,
                        threshold,
                    });
                }

                self.debounce(side, action)?;
                self.deliver(side, action, volume.unwrap_or(0.0), state)
            }
            VoiceMessage::Volume { player, volume } => {
                let side = voice::resolve_player(player)?;
                self.continue_direction(side, volume.unwrap_or(0.0))
            }
            VoiceMessage::Other => Err(VoiceRejection::Ignored),
        }
    }

    /// Same action from the same player inside the window is dropped
    fn debounce(&mut self, side: Side, action: VoiceWord<G::Command>) -> Result<(), VoiceRejection> {
        let window = f64::from(self.settings.debounce_ms);
        let slot = &mut self.last_voice[side.index()];
        if let Some((last, at)) = *slot {
            if last == action && self.now_ms - at < window {
                return Err(VoiceRejection::Debounced);
            }
        }
        *slot = Some((action, self.now_ms));
        Ok(())
    }

    fn deliver(
        &mut self,
        side: Side,
        action: VoiceWord<G::Command>,
        volume: f32,
        state: &mut MatchState<G>,
    ) -> Result<VoiceAction<G::Command>, VoiceRejection> {
        let command = match action {
            VoiceWord::Control(ControlWord::Start) => {
                return if state.start_match() {
                    Ok(VoiceAction::Started)
                } else if state.phase == Phase::Paused && state.toggle_pause() {
                    Ok(VoiceAction::Resumed)
                } else {
                    Err(VoiceRejection::NotApplicable)
                };
            }
            VoiceWord::Control(ControlWord::Pause) => {
                return match state.phase {
                    Phase::Playing | Phase::Paused => {
                        state.toggle_pause();
                        if state.phase == Phase::Paused {
                            Ok(VoiceAction::Paused)
                        } else {
                            Ok(VoiceAction::Resumed)
                        }
                    }
                    _ => Err(VoiceRejection::NotApplicable),
                };
            }
            VoiceWord::Command(command) => command,
        };

        match G::voice_delivery(command) {
            Delivery::Direct => {
                if !state.is_playing() {
                    return Err(VoiceRejection::NotApplicable);
                }
                let applied = state.handle_command(side, command, CommandArg::Volume(volume));
                log::debug!("voice {}: {:?} (applied: {})", side.label(), command, applied);
                Ok(VoiceAction::Command {
                    side,
                    command,
                    applied,
                })
            }
            Delivery::Hold => {
                if !state.is_playing() {
                    return Err(VoiceRejection::NotApplicable);
                }
                state.handle_command(side, command, CommandArg::Hold(true));
                let interval = f64::from(self.settings.hold_interval_ms.max(1.0));
                let hold = VoiceHold {
                    side,
                    command,
                    until_ms: self.now_ms + f64::from(self.settings.hold_duration_ms),
                    next_assert_ms: self.now_ms + interval,
                };
                match self
                    .holds
                    .iter_mut()
                    .find(|h| h.side == side && h.command == command)
                {
                    Some(existing) => *existing = hold,
                    None => self.holds.push(hold),
                }
                log::debug!("voice {}: holding {:?}", side.label(), command);
                Ok(VoiceAction::Hold { side, command })
            }
            Delivery::SyntheticKey => {
                self.last_direction[side.index()] = Some(command);
                self.press(side, command, volume)
            }
        }
    }

    /// A loud enough `volume` message repeats the player's last direction
    fn continue_direction(
        &mut self,
        side: Side,
        volume: f32,
    ) -> Result<VoiceAction<G::Command>, VoiceRejection> {
        if !(volume >= self.settings.continuous_min_volume) {
            return Err(VoiceRejection::NotApplicable);
        }
        let command = self.last_direction[side.index()].ok_or(VoiceRejection::NotApplicable)?;
        self.press(side, command, volume)
    }

    /// Hold the command's key for a volume-scaled time. A newer press on
    /// the same key replaces the older one.
    fn press(
        &mut self,
        side: Side,
        command: G::Command,
        volume: f32,
    ) -> Result<VoiceAction<G::Command>, VoiceRejection> {
        let key = G::key_for(side, command).ok_or(VoiceRejection::NotApplicable)?;
        let volume = if volume.is_finite() { volume } else { 0.0 };
        let duration_ms = self
            .settings
            .synthetic_press_ms(volume * G::volume_bias(command));
        self.presses
            .insert(key, self.now_ms + f64::from(duration_ms));
        log::debug!("voice {}: press {} for {:.0} ms", side.label(), key, duration_ms);
        Ok(VoiceAction::KeyPress {
            side,
            key,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::boxing::AttackKind;
    use crate::games::boxing::FighterState;
    use crate::games::{Boxing, BoxingCommand, Pong, Soccer};

    const FRAME: f32 = 16.0;

    fn playing<G: Controls>(game: G) -> (MatchState<G>, Dispatcher<G>) {
        let mut state = MatchState::new(game, 1);
        state.start_match();
        for _ in 0..100 {
            if state.phase == Phase::Playing {
                break;
            }
            state.update(100.0);
        }
        assert_eq!(state.phase, Phase::Playing);
        (state, Dispatcher::new(Settings::default()))
    }

    fn frames<G: Controls>(
        dispatcher: &mut Dispatcher<G>,
        state: &mut MatchState<G>,
        input: &InputState,
        n: usize,
    ) {
        for _ in 0..n {
            dispatcher.frame(input, state, FRAME);
            state.update(FRAME);
        }
    }

    #[test]
    fn test_start_key_is_edge_triggered() {
        let mut state = MatchState::new(Boxing::default(), 1);
        let mut dispatcher = Dispatcher::new(Settings::default());
        let mut input = InputState::new();
        input.press(" ");
        dispatcher.frame(&input, &mut state, FRAME);
        assert_eq!(state.phase, Phase::Countdown);

        // Still held: no second action
        dispatcher.frame(&input, &mut state, FRAME);
        assert_eq!(state.phase, Phase::Countdown);

        // Enter shares the latch with Space
        input.press("Enter");
        dispatcher.frame(&input, &mut state, FRAME);
        assert_eq!(state.phase, Phase::Countdown);
    }

    #[test]
    fn test_space_pauses_and_escape_abandons() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let mut input = InputState::new();
        input.press(" ");
        dispatcher.frame(&input, &mut state, FRAME);
        assert_eq!(state.phase, Phase::Paused);
        input.release(" ");
        input.press("Escape");
        dispatcher.frame(&input, &mut state, FRAME);
        assert_eq!(state.phase, Phase::Waiting);
    }

    #[test]
    fn test_attack_key_fires_once_per_press() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let mut input = InputState::new();
        input.press("w");
        frames(&mut dispatcher, &mut state, &input, 30);
        // Jab costs 15 stamina; holding the key must not repeat it
        let stamina = state.game.fighter(Side::P1).stamina;
        assert!(stamina > 85.0);
        assert_eq!(state.game.fighter(Side::P1).stats.punches_thrown, 1);
    }

    #[test]
    fn test_block_key_is_level_triggered() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let mut input = InputState::new();
        input.press("r");
        frames(&mut dispatcher, &mut state, &input, 3);
        assert_eq!(state.game.fighter(Side::P1).state, FighterState::Blocking);
        input.release("r");
        frames(&mut dispatcher, &mut state, &input, 1);
        assert_eq!(state.game.fighter(Side::P1).state, FighterState::Idle);
    }

    #[test]
    fn test_voice_command_routes_and_debounces() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let msg = r#"{"type":"command","player":2,"command":"jab","command_confidence":0.9}"#;
        let action = dispatcher.voice(msg, &mut state).unwrap();
        assert_eq!(
            action,
            VoiceAction::Command {
                side: Side::P2,
                command: BoxingCommand::Attack(AttackKind::Jab),
                applied: true
            }
        );
        assert!(matches!(
            dispatcher.voice(msg, &mut state),
            Err(VoiceRejection::Debounced)
        ));

        // Window passes
        frames(&mut dispatcher, &mut state, &InputState::new(), 7);
        assert!(dispatcher.voice(msg, &mut state).is_ok());
    }

    #[test]
    fn test_voice_confidence_threshold() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let low = r#"{"type":"command","player":1,"command":"hook","command_confidence":0.6}"#;
        assert!(matches!(
            dispatcher.voice(low, &mut state),
            Err(VoiceRejection::LowConfidence { .. })
        ));

        // Relaxed preset lowers the bar to 0.55
        let mut settings = Settings::default();
        settings.apply_preset(crate::settings::ControlPreset::Relaxed);
        dispatcher.set_settings(settings);
        assert!(dispatcher.voice(low, &mut state).is_ok());
    }

    #[test]
    fn test_voice_alias_capped_confidence() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let msg = r#"{"type":"command","player":1,"command":"blog","command_confidence":0.99}"#;
        let action = dispatcher.voice(msg, &mut state).unwrap();
        assert_eq!(
            action,
            VoiceAction::Hold {
                side: Side::P1,
                command: BoxingCommand::Block
            }
        );
        let unknown = r#"{"type":"command","player":1,"command":"banana","command_confidence":0.99}"#;
        assert!(matches!(
            dispatcher.voice(unknown, &mut state),
            Err(VoiceRejection::UnknownWord(_))
        ));
    }

    #[test]
    fn test_voice_hold_expires_and_overrides_keyboard() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let msg = r#"{"type":"command","player":1,"command":"block","command_confidence":0.9}"#;
        dispatcher.voice(msg, &mut state).unwrap();
        assert!(dispatcher.is_voice_hold_active(Side::P1, BoxingCommand::Block));

        // Keyboard's "not held" does not cancel the voice hold
        let input = InputState::new();
        frames(&mut dispatcher, &mut state, &input, 50);
        assert_eq!(state.game.fighter(Side::P1).state, FighterState::Blocking);

        // 1500 ms total, then released
        frames(&mut dispatcher, &mut state, &input, 50);
        assert!(!dispatcher.is_voice_hold_active(Side::P1, BoxingCommand::Block));
        assert_eq!(state.game.fighter(Side::P1).state, FighterState::Idle);
    }

    #[test]
    fn test_voice_hold_survives_pause() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let msg = r#"{"type":"command","player":1,"command":"block","command_confidence":0.9}"#;
        dispatcher.voice(msg, &mut state).unwrap();
        let input = InputState::new();
        frames(&mut dispatcher, &mut state, &input, 3);
        assert_eq!(state.game.fighter(Side::P1).state, FighterState::Blocking);
        let held_at = dispatcher.now_ms();

        assert!(state.toggle_pause());
        frames(&mut dispatcher, &mut state, &input, 300);
        assert_eq!(dispatcher.now_ms(), held_at);
        assert!(dispatcher.is_voice_hold_active(Side::P1, BoxingCommand::Block));

        assert!(state.toggle_pause());
        frames(&mut dispatcher, &mut state, &input, 1);
        assert!(dispatcher.is_voice_hold_active(Side::P1, BoxingCommand::Block));
        assert_eq!(state.game.fighter(Side::P1).state, FighterState::Blocking);

        // The rest of the 1500 ms still runs out after the pause
        frames(&mut dispatcher, &mut state, &input, 100);
        assert!(!dispatcher.is_voice_hold_active(Side::P1, BoxingCommand::Block));
    }

    #[test]
    fn test_synthetic_press_survives_pause() {
        let (mut state, mut dispatcher) = playing(Pong::default());
        let msg = r#"{"type":"command","player":1,"command":"down","command_confidence":0.9,"volume":0.5}"#;
        dispatcher.voice(msg, &mut state).unwrap();
        let input = InputState::new();
        frames(&mut dispatcher, &mut state, &input, 2);

        assert!(state.toggle_pause());
        frames(&mut dispatcher, &mut state, &input, 200);
        assert!(dispatcher.is_key_down(&input, "s"));

        assert!(state.toggle_pause());
        frames(&mut dispatcher, &mut state, &input, 60);
        assert!(!dispatcher.is_key_down(&input, "s"));
    }

    #[test]
    fn test_voice_start_and_pause() {
        let mut state = MatchState::new(Pong::default(), 1);
        let mut dispatcher = Dispatcher::new(Settings::default());
        let serve = r#"{"type":"command","player":1,"command":"serve","command_confidence":0.8}"#;
        assert_eq!(dispatcher.voice(serve, &mut state).unwrap(), VoiceAction::Started);
        assert_eq!(state.phase, Phase::Countdown);

        let pause = r#"{"type":"command","player":2,"command":"pause","command_confidence":0.8}"#;
        assert!(matches!(
            dispatcher.voice(pause, &mut state),
            Err(VoiceRejection::NotApplicable)
        ));
    }

    #[test]
    fn test_synthetic_press_moves_paddle_then_releases() {
        let (mut state, mut dispatcher) = playing(Pong::default());
        let msg = r#"{"type":"command","player":2,"command":"up","command_confidence":0.9,"volume":0.25}"#;
        let action = dispatcher.voice(msg, &mut state).unwrap();
        let VoiceAction::KeyPress { key, duration_ms, .. } = action else {
            panic!("expected a key press, got {:?}", action);
        };
        assert_eq!(key, "ArrowUp");
        // 0.25 * 1.2 = 0.3 → (0.6)² = 0.36 → 60 + 0.36 * 180
        assert!((duration_ms - 124.8).abs() < 0.01);

        let start_y = state.game.paddle(Side::P2).y;
        frames(&mut dispatcher, &mut state, &InputState::new(), 4);
        assert!(state.game.paddle(Side::P2).y < start_y);
        assert!(dispatcher.is_key_down(&InputState::new(), "ArrowUp"));

        frames(&mut dispatcher, &mut state, &InputState::new(), 10);
        assert!(!dispatcher.is_key_down(&InputState::new(), "ArrowUp"));
    }

    #[test]
    fn test_volume_repeats_last_direction() {
        let (mut state, mut dispatcher) = playing(Pong::default());
        let quiet = r#"{"type":"volume","player":1,"volume":0.05}"#;
        let loud = r#"{"type":"volume","player":1,"volume":0.5}"#;
        // Nothing spoken yet
        assert!(dispatcher.voice(loud, &mut state).is_err());

        let down = r#"{"type":"command","player":1,"command":"down","command_confidence":0.9,"volume":0.5}"#;
        dispatcher.voice(down, &mut state).unwrap();
        assert!(matches!(
            dispatcher.voice(quiet, &mut state),
            Err(VoiceRejection::NotApplicable)
        ));
        let action = dispatcher.voice(loud, &mut state).unwrap();
        assert!(matches!(action, VoiceAction::KeyPress { key: "s", .. }));
    }

    #[test]
    fn test_soccer_voice_passes_volume() {
        let (mut state, mut dispatcher) = playing(Soccer::default());
        let msg = r#"{"type":"command","player":1,"command":"right","command_confidence":0.9,"volume":1.0}"#;
        dispatcher.voice(msg, &mut state).unwrap();
        assert_eq!(state.game.player(Side::P1).vel.x, 1250.0);
    }

    #[test]
    fn test_disabled_voice_and_clear() {
        let (mut state, mut dispatcher) = playing(Boxing::default());
        let msg = r#"{"type":"command","player":1,"command":"dodge","command_confidence":0.9}"#;
        dispatcher.voice(msg, &mut state).unwrap();
        dispatcher.clear();
        assert!(!dispatcher.is_voice_hold_active(Side::P1, BoxingCommand::Dodge));

        let settings = Settings {
            voice_enabled: false,
            ..Settings::default()
        };
        dispatcher.set_settings(settings);
        assert!(matches!(
            dispatcher.voice(msg, &mut state),
            Err(VoiceRejection::Disabled)
        ));
    }
}
