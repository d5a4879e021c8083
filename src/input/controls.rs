//! Per-game control schemes: key bindings, trigger styles and voice vocabulary

use crate::Side;
use crate::games::boxing::AttackKind;
use crate::games::{Boxing, BoxingCommand, Pong, PongCommand, Soccer, SoccerCommand};
use crate::sim::Game;

/// How a held key turns into commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once per press
    Edge,
    /// Every frame while down
    Level,
    /// Every frame with the held/released state (block, dodge)
    Hold,
}

/// How a voice command reaches the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Applied once, with the utterance volume
    Direct,
    /// Held for a fixed time, re-asserted periodically
    Hold,
    /// Presses the command's bound key for a volume-scaled duration
    SyntheticKey,
}

/// Match-level voice words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlWord {
    Start,
    Pause,
}

/// A recognised voice word after vocabulary lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceWord<C> {
    Control(ControlWord),
    Command(C),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding<C> {
    pub key: &'static str,
    pub side: Side,
    pub command: C,
}

const fn bind<C>(key: &'static str, side: Side, command: C) -> KeyBinding<C> {
    KeyBinding { key, side, command }
}

/// The control surface of a game
pub trait Controls: Game {
    /// Voice commands below this confidence are dropped (before presets)
    const VOICE_MIN_CONFIDENCE: f32;

    fn key_bindings() -> &'static [KeyBinding<Self::Command>];

    fn trigger(command: Self::Command) -> Trigger;

    /// Look up a canonical voice word
    fn voice_word(word: &str) -> Option<VoiceWord<Self::Command>>;

    fn voice_delivery(_command: Self::Command) -> Delivery {
        Delivery::Direct
    }

    /// Loudness correction for words that are naturally quiet or loud
    fn volume_bias(_command: Self::Command) -> f32 {
        1.0
    }

    /// Key bound to `command` for `side`
    fn key_for(side: Side, command: Self::Command) -> Option<&'static str> {
        Self::key_bindings()
            .iter()
            .find(|b| b.side == side && b.command == command)
            .map(|b| b.key)
    }
}

// --- Boxing ---

const BOXING_KEYS: [KeyBinding<BoxingCommand>; 16] = [
    bind("w", Side::P1, BoxingCommand::Attack(AttackKind::Jab)),
    bind("s", Side::P1, BoxingCommand::Attack(AttackKind::Cross)),
    bind("q", Side::P1, BoxingCommand::Attack(AttackKind::Hook)),
    bind("e", Side::P1, BoxingCommand::Attack(AttackKind::Uppercut)),
    bind("r", Side::P1, BoxingCommand::Block),
    bind("f", Side::P1, BoxingCommand::Dodge),
    bind("a", Side::P1, BoxingCommand::Back),
    bind("d", Side::P1, BoxingCommand::Forward),
    bind("i", Side::P2, BoxingCommand::Attack(AttackKind::Jab)),
    bind("k", Side::P2, BoxingCommand::Attack(AttackKind::Cross)),
    bind("u", Side::P2, BoxingCommand::Attack(AttackKind::Hook)),
    bind("o", Side::P2, BoxingCommand::Attack(AttackKind::Uppercut)),
    bind("y", Side::P2, BoxingCommand::Block),
    bind("h", Side::P2, BoxingCommand::Dodge),
    bind("l", Side::P2, BoxingCommand::Back),
    bind("j", Side::P2, BoxingCommand::Forward),
];

impl Controls for Boxing {
    const VOICE_MIN_CONFIDENCE: f32 = 0.65;

    fn key_bindings() -> &'static [KeyBinding<BoxingCommand>] {
        &BOXING_KEYS
    }

    fn trigger(command: BoxingCommand) -> Trigger {
        match command {
            BoxingCommand::Block | BoxingCommand::Dodge => Trigger::Hold,
            _ => Trigger::Edge,
        }
    }

    fn voice_word(word: &str) -> Option<VoiceWord<BoxingCommand>> {
        use BoxingCommand::*;
        let command = match word {
            "jab" | "left" => Attack(AttackKind::Jab),
            "cross" | "right" => Attack(AttackKind::Cross),
            "hook" => Attack(AttackKind::Hook),
            "uppercut" | "upper" => Attack(AttackKind::Uppercut),
            "block" | "guard" => Block,
            "dodge" | "duck" => Dodge,
            "forward" | "advance" => Forward,
            "back" | "retreat" => Back,
            "start" | "fight" => return Some(VoiceWord::Control(ControlWord::Start)),
            "pause" => return Some(VoiceWord::Control(ControlWord::Pause)),
            _ => return None,
        };
        Some(VoiceWord::Command(command))
    }

    fn voice_delivery(command: BoxingCommand) -> Delivery {
        match command {
            BoxingCommand::Block | BoxingCommand::Dodge => Delivery::Hold,
            _ => Delivery::Direct,
        }
    }
}

// --- Soccer ---

const SOCCER_KEYS: [KeyBinding<SoccerCommand>; 10] = [
    bind("a", Side::P1, SoccerCommand::Left),
    bind("d", Side::P1, SoccerCommand::Right),
    bind("w", Side::P1, SoccerCommand::Jump),
    bind("s", Side::P1, SoccerCommand::Kick),
    bind("e", Side::P1, SoccerCommand::Power),
    bind("j", Side::P2, SoccerCommand::Left),
    bind("l", Side::P2, SoccerCommand::Right),
    bind("i", Side::P2, SoccerCommand::Jump),
    bind("k", Side::P2, SoccerCommand::Kick),
    bind("o", Side::P2, SoccerCommand::Power),
];

impl Controls for Soccer {
    const VOICE_MIN_CONFIDENCE: f32 = 0.65;

    fn key_bindings() -> &'static [KeyBinding<SoccerCommand>] {
        &SOCCER_KEYS
    }

    fn trigger(command: SoccerCommand) -> Trigger {
        match command {
            SoccerCommand::Left | SoccerCommand::Right => Trigger::Level,
            _ => Trigger::Edge,
        }
    }

    fn voice_word(word: &str) -> Option<VoiceWord<SoccerCommand>> {
        let command = match word {
            "left" => SoccerCommand::Left,
            "right" => SoccerCommand::Right,
            "jump" | "up" => SoccerCommand::Jump,
            "kick" | "shoot" => SoccerCommand::Kick,
            "power" | "special" | "ability" => SoccerCommand::Power,
            "start" | "play" => return Some(VoiceWord::Control(ControlWord::Start)),
            "pause" | "stop" => return Some(VoiceWord::Control(ControlWord::Pause)),
            _ => return None,
        };
        Some(VoiceWord::Command(command))
    }
}

// --- Pong ---

const PONG_KEYS: [KeyBinding<PongCommand>; 4] = [
    bind("w", Side::P1, PongCommand::Up),
    bind("s", Side::P1, PongCommand::Down),
    bind("ArrowUp", Side::P2, PongCommand::Up),
    bind("ArrowDown", Side::P2, PongCommand::Down),
];

impl Controls for Pong {
    const VOICE_MIN_CONFIDENCE: f32 = 0.5;

    fn key_bindings() -> &'static [KeyBinding<PongCommand>] {
        &PONG_KEYS
    }

    fn trigger(_command: PongCommand) -> Trigger {
        Trigger::Level
    }

    fn voice_word(word: &str) -> Option<VoiceWord<PongCommand>> {
        match word {
            "up" => Some(VoiceWord::Command(PongCommand::Up)),
            "down" => Some(VoiceWord::Command(PongCommand::Down)),
            "start" | "serve" | "resume" => Some(VoiceWord::Control(ControlWord::Start)),
            "pause" => Some(VoiceWord::Control(ControlWord::Pause)),
            _ => None,
        }
    }

    fn voice_delivery(_command: PongCommand) -> Delivery {
        Delivery::SyntheticKey
    }

    /// "up" comes out quieter than "down"
    fn volume_bias(command: PongCommand) -> f32 {
        match command {
            PongCommand::Up => 1.2,
            PongCommand::Down => 0.9,
        }
    }
}
