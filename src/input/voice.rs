//! Voice boundary: wire messages from the speech backend, transcript
//! normalisation and the reasons an utterance gets dropped.

use serde::Deserialize;
use thiserror::Error;

use crate::Side;

/// Confidence assumed for an exact vocabulary hit when the backend sends none
pub const EXACT_CONFIDENCE: f32 = 0.95;
/// Confidence ceiling for a word recovered through the alias table
pub const ALIAS_CONFIDENCE: f32 = 0.85;

/// One JSON message from the speech backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceMessage {
    /// A recognised utterance
    Command {
        #[serde(default)]
        player: Option<u8>,
        #[serde(default)]
        command: Option<String>,
        #[serde(default)]
        command_confidence: Option<f32>,
        #[serde(default)]
        volume: Option<f32>,
    },
    /// Loudness while the player keeps talking
    Volume {
        #[serde(default)]
        player: Option<u8>,
        #[serde(default)]
        volume: Option<f32>,
    },
    /// Status and bookkeeping messages
    #[serde(other)]
    Other,
}

impl VoiceMessage {
    pub fn parse(json: &str) -> Result<Self, VoiceRejection> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Why a voice message did not turn into an action
#[derive(Debug, Error)]
pub enum VoiceRejection {
    #[error("malformed voice message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("voice control is disabled")]
    Disabled,
    #[error("speaker is not assigned to a player")]
    Unassigned,
    #[error("unknown player {0}")]
    UnknownPlayer(u8),
    #[error("no command in utterance")]
    MissingCommand,
    #[error("confidence {confidence:.2} below threshold {threshold:.2}")]
    LowConfidence { confidence: f32, threshold: f32 },
    #[error("unknown command word {0:?}")]
    UnknownWord(String),
    #[error("repeated command inside the debounce window")]
    Debounced,
    #[error("command does not apply right now")]
    NotApplicable,
    #[error("message type carries no command")]
    Ignored,
}

impl VoiceRejection {
    /// Routine drops (noise, repeats) as opposed to protocol problems
    pub fn is_routine(&self) -> bool {
        !matches!(
            self,
            VoiceRejection::Malformed(_)
                | VoiceRejection::UnknownPlayer(_)
                | VoiceRejection::UnknownWord(_)
        )
    }
}

/// Map a wire player number to a side
pub fn resolve_player(player: Option<u8>) -> Result<Side, VoiceRejection> {
    let player = player.ok_or(VoiceRejection::Unassigned)?;
    Side::from_player(player).ok_or(VoiceRejection::UnknownPlayer(player))
}

/// Common mis-hearings of the command words
pub fn alias(word: &str) -> Option<&'static str> {
    let canonical = match word {
        "yup" | "yep" | "uh" | "uhh" | "app" | "op" => "up",
        "dawn" | "town" | "darn" => "down",
        "star" | "starts" | "starting" | "started" => "start",
        "paws" | "paused" | "pausing" | "paus" | "pos" => "pause",
        "serves" | "serving" | "served" | "surf" => "serve",
        "resumes" | "resuming" | "resumed" => "resume",
        "job" | "ja" | "jap" | "jabs" | "jabbed" => "jab",
        "crawss" | "craw" | "crosses" | "crossed" => "cross",
        "huk" | "hooked" | "hooking" | "hulk" => "hook",
        "cut" | "upperkat" | "upcut" | "uppercuts" => "uppercut",
        "blog" | "blocked" | "blocking" | "box" | "bloc" => "block",
        "guarding" | "guarded" => "guard",
        "doge" | "dodged" | "dodging" | "dok" | "dogs" => "dodge",
        "ducked" | "ducking" | "ducks" => "duck",
        "for" | "towards" | "forwards" | "forwarded" => "forward",
        "advancing" | "advanced" | "advances" => "advance",
        "bak" | "backwards" | "backing" | "backed" => "back",
        "retreating" | "retreated" | "retreats" => "retreat",
        "lefty" | "lefts" => "left",
        "righty" | "rights" => "right",
        "fights" | "fighting" | "fighter" => "fight",
        _ => return None,
    };
    Some(canonical)
}

/// Trim and lowercase a transcript word, dropping trailing punctuation
pub fn clean_word(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}

/// Look a word up exactly, then through the alias table.
///
/// Returns the result together with the confidence to use when the backend
/// sent none, and the ceiling applied to the backend's own figure.
pub fn lookup<T>(word: &str, vocabulary: impl Fn(&str) -> Option<T>) -> Option<(T, f32)> {
    let word = clean_word(word);
    if let Some(found) = vocabulary(&word) {
        return Some((found, EXACT_CONFIDENCE));
    }
    alias(&word)
        .and_then(|canonical| vocabulary(canonical))
        .map(|found| (found, ALIAS_CONFIDENCE))
}

/// Effective confidence of an utterance: aliased words are capped
pub fn confidence(reported: Option<f32>, ceiling: f32) -> f32 {
    let reported = reported.filter(|c| c.is_finite()).unwrap_or(ceiling);
    if ceiling < EXACT_CONFIDENCE {
        reported.min(ceiling)
    } else {
        reported
    }
}
