//! Duel Arcade headless demo
//!
//! Plays one bot-versus-bot match of each game (or the ones named on the
//! command line) and logs the results. `--tuning=FILE` loads gameplay
//! overrides from a JSON file. The browser build is driven from
//! JavaScript through `WebArcade` instead.

#[cfg(not(target_arch = "wasm32"))]
use duel_arcade::{
    bot::Bot,
    consts::REFERENCE_FRAME_MS,
    games::GameKind,
    input::InputState,
    session::Arcade,
    sim::{GameEvent, Phase},
    Settings, Side,
};

/// Give up on a match after this many simulated frames (30 minutes)
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 30;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut seed = 42u64;
    let mut tuning = None;
    let mut kinds = Vec::new();
    for arg in std::env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--seed=") {
            match value.parse() {
                Ok(s) => seed = s,
                Err(e) => log::warn!("Ignoring seed {:?}: {}", value, e),
            }
        } else if let Some(path) = arg.strip_prefix("--tuning=") {
            match std::fs::read_to_string(path) {
                Ok(json) => tuning = Some(json),
                Err(e) => log::warn!("Ignoring tuning file {:?}: {}", path, e),
            }
        } else if let Some(kind) = GameKind::from_str(&arg) {
            kinds.push(kind);
        } else {
            log::warn!("Unknown game {:?}", arg);
        }
    }
    if kinds.is_empty() {
        kinds = GameKind::ALL.to_vec();
    }

    log::info!("Duel Arcade (native) starting, seed {}", seed);
    for kind in kinds {
        play(kind, seed, tuning.as_deref());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn play(kind: GameKind, seed: u64, tuning: Option<&str>) {
    let settings = Settings::load();
    let mut arcade = match tuning {
        Some(json) => match Arcade::with_tuning(kind, json, seed, settings.clone()) {
            Ok(arcade) => arcade,
            Err(e) => {
                log::warn!("{}: bad tuning, using defaults: {}", kind.as_str(), e);
                Arcade::new(kind, seed, settings)
            }
        },
        None => Arcade::new(kind, seed, settings),
    };
    let mut bot = Bot::both();
    let mut input = InputState::new();
    let mut counts = [0u32; 2];

    arcade.start_match();
    let mut frames = 0;
    while arcade.phase() != Phase::MatchEnd && frames < MAX_FRAMES {
        arcade.drive(&mut bot, &mut input);
        for event in arcade.update(&input, REFERENCE_FRAME_MS) {
            match event {
                GameEvent::Hit { attacker, .. }
                | GameEvent::PaddleReturn { side: attacker }
                | GameEvent::Kick { side: attacker }
                | GameEvent::Header { side: attacker } => counts[attacker.index()] += 1,
                GameEvent::RoundOver(outcome) => log::info!(
                    "{}: {} ({})",
                    kind.as_str(),
                    outcome.reason.banner(),
                    outcome.winner.map_or("draw", Side::label)
                ),
                _ => {}
            }
        }
        frames += 1;
    }

    let score = arcade.score();
    match arcade.winner() {
        Some(result) => log::info!(
            "{}: {} after {:.0}s, score {}-{}, touches {}-{}",
            kind.as_str(),
            result.label(),
            frames as f32 * REFERENCE_FRAME_MS / 1000.0,
            score.p1,
            score.p2,
            counts[0],
            counts[1]
        ),
        None => log::warn!(
            "{}: no result after {} frames, score {}-{}",
            kind.as_str(),
            frames,
            score.p1,
            score.p2
        ),
    }
    match arcade.snapshot_json() {
        Ok(json) => log::debug!("{}: final state {}", kind.as_str(), json),
        Err(e) => log::warn!("{}: snapshot failed: {}", kind.as_str(), e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry point is `platform::web::init`; this only satisfies the bin target
}
