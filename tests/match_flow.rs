//! Whole matches driven through `Session` the way a frame driver would

use duel_arcade::bot::Bot;
use duel_arcade::consts::REFERENCE_FRAME_MS;
use duel_arcade::games::{Boxing, GameKind, Pong};
use duel_arcade::input::{InputState, VoiceAction};
use duel_arcade::session::Arcade;
use duel_arcade::sim::{GameEvent, Phase};
use duel_arcade::{MatchResult, Session, Settings, Side};

fn run_to_end(arcade: &mut Arcade, bot: &mut Bot, max_frames: u32) -> u32 {
    let mut input = InputState::new();
    let mut frames = 0;
    while arcade.phase() != Phase::MatchEnd && frames < max_frames {
        arcade.drive(bot, &mut input);
        arcade.update(&input, REFERENCE_FRAME_MS);
        frames += 1;
    }
    frames
}

fn run_until<G>(session: &mut Session<G>, input: &InputState, phase: Phase, max_frames: u32)
where
    G: duel_arcade::input::Controls,
{
    for _ in 0..max_frames {
        if session.phase() == phase {
            return;
        }
        session.update(input, REFERENCE_FRAME_MS);
    }
    assert_eq!(session.phase(), phase);
}

#[test]
fn test_bot_boxing_match_runs_to_a_result() {
    let mut arcade = Arcade::new(GameKind::Boxing, 7, Settings::default());
    assert!(arcade.start_match());
    // Three 90 s rounds plus countdowns and intermissions
    run_to_end(&mut arcade, &mut Bot::both(), 60 * 60 * 8);
    assert_eq!(arcade.phase(), Phase::MatchEnd);
    assert!(arcade.winner().is_some());
}

#[test]
fn test_bot_soccer_match_ends_by_goals_or_clock() {
    let mut arcade = Arcade::new(GameKind::Soccer, 7, Settings::default());
    assert!(arcade.start_match());
    run_to_end(&mut arcade, &mut Bot::both(), 60 * 60 * 8);
    assert_eq!(arcade.phase(), Phase::MatchEnd);
    let score = arcade.score();
    assert!(score.p1 <= 5 && score.p2 <= 5);
}

#[test]
fn test_pong_bot_beats_idle_player() {
    let mut arcade = Arcade::new(GameKind::Pong, 11, Settings::default());
    assert!(arcade.start_match());
    run_to_end(&mut arcade, &mut Bot::new(&[Side::P1]), 60 * 60 * 30);
    assert_eq!(arcade.phase(), Phase::MatchEnd);
    let score = arcade.score();
    assert_eq!(score.p1.max(score.p2), 10);
}

#[test]
fn test_same_seed_same_match() {
    let play = || {
        let mut arcade = Arcade::new(GameKind::Pong, 1234, Settings::default());
        arcade.start_match();
        let mut bot = Bot::new(&[Side::P2]);
        let mut input = InputState::new();
        for _ in 0..3000 {
            arcade.drive(&mut bot, &mut input);
            arcade.update(&input, REFERENCE_FRAME_MS);
        }
        arcade.snapshot_json().unwrap()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_keyboard_knockout_then_next_round() {
    let mut session = Session::new(Boxing::default(), 1, Settings::default());
    let mut input = InputState::new();
    input.press("Enter");
    session.update(&input, REFERENCE_FRAME_MS);
    input.release("Enter");
    run_until(&mut session, &input, Phase::Playing, 600);

    let gap = session.state.game.tuning.min_distance;
    let p1_x = session.state.game.fighters[0].x;
    session.state.game.fighters[1].x = p1_x + gap;
    session.state.game.fighters[1].health = 5.0;

    input.press("w");
    let mut events = Vec::new();
    for _ in 0..30 {
        events.extend(session.update(&input, REFERENCE_FRAME_MS));
    }
    input.release("w");

    assert!(events.iter().any(|e| matches!(e, GameEvent::Hit { attacker: Side::P1, .. })));
    assert_eq!(session.phase(), Phase::Intermission);
    assert_eq!(session.state.score.p1, 1);
    let value: serde_json::Value = serde_json::from_str(&session.snapshot_json().unwrap()).unwrap();
    assert_eq!(value["banner"], "KO!");

    run_until(&mut session, &input, Phase::Countdown, 600);
    assert_eq!(session.state.round, 2);
    assert_eq!(session.state.game.fighters[1].health, session.state.game.fighters[1].max_health);
}

#[test]
fn test_voice_drives_pong_paddle() {
    let mut session = Session::new(Pong::default(), 5, Settings::default());
    let input = InputState::new();
    let start = r#"{"type":"command","player":2,"command":"serve","command_confidence":0.8}"#;
    assert_eq!(session.voice_message(start).unwrap(), VoiceAction::Started);
    run_until(&mut session, &input, Phase::Playing, 600);

    let y0 = session.state.game.paddles[1].y;
    let down = r#"{"type":"command","player":2,"command":"down","command_confidence":0.9,"volume":0.8}"#;
    let action = session.voice_message(down).unwrap();
    let VoiceAction::KeyPress { key, duration_ms, .. } = action else {
        panic!("expected a key press, got {action:?}");
    };
    assert_eq!(key, "ArrowDown");
    assert!(duration_ms > 0.0);

    for _ in 0..10 {
        session.update(&input, REFERENCE_FRAME_MS);
    }
    assert!(session.state.game.paddles[1].y > y0);
    assert!(session.dispatcher.is_key_down(&input, "ArrowDown"));

    // The synthetic press lets go on its own
    for _ in 0..60 {
        session.update(&input, REFERENCE_FRAME_MS);
    }
    assert!(!session.dispatcher.is_key_down(&input, "ArrowDown"));
}

#[test]
fn test_pause_freezes_play_and_escape_abandons() {
    let mut arcade = Arcade::new(GameKind::Soccer, 3, Settings::default());
    arcade.start_match();
    let mut input = InputState::new();
    while arcade.phase() != Phase::Playing {
        arcade.update(&input, REFERENCE_FRAME_MS);
    }

    input.press(" ");
    arcade.update(&input, REFERENCE_FRAME_MS);
    input.release(" ");
    assert_eq!(arcade.phase(), Phase::Paused);

    let before = arcade.snapshot_json().unwrap();
    for _ in 0..30 {
        arcade.update(&input, REFERENCE_FRAME_MS);
    }
    let frozen: serde_json::Value = serde_json::from_str(&before).unwrap();
    let after: serde_json::Value = serde_json::from_str(&arcade.snapshot_json().unwrap()).unwrap();
    assert_eq!(frozen["match"]["game"], after["match"]["game"]);
    assert_eq!(frozen["match"]["clock"], after["match"]["clock"]);

    input.press("Escape");
    arcade.update(&input, REFERENCE_FRAME_MS);
    assert_eq!(arcade.phase(), Phase::Waiting);
    assert_eq!(arcade.winner(), None::<MatchResult>);
}
