//! Resource and boundary clamps hold under arbitrary command/time sequences

use duel_arcade::games::boxing::AttackKind;
use duel_arcade::games::{Boxing, BoxingCommand, Pong, PongCommand, Soccer, SoccerCommand};
use duel_arcade::sim::{CommandArg, Game, MatchState, Phase};
use duel_arcade::{MatchResult, Side};
use proptest::prelude::*;

fn playing<G: Game>(game: G, seed: u64) -> MatchState<G> {
    let mut state = MatchState::new(game, seed);
    state.start_match();
    while state.phase != Phase::Playing {
        state.update(100.0);
    }
    state
}

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::P1), Just(Side::P2)]
}

fn arg() -> impl Strategy<Value = CommandArg> {
    prop_oneof![
        Just(CommandArg::Press),
        any::<bool>().prop_map(CommandArg::Hold),
        (0.0f32..=1.0).prop_map(CommandArg::Volume),
    ]
}

/// Frame times including stalls, zero and garbage
fn dt() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => 0.0f32..40.0,
        1 => 100.0f32..5000.0,
        1 => Just(-16.0f32),
        1 => Just(f32::NAN),
    ]
}

fn boxing_command() -> impl Strategy<Value = BoxingCommand> {
    prop_oneof![
        prop::sample::select(AttackKind::ALL.to_vec()).prop_map(BoxingCommand::Attack),
        Just(BoxingCommand::Block),
        Just(BoxingCommand::Dodge),
        Just(BoxingCommand::Forward),
        Just(BoxingCommand::Back),
    ]
}

fn soccer_command() -> impl Strategy<Value = SoccerCommand> {
    prop::sample::select(vec![
        SoccerCommand::Left,
        SoccerCommand::Right,
        SoccerCommand::Jump,
        SoccerCommand::Kick,
        SoccerCommand::Power,
    ])
}

fn pong_command() -> impl Strategy<Value = PongCommand> {
    prop_oneof![Just(PongCommand::Up), Just(PongCommand::Down)]
}

proptest! {
    #[test]
    fn prop_fighter_resources_stay_in_range(
        steps in prop::collection::vec((side(), boxing_command(), arg(), dt()), 1..200),
    ) {
        let mut state = playing(Boxing::default(), 1);
        let t = state.game.tuning.clone();
        for (side, command, arg, dt) in steps {
            state.handle_command(side, command, arg);
            state.update(dt);
            for f in &state.game.fighters {
                prop_assert!(f.health >= 0.0 && f.health <= f.max_health);
                prop_assert!(f.stamina >= 0.0 && f.stamina <= f.max_stamina);
                prop_assert!(f.x >= t.ring_left && f.x <= t.ring_right);
            }
            prop_assert!(state.score.p1 + state.score.p2 <= state.history.len() as u32);
        }
    }

    #[test]
    fn prop_soccer_players_stay_on_the_field(
        steps in prop::collection::vec((side(), soccer_command(), arg(), dt()), 1..300),
    ) {
        let mut state = playing(Soccer::default(), 2);
        let t = state.game.tuning.clone();
        let half = t.player_width / 2.0;
        for (side, command, arg, dt) in steps {
            state.handle_command(side, command, arg);
            state.update(dt);
            for p in &state.game.players {
                prop_assert!(p.pos.x >= t.field_left + half - 0.001);
                prop_assert!(p.pos.x <= t.field_right - half + 0.001);
                prop_assert!(p.pos.y <= t.field_y);
                prop_assert!(p.kick_cooldown_ms >= 0.0);
            }
            prop_assert!(state.score.p1 <= t.max_goals && state.score.p2 <= t.max_goals);
            if let Some(clock) = state.clock {
                prop_assert!(clock >= 0.0);
            }
        }
    }

    #[test]
    fn prop_paddles_stay_in_the_arena(
        seed in any::<u64>(),
        steps in prop::collection::vec((side(), pong_command(), dt()), 1..300),
    ) {
        let mut state = playing(Pong::default(), seed);
        let t = state.game.tuning.clone();
        for (side, command, dt) in steps {
            state.handle_command(side, command, CommandArg::Press);
            state.update(dt);
            for p in &state.game.paddles {
                prop_assert!(p.y >= 0.0 && p.y + p.height <= t.arena_height);
                prop_assert!(p.velocity.abs() <= t.paddle_max_speed);
            }
        }
        if let Some(MatchResult::Winner(side)) = state.winner {
            prop_assert_eq!(state.score.get(side), t.winning_score);
        }
    }
}
