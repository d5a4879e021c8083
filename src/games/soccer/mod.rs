//! Head soccer: first to N goals against a running match clock
//!
//! Frame order: players (then pushed apart if their bodies overlap), ball,
//! flame shots (which may score), cages, head/ball contacts, then the goal
//! lines.

pub mod ball;
pub mod player;
pub mod powerup;

pub use ball::Ball;
pub use player::{Player, Power, SoccerStats};
pub use powerup::{FlameShot, GoalCage};

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::sim::{
    ClockMode, CommandArg, EndReason, Game, GameEvent, MatchFormat, MatchRules, Resume,
    RoundOutcome, circle_contact, enforce_separation, reflect_velocity,
};
use crate::tuning::SoccerTuning;
use crate::{Facing, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoccerCommand {
    Left,
    Right,
    Jump,
    Kick,
    Power,
}

#[derive(Debug, Clone, Serialize)]
pub struct Soccer {
    #[serde(skip)]
    pub tuning: SoccerTuning,
    pub players: [Player; 2],
    pub ball: Ball,
    pub flames: Vec<FlameShot>,
    pub cages: Vec<GoalCage>,
    /// Events raised by commands, flushed on the next step
    #[serde(skip)]
    pending: Vec<GameEvent>,
}

impl Default for Soccer {
    fn default() -> Self {
        Self::new(SoccerTuning::default())
    }
}

impl Soccer {
    pub fn new(tuning: SoccerTuning) -> Self {
        let players = [
            Player::new(Side::P1, &tuning),
            Player::new(Side::P2, &tuning),
        ];
        let ball = Ball::new(&tuning);
        Self {
            tuning,
            players,
            ball,
            flames: Vec::new(),
            cages: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        &mut self.players[side.index()]
    }

    /// Whether an active cage covers `goal`
    pub fn is_caged(&self, goal: Side) -> bool {
        self.cages.iter().any(|c| c.guards == goal && c.is_active())
    }

    /// Walking speed factor for a voice command's loudness
    fn speed_multiplier(&self, arg: CommandArg) -> f32 {
        match arg {
            CommandArg::Volume(v) if v.is_finite() => {
                1.0 + v.clamp(0.0, 1.0) * (self.tuning.voice_speed_max_multiplier - 1.0)
            }
            _ => 1.0,
        }
    }

    fn kick(&mut self, side: Side) -> bool {
        let t = &self.tuning;
        let player = &mut self.players[side.index()];
        if !player.kick(t) {
            return false;
        }

        let reach = player.kick_point(t).distance(self.ball.pos);
        if reach < t.ball_radius + t.kick_reach {
            self.ball.apply_force(Vec2::new(
                player.facing.sign() * t.kick_force,
                -t.kick_force * t.kick_lift,
            ));
            self.ball.last_touched_by = Some(side);
            player.stats.kicks += 1;
            self.pending.push(GameEvent::Kick { side });
        }
        true
    }

    fn use_power(&mut self, side: Side) -> bool {
        let t = &self.tuning;
        let player = &mut self.players[side.index()];
        if !player.use_power(t) {
            return false;
        }

        match player.power {
            Power::Flame => self.flames.push(FlameShot::launch(player, t)),
            Power::Cage => self.cages.push(GoalCage::new(side, t)),
        }
        log::debug!("{} uses {:?}", side.label(), player.power);
        self.pending.push(GameEvent::PowerUsed { side });
        true
    }

    /// Advance flame shots; returns the scorer if one crossed an open goal
    fn update_flames(&mut self, dt_ms: f32, events: &mut Vec<GameEvent>) -> Option<Side> {
        let t = &self.tuning;
        let mut scorer = None;

        for shot in &mut self.flames {
            shot.update(dt_ms, t);
            if !shot.active {
                continue;
            }

            if let Some(goal) = shot.goal_entered(t) {
                shot.active = false;
                let caged = self
                    .cages
                    .iter()
                    .any(|c| c.guards == goal && c.is_active());
                if caged {
                    events.push(GameEvent::FlameBlocked { by: goal });
                } else if scorer.is_none() {
                    scorer = Some(goal.opponent());
                }
                continue;
            }

            let opponent = &self.players[shot.owner.opponent().index()];
            if shot.bounds(t).overlaps(&opponent.head_box(t)) {
                shot.active = false;
                events.push(GameEvent::FlameBlocked { by: opponent.side });
            }
        }

        self.flames.retain(|s| s.active);
        scorer
    }

    fn update_cages(&mut self, dt_ms: f32) {
        for cage in &mut self.cages {
            cage.update(dt_ms);
        }
        self.cages.retain(GoalCage::is_active);
    }

    /// Circle contact between the ball and each head, P1 first
    fn resolve_headers(&mut self, events: &mut Vec<GameEvent>) {
        let t = &self.tuning;
        for player in &mut self.players {
            let Some(contact) = circle_contact(
                self.ball.pos,
                self.ball.radius,
                player.head_center(t),
                t.head_radius,
            ) else {
                continue;
            };

            self.ball.pos += contact.normal * contact.penetration;
            self.ball.apply_force(Vec2::new(
                player.facing.sign() * t.header_force + player.vel.x * t.header_momentum,
                -t.header_force * t.header_lift,
            ));
            self.ball.last_touched_by = Some(player.side);
            player.stats.headers += 1;
            events.push(GameEvent::Header { side: player.side });
        }
    }

    /// Goal line check. A caged goal throws the ball back into play.
    fn check_goal(&mut self, events: &mut Vec<GameEvent>) -> Option<Side> {
        let t = &self.tuning;
        if !t.in_goal_band(self.ball.pos.y) {
            return None;
        }
        let goal = if self.ball.pos.x < t.field_left {
            Side::P1
        } else if self.ball.pos.x > t.field_right {
            Side::P2
        } else {
            return None;
        };

        let Some(cage) = self.cages.iter().find(|c| c.guards == goal && c.is_active()) else {
            return Some(goal.opponent());
        };

        // Back onto the goal line, bouncing into the field
        let normal = match goal {
            Side::P1 => Vec2::X,
            Side::P2 => Vec2::NEG_X,
        };
        self.ball.pos.x = cage.line_x(t) + normal.x * self.ball.radius;
        if self.ball.vel.dot(normal) < 0.0 {
            self.ball.vel = reflect_velocity(self.ball.vel, normal);
        }
        self.ball.vel.x *= t.ball_bounce_damping;
        events.push(GameEvent::CageSave { goal });
        None
    }

    /// Bodies never overlap; heads may
    fn separate_players(&mut self) {
        let t = &self.tuning;
        let [p1, p2] = &mut self.players;
        if !p1.body_box(t).overlaps(&p2.body_box(t)) {
            return;
        }
        let half = t.player_width / 2.0;
        enforce_separation(
            &mut p1.pos.x,
            &mut p2.pos.x,
            t.player_width,
            t.field_left + half,
            t.field_right - half,
        );
    }

    fn score_goal(&mut self, scorer: Side, events: &mut Vec<GameEvent>) -> RoundOutcome {
        self.players[scorer.index()].stats.goals += 1;
        events.push(GameEvent::Goal { scorer });
        events.push(GameEvent::Shake {
            intensity: self.tuning.goal_shake,
            duration_ms: self.tuning.goal_shake_ms,
        });
        RoundOutcome::win(scorer, EndReason::Goal)
    }
}

impl Game for Soccer {
    type Command = SoccerCommand;
    type Stats = SoccerStats;
    const NAME: &'static str = "soccer";

    fn rules(&self) -> MatchRules {
        MatchRules {
            format: MatchFormat::FirstTo {
                target: self.tuning.max_goals,
            },
            clock: ClockMode::PerMatch {
                secs: self.tuning.match_secs,
            },
            countdown_secs: self.tuning.countdown_secs,
            intermission_secs: self.tuning.celebration_secs,
            resume: Resume::Immediate,
        }
    }

    /// Kick-off positions; shots and cages from the previous point are gone
    fn reset_round(&mut self, _rng: &mut Pcg32) {
        let t = &self.tuning;
        for player in &mut self.players {
            player.reset(t);
        }
        self.ball.reset(t);
        self.flames.clear();
        self.cages.clear();
        self.pending.clear();
    }

    fn step(
        &mut self,
        dt_ms: f32,
        _rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Option<RoundOutcome> {
        events.append(&mut self.pending);

        let t = &self.tuning;
        for player in &mut self.players {
            player.update(dt_ms, t);
        }
        self.separate_players();
        self.ball.update(dt_ms, &self.tuning);

        if let Some(scorer) = self.update_flames(dt_ms, events) {
            return Some(self.score_goal(scorer, events));
        }
        self.update_cages(dt_ms);
        self.resolve_headers(events);

        let scorer = self.check_goal(events)?;
        Some(self.score_goal(scorer, events))
    }

    fn apply(&mut self, side: Side, command: SoccerCommand, arg: CommandArg) -> bool {
        let direction = match command {
            SoccerCommand::Left => Facing::Left,
            SoccerCommand::Right => Facing::Right,
            SoccerCommand::Jump => return self.players[side.index()].jump(&self.tuning),
            SoccerCommand::Kick => return self.kick(side),
            SoccerCommand::Power => return self.use_power(side),
        };
        let multiplier = self.speed_multiplier(arg);
        self.players[side.index()].run(direction, multiplier, &self.tuning);
        true
    }

    fn stats(&self, side: Side) -> SoccerStats {
        self.player(side).stats.clone()
    }
}
