//! Pong: first to N points, no clock, random serve after every point

pub mod ball;
pub mod paddle;

pub use ball::{Ball, Serve};
pub use paddle::{Paddle, PongStats};

use rand_pcg::Pcg32;
use serde::Serialize;

use crate::Side;
use crate::sim::{
    ClockMode, CommandArg, EndReason, Game, GameEvent, MatchFormat, MatchRules, Resume,
    RoundOutcome,
};
use crate::tuning::PongTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PongCommand {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
pub struct Pong {
    #[serde(skip)]
    pub tuning: PongTuning,
    pub paddles: [Paddle; 2],
    pub ball: Ball,
}

impl Default for Pong {
    fn default() -> Self {
        Self::new(PongTuning::default())
    }
}

impl Pong {
    pub fn new(tuning: PongTuning) -> Self {
        let paddles = [
            Paddle::new(Side::P1, &tuning),
            Paddle::new(Side::P2, &tuning),
        ];
        let ball = Ball::new(&tuning);
        Self {
            tuning,
            paddles,
            ball,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    /// Top and bottom walls
    fn bounce_walls(&mut self, events: &mut Vec<GameEvent>) {
        let t = &self.tuning;
        let ball = &mut self.ball;
        if ball.pos.y - ball.radius <= 0.0 {
            ball.pos.y = ball.radius;
            ball.reverse_y(t);
            events.push(GameEvent::WallBounce);
        }
        if ball.pos.y + ball.radius >= t.arena_height {
            ball.pos.y = t.arena_height - ball.radius;
            ball.reverse_y(t);
            events.push(GameEvent::WallBounce);
        }
    }

    /// Return the ball off a paddle it is moving toward. Edges touching count.
    fn bounce_paddles(&mut self, events: &mut Vec<GameEvent>) {
        let t = &self.tuning;
        let ball = &mut self.ball;
        for paddle in &mut self.paddles {
            let approaching = match paddle.side {
                Side::P1 => ball.vel.x < 0.0,
                Side::P2 => ball.vel.x > 0.0,
            };
            let b = ball.bounds();
            let p = paddle.bounds();
            let touching =
                b.x <= p.right() && b.right() >= p.x && b.bottom() >= p.y && b.y <= p.bottom();
            if !approaching || !touching {
                continue;
            }

            ball.pos.x = match paddle.side {
                Side::P1 => p.right() + ball.radius,
                Side::P2 => p.x - ball.radius,
            };
            ball.reverse_x();
            ball.speed_up(t);
            paddle.stats.returns += 1;
            events.push(GameEvent::PaddleReturn { side: paddle.side });
        }
    }

    /// Ball fully past a side wall scores for the far player
    fn check_point(&self) -> Option<Side> {
        let ball = &self.ball;
        if ball.pos.x - ball.radius < 0.0 {
            Some(Side::P2)
        } else if ball.pos.x + ball.radius > self.tuning.arena_width {
            Some(Side::P1)
        } else {
            None
        }
    }
}

impl Game for Pong {
    type Command = PongCommand;
    type Stats = PongStats;
    const NAME: &'static str = "pong";

    fn rules(&self) -> MatchRules {
        MatchRules {
            format: MatchFormat::FirstTo {
                target: self.tuning.winning_score,
            },
            clock: ClockMode::None,
            countdown_secs: self.tuning.countdown_secs,
            intermission_secs: self.tuning.intermission_secs,
            resume: Resume::Immediate,
        }
    }

    fn reset_match(&mut self, rng: &mut Pcg32) {
        let t = &self.tuning;
        for paddle in &mut self.paddles {
            paddle.recenter(t);
            paddle.stats = PongStats::default();
        }
        self.ball.reset(None, rng, t);
    }

    /// Paddles stay where they are between points; only the ball is served
    fn reset_round(&mut self, rng: &mut Pcg32) {
        for paddle in &mut self.paddles {
            paddle.stats = PongStats::default();
        }
        self.ball.reset(None, rng, &self.tuning);
    }

    fn step(
        &mut self,
        dt_ms: f32,
        _rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Option<RoundOutcome> {
        let t = &self.tuning;
        for paddle in &mut self.paddles {
            paddle.update(dt_ms, t);
        }
        self.ball.update(dt_ms, t);

        self.bounce_walls(events);
        self.bounce_paddles(events);

        let scorer = self.check_point()?;
        events.push(GameEvent::Point { scorer });
        Some(RoundOutcome::win(scorer, EndReason::Point))
    }

    fn apply(&mut self, side: Side, command: PongCommand, arg: CommandArg) -> bool {
        let held = !matches!(arg, CommandArg::Hold(false));
        let paddle = &mut self.paddles[side.index()];
        match command {
            PongCommand::Up => paddle.thrust_up = held,
            PongCommand::Down => paddle.thrust_down = held,
        }
        true
    }

    fn stats(&self, side: Side) -> PongStats {
        self.paddle(side).stats.clone()
    }
}
