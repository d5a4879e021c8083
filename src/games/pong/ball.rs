//! Pong ball: constant-velocity flight with a rally speed multiplier

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::ms_to_frames;
use crate::sim::Rect;
use crate::tuning::PongTuning;

/// Which paddle a serve heads toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Serve {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Base velocity in pixels per reference frame, before the multiplier
    pub vel: Vec2,
    pub radius: f32,
    /// Grows with every paddle return
    pub speed_multiplier: f32,
}

impl Ball {
    pub fn new(t: &PongTuning) -> Self {
        Self {
            pos: Vec2::new(t.arena_width / 2.0, t.arena_height / 2.0),
            vel: Vec2::splat(t.ball_speed),
            radius: t.ball_radius,
            speed_multiplier: 1.0,
        }
    }

    /// Re-centre and serve. `None` picks a side at random; the vertical
    /// component is always random within the serve spread.
    pub fn reset(&mut self, serve: Option<Serve>, rng: &mut Pcg32, t: &PongTuning) {
        self.pos = Vec2::new(t.arena_width / 2.0, t.arena_height / 2.0);
        self.speed_multiplier = 1.0;

        let serve = serve.unwrap_or(if rng.random_bool(0.5) {
            Serve::Right
        } else {
            Serve::Left
        });
        self.vel.x = match serve {
            Serve::Left => -t.ball_speed,
            Serve::Right => t.ball_speed,
        };
        let spread = t.serve_spread;
        self.vel.y = (rng.random::<f32>() * 2.0 * spread - spread) * t.ball_speed;
    }

    /// Move, then cap each axis of the effective velocity
    pub fn update(&mut self, dt_ms: f32, t: &PongTuning) {
        let frames = ms_to_frames(dt_ms);
        let m = self.speed_multiplier;
        self.pos += self.vel * m * frames;

        let cap = t.ball_max_axis_speed;
        if (self.vel.x * m).abs() > cap {
            self.vel.x = self.vel.x.signum() * cap / m;
        }
        if (self.vel.y * m).abs() > cap {
            self.vel.y = self.vel.y.signum() * cap / m;
        }
    }

    pub fn reverse_x(&mut self) {
        self.vel.x = -self.vel.x;
    }

    /// Flip vertical direction, never leaving a near-horizontal path
    pub fn reverse_y(&mut self, t: &PongTuning) {
        self.vel.y = -self.vel.y;
        if self.vel.y.abs() < t.min_vertical_speed {
            self.vel.y = if self.vel.y < 0.0 {
                -t.min_vertical_nudge
            } else {
                t.min_vertical_nudge
            };
        }
    }

    pub fn speed_up(&mut self, t: &PongTuning) {
        self.speed_multiplier = (self.speed_multiplier + t.speedup_step).min(t.speedup_max);
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.radius * 2.0)
    }
}
