//! Pong paddle with acceleration and friction
//!
//! Units are per 60 Hz reference frame; elapsed time is converted to
//! frames so behaviour matches at any refresh rate.

use serde::Serialize;

use crate::sim::{Rect, Tally};
use crate::tuning::PongTuning;
use crate::{Side, decay, ms_to_frames};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PongStats {
    /// Balls sent back across the net
    pub returns: u32,
}

impl Tally for PongStats {
    fn absorb(&mut self, round: &Self) {
        self.returns += round.returns;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paddle {
    pub side: Side,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Pixels per reference frame, negative is up
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
    /// Directions held this frame; cleared after every update
    pub thrust_up: bool,
    pub thrust_down: bool,
    pub stats: PongStats,
}

impl Paddle {
    pub fn new(side: Side, t: &PongTuning) -> Self {
        let x = match side {
            Side::P1 => t.paddle_margin,
            Side::P2 => t.arena_width - t.paddle_margin - t.paddle_width,
        };
        Self {
            side,
            x,
            y: (t.arena_height - t.paddle_height) / 2.0,
            velocity: 0.0,
            width: t.paddle_width,
            height: t.paddle_height,
            thrust_up: false,
            thrust_down: false,
            stats: PongStats::default(),
        }
    }

    /// Vertically centred and at rest
    pub fn recenter(&mut self, t: &PongTuning) {
        self.y = (t.arena_height - self.height) / 2.0;
        self.velocity = 0.0;
        self.thrust_up = false;
        self.thrust_down = false;
    }

    pub fn update(&mut self, dt_ms: f32, t: &PongTuning) {
        let frames = ms_to_frames(dt_ms);

        if self.thrust_up {
            self.velocity -= t.paddle_acceleration * frames;
        }
        if self.thrust_down {
            self.velocity += t.paddle_acceleration * frames;
        }
        self.velocity = self.velocity.clamp(-t.paddle_max_speed, t.paddle_max_speed);

        if !self.thrust_up && !self.thrust_down {
            self.velocity *= decay(t.paddle_friction, frames);
            if self.velocity.abs() < t.paddle_stop_speed {
                self.velocity = 0.0;
            }
        }

        self.y += self.velocity * frames;

        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
        }
        if self.y + self.height > t.arena_height {
            self.y = t.arena_height - self.height;
            self.velocity = 0.0;
        }

        self.thrust_up = false;
        self.thrust_down = false;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
