//! Head-soccer player: walk, jump, kick and one power-up

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Rect, Tally};
use crate::tuning::SoccerTuning;
use crate::{Facing, Side, decay, ms_to_frames, ms_to_secs};

/// Each side owns one power for the whole match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Power {
    /// Horizontal projectile from the head
    Flame,
    /// Timed shield over the owner's goal
    Cage,
}

impl Power {
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::P1 => Power::Flame,
            Side::P2 => Power::Cage,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SoccerStats {
    pub goals: u32,
    /// Kicks that reached the ball
    pub kicks: u32,
    pub headers: u32,
    pub powers_used: u32,
}

impl Tally for SoccerStats {
    fn absorb(&mut self, round: &Self) {
        self.goals += round.goals;
        self.kicks += round.kicks;
        self.headers += round.headers;
        self.powers_used += round.powers_used;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub side: Side,
    /// Feet position (y grows downward)
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub grounded: bool,
    pub facing: Facing,
    pub start_x: f32,
    pub kick_cooldown_ms: f32,
    pub power: Power,
    pub power_ready: bool,
    pub power_reload_ms: f32,
    /// This point only; folded into match totals by the engine
    pub stats: SoccerStats,
}

impl Player {
    pub fn new(side: Side, t: &SoccerTuning) -> Self {
        let start_x = match side {
            Side::P1 => t.p1_start_x,
            Side::P2 => t.p2_start_x,
        };
        let facing = match side {
            Side::P1 => Facing::Right,
            Side::P2 => Facing::Left,
        };
        Self {
            side,
            pos: Vec2::new(start_x, t.field_y),
            vel: Vec2::ZERO,
            grounded: true,
            facing,
            start_x,
            kick_cooldown_ms: 0.0,
            power: Power::for_side(side),
            power_ready: false,
            power_reload_ms: t.power_reload_ms,
            stats: SoccerStats::default(),
        }
    }

    /// Back to the kick-off spot; the power starts reloading again
    pub fn reset(&mut self, t: &SoccerTuning) {
        *self = Self::new(self.side, t);
    }

    pub fn update(&mut self, dt_ms: f32, t: &SoccerTuning) {
        let dt = ms_to_secs(dt_ms);
        if !self.grounded {
            self.vel.y += t.gravity * dt;
        }
        self.pos += self.vel * dt;

        let half = t.player_width / 2.0;
        self.pos.x = self.pos.x.clamp(t.field_left + half, t.field_right - half);

        if self.pos.y >= t.field_y {
            self.pos.y = t.field_y;
            self.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        let frames = ms_to_frames(dt_ms);
        if self.grounded {
            self.vel.x *= decay(t.ground_friction, frames);
            if self.vel.x.abs() < t.stop_speed {
                self.vel.x = 0.0;
            }
        } else {
            self.vel.x *= decay(t.air_drag, frames);
        }

        self.kick_cooldown_ms = (self.kick_cooldown_ms - dt_ms).max(0.0);

        if !self.power_ready {
            self.power_reload_ms -= dt_ms;
            if self.power_reload_ms <= 0.0 {
                self.power_ready = true;
                self.power_reload_ms = 0.0;
            }
        }
    }

    /// Set walking velocity toward `direction`, scaled by `multiplier`
    pub fn run(&mut self, direction: Facing, multiplier: f32, t: &SoccerTuning) {
        self.vel.x = direction.sign() * t.move_speed * multiplier;
        self.facing = direction;
    }

    pub fn jump(&mut self, t: &SoccerTuning) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel.y = -t.jump_force;
        self.grounded = false;
        true
    }

    pub fn can_kick(&self) -> bool {
        self.kick_cooldown_ms <= 0.0
    }

    /// Start a kick if the cooldown allows; reach is checked by the caller
    pub fn kick(&mut self, t: &SoccerTuning) -> bool {
        if !self.can_kick() {
            return false;
        }
        self.kick_cooldown_ms = t.kick_cooldown_ms;
        true
    }

    /// Spend the power if it has reloaded
    pub fn use_power(&mut self, t: &SoccerTuning) -> bool {
        if !self.power_ready {
            return false;
        }
        self.power_ready = false;
        self.power_reload_ms = t.power_reload_ms;
        self.stats.powers_used += 1;
        true
    }

    pub fn head_center(&self, t: &SoccerTuning) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - t.player_height - t.head_radius)
    }

    pub fn head_box(&self, t: &SoccerTuning) -> Rect {
        Rect::centered(self.head_center(t), t.head_radius * 2.0)
    }

    pub fn body_box(&self, t: &SoccerTuning) -> Rect {
        Rect::new(
            self.pos.x - t.player_width / 2.0,
            self.pos.y - t.player_height,
            t.player_width,
            t.player_height,
        )
    }

    /// Front of the body at mid height
    pub fn kick_point(&self, t: &SoccerTuning) -> Vec2 {
        Vec2::new(
            self.pos.x + self.facing.sign() * t.player_width / 2.0,
            self.pos.y - t.player_height / 2.0,
        )
    }
}
