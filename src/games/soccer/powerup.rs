//! Power-up effects: flame shots and goal cages

use glam::Vec2;
use serde::Serialize;

use super::player::Player;
use crate::Side;
use crate::sim::Rect;
use crate::tuning::SoccerTuning;
use crate::ms_to_secs;

/// Short-lived projectile launched from a player's head
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlameShot {
    pub owner: Side,
    pub pos: Vec2,
    /// -1.0 or +1.0
    pub direction: f32,
    pub remaining_ms: f32,
    pub active: bool,
}

impl FlameShot {
    /// Spawn just in front of `player`'s head, travelling the way they face
    pub fn launch(player: &Player, t: &SoccerTuning) -> Self {
        let direction = player.facing.sign();
        let head = player.head_center(t);
        Self {
            owner: player.side,
            pos: Vec2::new(head.x + direction * (t.head_radius + t.flame_spawn_gap), head.y),
            direction,
            remaining_ms: t.flame_ms,
            active: true,
        }
    }

    pub fn update(&mut self, dt_ms: f32, t: &SoccerTuning) {
        self.pos.x += self.direction * t.flame_speed * ms_to_secs(dt_ms);
        self.remaining_ms -= dt_ms;

        let escaped = self.pos.x < t.field_left - t.flame_escape_margin
            || self.pos.x > t.field_right + t.flame_escape_margin;
        if self.remaining_ms <= 0.0 || escaped {
            self.active = false;
        }
    }

    pub fn bounds(&self, t: &SoccerTuning) -> Rect {
        Rect::centered(self.pos, t.flame_size)
    }

    /// Side whose goal the shot has entered, if any
    pub fn goal_entered(&self, t: &SoccerTuning) -> Option<Side> {
        if !t.in_goal_band(self.pos.y) {
            return None;
        }
        if self.pos.x < t.field_left {
            Some(Side::P1)
        } else if self.pos.x > t.field_right {
            Some(Side::P2)
        } else {
            None
        }
    }
}

/// Timed shield over one goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalCage {
    /// Side whose goal is covered
    pub guards: Side,
    pub remaining_ms: f32,
}

impl GoalCage {
    pub fn new(guards: Side, t: &SoccerTuning) -> Self {
        Self {
            guards,
            remaining_ms: t.cage_ms,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.remaining_ms -= dt_ms;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    /// x of the goal line this cage sits on
    pub fn line_x(&self, t: &SoccerTuning) -> f32 {
        match self.guards {
            Side::P1 => t.field_left,
            Side::P2 => t.field_right,
        }
    }
}
