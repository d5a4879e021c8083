//! Soccer ball physics: gravity, rolling friction, lossy bounces

use glam::Vec2;
use serde::Serialize;

use crate::Side;
use crate::sim::Rect;
use crate::sim::collision::bounce;
use crate::tuning::SoccerTuning;
use crate::{decay, ms_to_frames, ms_to_secs};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub last_touched_by: Option<Side>,
}

impl Ball {
    /// At rest on the kick-off spot
    pub fn new(t: &SoccerTuning) -> Self {
        Self {
            pos: Vec2::new(t.ball_spawn_x, t.ball_spawn_y),
            vel: Vec2::ZERO,
            radius: t.ball_radius,
            last_touched_by: None,
        }
    }

    pub fn reset(&mut self, t: &SoccerTuning) {
        *self = Self::new(t);
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.vel += force;
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.radius * 2.0)
    }

    /// Integrate one frame and bounce off the walls, ground and ceiling.
    ///
    /// Side walls are open inside the goal band so the ball can cross the
    /// goal line.
    pub fn update(&mut self, dt_ms: f32, t: &SoccerTuning) {
        let dt = ms_to_secs(dt_ms);
        self.vel.y += t.ball_gravity * dt;
        self.pos += self.vel * dt;
        self.vel *= decay(t.ball_friction, ms_to_frames(dt_ms));

        let r = self.radius;
        let damping = t.ball_bounce_damping;
        let in_goal = t.in_goal_band(self.pos.y);

        if self.pos.x - r < t.field_left && !in_goal {
            self.pos.x = t.field_left + r;
            self.vel.x = bounce(self.vel.x, damping);
        }
        if self.pos.x + r > t.field_right && !in_goal {
            self.pos.x = t.field_right - r;
            self.vel.x = bounce(self.vel.x, damping);
        }

        if self.pos.y + r > t.field_y {
            self.pos.y = t.field_y - r;
            self.vel.y = bounce(self.vel.y, damping);
            if self.vel.y.abs() < t.ball_settle_speed {
                self.vel.y = 0.0;
            }
        }

        if self.pos.y - r < t.ceiling_y {
            self.pos.y = t.ceiling_y + r;
            self.vel.y = bounce(self.vel.y, damping);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> (Ball, SoccerTuning) {
        let t = SoccerTuning::default();
        (Ball::new(&t), t)
    }

    #[test]
    fn test_ball_falls_and_settles() {
        let (mut ball, t) = ball();
        for _ in 0..1000 {
            ball.update(16.0, &t);
        }
        assert_eq!(ball.pos.y, t.field_y - t.ball_radius);
        assert_eq!(ball.vel.y, 0.0);
    }

    #[test]
    fn test_side_wall_bounces_outside_goal_band() {
        let (mut ball, t) = ball();
        // Above the goal mouth
        ball.pos = Vec2::new(60.0, 200.0);
        ball.vel = Vec2::new(-400.0, 0.0);
        ball.update(16.0, &t);
        assert_eq!(ball.pos.x, t.field_left + t.ball_radius);
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_side_wall_open_inside_goal_band() {
        let (mut ball, t) = ball();
        ball.pos = Vec2::new(60.0, 300.0);
        ball.vel = Vec2::new(-400.0, 0.0);
        ball.update(16.0, &t);
        assert!(ball.pos.x - ball.radius < t.field_left);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_ceiling_bounce() {
        let (mut ball, t) = ball();
        ball.pos = Vec2::new(400.0, 70.0);
        ball.vel = Vec2::new(0.0, -600.0);
        ball.update(16.0, &t);
        assert_eq!(ball.pos.y, t.ceiling_y + t.ball_radius);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_reset_clears_last_touch() {
        let (mut ball, t) = ball();
        ball.last_touched_by = Some(Side::P2);
        ball.apply_force(Vec2::new(10.0, -5.0));
        ball.reset(&t);
        assert_eq!(ball, Ball::new(&t));
    }
}
