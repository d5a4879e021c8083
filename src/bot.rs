//! Computer players for idle and demo mode
//!
//! A bot only ever presses the keys a human would, so everything it does goes
//! through the same dispatcher, latches and phase gates.

use crate::Side;
use crate::games::boxing::AttackKind;
use crate::games::{Boxing, BoxingCommand, Pong, PongCommand, Soccer, SoccerCommand};
use crate::input::{Controls, InputState, Trigger};
use crate::sim::{MatchState, Phase};

/// Frames between two presses of the same edge-triggered key
const EDGE_PERIOD: u64 = 2;

/// Per-game decision making
pub trait Autopilot: Controls {
    /// Commands `side` wants this frame; `frame` counts frames of play
    fn autopilot(&self, side: Side, frame: u64) -> Vec<Self::Command>;
}

/// Drives one or both sides of a match through an [`InputState`]
#[derive(Debug, Clone)]
pub struct Bot {
    sides: Vec<Side>,
    frame: u64,
}

impl Bot {
    pub fn new(sides: &[Side]) -> Self {
        Self {
            sides: sides.to_vec(),
            frame: 0,
        }
    }

    /// Both players
    pub fn both() -> Self {
        Self::new(&Side::BOTH)
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Set this frame's keys for the bot's sides. Keys of other sides are left alone.
    pub fn drive<G: Autopilot>(&mut self, state: &MatchState<G>, input: &mut InputState) {
        let playing = state.phase == Phase::Playing;
        let wants: Vec<(Side, Vec<G::Command>)> = if playing {
            self.sides
                .iter()
                .map(|&side| (side, state.game.autopilot(side, self.frame)))
                .collect()
        } else {
            Vec::new()
        };

        // Edge keys are released every other frame so the latch re-arms
        let pulse = self.frame % EDGE_PERIOD == 0;
        for binding in G::key_bindings() {
            if !self.sides.contains(&binding.side) {
                continue;
            }
            let wanted = wants
                .iter()
                .any(|(side, cmds)| *side == binding.side && cmds.contains(&binding.command));
            let down = match G::trigger(binding.command) {
                Trigger::Edge => wanted && pulse,
                Trigger::Level | Trigger::Hold => wanted,
            };
            input.set(binding.key, down);
        }

        if playing {
            self.frame += 1;
        }
    }
}

impl Autopilot for Boxing {
    /// Close the distance, guard against incoming punches, otherwise punch
    fn autopilot(&self, side: Side, frame: u64) -> Vec<BoxingCommand> {
        let t = &self.tuning;
        let me = self.fighter(side);
        let opp = self.fighter(side.opponent());
        if me.is_knocked_down() {
            return Vec::new();
        }

        let threatened = opp.attack.is_some_and(|a| !a.landed);
        if threatened && me.stamina > me.max_stamina * 0.3 && frame % 3 != 0 {
            return vec![BoxingCommand::Block];
        }

        let gap = (me.x - opp.x).abs();
        let reach = t.attacks.jab.range + t.fighter_width / 2.0;
        if gap > reach - 5.0 {
            return vec![BoxingCommand::Forward];
        }

        let kind = match (frame / 20) % 4 {
            0 | 2 => AttackKind::Jab,
            1 => AttackKind::Cross,
            _ => AttackKind::Hook,
        };
        if me.stamina >= kind.def(&t.attacks).stamina_cost {
            vec![BoxingCommand::Attack(kind)]
        } else if gap < reach {
            // Catch a breath out of range
            vec![BoxingCommand::Back]
        } else {
            Vec::new()
        }
    }
}

impl Autopilot for Soccer {
    /// Get behind the ball, kick it toward the opponent's goal, head it when it drops
    fn autopilot(&self, side: Side, _frame: u64) -> Vec<SoccerCommand> {
        let t = &self.tuning;
        let me = self.player(side);
        let ball = &self.ball;
        // P1 attacks the right-hand goal
        let attack_dir = match side {
            Side::P1 => 1.0,
            Side::P2 => -1.0,
        };

        let mut commands = Vec::new();
        let target_x = ball.pos.x - attack_dir * (ball.radius + t.player_width);
        let dx = target_x - me.pos.x;
        if dx.abs() > 8.0 {
            commands.push(if dx < 0.0 {
                SoccerCommand::Left
            } else {
                SoccerCommand::Right
            });
        }

        let reach = t.kick_reach + ball.radius;
        if me.can_kick() && me.kick_point(t).distance(ball.pos) <= reach {
            commands.push(SoccerCommand::Kick);
        }

        let head = me.head_center(t);
        let above = ball.pos.y < head.y && (ball.pos.x - me.pos.x).abs() < t.head_radius;
        if above && me.grounded && ball.vel.y > 0.0 {
            commands.push(SoccerCommand::Jump);
        }

        if me.power_ready {
            commands.push(SoccerCommand::Power);
        }
        commands
    }
}

impl Autopilot for Pong {
    /// Follow the ball while it approaches, drift back to centre otherwise
    fn autopilot(&self, side: Side, _frame: u64) -> Vec<PongCommand> {
        let t = &self.tuning;
        let paddle = self.paddle(side);
        let approaching = match side {
            Side::P1 => self.ball.vel.x < 0.0,
            Side::P2 => self.ball.vel.x > 0.0,
        };
        let target = if approaching {
            self.ball.pos.y
        } else {
            t.arena_height / 2.0
        };

        let center = paddle.y + paddle.height / 2.0;
        let dead_zone = paddle.height / 5.0;
        if target < center - dead_zone {
            vec![PongCommand::Up]
        } else if target > center + dead_zone {
            vec![PongCommand::Down]
        } else {
            Vec::new()
        }
    }
}
