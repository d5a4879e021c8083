//! Boxer actor
//!
//! Health and stamina pools, punches with a hit-active window, level-held
//! block/dodge, hit-stun and knockdowns. Every timer is a millisecond
//! countdown advanced by `update`.

use serde::Serialize;

use super::attack::{Attack, AttackKind};
use crate::sim::{Rect, Tally};
use crate::tuning::BoxingTuning;
use crate::{Facing, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FighterState {
    Idle,
    Attacking,
    Blocking,
    Dodging,
    Hurt,
    Knockdown,
    Ko,
}

/// One-step movement relative to facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Forward,
    Back,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FighterStats {
    pub punches_thrown: u32,
    pub punches_landed: u32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub blocks_used: u32,
    pub dodges_used: u32,
}

impl Tally for FighterStats {
    fn absorb(&mut self, round: &Self) {
        self.punches_thrown += round.punches_thrown;
        self.punches_landed += round.punches_landed;
        self.damage_dealt += round.damage_dealt;
        self.damage_taken += round.damage_taken;
        self.blocks_used += round.blocks_used;
        self.dodges_used += round.dodges_used;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fighter {
    pub side: Side,
    pub x: f32,
    pub start_x: f32,
    /// Feet height (ring floor)
    pub y: f32,
    pub facing: Facing,

    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub stamina: f32,
    pub max_stamina: f32,

    pub state: FighterState,
    /// Blocks new actions while positive (ignored while blocking)
    pub action_cooldown_ms: f32,
    pub attack: Option<Attack>,

    pub invincible: bool,
    /// Post-knockdown invincibility left
    pub invincibility_ms: f32,

    /// Knockdowns this round
    pub knockdowns: u32,
    pub knockdown_ms: f32,
    pub hurt_ms: f32,

    // Hit feedback
    pub flash_ms: f32,

    pub stats: FighterStats,
}

impl Fighter {
    pub fn new(side: Side, tuning: &BoxingTuning) -> Self {
        let (start_x, start_facing) = match side {
            Side::P1 => (tuning.p1_start_x, Facing::Right),
            Side::P2 => (tuning.p2_start_x, Facing::Left),
        };
        Self {
            side,
            x: start_x,
            start_x,
            y: tuning.ring_y,
            facing: start_facing,
            health: tuning.max_health,
            max_health: tuning.max_health,
            alive: true,
            stamina: tuning.max_stamina,
            max_stamina: tuning.max_stamina,
            state: FighterState::Idle,
            action_cooldown_ms: 0.0,
            attack: None,
            invincible: false,
            invincibility_ms: 0.0,
            knockdowns: 0,
            knockdown_ms: 0.0,
            hurt_ms: 0.0,
            flash_ms: 0.0,
            stats: FighterStats::default(),
        }
    }

    /// Back to start-of-round values
    pub fn reset(&mut self, tuning: &BoxingTuning) {
        *self = Self::new(self.side, tuning);
    }

    /// Advance timers, resource drain/regen and state exits by `dt_ms`
    pub fn update(&mut self, dt_ms: f32, opponent_x: f32, tuning: &BoxingTuning) {
        let dt = crate::ms_to_secs(dt_ms);
        self.facing = Facing::toward(self.x, opponent_x);

        if self.action_cooldown_ms > 0.0 {
            self.action_cooldown_ms = (self.action_cooldown_ms - dt_ms).max(0.0);
        }

        if let Some(attack) = self.attack.as_mut() {
            attack.elapsed_ms += dt_ms;
            attack.active = tuning.hit_window.contains(attack.progress());
            if attack.is_finished() {
                self.end_attack();
            }
        }

        if self.state == FighterState::Blocking {
            self.stamina = (self.stamina - tuning.block_drain_per_sec * dt).max(0.0);
            if self.stamina <= 0.0 {
                self.state = FighterState::Idle;
            }
        }

        if self.state == FighterState::Knockdown {
            self.knockdown_ms -= dt_ms;
            if self.knockdown_ms <= 0.0 {
                self.knockdown_ms = 0.0;
                self.state = FighterState::Idle;
                self.invincible = true;
                self.invincibility_ms = tuning.knockdown_invincibility_ms;
                self.action_cooldown_ms = tuning.knockdown_invincibility_ms;
            }
            // Nothing else moves while down
            return;
        }

        if self.state == FighterState::Dodging {
            self.stamina = (self.stamina - tuning.dodge_drain_per_sec * dt).max(0.0);
            if self.stamina <= 0.0 {
                self.state = FighterState::Idle;
                self.invincible = false;
                self.invincibility_ms = 0.0;
            }
        }

        if self.invincible && self.invincibility_ms > 0.0 && self.state != FighterState::Dodging {
            self.invincibility_ms -= dt_ms;
            if self.invincibility_ms <= 0.0 {
                self.invincible = false;
                self.invincibility_ms = 0.0;
            }
        }

        if self.state != FighterState::Blocking {
            self.stamina = (self.stamina + tuning.stamina_regen_per_sec * dt).min(self.max_stamina);
        }

        if self.flash_ms > 0.0 {
            self.flash_ms = (self.flash_ms - dt_ms).max(0.0);
        }

        if self.state == FighterState::Hurt {
            self.hurt_ms -= dt_ms;
            if self.hurt_ms <= 0.0 {
                self.hurt_ms = 0.0;
                self.state = FighterState::Idle;
            }
        }

        if self.health <= 0.0 && self.alive {
            self.go_down_for_good();
        }
    }

    /// Capability gate for punches and steps
    pub fn can_act(&self) -> bool {
        if !self.alive {
            return false;
        }
        if matches!(self.state, FighterState::Knockdown | FighterState::Dodging) {
            return false;
        }
        if self.action_cooldown_ms > 0.0 && self.state != FighterState::Blocking {
            return false;
        }
        self.attack.is_none()
    }

    pub fn is_knocked_down(&self) -> bool {
        self.state == FighterState::Knockdown
    }

    /// Throw a punch. Cancels a block; fails without enough stamina.
    pub fn attack(&mut self, kind: AttackKind, tuning: &BoxingTuning) -> bool {
        if !self.can_act() {
            return false;
        }
        let attack = Attack::new(kind, &tuning.attacks);
        if self.stamina < attack.def.stamina_cost {
            return false;
        }

        self.stamina -= attack.def.stamina_cost;
        self.state = FighterState::Attacking;
        self.attack = Some(attack);
        self.action_cooldown_ms = tuning.attack_cooldown_ms;
        self.stats.punches_thrown += 1;
        true
    }

    fn end_attack(&mut self) {
        self.attack = None;
        if self.state == FighterState::Attacking {
            self.state = FighterState::Idle;
        }
    }

    /// Level-triggered guard. Returns true while the block is held.
    pub fn block(&mut self, holding: bool, tuning: &BoxingTuning) -> bool {
        if !self.alive || self.is_knocked_down() {
            return false;
        }
        if self.state == FighterState::Dodging || self.attack.is_some() {
            return false;
        }

        if holding {
            if self.stamina < tuning.min_hold_stamina {
                return false;
            }
            if self.state != FighterState::Blocking {
                self.state = FighterState::Blocking;
                self.stats.blocks_used += 1;
            }
            true
        } else {
            if self.state == FighterState::Blocking {
                self.state = FighterState::Idle;
            }
            false
        }
    }

    /// Level-triggered dodge: invincible while held. Starting one drops a block.
    pub fn dodge(&mut self, holding: bool, tuning: &BoxingTuning) -> bool {
        if !self.alive || self.is_knocked_down() || self.attack.is_some() {
            return false;
        }

        if holding {
            if self.stamina < tuning.min_hold_stamina {
                return false;
            }
            if self.state != FighterState::Dodging {
                self.state = FighterState::Dodging;
                self.invincible = true;
                self.stats.dodges_used += 1;
            }
            true
        } else {
            if self.state == FighterState::Dodging {
                self.state = FighterState::Idle;
                self.invincible = false;
                self.invincibility_ms = 0.0;
            }
            false
        }
    }

    /// Step toward or away from the opponent, clamped to the ring
    pub fn step(&mut self, step: Step, tuning: &BoxingTuning) -> bool {
        if !self.can_act() {
            return false;
        }
        if self.state == FighterState::Blocking {
            self.state = FighterState::Idle;
        }

        let direction = match step {
            Step::Forward => self.facing.sign(),
            Step::Back => -self.facing.sign(),
        };
        self.x = (self.x + direction * tuning.move_distance).clamp(tuning.ring_left, tuning.ring_right);
        self.action_cooldown_ms = tuning.move_cooldown_ms;
        true
    }

    /// Apply an incoming punch. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f32, tuning: &BoxingTuning) -> f32 {
        if !self.alive || self.invincible || self.is_knocked_down() {
            return 0.0;
        }

        let mut damage = amount.max(0.0);
        if self.state == FighterState::Blocking {
            damage *= 1.0 - tuning.block_damage_reduction;
        }

        self.health = (self.health - damage).max(0.0);
        self.stats.damage_taken += damage;
        self.flash_ms = tuning.flash_ms;

        if self.health <= 0.0 {
            self.go_down_for_good();
            return damage;
        }

        // Big hit at low health: knockdown replaces hit-stun
        if amount >= tuning.knockdown_threshold && self.health < tuning.knockdown_health_ceiling {
            self.trigger_knockdown(tuning);
            return damage;
        }

        if !matches!(self.state, FighterState::Attacking | FighterState::Blocking) {
            self.state = FighterState::Hurt;
            self.action_cooldown_ms = tuning.hitstun_cooldown_ms;
            self.hurt_ms = tuning.hitstun_ms;
        }

        damage
    }

    fn trigger_knockdown(&mut self, tuning: &BoxingTuning) {
        self.knockdowns += 1;
        self.state = FighterState::Knockdown;
        self.knockdown_ms = tuning.knockdown_ms;
        self.hurt_ms = 0.0;
        self.attack = None;
        log::debug!("{} knocked down ({})", self.side.label(), self.knockdowns);
    }

    fn go_down_for_good(&mut self) {
        self.alive = false;
        self.state = FighterState::Ko;
        self.attack = None;
        self.invincible = false;
    }

    /// Where this fighter can be hit
    pub fn hurtbox(&self, tuning: &BoxingTuning) -> Rect {
        let height = tuning.fighter_height + tuning.head_height;
        Rect::new(
            self.x - tuning.fighter_width / 2.0,
            self.y - height,
            tuning.fighter_width,
            height,
        )
    }

    /// Where the current punch can land, only inside the hit-active window
    pub fn hitbox(&self, tuning: &BoxingTuning) -> Option<Rect> {
        let attack = self.attack.as_ref().filter(|a| a.active)?;
        let range = attack.def.range;
        let center_y = self.y - tuning.fighter_height + tuning.hitbox_drop;
        let top = center_y - tuning.hitbox_height / 2.0;
        let left = match self.facing {
            Facing::Right => self.x,
            Facing::Left => self.x - range,
        };
        Some(Rect::new(left, top, range, tuning.hitbox_height))
    }
}
