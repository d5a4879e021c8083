//! Boxing: best-of-N rounds, KO / TKO / decision on time
//!
//! Each frame: both fighters update, punches resolve against hurt-boxes
//! (at most once per activation), the fighters are pushed apart to the
//! minimum gap, then the round-ending conditions are checked.

pub mod attack;
pub mod fighter;

pub use attack::{Attack, AttackKind};
pub use fighter::{Fighter, FighterState, FighterStats, Step};

use rand_pcg::Pcg32;
use serde::Serialize;

use crate::Side;
use crate::sim::{
    ClockMode, CommandArg, EndReason, Game, GameEvent, MatchFormat, MatchRules, Resume,
    RoundOutcome, enforce_separation,
};
use crate::tuning::BoxingTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxingCommand {
    Attack(AttackKind),
    Block,
    Dodge,
    Forward,
    Back,
}

#[derive(Debug, Clone, Serialize)]
pub struct Boxing {
    #[serde(skip)]
    pub tuning: BoxingTuning,
    /// Indexed by `Side::index`
    pub fighters: [Fighter; 2],
}

impl Default for Boxing {
    fn default() -> Self {
        Self::new(BoxingTuning::default())
    }
}

impl Boxing {
    pub fn new(tuning: BoxingTuning) -> Self {
        let fighters = [
            Fighter::new(Side::P1, &tuning),
            Fighter::new(Side::P2, &tuning),
        ];
        Self { tuning, fighters }
    }

    pub fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    pub fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        &mut self.fighters[side.index()]
    }

    /// Resolve both punches, P1 first
    fn resolve_hits(&mut self, events: &mut Vec<GameEvent>) {
        let [p1, p2] = &mut self.fighters;
        resolve_hit(p1, p2, &self.tuning, events);
        resolve_hit(p2, p1, &self.tuning, events);
    }

    fn enforce_distance(&mut self) {
        let t = &self.tuning;
        let [p1, p2] = &mut self.fighters;
        enforce_separation(&mut p1.x, &mut p2.x, t.min_distance, t.ring_left, t.ring_right);
    }

    /// KO beats TKO; P1 is checked first in each
    fn check_win(&self) -> Option<RoundOutcome> {
        let [p1, p2] = &self.fighters;
        let tko = self.tuning.tko_knockdowns;
        if !p1.alive {
            Some(RoundOutcome::win(Side::P2, EndReason::Knockout))
        } else if !p2.alive {
            Some(RoundOutcome::win(Side::P1, EndReason::Knockout))
        } else if p1.knockdowns >= tko {
            Some(RoundOutcome::win(Side::P2, EndReason::TechnicalKnockout))
        } else if p2.knockdowns >= tko {
            Some(RoundOutcome::win(Side::P1, EndReason::TechnicalKnockout))
        } else {
            None
        }
    }
}

/// Land `attacker`'s punch on `defender` if the boxes overlap.
///
/// The landed flag is set on contact even when the defender is invincible,
/// so one activation never deals damage twice.
pub fn resolve_hit(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    tuning: &BoxingTuning,
    events: &mut Vec<GameEvent>,
) {
    let Some(hitbox) = attacker.hitbox(tuning) else {
        return;
    };
    if !defender.alive {
        return;
    }
    let Some(attack) = attacker.attack.as_mut() else {
        return;
    };
    if attack.landed || !hitbox.overlaps(&defender.hurtbox(tuning)) {
        return;
    }

    attack.landed = true;
    let blocked = defender.state == FighterState::Blocking;
    let knockdowns = defender.knockdowns;
    let damage = defender.take_damage(attack.def.damage, tuning);
    if damage <= 0.0 {
        return;
    }

    attacker.stats.punches_landed += 1;
    attacker.stats.damage_dealt += damage;
    log::debug!(
        "{} lands {} for {:.1}",
        attacker.side.label(),
        attack.kind.as_str(),
        damage
    );

    events.push(GameEvent::Hit {
        attacker: attacker.side,
        damage,
        blocked,
    });
    events.push(GameEvent::Shake {
        intensity: (damage * tuning.shake_per_damage).min(tuning.shake_max),
        duration_ms: tuning.shake_ms,
    });
    if defender.knockdowns > knockdowns {
        events.push(GameEvent::Knockdown {
            side: defender.side,
            count: defender.knockdowns,
        });
    }
}

impl Game for Boxing {
    type Command = BoxingCommand;
    type Stats = FighterStats;
    const NAME: &'static str = "boxing";

    fn rules(&self) -> MatchRules {
        MatchRules {
            format: MatchFormat::BestOf {
                rounds: self.tuning.max_rounds,
            },
            clock: ClockMode::PerRound {
                secs: self.tuning.round_secs,
            },
            countdown_secs: self.tuning.countdown_secs,
            intermission_secs: self.tuning.intermission_secs,
            resume: Resume::Countdown,
        }
    }

    fn reset_round(&mut self, _rng: &mut Pcg32) {
        let t = &self.tuning;
        for fighter in &mut self.fighters {
            fighter.reset(t);
        }
    }

    fn step(
        &mut self,
        dt_ms: f32,
        _rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Option<RoundOutcome> {
        let t = &self.tuning;
        let [p1, p2] = &mut self.fighters;
        let p2_x = p2.x;
        p1.update(dt_ms, p2_x, t);
        p2.update(dt_ms, p1.x, t);

        self.resolve_hits(events);
        self.enforce_distance();
        self.check_win()
    }

    /// Higher remaining health takes the round; equal health is a draw
    fn decide_on_time(&self) -> Option<Side> {
        let [p1, p2] = &self.fighters;
        if p1.health > p2.health {
            Some(Side::P1)
        } else if p2.health > p1.health {
            Some(Side::P2)
        } else {
            None
        }
    }

    fn apply(&mut self, side: Side, command: BoxingCommand, arg: CommandArg) -> bool {
        let holding = !matches!(arg, CommandArg::Hold(false));
        let t = &self.tuning;
        let fighter = &mut self.fighters[side.index()];
        match command {
            BoxingCommand::Attack(kind) => fighter.attack(kind, t),
            BoxingCommand::Block => fighter.block(holding, t),
            BoxingCommand::Dodge => fighter.dodge(holding, t),
            BoxingCommand::Forward => fighter.step(Step::Forward, t),
            BoxingCommand::Back => fighter.step(Step::Back, t),
        }
    }

    fn stats(&self, side: Side) -> FighterStats {
        self.fighter(side).stats.clone()
    }
}
