//! Data-driven game balance
//!
//! Every gameplay number lives here with a default that matches the
//! shipped games. Tables deserialize with `#[serde(default)]`, so a JSON
//! override only needs the fields it changes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Parse a tuning table from JSON, keeping defaults for missing fields
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(json)
}

// ---------------------------------------------------------------------------
// Boxing
// ---------------------------------------------------------------------------

/// Static definition of one punch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackDef {
    pub damage: f32,
    /// Hit-box reach in front of the fighter (px)
    pub range: f32,
    pub duration_ms: f32,
    pub stamina_cost: f32,
}

/// One entry per punch kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackTable {
    pub jab: AttackDef,
    pub cross: AttackDef,
    pub hook: AttackDef,
    pub uppercut: AttackDef,
}

impl Default for AttackTable {
    fn default() -> Self {
        Self {
            jab: AttackDef {
                damage: 10.0,
                range: 70.0,
                duration_ms: 200.0,
                stamina_cost: 15.0,
            },
            cross: AttackDef {
                damage: 20.0,
                range: 100.0,
                duration_ms: 400.0,
                stamina_cost: 30.0,
            },
            hook: AttackDef {
                damage: 15.0,
                range: 75.0,
                duration_ms: 350.0,
                stamina_cost: 20.0,
            },
            uppercut: AttackDef {
                damage: 25.0,
                range: 70.0,
                duration_ms: 500.0,
                stamina_cost: 40.0,
            },
        }
    }
}

/// Fraction of an attack's duration during which it can land.
///
/// Both bounds are exclusive and must satisfy `0 < start < end < 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitWindow {
    pub start: f32,
    pub end: f32,
}

impl Default for HitWindow {
    fn default() -> Self {
        Self {
            start: 0.3,
            end: 0.7,
        }
    }
}

impl HitWindow {
    #[inline]
    pub fn contains(&self, progress: f32) -> bool {
        progress > self.start && progress < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxingTuning {
    // Ring
    pub ring_y: f32,
    pub ring_left: f32,
    pub ring_right: f32,
    pub p1_start_x: f32,
    pub p2_start_x: f32,

    // Body
    pub fighter_width: f32,
    pub fighter_height: f32,
    /// Extra hurt-box height above the body (the head)
    pub head_height: f32,
    pub hitbox_height: f32,
    /// Hit-box centre, measured down from the top of the body
    pub hitbox_drop: f32,

    // Movement
    pub move_distance: f32,
    pub min_distance: f32,
    pub attack_cooldown_ms: f32,
    pub move_cooldown_ms: f32,

    // Attacks
    pub attacks: AttackTable,
    pub hit_window: HitWindow,

    // Resources
    pub max_health: f32,
    pub max_stamina: f32,
    pub stamina_regen_per_sec: f32,
    pub block_drain_per_sec: f32,
    pub dodge_drain_per_sec: f32,
    /// Stamina needed to start or keep a block/dodge
    pub min_hold_stamina: f32,
    pub block_damage_reduction: f32,

    // Hit reaction
    pub hitstun_cooldown_ms: f32,
    pub hitstun_ms: f32,
    pub flash_ms: f32,

    // Knockdown
    pub knockdown_threshold: f32,
    pub knockdown_health_ceiling: f32,
    pub knockdown_ms: f32,
    pub knockdown_invincibility_ms: f32,
    pub tko_knockdowns: u32,

    // Rounds
    pub round_secs: f32,
    pub max_rounds: u32,
    pub countdown_secs: f32,
    pub intermission_secs: f32,

    // Feedback
    pub shake_per_damage: f32,
    pub shake_max: f32,
    pub shake_ms: f32,
}

impl Default for BoxingTuning {
    fn default() -> Self {
        Self {
            ring_y: 400.0,
            ring_left: 50.0,
            ring_right: 750.0,
            p1_start_x: 250.0,
            p2_start_x: 550.0,

            fighter_width: 40.0,
            fighter_height: 80.0,
            head_height: 24.0,
            hitbox_height: 40.0,
            hitbox_drop: 20.0,

            move_distance: 50.0,
            min_distance: 80.0,
            attack_cooldown_ms: 300.0,
            move_cooldown_ms: 200.0,

            attacks: AttackTable::default(),
            hit_window: HitWindow::default(),

            max_health: 100.0,
            max_stamina: 100.0,
            stamina_regen_per_sec: 10.0,
            block_drain_per_sec: 15.0,
            dodge_drain_per_sec: 25.0,
            min_hold_stamina: 1.0,
            block_damage_reduction: 0.6,

            hitstun_cooldown_ms: 150.0,
            hitstun_ms: 200.0,
            flash_ms: 150.0,

            knockdown_threshold: 20.0,
            knockdown_health_ceiling: 30.0,
            knockdown_ms: 2000.0,
            knockdown_invincibility_ms: 500.0,
            tko_knockdowns: 3,

            round_secs: 90.0,
            max_rounds: 3,
            countdown_secs: 3.0,
            intermission_secs: 3.0,

            shake_per_damage: 0.2,
            shake_max: 6.0,
            shake_ms: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Head soccer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoccerTuning {
    // Field
    pub field_y: f32,
    pub field_left: f32,
    pub field_right: f32,
    pub ceiling_y: f32,
    pub goal_height: f32,
    /// Gap between the ground and the bottom of the goal mouth
    pub goal_y_offset: f32,

    // Player
    pub p1_start_x: f32,
    pub p2_start_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub head_radius: f32,
    pub move_speed: f32,
    /// Loudest voice command moves this many times faster
    pub voice_speed_max_multiplier: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Horizontal velocity kept per reference frame on the ground
    pub ground_friction: f32,
    /// Horizontal velocity kept per reference frame in the air
    pub air_drag: f32,
    pub stop_speed: f32,

    // Ball
    pub ball_radius: f32,
    pub ball_spawn_x: f32,
    pub ball_spawn_y: f32,
    pub ball_gravity: f32,
    pub ball_friction: f32,
    pub ball_bounce_damping: f32,
    /// Ground bounces slower than this come to rest
    pub ball_settle_speed: f32,

    // Touches
    pub kick_force: f32,
    pub kick_lift: f32,
    pub kick_reach: f32,
    pub kick_cooldown_ms: f32,
    pub header_force: f32,
    pub header_lift: f32,
    /// Share of the player's horizontal velocity transferred on a header
    pub header_momentum: f32,

    // Power-ups
    pub power_reload_ms: f32,
    pub flame_ms: f32,
    pub flame_speed: f32,
    pub flame_size: f32,
    /// Gap between the head and the flame spawn point
    pub flame_spawn_gap: f32,
    /// Flames past the field edge by more than this are discarded
    pub flame_escape_margin: f32,
    pub cage_ms: f32,

    // Match
    pub max_goals: u32,
    pub match_secs: f32,
    pub countdown_secs: f32,
    pub celebration_secs: f32,

    // Feedback
    pub goal_shake: f32,
    pub goal_shake_ms: f32,
}

impl Default for SoccerTuning {
    fn default() -> Self {
        Self {
            field_y: 450.0,
            field_left: 50.0,
            field_right: 750.0,
            ceiling_y: 50.0,
            goal_height: 120.0,
            goal_y_offset: 80.0,

            p1_start_x: 150.0,
            p2_start_x: 650.0,
            player_width: 20.0,
            player_height: 25.0,
            head_radius: 45.0,
            move_speed: 250.0,
            voice_speed_max_multiplier: 5.0,
            jump_force: 550.0,
            gravity: 1000.0,
            ground_friction: 0.85,
            air_drag: 0.98,
            stop_speed: 5.0,

            ball_radius: 18.0,
            ball_spawn_x: 400.0,
            ball_spawn_y: 150.0,
            ball_gravity: 500.0,
            ball_friction: 0.99,
            ball_bounce_damping: 0.88,
            ball_settle_speed: 50.0,

            kick_force: 500.0,
            kick_lift: 0.5,
            kick_reach: 30.0,
            kick_cooldown_ms: 300.0,
            header_force: 450.0,
            header_lift: 0.8,
            header_momentum: 0.5,

            power_reload_ms: 10_000.0,
            flame_ms: 500.0,
            flame_speed: 600.0,
            flame_size: 20.0,
            flame_spawn_gap: 10.0,
            flame_escape_margin: 50.0,
            cage_ms: 5000.0,

            max_goals: 5,
            match_secs: 180.0,
            countdown_secs: 3.0,
            celebration_secs: 2.0,

            goal_shake: 8.0,
            goal_shake_ms: 300.0,
        }
    }
}

impl SoccerTuning {
    /// Top of the goal mouth (smaller y is higher)
    pub fn goal_top(&self) -> f32 {
        self.field_y - self.goal_y_offset - self.goal_height
    }

    /// Bottom of the goal mouth
    pub fn goal_bottom(&self) -> f32 {
        self.field_y - self.goal_y_offset
    }

    /// Whether a height lies strictly inside the goal mouth
    pub fn in_goal_band(&self, y: f32) -> bool {
        y > self.goal_top() && y < self.goal_bottom()
    }
}

// ---------------------------------------------------------------------------
// Pong
// ---------------------------------------------------------------------------

/// Pong speeds are per 60 Hz reference frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub arena_width: f32,
    pub arena_height: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a paddle and its side wall
    pub paddle_margin: f32,
    pub paddle_max_speed: f32,
    pub paddle_acceleration: f32,
    pub paddle_friction: f32,
    pub paddle_stop_speed: f32,

    pub ball_radius: f32,
    pub ball_speed: f32,
    /// Cap on |velocity × multiplier| per axis
    pub ball_max_axis_speed: f32,
    /// Serve dy is drawn from ±spread × ball_speed
    pub serve_spread: f32,
    pub speedup_step: f32,
    pub speedup_max: f32,
    /// Wall bounces slower than this vertically get nudged to `min_vertical_nudge`
    pub min_vertical_speed: f32,
    pub min_vertical_nudge: f32,

    pub winning_score: u32,
    pub countdown_secs: f32,
    pub intermission_secs: f32,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,

            paddle_width: 10.0,
            paddle_height: 100.0,
            paddle_margin: 10.0,
            paddle_max_speed: 12.0,
            paddle_acceleration: 1.2,
            paddle_friction: 0.8,
            paddle_stop_speed: 0.1,

            ball_radius: 10.0,
            ball_speed: 7.0,
            ball_max_axis_speed: 15.0,
            serve_spread: 0.7,
            speedup_step: 0.15,
            speedup_max: 2.5,
            min_vertical_speed: 1.0,
            min_vertical_nudge: 1.5,

            winning_score: 10,
            countdown_secs: 3.0,
            intermission_secs: 0.0,
        }
    }
}
