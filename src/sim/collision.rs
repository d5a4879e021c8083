//! Collision detection and response
//!
//! Axis-aligned boxes for fighters, heads and projectiles; circles for
//! balls and heads; a 1D separation pass that keeps two actors apart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `(x, y)` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centred on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Result of a circle-circle overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the other circle toward this one
    pub normal: Vec2,
    pub penetration: f32,
}

/// Overlap of circle `(pos, radius)` against `(other, other_radius)`.
///
/// Concentric circles push straight up.
pub fn circle_contact(pos: Vec2, radius: f32, other: Vec2, other_radius: f32) -> Option<Contact> {
    let delta = pos - other;
    let distance = delta.length();
    let min_distance = radius + other_radius;
    if distance >= min_distance {
        return None;
    }
    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec2::NEG_Y
    };
    Some(Contact {
        normal,
        penetration: min_distance - distance,
    })
}

/// Push two positions on one axis apart to at least `min_gap`, splitting the
/// correction evenly, then clamp both to `[lo, hi]`.
///
/// Returns true if a correction was applied.
pub fn enforce_separation(a: &mut f32, b: &mut f32, min_gap: f32, lo: f32, hi: f32) -> bool {
    let distance = (*a - *b).abs();
    if distance >= min_gap {
        return false;
    }
    let push = (min_gap - distance) / 2.0;
    if *a < *b {
        *a -= push;
        *b += push;
    } else {
        *a += push;
        *b -= push;
    }
    *a = a.clamp(lo, hi);
    *b = b.clamp(lo, hi);
    true
}

/// Reflect velocity off a surface: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Lossy bounce on one axis
#[inline]
pub fn bounce(velocity: f32, damping: f32) -> f32 {
    -velocity * damping
}
