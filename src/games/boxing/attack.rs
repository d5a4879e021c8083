//! Punch kinds and the in-flight attack they start

use serde::{Deserialize, Serialize};

use crate::tuning::{AttackDef, AttackTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Jab,
    Cross,
    Hook,
    Uppercut,
}

impl AttackKind {
    pub const ALL: [AttackKind; 4] = [
        AttackKind::Jab,
        AttackKind::Cross,
        AttackKind::Hook,
        AttackKind::Uppercut,
    ];

    pub fn def(self, table: &AttackTable) -> AttackDef {
        match self {
            AttackKind::Jab => table.jab,
            AttackKind::Cross => table.cross,
            AttackKind::Hook => table.hook,
            AttackKind::Uppercut => table.uppercut,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttackKind::Jab => "jab",
            AttackKind::Cross => "cross",
            AttackKind::Hook => "hook",
            AttackKind::Uppercut => "uppercut",
        }
    }
}

/// A punch in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attack {
    pub kind: AttackKind,
    pub def: AttackDef,
    /// Milliseconds since the punch started
    pub elapsed_ms: f32,
    /// Inside the hit-active window this frame
    pub active: bool,
    /// Already connected during this activation
    pub landed: bool,
}

impl Attack {
    pub fn new(kind: AttackKind, table: &AttackTable) -> Self {
        Self {
            kind,
            def: kind.def(table),
            elapsed_ms: 0.0,
            active: false,
            landed: false,
        }
    }

    /// Fraction of the punch completed, for renderers
    pub fn progress(&self) -> f32 {
        if self.def.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.def.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.def.duration_ms
    }
}
