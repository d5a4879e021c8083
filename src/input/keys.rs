//! Logical keyboard state and edge latches

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Shared start/pause keys
pub const START_KEYS: [&str; 2] = [" ", "Enter"];
pub const CANCEL_KEY: &str = "Escape";

/// Browser key names are case-sensitive; fold single letters so Shift or
/// Caps Lock don't change the binding.
pub fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().collect(),
        _ => key.to_string(),
    }
}

/// Which keys are held right now. Owned by the frame driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    down: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.down.insert(normalize_key(key));
    }

    pub fn release(&mut self, key: &str) {
        self.down.remove(&normalize_key(key));
    }

    pub fn set(&mut self, key: &str, down: bool) {
        if down {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn is_down(&self, key: &str) -> bool {
        self.down.contains(&normalize_key(key))
    }

    pub fn any_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_down(k))
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Turns a level signal into one-shot presses: fires once per down
/// transition, re-arms on release.
#[derive(Debug, Clone)]
pub struct KeyLatch<K> {
    held: HashMap<K, bool>,
}

impl<K> Default for KeyLatch<K> {
    fn default() -> Self {
        Self {
            held: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq> KeyLatch<K> {
    /// True only on the frame `id` goes from up to down
    pub fn edge(&mut self, id: K, down: bool) -> bool {
        let was_down = self.held.insert(id, down).unwrap_or(false);
        down && !was_down
    }

    pub fn reset(&mut self) {
        self.held.clear();
    }
}
