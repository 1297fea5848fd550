use serde::{Deserialize, Serialize};

use super::rules::{MAX_SECURITY, XP_PER_LEVEL};
use crate::content::Role;

pub const DEFAULT_PLAYER_NAME: &str = "Agent";

/// Everything about the player that survives between answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgressState {
    pub player_name: String,
    pub role: Role,
    /// May drop below zero on the answer that ends the run; display floors it.
    pub security: i32,
    pub max_security: i32,
    pub xp: u32,
    pub level: u32,
    pub reputation: i64,
    pub current_chapter: u32,
    /// Position inside the chapter. Saved, but never read back on restore.
    pub current_scenario: usize,
}

impl ProgressState {
    pub fn new(player_name: &str, role: Role) -> Self {
        let name = player_name.trim();
        ProgressState {
            player_name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            role,
            security: MAX_SECURITY,
            max_security: MAX_SECURITY,
            xp: 0,
            level: 1,
            reputation: 0,
            current_chapter: 1,
            current_scenario: 0,
        }
    }

    /// Adds xp and returns how many levels were gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut gained = 0;
        while self.xp >= self.level * XP_PER_LEVEL {
            self.level += 1;
            gained += 1;
        }
        gained
    }

    pub fn gain_reputation(&mut self, amount: i64) {
        self.reputation += amount;
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.security -= amount;
    }

    pub fn is_defeated(&self) -> bool {
        self.security <= 0
    }

    pub fn restore_security(&mut self) {
        self.security = self.max_security;
    }

    pub fn security_display(&self) -> i32 {
        self.security.max(0)
    }

    pub fn security_percent(&self) -> u16 {
        if self.max_security <= 0 {
            return 0;
        }
        let pct = self.security_display() as f64 / self.max_security as f64 * 100.0;
        pct.round().clamp(0.0, 100.0) as u16
    }

    pub fn xp_into_level(&self) -> u32 {
        self.xp % XP_PER_LEVEL
    }

    /// The level `xp` implies under the level-up rule.
    pub fn expected_level(xp: u32) -> u32 {
        xp / XP_PER_LEVEL + 1
    }
}
