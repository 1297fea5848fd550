//! Fixed scoring rules.

pub const MAX_SECURITY: i32 = 100;
pub const XP_PER_LEVEL: u32 = 100;

pub const SCENARIO_XP: u32 = 20;
pub const SCENARIO_REPUTATION: i64 = 5;
pub const SCENARIO_PENALTY: i32 = 15;

/// Boss damage from a correct answer, regardless of the attack.
pub const BOSS_HIT: i32 = 50;
pub const BOSS_XP: u32 = 30;
pub const BOSS_REPUTATION: i64 = 10;
pub const BOSS_DEFEAT_REPUTATION: i64 = 50;

pub const MISTAKE_REVIEW_SIZE: usize = 5;
pub const RECOMMENDATION_THRESHOLD: f64 = 0.80;
