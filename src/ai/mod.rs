pub mod field;

pub use field::{DistanceField, select_step};

use crate::ecs::components::CombatStats;

pub const DEFAULT_FLEE_THRESHOLD: f32 = 0.25;

/// Tunables shared by every monster brain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BehaviorContext {
    /// Fraction of max health at or below which a monster runs.
    pub flee_threshold: f32,
}

impl BehaviorContext {
    pub const fn new(flee_threshold: f32) -> Self {
        Self { flee_threshold }
    }

    /// Re-evaluated every turn with a single threshold, so a healed monster
    /// stops fleeing as soon as it climbs back above it.
    pub fn should_flee(&self, stats: Option<&CombatStats>) -> bool {
        stats.is_some_and(|stats| stats.is_critical(self.flee_threshold))
    }
}

impl Default for BehaviorContext {
    fn default() -> Self {
        Self::new(DEFAULT_FLEE_THRESHOLD)
    }
}
