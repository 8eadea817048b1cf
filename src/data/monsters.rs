use bracket_terminal::prelude::RGB;

use crate::ecs::components::CombatStats;

/// Everything needed to spawn an actor.
#[derive(Clone, Debug)]
pub struct ActorTemplate {
    pub name: String,
    pub glyph: char,
    pub color: RGB,
    pub stats: CombatStats,
}

impl ActorTemplate {
    pub fn new(
        name: impl Into<String>,
        glyph: char,
        color: RGB,
        health: i32,
        mana: i32,
        strength: i32,
        defense: i32,
    ) -> Self {
        Self {
            name: name.into(),
            glyph,
            color,
            stats: CombatStats::new(health, mana, strength, defense),
        }
    }

    pub fn player() -> Self {
        Self::new("Player", '@', RGB::from_u8(0, 255, 0), 30, 10, 10, 4)
    }

    pub fn orc() -> Self {
        Self::new("Orc", 'o', RGB::from_u8(255, 0, 0), 10, 0, 6, 8)
    }
}
