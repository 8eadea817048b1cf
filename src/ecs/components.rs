#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, Entity, NullStorage, VecStorage};

use crate::ai::DistanceField;

#[derive(Clone, Debug)]
pub struct Name {
    pub name: String,
}

impl Component for Name {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

/// Marks an entity that other entities cannot step onto.
#[derive(Default)]
pub struct BlocksTile;

impl Component for BlocksTile {
    type Storage = NullStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

/// Monster state. `target` is a lookup into the world, never an owner.
#[derive(Clone, Debug)]
pub struct Monster {
    pub fleeing: bool,
    pub target: Option<Entity>,
    pub field: DistanceField,
}

impl Monster {
    pub fn new(field: DistanceField) -> Self {
        Self {
            fleeing: false,
            target: None,
            field,
        }
    }
}

impl Component for Monster {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatStats {
    pub max_health: i32,
    pub health: i32,
    pub max_mana: i32,
    pub mana: i32,
    pub strength: i32,
    pub defense: i32,
}

impl CombatStats {
    pub fn new(health: i32, mana: i32, strength: i32, defense: i32) -> Self {
        Self {
            max_health: health,
            health,
            max_mana: mana,
            mana,
            strength,
            defense,
        }
    }

    /// Raw attack damage against `defender`. Not clamped: a sturdy defender
    /// can take negative damage.
    pub fn damage_against(&self, defender: &CombatStats) -> i32 {
        self.strength - defender.defense
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    /// True once health has fallen to `threshold` of max health or below.
    pub fn is_critical(&self, threshold: f32) -> bool {
        self.health as f32 <= self.max_health as f32 * threshold
    }
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}

/// Applies one attack and returns the damage dealt.
pub fn resolve_attack(attacker: &CombatStats, defender: &mut CombatStats) -> i32 {
    let damage = attacker.damage_against(defender);
    defender.take_damage(damage);
    damage
}
