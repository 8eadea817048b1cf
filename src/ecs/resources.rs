#![allow(dead_code)]

use specs::prelude::Entity;

use crate::{error::EngineError, map::VisibleRegion};

/// What the monster systems need to know about the current round.
#[derive(Clone, Debug)]
pub struct TurnContext {
    pub player: Entity,
    pub region: VisibleRegion,
}

/// Tally of one monster turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonsterTurnReport {
    pub activated: usize,
    pub moved: usize,
    pub attacks: usize,
}

/// First invariant violation hit by a system this dispatch. Systems cannot
/// return errors, so the engine checks this after every dispatch.
#[derive(Debug, Default)]
pub struct TurnFault(pub Option<EngineError>);

impl TurnFault {
    pub fn record(&mut self, error: EngineError) {
        if self.0.is_none() {
            self.0 = Some(error);
        }
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Default)]
pub struct CombatLog {
    pub entries: Vec<String>,
}

impl CombatLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }
}
