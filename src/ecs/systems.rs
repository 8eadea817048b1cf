use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use smallvec::SmallVec;
use specs::prelude::*;

use super::{
    components::{BlocksTile, CombatStats, Monster, Name, Position, resolve_attack},
    resources::{CombatLog, MonsterTurnReport, TurnContext, TurnFault},
};
use crate::{
    ai::{BehaviorContext, select_step},
    error::EngineError,
    map::GridMap,
};

/// Binds idle monsters inside the visible region to the player.
#[derive(Default)]
pub struct TargetingSystem;

impl<'a> System<'a> for TargetingSystem {
    type SystemData = (
        WriteStorage<'a, Monster>,
        ReadStorage<'a, Position>,
        ReadExpect<'a, TurnContext>,
        Entities<'a>,
    );

    fn run(&mut self, (mut monsters, positions, turn, entities): Self::SystemData) {
        for (entity, monster, pos) in (&entities, &mut monsters, &positions).join() {
            if !turn.region.contains(pos.point) || monster.target.is_some() {
                continue;
            }
            log::debug!("monster {} now hunts entity {}", entity.id(), turn.player.id());
            monster.target = Some(turn.player);
        }
    }
}

/// Moves every active monster one step down its distance field, or attacks
/// when the step is blocked and the target is adjacent. Monsters act one at a
/// time in creation order and see each other's new positions.
///
/// The field is built with the flee flag carried over from the last turn and
/// the flag is refreshed afterwards, so a monster that just became critical
/// still follows its chase field this turn and runs from the next one.
#[derive(Default)]
pub struct MonsterMoveSystem;

impl<'a> System<'a> for MonsterMoveSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Monster>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, CombatStats>,
        ReadStorage<'a, BlocksTile>,
        ReadStorage<'a, Name>,
        ReadExpect<'a, GridMap>,
        ReadExpect<'a, TurnContext>,
        ReadExpect<'a, BehaviorContext>,
        WriteExpect<'a, CombatLog>,
        WriteExpect<'a, MonsterTurnReport>,
        WriteExpect<'a, TurnFault>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut monsters,
            mut positions,
            mut stats,
            blockers,
            names,
            map,
            turn,
            behavior,
            mut combat_log,
            mut report,
            mut fault,
        ): Self::SystemData,
    ) {
        let mut occupants: Vec<(Entity, Point)> = (&entities, &positions, &blockers)
            .join()
            .map(|(entity, pos, _)| (entity, pos.point))
            .collect();
        let movers: Vec<Entity> = (&entities, &monsters, &positions)
            .join()
            .filter(|(_, _, pos)| turn.region.contains(pos.point))
            .map(|(entity, _, _)| entity)
            .collect();

        for entity in movers {
            let Some(here) = positions.get(entity).map(|pos| pos.point) else {
                continue;
            };
            let Some(monster) = monsters.get_mut(entity) else {
                continue;
            };
            let Some(target) = monster.target else {
                fault.record(EngineError::MissingComponent {
                    entity: entity.id(),
                    component: "target",
                });
                return;
            };
            let Some(goal) = positions.get(target).map(|pos| pos.point) else {
                fault.record(EngineError::MissingComponent {
                    entity: target.id(),
                    component: "Position",
                });
                return;
            };

            let occupied: SmallVec<[Point; 16]> = occupants
                .iter()
                .filter(|(other, _)| *other != entity && *other != target)
                .map(|(_, point)| *point)
                .collect();
            monster.field.recompute(&map, goal, &occupied, monster.fleeing);

            let fleeing = behavior.should_flee(stats.get(entity));
            if fleeing != monster.fleeing {
                log::debug!("monster {} fleeing: {fleeing}", entity.id());
            }
            monster.fleeing = fleeing;

            let step = match select_step(&monster.field, here) {
                Ok(step) => step,
                Err(error) => {
                    fault.record(error.into());
                    return;
                }
            };
            report.activated += 1;

            let destination = Point::new(here.x + step.x, here.y + step.y);
            let free = map.is_walkable(destination)
                && !occupants.iter().any(|(_, point)| *point == destination);

            if free {
                if let Some(pos) = positions.get_mut(entity) {
                    pos.point = destination;
                }
                if let Some(slot) = occupants.iter_mut().find(|(other, _)| *other == entity) {
                    slot.1 = destination;
                }
                report.moved += 1;
                log::debug!(
                    "monster {} steps {},{} -> {},{}",
                    entity.id(),
                    here.x,
                    here.y,
                    destination.x,
                    destination.y
                );
                continue;
            }

            if DistanceAlg::Pythagoras.distance2d(here, goal) < 2.0 {
                if let (Some(attacker), Some(defender)) =
                    (stats.get(entity).cloned(), stats.get_mut(target))
                {
                    let damage = resolve_attack(&attacker, defender);
                    report.attacks += 1;
                    let name = names
                        .get(entity)
                        .map(|n| n.name.clone())
                        .unwrap_or_else(|| "foe".to_string());
                    combat_log.push(format!("{name} hits you for {damage}"));
                    log::debug!(
                        "monster {} attacks entity {} for {damage}, health now {}",
                        entity.id(),
                        target.id(),
                        defender.health
                    );
                }
            }
        }
    }
}
