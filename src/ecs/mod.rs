pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::to_cp437;
use serde::Serialize;
use specs::{
    prelude::{
        Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
    },
    shred::Fetch,
};

use crate::{
    ai::{BehaviorContext, DistanceField},
    data::ActorTemplate,
    error::EngineError,
    input::{InputSource, PlayerAction},
    map::{GridMap, VisibleRegion},
};

use self::{
    components::{BlocksTile, CombatStats, Monster, Name, PlayerTag, Position, Renderable},
    resources::{CombatLog, MonsterTurnReport, TurnContext, TurnFault},
    systems::{MonsterMoveSystem, TargetingSystem},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunState {
    PlayerTurn,
    MonsterTurn,
}

/// How a player action played out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionResult {
    Moved(Point),
    Attacked { target: Entity, damage: i32 },
    /// Wall, or an entity that cannot be fought. The turn still passes.
    Blocked,
    Waited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    AwaitingInput,
    PlayerActed(ActionResult),
    MonstersActed(MonsterTurnReport),
    Quit,
}

/// Owns the map and every entity, and alternates player and monster turns.
pub struct TurnEngine {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
    run_state: RunState,
    region: VisibleRegion,
    viewport: (i32, i32),
    pub turn: u64,
}

impl TurnEngine {
    /// `viewport` is the camera size in tiles. The player is the first
    /// entity created; monsters follow in spawn order.
    pub fn new(
        map: GridMap,
        viewport: (i32, i32),
        behavior: BehaviorContext,
        player_template: &ActorTemplate,
        spawn: Point,
    ) -> Result<Self, EngineError> {
        if map.is_blocked(spawn)? {
            return Err(EngineError::BlockedSpawn {
                x: spawn.x,
                y: spawn.y,
            });
        }

        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        let region = VisibleRegion::around(spawn, &map, viewport.0, viewport.1);
        specs_world.insert(map);
        specs_world.insert(behavior);
        specs_world.insert(CombatLog::default());
        specs_world.insert(MonsterTurnReport::default());
        specs_world.insert(TurnFault::default());

        let player = specs_world
            .create_entity()
            .with(Name {
                name: player_template.name.clone(),
            })
            .with(Position { point: spawn })
            .with(Renderable {
                glyph: to_cp437(player_template.glyph),
                color: player_template.color,
                order: 2,
            })
            .with(player_template.stats.clone())
            .with(BlocksTile)
            .with(PlayerTag)
            .build();
        specs_world.insert(TurnContext { player, region });

        let dispatcher = DispatcherBuilder::new()
            .with(TargetingSystem, "targeting", &[])
            .with(MonsterMoveSystem, "monster_move", &["targeting"])
            .build();

        Ok(Self {
            specs_world,
            dispatcher,
            player,
            run_state: RunState::PlayerTurn,
            region,
            viewport,
            turn: 0,
        })
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Name>();
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<BlocksTile>();
        world.register::<PlayerTag>();
        world.register::<Monster>();
        world.register::<CombatStats>();
    }

    pub fn spawn_monster(
        &mut self,
        template: &ActorTemplate,
        point: Point,
    ) -> Result<Entity, EngineError> {
        let field = {
            let map = self.map();
            if map.is_blocked(point)? {
                return Err(EngineError::BlockedSpawn {
                    x: point.x,
                    y: point.y,
                });
            }
            DistanceField::unreachable(&map)
        };
        let entity = self
            .specs_world
            .create_entity()
            .with(Name {
                name: template.name.clone(),
            })
            .with(Position { point })
            .with(Renderable {
                glyph: to_cp437(template.glyph),
                color: template.color,
                order: 1,
            })
            .with(template.stats.clone())
            .with(BlocksTile)
            .with(Monster::new(field))
            .build();
        Ok(entity)
    }

    /// Advances the state machine by one frame. Input is polled only on the
    /// player's turn; an empty poll leaves the state untouched.
    pub fn tick(&mut self, input: &mut dyn InputSource) -> Result<TickOutcome, EngineError> {
        self.refresh_region()?;
        match self.run_state {
            RunState::PlayerTurn => {
                let Some(action) = input.poll() else {
                    return Ok(TickOutcome::AwaitingInput);
                };
                let result = match action {
                    PlayerAction::Quit => {
                        log::info!("quit requested on turn {}", self.turn);
                        return Ok(TickOutcome::Quit);
                    }
                    PlayerAction::Wait => ActionResult::Waited,
                    PlayerAction::Move { dx, dy } => self.resolve_player_action(dx, dy)?,
                };
                log::debug!("turn {}: player {result:?}", self.turn);
                self.run_state = RunState::MonsterTurn;
                Ok(TickOutcome::PlayerActed(result))
            }
            RunState::MonsterTurn => {
                let report = self.run_monster_turn()?;
                self.run_state = RunState::PlayerTurn;
                self.turn = self.turn.wrapping_add(1);
                Ok(TickOutcome::MonstersActed(report))
            }
        }
    }

    /// Recentres the camera window on the player.
    pub fn refresh_region(&mut self) -> Result<VisibleRegion, EngineError> {
        let spawn = self.player_point()?;
        let region = VisibleRegion::around(spawn, &self.map(), self.viewport.0, self.viewport.1);
        self.region = region;
        Ok(region)
    }

    /// Moves the player by `(dx, dy)`, or attacks whoever stands there.
    pub fn resolve_player_action(&mut self, dx: i32, dy: i32) -> Result<ActionResult, EngineError> {
        let origin = self.player_point()?;
        let destination = Point::new(origin.x + dx, origin.y + dy);
        if self.map().is_blocked(destination)? {
            return Ok(ActionResult::Blocked);
        }

        if let Some(target) = self.entity_at(destination) {
            return Ok(self.player_attack(target));
        }

        self.set_position(self.player, destination)?;
        Ok(ActionResult::Moved(destination))
    }

    fn player_attack(&mut self, target: Entity) -> ActionResult {
        let mut stats = self.specs_world.write_component::<CombatStats>();
        let names = self.specs_world.read_component::<Name>();
        let (Some(attacker), Some(defender)) = (stats.get(self.player).cloned(), stats.get_mut(target))
        else {
            return ActionResult::Blocked;
        };
        let damage = components::resolve_attack(&attacker, defender);
        let name = names
            .get(target)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| "foe".to_string());
        self.specs_world
            .write_resource::<CombatLog>()
            .push(format!("You hit {name} for {damage}"));
        ActionResult::Attacked { target, damage }
    }

    /// Gives every monster inside the visible region one action.
    pub fn run_monster_turn(&mut self) -> Result<MonsterTurnReport, EngineError> {
        self.specs_world.insert(TurnContext {
            player: self.player,
            region: self.region,
        });
        self.specs_world.insert(MonsterTurnReport::default());
        self.specs_world.insert(TurnFault::default());
        self.dispatcher.dispatch(&mut self.specs_world);
        self.specs_world.maintain();

        if let Some(error) = self.specs_world.write_resource::<TurnFault>().0.take() {
            return Err(error);
        }
        let report = *self.specs_world.fetch::<MonsterTurnReport>();
        log::debug!("turn {}: monsters {report:?}", self.turn);
        Ok(report)
    }

    pub fn map(&self) -> Fetch<'_, GridMap> {
        self.specs_world.fetch::<GridMap>()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn awaiting_player(&self) -> bool {
        self.run_state == RunState::PlayerTurn
    }

    pub fn visible_region(&self) -> VisibleRegion {
        self.region
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn player_point(&self) -> Result<Point, EngineError> {
        self.position_of(self.player)
            .ok_or(EngineError::MissingComponent {
                entity: self.player.id(),
                component: "Position",
            })
    }

    pub fn position_of(&self, entity: Entity) -> Option<Point> {
        let positions = self.specs_world.read_component::<Position>();
        positions.get(entity).map(|pos| pos.point)
    }

    pub fn set_position(&mut self, entity: Entity, point: Point) -> Result<(), EngineError> {
        let mut positions = self.specs_world.write_component::<Position>();
        let pos = positions
            .get_mut(entity)
            .ok_or(EngineError::MissingComponent {
                entity: entity.id(),
                component: "Position",
            })?;
        pos.point = point;
        Ok(())
    }

    pub fn stats_of(&self, entity: Entity) -> Option<CombatStats> {
        let stats = self.specs_world.read_component::<CombatStats>();
        stats.get(entity).cloned()
    }

    pub fn player_stats(&self) -> Option<CombatStats> {
        self.stats_of(self.player)
    }

    pub fn monster_state(&self, entity: Entity) -> Option<Monster> {
        let monsters = self.specs_world.read_component::<Monster>();
        monsters.get(entity).cloned()
    }

    /// The blocking entity standing on `point`, if any.
    pub fn entity_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let blockers = self.specs_world.read_component::<BlocksTile>();
        (&entities, &positions, &blockers)
            .join()
            .find(|(_, pos, _)| pos.point == point)
            .map(|(entity, _, _)| entity)
    }

    pub fn monsters(&self) -> Vec<Entity> {
        let entities = self.specs_world.entities();
        let monsters = self.specs_world.read_component::<Monster>();
        (&entities, &monsters)
            .join()
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(Point, &Renderable),
    {
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let mut drawn: Vec<(Point, &Renderable)> = (&positions, &renderables)
            .join()
            .map(|(pos, renderable)| (pos.point, renderable))
            .collect();
        drawn.sort_by_key(|(_, renderable)| renderable.order);
        for (point, renderable) in drawn {
            f(point, renderable);
        }
    }

    pub fn drain_combat_log(&mut self) -> Vec<String> {
        let mut log = self.specs_world.write_resource::<CombatLog>();
        std::mem::take(&mut log.entries)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let entities = self.specs_world.entities();
        let names = self.specs_world.read_component::<Name>();
        let positions = self.specs_world.read_component::<Position>();
        let stats = self.specs_world.read_component::<CombatStats>();
        let monsters = self.specs_world.read_component::<Monster>();

        let entities = (&entities, &names, &positions)
            .join()
            .map(|(entity, name, pos)| {
                let stat = stats.get(entity);
                let monster = monsters.get(entity);
                EntitySnapshot {
                    id: entity.id(),
                    name: name.name.clone(),
                    kind: if entity == self.player {
                        "player"
                    } else if monster.is_some() {
                        "monster"
                    } else {
                        "prop"
                    },
                    x: pos.point.x,
                    y: pos.point.y,
                    health: stat.map(|s| s.health),
                    max_health: stat.map(|s| s.max_health),
                    fleeing: monster.map(|m| m.fleeing),
                    target: monster.and_then(|m| m.target).map(|t| t.id()),
                }
            })
            .collect();

        StateSnapshot {
            taken_at: chrono::Local::now().to_rfc3339(),
            turn: self.turn,
            run_state: self.run_state,
            region: [self.region.x1, self.region.x2, self.region.y1, self.region.y2],
            entities,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StateSnapshot {
    pub taken_at: String,
    pub turn: u64,
    pub run_state: RunState,
    /// `[x1, x2, y1, y2]`, inclusive.
    pub region: [i32; 4],
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub name: String,
    pub kind: &'static str,
    pub x: i32,
    pub y: i32,
    pub health: Option<i32>,
    pub max_health: Option<i32>,
    pub fleeing: Option<bool>,
    pub target: Option<u32>,
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn engine(width: i32, height: i32, player_at: Point) -> TurnEngine {
        TurnEngine::new(
            GridMap::new(width, height),
            (50, 30),
            BehaviorContext::default(),
            &ActorTemplate::player(),
            player_at,
        )
        .unwrap()
    }

    fn monster_turn(engine: &mut TurnEngine) -> MonsterTurnReport {
        assert_eq!(engine.run_state(), RunState::MonsterTurn);
        match engine.tick(&mut None::<PlayerAction>).unwrap() {
            TickOutcome::MonstersActed(report) => report,
            other => panic!("expected a monster turn, got {other:?}"),
        }
    }

    #[test]
    fn starts_on_the_player_turn_and_waits_for_input() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        assert_eq!(engine.run_state(), RunState::PlayerTurn);
        assert_eq!(engine.tick(&mut None::<PlayerAction>).unwrap(), TickOutcome::AwaitingInput);
        assert_eq!(engine.tick(&mut None::<PlayerAction>).unwrap(), TickOutcome::AwaitingInput);
        assert_eq!(engine.run_state(), RunState::PlayerTurn);
        assert_eq!(engine.turn, 0);
    }

    #[test]
    fn quit_leaves_the_state_alone() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let outcome = engine.tick(&mut Some(PlayerAction::Quit)).unwrap();
        assert_eq!(outcome, TickOutcome::Quit);
        assert_eq!(engine.run_state(), RunState::PlayerTurn);
    }

    #[test]
    fn player_moves_then_monsters_take_their_turn() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let outcome = engine.tick(&mut Some(PlayerAction::step(1, 1))).unwrap();
        assert_eq!(outcome, TickOutcome::PlayerActed(ActionResult::Moved(Point::new(6, 6))));
        assert_eq!(engine.player_point(), Ok(Point::new(6, 6)));

        let report = monster_turn(&mut engine);
        assert_eq!(report, MonsterTurnReport::default());
        assert_eq!(engine.run_state(), RunState::PlayerTurn);
        assert_eq!(engine.turn, 1);
    }

    #[test]
    fn walking_into_a_wall_still_passes_the_turn() {
        let mut engine = engine(20, 20, Point::new(1, 1));
        let outcome = engine.tick(&mut Some(PlayerAction::step(-1, 0))).unwrap();
        assert_eq!(outcome, TickOutcome::PlayerActed(ActionResult::Blocked));
        assert_eq!(engine.player_point(), Ok(Point::new(1, 1)));
        assert_eq!(engine.run_state(), RunState::MonsterTurn);
    }

    #[test]
    fn waiting_passes_the_turn() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let outcome = engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        assert_eq!(outcome, TickOutcome::PlayerActed(ActionResult::Waited));
        assert_eq!(engine.run_state(), RunState::MonsterTurn);
    }

    #[test]
    fn bumping_a_monster_attacks_it() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(6, 5))
            .unwrap();
        assert_eq!(engine.stats_of(orc).map(|s| s.defense), Some(8));
        assert_eq!(engine.player_stats().map(|s| s.strength), Some(10));

        let outcome = engine.tick(&mut Some(PlayerAction::step(1, 0))).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::PlayerActed(ActionResult::Attacked {
                target: orc,
                damage: 2
            })
        );
        assert_eq!(engine.stats_of(orc).map(|s| s.health), Some(8));
        assert_eq!(engine.player_point(), Ok(Point::new(5, 5)));
        assert_eq!(engine.drain_combat_log(), vec!["You hit Orc for 2".to_string()]);
        assert!(engine.drain_combat_log().is_empty());
    }

    #[test]
    fn monsters_bind_the_player_lazily() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(12, 12))
            .unwrap();
        assert_eq!(engine.monster_state(orc).and_then(|m| m.target), None);

        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        monster_turn(&mut engine);
        assert_eq!(
            engine.monster_state(orc).and_then(|m| m.target),
            Some(engine.player_entity())
        );
    }

    #[test]
    fn monsters_chase_down_the_field() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(9, 8))
            .unwrap();
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        let report = monster_turn(&mut engine);
        assert_eq!(report.moved, 1);
        assert_eq!(engine.position_of(orc), Some(Point::new(8, 7)));
    }

    #[test]
    fn adjacent_monsters_attack_instead_of_moving() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(6, 6))
            .unwrap();
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        let report = monster_turn(&mut engine);
        assert_eq!(report.attacks, 1);
        assert_eq!(engine.position_of(orc), Some(Point::new(6, 6)));
        // Orc strength 6 against player defense 4.
        assert_eq!(engine.player_stats().map(|s| s.health), Some(28));
        assert_eq!(engine.drain_combat_log(), vec!["Orc hits you for 2".to_string()]);
    }

    #[test]
    fn monsters_do_not_stack() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let front = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(6, 5))
            .unwrap();
        let back = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(7, 5))
            .unwrap();
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        let report = monster_turn(&mut engine);

        assert_eq!(
            report,
            MonsterTurnReport {
                activated: 2,
                moved: 1,
                attacks: 1
            }
        );
        assert_eq!(engine.position_of(front), Some(Point::new(6, 5)));
        // (6,5) is taken; (-1,-1), (0,0) and (-1,1) tie and the last one wins.
        assert_eq!(engine.position_of(back), Some(Point::new(6, 6)));
    }

    #[test]
    fn a_wounded_monster_turns_to_flee_one_step_later() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(8, 5))
            .unwrap();
        {
            let mut stats = engine.specs_world.write_component::<CombatStats>();
            stats.get_mut(orc).unwrap().health = 2;
        }
        assert_eq!(engine.monster_state(orc).map(|m| m.fleeing), Some(false));

        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        monster_turn(&mut engine);
        // Flagged this turn, but the step still comes from the chase field.
        assert_eq!(engine.monster_state(orc).map(|m| m.fleeing), Some(true));
        assert_eq!(engine.position_of(orc), Some(Point::new(7, 5)));

        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        monster_turn(&mut engine);
        assert_eq!(engine.monster_state(orc).map(|m| m.fleeing), Some(true));
        assert_eq!(engine.position_of(orc), Some(Point::new(8, 6)));
    }

    #[test]
    fn glyphs_are_stored_as_font_indices() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let mut imp = ActorTemplate::orc();
        imp.glyph = '☺';
        engine.spawn_monster(&imp, Point::new(8, 5)).unwrap();

        let mut glyphs = Vec::new();
        engine.each_renderable(|point, renderable| glyphs.push((point, renderable.glyph)));
        assert!(glyphs.contains(&(Point::new(5, 5), to_cp437('@'))));
        assert!(glyphs.contains(&(Point::new(8, 5), 1)));
    }

    #[test]
    fn healed_monsters_stop_fleeing() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(12, 5))
            .unwrap();
        engine.specs_world.write_component::<CombatStats>().get_mut(orc).unwrap().health = 1;
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        monster_turn(&mut engine);
        assert_eq!(engine.monster_state(orc).map(|m| m.fleeing), Some(true));

        engine.specs_world.write_component::<CombatStats>().get_mut(orc).unwrap().health = 3;
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        monster_turn(&mut engine);
        assert_eq!(engine.monster_state(orc).map(|m| m.fleeing), Some(false));
    }

    #[test]
    fn offscreen_monsters_are_frozen() {
        let mut engine = TurnEngine::new(
            GridMap::new(60, 40),
            (10, 10),
            BehaviorContext::default(),
            &ActorTemplate::player(),
            Point::new(5, 5),
        )
        .unwrap();
        let far = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(40, 30))
            .unwrap();
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        let report = monster_turn(&mut engine);

        assert_eq!(report.activated, 0);
        assert_eq!(engine.visible_region(), VisibleRegion::new(0, 10, 0, 10));
        assert_eq!(engine.position_of(far), Some(Point::new(40, 30)));
        assert_eq!(engine.monster_state(far).and_then(|m| m.target), None);
    }

    #[test]
    fn the_region_follows_the_player() {
        let mut engine = TurnEngine::new(
            GridMap::new(60, 40),
            (10, 10),
            BehaviorContext::default(),
            &ActorTemplate::player(),
            Point::new(10, 10),
        )
        .unwrap();
        engine.tick(&mut Some(PlayerAction::step(1, 0))).unwrap();
        monster_turn(&mut engine);
        assert_eq!(engine.visible_region(), VisibleRegion::new(6, 16, 5, 15));
    }

    #[test]
    fn the_monster_turn_does_not_consume_input() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        let mut queued = VecDeque::from(vec![PlayerAction::step(0, 1)]);
        engine.tick(&mut queued).unwrap();
        assert_eq!(queued.len(), 1);
        engine.tick(&mut queued).unwrap();
        assert_eq!(engine.player_point(), Ok(Point::new(5, 6)));
    }

    #[test]
    fn spawning_on_walls_is_refused() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        assert_eq!(
            engine.spawn_monster(&ActorTemplate::orc(), Point::new(0, 3)),
            Err(EngineError::BlockedSpawn { x: 0, y: 3 })
        );
        assert!(matches!(
            engine.spawn_monster(&ActorTemplate::orc(), Point::new(30, 3)),
            Err(EngineError::Map(_))
        ));
        assert!(
            TurnEngine::new(
                GridMap::new(20, 20),
                (50, 30),
                BehaviorContext::default(),
                &ActorTemplate::player(),
                Point::new(19, 4),
            )
            .is_err()
        );
    }

    #[test]
    fn a_walled_in_monster_is_reported() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        let orc = engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(12, 12))
            .unwrap();
        engine.tick(&mut Some(PlayerAction::Wait)).unwrap();
        {
            let mut map = engine.specs_world.write_resource::<GridMap>();
            for dy in -1..=1 {
                for dx in -1..=1 {
                    map.mark_blocked(Point::new(12 + dx, 12 + dy)).unwrap();
                }
            }
        }
        assert_eq!(
            engine.tick(&mut None::<PlayerAction>),
            Err(EngineError::Path(crate::error::PathError::NoViableStep {
                x: 12,
                y: 12
            }))
        );
        assert_eq!(engine.position_of(orc), Some(Point::new(12, 12)));
    }

    #[test]
    fn snapshot_lists_player_first() {
        let mut engine = engine(20, 20, Point::new(5, 5));
        engine
            .spawn_monster(&ActorTemplate::orc(), Point::new(9, 9))
            .unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.entities.len(), 2);
        assert_eq!(snapshot.entities[0].kind, "player");
        assert_eq!(snapshot.entities[1].kind, "monster");
        assert_eq!(snapshot.entities[1].fleeing, Some(false));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["run_state"], "PlayerTurn");
        assert_eq!(json["entities"][1]["name"], "Orc");
    }
}
