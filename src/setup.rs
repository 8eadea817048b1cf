use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;

use crate::{
    config::GameConfig,
    ecs::TurnEngine,
    error::EngineError,
    map::GridMap,
};

/// Builds the map, drops the player and the monsters on free tiles and hands
/// back a ready engine. The same seed always gives the same layout.
pub fn build_world(config: &GameConfig) -> Result<TurnEngine, EngineError> {
    let mut rng = RandomNumberGenerator::seeded(config.map.seed);
    let mut map = GridMap::new(config.map.width, config.map.height);
    let walls = map.scatter_noise(&mut rng, config.map.noise_one_in);

    let mut walkable = map.walkable_points();
    let player_spawn = match take_random(&mut rng, &mut walkable) {
        Some(point) => point,
        None => {
            // Noise swallowed the whole interior; reopen the centre.
            let centre = Point::new(map.width / 2, map.height / 2);
            map.clear_blocked(centre)?;
            centre
        }
    };

    let mut engine = TurnEngine::new(
        map,
        config.screen.viewport_tiles(),
        config.behavior,
        &config.player,
        player_spawn,
    )?;

    let mut spawned = 0;
    for _ in 0..config.monster_count {
        let Some(point) = take_random(&mut rng, &mut walkable) else {
            log::warn!(
                "only room for {spawned} of {} monsters",
                config.monster_count
            );
            break;
        };
        engine.spawn_monster(&config.monster, point)?;
        spawned += 1;
    }

    log::info!(
        "world {}x{} seed {:#x}: {walls} noise walls, player at {},{}, {spawned} monsters",
        config.map.width,
        config.map.height,
        config.map.seed,
        player_spawn.x,
        player_spawn.y
    );
    Ok(engine)
}

fn take_random(rng: &mut RandomNumberGenerator, points: &mut Vec<Point>) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let idx = rng.range(0, points.len() as i32) as usize;
    Some(points.swap_remove(idx))
}
