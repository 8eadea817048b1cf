mod ai;
mod config;
mod data;
mod ecs;
mod error;
mod input;
mod map;
mod render;
mod scripted_input;
mod setup;

use std::path::PathBuf;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use clap::Parser;

use config::GameConfig;
use ecs::{TickOutcome, TurnEngine};
use error::AppError;
use input::{KeyCommand, PlayerAction, command_for_key};
use render::{draw_entities, draw_log, draw_map, draw_status};
use scripted_input::ScriptedInput;

const MAP_ORIGIN: Point = Point { x: 1, y: 2 };
const LOG_PANEL_START: i32 = 35;
const LOG_MAX_ENTRIES: usize = 12;

#[derive(Parser, Debug)]
#[command(name = "gridcrawl", about = "Turn-based grid crawler")]
struct Args {
    /// Config file; defaults to config.toml beside the binary or in the cwd.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the map seed from the config.
    #[arg(long)]
    seed: Option<u64>,

    /// Plays a keypress script without opening a window.
    #[arg(long)]
    script: Option<PathBuf>,
}

struct CrawlState {
    engine: TurnEngine,
    message_log: Vec<String>,
    pending: Option<PlayerAction>,
}

impl GameState for CrawlState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        match self.engine.tick(&mut self.pending) {
            Ok(TickOutcome::Quit) => {
                ctx.quit();
                return;
            }
            Ok(_) => {}
            Err(err) => {
                log::error!("turn {} failed: {err}", self.engine.turn);
                ctx.quit();
                return;
            }
        }
        self.flush_combat_log();
        ctx.cls();
        self.draw_scene(ctx);
    }
}

impl CrawlState {
    fn handle_input(&mut self, ctx: &mut BTerm) {
        let Some(key) = ctx.key else {
            return;
        };
        match command_for_key(key) {
            Some(KeyCommand::Act(action)) => self.pending = Some(action),
            Some(KeyCommand::DumpState) => match serde_json::to_string_pretty(&self.engine.snapshot()) {
                Ok(json) => log::info!("state dump:\n{json}"),
                Err(err) => log::warn!("state dump failed: {err}"),
            },
            None => {}
        }
    }

    fn draw_scene(&mut self, ctx: &mut BTerm) {
        let stats = self.engine.player_stats();
        draw_status(ctx, 0, self.engine.turn, stats.as_ref());
        let region = self.engine.visible_region();
        draw_map(ctx, &self.engine.map(), &region, MAP_ORIGIN);
        draw_entities(ctx, &self.engine, MAP_ORIGIN);
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
    }

    fn flush_combat_log(&mut self) {
        for entry in self.engine.drain_combat_log() {
            self.message_log.insert(0, entry);
        }
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }
}

/// Feeds the script to the engine until it runs dry or asks to quit.
fn run_script(engine: &mut TurnEngine, mut script: ScriptedInput) -> Result<(), AppError> {
    loop {
        let outcome = if engine.awaiting_player() {
            match script.next_command() {
                None => break,
                Some(KeyCommand::DumpState) => {
                    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
                    continue;
                }
                Some(KeyCommand::Act(action)) => engine.tick(&mut Some(action))?,
            }
        } else {
            engine.tick(&mut None::<PlayerAction>)?
        };
        for entry in engine.drain_combat_log() {
            log::info!("{entry}");
        }
        if outcome == TickOutcome::Quit {
            break;
        }
    }
    log::info!("script finished on turn {}", engine.turn);
    Ok(())
}

fn main() -> BError {
    env_logger::init();
    let args = Args::parse();

    let mut config = GameConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.map.seed = seed;
    }
    let mut engine = setup::build_world(&config)?;

    if let Some(path) = args.script {
        let script = ScriptedInput::from_file(&path).map_err(|source| AppError::Script {
            path: path.clone(),
            source,
        })?;
        run_script(&mut engine, script)?;
        return Ok(());
    }

    let context = BTermBuilder::simple80x50()
        .with_title("gridcrawl")
        .build()?;
    let game_state = CrawlState {
        engine,
        message_log: Vec::new(),
        pending: None,
    };
    main_loop(context, game_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_script_plays_whole_rounds_and_stops_at_quit() {
        let mut config = GameConfig::default();
        config.map.width = 30;
        config.map.height = 20;
        let mut engine = setup::build_world(&config).unwrap();
        let script = ScriptedInput::from_reader("l.q.".as_bytes()).unwrap();
        run_script(&mut engine, script).unwrap();
        assert_eq!(engine.turn, 2);
        assert!(engine.awaiting_player());
    }
}
