//! Game settings loaded from `config.toml`.
//!
//! Every key is optional. A missing default file means default settings; an
//! explicitly requested file that cannot be read or parsed is an error.

use std::path::{Path, PathBuf};

use bracket_terminal::prelude::RGB;
use serde::Deserialize;

use crate::{
    ai::{BehaviorContext, DEFAULT_FLEE_THRESHOLD},
    data::ActorTemplate,
    error::ConfigError,
    map::display_to_map,
};

pub const CONFIG_FILE: &str = "config.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub map: MapConfig,
    pub player: ActorTemplate,
    pub monster: ActorTemplate,
    pub monster_count: usize,
    pub behavior: BehaviorContext,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenConfig {
    pub width_px: i32,
    pub height_px: i32,
    pub viewport_width_px: i32,
    pub viewport_height_px: i32,
    pub tile_px: i32,
}

impl ScreenConfig {
    /// Camera size in whole tiles.
    pub fn viewport_tiles(&self) -> (i32, i32) {
        display_to_map(self.viewport_width_px, self.viewport_height_px, self.tile_px)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    /// Each tile is walled off with a `1 / noise_one_in` chance; 0 disables.
    pub noise_one_in: i32,
    pub seed: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    screen: TomlScreen,
    #[serde(default)]
    map: TomlMap,
    #[serde(default)]
    player: TomlActor,
    #[serde(default)]
    monster: TomlMonster,
    #[serde(default)]
    ai: TomlAi,
}

#[derive(Deserialize, Debug)]
struct TomlScreen {
    #[serde(default = "default_screen_width")]
    width_px: i32,
    #[serde(default = "default_screen_height")]
    height_px: i32,
    #[serde(default = "default_viewport_width")]
    viewport_width_px: i32,
    #[serde(default = "default_viewport_height")]
    viewport_height_px: i32,
    #[serde(default = "default_tile_px")]
    tile_px: i32,
}

#[derive(Deserialize, Debug)]
struct TomlMap {
    /// Defaults to twice the screen, in tiles.
    width: Option<i32>,
    height: Option<i32>,
    #[serde(default = "default_noise_one_in")]
    noise_one_in: i32,
    #[serde(default = "default_seed")]
    seed: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
struct TomlActor {
    name: Option<String>,
    glyph: Option<char>,
    color: Option<[u8; 3]>,
    health: Option<i32>,
    mana: Option<i32>,
    strength: Option<i32>,
    defense: Option<i32>,
}

#[derive(Deserialize, Debug)]
struct TomlMonster {
    #[serde(default = "default_monster_count")]
    count: usize,
    #[serde(flatten)]
    actor: TomlActor,
}

#[derive(Deserialize, Debug)]
struct TomlAi {
    #[serde(default = "default_flee_threshold")]
    flee_threshold: f32,
}

// ── Defaults ──

fn default_screen_width() -> i32 { 800 }
fn default_screen_height() -> i32 { 640 }
fn default_viewport_width() -> i32 { 800 }
fn default_viewport_height() -> i32 { 480 }
fn default_tile_px() -> i32 { 16 }
fn default_noise_one_in() -> i32 { 10 }
fn default_seed() -> u64 { 0x5eed_0f_0cc5 }
fn default_monster_count() -> usize { 6 }
fn default_flee_threshold() -> f32 { DEFAULT_FLEE_THRESHOLD }

impl Default for TomlScreen {
    fn default() -> Self {
        TomlScreen {
            width_px: default_screen_width(),
            height_px: default_screen_height(),
            viewport_width_px: default_viewport_width(),
            viewport_height_px: default_viewport_height(),
            tile_px: default_tile_px(),
        }
    }
}

impl Default for TomlMap {
    fn default() -> Self {
        TomlMap {
            width: None,
            height: None,
            noise_one_in: default_noise_one_in(),
            seed: default_seed(),
        }
    }
}

impl Default for TomlAi {
    fn default() -> Self {
        TomlAi {
            flee_threshold: default_flee_threshold(),
        }
    }
}

impl Default for TomlMonster {
    fn default() -> Self {
        TomlMonster {
            count: default_monster_count(),
            actor: TomlActor::default(),
        }
    }
}

impl TomlActor {
    /// Fills in whatever the file left out from `base`.
    fn over(self, base: ActorTemplate) -> ActorTemplate {
        let color = self
            .color
            .map(|[r, g, b]| RGB::from_u8(r, g, b))
            .unwrap_or(base.color);
        ActorTemplate::new(
            self.name.unwrap_or(base.name),
            self.glyph.unwrap_or(base.glyph),
            color,
            self.health.unwrap_or(base.stats.max_health),
            self.mana.unwrap_or(base.stats.max_mana),
            self.strength.unwrap_or(base.stats.strength),
            self.defense.unwrap_or(base.stats.defense),
        )
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::resolve(TomlConfig::default())
    }
}

impl GameConfig {
    /// Loads `path` if given, else `config.toml` from the working directory
    /// or the executable's directory, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        for dir in candidate_dirs() {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                match Self::from_file(&candidate) {
                    Ok(config) => {
                        log::info!("loaded settings from {}", candidate.display());
                        return Ok(config);
                    }
                    Err(err) => {
                        log::warn!("{err}; using default settings");
                        return Ok(Self::default());
                    }
                }
            }
        }
        log::info!("no {CONFIG_FILE} found, using default settings");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(CONFIG_FILE),
            source,
        })?;
        Self::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Result<Self, ConfigError> {
        let config = Self::resolve(toml_cfg);
        config.validate()?;
        Ok(config)
    }

    fn resolve(toml_cfg: TomlConfig) -> Self {
        let screen = ScreenConfig {
            width_px: toml_cfg.screen.width_px,
            height_px: toml_cfg.screen.height_px,
            viewport_width_px: toml_cfg.screen.viewport_width_px,
            viewport_height_px: toml_cfg.screen.viewport_height_px,
            tile_px: toml_cfg.screen.tile_px,
        };
        let (default_width, default_height) =
            display_to_map(screen.width_px * 2, screen.height_px * 2, screen.tile_px);

        GameConfig {
            map: MapConfig {
                width: toml_cfg.map.width.unwrap_or(default_width),
                height: toml_cfg.map.height.unwrap_or(default_height),
                noise_one_in: toml_cfg.map.noise_one_in,
                seed: toml_cfg.map.seed,
            },
            screen,
            player: toml_cfg.player.over(ActorTemplate::player()),
            monster: toml_cfg.monster.actor.over(ActorTemplate::orc()),
            monster_count: toml_cfg.monster.count,
            behavior: BehaviorContext::new(toml_cfg.ai.flee_threshold),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.screen.tile_px <= 0 {
            return Err(invalid("screen.tile_px", "must be positive"));
        }
        if self.map.width < 3 || self.map.height < 3 {
            return Err(invalid("map", "needs at least 3x3 tiles to leave a walkable interior"));
        }
        if self.map.noise_one_in < 0 {
            return Err(invalid("map.noise_one_in", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.behavior.flee_threshold) {
            return Err(invalid("ai.flee_threshold", "must lie in 0.0..=1.0"));
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.to_string(),
    }
}

/// Working directory first, then the executable's directory.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            if !dirs.iter().any(|d| d == parent) {
                dirs.push(parent.to_path_buf());
            }
        }
    }

    dirs
}
