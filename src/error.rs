use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("tile {x},{y} lies outside the {width}x{height} map")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    /// Every cell of the 3x3 neighbourhood is unreachable. The monster's own
    /// tile is always scored, so this means the field and the monster disagree.
    #[error("no reachable step around {x},{y}")]
    NoViableStep { x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: u32,
        component: &'static str,
    },
    #[error("cannot spawn on blocked tile {x},{y}")]
    BlockedSpawn { x: i32, y: i32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures of the headless front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("script {}: {source}", path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("state dump failed: {0}")]
    Dump(#[from] serde_json::Error),
}
