//! Ошибки генерации карты
//!
//! - [`ConfigError`] — неверные параметры, проверяются до запуска конвейера
//! - [`GraphError`] — нарушение контракта геометрического адаптера, фатально
//! - [`MapError`] — общий тип, который возвращают публичные функции

use glam::DVec2;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lake threshold {0} is outside [0, 1]")]
    LakeThreshold(f32),
    #[error("spring elevation band [{0}, {1}] is not an ordered range inside [0, 1]")]
    SpringBand(f32, f32),
    #[error("map size {width}x{height} must be positive and finite")]
    MapSize { width: f64, height: f64 },
    #[error("polygon count must be greater than zero")]
    NoPolygons,
    #[error("failed to parse map config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read map config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ошибки построения графа. Появляются только при некорректных данных от адаптера.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge {edge} references site {position} that is not among the input sites")]
    UnknownSite { edge: usize, position: DVec2 },
    #[error("delaunay triangulation failed: {0}")]
    Triangulation(String),
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("failed to export map: {0}")]
    Export(#[from] serde_json::Error),
    #[error("failed to write map to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
