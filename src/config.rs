// src/config.rs
//! Конфигурация генерации острова
//!
//! Этот модуль определяет все параметры, управляющие генерацией карты:
//! - Сиды основного потока и потока рек
//! - Размер карты, число полигонов и сглаживание сайтов
//! - Форму острова и кривую высот
//! - Порог озёр и параметры рек
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::elevation::ElevationCurve;
use crate::error::ConfigError;
use crate::geometry::Bounds;
use crate::rivers::RiverSettings;
use crate::shape::IslandShape;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Основные параметры генерации острова
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapGenerationParams {
    /// Сид генератора случайных чисел (точки, порядок обхода высот, форма острова)
    #[serde(default)]
    pub seed: u64,

    /// Отдельный сид для выбора истоков рек
    #[serde(default)]
    pub river_seed: u64,

    /// Ширина карты (по умолчанию 100)
    #[serde(default = "default_size")]
    pub width: f64,

    /// Высота карты (по умолчанию 100)
    #[serde(default = "default_size")]
    pub height: f64,

    /// Количество полигонов (сайтов Вороного)
    #[serde(default = "default_polygon_count")]
    pub polygon_count: usize,

    /// Число проходов сглаживания сайтов (0 = без сглаживания)
    #[serde(default)]
    pub relaxation: usize,

    /// Доля водных углов, при которой ячейка становится водой (0.0..=1.0)
    #[serde(default = "default_lake_threshold")]
    pub lake_threshold: f32,

    /// Диапазон нормализованной высоты истоков рек
    #[serde(default = "default_spring_elevation")]
    pub spring_elevation: [f32; 2],

    /// Сколько рек проложить
    #[serde(default = "default_river_count")]
    pub river_count: usize,

    /// Форма острова (по умолчанию шумовая маска)
    #[serde(default)]
    pub shape: IslandShape,

    /// Кривая высот (по умолчанию линейная)
    #[serde(default)]
    pub elevation_curve: ElevationCurve,
}

fn default_size() -> f64 {
    100.0
}
fn default_polygon_count() -> usize {
    200
}
fn default_lake_threshold() -> f32 {
    0.3
}
fn default_spring_elevation() -> [f32; 2] {
    [0.3, 0.9]
}
fn default_river_count() -> usize {
    30
}

impl Default for MapGenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            river_seed: 0,
            width: 100.0,
            height: 100.0,
            polygon_count: 200,
            relaxation: 0,
            lake_threshold: 0.3,
            spring_elevation: [0.3, 0.9],
            river_count: 30,
            shape: IslandShape::default(),
            elevation_curve: ElevationCurve::Linear,
        }
    }
}

impl MapGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # island.toml
    /// seed = 42
    /// polygon_count = 500
    /// relaxation = 2
    ///
    /// [shape]
    /// kind = "circle"
    /// size = 0.8
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Разбирает параметры из строки TOML
    ///
    /// ```
    /// use island_mapgen::MapGenerationParams;
    ///
    /// let params = MapGenerationParams::from_toml_str("seed = 7\nriver_count = 5\n").unwrap();
    /// assert_eq!(params.seed, 7);
    /// assert_eq!(params.river_count, 5);
    /// assert_eq!(params.lake_threshold, 0.3);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Проверяет параметры до запуска генерации
    ///
    /// ```
    /// use island_mapgen::MapGenerationParams;
    ///
    /// let mut params = MapGenerationParams::default();
    /// assert!(params.validate().is_ok());
    ///
    /// params.lake_threshold = 1.5;
    /// assert!(params.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.lake_threshold) {
            return Err(ConfigError::LakeThreshold(self.lake_threshold));
        }

        let [low, high] = self.spring_elevation;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return Err(ConfigError::SpringBand(low, high));
        }

        let size_ok = |v: f64| v.is_finite() && v > 0.0;
        if !size_ok(self.width) || !size_ok(self.height) {
            return Err(ConfigError::MapSize {
                width: self.width,
                height: self.height,
            });
        }

        if self.polygon_count == 0 {
            return Err(ConfigError::NoPolygons);
        }

        Ok(())
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    #[must_use]
    pub fn river_settings(&self) -> RiverSettings {
        RiverSettings {
            count: self.river_count,
            spring_elevation: self.spring_elevation,
        }
    }
}
