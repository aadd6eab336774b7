//! Конвейер генерации
//!
//! Точки → диаграмма → граф → вода → высоты → реки → острова.
//! Каждый этап целиком меняет общий граф и нужен следующему, поэтому
//! конвейер строго последовательный. Карта отдаётся наружу только готовой.

use crate::config::MapGenerationParams;
use crate::elevation::{ElevationSummary, assign_elevations};
use crate::error::MapError;
use crate::geometry::{DelaunayAdapter, GeometryAdapter, VoronoiInput, random_points};
use crate::graph::Graph;
use crate::islands::assign_island_ids;
use crate::rivers::{RiverSummary, trace_rivers};
use crate::water::{WaterSummary, assign_ocean_coast_and_land, assign_water};
use glam::DVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Сводка по готовой карте
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStats {
    pub cells: usize,
    pub corners: usize,
    pub edges: usize,
    pub water: WaterSummary,
    pub elevation: ElevationSummary,
    pub rivers: RiverSummary,
    pub islands: usize,
}

/// Готовая карта: граф, параметры и сводка
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IslandMap {
    pub params: MapGenerationParams,
    pub stats: MapStats,
    pub graph: Graph,
}

impl IslandMap {
    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Сохраняет карту в JSON. Недостижимые высоты записываются как `null`.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MapGenerator {
    params: MapGenerationParams,
}

impl MapGenerator {
    /// Создаёт генератор; параметры проверяются сразу.
    pub fn new(params: MapGenerationParams) -> Result<Self, MapError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &MapGenerationParams {
        &self.params
    }

    /// Генерирует карту со случайными точками и адаптером по умолчанию
    pub fn generate(&self) -> Result<IslandMap, MapError> {
        self.generate_with_adapter(&DelaunayAdapter)
    }

    /// То же, что [`MapGenerator::generate`], но вызывает `on_generated` ровно один раз,
    /// когда карта полностью готова
    pub fn generate_then<F>(&self, on_generated: F) -> Result<IslandMap, MapError>
    where
        F: FnOnce(&IslandMap),
    {
        let map = self.generate()?;
        on_generated(&map);
        Ok(map)
    }

    /// Случайные точки, но своя геометрия
    pub fn generate_with_adapter<A: GeometryAdapter>(
        &self,
        adapter: &A,
    ) -> Result<IslandMap, MapError> {
        let params = &self.params;
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);

        let points = random_points(params.polygon_count, params.bounds(), &mut rng);
        self.build_and_run(&points, adapter, &mut rng)
    }

    /// Генерирует карту по заданным сайтам. `polygon_count` при этом не используется,
    /// сглаживание (`relaxation`) применяется как обычно.
    pub fn generate_with<A: GeometryAdapter>(
        &self,
        points: &[DVec2],
        adapter: &A,
    ) -> Result<IslandMap, MapError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        self.build_and_run(points, adapter, &mut rng)
    }

    /// Генерирует карту по готовой диаграмме (например, собранной вручную)
    pub fn generate_from_diagram(&self, diagram: &VoronoiInput) -> Result<IslandMap, MapError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);
        self.run(diagram, &mut rng)
    }

    fn build_and_run<A: GeometryAdapter>(
        &self,
        points: &[DVec2],
        adapter: &A,
        rng: &mut ChaCha8Rng,
    ) -> Result<IslandMap, MapError> {
        let params = &self.params;
        let diagram = adapter.build(points, params.bounds(), params.relaxation)?;
        self.run(&diagram, rng)
    }

    fn run(&self, diagram: &VoronoiInput, rng: &mut ChaCha8Rng) -> Result<IslandMap, MapError> {
        let params = &self.params;

        let mut graph = Graph::build(diagram, params.bounds())?;
        tracing::info!(
            cells = graph.cells().len(),
            corners = graph.corners().len(),
            edges = graph.edges().len(),
            "Граф построен"
        );

        assign_water(&mut graph, &params.shape, params.seed);
        let water = assign_ocean_coast_and_land(&mut graph, params.lake_threshold);
        let elevation = assign_elevations(&mut graph, params.elevation_curve, rng);
        let rivers = trace_rivers(&mut graph, &params.river_settings(), params.river_seed);
        let islands = assign_island_ids(&mut graph);

        let stats = MapStats {
            cells: graph.cells().len(),
            corners: graph.corners().len(),
            edges: graph.edges().len(),
            water,
            elevation,
            rivers,
            islands,
        };

        Ok(IslandMap {
            params: params.clone(),
            stats,
            graph,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::IslandShape;

    #[test]
    fn invalid_params_fail_fast() {
        let params = MapGenerationParams {
            lake_threshold: 2.0,
            ..MapGenerationParams::default()
        };
        assert!(matches!(MapGenerator::new(params), Err(MapError::Config(_))));
    }

    #[test]
    fn callback_fires_once_with_finished_map() {
        let params = MapGenerationParams {
            polygon_count: 60,
            shape: IslandShape::Circle { size: 0.8 },
            ..MapGenerationParams::default()
        };
        let generator = MapGenerator::new(params).unwrap();

        let mut calls = 0;
        let mut seen_rivers = None;
        let map = generator
            .generate_then(|map| {
                calls += 1;
                seen_rivers = Some(map.stats.rivers.springs.len());
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(seen_rivers, Some(map.stats.rivers.springs.len()));
        assert_eq!(map.stats.cells, map.graph.cells().len());
    }

    #[test]
    fn caller_points_go_through_the_adapter() {
        let params = MapGenerationParams {
            width: 20.0,
            height: 20.0,
            shape: IslandShape::Circle { size: 0.9 },
            ..MapGenerationParams::default()
        };
        let generator = MapGenerator::new(params.clone()).unwrap();

        let points: Vec<DVec2> = (0..36)
            .map(|i| DVec2::new(f64::from(i % 6) * 3.0 + 2.0, f64::from(i / 6) * 3.0 + 1.5))
            .collect();
        let map = generator.generate_with(&points, &DelaunayAdapter).unwrap();

        assert_eq!(map.stats.cells, 36);
        assert!(map.graph.cells().iter().all(|c| points.contains(&c.point.position)));

        let diagram = DelaunayAdapter.build(&points, params.bounds(), 0).unwrap();
        let from_diagram = generator.generate_from_diagram(&diagram).unwrap();
        assert_eq!(map, from_diagram);
    }

    #[test]
    fn json_export_writes_null_for_unreached_elevation() {
        let params = MapGenerationParams {
            polygon_count: 30,
            ..MapGenerationParams::default()
        };
        let generator = MapGenerator::new(params).unwrap();
        let mut map = generator.generate().unwrap();
        map.graph.corners[0].point.elevation = f32::INFINITY;

        let json: serde_json::Value = serde_json::from_str(&map.to_json().unwrap()).unwrap();
        assert!(json["graph"]["corners"][0]["elevation"].is_null());
        assert_eq!(json["stats"]["cells"], serde_json::json!(map.stats.cells));
        assert!(json["graph"]["edges"][0]["water_volume"].is_u64());
    }
}
