//! Реки: истоки на склонах и сток вниз до побережья

use crate::graph::{CornerId, Graph};
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Параметры рек
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiverSettings {
    /// Сколько истоков выбрать
    pub count: usize,
    /// Диапазон нормализованной высоты, в котором ищутся истоки
    pub spring_elevation: [f32; 2],
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            count: 30,
            spring_elevation: [0.3, 0.9],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiverSummary {
    /// Сколько углов подходило на роль истока
    pub candidates: usize,
    /// Выбранные истоки по возрастанию индекса
    pub springs: Vec<CornerId>,
    /// Длина самой длинной реки в рёбрах
    pub longest: usize,
}

/// Прокладывает реки от случайных истоков вниз по `downslope` до побережья.
///
/// Каждый проход по ребру добавляет 1 к `water_volume`, поэтому после слияния
/// рек объём ниже по течению складывается сам собой.
/// Истоки выбираются отдельным генератором с сидом `river_seed`.
pub fn trace_rivers(graph: &mut Graph, settings: &RiverSettings, river_seed: u64) -> RiverSummary {
    let [low, high] = settings.spring_elevation;

    let candidates: Vec<CornerId> = graph
        .corners
        .iter()
        .filter(|c| !c.point.is_water && (low..=high).contains(&c.point.elevation))
        .map(|c| CornerId(c.point.index))
        .collect();

    if candidates.is_empty() {
        if settings.count > 0 {
            tracing::warn!("Нет подходящих истоков: реки не прокладываются");
        }
        return RiverSummary::default();
    }

    let amount = if settings.count > candidates.len() {
        tracing::warn!(
            requested = settings.count,
            available = candidates.len(),
            "Истоков меньше, чем запрошено рек"
        );
        candidates.len()
    } else {
        settings.count
    };

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(river_seed);
    let mut picked = rand::seq::index::sample(&mut rng, candidates.len(), amount).into_vec();
    picked.sort_unstable();
    let springs: Vec<CornerId> = picked.into_iter().map(|i| candidates[i]).collect();

    // Цепочка стока ациклична, предел — страховка от испорченного графа
    let step_limit = graph.corners.len();
    let mut longest = 0;

    for &spring in &springs {
        let mut current = spring;
        let mut length = 0;

        while let Some(next) = graph.corners[current.0].downslope {
            if length >= step_limit {
                tracing::warn!(spring = spring.0, "Река зациклилась, трассировка прервана");
                break;
            }
            if let Some(edge) = graph.corners[current.0].downslope_edge {
                graph.edges[edge.0].water_volume += 1;
            }
            current = next;
            length += 1;
        }

        longest = longest.max(length);
    }

    tracing::info!(
        rivers = springs.len(),
        candidates = candidates.len(),
        longest,
        "Реки проложены"
    );

    RiverSummary {
        candidates: candidates.len(),
        springs,
        longest,
    }
}
