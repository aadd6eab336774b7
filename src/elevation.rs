//! Высоты углов и ячеек
//!
//! Высота растёт с удалением от побережья. Обход графа одновременно
//! записывает для каждого угла направление стока (`downslope`), поэтому из
//! любой точки суши существует невозрастающий путь к берегу.

use crate::graph::{CornerId, Graph};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Потолок высоты океанских ячеек: океан всегда чуть ниже береговой линии
pub const OCEAN_CEILING: f32 = -0.01;

/// Монотонное отображение [0, 1] → [0, 1], применяемое к нормализованной высоте
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElevationCurve {
    #[default]
    Linear,
    /// `t^exponent`:
    /// - `<1.0` → больше возвышенностей,
    /// - `>1.0` → больше низин.
    Power { exponent: f32 },
    /// Сглаженная ступень `3t² - 2t³`
    SmoothStep,
}

impl ElevationCurve {
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            ElevationCurve::Linear => t,
            ElevationCurve::Power { exponent } => t.powf(exponent.max(0.0)),
            ElevationCurve::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Итоги расчёта высот
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSummary {
    /// Наибольшая высота суши до нормализации (не меньше 1.0)
    pub max_elevation: f32,
    /// Наибольшая глубина океана до нормализации (не меньше 1.0)
    pub min_elevation: f32,
    pub coastal_corners: usize,
    /// Углы, до которых обход не дошёл: их высота остаётся `f32::INFINITY`
    pub unreached_corners: usize,
}

/// Рассчитывает высоты углов от побережья, затем высоты ячеек.
///
/// `rng` задаёт случайный порядок обхода рёбер каждого угла, без него
/// распространение шло бы с перекосом в одну сторону.
pub fn assign_elevations<R: Rng>(
    graph: &mut Graph,
    curve: ElevationCurve,
    rng: &mut R,
) -> ElevationSummary {
    let mut queue: VecDeque<CornerId> = VecDeque::new();

    // Побережье — высота 0, остальное — бесконечность
    for (index, corner) in graph.corners.iter_mut().enumerate() {
        corner.downslope = None;
        corner.downslope_edge = None;
        if corner.point.is_coast {
            corner.point.elevation = 0.0;
            queue.push_back(CornerId(index));
        } else {
            corner.point.elevation = f32::INFINITY;
        }
    }

    let coastal_corners = queue.len();
    if coastal_corners == 0 {
        tracing::warn!("Нет прибрежных углов: высоты не рассчитываются");
    }

    let mut max_elevation = 1.0f32;
    let mut min_elevation = 1.0f32;

    while let Some(current) = queue.pop_front() {
        let elevation = graph.corners[current.0].point.elevation;
        let count = graph.corners[current.0].edges.len();
        if count == 0 {
            continue;
        }

        let offset = rng.gen_range(0..count);
        for step in 0..count {
            let edge_id = graph.corners[current.0].edges[(step + offset) % count];
            let Some(neighbor) = graph.edges[edge_id.0].other_corner(current) else {
                continue;
            };

            // Вдоль озера высота не растёт: всё озеро получает один уровень
            let lake = graph.edge_touches_lake(edge_id);
            let candidate = elevation + if lake { 0.0 } else { 1.0 };

            let target = &mut graph.corners[neighbor.0];
            if candidate < target.point.elevation {
                target.point.elevation = candidate;
                target.downslope = Some(current);
                target.downslope_edge = Some(edge_id);

                if target.point.is_ocean {
                    min_elevation = min_elevation.max(candidate);
                } else {
                    max_elevation = max_elevation.max(candidate);
                }

                if lake {
                    queue.push_front(neighbor);
                } else {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    // Нормализация: суша в [0, 1], океан в (-1, 0]
    let mut unreached_corners = 0;
    for corner in &mut graph.corners {
        let elevation = corner.point.elevation;
        if !elevation.is_finite() {
            unreached_corners += 1;
            continue;
        }
        corner.point.elevation = if corner.point.is_ocean {
            -curve.evaluate(elevation / min_elevation)
        } else {
            curve.evaluate(elevation / max_elevation)
        };
    }

    // Высота ячейки — среднее её углов
    let Graph { cells, corners, .. } = graph;
    for cell in cells.iter_mut() {
        if cell.corners.is_empty() {
            continue;
        }
        let sum: f32 = cell
            .corners
            .iter()
            .map(|c| corners[c.0].point.elevation)
            .sum();
        let mut elevation = sum / cell.corners.len() as f32;
        if cell.point.is_ocean && elevation > OCEAN_CEILING {
            elevation = OCEAN_CEILING;
        }
        cell.point.elevation = elevation;
    }

    if unreached_corners > 0 {
        tracing::warn!(unreached_corners, "Часть углов не связана с побережьем");
    }
    tracing::info!(max_elevation, min_elevation, coastal_corners, "Высоты рассчитаны");

    ElevationSummary {
        max_elevation,
        min_elevation,
        coastal_corners,
        unreached_corners,
    }
}
