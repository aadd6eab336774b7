//! Классификация воды: суша, океан, озёра и побережье

use crate::graph::{CellId, Graph};
use crate::shape::IslandShape;
use serde::Serialize;
use std::collections::VecDeque;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Итоги классификации для логов и экспорта
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WaterSummary {
    pub ocean_cells: usize,
    pub lake_cells: usize,
    pub land_cells: usize,
    pub coast_cells: usize,
    pub ocean_corners: usize,
    pub coast_corners: usize,
    pub water_corners: usize,
}

/// Шаг A: вода там, где угол вне формы острова.
///
/// Углы независимы друг от друга, поэтому с фичей `parallel` проверка идёт через rayon.
pub fn assign_water(graph: &mut Graph, shape: &IslandShape, seed: u64) {
    let sampler = shape.sampler(graph.bounds.size(), seed);

    #[cfg(feature = "parallel")]
    graph.corners.par_iter_mut().for_each(|corner| {
        corner.point.is_water = !sampler.is_inside(corner.point.position);
    });

    #[cfg(not(feature = "parallel"))]
    for corner in &mut graph.corners {
        corner.point.is_water = !sampler.is_inside(corner.point.position);
    }
}

/// Шаг B: океан заливается от границ карты, остальная вода — озёра.
///
/// # Аргументы
/// * `lake_threshold` — доля водных углов, начиная с которой ячейка считается водой
pub fn assign_ocean_coast_and_land(graph: &mut Graph, lake_threshold: f32) -> WaterSummary {
    let Graph { cells, corners, .. } = graph;

    // Очередь для BFS
    let mut queue: VecDeque<CellId> = VecDeque::new();

    for (index, cell) in cells.iter_mut().enumerate() {
        let mut num_water = 0usize;

        for &corner_id in &cell.corners {
            let corner = &mut corners[corner_id.0];

            // Ячейка у края карты — океан, а её граничный угол — вода
            if corner.point.is_border {
                corner.point.is_water = true;
                if !cell.point.is_ocean {
                    cell.point.is_border = true;
                    cell.point.is_ocean = true;
                    queue.push_back(CellId(index));
                }
            }

            if corner.point.is_water {
                num_water += 1;
            }
        }

        // Ячейка без углов проходит порог (0 >= 0) и становится водой
        let over_threshold = num_water as f32 >= cell.corners.len() as f32 * lake_threshold;
        cell.point.is_water = cell.point.is_ocean || over_threshold;
    }

    // BFS от краёв: вода, связанная с океаном, тоже океан
    while let Some(id) = queue.pop_front() {
        for k in 0..cells[id.0].neighbors.len() {
            let neighbor = cells[id.0].neighbors[k];
            let point = &mut cells[neighbor.0].point;

            if point.is_water && !point.is_ocean {
                point.is_ocean = true;
                queue.push_back(neighbor);
            }
        }
    }

    // Побережье: есть и океан, и суша среди соседей
    let coast: Vec<bool> = cells
        .iter()
        .map(|cell| {
            let ocean = cell.neighbors.iter().any(|n| cells[n.0].point.is_ocean);
            let land = cell.neighbors.iter().any(|n| cells[n.0].point.is_land());
            ocean && land
        })
        .collect();
    for (cell, is_coast) in cells.iter_mut().zip(coast) {
        cell.point.is_coast = is_coast;
    }

    // Углы наследуют тип от ячеек, которых касаются
    for corner in corners.iter_mut() {
        let touching = corner.touches.len();
        let num_ocean = corner
            .touches
            .iter()
            .filter(|c| cells[c.0].point.is_ocean)
            .count();
        let num_land = corner
            .touches
            .iter()
            .filter(|c| cells[c.0].point.is_land())
            .count();

        corner.point.is_ocean = num_ocean == touching;
        corner.point.is_coast = num_ocean > 0 && num_land > 0;
        corner.point.is_water =
            corner.point.is_border || (num_land != touching && !corner.point.is_coast);
    }

    let summary = summarize(graph);
    tracing::info!(
        ocean = summary.ocean_cells,
        lakes = summary.lake_cells,
        land = summary.land_cells,
        coast_corners = summary.coast_corners,
        "Классификация воды завершена"
    );
    summary
}

fn summarize(graph: &Graph) -> WaterSummary {
    let mut summary = WaterSummary::default();
    for cell in &graph.cells {
        let p = &cell.point;
        if p.is_ocean {
            summary.ocean_cells += 1;
        } else if p.is_water {
            summary.lake_cells += 1;
        } else {
            summary.land_cells += 1;
        }
        if p.is_coast {
            summary.coast_cells += 1;
        }
    }
    for corner in &graph.corners {
        let p = &corner.point;
        summary.ocean_corners += usize::from(p.is_ocean);
        summary.coast_corners += usize::from(p.is_coast);
        summary.water_corners += usize::from(p.is_water);
    }
    summary
}
