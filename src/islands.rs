//! Разметка островов и граф смежности ячеек

use crate::graph::{CellId, EdgeId, Graph};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

/// Размечает острова: связные по рёбрам группы ячеек суши.
///
/// Номера плотные и идут в порядке наименьшего индекса ячейки острова.
/// Угол суши получает наименьший номер среди касающихся его ячеек суши,
/// вода остаётся без номера. Возвращает число островов.
pub fn assign_island_ids(graph: &mut Graph) -> usize {
    let mut sets = UnionFind::<usize>::new(graph.cells.len());
    for edge in &graph.edges {
        if graph.cells[edge.d0.0].point.is_land() && graph.cells[edge.d1.0].point.is_land() {
            sets.union(edge.d0.0, edge.d1.0);
        }
    }

    let mut labels: HashMap<usize, usize> = HashMap::new();
    for (index, cell) in graph.cells.iter_mut().enumerate() {
        cell.point.island_id = if cell.point.is_land() {
            let next = labels.len();
            Some(*labels.entry(sets.find(index)).or_insert(next))
        } else {
            None
        };
    }

    let Graph { cells, corners, .. } = graph;
    for corner in corners.iter_mut() {
        corner.point.island_id = if corner.point.is_land() {
            corner
                .touches
                .iter()
                .filter_map(|c| cells[c.0].point.island_id)
                .min()
        } else {
            None
        };
    }

    tracing::debug!(islands = labels.len(), "Острова размечены");
    labels.len()
}

/// Граф смежности ячеек: узел `i` соответствует ячейке `i`, вес ребра — его индекс
#[must_use]
pub fn cell_adjacency(graph: &Graph) -> UnGraph<CellId, EdgeId> {
    let mut adjacency = UnGraph::with_capacity(graph.cells.len(), graph.edges.len());
    for index in 0..graph.cells.len() {
        adjacency.add_node(CellId(index));
    }
    for edge in &graph.edges {
        adjacency.add_edge(
            NodeIndex::new(edge.d0.0),
            NodeIndex::new(edge.d1.0),
            EdgeId(edge.index),
        );
    }
    adjacency
}
