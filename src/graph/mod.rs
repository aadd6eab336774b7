//! Граф карты: ячейки Вороного, их углы и общие рёбра
//!
//! Все сущности лежат в плоских векторах графа, связи хранятся индексами.
//! Граф строится заново при каждой генерации ([`Graph::build`]).

pub mod builder;

use crate::geometry::Bounds;
use glam::DVec2;
use serde::Serialize;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Индекс ячейки (сайта Вороного)
    CellId
);
define_id!(
    /// Индекс угла (вершины Вороного)
    CornerId
);
define_id!(
    /// Индекс ребра
    EdgeId
);

/// Общие атрибуты ячеек и углов
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub index: usize,
    pub position: DVec2,
    pub is_border: bool,
    pub is_water: bool,
    pub is_ocean: bool,
    pub is_coast: bool,
    /// Нормализованная высота: суша в [0, 1], океан в (-1, 0].
    /// `f32::INFINITY` — угол не достигнут от побережья.
    pub elevation: f32,
    pub moisture: f32,
    pub island_id: Option<usize>,
}

impl MapPoint {
    fn new(index: usize, position: DVec2) -> Self {
        Self {
            index,
            position,
            is_border: false,
            is_water: false,
            is_ocean: false,
            is_coast: false,
            elevation: 0.0,
            moisture: 0.0,
            island_id: None,
        }
    }

    /// Вода, не связанная с океаном
    #[must_use]
    pub fn is_lake(&self) -> bool {
        self.is_water && !self.is_ocean
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        !self.is_water
    }
}

/// Ячейка (сайт Вороного, вершина Делоне)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    #[serde(flatten)]
    pub point: MapPoint,
    /// Ячейки с общим ребром
    pub neighbors: Vec<CellId>,
    pub edges: Vec<EdgeId>,
    /// Углы многоугольника ячейки
    pub corners: Vec<CornerId>,
}

/// Угол (вершина Вороного, треугольник Делоне)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Corner {
    #[serde(flatten)]
    pub point: MapPoint,
    pub neighbors: Vec<CornerId>,
    pub edges: Vec<EdgeId>,
    /// Ячейки, которых касается угол
    pub touches: Vec<CellId>,
    /// Соседний угол, в который стекает вода; `None` у побережья и стоков
    pub downslope: Option<CornerId>,
    pub downslope_edge: Option<EdgeId>,
}

/// Ребро Делоне `d0–d1` и двойственное ему ребро Вороного `v0–v1`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub index: usize,
    pub d0: CellId,
    pub d1: CellId,
    pub v0: CornerId,
    pub v1: CornerId,
    /// Сколько рек прошло по ребру
    pub water_volume: u32,
}

impl Edge {
    /// Второй конец ребра Вороного. `None`, если `corner` не принадлежит ребру.
    #[must_use]
    pub fn other_corner(&self, corner: CornerId) -> Option<CornerId> {
        if corner == self.v0 {
            Some(self.v1)
        } else if corner == self.v1 {
            Some(self.v0)
        } else {
            None
        }
    }

    #[must_use]
    pub fn cells(&self) -> [CellId; 2] {
        [self.d0, self.d1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub(crate) bounds: Bounds,
    pub(crate) cells: Vec<Cell>,
    pub(crate) corners: Vec<Corner>,
    pub(crate) edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    #[must_use]
    pub fn corner(&self, id: CornerId) -> &Corner {
        &self.corners[id.0]
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Ребро касается озёрной ячейки
    pub(crate) fn edge_touches_lake(&self, id: EdgeId) -> bool {
        self.edges[id.0]
            .cells()
            .iter()
            .any(|&c| self.cells[c.0].point.is_lake())
    }

    /// Проверяет взаимность всех связей, которые задаёт каждое ребро.
    ///
    /// Возвращает описание первой найденной несогласованности.
    pub fn check_symmetry(&self) -> Result<(), String> {
        for edge in &self.edges {
            let (d0, d1) = (self.cell(edge.d0), self.cell(edge.d1));
            let (v0, v1) = (self.corner(edge.v0), self.corner(edge.v1));
            let index = edge.index;

            if !d0.neighbors.contains(&edge.d1) || !d1.neighbors.contains(&edge.d0) {
                return Err(format!(
                    "edge {index}: cells {} and {} are not mutual neighbors",
                    edge.d0, edge.d1
                ));
            }
            if !v0.neighbors.contains(&edge.v1) || !v1.neighbors.contains(&edge.v0) {
                return Err(format!(
                    "edge {index}: corners {} and {} are not mutual neighbors",
                    edge.v0, edge.v1
                ));
            }
            for cell in [d0, d1] {
                if !cell.corners.contains(&edge.v0) || !cell.corners.contains(&edge.v1) {
                    return Err(format!(
                        "edge {index}: cell {} misses one of its corners",
                        cell.point.index
                    ));
                }
            }
            for corner in [v0, v1] {
                if !corner.touches.contains(&edge.d0) || !corner.touches.contains(&edge.d1) {
                    return Err(format!(
                        "edge {index}: corner {} misses one of its cells",
                        corner.point.index
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Тестовые графы, собранные вручную без триангуляции
#[cfg(test)]
pub(crate) mod fixtures {
    use super::{CellId, CornerId, Graph};
    use crate::geometry::{Bounds, VoronoiEdgeInput, VoronoiInput};
    use glam::DVec2;

    /// Квадратная решётка `n × n` ячеек со стороной `side`.
    ///
    /// Ячейка `(i, j)` имеет индекс `j * n + i`, угол `(a, b)` лежит в точке `(a * side, b * side)`.
    pub fn grid(n: usize, side: f64) -> Graph {
        let extent = n as f64 * side;
        let site = |i: usize, j: usize| DVec2::new((i as f64 + 0.5) * side, (j as f64 + 0.5) * side);
        let vertex = |a: usize, b: usize| DVec2::new(a as f64 * side, b as f64 * side);

        let mut input = VoronoiInput::default();
        for j in 0..n {
            for i in 0..n {
                input.sites.push(site(i, j));
            }
        }
        for j in 0..n {
            for i in 0..n {
                if i + 1 < n {
                    input.edges.push(VoronoiEdgeInput {
                        left_site: site(i, j),
                        right_site: site(i + 1, j),
                        clipped_ends: Some([vertex(i + 1, j), vertex(i + 1, j + 1)]),
                    });
                }
                if j + 1 < n {
                    input.edges.push(VoronoiEdgeInput {
                        left_site: site(i, j),
                        right_site: site(i, j + 1),
                        clipped_ends: Some([vertex(i, j + 1), vertex(i + 1, j + 1)]),
                    });
                }
            }
        }

        Graph::build(&input, Bounds::new(extent, extent)).expect("grid input is consistent")
    }

    pub fn cell_at(n: usize, i: usize, j: usize) -> CellId {
        CellId(j * n + i)
    }

    pub fn corner_at(graph: &Graph, side: f64, a: usize, b: usize) -> CornerId {
        let target = DVec2::new(a as f64 * side, b as f64 * side);
        graph
            .corners()
            .iter()
            .position(|c| c.point.position == target)
            .map(CornerId)
            .expect("corner exists in grid")
    }

    /// Помечает углы водой: остальные считаются сушей
    pub fn flood_corners(graph: &mut Graph, side: f64, water: &[(usize, usize)]) {
        for corner in &mut graph.corners {
            corner.point.is_water = false;
        }
        for &(a, b) in water {
            let id = corner_at(graph, side, a, b);
            graph.corners[id.0].point.is_water = true;
        }
    }
}
