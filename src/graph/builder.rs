use super::{Cell, CellId, Corner, CornerId, Edge, EdgeId, Graph, MapPoint};
use crate::error::GraphError;
use crate::geometry::{Bounds, PositionKey, VoronoiEdgeInput, VoronoiInput};
use glam::DVec2;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

impl Graph {
    /// Собирает граф из данных геометрического адаптера.
    ///
    /// - каждая уникальная позиция сайта становится ячейкой (в порядке появления)
    /// - каждая уникальная позиция конца ребра становится углом
    /// - рёбра без обрезанных концов (или с совпадающими концами) отбрасываются
    ///
    /// # Ошибки
    /// [`GraphError`], если ребро ссылается на сайт, которого нет среди `input.sites`.
    pub fn build(input: &VoronoiInput, bounds: Bounds) -> Result<Self, GraphError> {
        let mut graph = Graph {
            bounds,
            cells: Vec::with_capacity(input.sites.len()),
            corners: Vec::new(),
            edges: Vec::with_capacity(input.edges.len()),
        };

        // Ячейки
        let mut cell_lookup: HashMap<PositionKey, CellId> = HashMap::new();
        for &site in &input.sites {
            if let Entry::Vacant(slot) = cell_lookup.entry(PositionKey::new(site)) {
                let id = CellId(graph.cells.len());
                slot.insert(id);
                graph.cells.push(Cell {
                    point: MapPoint::new(id.0, site),
                    neighbors: Vec::new(),
                    edges: Vec::new(),
                    corners: Vec::new(),
                });
            }
        }

        // Рёбра, углы и все связи между ячейками и углами.
        // Углы нумеруются в порядке первого появления среди пригодных рёбер.
        let mut corner_lookup: HashMap<PositionKey, CornerId> = HashMap::new();
        for (input_index, raw) in input.edges.iter().enumerate() {
            let Some([a, b]) = usable_ends(raw) else {
                continue;
            };

            let resolve_cell = |position: DVec2| {
                cell_lookup
                    .get(&PositionKey::new(position))
                    .copied()
                    .ok_or(GraphError::UnknownSite {
                        edge: input_index,
                        position,
                    })
            };

            let d0 = resolve_cell(raw.left_site)?;
            let d1 = resolve_cell(raw.right_site)?;
            let v0 = graph.register_corner(&mut corner_lookup, a);
            let v1 = graph.register_corner(&mut corner_lookup, b);

            graph.link(d0, d1, v0, v1);
        }

        Ok(graph)
    }

    fn register_corner(
        &mut self,
        lookup: &mut HashMap<PositionKey, CornerId>,
        position: DVec2,
    ) -> CornerId {
        match lookup.entry(PositionKey::new(position)) {
            Entry::Occupied(slot) => *slot.get(),
            Entry::Vacant(slot) => {
                let id = CornerId(self.corners.len());
                slot.insert(id);

                let mut point = MapPoint::new(id.0, position);
                point.is_border = self.bounds.on_border(position);
                self.corners.push(Corner {
                    point,
                    neighbors: Vec::new(),
                    edges: Vec::new(),
                    touches: Vec::new(),
                    downslope: None,
                    downslope_edge: None,
                });
                id
            }
        }
    }

    fn link(&mut self, d0: CellId, d1: CellId, v0: CornerId, v1: CornerId) {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            index: id.0,
            d0,
            d1,
            v0,
            v1,
            water_volume: 0,
        });

        for cell in [d0, d1] {
            push_unique(&mut self.cells[cell.0].edges, id);
        }
        for corner in [v0, v1] {
            push_unique(&mut self.corners[corner.0].edges, id);
        }

        push_unique(&mut self.cells[d0.0].neighbors, d1);
        push_unique(&mut self.cells[d1.0].neighbors, d0);

        push_unique(&mut self.corners[v0.0].neighbors, v1);
        push_unique(&mut self.corners[v1.0].neighbors, v0);

        for cell in [d0, d1] {
            for corner in [v0, v1] {
                push_unique(&mut self.cells[cell.0].corners, corner);
                push_unique(&mut self.corners[corner.0].touches, cell);
            }
        }
    }
}

fn usable_ends(edge: &VoronoiEdgeInput) -> Option<[DVec2; 2]> {
    edge.clipped_ends
        .filter(|[a, b]| PositionKey::new(*a) != PositionKey::new(*b))
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if !list.contains(&item) {
        list.push(item);
    }
}
