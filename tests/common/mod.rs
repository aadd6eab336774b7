use glam::DVec2;
use island_mapgen::{
    Graph, IslandMap, IslandShape, MapGenerationParams, MapGenerator, VoronoiEdgeInput,
    VoronoiInput,
};

/// Квадратная решётка `n × n` ячеек со стороной `side`, сдвинутая на `offset` от начала координат
pub fn grid_diagram(n: usize, side: f64, offset: f64) -> VoronoiInput {
    let site = |i: usize, j: usize| {
        DVec2::new(
            offset + (i as f64 + 0.5) * side,
            offset + (j as f64 + 0.5) * side,
        )
    };
    let vertex = |a: usize, b: usize| DVec2::new(offset + a as f64 * side, offset + b as f64 * side);

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
    input
}

pub fn island_params(seed: u64) -> MapGenerationParams {
    MapGenerationParams {
        seed,
        river_seed: seed.wrapping_mul(31),
        polygon_count: 300,
        shape: IslandShape::Circle { size: 0.8 },
        ..MapGenerationParams::default()
    }
}

pub fn generate(params: MapGenerationParams) -> IslandMap {
    MapGenerator::new(params)
        .expect("params are valid")
        .generate()
        .expect("generation succeeds")
}

/// Проходит цепочку стока от угла, возвращает число шагов или `None` при зацикливании
pub fn downslope_length(graph: &Graph, start: usize) -> Option<usize> {
    let mut current = island_mapgen::CornerId(start);
    for steps in 0..=graph.corners().len() {
        match graph.corner(current).downslope {
            Some(next) => current = next,
            None => return Some(steps),
        }
    }
    None
}
