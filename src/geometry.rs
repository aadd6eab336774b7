//! Геометрический адаптер
//!
//! Строит диаграмму Вороного по набору точек и отдаёт её в «сыром» виде:
//! позиции сайтов и рёбра с обрезанными по границам карты концами.
//! Граф карты ([`crate::graph::Graph`]) собирается уже из этих данных.

use crate::error::GraphError;
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use spade::{DelaunayTriangulation, Point2, Triangulation};
use std::collections::{HashMap, HashSet};

/// Прямоугольник карты с углом в начале координат
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Лежит ли точка точно на границе прямоугольника (сравнение без допуска)
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn on_border(&self, p: DVec2) -> bool {
        p.x == 0.0 || p.x == self.width || p.y == 0.0 || p.y == self.height
    }
}

/// Ключ позиции для точного (побитового) сравнения координат.
///
/// `-0.0` и `0.0` дают один и тот же ключ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey(u64, u64);

impl PositionKey {
    #[must_use]
    pub fn new(p: DVec2) -> Self {
        Self(canonical_bits(p.x), canonical_bits(p.y))
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

/// Одно ребро Вороного вместе с парой сайтов, которые оно разделяет
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiEdgeInput {
    pub left_site: DVec2,
    pub right_site: DVec2,
    /// `None`, если ребро целиком вне прямоугольника карты
    pub clipped_ends: Option<[DVec2; 2]>,
}

/// Результат работы адаптера: входные данные для построения графа
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoronoiInput {
    pub sites: Vec<DVec2>,
    pub edges: Vec<VoronoiEdgeInput>,
}

pub trait GeometryAdapter {
    /// Строит диаграмму по точкам. `relaxation` — число проходов сглаживания сайтов.
    fn build(
        &self,
        points: &[DVec2],
        bounds: Bounds,
        relaxation: usize,
    ) -> Result<VoronoiInput, GraphError>;
}

/// Адаптер поверх триангуляции Делоне из `spade`
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayAdapter;

impl GeometryAdapter for DelaunayAdapter {
    fn build(
        &self,
        points: &[DVec2],
        bounds: Bounds,
        relaxation: usize,
    ) -> Result<VoronoiInput, GraphError> {
        let mut diagram = voronoi_from_points(points, bounds)?;

        for _ in 0..relaxation {
            let relaxed = relax_sites(&diagram);
            diagram = voronoi_from_points(&relaxed, bounds)?;
        }

        Ok(diagram)
    }
}

/// Равномерно разбрасывает точки по карте
pub fn random_points<R: Rng>(count: usize, bounds: Bounds, rng: &mut R) -> Vec<DVec2> {
    (0..count)
        .map(|_| {
            DVec2::new(
                rng.gen_range(0.0..bounds.width),
                rng.gen_range(0.0..bounds.height),
            )
        })
        .collect()
}

fn voronoi_from_points(points: &[DVec2], bounds: Bounds) -> Result<VoronoiInput, GraphError> {
    let vertices: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p.x, p.y)).collect();
    let triangulation: DelaunayTriangulation<Point2<f64>> =
        DelaunayTriangulation::bulk_load(vertices)
            .map_err(|e| GraphError::Triangulation(format!("{e:?}")))?;

    let sites = triangulation
        .vertices()
        .map(|v| to_dvec(v.position()))
        .collect();

    let mut edges = Vec::with_capacity(triangulation.num_undirected_edges());
    for edge in triangulation.undirected_edges() {
        let directed = edge.as_directed();
        let from = to_dvec(directed.from().position());
        let to = to_dvec(directed.to().position());

        // Грань слева от ребра и грань справа
        let left = directed.face().as_inner().map(|f| to_dvec(f.circumcenter()));
        let right = directed.rev().face().as_inner().map(|f| to_dvec(f.circumcenter()));

        let along = to - from;
        let clipped_ends = match (left, right) {
            (Some(a), Some(b)) => clip(a, b - a, 0.0, 1.0, bounds),
            // Рёбра оболочки: луч от центра описанной окружности наружу
            (None, Some(c)) => clip(c, DVec2::new(-along.y, along.x), 0.0, f64::INFINITY, bounds),
            (Some(c), None) => clip(c, DVec2::new(along.y, -along.x), 0.0, f64::INFINITY, bounds),
            (None, None) => None,
        };

        edges.push(VoronoiEdgeInput {
            left_site: from,
            right_site: to,
            clipped_ends,
        });
    }

    Ok(VoronoiInput { sites, edges })
}

fn to_dvec(p: Point2<f64>) -> DVec2 {
    DVec2::new(p.x, p.y)
}

/// Сдвигает каждый сайт в среднее его углов (упрощённый шаг Ллойда)
fn relax_sites(diagram: &VoronoiInput) -> Vec<DVec2> {
    let mut corners: HashMap<PositionKey, Vec<DVec2>> = HashMap::new();
    let mut seen: HashSet<(PositionKey, PositionKey)> = HashSet::new();

    for edge in &diagram.edges {
        let Some(ends) = edge.clipped_ends else {
            continue;
        };
        for site in [edge.left_site, edge.right_site] {
            let site_key = PositionKey::new(site);
            for end in ends {
                if seen.insert((site_key, PositionKey::new(end))) {
                    corners.entry(site_key).or_default().push(end);
                }
            }
        }
    }

    diagram
        .sites
        .iter()
        .map(|&site| match corners.get(&PositionKey::new(site)) {
            Some(points) if !points.is_empty() => {
                points.iter().copied().sum::<DVec2>() / points.len() as f64
            }
            _ => site,
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

/// Отсечение параметрического отрезка `origin + t * dir, t ∈ [t0, t1]` (Лианг–Барски).
///
/// Концы, попавшие на границу, выравниваются точно по ней.
fn clip(origin: DVec2, dir: DVec2, mut t0: f64, mut t1: f64, bounds: Bounds) -> Option<[DVec2; 2]> {
    let mut enter = None;
    let mut exit = None;

    let planes = [
        (-dir.x, origin.x, Side::Left),
        (dir.x, bounds.width - origin.x, Side::Right),
        (-dir.y, origin.y, Side::Bottom),
        (dir.y, bounds.height - origin.y, Side::Top),
    ];

    for (p, q, side) in planes {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
                enter = Some(side);
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
                exit = Some(side);
            }
        }
    }

    if !t1.is_finite() {
        return None;
    }

    Some([
        snap(origin + dir * t0, enter, bounds),
        snap(origin + dir * t1, exit, bounds),
    ])
}

fn snap(p: DVec2, side: Option<Side>, bounds: Bounds) -> DVec2 {
    let mut p = DVec2::new(p.x.clamp(0.0, bounds.width), p.y.clamp(0.0, bounds.height));
    match side {
        Some(Side::Left) => p.x = 0.0,
        Some(Side::Right) => p.x = bounds.width,
        Some(Side::Bottom) => p.y = 0.0,
        Some(Side::Top) => p.y = bounds.height,
        None => {}
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const BOUNDS: Bounds = Bounds {
        width: 10.0,
        height: 10.0,
    };

    #[test]
    fn clip_keeps_inner_segment() {
        let ends = clip(DVec2::new(1.0, 1.0), DVec2::new(2.0, 3.0), 0.0, 1.0, BOUNDS).unwrap();
        assert_eq!(ends, [DVec2::new(1.0, 1.0), DVec2::new(3.0, 4.0)]);
    }

    #[test]
    fn clip_snaps_to_exact_border() {
        let ends = clip(DVec2::new(5.0, 5.0), DVec2::new(1.0, 0.3), 0.0, f64::INFINITY, BOUNDS)
            .unwrap();
        assert_eq!(ends[0], DVec2::new(5.0, 5.0));
        assert_eq!(ends[1].x, 10.0);
        assert!(BOUNDS.on_border(ends[1]));
    }

    #[test]
    fn clip_rejects_outside_segment() {
        assert!(clip(DVec2::new(-5.0, -5.0), DVec2::new(1.0, 0.0), 0.0, 1.0, BOUNDS).is_none());
        let ray = clip(DVec2::new(12.0, 5.0), DVec2::new(1.0, 1.0), 0.0, f64::INFINITY, BOUNDS);
        assert!(ray.is_none());
    }

    #[test]
    fn position_key_merges_signed_zero() {
        assert_eq!(
            PositionKey::new(DVec2::new(-0.0, 1.0)),
            PositionKey::new(DVec2::new(0.0, 1.0))
        );
        assert_ne!(
            PositionKey::new(DVec2::new(1.0, 1.0)),
            PositionKey::new(DVec2::new(1.0 + f64::EPSILON, 1.0))
        );
    }

    #[test]
    fn adapter_clips_all_ends_inside_bounds() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        let points = random_points(40, BOUNDS, &mut rng);
        let diagram = DelaunayAdapter.build(&points, BOUNDS, 0).unwrap();

        assert_eq!(diagram.sites.len(), 40);
        assert!(diagram.edges.iter().any(|e| e.clipped_ends.is_some()));
        for ends in diagram.edges.iter().filter_map(|e| e.clipped_ends) {
            for p in ends {
                assert!((0.0..=10.0).contains(&p.x) && (0.0..=10.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn relaxation_keeps_sites_inside_bounds() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        let points = random_points(30, BOUNDS, &mut rng);
        let diagram = DelaunayAdapter.build(&points, BOUNDS, 2).unwrap();

        assert_eq!(diagram.sites.len(), 30);
        for site in &diagram.sites {
            assert!((0.0..=10.0).contains(&site.x) && (0.0..=10.0).contains(&site.y));
        }
    }
}
