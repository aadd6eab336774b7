//! Форма острова
//!
//! Предикат «точка внутри острова» задаёт базовое распределение суши и воды
//! до заливки океана. Углы, для которых предикат ложен, становятся водой.

use crate::noise::FractalNoise;
use glam::DVec2;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Вариант формы острова
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IslandShape {
    /// Вся карта — суша (воду дают только границы карты)
    AlwaysInside,
    /// Круг в нормализованных координатах: `size = 1.0` касается краёв карты
    Circle {
        #[serde(default = "default_circle_size")]
        size: f32,
    },
    /// Шумовая маска с радиальным спадом к краям карты
    Noise {
        #[serde(default)]
        variation: i32,
        #[serde(default = "default_noise_size")]
        size: f32,
        #[serde(default = "default_octaves")]
        octaves: u32,
    },
}

fn default_circle_size() -> f32 {
    1.0
}
fn default_noise_size() -> f32 {
    1.0
}
fn default_octaves() -> u32 {
    4
}

impl Default for IslandShape {
    fn default() -> Self {
        IslandShape::Noise {
            variation: 0,
            size: default_noise_size(),
            octaves: default_octaves(),
        }
    }
}

impl IslandShape {
    /// Проверяет одну точку. Для массовых проверок используйте [`IslandShape::sampler`].
    #[must_use]
    pub fn is_inside(&self, point: DVec2, map_size: DVec2, seed: u64) -> bool {
        self.sampler(map_size, seed).is_inside(point)
    }

    /// Готовит предикат для конкретной карты: смещение шума вычисляется один раз.
    #[must_use]
    pub fn sampler(&self, map_size: DVec2, seed: u64) -> ShapeSampler {
        let offset = match *self {
            IslandShape::Noise { variation, .. } => {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
                rng.gen_range(0.0f32..10_000.0) + variation as f32 * 10.0
            }
            _ => 0.0,
        };

        ShapeSampler {
            shape: *self,
            map_size,
            offset,
            noise: FractalNoise::new(),
        }
    }
}

/// Предикат формы, привязанный к размеру карты и сиду
pub struct ShapeSampler {
    shape: IslandShape,
    map_size: DVec2,
    offset: f32,
    noise: FractalNoise,
}

impl ShapeSampler {
    #[must_use]
    pub fn is_inside(&self, point: DVec2) -> bool {
        // Позиция в диапазоне [-1, 1] по каждой оси
        let normalized = (point / self.map_size - 0.5) * 2.0;

        match self.shape {
            IslandShape::AlwaysInside => true,
            IslandShape::Circle { size } => normalized.length() < f64::from(size),
            IslandShape::Noise { size, octaves, .. } => {
                let x = normalized.x as f32 * size + self.offset;
                let y = normalized.y as f32 * size + self.offset;
                let value = self.noise.sample(x, y, octaves, 0.5, 2.0);

                value > 0.3 + 0.3 * normalized.length_squared() as f32
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: DVec2 = DVec2::new(100.0, 50.0);

    #[test]
    fn always_inside_accepts_everything() {
        let shape = IslandShape::AlwaysInside;
        assert!(shape.is_inside(DVec2::ZERO, MAP, 1));
        assert!(shape.is_inside(MAP, MAP, 1));
    }

    #[test]
    fn circle_uses_normalized_distance() {
        let shape = IslandShape::Circle { size: 0.5 };
        assert!(shape.is_inside(DVec2::new(50.0, 25.0), MAP, 0));
        // (60, 25) -> (0.2, 0.0)
        assert!(shape.is_inside(DVec2::new(60.0, 25.0), MAP, 0));
        // (80, 25) -> (0.6, 0.0)
        assert!(!shape.is_inside(DVec2::new(80.0, 25.0), MAP, 0));
        // (50, 40) -> (0.0, 0.6)
        assert!(!shape.is_inside(DVec2::new(50.0, 40.0), MAP, 0));
    }

    #[test]
    fn noise_rejects_points_far_outside_map() {
        // (-30, -15) -> (-1.6, -1.6): порог 0.3 + 0.3 * 5.12 выше любого значения шума
        let shape = IslandShape::Noise {
            variation: 0,
            size: 1.0,
            octaves: 4,
        };
        let far = DVec2::new(-0.5 * MAP.x * 0.6, -0.5 * MAP.y * 0.6);
        assert!(!shape.is_inside(far, MAP, 7));
    }

    #[test]
    fn noise_shape_is_seed_stable() {
        let shape = IslandShape::default();
        let sampler_a = shape.sampler(MAP, 99);
        let sampler_b = shape.sampler(MAP, 99);
        for i in 0..50 {
            let p = DVec2::new(f64::from(i) * 2.0, f64::from(i));
            assert_eq!(sampler_a.is_inside(p), sampler_b.is_inside(p));
        }
    }

    #[test]
    fn shape_parses_from_tagged_toml() {
        let shape: IslandShape = toml::from_str("kind = \"circle\"\nsize = 0.8\n").unwrap();
        assert_eq!(shape, IslandShape::Circle { size: 0.8 });

        let shape: IslandShape = toml::from_str("kind = \"noise\"\n").unwrap();
        assert_eq!(shape, IslandShape::default());
    }
}
