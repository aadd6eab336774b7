//! Фрактальный шум для масок формы острова

use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Многооктавный шум Перлина со значениями в диапазоне [0, 1].
///
/// Шум не зависит от сида: чтобы получить разные карты, вызывающий код
/// сдвигает координаты на величину, выведенную из сида.
pub struct FractalNoise {
    noise: FastNoiseLite,
}

impl FractalNoise {
    #[must_use]
    pub fn new() -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_noise_type(Some(NoiseType::Perlin));
        // Одна ячейка решётки на единицу координат
        noise.set_frequency(Some(1.0));
        Self { noise }
    }

    /// Сэмплирует шум в точке.
    ///
    /// # Аргументы
    /// * `octaves` — количество слоёв шума (минимум один)
    /// * `persistence` — множитель амплитуды на каждую октаву, ограничивается [0, 1]
    /// * `lacunarity` — множитель частоты на каждую октаву
    #[must_use]
    pub fn sample(&self, x: f32, y: f32, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
        let persistence = persistence.clamp(0.0, 1.0);

        let mut result = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut amplitude_sum = 0.0;

        for _ in 0..octaves.max(1) {
            let value = (self.noise.get_noise_2d(x * frequency, y * frequency) + 1.0) * 0.5;
            result += value * amplitude;

            amplitude_sum += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        (result / amplitude_sum).clamp(0.0, 1.0)
    }
}

impl Default for FractalNoise {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_unit_range() {
        let noise = FractalNoise::new();
        for i in 0..200 {
            let x = i as f32 * 0.37;
            let y = i as f32 * 1.13;
            let v = noise.sample(x, y, 4, 0.5, 2.0);
            assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn zero_octaves_behaves_like_one() {
        let noise = FractalNoise::new();
        assert_eq!(
            noise.sample(3.3, 7.1, 0, 0.5, 2.0),
            noise.sample(3.3, 7.1, 1, 0.5, 2.0)
        );
    }

    #[test]
    fn sampling_is_deterministic() {
        let a = FractalNoise::new();
        let b = FractalNoise::new();
        assert_eq!(a.sample(12.5, 0.25, 3, 0.5, 2.0), b.sample(12.5, 0.25, 3, 0.5, 2.0));
    }
}
