use clap::Parser;
use island_mapgen::{MapGenerationParams, MapGenerator};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Генератор полигональных островов
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию встроенные параметры)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределяет сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Путь для сохранения карты (по умолчанию: ./island.json)
    #[arg(short, long, default_value = "island.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let mut params = match &cli.config {
        Some(path) => MapGenerationParams::from_toml_file(path)?,
        None => MapGenerationParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }

    println!(
        "Генерация острова ({} полигонов, {}×{})...",
        params.polygon_count, params.width, params.height
    );
    let generator = MapGenerator::new(params)?;
    let map = generator.generate_then(|map| {
        println!(
            "Карта готова: {} островов, {} рек",
            map.stats.islands,
            map.stats.rivers.springs.len()
        );
    })?;

    println!("Сохранение в {:?}", cli.output);
    map.save_json(&cli.output)?;

    println!("\nГотово! Карта сохранена.");
    Ok(())
}
