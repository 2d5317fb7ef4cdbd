/*
Cargador del dataset UR Fall para entrenamiento multimodal

1. Verifica la estructura de carpetas del dataset procesado
2. Construye el catálogo de eventos (caídas + ADLs)
3. Recorre las épocas pidiendo batches de frames + acelerómetro

Uso:
    ./target/release/urfall [--config loader.json] [--epochs N] [--check-only] [data/processed]

Logs con RUST_LOG=debug para ver cada batch.
*/

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use urfall::batch::Modality;
use urfall::config::LoaderConfig;
use urfall::dataset::EventCatalog;
use urfall::health_check::check_data_health;
use urfall::loader::FallDetectionLoader;

const USAGE: &str = "Uso: urfall [--config loader.json] [--epochs N] [--check-only] [dataset_root]";

struct CliOptions {
    root: PathBuf,
    config_path: Option<PathBuf>,
    epochs: usize,
    check_only: bool,
}

fn parse_args() -> Result<CliOptions> {
    let mut root: Option<PathBuf> = None;
    let mut config_path = None;
    let mut epochs = 1;
    let mut check_only = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().ok_or_else(|| anyhow!("--config necesita una ruta"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--epochs" => {
                let value = args.next().ok_or_else(|| anyhow!("--epochs necesita un número"))?;
                epochs = value
                    .parse()
                    .with_context(|| format!("--epochs inválido: {}", value))?;
            }
            "--check-only" => check_only = true,
            "-h" | "--help" => bail!(USAGE),
            _ => {
                if root.is_some() {
                    bail!(USAGE);
                }
                root = Some(PathBuf::from(arg));
            }
        }
    }

    Ok(CliOptions {
        // Por defecto, igual que el árbol del proyecto: data/processed
        root: root.unwrap_or_else(|| PathBuf::from("data").join("processed")),
        config_path,
        epochs,
        check_only,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args()?;
    let config = match &opts.config_path {
        Some(path) => LoaderConfig::from_json_file(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => LoaderConfig::default(),
    };

    println!("--- Verificación del dataset en {:?} ---", opts.root);
    let report = check_data_health(&opts.root, &config.layout)
        .with_context(|| format!("No se encontró el dataset en {:?}", opts.root))?;
    println!("Eventos revisados: {}", report.events_checked);
    if report.is_healthy() {
        println!("✅ Todos los archivos y carpetas están en su lugar");
    } else {
        println!("❌ Faltan {} elemento(s):", report.missing.len());
        for item in &report.missing {
            println!("  - {}", item);
        }
    }

    if opts.check_only {
        if !report.is_healthy() {
            bail!("El dataset no pasó la verificación");
        }
        return Ok(());
    }

    let catalog = EventCatalog::from_layout(&opts.root, &config.layout);
    let mut loader = FallDetectionLoader::new(&opts.root, &catalog, config)?;
    println!(
        "\n{} eventos, {} batches por época ({} eventos por batch)",
        catalog.len(),
        loader.len(),
        loader.config().batch_size
    );

    for epoch in 0..opts.epochs {
        if epoch > 0 {
            loader.on_epoch_end();
        }
        let mut degraded_frames = 0;
        let mut degraded_accel = 0;

        for index in 0..loader.len() {
            let batch = loader
                .batch(index)
                .with_context(|| format!("Falló el batch {} de la época {}", index, epoch + 1))?;
            let falls = batch.labels.iter().filter(|&&l| l == 1).count();
            degraded_frames += batch.degraded_count(Modality::Frames);
            degraded_accel += batch.degraded_count(Modality::Accelerometer);

            println!(
                "  época {} batch {:>2}: imágenes {:?}, acelerómetro {:?}, caídas {}/{}",
                epoch + 1,
                index,
                batch.images.shape(),
                batch.accel.shape(),
                falls,
                batch.len()
            );
        }

        println!(
            "Época {}: {} secuencias de frames y {} resúmenes de acelerómetro degradados",
            epoch + 1,
            degraded_frames,
            degraded_accel
        );
    }

    Ok(())
}
